//! Deterministic output names for unlocked segments.
//!
//! Names are rendered from a template using `{varname}` substitution:
//!
//! - `{n}` - 1-based position among all segments
//! - `{nn}` - the same position zero-padded to two digits
//! - `{base}` - base identifier of the timeline (usually the source file stem)

use crate::segment::Segment;
use serde::{Deserialize, Serialize};

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = "segment_{nn}";

/// Output name template.
///
/// # Example
///
/// ```
/// use segcut_timeline::NameTemplate;
///
/// let template = NameTemplate::new("part_{n}_{base}");
/// assert_eq!(template.render(3, "podcast"), "part_3_podcast");
/// assert_eq!(NameTemplate::default().render(3, "podcast"), "segment_03");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameTemplate(String);

impl NameTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the name for the segment at `position` (1-based).
    pub fn render(&self, position: usize, base: &str) -> String {
        let vars = [
            ("nn", format!("{:02}", position)),
            ("n", position.to_string()),
            ("base", base.to_string()),
        ];

        let mut result = self.0.clone();
        for (key, value) in &vars {
            result = result.replace(&format!("{{{}}}", key), value);
        }
        result
    }
}

impl Default for NameTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl From<&str> for NameTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

/// Rename every unlocked segment after its position.
///
/// The counter advances for locked segments too, so a name always reflects
/// the overall position. Locked names are left alone; manual names on
/// unlocked segments are overwritten.
pub fn renumber(segments: &mut [Segment], template: &NameTemplate, base: &str) {
    for (i, seg) in segments.iter_mut().enumerate() {
        if !seg.locked {
            seg.output_name = template.render(i + 1, base);
        }
    }
}

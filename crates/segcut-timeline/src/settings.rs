//! Engine settings: the only configuration that affects segmentation.

use crate::naming::NameTemplate;
use crate::time::SegmentLength;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Length used by generation and cascades. `None` until a valid length
    /// has been given; cascades then fall back to one minute.
    #[serde(default)]
    pub segment_length: Option<SegmentLength>,

    /// Keep locked segments as anchors when regenerating.
    #[serde(default = "default_keep_locked")]
    pub keep_locked: bool,

    /// Reject generation when locked segments overlap or are out of order.
    #[serde(default)]
    pub strict_anchors: bool,

    #[serde(default)]
    pub name_template: NameTemplate,
}

fn default_keep_locked() -> bool {
    true
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            segment_length: None,
            keep_locked: default_keep_locked(),
            strict_anchors: false,
            name_template: NameTemplate::default(),
        }
    }
}

impl EngineSettings {
    pub fn with_length(mut self, length: SegmentLength) -> Self {
        self.segment_length = Some(length);
        self
    }

    pub fn with_template(mut self, template: NameTemplate) -> Self {
        self.name_template = template;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let settings: EngineSettings = toml::from_str("").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert!(settings.keep_locked);
        assert!(settings.segment_length.is_none());
    }

    #[test]
    fn test_from_toml() {
        let settings: EngineSettings = toml::from_str(
            r#"
            segment_length = "00:05:00"
            keep_locked = false
            name_template = "part_{n}_{base}"
            "#,
        )
        .unwrap();
        assert_eq!(settings.segment_length.map(|l| l.as_secs()), Some(300.0));
        assert!(!settings.keep_locked);
        assert_eq!(settings.name_template.render(2, "mix"), "part_2_mix");
    }

    #[test]
    fn test_rejects_zero_length() {
        assert!(toml::from_str::<EngineSettings>("segment_length = 0.0").is_err());
    }
}

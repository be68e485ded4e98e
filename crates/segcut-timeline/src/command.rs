//! Command dispatch over a committed timeline.

use crate::edit::Boundary;
use crate::error::{EditError, Result};
use crate::settings::EngineSettings;
use crate::time::{SegmentLength, ShiftUnit, TimeValue};
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// A single user edit.
///
/// Serialized with an `op` tag, e.g.
/// `{"op": "shift", "index": 1, "delta": 10, "unit": "seconds"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Regenerate the segmentation. A given length or lock policy replaces
    /// the configured one once generation succeeds.
    Generate {
        #[serde(default)]
        length: Option<TimeValue>,
        #[serde(default)]
        keep_locked: Option<bool>,
    },
    SetBoundary {
        index: usize,
        field: Boundary,
        value: TimeValue,
    },
    /// A missing, null, zero or non-numeric delta is a no-op.
    Shift {
        index: usize,
        #[serde(default)]
        delta: Option<TimeValue>,
        #[serde(default)]
        unit: ShiftUnit,
    },
    ToggleLock {
        index: usize,
    },
    SetLocked {
        index: usize,
        locked: bool,
    },
    Rename {
        index: usize,
        name: String,
    },
    Delete {
        index: usize,
    },
    Append,
    Clear,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generate { .. } => "generate",
            Self::SetBoundary { .. } => "set_boundary",
            Self::Shift { .. } => "shift",
            Self::ToggleLock { .. } => "toggle_lock",
            Self::SetLocked { .. } => "set_locked",
            Self::Rename { .. } => "rename",
            Self::Delete { .. } => "delete",
            Self::Append => "append",
            Self::Clear => "clear",
        }
    }
}

/// Owner of a committed timeline and the settings that drive it.
///
/// Commands are applied one at a time. A command either replaces the
/// timeline with a new valid one or is rejected and leaves both the timeline
/// and the settings untouched.
#[derive(Debug, Clone)]
pub struct Editor {
    timeline: Timeline,
    settings: EngineSettings,
}

impl Editor {
    pub fn new(timeline: Timeline, settings: EngineSettings) -> Self {
        Self { timeline, settings }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    /// Apply one command.
    pub fn apply(&mut self, command: &Command) -> Result<&Timeline> {
        match self.evaluate(command) {
            Ok((timeline, settings)) => {
                tracing::debug!(
                    op = command.name(),
                    segments = timeline.len(),
                    "command applied"
                );
                self.timeline = timeline;
                self.settings = settings;
                Ok(&self.timeline)
            }
            Err(e) => {
                tracing::debug!(op = command.name(), kind = e.kind(), "command rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Apply commands in order, stopping at the first rejection.
    ///
    /// Commands before the rejected one stay applied.
    pub fn apply_all<'a, I>(&mut self, commands: I) -> std::result::Result<(), (usize, EditError)>
    where
        I: IntoIterator<Item = &'a Command>,
    {
        for (i, command) in commands.into_iter().enumerate() {
            self.apply(command).map_err(|e| (i, e))?;
        }
        Ok(())
    }

    fn evaluate(&self, command: &Command) -> Result<(Timeline, EngineSettings)> {
        let tl = &self.timeline;
        let settings = &self.settings;

        let next = match command {
            Command::Generate {
                length,
                keep_locked,
            } => {
                let length = match length {
                    Some(value) => SegmentLength::new(value.as_length())?,
                    None => settings
                        .segment_length
                        .ok_or(EditError::InvalidLength { length: 0.0 })?,
                };
                let keep_locked = keep_locked.unwrap_or(settings.keep_locked);

                if settings.strict_anchors && keep_locked {
                    if let Some(&(first, second)) = tl.check_anchors().first() {
                        return Err(EditError::AnchorOverlap { first, second });
                    }
                }

                let generated = tl.generate(length, keep_locked, &settings.name_template)?;
                let mut settings = settings.clone();
                settings.segment_length = Some(length);
                settings.keep_locked = keep_locked;
                return Ok((generated, settings));
            }
            Command::SetBoundary {
                index,
                field,
                value,
            } => tl.set_boundary(*index, *field, value.as_timestamp(), settings)?,
            Command::Shift { index, delta, unit } => {
                match delta.as_ref().and_then(TimeValue::as_delta) {
                    Some(delta) => tl.shift(*index, unit.to_seconds(delta), settings)?,
                    None => tl.clone(),
                }
            }
            Command::ToggleLock { index } => tl.toggle_lock(*index)?,
            Command::SetLocked { index, locked } => tl.set_locked(*index, *locked)?,
            Command::Rename { index, name } => tl.rename(*index, name)?,
            Command::Delete { index } => tl.delete(*index, settings)?,
            Command::Append => tl.append(settings)?,
            Command::Clear => tl.clear(),
        };

        Ok((next, settings.clone()))
    }
}

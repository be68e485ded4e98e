//! # segcut-timeline
//!
//! Segment timeline engine for cutting one media file into named parts.
//!
//! A [`Timeline`] is a fixed duration carved into an ordered sequence of
//! [`Segment`]s. Segments can be locked to act as anchors; whenever the
//! segment length, a boundary or a start changes, the unlocked segments
//! around the anchors are derived again.
//!
//! - **Time codec**: `HH:MM:SS` formatting and lenient parsing
//! - **Generation**: fill the timeline, optionally around anchors
//! - **Edits**: boundary moves, relative shifts, locks, deletes, appends
//! - **Cascade**: rebuild the region after an edited segment
//! - **Naming**: positional names from a template
//!
//! The engine performs no I/O. Every operation returns a new timeline or an
//! [`EditError`]; a rejected operation never changes the input.
//!
//! ## Example
//!
//! ```
//! use segcut_timeline::{Boundary, Command, Editor, EngineSettings, Timeline};
//!
//! let timeline = Timeline::with_base_name(125.0, "talk")?;
//! let mut editor = Editor::new(timeline, EngineSettings::default());
//!
//! editor.apply(&Command::Generate { length: Some("60".into()), keep_locked: None })?;
//! editor.apply(&Command::SetBoundary {
//!     index: 0,
//!     field: Boundary::End,
//!     value: "00:00:40".into(),
//! })?;
//!
//! let ends: Vec<f64> = editor.timeline().segments().iter().map(|s| s.end).collect();
//! assert_eq!(ends, vec![40.0, 100.0, 125.0]);
//! # Ok::<(), segcut_timeline::EditError>(())
//! ```

mod cascade;
mod command;
mod edit;
mod error;
mod generate;
pub mod naming;
mod segment;
mod settings;
pub mod time;
mod timeline;

pub use cascade::FALLBACK_LENGTH;
pub use command::{Command, Editor};
pub use edit::{Boundary, DEFAULT_WIDTH};
pub use error::{EditError, Result};
pub use generate::{fill_region, MAX_SEGMENTS, TAIL_TOLERANCE};
pub use naming::{renumber, NameTemplate, DEFAULT_TEMPLATE};
pub use segment::{Segment, SegmentId};
pub use settings::EngineSettings;
pub use time::{
    format_timestamp, parse_delta, parse_length, parse_timestamp, SegmentLength, ShiftUnit,
    TimeValue,
};
pub use timeline::{CutSpec, Timeline, DEFAULT_BASE_NAME};

//! # segcut-av
//!
//! External media tools used to export a segment timeline.
//!
//! This crate provides functionality for:
//! - Locating ffmpeg and ffprobe, with configured path overrides
//! - Probing a file's duration and listing audio files in a directory
//! - Cutting a file into parts with stream copy
//! - Joining files with the concat demuxer
//! - Packing exported parts into a zip archive
//!
//! ## Example
//!
//! ```no_run
//! use segcut_av::{probe_duration, split, SplitOptions, Toolchain};
//! use segcut_timeline::{SegmentLength, NameTemplate, Timeline};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tools = Toolchain::default();
//! let input = Path::new("/music/mix.mp3");
//! let duration = probe_duration(&tools, input)?;
//!
//! let timeline = Timeline::with_base_name(duration, "mix")?.generate(
//!     SegmentLength::new(600.0)?,
//!     true,
//!     &NameTemplate::default(),
//! )?;
//!
//! let options = SplitOptions::default().with_default_archive();
//! let report = split(&tools, input, Path::new("/music/parts"), &timeline.cut_list(), &options)?;
//! println!("created {} parts", report.created.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
mod error;
pub mod join;
pub mod probe;
pub mod split;
pub mod tools;

// Re-exports
pub use archive::{create_archive, DEFAULT_ARCHIVE_NAME};
pub use error::{Error, Result};
pub use join::{concat_list, join};
pub use probe::{list_audio_files, parse_duration, probe_duration, AudioFile, AUDIO_EXTENSION};
pub use split::{output_file_name, split, split_args, SplitOptions, SplitReport};
pub use tools::{ToolInfo, Toolchain};

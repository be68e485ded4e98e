//! Cutting one media file into parts with ffmpeg stream copy.

use crate::archive::{create_archive, DEFAULT_ARCHIVE_NAME};
use crate::tools::{run, Toolchain};
use crate::{Error, Result};
use segcut_timeline::CutSpec;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// How exported parts are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// Extension appended to output names that lack it.
    pub extension: String,
    /// Pack the created files into this archive inside the output directory.
    pub archive: Option<String>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            extension: "mp3".to_string(),
            archive: None,
        }
    }
}

impl SplitOptions {
    pub fn with_archive(mut self, name: impl Into<String>) -> Self {
        self.archive = Some(name.into());
        self
    }

    pub fn with_default_archive(self) -> Self {
        self.with_archive(DEFAULT_ARCHIVE_NAME)
    }
}

/// Outcome of a split batch.
///
/// Per-part failures are collected in `errors` and do not stop the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitReport {
    pub success: bool,
    /// File names created, followed by the archive name when one was written.
    pub created: Vec<String>,
    pub created_paths: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub zip_path: Option<PathBuf>,
}

/// Append `.{extension}` unless `name` already ends with it.
pub fn output_file_name(name: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension);
    if name.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// Arguments for one stream-copy cut.
pub fn split_args(input: &Path, cut: &CutSpec, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
    args.extend(
        [
            "-ss".to_string(),
            cut.start_seconds.to_string(),
            "-to".to_string(),
            cut.end_seconds.to_string(),
            "-c".to_string(),
            "copy".to_string(),
            "-map".to_string(),
            "0".to_string(),
            "-vn".to_string(),
        ]
        .map(OsString::from),
    );
    args.push(output.into());
    args
}

/// Export every cut of `input` into `output_dir`.
///
/// # Errors
///
/// Fails before any cut is attempted when the input file is missing, the
/// output directory is empty, or the cut list is empty.
pub fn split(
    tools: &Toolchain,
    input: &Path,
    output_dir: &Path,
    cuts: &[CutSpec],
    options: &SplitOptions,
) -> Result<SplitReport> {
    if !input.is_file() {
        return Err(Error::file_not_found(input));
    }
    if output_dir.as_os_str().is_empty() {
        return Err(Error::InvalidInput(
            "output directory not specified".to_string(),
        ));
    }
    if cuts.is_empty() {
        return Err(Error::InvalidInput("no segments defined".to_string()));
    }

    std::fs::create_dir_all(output_dir)?;

    let mut report = SplitReport::default();
    for cut in cuts {
        let name = output_file_name(&cut.output_name, &options.extension);
        let path = output_dir.join(&name);

        let mut cmd = Command::new(&tools.ffmpeg);
        cmd.args(split_args(input, cut, &path)).stdout(Stdio::null());

        match run("ffmpeg", &mut cmd) {
            Ok(_) => {
                tracing::debug!(part = %name, start = cut.start_seconds, end = cut.end_seconds, "part created");
                report.created.push(name);
                report.created_paths.push(path);
            }
            Err(Error::ToolFailed { message, .. }) => {
                report.errors.push(format!("Error creating {}: {}", name, message));
            }
            Err(e) => report.errors.push(format!("Error creating {}: {}", name, e)),
        }
    }

    if let Some(archive) = &options.archive {
        if !report.created_paths.is_empty() {
            let zip_path = output_dir.join(archive);
            match create_archive(&zip_path, &report.created_paths) {
                Ok(path) => {
                    report.created.push(archive.clone());
                    report.zip_path = Some(path);
                }
                Err(e) => report.errors.push(format!("Error creating zip: {}", e)),
            }
        }
    }

    report.success = report.errors.is_empty();
    if !report.success {
        tracing::warn!(failed = report.errors.len(), "split finished with errors");
    }
    tracing::info!(
        input = %input.display(),
        parts = report.created_paths.len(),
        "split finished"
    );
    Ok(report)
}

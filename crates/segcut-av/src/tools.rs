//! External tool detection and invocation.

use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Information about an external tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Run `program <version_arg>` and report what was found.
fn check_program(name: &str, program: &Path, version_arg: &str) -> ToolInfo {
    match Command::new(program).arg(version_arg).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .find(|l| !l.trim().is_empty())
                .map(|s| s.trim().to_string());

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path: which::which(program).ok(),
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// The programs used to probe, cut and join.
///
/// Each entry is either a bare program name resolved through `PATH` when
/// the command runs, or a configured path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

impl Toolchain {
    /// Build a toolchain from optional path overrides.
    pub fn with_overrides(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Self {
        let defaults = Self::default();
        Self {
            ffmpeg: ffmpeg.map(Path::to_path_buf).unwrap_or(defaults.ffmpeg),
            ffprobe: ffprobe.map(Path::to_path_buf).unwrap_or(defaults.ffprobe),
        }
    }

    /// Check ffmpeg and ffprobe.
    ///
    /// ```no_run
    /// use segcut_av::Toolchain;
    ///
    /// for info in Toolchain::default().check() {
    ///     println!("{}: {:?}", info.name, info.version);
    /// }
    /// ```
    pub fn check(&self) -> Vec<ToolInfo> {
        vec![
            check_program("ffmpeg", &self.ffmpeg, "-version"),
            check_program("ffprobe", &self.ffprobe, "-version"),
        ]
    }
}

/// Run a prepared command and require a zero exit status.
///
/// A missing executable maps to [`Error::ToolNotFound`]; a non-zero exit maps
/// to [`Error::ToolFailed`] carrying the tool's stderr.
pub(crate) fn run(tool: &str, cmd: &mut Command) -> Result<Output> {
    tracing::debug!(tool, command = ?cmd, "running tool");

    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::tool_not_found(tool)
        } else {
            Error::Io(e)
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::warn!(tool, status = ?output.status.code(), "tool failed");
        return Err(Error::tool_failed(tool, stderr.trim().to_string()));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_check_missing_program() {
        let info = check_program("ffmpeg", Path::new("nonexistent_tool_12345"), "-version");
        assert_eq!(info.name, "ffmpeg");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert!(info.path.is_none());
    }

    #[test]
    fn test_toolchain_overrides() {
        let tools = Toolchain::with_overrides(Some(Path::new("/opt/ffmpeg/bin/ffmpeg")), None);
        assert_eq!(tools.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(tools.ffprobe, PathBuf::from("ffprobe"));
    }

    #[test]
    fn test_run_missing_program() {
        let mut cmd = Command::new("nonexistent_tool_12345");
        assert_matches!(run("nonexistent_tool_12345", &mut cmd), Err(Error::ToolNotFound { .. }));
    }

    #[test]
    fn test_check_reports_every_tool() {
        let tools = Toolchain::with_overrides(
            Some(Path::new("nonexistent_ffmpeg_12345")),
            Some(Path::new("nonexistent_ffprobe_12345")),
        );
        let infos = tools.check();
        let names: Vec<&str> = infos.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["ffmpeg", "ffprobe"]);
        assert!(infos.iter().all(|i| !i.available));
    }
}

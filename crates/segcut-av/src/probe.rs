//! Duration probing and audio file listing via ffprobe.

use crate::tools::{run, Toolchain};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Extension of the files returned by [`list_audio_files`].
pub const AUDIO_EXTENSION: &str = "mp3";

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// One audio file found in a directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioFile {
    pub filename: String,
    pub path: PathBuf,
    pub duration: f64,
    pub size: u64,
}

/// Probe the duration of a media file in seconds.
///
/// # Example
///
/// ```no_run
/// use segcut_av::{probe_duration, Toolchain};
///
/// let seconds = probe_duration(&Toolchain::default(), "/music/mix.mp3")?;
/// println!("{seconds:.1}s");
/// # Ok::<(), segcut_av::Error>(())
/// ```
pub fn probe_duration<P: AsRef<Path>>(tools: &Toolchain, path: P) -> Result<f64> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::file_not_found(path));
    }

    let output = run(
        "ffprobe",
        Command::new(&tools.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "json",
            ])
            .arg(path),
    )?;

    let json_str = String::from_utf8(output.stdout)
        .map_err(|e| Error::parse_error("ffprobe", format!("Invalid UTF-8: {}", e)))?;

    parse_duration(&json_str)
}

/// Extract the format duration from ffprobe's JSON output.
pub fn parse_duration(json: &str) -> Result<f64> {
    let output: FfprobeOutput = serde_json::from_str(json)?;

    let raw = output
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| Error::parse_error("ffprobe", "no duration in output"))?;

    let duration: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::parse_error("ffprobe", format!("invalid duration: {}", raw)))?;

    if !(duration.is_finite() && duration > 0.0) {
        return Err(Error::parse_error(
            "ffprobe",
            format!("non-positive duration: {}", raw),
        ));
    }

    Ok(duration)
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(AUDIO_EXTENSION))
        .unwrap_or(false)
}

/// List the `.mp3` files directly inside `dir`, sorted by file name.
///
/// Files that cannot be probed are skipped with a warning.
pub fn list_audio_files<P: AsRef<Path>>(tools: &Toolchain, dir: P) -> Result<Vec<AudioFile>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::file_not_found(dir));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !has_audio_extension(path) {
            continue;
        }

        let duration = match probe_duration(tools, path) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping unreadable file: {}", e);
                continue;
            }
        };
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        files.push(AudioFile {
            filename: entry.file_name().to_string_lossy().to_string(),
            path: path.to_path_buf(),
            duration,
            size,
        });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    tracing::debug!(dir = %dir.display(), count = files.len(), "listed audio files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_duration() {
        let json = r#"{"format": {"duration": "125.040000"}}"#;
        assert_eq!(parse_duration(json).unwrap(), 125.04);
    }

    #[test]
    fn test_parse_duration_missing() {
        assert_matches!(parse_duration("{}"), Err(Error::ParseError { .. }));
        assert_matches!(
            parse_duration(r#"{"format": {}}"#),
            Err(Error::ParseError { .. })
        );
        assert_matches!(
            parse_duration(r#"{"format": {"duration": "N/A"}}"#),
            Err(Error::ParseError { .. })
        );
        assert_matches!(
            parse_duration(r#"{"format": {"duration": "0.0"}}"#),
            Err(Error::ParseError { .. })
        );
    }

    #[test]
    fn test_parse_duration_bad_json() {
        assert_matches!(parse_duration("not json"), Err(Error::Json(_)));
    }

    #[test]
    fn test_probe_missing_file() {
        assert_matches!(
            probe_duration(&Toolchain::default(), "/nonexistent/file.mp3"),
            Err(Error::FileNotFound { .. })
        );
    }

    #[test]
    fn test_audio_extension() {
        assert!(has_audio_extension(Path::new("a.mp3")));
        assert!(has_audio_extension(Path::new("B.MP3")));
        assert!(!has_audio_extension(Path::new("c.wav")));
        assert!(!has_audio_extension(Path::new("mp3")));
    }

    #[test]
    fn test_list_skips_unprobeable_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.mp3"), b"not audio").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

        let tools = Toolchain::with_overrides(None, Some(Path::new("nonexistent_ffprobe_12345")));
        let files = list_audio_files(&tools, dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_missing_dir() {
        assert_matches!(
            list_audio_files(&Toolchain::default(), "/nonexistent/dir"),
            Err(Error::FileNotFound { .. })
        );
    }
}

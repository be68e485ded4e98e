//! Joining files with the ffmpeg concat demuxer.

use crate::split::output_file_name;
use crate::tools::{run, Toolchain};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Render a concat demuxer list, one `file '<path>'` line per input.
///
/// Single quotes inside paths are escaped as `'\''`.
pub fn concat_list<P: AsRef<Path>>(files: &[P]) -> String {
    files
        .iter()
        .map(|f| {
            let path = f.as_ref().to_string_lossy().replace('\'', "'\\''");
            format!("file '{}'\n", path)
        })
        .collect()
}

/// Concatenate `files` in order into `output`.
///
/// `.mp3` is appended to `output` when missing. Returns the written path.
pub fn join<P: AsRef<Path>>(tools: &Toolchain, files: &[P], output: &Path) -> Result<PathBuf> {
    if files.is_empty() {
        return Err(Error::InvalidInput("no files provided".to_string()));
    }
    if output.as_os_str().is_empty() {
        return Err(Error::InvalidInput("output path not specified".to_string()));
    }
    for file in files {
        let file = file.as_ref();
        if !file.is_file() {
            return Err(Error::file_not_found(file));
        }
    }

    let output = {
        let name = output.to_string_lossy();
        PathBuf::from(output_file_name(&name, "mp3"))
    };

    let workspace = TempDir::new()?;
    let list_path = workspace.path().join("filelist.txt");
    std::fs::write(&list_path, concat_list(files))?;

    run(
        "ffmpeg",
        Command::new(&tools.ffmpeg)
            .args(["-y", "-f", "concat", "-safe", "0", "-i"])
            .arg(&list_path)
            .args(["-c", "copy"])
            .arg(&output),
    )?;

    if !output.is_file() {
        return Err(Error::tool_failed("ffmpeg", "output file was not created"));
    }

    tracing::info!(output = %output.display(), files = files.len(), "files joined");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_concat_list() {
        let list = concat_list(&["/music/a.mp3", "/music/it's.mp3"]);
        assert_eq!(
            list,
            "file '/music/a.mp3'\nfile '/music/it'\\''s.mp3'\n"
        );
    }

    #[test]
    fn test_join_validation() {
        let dir = tempfile::tempdir().unwrap();
        let tools = Toolchain::default();
        let none: Vec<PathBuf> = Vec::new();

        assert_matches!(
            join(&tools, &none, &dir.path().join("out.mp3")),
            Err(Error::InvalidInput(_))
        );
        assert_matches!(
            join(&tools, &[dir.path().join("missing.mp3")], &dir.path().join("out.mp3")),
            Err(Error::FileNotFound { .. })
        );

        let a = dir.path().join("a.mp3");
        std::fs::write(&a, b"x").unwrap();
        assert_matches!(join(&tools, &[&a], Path::new("")), Err(Error::InvalidInput(_)));
    }

    #[test]
    fn test_join_missing_ffmpeg() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp3");
        std::fs::write(&a, b"x").unwrap();
        let tools = Toolchain::with_overrides(Some(Path::new("nonexistent_ffmpeg_12345")), None);

        assert_matches!(
            join(&tools, &[&a], &dir.path().join("joined")),
            Err(Error::ToolNotFound { .. })
        );
    }
}

//! Packing exported segments into a zip archive.

use crate::{Error, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default archive name written next to the exported segments.
pub const DEFAULT_ARCHIVE_NAME: &str = "segments.zip";

/// Create `zip_path` containing `files`, stored under their file names only.
///
/// An existing archive at `zip_path` is replaced rather than extended.
pub fn create_archive<P: AsRef<Path>>(zip_path: &Path, files: &[P]) -> Result<PathBuf> {
    if files.is_empty() {
        return Err(Error::InvalidInput("no files to archive".to_string()));
    }
    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        let file = file.as_ref();
        if !file.is_file() {
            return Err(Error::file_not_found(file));
        }
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidInput(format!("not a file name: {}", file.display())))?;
        entries.push((name, file));
    }

    let mut writer = ZipWriter::new(BufWriter::new(File::create(zip_path)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, file) in entries {
        writer.start_file(name, options)?;
        std::io::copy(&mut File::open(file)?, &mut writer)?;
    }
    writer.finish()?;

    tracing::debug!(archive = %zip_path.display(), files = files.len(), "archive created");
    Ok(zip_path.to_path_buf())
}

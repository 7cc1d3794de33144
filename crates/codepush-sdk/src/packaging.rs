//! Zipping release content for upload

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Result, SdkError};

/// Zip a release directory or single file into a temporary archive.
///
/// Directory entries are named relative to the directory itself. A single
/// file becomes the archive's only entry, under its own file name.
pub fn package_release(path: &Path) -> Result<NamedTempFile> {
    let archive = NamedTempFile::new()?;
    let mut writer = ZipWriter::new(archive.reopen()?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| SdkError::Packaging(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(path)
                .map_err(|e| SdkError::Packaging(e.to_string()))?;
            let name = entry_name(relative);
            debug!(entry = %name, "adding file to release archive");
            add_file(&mut writer, entry.path(), &name, options)?;
        }
    } else {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SdkError::Packaging(format!("{} has no file name", path.display())))?;
        add_file(&mut writer, path, &name, options)?;
    }

    writer.finish()?.flush()?;
    Ok(archive)
}

/// Archive entry names always use forward slashes
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn add_file(
    writer: &mut ZipWriter<File>,
    source: &Path,
    name: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    writer.start_file(name, options)?;
    let mut file = File::open(source)?;
    io::copy(&mut file, writer)?;
    Ok(())
}

//! Temporary fixture files.

use std::io::{Seek, SeekFrom, Write};

/// Writes `contents` to a fresh temporary file, positioned at its start.
///
/// The file is removed when the returned handle is dropped.
pub fn temp_file_with(contents: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    file.seek(SeekFrom::Start(0))?;
    Ok(file)
}

//! Zip entry reader for extraction result archives.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

/// Archive entry holding the structured extraction output.
pub const STRUCTURED_DATA_ENTRY: &str = "structuredData.json";

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("archive has no entry named {0:?}")]
    EntryNotFound(String),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read the named entry's content decoded as UTF-8 text.
///
/// The lookup is an exact-name match over all entries; entry order in the
/// archive does not matter.
pub fn read_entry_text(path: &Path, entry_name: &str) -> Result<String, ArchiveError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut entry = match archive.by_name(entry_name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ArchiveError::EntryNotFound(entry_name.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut text = String::new();
    entry.read_to_string(&mut text)?;
    Ok(text)
}

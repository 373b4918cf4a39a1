// src/store.rs
use std::{fs, io, path::{Path, PathBuf}};

use crate::csv;
use crate::error::{Error, Result};
use crate::file::write_with;
use crate::record::BuildRecord;

/// Persist records as CSV. Nothing is written for an empty set.
pub fn save_records(path: &Path, records: &[BuildRecord]) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        tracing::warn!(path = %path.display(), "no data to save to CSV");
        return Ok(None);
    }
    write_with(path, |out| csv::write_records(out, records))?;
    tracing::info!(path = %path.display(), rows = records.len(), "CSV written");
    Ok(Some(path.to_path_buf()))
}

/// Load records from CSV; `None` when the file does not exist.
pub fn load_records(path: &Path) -> Result<Option<Vec<BuildRecord>>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(csv::read_records(&text))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

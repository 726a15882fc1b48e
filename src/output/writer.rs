//! Append-only newline-delimited JSON writer

use crate::HarvestError;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes one JSON object per line to a file it owns
///
/// Each record is serialized in full before anything is written, then written
/// together with its newline in a single call and flushed, so an interrupted run
/// leaves only complete lines behind. The file is closed when the writer is dropped.
#[derive(Debug)]
pub struct RecordWriter {
    path: PathBuf,
    file: File,
    written: usize,
}

impl RecordWriter {
    /// Creates (or truncates) the file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self, HarvestError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| HarvestError::FileOpen {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            file,
            written: 0,
        })
    }

    /// Serializes `record` and appends it as one line
    pub fn append<T: Serialize>(&mut self, record: &T) -> Result<(), HarvestError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Number of records appended so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Syncs the file to disk and closes it, returning the record count
    pub fn finish(mut self) -> Result<usize, HarvestError> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(self.written)
    }
}

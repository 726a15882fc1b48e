//! Merging per-category backups into one dataset

use crate::output::record::{MergedRecord, SignRecord};
use crate::HarvestError;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extension of per-category backup files
pub const BACKUP_EXTENSION: &str = "jsonl";

/// Lists the backup files in `dir`, sorted by name
pub fn list_backups(dir: &Path) -> Result<Vec<PathBuf>, HarvestError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == BACKUP_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads one backup file, tagging every record with the category named by the file
///
/// Blank lines are skipped; any other line that is not a record is an error
/// carrying the 1-based line number.
pub fn read_backup(path: &Path) -> Result<Vec<SignRecord>, HarvestError> {
    let category = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut record: SignRecord =
            serde_json::from_str(&line).map_err(|source| HarvestError::MalformedRecord {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })?;
        record.category = category.clone();
        records.push(record);
    }

    Ok(records)
}

/// Merges every backup in `dir` into dataset rows
///
/// Single-video lists are unwrapped; a sign page with several videos fails the merge.
pub fn merge_backups(dir: &Path) -> Result<Vec<MergedRecord>, HarvestError> {
    let mut rows = Vec::new();

    for path in list_backups(dir)? {
        let records = read_backup(&path)?;
        tracing::debug!("{}: {} records", path.display(), records.len());

        for record in records {
            rows.push(MergedRecord::try_from(record)?);
        }
    }

    Ok(rows)
}

/// Writes the merged rows as a pretty-printed JSON array, creating parent directories
pub fn write_merged(path: &Path, rows: &[MergedRecord]) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Loads a merged dataset written by [`write_merged`]
pub fn load_merged(path: &Path) -> Result<Vec<MergedRecord>, HarvestError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

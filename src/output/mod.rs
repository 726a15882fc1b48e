//! Output module for crawl records and reports
//!
//! This module handles:
//! - The persisted record shapes (`SignRecord`, `MergedRecord`)
//! - Writing per-category newline-delimited JSON backups
//! - Merging backups into a single dataset
//! - The end-of-run report

mod merge;
mod record;
mod report;
mod writer;

pub use merge::{
    list_backups, load_merged, merge_backups, read_backup, write_merged, BACKUP_EXTENSION,
};
pub use record::{MergedRecord, SignRecord, VideoRef, NO_VIDEO};
pub use report::{print_report, CrawlReport};
pub use writer::RecordWriter;

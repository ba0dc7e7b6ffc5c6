//! Merge report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema version for the merge report
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for the merge report
pub const REPORT_SCHEMA_ID: &str = "amalgam/merge_report@1";

/// What happened to one manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    /// Header and filtered content were written
    Merged,
    /// Checked without merging; the file can be read
    Readable,
    /// The file does not exist; nothing was written
    NotFound,
    /// The file exists but could not be read; nothing was written
    Unreadable { error: String },
}

impl EntryStatus {
    pub fn is_merged(&self) -> bool {
        matches!(self, EntryStatus::Merged)
    }

    /// True for entries that could not be read
    pub fn is_skipped(&self) -> bool {
        matches!(self, EntryStatus::NotFound | EntryStatus::Unreadable { .. })
    }
}

/// Outcome for a single manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOutcome {
    /// Position in the manifest (0-based)
    pub index: usize,

    /// Entry text as listed in the manifest
    pub path: String,

    #[serde(flatten)]
    pub status: EntryStatus,

    /// Content lines copied into the output
    pub lines_kept: usize,

    /// Directive lines dropped
    pub directives_removed: usize,
}

impl EntryOutcome {
    pub fn merged(index: usize, path: &str, lines_kept: usize, directives_removed: usize) -> Self {
        Self {
            index,
            path: path.to_string(),
            status: EntryStatus::Merged,
            lines_kept,
            directives_removed,
        }
    }

    pub fn readable(index: usize, path: &str, lines_kept: usize, directives_removed: usize) -> Self {
        Self {
            index,
            path: path.to_string(),
            status: EntryStatus::Readable,
            lines_kept,
            directives_removed,
        }
    }

    pub fn skipped(index: usize, path: &str, status: EntryStatus) -> Self {
        Self {
            index,
            path: path.to_string(),
            status,
            lines_kept: 0,
            directives_removed: 0,
        }
    }
}

/// Summary of one merge run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeReport {
    pub schema_version: u32,

    pub schema_id: String,

    /// When the report was created
    pub created_at: DateTime<Utc>,

    pub manifest_path: String,

    pub output_path: String,

    /// Per-entry outcomes in manifest order
    pub entries: Vec<EntryOutcome>,

    pub entries_merged: usize,

    pub entries_skipped: usize,

    /// Content lines written across all entries
    pub lines_written: usize,

    pub directives_removed: usize,

    /// Bytes written to the output, headers included
    pub bytes_written: u64,

    /// Human-readable summary
    pub human_summary: String,
}

impl MergeReport {
    /// Aggregate entry outcomes into a report
    pub fn from_outcomes(
        manifest_path: &Path,
        output_path: &Path,
        entries: Vec<EntryOutcome>,
        bytes_written: u64,
    ) -> Self {
        let entries_merged = entries.iter().filter(|e| e.status.is_merged()).count();
        let entries_skipped = entries.len() - entries_merged;
        let lines_written = entries.iter().map(|e| e.lines_kept).sum();
        let directives_removed = entries.iter().map(|e| e.directives_removed).sum();

        let human_summary = Self::generate_human_summary(entries.len(), entries_merged, entries_skipped);

        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            schema_id: REPORT_SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            manifest_path: manifest_path.to_string_lossy().to_string(),
            output_path: output_path.to_string_lossy().to_string(),
            entries,
            entries_merged,
            entries_skipped,
            lines_written,
            directives_removed,
            bytes_written,
            human_summary,
        }
    }

    fn generate_human_summary(total: usize, merged: usize, skipped: usize) -> String {
        if total == 0 {
            return "Manifest is empty, nothing merged".to_string();
        }
        let noun = if total == 1 { "file" } else { "files" };
        if skipped == 0 {
            format!("Merged {} of {} {}", merged, total, noun)
        } else {
            format!("Merged {} of {} {} ({} skipped)", merged, total, noun, skipped)
        }
    }

    /// Entries that were skipped
    pub fn skipped(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries.iter().filter(|e| e.status.is_skipped())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(entries: Vec<EntryOutcome>) -> MergeReport {
        MergeReport::from_outcomes(Path::new("Files.txt"), Path::new("newMain.cpp"), entries, 0)
    }

    #[test]
    fn test_empty_report() {
        let report = report(Vec::new());
        assert_eq!(report.entries_merged, 0);
        assert_eq!(report.entries_skipped, 0);
        assert_eq!(report.human_summary, "Manifest is empty, nothing merged");
    }

    #[test]
    fn test_counts_aggregate() {
        let report = report(vec![
            EntryOutcome::merged(0, "a.h", 3, 1),
            EntryOutcome::skipped(1, "b.h", EntryStatus::NotFound),
            EntryOutcome::merged(2, "a.cpp", 10, 2),
        ]);

        assert_eq!(report.entries_merged, 2);
        assert_eq!(report.entries_skipped, 1);
        assert_eq!(report.lines_written, 13);
        assert_eq!(report.directives_removed, 3);
        assert_eq!(report.human_summary, "Merged 2 of 3 files (1 skipped)");
        assert_eq!(report.skipped().map(|e| e.path.as_str()).collect::<Vec<_>>(), vec!["b.h"]);
    }

    #[test]
    fn test_single_file_summary() {
        let report = report(vec![EntryOutcome::merged(0, "a.h", 1, 0)]);
        assert_eq!(report.human_summary, "Merged 1 of 1 file");
    }

    #[test]
    fn test_status_serialization() {
        let outcome = EntryOutcome::skipped(
            4,
            "Rgb.h",
            EntryStatus::Unreadable {
                error: "Is a directory".to_string(),
            },
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "unreadable");
        assert_eq!(json["error"], "Is a directory");
        assert_eq!(json["index"], 4);

        let json = serde_json::to_value(EntryOutcome::skipped(0, "x", EntryStatus::NotFound)).unwrap();
        assert_eq!(json["status"], "not_found");

        let json = serde_json::to_value(EntryOutcome::readable(1, "y", 2, 0)).unwrap();
        assert_eq!(json["status"], "readable");
        assert!(!EntryStatus::Readable.is_skipped());
        assert!(!EntryStatus::Readable.is_merged());
    }

    #[test]
    fn test_report_json_schema_fields() {
        let json = report(Vec::new()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["schema_id"], REPORT_SCHEMA_ID);
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["output_path"], "newMain.cpp");
    }
}

//! Source merging
//!
//! Concatenates the files listed in a manifest into a single output file.
//! Each merged file is preceded by a `//<name>` header, and local include
//! and pragma-once lines are dropped on the way through.
//!
//! A listed file that is missing or unreadable is reported and skipped
//! whole; only a missing manifest or an unwritable output ends the run.

mod report;

pub use report::{EntryOutcome, EntryStatus, MergeReport, REPORT_SCHEMA_ID, REPORT_SCHEMA_VERSION};

use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use amalgam_filter::filter_source;

use crate::config::MergeConfig;
use crate::manifest::{Manifest, ManifestError};

/// Errors that end a merge run
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Cannot write output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Write error: {0}")]
    Write(#[from] io::Error),
}

/// Header written before each merged file: three blank lines then `//<name>`.
pub fn header_marker(name: &str) -> String {
    format!("\n\n\n//{}\n", name)
}

/// Read a listed source file in full.
///
/// Failures are mapped to the skip status recorded for the entry.
pub fn read_source(path: &str) -> Result<String, EntryStatus> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => EntryStatus::NotFound,
        _ => EntryStatus::Unreadable { error: e.to_string() },
    })?;

    String::from_utf8(bytes).map_err(|e| EntryStatus::Unreadable {
        error: format!("invalid UTF-8: {}", e.utf8_error()),
    })
}

/// Merges the files of one manifest into one output
#[derive(Debug, Clone)]
pub struct Merger {
    config: MergeConfig,
}

impl Merger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Run the merge: load the manifest, truncate the output, merge every
    /// entry in order and flush.
    pub fn run(&self) -> Result<MergeReport, MergeError> {
        let manifest_path = &self.config.manifest_path;
        let output_path = &self.config.output_path;

        let manifest = Manifest::load(manifest_path)?;
        tracing::info!(
            "Merging {} manifest entries from {} into {}",
            manifest.len(),
            manifest_path.display(),
            output_path.display()
        );

        let output_err = |source: io::Error| MergeError::Output {
            path: output_path.clone(),
            source,
        };

        let file = File::create(output_path).map_err(output_err)?;
        let mut writer = BufWriter::new(file);

        let report = match self.merge_manifest(&manifest, &mut writer) {
            Err(MergeError::Write(source)) => return Err(output_err(source)),
            other => other?,
        };
        writer.flush().map_err(output_err)?;

        tracing::info!("{}", report.human_summary);
        Ok(report)
    }

    /// Merge every manifest entry into `out`, in order.
    ///
    /// Missing or unreadable entries are logged and skipped without writing
    /// anything for them.
    pub fn merge_manifest<W: Write>(&self, manifest: &Manifest, out: &mut W) -> Result<MergeReport, MergeError> {
        let mut outcomes = Vec::with_capacity(manifest.len());
        let mut bytes_written = 0u64;

        for (index, name) in manifest.iter().enumerate() {
            let source = match read_source(name) {
                Ok(source) => source,
                Err(status) => {
                    match &status {
                        EntryStatus::NotFound => tracing::warn!("File {} not found, skipping", name),
                        EntryStatus::Unreadable { error } => {
                            tracing::warn!("Error processing file {}: {}", name, error)
                        }
                        EntryStatus::Merged | EntryStatus::Readable => {}
                    }
                    outcomes.push(EntryOutcome::skipped(index, name, status));
                    continue;
                }
            };

            let filtered = filter_source(source.as_bytes());
            let header = header_marker(name);

            out.write_all(header.as_bytes())?;
            out.write_all(&filtered.content)?;
            bytes_written += (header.len() + filtered.content.len()) as u64;

            tracing::debug!(
                "Merged {}: {} lines kept, {} directives removed",
                name,
                filtered.lines_kept,
                filtered.directives_removed()
            );
            outcomes.push(EntryOutcome::merged(
                index,
                name,
                filtered.lines_kept,
                filtered.directives_removed(),
            ));
        }

        Ok(MergeReport::from_outcomes(
            &self.config.manifest_path,
            &self.config.output_path,
            outcomes,
            bytes_written,
        ))
    }

    /// Check that every manifest entry can be read, without writing output.
    pub fn verify(&self) -> Result<Vec<EntryOutcome>, MergeError> {
        let manifest = Manifest::load(&self.config.manifest_path)?;

        Ok(manifest
            .iter()
            .enumerate()
            .map(|(index, name)| match read_source(name) {
                Ok(source) => {
                    let filtered = filter_source(source.as_bytes());
                    EntryOutcome::readable(index, name, filtered.lines_kept, filtered.directives_removed())
                }
                Err(status) => EntryOutcome::skipped(index, name, status),
            })
            .collect())
    }
}

/// Merge the files listed in `manifest_path` into `output_path`.
pub fn merge(manifest_path: &Path, output_path: &Path) -> Result<MergeReport, MergeError> {
    Merger::new(MergeConfig {
        manifest_path: manifest_path.to_path_buf(),
        output_path: output_path.to_path_buf(),
    })
    .run()
}

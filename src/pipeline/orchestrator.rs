//! Pipeline orchestration
//!
//! Coordinates discovery, catalog matching, tag merging and the failure
//! report. Files are handled one at a time in listing order; a failure on
//! one file is recorded and the batch moves on.

use crate::catalog::{Catalog, SpotifyCatalog};
use crate::config::Settings;
use crate::discovery::{self, DiscoveredFile};
use crate::error::{Result, SpotitagError};
use crate::export;
use crate::matcher::{CatalogMatcher, MatchOutcome};
use crate::tags::{self, TagContainer};
use crate::types::{NonProcessedEntry, NonProcessedReason};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Batch result summary
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Taggable files found
    pub total_files: usize,
    /// Files whose tags were updated
    pub tagged: usize,
    /// Files skipped for their extension
    pub unsupported: usize,
    /// Files recorded in the failure report, in processing order
    pub non_processed: Vec<NonProcessedEntry>,
    /// Report written this run, if any file failed
    pub report_path: Option<PathBuf>,
}

/// Run the batch against the Spotify catalog
pub fn run(settings: &Settings) -> Result<BatchResult> {
    let catalog = SpotifyCatalog::new(settings.credentials.clone())?;
    run_with_catalog(settings, &catalog)
}

/// Run the batch against any catalog
pub fn run_with_catalog(settings: &Settings, catalog: &dyn Catalog) -> Result<BatchResult> {
    let batch_start = Instant::now();

    info!("Scanning {} for tracks...", settings.input.display());
    let scan = discovery::scan(&settings.input, settings.recursive)?;

    let mut result = BatchResult {
        total_files: scan.files.len(),
        unsupported: scan.unsupported.len(),
        ..Default::default()
    };

    if scan.files.is_empty() {
        info!("Nothing to tag");
        return Ok(result);
    }

    let matcher = CatalogMatcher::new(catalog);
    let pb = progress_bar(scan.files.len(), settings.show_progress);

    for file in &scan.files {
        pb.set_message(display_name(file));

        match process_file(file, &matcher) {
            Ok(()) => {
                result.tagged += 1;
            }
            Err(FileFailure::Skipped(reason)) => {
                result.non_processed.push(NonProcessedEntry {
                    path: file.path.clone(),
                    reason,
                });
            }
            Err(FileFailure::Fatal(e)) => {
                pb.abandon_with_message("Aborted");
                error!("Aborting batch at {}: {}", file.path.display(), e);
                return Err(e);
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Tagging complete");

    if !result.non_processed.is_empty() {
        export::write_report(&result.non_processed, &settings.report_path)?;
        result.report_path = Some(settings.report_path.clone());
    }

    info!(
        "Tagged {} of {} files in {:.2}s ({} not processed)",
        result.tagged,
        result.total_files,
        batch_start.elapsed().as_secs_f64(),
        result.non_processed.len()
    );

    Ok(result)
}

/// How a single file failed
enum FileFailure {
    /// Record the file and continue
    Skipped(NonProcessedReason),
    /// Stop the batch
    Fatal(SpotitagError),
}

impl From<SpotitagError> for FileFailure {
    fn from(e: SpotitagError) -> Self {
        match e.non_processed_reason() {
            Some(reason) => {
                warn!("{}", e);
                FileFailure::Skipped(reason)
            }
            None => FileFailure::Fatal(e),
        }
    }
}

/// Look one file up in the catalog and merge the result into its tags
fn process_file(
    file: &DiscoveredFile,
    matcher: &CatalogMatcher<'_>,
) -> std::result::Result<(), FileFailure> {
    debug!("Processing {}", file.path.display());

    let mut container = open_for_tagging(file)?;

    let local = tags::read_local_track(container.as_ref());
    let query = tags::require_query(&local)?;

    let record = match matcher.match_track(&query)? {
        MatchOutcome::Matched(record) => record,
        MatchOutcome::NoMatch(failure) => {
            warn!(
                "No catalog match for \"{}\" ({}): {:?}",
                query.search_text(),
                file.path.display(),
                failure
            );
            return Err(FileFailure::Skipped(NonProcessedReason::NoCatalogMatch));
        }
    };

    let payload = export::build_payload(&record);
    tags::merge_payload(container.as_mut(), &payload);
    container.save()?;

    info!(
        "Tagged {} as \"{}\" ({})",
        file.path.display(),
        record.track_name,
        record.harmonic_key
    );

    Ok(())
}

/// Open a file's tags; unreadable files count as having no local tags
fn open_for_tagging(
    file: &DiscoveredFile,
) -> std::result::Result<Box<dyn TagContainer>, FileFailure> {
    match tags::open_container(&file.path) {
        Ok(container) => Ok(container),
        Err(SpotitagError::TagError { reason, .. }) => {
            warn!("Failed to read tags from {}: {}", file.path.display(), reason);
            Err(FileFailure::Skipped(NonProcessedReason::LocalTagMissing))
        }
        Err(e) => Err(e.into()),
    }
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

fn display_name(file: &DiscoveredFile) -> String {
    file.path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

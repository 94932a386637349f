//! Failure report listing files that could not be processed

use crate::error::{Result, SpotitagError};
use crate::types::NonProcessedEntry;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Render report lines as `"{index}) {path}"`, 1-based, in registry order
pub fn format_report(entries: &[NonProcessedEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}) {}\n", i + 1, entry.path.display()))
        .collect()
}

/// Write the failure report
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
pub fn write_report(entries: &[NonProcessedEntry], output_path: &Path) -> Result<()> {
    let temp_path = output_path.with_extension("txt.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| SpotitagError::output_error(output_path, e))?;

    let mut writer = BufWriter::new(file);
    let write_result = writer
        .write_all(format_report(entries).as_bytes())
        .and_then(|_| writer.flush());

    if let Err(e) = write_result {
        let _ = std::fs::remove_file(&temp_path);
        return Err(SpotitagError::output_error(output_path, e));
    }
    drop(writer);

    std::fs::rename(&temp_path, output_path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        SpotitagError::OutputError {
            path: output_path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })?;

    info!(
        "The {} files that could not be processed are listed in {}",
        entries.len(),
        output_path.display()
    );

    Ok(())
}

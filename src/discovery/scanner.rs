//! File discovery and scanning

use crate::error::{Result, SpotitagError};
use crate::types::AudioFormat;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Discovered audio file with a supported tag container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub format: AudioFormat,
}

/// Outcome of scanning an input path
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Files to process, in directory-listing order (sorted by name)
    pub files: Vec<DiscoveredFile>,
    /// Regular files skipped for their extension; never reported as failures
    pub unsupported: Vec<PathBuf>,
}

/// Scan a path (file or directory) for taggable audio files
///
/// Directories are listed one level deep unless `recursive` is set. A
/// listing error aborts the scan rather than silently dropping entries.
pub fn scan(input: &Path, recursive: bool) -> Result<ScanResult> {
    if !input.exists() {
        return Err(SpotitagError::FileNotFound(input.to_path_buf()));
    }

    let mut result = ScanResult::default();

    if input.is_file() {
        classify(input, &mut result);
    } else {
        let walker = WalkDir::new(input).min_depth(1).sort_by_file_name();
        let walker = if recursive { walker } else { walker.max_depth(1) };

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() {
                classify(entry.path(), &mut result);
            } else if !entry.file_type().is_dir() {
                debug!("Skipping non-regular entry: {}", entry.path().display());
            }
        }
    }

    info!(
        "Discovered {} taggable files ({} skipped)",
        result.files.len(),
        result.unsupported.len()
    );

    if result.files.is_empty() {
        warn!("No MP3 or FLAC files found in {}", input.display());
    }

    Ok(result)
}

/// Sort a regular file into the taggable or skipped list
fn classify(path: &Path, result: &mut ScanResult) {
    match AudioFormat::from_path(path) {
        Some(format) => {
            debug!("Discovered: {}", path.display());
            result.files.push(DiscoveredFile {
                path: path.to_path_buf(),
                format,
            });
        }
        None => {
            info!("Not an MP3 or FLAC file, skipping: {}", path.display());
            result.unsupported.push(path.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.flac"), b"").unwrap();
        fs::write(dir.path().join("a.MP3"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let result = scan(dir.path(), false).unwrap();

        let names: Vec<_> = result
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.MP3", "b.flac"]);
        assert_eq!(result.files[0].format, AudioFormat::Mp3);
        assert_eq!(result.unsupported, vec![dir.path().join("notes.txt")]);
    }

    #[test]
    fn test_scan_is_flat_unless_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("album");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("deep.mp3"), b"").unwrap();
        fs::write(dir.path().join("top.mp3"), b"").unwrap();

        assert_eq!(scan(dir.path(), false).unwrap().files.len(), 1);
        assert_eq!(scan(dir.path(), true).unwrap().files.len(), 2);
    }

    #[test]
    fn test_scan_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.flac");
        fs::write(&file, b"").unwrap();

        let result = scan(&file, false).unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].path, file);
    }

    #[test]
    fn test_scan_missing_path() {
        let err = scan(Path::new("/definitely/not/here"), false).unwrap_err();
        assert!(matches!(err, SpotitagError::FileNotFound(_)));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = scan(dir.path(), false).unwrap();
        assert!(result.files.is_empty());
        assert!(result.unsupported.is_empty());
    }
}

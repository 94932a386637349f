//! CLI argument parsing and configuration

use clap::Parser;
use std::path::PathBuf;

/// spotitag - catalog metadata and Camelot keys for your DJ library
///
/// Looks up every MP3/FLAC file in a folder on Spotify using its embedded
/// title and artist, then writes the catalog title, artist genres, audio
/// features and Camelot key back into the file's tags.
#[derive(Parser, Debug)]
#[command(name = "spotitag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Folder containing the tracks (prompted for when omitted)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Spotify API client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Spotify API client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Where to list files that could not be processed
    #[arg(long, value_name = "FILE", default_value = "error.txt")]
    pub report: PathBuf,

    /// Run log file (truncated on every run)
    #[arg(long, value_name = "FILE", default_value = "runtime.log")]
    pub log_file: PathBuf,

    /// Scan subdirectories recursively
    #[arg(short, long, default_value = "false")]
    pub recursive: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress progress bar)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the console log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["spotitag", "-i", "/music"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("/music")));
        assert_eq!(cli.report, PathBuf::from("error.txt"));
        assert_eq!(cli.log_file, PathBuf::from("runtime.log"));
        assert!(!cli.recursive);
        assert_eq!(cli.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_input_is_optional() {
        let cli = Cli::try_parse_from(["spotitag", "-vv"]).unwrap();
        assert!(cli.input.is_none());
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let cli = Cli::try_parse_from(["spotitag", "-v", "-q"]).unwrap();
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
    }
}

//! Runtime configuration settings

use crate::error::{Result, SpotitagError};
use std::fmt;
use std::path::PathBuf;

/// Catalog API credentials
///
/// Supplied through flags or the environment, never compiled in.
#[derive(Clone, Default)]
pub struct CatalogCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl CatalogCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Check both values are present
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(SpotitagError::ConfigError(
                "missing Spotify client id (set SPOTIFY_CLIENT_ID or pass --client-id)".to_string(),
            ));
        }
        if self.client_secret.trim().is_empty() {
            return Err(SpotitagError::ConfigError(
                "missing Spotify client secret (set SPOTIFY_CLIENT_SECRET or pass --client-secret)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for CatalogCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Runtime settings for the tagging pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Input path (folder or single file)
    pub input: PathBuf,
    /// Catalog credentials
    pub credentials: CatalogCredentials,
    /// Failure report path, only written when something failed
    pub report_path: PathBuf,
    /// Scan recursively
    pub recursive: bool,
    /// Show progress bar
    pub show_progress: bool,
}

impl Settings {
    /// Create settings from CLI arguments and the resolved input folder
    pub fn from_cli(cli: &super::cli::Cli, input: PathBuf) -> Result<Self> {
        let credentials = CatalogCredentials::new(
            cli.client_id.clone().unwrap_or_default(),
            cli.client_secret.clone().unwrap_or_default(),
        );
        credentials.validate()?;

        Ok(Self {
            input,
            credentials,
            report_path: cli.report.clone(),
            recursive: cli.recursive,
            show_progress: !cli.quiet,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            credentials: CatalogCredentials::default(),
            report_path: PathBuf::from("error.txt"),
            recursive: false,
            show_progress: true,
        }
    }
}

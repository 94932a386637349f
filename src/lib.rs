//! spotitag - Spotify metadata and Camelot keys for local audio files
//!
//! A command-line utility that walks a folder of MP3 and FLAC files, looks
//! each one up in the Spotify catalog by its embedded title and artist, and
//! writes the catalog title, artist genres, audio features and a Camelot
//! harmonic key back into the file's tags.
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `discovery`: Folder scanning and extension filtering
//! - `catalog`: Catalog client abstraction and the Spotify Web API client
//! - `matcher`: Search, id fallback and record enrichment
//! - `key`: Pitch class / mode to Camelot mapping
//! - `export`: Comment block serialization and the failure report
//! - `tags`: ID3v2 and Vorbis comment containers with merge semantics
//! - `pipeline`: Batch orchestration
//!
//! # Example
//!
//! ```no_run
//! use spotitag::{config::Settings, pipeline};
//!
//! let settings = Settings::default();
//! let result = pipeline::run(&settings).expect("Tagging failed");
//! println!("Tagged {} tracks", result.tagged);
//! ```

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod key;
pub mod matcher;
pub mod pipeline;
pub mod tags;
pub mod types;

// Re-export key types at crate root
pub use error::{Result, SpotitagError};
pub use types::{CamelotKey, CatalogRecord, LocalTrack, NonProcessedEntry, TagPayload};

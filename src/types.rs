//! Core data types for spotitag
//!
//! These types represent the domain model and flow through the pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Musical primitives
// =============================================================================

/// The 12 pitch classes in Western music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    Cs, // C#/Db
    D,
    Ds, // D#/Eb
    E,
    F,
    Fs, // F#/Gb
    G,
    Gs, // G#/Ab
    A,
    As, // A#/Bb
    B,
}

impl PitchClass {
    /// Convert from the catalog's numeric pitch class (0 = C, 1 = C#, ..., 11 = B)
    ///
    /// Out-of-range values (including the catalog's `-1` for "no key
    /// detected") return `None` instead of wrapping.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(PitchClass::C),
            1 => Some(PitchClass::Cs),
            2 => Some(PitchClass::D),
            3 => Some(PitchClass::Ds),
            4 => Some(PitchClass::E),
            5 => Some(PitchClass::F),
            6 => Some(PitchClass::Fs),
            7 => Some(PitchClass::G),
            8 => Some(PitchClass::Gs),
            9 => Some(PitchClass::A),
            10 => Some(PitchClass::As),
            11 => Some(PitchClass::B),
            _ => None,
        }
    }
}

/// Major or Minor scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Convert from the catalog's modality flag (0 = minor, 1 = major)
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Mode::Minor),
            1 => Some(Mode::Major),
            _ => None,
        }
    }
}

/// A Camelot wheel label ("1A" - "12B")
///
/// Only constructed through the key mapping table, so the inner label is
/// always one of the 24 valid codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CamelotKey(pub(crate) &'static str);

impl CamelotKey {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// =============================================================================
// Catalog data
// =============================================================================

/// A single numeric audio feature as reported by the catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
}

impl FeatureValue {
    /// Extract a numeric value from a JSON field, ignoring strings and nulls
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        if let Some(i) = value.as_i64() {
            Some(FeatureValue::Int(i))
        } else {
            value.as_f64().map(FeatureValue::Float)
        }
    }

    /// Integer view, used for the raw `key` and `mode` fields
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            FeatureValue::Int(i) => Some(i),
            FeatureValue::Float(f) if f.fract() == 0.0 => Some(f as i64),
            FeatureValue::Float(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(i) => write!(f, "{}", i),
            FeatureValue::Float(x) => f.write_str(&render_float(*x)),
        }
    }
}

/// Render a float the way earlier comment blocks wrote it: shortest
/// round-trip digits, whole numbers keep `.0`, and exponents carry a sign and
/// at least two digits (`1.2e-05`, `1e+16`)
fn render_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    // Debug switches to exponent form below 1e-4 and from 1e16 up
    let debug = format!("{:?}", x);
    match debug.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => debug,
    }
}

/// Audio features keyed by their catalog-defined names
pub type FeatureMap = BTreeMap<String, FeatureValue>;

/// Search input built from a file's embedded tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub title: String,
    pub artist: String,
}

impl CatalogQuery {
    /// Free-text search string sent to the catalog
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.artist)
    }
}

/// Everything learned about a track from the catalog, ready to serialize
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    pub track_id: String,
    pub track_name: String,
    pub popularity: u32,
    pub genres: Vec<String>,
    /// Numeric features, without the raw pitch class (replaced by `harmonic_key`)
    pub audio_features: FeatureMap,
    pub harmonic_key: CamelotKey,
}

/// Values merged into a file's tag container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPayload {
    pub title: String,
    /// Genres joined with "; "
    pub genre: String,
    /// Appended to the existing comment, never replacing it
    pub comment_block: String,
}

// =============================================================================
// Track representation
// =============================================================================

/// Tags already embedded in a local file
#[derive(Debug, Clone)]
pub struct LocalTrack {
    pub path: PathBuf,
    pub format: AudioFormat,
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl LocalTrack {
    /// Build a catalog query, or `None` when title or artist is missing
    pub fn query(&self) -> Option<CatalogQuery> {
        let title = non_empty(self.title.as_deref())?;
        let artist = non_empty(self.artist.as_deref())?;
        Some(CatalogQuery {
            title: title.to_string(),
            artist: artist.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Batch bookkeeping
// =============================================================================

/// Why a file was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonProcessedReason {
    /// No embedded title or artist
    LocalTagMissing,
    /// Neither the search nor the id fallback found the track
    NoCatalogMatch,
    /// Catalog reported a key or mode outside the valid range
    InvalidKeyData,
    /// Catalog has no audio analysis for the track
    MissingAudioFeatures,
    /// A catalog request failed
    CatalogFailure,
    /// Tags could not be read back or saved
    TagWriteFailure,
}

impl NonProcessedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NonProcessedReason::LocalTagMissing => "LocalTagMissing",
            NonProcessedReason::NoCatalogMatch => "NoCatalogMatch",
            NonProcessedReason::InvalidKeyData => "InvalidKeyData",
            NonProcessedReason::MissingAudioFeatures => "MissingAudioFeatures",
            NonProcessedReason::CatalogFailure => "CatalogFailure",
            NonProcessedReason::TagWriteFailure => "TagWriteFailure",
        }
    }
}

impl fmt::Display for NonProcessedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file recorded for the failure report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonProcessedEntry {
    pub path: PathBuf,
    pub reason: NonProcessedReason,
}

// =============================================================================
// Supported formats
// =============================================================================

/// Tag container formats supported by spotitag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// MP3 with an ID3v2 tag
    Mp3,
    /// FLAC with Vorbis comments
    Flac,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

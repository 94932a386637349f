//! Camelot Wheel notation mapping
//!
//! The Camelot Wheel is a visual representation of musical keys that
//! makes harmonic mixing intuitive for DJs.
//!
//! - Numbers 1-12 represent positions on the wheel
//! - 'A' suffix = minor key, 'B' suffix = major key
//! - Adjacent numbers are harmonically compatible (perfect fifth)
//! - Same number, different letter = relative major/minor

use crate::error::{Result, SpotitagError};
use crate::types::{CamelotKey, Mode, PitchClass};

/// Mapping from (PitchClass, Mode) to Camelot notation
///
/// Layout:
/// ```text
///      5A      5B
///    /    \  /    \
///  4A      4B      6B
///  |       |       |
///  3A      3B      7B
///    \    /  \    /
///      2A      8B
///       ...
/// ```
pub fn to_camelot(pitch: PitchClass, mode: Mode) -> CamelotKey {
    let code = match (pitch, mode) {
        // Minor keys (A)
        (PitchClass::A, Mode::Minor) => "8A",   // Am
        (PitchClass::As, Mode::Minor) => "3A",  // A#m / Bbm
        (PitchClass::B, Mode::Minor) => "10A",  // Bm
        (PitchClass::C, Mode::Minor) => "5A",   // Cm
        (PitchClass::Cs, Mode::Minor) => "12A", // C#m / Dbm
        (PitchClass::D, Mode::Minor) => "7A",   // Dm
        (PitchClass::Ds, Mode::Minor) => "2A",  // D#m / Ebm
        (PitchClass::E, Mode::Minor) => "9A",   // Em
        (PitchClass::F, Mode::Minor) => "4A",   // Fm
        (PitchClass::Fs, Mode::Minor) => "11A", // F#m / Gbm
        (PitchClass::G, Mode::Minor) => "6A",   // Gm
        (PitchClass::Gs, Mode::Minor) => "1A",  // G#m / Abm

        // Major keys (B)
        (PitchClass::A, Mode::Major) => "11B",  // A
        (PitchClass::As, Mode::Major) => "6B",  // A# / Bb
        (PitchClass::B, Mode::Major) => "1B",   // B
        (PitchClass::C, Mode::Major) => "8B",   // C
        (PitchClass::Cs, Mode::Major) => "3B",  // C# / Db
        (PitchClass::D, Mode::Major) => "10B",  // D
        (PitchClass::Ds, Mode::Major) => "5B",  // D# / Eb
        (PitchClass::E, Mode::Major) => "12B",  // E
        (PitchClass::F, Mode::Major) => "7B",   // F
        (PitchClass::Fs, Mode::Major) => "2B",  // F# / Gb
        (PitchClass::G, Mode::Major) => "9B",   // G
        (PitchClass::Gs, Mode::Major) => "4B",  // G# / Ab
    };
    CamelotKey(code)
}

/// Map the catalog's raw pitch class (0-11) and mode (0 = minor, 1 = major)
/// to a Camelot label
///
/// Anything outside those ranges, including the catalog's `-1` for
/// "no key detected", is rejected with `InvalidKeyData`.
pub fn harmonic_key(pitch_class: i64, mode: i64) -> Result<CamelotKey> {
    let invalid = || SpotitagError::InvalidKeyData { pitch_class, mode };

    let pitch = PitchClass::from_index(pitch_class).ok_or_else(invalid)?;
    let mode = Mode::from_raw(mode).ok_or_else(invalid)?;

    Ok(to_camelot(pitch, mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelot_mapping_is_bijection() {
        // All 24 (pitch class, mode) pairs map to distinct labels
        let mut codes = std::collections::HashSet::new();

        for pitch_class in 0..12 {
            for mode in [0, 1] {
                let code = harmonic_key(pitch_class, mode).unwrap();
                let suffix = if mode == 0 { 'A' } else { 'B' };
                assert!(code.as_str().ends_with(suffix), "{} for mode {}", code, mode);
                assert!(codes.insert(code.as_str()), "Duplicate code: {}", code);
            }
        }

        assert_eq!(codes.len(), 24);
        for n in 1..=12 {
            assert!(codes.contains(format!("{}A", n).as_str()));
            assert!(codes.contains(format!("{}B", n).as_str()));
        }
    }

    #[test]
    fn test_camelot_examples() {
        // Common DJ reference points
        assert_eq!(to_camelot(PitchClass::A, Mode::Minor).as_str(), "8A");
        assert_eq!(to_camelot(PitchClass::C, Mode::Major).as_str(), "8B");
        assert_eq!(to_camelot(PitchClass::G, Mode::Minor).as_str(), "6A");
    }

    #[test]
    fn test_raw_tables() {
        let minor = ["5A", "12A", "7A", "2A", "9A", "4A", "11A", "6A", "1A", "8A", "3A", "10A"];
        let major = ["8B", "3B", "10B", "5B", "12B", "7B", "2B", "9B", "4B", "11B", "6B", "1B"];

        for (pc, expected) in minor.iter().enumerate() {
            assert_eq!(harmonic_key(pc as i64, 0).unwrap().as_str(), *expected);
        }
        for (pc, expected) in major.iter().enumerate() {
            assert_eq!(harmonic_key(pc as i64, 1).unwrap().as_str(), *expected);
        }
    }

    #[test]
    fn test_invalid_key_data() {
        for (pc, mode) in [(-1, 0), (12, 1), (3, 2), (3, -1)] {
            match harmonic_key(pc, mode) {
                Err(SpotitagError::InvalidKeyData { pitch_class, mode: m }) => {
                    assert_eq!((pitch_class, m), (pc, mode));
                }
                other => panic!("expected InvalidKeyData for ({}, {}), got {:?}", pc, mode, other),
            }
        }
    }
}

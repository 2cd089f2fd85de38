// Copyright (c) 2024 Mike Tsao

//! Music Macro Language (MML), a compact text notation for monophonic note
//! sequences.
//!
//! A typical line looks like `l8 o4 cde4 <b>c2`: `l` sets the default note
//! length, `o` sets the octave, letters are notes (with `+` for sharp),
//! numbers after a note override its length, `.` dots it, `r` is a rest, and
//! `<`/`>` move down/up an octave. Whitespace is ignored, so the encoder uses
//! spaces as bar separators.
//!
//! [decode()] turns text into a [QuantizedSequence](crate::QuantizedSequence)
//! and [encode()] turns it back. Text is only ever a projection of a sequence,
//! so the round trip preserves notes rather than characters.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{decode, encode, MmlError};
}

pub use decode::{decode, parse, MmlEvent};
pub use encode::encode;

use thiserror::Error;

mod decode;
mod encode;

/// Pitch-class spellings, indexed by `pitch % 12`. Sharps are spelled with
/// `+`.
pub const NOTE_NAMES: [&str; 12] = [
    "c", "c+", "d", "d+", "e", "f", "f+", "g", "g+", "a", "a+", "b",
];

/// MML length codes indexed by duration in steps (0..=16). Durations between
/// two plain or dotted values round down to the shorter one.
pub const DURATION_CODES: [&str; 17] = [
    "", "16", "8", "8.", "4", "4", "4.", "4.", "2", "2", "2", "2", "2.", "2.", "2.", "2.", "1",
];

/// The lowest and highest octaves the encoder will write.
pub const OCTAVE_RANGE: core::ops::RangeInclusive<u8> = 1..=8;

/// Things that can go wrong while reading MML text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MmlError {
    /// A character that doesn't begin any command.
    #[error("unexpected '{character}' at position {position}")]
    UnexpectedCharacter {
        #[allow(missing_docs)]
        character: char,
        #[allow(missing_docs)]
        position: usize,
    },
    /// A command that requires a number didn't get one.
    #[error("'{command}' at position {position} needs a number")]
    MissingNumber {
        #[allow(missing_docs)]
        command: char,
        #[allow(missing_docs)]
        position: usize,
    },
    /// A number too large to mean anything.
    #[error("number at position {position} is too large")]
    NumberTooLarge {
        #[allow(missing_docs)]
        position: usize,
    },
    /// Lengths are note-value denominators, so zero is meaningless.
    #[error("length at position {position} is zero")]
    ZeroLength {
        #[allow(missing_docs)]
        position: usize,
    },
    /// A tempo of zero would never advance time.
    #[error("tempo at position {position} is zero")]
    ZeroTempo {
        #[allow(missing_docs)]
        position: usize,
    },
    /// An `o` command names an octave far above the MIDI range.
    #[error("octave {octave} at position {position} is out of range")]
    OctaveOutOfRange {
        #[allow(missing_docs)]
        octave: u32,
        #[allow(missing_docs)]
        position: usize,
    },
    /// The octave and note letter produce a pitch outside the MIDI range.
    #[error("note at position {position} has pitch {pitch}, outside 0..=127")]
    PitchOutOfRange {
        #[allow(missing_docs)]
        pitch: i64,
        #[allow(missing_docs)]
        position: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{Note, QuantizedSequence};

    fn sequence(notes: &[(u8, usize, usize)]) -> QuantizedSequence {
        QuantizedSequence::new_with(
            notes
                .iter()
                .map(|(pitch, start, end)| Note::new(*pitch, *start, *end))
                .collect(),
            0,
        )
        .unwrap()
    }

    #[test]
    fn round_trip_preserves_notes() {
        let originals = vec![
            sequence(&[(60, 0, 4), (62, 4, 8), (64, 8, 12), (65, 12, 16)]),
            sequence(&[(48, 0, 2), (55, 2, 4), (60, 6, 8), (67, 8, 14), (72, 16, 32)]),
            sequence(&[(69, 0, 3), (71, 3, 4), (72, 4, 6), (40, 12, 16), (84, 20, 21)]),
            sequence(&[(61, 4, 8), (63, 8, 12), (66, 16, 24), (70, 28, 30)]),
        ];
        for original in originals {
            let text = encode(&original);
            let decoded = decode(&text);
            assert_eq!(
                decoded.notes(),
                original.notes(),
                "round trip through '{text}' changed the notes"
            );
        }
    }

    #[test]
    fn round_trip_clamps_octaves() {
        // MIDI 12 is C0, below the lowest writable octave, so it comes back
        // as C1.
        let original = sequence(&[(12, 0, 4), (60, 4, 8)]);
        let decoded = decode(&encode(&original));
        assert_eq!(decoded.notes(), &[Note::new(24, 0, 4), Note::new(60, 4, 8)]);
    }

    #[test]
    fn tables_are_consistent() {
        assert_eq!(NOTE_NAMES.len(), 12);
        assert_eq!(DURATION_CODES[1], "16");
        assert_eq!(DURATION_CODES[3], "8.");
        assert_eq!(DURATION_CODES[16], "1");
    }
}

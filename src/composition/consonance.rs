// Copyright (c) 2024 Mike Tsao

//! Makes a secondary voice harmonize with a primary voice.
//!
//! Two simultaneous pitches are consonant if some small harmonic of one lands
//! within [CONSONANCE_TOLERANCE_HZ] of some small harmonic of the other. When
//! they aren't, the secondary pitch is nudged by the smallest number of
//! semitones that makes them consonant, or dropped if no nudge works.

use super::{Note, QuantizedSequence};
use crate::types::{FrequencyHz, ParameterType};
use core::ops::{Range, RangeInclusive};

/// How close, in Hz, two harmonics must be to count as the same frequency.
pub const CONSONANCE_TOLERANCE_HZ: ParameterType = 2.0;

/// Harmonic multiples examined on each side of the interval.
const HARMONICS: RangeInclusive<u8> = 1..=4;

/// Semitone adjustments tried on the secondary pitch, in search order.
const ADJUSTMENTS: Range<i8> = -3..3;

/// Per-voice state carried through the step scan: which note is next to end,
/// and which pitch (if any) is sounding right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct VoiceScan {
    cursor: usize,
    sounding: Option<u8>,
}
impl VoiceScan {
    /// Applies the events at `step`. A note ending here is processed before a
    /// note starting here, so back-to-back notes hand off cleanly.
    fn advance(self, notes: &[Note], step: usize) -> Self {
        let mut next = self;
        if notes.get(next.cursor).is_some_and(|n| n.end_step == step) {
            next.sounding = None;
            next.cursor += 1;
        }
        if let Some(note) = notes.get(next.cursor).filter(|n| n.start_step == step) {
            next.sounding = Some(note.pitch);
        }
        next
    }

    /// The note under the cursor was removed, so the following note is now
    /// under the cursor and nothing is sounding.
    fn silenced(self) -> Self {
        Self {
            cursor: self.cursor,
            sounding: None,
        }
    }
}

/// What to do with the secondary note at one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verdict {
    Consonant,
    Adjust(u8),
    Silence,
}

/// The best adjustment found so far for one step. A fresh search starts at
/// every step.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    pitch: u8,
    distance: u8,
}

fn judge(primary: u8, secondary: u8) -> Verdict {
    let primary_hz = FrequencyHz::from(primary);
    let secondary_hz = FrequencyHz::from(secondary);
    let mut best: Option<Candidate> = None;

    for i in HARMONICS {
        for j in HARMONICS {
            if primary_hz.harmonic_distance(i, &secondary_hz, j) < CONSONANCE_TOLERANCE_HZ {
                return Verdict::Consonant;
            }
            for k in ADJUSTMENTS {
                let distance = k.unsigned_abs();
                if best.is_some_and(|b| distance >= b.distance) {
                    continue;
                }
                let pitch = secondary as i16 + k as i16;
                if !(0..=Note::MAX_PITCH as i16).contains(&pitch) {
                    continue;
                }
                let candidate_hz = FrequencyHz::from_midi_key(pitch);
                if primary_hz.harmonic_distance(i, &candidate_hz, j) < CONSONANCE_TOLERANCE_HZ {
                    best = Some(Candidate {
                        pitch: pitch as u8,
                        distance,
                    });
                }
            }
        }
    }
    best.map_or(Verdict::Silence, |c| Verdict::Adjust(c.pitch))
}

/// Scans steps `0..step_count` and rewrites `secondary` wherever it sounds
/// against `primary` without being consonant. Returns the corrected secondary
/// voice; `primary` is only read.
///
/// The pass is greedy and causal. Each step is decided from the pitches
/// sounding at that step and nothing later, and earlier decisions are never
/// revisited. The secondary pitch used for judging is the one the note had
/// when it started, so a held note is judged from its original pitch at every
/// step even after an earlier step has rewritten it.
pub fn correct_discordance(
    primary: &QuantizedSequence,
    mut secondary: QuantizedSequence,
    step_count: usize,
) -> QuantizedSequence {
    let mut primary_scan = VoiceScan::default();
    let mut secondary_scan = VoiceScan::default();

    for step in 0..step_count {
        primary_scan = primary_scan.advance(primary.notes(), step);
        secondary_scan = secondary_scan.advance(secondary.notes(), step);
        let (Some(primary_pitch), Some(secondary_pitch)) =
            (primary_scan.sounding, secondary_scan.sounding)
        else {
            continue;
        };

        match judge(primary_pitch, secondary_pitch) {
            Verdict::Consonant => {}
            Verdict::Adjust(pitch) => {
                if let Some(note) = secondary.notes_mut().get_mut(secondary_scan.cursor) {
                    log::debug!(
                        "step {step}: {secondary_pitch} against {primary_pitch} becomes {pitch}"
                    );
                    note.pitch = pitch;
                }
            }
            Verdict::Silence => {
                if secondary_scan.cursor < secondary.notes().len() {
                    log::debug!("step {step}: dropping {secondary_pitch} against {primary_pitch}");
                    secondary.notes_mut().remove(secondary_scan.cursor);
                }
                secondary_scan = secondary_scan.silenced();
            }
        }
    }
    secondary
}

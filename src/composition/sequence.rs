// Copyright (c) 2024 Mike Tsao

use crate::types::{ParameterType, StepTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a [Note] can't join a [QuantizedSequence].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// The note's end isn't after its start.
    #[error("note ending at step {end_step} doesn't start before it ends (start {start_step})")]
    EmptyNote {
        #[allow(missing_docs)]
        start_step: usize,
        #[allow(missing_docs)]
        end_step: usize,
    },
    /// The note would sound at the same time as the preceding note.
    #[error("note at step {start_step} overlaps the previous note ending at {previous_end_step}")]
    Overlap {
        #[allow(missing_docs)]
        start_step: usize,
        #[allow(missing_docs)]
        previous_end_step: usize,
    },
    /// The pitch is outside the MIDI range.
    #[error("pitch {0} is outside the MIDI range 0..=127")]
    PitchOutOfRange(u8),
}

/// A single sounding event on the step grid. `start_step` is inclusive and
/// `end_step` is exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Note {
    /// The MIDI key code for the note. 60 is middle C.
    pub pitch: u8,
    #[allow(missing_docs)]
    pub start_step: usize,
    #[allow(missing_docs)]
    pub end_step: usize,
}
impl Note {
    /// The highest legal MIDI pitch.
    pub const MAX_PITCH: u8 = 127;

    #[allow(missing_docs)]
    pub const fn new(pitch: u8, start_step: usize, end_step: usize) -> Self {
        Self {
            pitch,
            start_step,
            end_step,
        }
    }

    /// The number of steps the note sounds.
    pub fn duration(&self) -> usize {
        self.end_step.saturating_sub(self.start_step)
    }

    /// Whether the note is sounding during the given step.
    pub fn is_sounding_at(&self, step: usize) -> bool {
        (self.start_step..self.end_step).contains(&step)
    }
}

/// A [Note] stamped with absolute start and end times. See [StepTime] for the
/// time unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimedNote {
    #[allow(missing_docs)]
    pub pitch: u8,
    #[allow(missing_docs)]
    pub start_step: usize,
    #[allow(missing_docs)]
    pub end_step: usize,
    #[allow(missing_docs)]
    pub start_time: ParameterType,
    #[allow(missing_docs)]
    pub end_time: ParameterType,
}
impl From<&Note> for TimedNote {
    fn from(note: &Note) -> Self {
        Self {
            pitch: note.pitch,
            start_step: note.start_step,
            end_step: note.end_step,
            start_time: StepTime::step_to_time(note.start_step),
            end_time: StepTime::step_to_time(note.end_step),
        }
    }
}

/// A monophonic sequence of [Note]s on a grid of
/// [StepTime::STEPS_PER_QUARTER] steps per quarter note.
///
/// Notes are kept in ascending order of start step, and no note starts before
/// its predecessor ends. A sequence with no notes and zero total steps is the
/// "empty" sentinel that stands for missing or invalid input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct QuantizedSequence {
    notes: Vec<Note>,
    steps_per_quarter: usize,
    total_steps: usize,
}
impl Default for QuantizedSequence {
    fn default() -> Self {
        Self::empty()
    }
}
impl QuantizedSequence {
    /// The empty/invalid sentinel.
    pub const fn empty() -> Self {
        Self {
            notes: Vec::new(),
            steps_per_quarter: StepTime::STEPS_PER_QUARTER,
            total_steps: 0,
        }
    }

    /// Builds a sequence from notes that must already satisfy the ordering
    /// invariant. `total_steps` is raised to the last note's end if needed.
    pub fn new_with(notes: Vec<Note>, total_steps: usize) -> Result<Self, SequenceError> {
        let mut r = Self::empty();
        for note in notes {
            r.add_note(note)?;
        }
        r.total_steps = r.total_steps.max(total_steps);
        Ok(r)
    }

    /// Whether this is the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.total_steps == 0 && self.notes.is_empty()
    }

    /// Appends a note after all existing notes.
    pub fn add_note(&mut self, note: Note) -> Result<(), SequenceError> {
        if note.pitch > Note::MAX_PITCH {
            return Err(SequenceError::PitchOutOfRange(note.pitch));
        }
        if note.end_step <= note.start_step {
            return Err(SequenceError::EmptyNote {
                start_step: note.start_step,
                end_step: note.end_step,
            });
        }
        if let Some(last) = self.notes.last() {
            if note.start_step < last.end_step {
                return Err(SequenceError::Overlap {
                    start_step: note.start_step,
                    previous_end_step: last.end_step,
                });
            }
        }
        self.total_steps = self.total_steps.max(note.end_step);
        self.notes.push(note);
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub(crate) fn notes_mut(&mut self) -> &mut Vec<Note> {
        &mut self.notes
    }

    #[allow(missing_docs)]
    pub fn steps_per_quarter(&self) -> usize {
        self.steps_per_quarter
    }

    #[allow(missing_docs)]
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Sets the sequence length. It never shrinks below the last note's end.
    pub fn set_total_steps(&mut self, total_steps: usize) {
        let last_end = self.notes.last().map_or(0, |n| n.end_step);
        self.total_steps = total_steps.max(last_end);
    }

    /// Shifts every pitch by `offset` semitones. Pitches are clamped to the
    /// MIDI range, so a pitch never goes below zero.
    pub fn transpose(&mut self, offset: i8) {
        self.notes.iter_mut().for_each(|note| {
            note.pitch =
                (note.pitch as i16 + offset as i16).clamp(0, Note::MAX_PITCH as i16) as u8;
        });
    }

    /// Returns each note with absolute times attached.
    pub fn timed_notes(&self) -> Vec<TimedNote> {
        self.notes.iter().map(TimedNote::from).collect()
    }

    /// Returns the pitch sounding at the given step, if any.
    pub fn pitch_at(&self, step: usize) -> Option<u8> {
        self.notes
            .iter()
            .find(|n| n.is_sounding_at(step))
            .map(|n| n.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sentinel() {
        let s = QuantizedSequence::empty();
        assert!(s.is_empty());
        assert_eq!(s.steps_per_quarter(), 4);
        assert_eq!(QuantizedSequence::default(), s);

        let mut s = QuantizedSequence::empty();
        s.set_total_steps(32);
        assert!(
            !s.is_empty(),
            "A silent sequence with a length isn't the sentinel."
        );
    }

    #[test]
    fn add_note_enforces_invariants() {
        let mut s = QuantizedSequence::empty();
        assert!(s.add_note(Note::new(60, 0, 4)).is_ok());
        assert!(s.add_note(Note::new(62, 4, 8)).is_ok());
        assert_eq!(s.total_steps(), 8);

        assert_eq!(
            s.add_note(Note::new(64, 6, 10)),
            Err(SequenceError::Overlap {
                start_step: 6,
                previous_end_step: 8
            })
        );
        assert_eq!(
            s.add_note(Note::new(64, 10, 10)),
            Err(SequenceError::EmptyNote {
                start_step: 10,
                end_step: 10
            })
        );
        assert_eq!(
            s.add_note(Note::new(128, 10, 12)),
            Err(SequenceError::PitchOutOfRange(128))
        );
        assert_eq!(s.notes().len(), 2, "Rejected notes shouldn't be added.");
    }

    #[test]
    fn new_with_keeps_longer_length() {
        let s = QuantizedSequence::new_with(vec![Note::new(60, 0, 4)], 32).unwrap();
        assert_eq!(s.total_steps(), 32);
        let s = QuantizedSequence::new_with(vec![Note::new(60, 0, 40)], 32).unwrap();
        assert_eq!(s.total_steps(), 40);
        assert!(QuantizedSequence::new_with(vec![Note::new(60, 4, 8), Note::new(62, 0, 4)], 32)
            .is_err());
    }

    #[test]
    fn transpose_clamps_at_floor() {
        let mut s =
            QuantizedSequence::new_with(vec![Note::new(3, 0, 4), Note::new(60, 4, 8)], 8).unwrap();
        s.transpose(-5);
        assert_eq!(s.notes()[0].pitch, 0);
        assert_eq!(s.notes()[1].pitch, 55);

        let mut s = QuantizedSequence::new_with(vec![Note::new(125, 0, 4)], 8).unwrap();
        s.transpose(5);
        assert_eq!(s.notes()[0].pitch, 127);
    }

    #[test]
    fn timed_notes() {
        let s = QuantizedSequence::new_with(vec![Note::new(60, 0, 4), Note::new(62, 8, 32)], 32)
            .unwrap();
        let timed = s.timed_notes();
        assert_eq!(timed.len(), 2);
        assert_eq!(timed[0].start_time, 0.0);
        assert_eq!(timed[0].end_time, 0.5);
        assert_eq!(timed[1].start_time, 1.0);
        assert_eq!(timed[1].end_time, 4.0);
        assert_eq!(timed[1].pitch, 62);
    }

    #[test]
    fn pitch_at() {
        let s = QuantizedSequence::new_with(vec![Note::new(60, 0, 4), Note::new(62, 8, 12)], 16)
            .unwrap();
        assert_eq!(s.pitch_at(0), Some(60));
        assert_eq!(s.pitch_at(3), Some(60));
        assert_eq!(s.pitch_at(4), None);
        assert_eq!(s.pitch_at(8), Some(62));
        assert_eq!(s.pitch_at(12), None);
    }
}

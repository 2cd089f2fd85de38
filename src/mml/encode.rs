// Copyright (c) 2024 Mike Tsao

use super::{DURATION_CODES, NOTE_NAMES, OCTAVE_RANGE};
use crate::{composition::QuantizedSequence, types::StepTime};

/// The longest note or rest, in steps, that gets its own length code. Longer
/// ones are shortened to this. Long rests are not split into several.
const MAX_TOKEN_STEPS: usize = StepTime::PATTERN_STEPS / 2;

/// A space goes into the text each time a token crosses another multiple of
/// this many steps.
const SEPARATOR_STEPS: usize = 8;

/// Used when the sequence has no notes to vote on the defaults.
const DEFAULT_OCTAVE: usize = 4;
const DEFAULT_DURATION: usize = 2;

#[derive(Clone, Copy, Debug)]
enum Token {
    Note {
        octave: usize,
        name: &'static str,
        start: usize,
        duration: usize,
    },
    Rest {
        start: usize,
        duration: usize,
    },
}
impl Token {
    fn start(&self) -> usize {
        match self {
            Token::Note { start, .. } | Token::Rest { start, .. } => *start,
        }
    }

    fn duration(&self) -> usize {
        match self {
            Token::Note { duration, .. } | Token::Rest { duration, .. } => *duration,
        }
    }
}

fn octave_and_name(pitch: u8) -> (usize, &'static str) {
    let octave = (pitch as i32 / 12 - 1)
        .clamp(*OCTAVE_RANGE.start() as i32, *OCTAVE_RANGE.end() as i32);
    (octave as usize, NOTE_NAMES[pitch as usize % 12])
}

/// The first index with the highest count, or `default` if every count is
/// zero.
fn modal_index(histogram: &[usize], default: usize) -> usize {
    let mut best = default;
    let mut best_count = 0;
    for (i, count) in histogram.iter().enumerate().take(MAX_TOKEN_STEPS) {
        if *count > best_count {
            best_count = *count;
            best = i;
        }
    }
    best
}

/// Encodes a sequence as MML text.
///
/// The most common octave and note length become the `o` and `l` defaults,
/// so typical notes need no suffix. Gaps between notes become rests.
pub fn encode(sequence: &QuantizedSequence) -> String {
    let mut tokens = Vec::with_capacity(sequence.notes().len() * 2);
    let mut octave_histogram = [0usize; StepTime::PATTERN_STEPS];
    let mut duration_histogram = [0usize; StepTime::PATTERN_STEPS];

    let mut previous_end = 0;
    for note in sequence.notes() {
        if note.start_step > previous_end {
            tokens.push(Token::Rest {
                start: previous_end,
                duration: (note.start_step - previous_end).min(MAX_TOKEN_STEPS),
            });
        }
        previous_end = note.end_step;

        let (octave, name) = octave_and_name(note.pitch);
        let duration = note.duration().min(MAX_TOKEN_STEPS);
        octave_histogram[octave] += 1;
        duration_histogram[duration] += 1;
        tokens.push(Token::Note {
            octave,
            name,
            start: note.start_step,
            duration,
        });
    }

    let base_octave = modal_index(&octave_histogram, DEFAULT_OCTAVE);
    let base_duration = modal_index(&duration_histogram, DEFAULT_DURATION);

    let mut text = format!("l{} o{} ", DURATION_CODES[base_duration], base_octave);
    let mut octave = base_octave;
    let mut next_separator = SEPARATOR_STEPS;
    for token in tokens {
        if token.start() >= next_separator {
            text.push(' ');
            next_separator += SEPARATOR_STEPS;
        }
        match token {
            Token::Note {
                octave: target,
                name,
                ..
            } => {
                while target < octave {
                    text.push('<');
                    octave -= 1;
                }
                while target > octave {
                    text.push('>');
                    octave += 1;
                }
                text.push_str(name);
            }
            Token::Rest { .. } => text.push('r'),
        }
        if token.duration() != base_duration {
            text.push_str(DURATION_CODES[token.duration()]);
        }
    }
    text
}

// Copyright (c) 2024 Mike Tsao

use super::MmlError;
use crate::{
    composition::{Note, QuantizedSequence},
    types::{ParameterType, StepTime},
};

/// A note or rest read from MML text, positioned in absolute time (see
/// [StepTime]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MmlEvent {
    #[allow(missing_docs)]
    Note {
        pitch: u8,
        time: ParameterType,
        duration: ParameterType,
    },
    #[allow(missing_docs)]
    Rest {
        time: ParameterType,
        duration: ParameterType,
    },
}

/// Reading state that carries from one command to the next.
#[derive(Debug)]
struct MmlReader<'a> {
    text: &'a [u8],
    position: usize,

    octave: i32,
    length: u32,
    length_dots: u32,
    tempo: u32,
    time: ParameterType,
}
impl<'a> MmlReader<'a> {
    const DEFAULT_OCTAVE: i32 = 4;
    const DEFAULT_LENGTH: u32 = 4;
    const DEFAULT_TEMPO: u32 = 120;
    /// The highest octave `o` accepts. Its notes are already past the MIDI
    /// range, so anything above it is a typo.
    const MAX_OCTAVE: u32 = 10;

    fn new_with(text: &'a str) -> Self {
        Self {
            text: text.as_bytes(),
            position: 0,
            octave: Self::DEFAULT_OCTAVE,
            length: Self::DEFAULT_LENGTH,
            length_dots: 0,
            tempo: Self::DEFAULT_TEMPO,
            time: 0.0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.position).map(|b| b.to_ascii_lowercase())
    }

    fn skip_whitespace(&mut self) {
        while self.text.get(self.position).is_some_and(|b| b.is_ascii_whitespace()) {
            self.position += 1;
        }
    }

    fn read_number(&mut self) -> Result<Option<u32>, MmlError> {
        let start = self.position;
        let mut value: u32 = 0;
        while let Some(digit) = self.peek().filter(|b| b.is_ascii_digit()) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((digit - b'0') as u32))
                .ok_or(MmlError::NumberTooLarge { position: start })?;
            self.position += 1;
        }
        Ok((self.position > start).then_some(value))
    }

    fn read_required_number(&mut self, command: char, position: usize) -> Result<u32, MmlError> {
        self.read_number()?
            .ok_or(MmlError::MissingNumber { command, position })
    }

    fn read_dots(&mut self) -> u32 {
        let mut dots = 0;
        while self.peek() == Some(b'.') {
            dots += 1;
            self.position += 1;
        }
        dots
    }

    /// Converts a length denominator and dot count into quarter notes.
    fn quarters(length: u32, dots: u32) -> ParameterType {
        let base = 4.0 / length as ParameterType;
        base * (2.0 - 0.5f64.powi(dots as i32))
    }

    /// Reads an optional explicit length, dots, and any `^` ties, and returns
    /// the total duration in absolute time.
    fn read_duration(&mut self) -> Result<ParameterType, MmlError> {
        let mut quarters = self.read_one_length()?;
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'^') {
                break;
            }
            self.position += 1;
            quarters += self.read_one_length()?;
        }
        Ok(StepTime::quarters_to_time(quarters, self.tempo as ParameterType))
    }

    fn read_one_length(&mut self) -> Result<ParameterType, MmlError> {
        let position = self.position;
        match self.read_number()? {
            Some(0) => Err(MmlError::ZeroLength { position }),
            Some(length) => {
                let dots = self.read_dots();
                Ok(Self::quarters(length, dots))
            }
            None => {
                let dots = self.length_dots + self.read_dots();
                Ok(Self::quarters(self.length, dots))
            }
        }
    }

    fn semitone(letter: u8) -> Option<i32> {
        match letter {
            b'c' => Some(0),
            b'd' => Some(2),
            b'e' => Some(4),
            b'f' => Some(5),
            b'g' => Some(7),
            b'a' => Some(9),
            b'b' => Some(11),
            _ => None,
        }
    }

    fn read_accidentals(&mut self) -> i32 {
        let mut accidental: i32 = 0;
        loop {
            match self.peek() {
                Some(b'+') | Some(b'#') => accidental = accidental.saturating_add(1),
                Some(b'-') => accidental = accidental.saturating_sub(1),
                _ => return accidental,
            }
            self.position += 1;
        }
    }

    /// Reads the next event, handling any state-changing commands before it.
    fn next_event(&mut self) -> Result<Option<MmlEvent>, MmlError> {
        loop {
            self.skip_whitespace();
            let position = self.position;
            let Some(command) = self.peek() else {
                return Ok(None);
            };
            self.position += 1;

            if let Some(semitone) = Self::semitone(command) {
                let accidental = self.read_accidentals();
                let pitch =
                    (self.octave as i64 + 1) * 12 + semitone as i64 + accidental as i64;
                if !(0..=Note::MAX_PITCH as i64).contains(&pitch) {
                    return Err(MmlError::PitchOutOfRange { pitch, position });
                }
                let duration = self.read_duration()?;
                let event = MmlEvent::Note {
                    pitch: pitch as u8,
                    time: self.time,
                    duration,
                };
                self.time += duration;
                return Ok(Some(event));
            }

            match command {
                b'r' => {
                    let duration = self.read_duration()?;
                    let event = MmlEvent::Rest {
                        time: self.time,
                        duration,
                    };
                    self.time += duration;
                    return Ok(Some(event));
                }
                b'o' => match self.read_required_number('o', position)? {
                    octave if octave > Self::MAX_OCTAVE => {
                        return Err(MmlError::OctaveOutOfRange { octave, position })
                    }
                    octave => self.octave = octave as i32,
                },
                b'<' => self.octave = self.octave.saturating_sub(1),
                b'>' => self.octave = self.octave.saturating_add(1),
                b'l' => {
                    // A bare `l` keeps the current length.
                    match self.read_number()? {
                        Some(0) => return Err(MmlError::ZeroLength { position }),
                        Some(length) => {
                            self.length = length;
                            self.length_dots = self.read_dots();
                        }
                        None => {}
                    }
                }
                b't' => match self.read_required_number('t', position)? {
                    0 => return Err(MmlError::ZeroTempo { position }),
                    tempo => self.tempo = tempo,
                },
                b'v' => {
                    let _ = self.read_required_number('v', position)?;
                }
                b'q' => {
                    let _ = self.read_required_number('q', position)?;
                }
                _ => {
                    return Err(MmlError::UnexpectedCharacter {
                        character: self.text[position] as char,
                        position,
                    })
                }
            }
        }
    }
}

/// Reads every note and rest in `text`. Fails on the first malformed command.
pub fn parse(text: &str) -> Result<Vec<MmlEvent>, MmlError> {
    let mut reader = MmlReader::new_with(text);
    let mut events = Vec::default();
    while let Some(event) = reader.next_event()? {
        events.push(event);
    }
    Ok(events)
}

/// Decodes MML text into a [QuantizedSequence] holding at most one pattern
/// page of notes.
///
/// Notes accumulate until the running time reaches the end of the page; a
/// note that starts before the page ends is kept even if it runs past it.
/// Malformed text, and text with no notes, decode to the empty sentinel.
pub fn decode(text: &str) -> QuantizedSequence {
    match parse(text) {
        Ok(events) => quantize(&events),
        Err(e) => {
            log::warn!("Couldn't decode MML: {e}");
            QuantizedSequence::empty()
        }
    }
}

fn quantize(events: &[MmlEvent]) -> QuantizedSequence {
    let mut sequence = QuantizedSequence::empty();
    let mut end_time: ParameterType = 0.0;

    for event in events {
        let MmlEvent::Note {
            pitch,
            time,
            duration,
        } = *event
        else {
            continue;
        };
        if time >= StepTime::PATTERN_TIME {
            break;
        }
        end_time = time + duration;

        let previous_end = sequence.notes().last().map_or(0, |n| n.end_step);
        let start_step = StepTime::time_to_step(time).max(previous_end);
        let end_step = StepTime::time_to_step(end_time).max(start_step + 1);
        if let Err(e) = sequence.add_note(Note::new(pitch, start_step, end_step)) {
            log::warn!("Couldn't quantize MML note: {e}");
            return QuantizedSequence::empty();
        }

        if end_time >= StepTime::PATTERN_TIME {
            break;
        }
    }
    if sequence.notes().is_empty() {
        return QuantizedSequence::empty();
    }
    sequence.set_total_steps(StepTime::time_to_step(end_time));
    sequence
}

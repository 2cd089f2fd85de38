// Copyright (c) 2024 Mike Tsao

use crate::{
    composition::QuantizedSequence,
    types::{StepTime, Voice},
};
use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use strum::IntoEnumIterator;

/// Provides MIDI-related utility functionality.
pub struct MidiUtils {}
impl MidiUtils {
    /// MIDI ticks per quarter note in exported files.
    pub const TICKS_PER_QUARTER: u16 = 480;

    const TICKS_PER_STEP: u32 =
        Self::TICKS_PER_QUARTER as u32 / StepTime::STEPS_PER_QUARTER as u32;
    const VELOCITY: u8 = 100;

    /// Convenience function to make a note-on [MidiMessage].
    pub fn new_note_on(note: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOn {
            key: u7::from(note),
            vel: u7::from(vel),
        }
    }

    /// Convenience function to make a note-off [MidiMessage].
    pub fn new_note_off(note: u8, vel: u8) -> MidiMessage {
        MidiMessage::NoteOff {
            key: u7::from(note),
            vel: u7::from(vel),
        }
    }

    /// Builds a format-1 Standard MIDI File with a tempo track followed by one
    /// track per voice. Each voice plays on its own channel.
    pub fn voices_to_smf(
        primary: &QuantizedSequence,
        secondary: &QuantizedSequence,
    ) -> Smf<'static> {
        let mut smf = Smf::new(Header::new(
            Format::Parallel,
            Timing::Metrical(u15::new(Self::TICKS_PER_QUARTER)),
        ));

        let microseconds_per_quarter = 60_000_000 / StepTime::REFERENCE_QPM as u32;
        smf.tracks.push(vec![
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(microseconds_per_quarter))),
            },
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
            },
        ]);

        for (channel, voice) in Voice::iter().enumerate() {
            let sequence = match voice {
                Voice::Primary => primary,
                Voice::Secondary => secondary,
            };
            smf.tracks
                .push(Self::sequence_to_track(sequence, voice, u4::new(channel as u8)));
        }
        smf
    }

    /// Serializes [MidiUtils::voices_to_smf()] into the bytes of a .mid file.
    pub fn voices_to_smf_bytes(
        primary: &QuantizedSequence,
        secondary: &QuantizedSequence,
    ) -> anyhow::Result<Vec<u8>> {
        let mut bytes = Vec::default();
        Self::voices_to_smf(primary, secondary).write_std(&mut bytes)?;
        Ok(bytes)
    }

    fn sequence_to_track(
        sequence: &QuantizedSequence,
        voice: Voice,
        channel: u4,
    ) -> Track<'static> {
        let name: &'static str = voice.into();
        let mut track = vec![TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
        }];

        let mut last_tick = 0;
        for note in sequence.notes() {
            let on_tick = note.start_step as u32 * Self::TICKS_PER_STEP;
            let off_tick = note.end_step as u32 * Self::TICKS_PER_STEP;
            track.push(TrackEvent {
                delta: u28::new(on_tick - last_tick),
                kind: TrackEventKind::Midi {
                    channel,
                    message: Self::new_note_on(note.pitch, Self::VELOCITY),
                },
            });
            track.push(TrackEvent {
                delta: u28::new(off_tick - on_tick),
                kind: TrackEventKind::Midi {
                    channel,
                    message: Self::new_note_off(note.pitch, 0),
                },
            });
            last_tick = off_tick;
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        track
    }
}

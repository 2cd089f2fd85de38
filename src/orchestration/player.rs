// Copyright (c) 2024 Mike Tsao

use crate::{
    composition::QuantizedSequence,
    mml::{decode, encode},
    types::{FrequencyHz, ParameterType, StepTime, Voice},
};

/// One note, ready to hand to a synthesizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackEvent {
    #[allow(missing_docs)]
    pub voice: Voice,
    /// Seconds from the start of the loop.
    pub start: ParameterType,
    #[allow(missing_docs)]
    pub frequency: FrequencyHz,
    /// Seconds. Slightly shorter than the note's steps so that repeated
    /// pitches are audibly separate.
    pub duration: ParameterType,
    /// Linear gain, 0.0..=1.0.
    pub volume: ParameterType,
}

/// A pair of voices, held both as sequences and as MML text.
///
/// The sequences are the source of truth; the text is what gets shown,
/// edited, and saved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Player {
    primary_mml: Option<String>,
    secondary_mml: Option<String>,
    primary: QuantizedSequence,
    secondary: QuantizedSequence,
}
impl Player {
    /// Playback speed, in seconds per step.
    pub const SECONDS_PER_STEP: ParameterType = 0.12;

    /// The playback loop, in seconds.
    pub const LOOP_SECONDS: ParameterType =
        Self::SECONDS_PER_STEP * StepTime::PATTERN_STEPS as ParameterType;

    const PRIMARY_VOLUME: ParameterType = 0.03;
    const SECONDARY_VOLUME: ParameterType = 0.12;

    /// Decodes both texts, then replaces them with their canonical encodings.
    pub fn set_mml(&mut self, primary: &str, secondary: &str) {
        self.set_sequences(decode(primary), decode(secondary));
    }

    /// Stores the texts exactly as given and decodes the sequences from them.
    /// Used when restoring saved state, where the text the user last saw
    /// should come back unchanged.
    pub fn restore_mml(&mut self, primary: &str, secondary: &str) {
        self.primary = decode(primary);
        self.secondary = decode(secondary);
        self.primary_mml = Some(primary.to_string());
        self.secondary_mml = Some(secondary.to_string());
    }

    /// Stores the sequences and derives the text from them.
    pub fn set_sequences(&mut self, primary: QuantizedSequence, secondary: QuantizedSequence) {
        self.primary_mml = Some(encode(&primary));
        self.secondary_mml = Some(encode(&secondary));
        self.primary = primary;
        self.secondary = secondary;
    }

    /// Whether both voices are the empty sentinel.
    pub fn is_cleared(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }

    /// Returns false if there's nothing to play, after clearing the text so
    /// that the cleared state is visible.
    pub fn check(&mut self) -> bool {
        if self.is_cleared() {
            self.primary_mml = None;
            self.secondary_mml = None;
            false
        } else {
            true
        }
    }

    #[allow(missing_docs)]
    pub fn primary_mml(&self) -> Option<&str> {
        self.primary_mml.as_deref()
    }

    #[allow(missing_docs)]
    pub fn secondary_mml(&self) -> Option<&str> {
        self.secondary_mml.as_deref()
    }

    #[allow(missing_docs)]
    pub fn primary(&self) -> &QuantizedSequence {
        &self.primary
    }

    #[allow(missing_docs)]
    pub fn secondary(&self) -> &QuantizedSequence {
        &self.secondary
    }

    #[allow(missing_docs)]
    pub fn voice(&self, voice: Voice) -> &QuantizedSequence {
        match voice {
            Voice::Primary => &self.primary,
            Voice::Secondary => &self.secondary,
        }
    }

    /// Lists every note of both voices in start order, for a synthesizer that
    /// loops every [Player::LOOP_SECONDS]. Returns nothing if the player is
    /// cleared.
    pub fn playback_events(&self) -> Vec<PlaybackEvent> {
        if self.is_cleared() {
            return Vec::default();
        }
        let mut events: Vec<PlaybackEvent> = [
            (Voice::Primary, Self::PRIMARY_VOLUME),
            (Voice::Secondary, Self::SECONDARY_VOLUME),
        ]
        .into_iter()
        .flat_map(|(voice, volume)| {
            self.voice(voice)
                .notes()
                .iter()
                .filter(|n| n.start_step < StepTime::PATTERN_STEPS)
                .map(move |n| PlaybackEvent {
                    voice,
                    start: n.start_step as ParameterType * Self::SECONDS_PER_STEP,
                    frequency: FrequencyHz::from(n.pitch),
                    duration: n.duration() as ParameterType * Self::SECONDS_PER_STEP
                        - Self::SECONDS_PER_STEP / 4.0,
                    volume,
                })
        })
        .collect();
        events.sort_by(|a, b| a.start.total_cmp(&b.start));
        events
    }
}

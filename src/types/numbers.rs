// Copyright (c) 2024 Mike Tsao

//! Numeric types used throughout the system.

use derivative::Derivative;
use serde::{Deserialize, Serialize};

/// The floating-point type used for frequencies, times, and other continuous
/// quantities.
pub type ParameterType = f64;

/// Frequency in Hertz, computed from MIDI keys with the equal-tempered scale
/// anchored at A4 (MIDI 69) = 440 Hz.
#[derive(Clone, Copy, Debug, Derivative, PartialEq, PartialOrd, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case")]
pub struct FrequencyHz(#[derivative(Default(value = "440.0"))] pub ParameterType);
#[allow(missing_docs)]
impl FrequencyHz {
    pub const A4_KEY: i16 = 69;
    pub const A4_HZ: ParameterType = 440.0;

    pub const UNITS_SUFFIX: &'static str = " Hz";

    /// Converts a MIDI key to its equal-tempered frequency. The key is signed
    /// and unbounded so that candidate pitches outside 0..=127 can still be
    /// evaluated.
    pub fn from_midi_key(key: i16) -> Self {
        Self(Self::A4_HZ * 2.0f64.powf((key - Self::A4_KEY) as ParameterType / 12.0))
    }

    /// Returns the absolute difference between this frequency's `multiple`th
    /// harmonic and `other`'s `other_multiple`th harmonic.
    pub fn harmonic_distance(
        &self,
        multiple: u8,
        other: &Self,
        other_multiple: u8,
    ) -> ParameterType {
        (self.0 * multiple as ParameterType - other.0 * other_multiple as ParameterType).abs()
    }
}
impl From<u8> for FrequencyHz {
    fn from(value: u8) -> Self {
        Self::from_midi_key(value as i16)
    }
}
impl From<f64> for FrequencyHz {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl From<FrequencyHz> for f64 {
    fn from(value: FrequencyHz) -> Self {
        value.0
    }
}
impl core::fmt::Display for FrequencyHz {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{:0.2}{}", self.0, Self::UNITS_SUFFIX))
    }
}

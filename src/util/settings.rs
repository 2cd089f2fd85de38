// Copyright (c) 2024 Mike Tsao

//! Structs that hold configuration information about various parts of the
//! system. Intended to be serialized.

use crate::traits::HasSettings;
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// How adventurous the oracle should be. Each choice maps to a sampling
/// temperature.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumCount,
    EnumIter,
    FromRepr,
    IntoStaticStr,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum TemperatureChoice {
    /// Stays close to the seed.
    Calm,
    /// The usual setting.
    #[default]
    Balanced,
    /// Takes chances.
    Wild,
}
impl TemperatureChoice {
    /// The sampling temperature passed to the oracle, a hair under
    /// 0.5/1.0/1.5.
    pub const fn temperature(&self) -> f64 {
        match self {
            TemperatureChoice::Calm => 0.49,
            TemperatureChoice::Balanced => 0.99,
            TemperatureChoice::Wild => 1.49,
        }
    }

    #[allow(missing_docs)]
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().and_then(Self::from_repr)
    }

    #[allow(missing_docs)]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// How many times the driver asks the oracle to extend each voice.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumCount,
    EnumIter,
    FromRepr,
    IntoStaticStr,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum RepeatChoice {
    #[allow(missing_docs)]
    Once,
    #[allow(missing_docs)]
    #[default]
    Twice,
    #[allow(missing_docs)]
    Thrice,
}
impl RepeatChoice {
    /// The number of oracle iterations.
    pub const fn repeat_count(&self) -> usize {
        *self as usize + 1
    }

    #[allow(missing_docs)]
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().and_then(Self::from_repr)
    }

    #[allow(missing_docs)]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// Contains the user's persistent generation preferences.
#[derive(Clone, Debug, Derivative, Serialize, Deserialize)]
#[derivative(Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct GenerationSettings {
    temperature: TemperatureChoice,
    repeat_count: RepeatChoice,
    #[derivative(Default(value = "true"))]
    correct_discordance: bool,

    #[serde(skip)]
    #[derivative(PartialEq = "ignore")]
    has_been_saved: bool,
}
impl HasSettings for GenerationSettings {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}
impl GenerationSettings {
    #[allow(missing_docs)]
    pub fn temperature(&self) -> TemperatureChoice {
        self.temperature
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_temperature(&mut self, temperature: TemperatureChoice) {
        if temperature != self.temperature {
            self.temperature = temperature;
            self.needs_save();
        }
    }

    #[allow(missing_docs)]
    pub fn repeat_count(&self) -> RepeatChoice {
        self.repeat_count
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_repeat_count(&mut self, repeat_count: RepeatChoice) {
        if repeat_count != self.repeat_count {
            self.repeat_count = repeat_count;
            self.needs_save();
        }
    }

    /// Whether generated voices should be run through the consonance
    /// corrector.
    pub fn correct_discordance(&self) -> bool {
        self.correct_discordance
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_correct_discordance(&mut self, correct_discordance: bool) {
        if correct_discordance != self.correct_discordance {
            self.correct_discordance = correct_discordance;
            self.needs_save();
        }
    }
}

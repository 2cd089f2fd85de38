// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{GenerationSettings, MidiUtils, RepeatChoice, Rng, TemperatureChoice};
}

pub use midi::MidiUtils;
pub use rng::Rng;
pub use settings::{GenerationSettings, RepeatChoice, TemperatureChoice};

mod midi;
mod rng;
mod settings;

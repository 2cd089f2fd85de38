// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{FrequencyHz, ParameterType, StepTime, Voice};
}

pub use {
    numbers::{FrequencyHz, ParameterType},
    time::StepTime,
    voice::Voice,
};

mod numbers;
mod time;
mod voice;

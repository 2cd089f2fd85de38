// Copyright (c) 2024 Mike Tsao

//! Representation and transformation of quantized note sequences.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{correct_discordance, Note, QuantizedSequence, SequenceError, TimedNote};
}

pub use consonance::*;
pub use sequence::*;

mod consonance;
mod sequence;

// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Duetto extends two-voice melodies with a generative model, then cleans up
//! the result so that it sounds good and reads well.
//!
//! The pieces, from the bottom up:
//!
//! * A [QuantizedSequence](composition::QuantizedSequence) is a monophonic
//! list of notes on a fixed step grid (four steps per quarter note).
//! * The [mml] module converts sequences to and from MML, a compact text
//! notation that people can read and edit.
//! * [correct_discordance](composition::correct_discordance) nudges or removes
//! notes in one voice so that it harmonizes with another.
//! * The [ContinuationDriver](orchestration::ContinuationDriver) asks a
//! [ContinuationOracle](traits::ContinuationOracle) to extend both voices,
//! transposes them, corrects them, and stamps them with absolute times.
//! * A [Session](orchestration::Session) ties a seed pair, a generated pair,
//! and the user's [GenerationSettings](util::GenerationSettings) together, and
//! can save and restore all of it as a
//! [StateSnapshot](orchestration::StateSnapshot).

/// A collection of imports that are useful to users of this crate. `use
/// duetto::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        composition::prelude::*, mml::prelude::*, orchestration::prelude::*,
        traits::prelude::*, types::prelude::*, util::prelude::*,
    };
}

pub use {
    composition::QuantizedSequence,
    orchestration::{ContinuationDriver, Session},
};

pub mod composition;
pub mod mml;
pub mod oracles;
pub mod orchestration;
pub mod traits;
pub mod types;
pub mod util;

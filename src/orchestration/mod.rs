// Copyright (c) 2024 Mike Tsao

//! Generation and the state around it: the driver that runs the oracle and
//! cleans up its output, the players that hold voice pairs, and the session
//! that ties them together.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ContinuationDriver, GeneratedVoices, GenerationError, GenerationRequest,
        GenerationRequestBuilder, Player, Session, SessionError, StateSnapshot,
    };
}

pub use {
    driver::{
        ContinuationDriver, GeneratedVoices, GenerationError, GenerationRequest,
        GenerationRequestBuilder, GenerationRequestBuilderError,
    },
    player::{PlaybackEvent, Player},
    session::{Session, SessionError},
    snapshot::{SnapshotError, StateSnapshot},
};

mod driver;
mod player;
mod session;
mod snapshot;

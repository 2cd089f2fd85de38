// Copyright (c) 2024 Mike Tsao

//! Runs duetto generation on background threads and reports back through
//! crossbeam channels.

#![deny(missing_docs)]

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        GenerationJob, GenerationService, GenerationServiceEvent, GenerationServiceInput, JobId,
        ProvidesService,
    };
}

pub use generation::{
    GenerationJob, GenerationService, GenerationServiceEvent, GenerationServiceInput,
};
pub use traits::ProvidesService;
pub use types::{CrossbeamChannel, JobId, JobIdFactory};

mod generation;
mod traits;
mod types;

// Copyright (c) 2024 Mike Tsao

//! The traits that define the seams between this crate and its collaborators.

use crate::composition::QuantizedSequence;

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{ContinuationOracle, HasSettings, ProgressFn};
}

/// A generative model that extends a melody.
///
/// Implementations are expected to be pre-trained and stateless per call, so
/// the same oracle can serve several calls at once. That's why the trait
/// requires [Send] and [Sync]: the
/// [ContinuationDriver](crate::orchestration::ContinuationDriver) asks for the
/// primary and secondary continuations in parallel.
pub trait ContinuationOracle: Send + Sync {
    /// Returns a sequence that extends `seed` by about `steps_to_add` steps.
    /// `temperature` controls randomness; higher is wilder.
    ///
    /// The result is expected to be monophonic, on the same step grid as the
    /// seed, and to contain only the continuation (not the seed itself).
    fn continue_sequence(
        &self,
        seed: &QuantizedSequence,
        steps_to_add: usize,
        temperature: f64,
    ) -> anyhow::Result<QuantizedSequence>;
}

/// Receives fractional progress of a long-running operation, in the range
/// 0.0..=1.0.
pub type ProgressFn<'a> = dyn FnMut(f64) + Send + 'a;

/// Something that is persisted and wants to know whether it needs saving.
pub trait HasSettings {
    /// Whether the current state of this struct has been saved to disk.
    fn has_been_saved(&self) -> bool;
    /// Call this whenever the struct changes.
    fn needs_save(&mut self);
    /// Call this after a load() or a save().
    fn mark_clean(&mut self);
}

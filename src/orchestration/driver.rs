// Copyright (c) 2024 Mike Tsao

use crate::{
    composition::{correct_discordance, QuantizedSequence, TimedNote},
    traits::{ContinuationOracle, ProgressFn},
    types::{StepTime, Voice},
    util::{GenerationSettings, Rng},
};
use derive_builder::Builder;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};
use thiserror::Error;

/// Why [ContinuationDriver::generate()] produced nothing.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Another generation on the same driver hasn't finished yet.
    #[error("a generation is already in progress")]
    Busy,
    /// The oracle returned an error.
    #[error("the {voice} continuation failed on iteration {iteration}")]
    Oracle {
        #[allow(missing_docs)]
        voice: Voice,
        #[allow(missing_docs)]
        iteration: usize,
        #[allow(missing_docs)]
        #[source]
        source: anyhow::Error,
    },
    /// The oracle panicked.
    #[error("a continuation panicked on iteration {iteration}")]
    OraclePanicked {
        #[allow(missing_docs)]
        iteration: usize,
    },
}

/// The knobs for one call to [ContinuationDriver::generate()].
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(build_fn(private, name = "build_from_builder"))]
pub struct GenerationRequest {
    /// How many times each voice is extended. Each iteration extends the
    /// previous iteration's continuation.
    #[builder(default = "GenerationRequest::DEFAULT_REPEAT_COUNT")]
    pub repeat_count: usize,

    /// Passed through to the oracle.
    #[builder(default = "GenerationRequest::DEFAULT_TEMPERATURE")]
    pub temperature: f64,

    /// Whether the secondary voice is corrected against the primary.
    #[builder(default = "true")]
    pub correct_discordance: bool,

    /// Steps requested from the oracle per iteration. This is also the number
    /// of steps the corrector scans.
    #[builder(default = "StepTime::PATTERN_STEPS")]
    pub steps_per_iteration: usize,
}
impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            repeat_count: Self::DEFAULT_REPEAT_COUNT,
            temperature: Self::DEFAULT_TEMPERATURE,
            correct_discordance: true,
            steps_per_iteration: StepTime::PATTERN_STEPS,
        }
    }
}
impl From<&GenerationSettings> for GenerationRequest {
    fn from(settings: &GenerationSettings) -> Self {
        Self {
            repeat_count: settings.repeat_count().repeat_count(),
            temperature: settings.temperature().temperature(),
            correct_discordance: settings.correct_discordance(),
            ..Default::default()
        }
    }
}
#[allow(missing_docs)]
impl GenerationRequest {
    pub const DEFAULT_REPEAT_COUNT: usize = 2;
    pub const DEFAULT_TEMPERATURE: f64 = 0.99;
}
impl GenerationRequestBuilder {
    /// Builds the request, rejecting values the driver can't use.
    pub fn build(&self) -> Result<GenerationRequest, GenerationRequestBuilderError> {
        let r = self.build_from_builder()?;
        if r.repeat_count == 0 {
            return Err(GenerationRequestBuilderError::ValidationError(
                "repeat count must be at least 1".to_string(),
            ));
        }
        if !(r.temperature.is_finite() && r.temperature > 0.0) {
            return Err(GenerationRequestBuilderError::ValidationError(format!(
                "temperature {} must be positive",
                r.temperature
            )));
        }
        if r.steps_per_iteration == 0 {
            return Err(GenerationRequestBuilderError::ValidationError(
                "steps per iteration must be at least 1".to_string(),
            ));
        }
        Ok(r)
    }
}

/// The result of a successful [ContinuationDriver::generate()].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratedVoices {
    #[allow(missing_docs)]
    pub primary: QuantizedSequence,
    #[allow(missing_docs)]
    pub secondary: QuantizedSequence,
    /// The primary voice's notes with absolute times attached.
    pub primary_timed: Vec<TimedNote>,
    /// The secondary voice's notes with absolute times attached.
    pub secondary_timed: Vec<TimedNote>,
    /// The number of semitones both voices were shifted by.
    pub transposition: i8,
}
impl GeneratedVoices {
    fn new_with(
        primary: QuantizedSequence,
        secondary: QuantizedSequence,
        transposition: i8,
    ) -> Self {
        Self {
            primary_timed: primary.timed_notes(),
            secondary_timed: secondary.timed_notes(),
            primary,
            secondary,
            transposition,
        }
    }
}

/// Clears the in-flight flag when a generation ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);
impl<'a> InFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}
impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Extends a pair of seed melodies with a [ContinuationOracle], then
/// transposes both voices by the same random amount and optionally makes the
/// secondary voice harmonize with the primary.
///
/// Only one generation runs per driver at a time. The driver can be shared
/// across threads (for example, in an `Arc`); a call that arrives while
/// another is running fails fast with [GenerationError::Busy].
#[derive(Debug)]
pub struct ContinuationDriver<O: ContinuationOracle> {
    oracle: O,
    rng: Mutex<Rng>,
    is_generating: AtomicBool,
}
impl<O: ContinuationOracle> ContinuationDriver<O> {
    /// The transposition applied to both voices is drawn from this range.
    pub const TRANSPOSITION_RANGE: core::ops::RangeInclusive<i64> = -5..=5;

    #[allow(missing_docs)]
    pub fn new_with(oracle: O) -> Self {
        Self::new_with_rng(oracle, Rng::default())
    }

    /// Supplies the random-number generator, which makes transpositions
    /// reproducible.
    pub fn new_with_rng(oracle: O, rng: Rng) -> Self {
        Self {
            oracle,
            rng: Mutex::new(rng),
            is_generating: Default::default(),
        }
    }

    #[allow(missing_docs)]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Whether a generation is running right now.
    pub fn is_generating(&self) -> bool {
        self.is_generating.load(Ordering::Acquire)
    }

    /// Runs the whole pipeline. The seeds are only read.
    ///
    /// `progress` is called once per iteration, after both voices have come
    /// back, with a value that climbs from just above 0.1 to 0.9.
    ///
    /// Nothing partial is ever returned: if any oracle call fails, the whole
    /// generation fails.
    pub fn generate(
        &self,
        primary_seed: &QuantizedSequence,
        secondary_seed: &QuantizedSequence,
        request: &GenerationRequest,
        progress: &mut ProgressFn,
    ) -> Result<GeneratedVoices, GenerationError> {
        let Some(_guard) = InFlightGuard::try_acquire(&self.is_generating) else {
            log::warn!("refusing to start a generation while another is running");
            return Err(GenerationError::Busy);
        };

        let mut primary = primary_seed.clone();
        let mut secondary = secondary_seed.clone();
        for iteration in 0..request.repeat_count {
            let (next_primary, next_secondary) =
                match self.continue_both(&primary, &secondary, request, iteration) {
                    Ok(pair) => pair,
                    Err(e) => {
                        log::warn!("generation failed: {e}");
                        return Err(e);
                    }
                };
            primary = next_primary;
            secondary = next_secondary;
            log::debug!(
                "iteration {iteration}: {} primary notes, {} secondary notes",
                primary.notes().len(),
                secondary.notes().len()
            );
            progress(((iteration + 1) as f64 / request.repeat_count as f64) * 0.8 + 0.1);
        }

        let transposition = self.pick_transposition();
        primary.transpose(transposition);
        secondary.transpose(transposition);

        if request.correct_discordance {
            secondary = correct_discordance(&primary, secondary, request.steps_per_iteration);
        }

        log::info!(
            "generated {} + {} notes after {} iterations, transposed by {transposition}",
            primary.notes().len(),
            secondary.notes().len(),
            request.repeat_count
        );
        Ok(GeneratedVoices::new_with(primary, secondary, transposition))
    }

    /// Asks the oracle to extend both voices at once and waits for both.
    fn continue_both(
        &self,
        primary: &QuantizedSequence,
        secondary: &QuantizedSequence,
        request: &GenerationRequest,
        iteration: usize,
    ) -> Result<(QuantizedSequence, QuantizedSequence), GenerationError> {
        let oracle = &self.oracle;
        let steps = request.steps_per_iteration;
        let temperature = request.temperature;

        let joined = crossbeam::scope(|s| {
            let primary_handle = s.spawn(|_| oracle.continue_sequence(primary, steps, temperature));
            let secondary_handle =
                s.spawn(|_| oracle.continue_sequence(secondary, steps, temperature));
            (primary_handle.join(), secondary_handle.join())
        });
        let Ok((Ok(primary_result), Ok(secondary_result))) = joined else {
            return Err(GenerationError::OraclePanicked { iteration });
        };

        let primary = primary_result.map_err(|source| GenerationError::Oracle {
            voice: Voice::Primary,
            iteration,
            source,
        })?;
        let secondary = secondary_result.map_err(|source| GenerationError::Oracle {
            voice: Voice::Secondary,
            iteration,
            source,
        })?;
        Ok((primary, secondary))
    }

    fn pick_transposition(&self) -> i8 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.rand_i64_in(Self::TRANSPOSITION_RANGE) as i8
    }
}

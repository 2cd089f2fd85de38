// Copyright (c) 2024 Mike Tsao

//! Simple [ContinuationOracle]s. None of them is a trained model; they exist
//! for tests, demos, and for wiring things up before a real model is
//! available.

use crate::{
    composition::{Note, QuantizedSequence},
    traits::ContinuationOracle,
    util::Rng,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

/// Continues a sequence by repeating it. The continuation is the seed's notes
/// cut off at `steps_to_add`, looped if the seed is shorter than that.
#[derive(Debug, Default)]
pub struct EchoOracle {}
impl ContinuationOracle for EchoOracle {
    fn continue_sequence(
        &self,
        seed: &QuantizedSequence,
        steps_to_add: usize,
        _temperature: f64,
    ) -> anyhow::Result<QuantizedSequence> {
        let period = seed.total_steps();
        let mut r = QuantizedSequence::empty();
        if period > 0 {
            let mut offset = 0;
            'outer: while offset < steps_to_add {
                for note in seed.notes() {
                    let start_step = note.start_step + offset;
                    if start_step >= steps_to_add {
                        break 'outer;
                    }
                    let end_step = (note.end_step + offset).min(steps_to_add);
                    r.add_note(Note::new(note.pitch, start_step, end_step))?;
                }
                offset += period;
            }
        }
        r.set_total_steps(steps_to_add);
        Ok(r)
    }
}

type ScriptFn =
    dyn Fn(&QuantizedSequence, usize, f64) -> anyhow::Result<QuantizedSequence> + Send + Sync;

/// Delegates to a closure and counts the calls. Useful when a test needs to
/// control exactly what comes back, or when it needs to block or fail on
/// cue.
pub struct ScriptedOracle {
    script: Box<ScriptFn>,
    call_count: AtomicUsize,
}
impl core::fmt::Debug for ScriptedOracle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScriptedOracle")
            .field("script", &"(skipped)")
            .field("call_count", &self.call_count)
            .finish()
    }
}
impl ScriptedOracle {
    #[allow(missing_docs)]
    pub fn new_with<F>(script: F) -> Self
    where
        F: Fn(&QuantizedSequence, usize, f64) -> anyhow::Result<QuantizedSequence>
            + Send
            + Sync
            + 'static,
    {
        Self {
            script: Box::new(script),
            call_count: Default::default(),
        }
    }

    /// The number of times the oracle has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}
impl ContinuationOracle for ScriptedOracle {
    fn continue_sequence(
        &self,
        seed: &QuantizedSequence,
        steps_to_add: usize,
        temperature: f64,
    ) -> anyhow::Result<QuantizedSequence> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        (self.script)(seed, steps_to_add, temperature)
    }
}

/// How a [FailingOracle] misbehaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Returns an error.
    #[default]
    Error,
    /// Panics.
    Panic,
}

/// Always fails.
#[derive(Debug, Default)]
pub struct FailingOracle {
    mode: FailureMode,
}
impl FailingOracle {
    #[allow(missing_docs)]
    pub fn new_with(mode: FailureMode) -> Self {
        Self { mode }
    }
}
impl ContinuationOracle for FailingOracle {
    fn continue_sequence(
        &self,
        _seed: &QuantizedSequence,
        _steps_to_add: usize,
        _temperature: f64,
    ) -> anyhow::Result<QuantizedSequence> {
        match self.mode {
            FailureMode::Error => Err(anyhow::anyhow!("the oracle is out of ideas")),
            FailureMode::Panic => panic!("the oracle fell over"),
        }
    }
}

/// Wanders up and down from the seed's last pitch. Higher temperatures take
/// bigger leaps and rest more often.
#[derive(Debug)]
pub struct RandomWalkOracle {
    rng: Mutex<Rng>,
}
impl Default for RandomWalkOracle {
    fn default() -> Self {
        Self {
            rng: Mutex::new(Rng::default()),
        }
    }
}
impl RandomWalkOracle {
    const DEFAULT_PITCH: u8 = 60;
    const NOTE_LENGTHS: [usize; 4] = [1, 2, 2, 4];
    const MAX_LEAP: f64 = 4.0;

    #[allow(missing_docs)]
    pub fn new_with_seed(seed: u128) -> Self {
        Self {
            rng: Mutex::new(Rng::new_with_seed(seed)),
        }
    }
}
impl ContinuationOracle for RandomWalkOracle {
    fn continue_sequence(
        &self,
        seed: &QuantizedSequence,
        steps_to_add: usize,
        temperature: f64,
    ) -> anyhow::Result<QuantizedSequence> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("random-walk state was poisoned"))?;

        let leap = (Self::MAX_LEAP * temperature).round().max(1.0) as i64;
        let rest_chance = (temperature / 8.0).clamp(0.0, 0.5);
        let mut pitch = seed
            .notes()
            .last()
            .map_or(Self::DEFAULT_PITCH, |n| n.pitch) as i64;

        let mut r = QuantizedSequence::empty();
        let mut step = 0;
        while step < steps_to_add {
            let length = Self::NOTE_LENGTHS
                [rng.rand_range(0..Self::NOTE_LENGTHS.len() as u64) as usize]
                .min(steps_to_add - step);
            if rng.rand_float() >= rest_chance {
                pitch = (pitch + rng.rand_i64_in(-leap..=leap)).clamp(0, Note::MAX_PITCH as i64);
                r.add_note(Note::new(pitch as u8, step, step + length))?;
            }
            step += length;
        }
        r.set_total_steps(steps_to_add);
        Ok(r)
    }
}

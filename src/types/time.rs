// Copyright (c) 2024 Mike Tsao

//! Step-grid and pattern time.
//!
//! Sequences live on a grid of steps, four per quarter note. Absolute time is
//! measured in seconds at a reference tempo of 120 quarter notes per minute,
//! so a single pattern page of 32 steps (two 4/4 bars) spans 4.0 time units.

use super::ParameterType;

/// Conversions between quantized steps and absolute pattern time.
pub struct StepTime;
#[allow(missing_docs)]
impl StepTime {
    pub const STEPS_PER_QUARTER: usize = 4;
    pub const REFERENCE_QPM: ParameterType = 120.0;

    /// The number of steps in one pattern page.
    pub const PATTERN_STEPS: usize = 32;

    /// The absolute time spanned by one pattern page.
    pub const PATTERN_TIME: ParameterType = 4.0;

    /// Steps per unit of absolute time at the reference tempo.
    pub const STEPS_PER_TIME_UNIT: ParameterType =
        Self::STEPS_PER_QUARTER as ParameterType * Self::REFERENCE_QPM / 60.0;

    /// Time of a step boundary: `(PATTERN_TIME / PATTERN_STEPS) * step`.
    pub fn step_to_time(step: usize) -> ParameterType {
        (Self::PATTERN_TIME / Self::PATTERN_STEPS as ParameterType) * step as ParameterType
    }

    /// Nearest step for an absolute time. Halves round up, matching the usual
    /// quantizer cutoff of half a step.
    pub fn time_to_step(time: ParameterType) -> usize {
        let steps = (time * Self::STEPS_PER_TIME_UNIT + 0.5).floor();
        if steps <= 0.0 {
            0
        } else {
            steps as usize
        }
    }

    /// Absolute time of `quarters` quarter notes at `qpm`.
    pub fn quarters_to_time(quarters: ParameterType, qpm: ParameterType) -> ParameterType {
        quarters * 60.0 / qpm
    }
}

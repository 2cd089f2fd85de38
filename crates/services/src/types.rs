// Copyright (c) 2024 Mike Tsao

//! Data types shared among services.

use crossbeam::channel::{Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A convenience struct to bundle both halves of a crossbeam channel together.
#[derive(Debug)]
pub struct CrossbeamChannel<T> {
    #[allow(missing_docs)]
    pub sender: Sender<T>,
    #[allow(missing_docs)]
    pub receiver: Receiver<T>,
}
impl<T> Default for CrossbeamChannel<T> {
    fn default() -> Self {
        let (sender, receiver) = crossbeam::channel::unbounded();
        Self { sender, receiver }
    }
}

/// Identifies one generation request so that its events can be matched up
/// with it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub usize);
impl core::fmt::Display for JobId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "job {}", self.0)
    }
}

/// Mints [JobId]s. Safe to share among threads.
#[derive(Debug)]
pub struct JobIdFactory {
    next_id: AtomicUsize,
}
impl Default for JobIdFactory {
    fn default() -> Self {
        Self {
            next_id: AtomicUsize::new(1),
        }
    }
}
impl JobIdFactory {
    /// Generates the next unique [JobId].
    pub fn mint_next(&self) -> JobId {
        JobId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_ids_are_unique() {
        let f = JobIdFactory::default();
        let a = f.mint_next();
        let b = f.mint_next();
        assert_ne!(a, b);
        assert_eq!(a, JobId(1));
        assert_eq!(b.to_string(), "job 2");
    }
}

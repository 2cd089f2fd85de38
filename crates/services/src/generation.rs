// Copyright (c) 2024 Mike Tsao

//! Runs a [ContinuationDriver] on background threads.

use crate::{CrossbeamChannel, JobId, JobIdFactory, ProvidesService};
use crossbeam::channel::{Receiver, Sender};
use duetto::{
    orchestration::{GeneratedVoices, GenerationError, GenerationRequest},
    traits::ContinuationOracle,
    ContinuationDriver, QuantizedSequence,
};
use std::sync::Arc;

/// Everything needed for one generation.
#[derive(Clone, Debug)]
pub struct GenerationJob {
    #[allow(missing_docs)]
    pub id: JobId,
    #[allow(missing_docs)]
    pub primary: QuantizedSequence,
    #[allow(missing_docs)]
    pub secondary: QuantizedSequence,
    #[allow(missing_docs)]
    pub request: GenerationRequest,
}

/// The client sends requests to the service through [GenerationServiceInput]
/// messages.
#[derive(Clone, Debug)]
pub enum GenerationServiceInput {
    /// Start a generation. If one is already running, the job is rejected.
    Generate(GenerationJob),

    /// The app is ready to quit, so the service should end. Generations that
    /// are already running finish, but their events may go unread.
    Quit,
}

/// The service reports to the client through [GenerationServiceEvent]
/// messages.
#[derive(Debug)]
pub enum GenerationServiceEvent {
    /// The job has been handed to a worker.
    Started(JobId),

    /// Fractional progress of a running job.
    Progress(JobId, f64),

    /// The job finished.
    Generated(JobId, GeneratedVoices),

    /// The job failed.
    Failed(JobId, GenerationError),

    /// Another job was still running, so this one never started.
    Rejected(JobId),

    /// The service has processed [GenerationServiceInput::Quit] and will go
    /// away shortly.
    Quit,
}

/// Wraps a [ContinuationDriver] with a crossbeam-channels interface.
#[derive(Debug)]
pub struct GenerationService<O: ContinuationOracle + 'static> {
    inputs: CrossbeamChannel<GenerationServiceInput>,
    events: CrossbeamChannel<GenerationServiceEvent>,
    job_ids: JobIdFactory,

    driver: Arc<ContinuationDriver<O>>,
}
impl<O: ContinuationOracle + 'static>
    ProvidesService<GenerationServiceInput, GenerationServiceEvent> for GenerationService<O>
{
    fn sender(&self) -> &Sender<GenerationServiceInput> {
        &self.inputs.sender
    }

    fn receiver(&self) -> &Receiver<GenerationServiceEvent> {
        &self.events.receiver
    }
}
impl<O: ContinuationOracle + 'static> GenerationService<O> {
    #[allow(missing_docs)]
    pub fn new_with(driver: ContinuationDriver<O>) -> Self {
        let r = Self {
            inputs: Default::default(),
            events: Default::default(),
            job_ids: Default::default(),
            driver: Arc::new(driver),
        };
        r.spawn_thread();
        r
    }

    #[allow(missing_docs)]
    pub fn driver(&self) -> &Arc<ContinuationDriver<O>> {
        &self.driver
    }

    /// Sends a [GenerationServiceInput::Generate] for the given voices and
    /// returns the id its events will carry.
    pub fn submit(
        &self,
        primary: QuantizedSequence,
        secondary: QuantizedSequence,
        request: GenerationRequest,
    ) -> JobId {
        let id = self.job_ids.mint_next();
        self.send_input(GenerationServiceInput::Generate(GenerationJob {
            id,
            primary,
            secondary,
            request,
        }));
        id
    }

    fn spawn_thread(&self) {
        let receiver = self.inputs.receiver.clone();
        let sender = self.events.sender.clone();
        let driver = Arc::clone(&self.driver);
        std::thread::spawn(move || {
            let daemon = GenerationServiceDaemon::new_with(receiver, sender, driver);
            daemon.execute();
        });
    }
}

struct GenerationServiceDaemon<O: ContinuationOracle + 'static> {
    receiver: Receiver<GenerationServiceInput>,
    sender: Sender<GenerationServiceEvent>,
    driver: Arc<ContinuationDriver<O>>,
}
impl<O: ContinuationOracle + 'static> GenerationServiceDaemon<O> {
    fn new_with(
        receiver: Receiver<GenerationServiceInput>,
        sender: Sender<GenerationServiceEvent>,
        driver: Arc<ContinuationDriver<O>>,
    ) -> Self {
        Self {
            receiver,
            sender,
            driver,
        }
    }

    fn execute(&self) {
        while let Ok(input) = self.receiver.recv() {
            match input {
                GenerationServiceInput::Generate(job) => {
                    // A worker that loses the race to the driver's guard
                    // reports Rejected itself.
                    if self.driver.is_generating() {
                        let _ = self.sender.send(GenerationServiceEvent::Rejected(job.id));
                        continue;
                    }
                    self.spawn_worker(job);
                }
                GenerationServiceInput::Quit => {
                    log::debug!("GenerationServiceInput::Quit");
                    let _ = self.sender.send(GenerationServiceEvent::Quit);
                    break;
                }
            }
        }
    }

    fn spawn_worker(&self, job: GenerationJob) {
        let sender = self.sender.clone();
        let driver = Arc::clone(&self.driver);
        let _ = self.sender.send(GenerationServiceEvent::Started(job.id));
        std::thread::spawn(move || {
            let progress_sender = sender.clone();
            let result = driver.generate(&job.primary, &job.secondary, &job.request, &mut |p| {
                let _ = progress_sender.send(GenerationServiceEvent::Progress(job.id, p));
            });
            let event = match result {
                Ok(voices) => GenerationServiceEvent::Generated(job.id, voices),
                Err(GenerationError::Busy) => GenerationServiceEvent::Rejected(job.id),
                Err(e) => GenerationServiceEvent::Failed(job.id, e),
            };
            let _ = sender.send(event);
        });
    }
}

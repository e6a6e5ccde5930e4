//! Dedicated input thread.
//!
//! OS input handles are not `Send` on every platform (macOS CoreGraphics
//! sources, X11 display connections), and typing text with a per-character
//! interval blocks for a while.  Neither belongs on a Tokio worker thread.
//!
//! [`InputWorker::spawn`] starts one named OS thread that builds the emulator
//! from a factory closure *on that thread* and then runs every event through a
//! [`DispatchInputUseCase`] in the order the jobs arrive.  Session tasks hold
//! cheap clones of the handle and `await` each dispatch, which keeps events
//! from one controller strictly ordered.
//!
//! The thread exits once every [`InputWorker`] handle has been dropped.

use std::io;
use std::sync::mpsc;
use std::thread;

use remote_input_core::RemoteEvent;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::application::{
    DispatchInputUseCase, DispatchOutcome, EmulationError, PlatformInputEmulator,
};
use crate::domain::DispatchSettings;

/// Errors returned by [`InputWorker`].
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The emulator could not be created or failed to inject an event.
    #[error(transparent)]
    Emulation(#[from] EmulationError),

    /// The input thread is gone; no further events can be dispatched.
    #[error("input worker has stopped")]
    Stopped,

    /// The OS refused to start the input thread.
    #[error("failed to spawn input thread: {0}")]
    Spawn(#[source] io::Error),
}

struct Job {
    event: RemoteEvent,
    reply: oneshot::Sender<Result<DispatchOutcome, EmulationError>>,
}

/// Handle to the input thread.  Clone freely; all clones feed the same queue.
#[derive(Clone)]
pub struct InputWorker {
    jobs: mpsc::Sender<Job>,
}

impl InputWorker {
    /// Starts the input thread and waits until the emulator is ready.
    ///
    /// `factory` runs on the new thread, so the emulator it returns never
    /// crosses a thread boundary.
    ///
    /// # Errors
    ///
    /// - [`WorkerError::Spawn`] if the thread cannot be started.
    /// - [`WorkerError::Emulation`] if `factory` fails.
    /// - [`WorkerError::Stopped`] if the thread dies before reporting back.
    pub fn spawn<F>(factory: F, settings: DispatchSettings) -> Result<Self, WorkerError>
    where
        F: FnOnce() -> Result<Box<dyn PlatformInputEmulator>, EmulationError> + Send + 'static,
    {
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), EmulationError>>(1);

        thread::Builder::new()
            .name("input-worker".to_string())
            .spawn(move || {
                let emulator = match factory() {
                    Ok(emulator) => emulator,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                run_jobs(DispatchInputUseCase::new(emulator, settings), jobs_rx);
            })
            .map_err(WorkerError::Spawn)?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!(
                    pointer_scale = settings.pointer_scale,
                    invert_scroll = settings.invert_scroll,
                    max_text_chars = settings.max_text_chars,
                    "input worker started"
                );
                Ok(Self { jobs: jobs_tx })
            }
            Ok(Err(e)) => Err(WorkerError::Emulation(e)),
            Err(_) => Err(WorkerError::Stopped),
        }
    }

    /// Queues one event and waits for the OS call to finish.
    ///
    /// # Errors
    ///
    /// - [`WorkerError::Emulation`] if the emulator reported a failure.
    /// - [`WorkerError::Stopped`] if the input thread has exited.
    pub async fn dispatch(&self, event: RemoteEvent) -> Result<DispatchOutcome, WorkerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.jobs
            .send(Job {
                event,
                reply: reply_tx,
            })
            .map_err(|_| WorkerError::Stopped)?;

        let outcome = reply_rx.await.map_err(|_| WorkerError::Stopped)??;
        Ok(outcome)
    }
}

fn run_jobs(mut use_case: DispatchInputUseCase, jobs: mpsc::Receiver<Job>) {
    while let Ok(job) = jobs.recv() {
        let result = use_case.dispatch(&job.event);
        match &result {
            Ok(DispatchOutcome::Injected) => debug!(event = job.event.name(), "input injected"),
            Ok(DispatchOutcome::Skipped(reason)) => {
                debug!(event = job.event.name(), ?reason, "input skipped");
            }
            Err(e) => warn!(event = job.event.name(), "input injection failed: {e}"),
        }
        // The session may have gone away while we were busy; that is fine.
        let _ = job.reply.send(result);
    }
    debug!("all input worker handles dropped; input thread exiting");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

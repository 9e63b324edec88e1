//! Runs submissions and preview decoding off the UI thread and hands the
//! results back over a channel.

use crate::client::Classify;
use crate::error::PredictError;
use crate::selection::{Preview, SelectedFile};
use crate::workflow::{Outcome, Submission};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
#[cfg(test)]
use std::time::Duration;

/// Called after an event is queued, from whichever thread queued it.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Something finished in the background.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Settled(Outcome),
    Preview { generation: u64, preview: Preview },
}

pub struct Dispatcher {
    classifier: Arc<dyn Classify>,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
    waker: Option<Waker>,
}

impl Dispatcher {
    pub fn new(classifier: Arc<dyn Classify>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            classifier,
            tx,
            rx,
            waker: None,
        }
    }

    /// Lets the worker wake an idle event loop, e.g. `egui::Context::request_repaint`.
    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    /// Starts the request in the background. Never blocks.
    pub fn submit(&self, submission: Submission) {
        let classifier = Arc::clone(&self.classifier);
        let generation = submission.generation;

        let spawned = self.spawn_job(format!("classify-{generation}"), move || {
            let result = classifier.classify(&submission.endpoint, &submission.file);
            Some(WorkerEvent::Settled(Outcome { generation, result }))
        });

        if let Err(e) = spawned {
            tracing::error!("Failed to start classification worker: {e}");
            deliver(
                &self.tx,
                self.waker.as_ref(),
                WorkerEvent::Settled(Outcome {
                    generation,
                    result: Err(PredictError::Transport(e.to_string())),
                }),
            );
        }
    }

    /// Decodes the thumbnail for `file` in the background.
    ///
    /// Large camera images take a noticeable time to decode; the card shows the
    /// file name until the preview arrives. Undecodable files simply get none.
    pub fn decode_preview(&self, generation: u64, file: &SelectedFile) {
        let name = file.name.clone();
        let bytes = file.bytes.clone();
        let spawned = self.spawn_job(format!("preview-{generation}"), move || {
            match Preview::decode(&bytes) {
                Ok(preview) => Some(WorkerEvent::Preview {
                    generation,
                    preview,
                }),
                Err(e) => {
                    tracing::warn!("No preview for {name}: {e:#}");
                    None
                }
            }
        });
        if let Err(e) = spawned {
            tracing::warn!("Failed to start preview worker: {e}");
        }
    }

    fn spawn_job<F>(&self, name: String, job: F) -> std::io::Result<()>
    where
        F: FnOnce() -> Option<WorkerEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        thread::Builder::new().name(name).spawn(move || {
            if let Some(event) = job() {
                deliver(&tx, waker.as_ref(), event);
            }
        })?;
        Ok(())
    }

    /// Events that arrived since the last call, oldest first.
    pub fn drain(&self) -> Vec<WorkerEvent> {
        self.rx.try_iter().collect()
    }

    /// Blocks up to `timeout` for the next event.
    #[cfg(test)]
    pub(crate) fn wait(&self, timeout: Duration) -> Option<WorkerEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Queues `event` and wakes the event loop so it is picked up without further input.
fn deliver(tx: &Sender<WorkerEvent>, waker: Option<&Waker>, event: WorkerEvent) {
    // Receiver gone means the app is shutting down.
    if tx.send(event).is_ok()
        && let Some(wake) = waker
    {
        wake();
    }
}

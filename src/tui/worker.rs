//! Background prediction worker for non-blocking HTTP calls.
//!
//! The request blocks for up to the configured timeout, so it runs on its own
//! thread and reports back over a channel the UI loop polls every frame.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::{PredictionClient, PredictionError};
use crate::domain::{FeatureValues, PredictionResponse};
use crate::ports::PredictionTransport;

/// Progress updates from the prediction worker.
#[derive(Debug, Clone)]
pub enum PredictionProgress {
    /// Request is being sent
    Submitting,
    /// Prediction received and decoded
    Complete(PredictionResponse),
    /// Request failed; the form stays as it was
    Failed(PredictionError),
}

/// Handle to a running prediction worker.
pub struct PredictionWorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<PredictionProgress>,
    _handle: JoinHandle<()>,
}

impl PredictionWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    ///
    /// A worker that exits without reporting is surfaced as a failure so the
    /// caller can always close its submission.
    #[must_use]
    pub fn try_recv(&self) -> Option<PredictionProgress> {
        match self.progress_rx.try_recv() {
            Ok(progress) => Some(progress),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("Prediction worker exited without a result");
                Some(PredictionProgress::Failed(PredictionError::Transport {
                    detail: "worker exited".to_string(),
                }))
            }
        }
    }
}

/// Worker that sends one prediction request in the background.
pub struct PredictionWorker;

impl PredictionWorker {
    /// Spawn a background request for `values`.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn<T>(client: Arc<PredictionClient<T>>, values: FeatureValues) -> PredictionWorkerHandle
    where
        T: PredictionTransport + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run(&client, &values, &tx);
        });

        PredictionWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run<T: PredictionTransport>(
        client: &PredictionClient<T>,
        values: &FeatureValues,
        tx: &Sender<PredictionProgress>,
    ) {
        let _ = tx.send(PredictionProgress::Submitting);

        let progress = match client.submit(values) {
            Ok(response) => PredictionProgress::Complete(response),
            Err(e) => PredictionProgress::Failed(e),
        };
        let _ = tx.send(progress);
    }
}

use std::sync::mpsc;
use crate::train::epoch_stats::TrainEvent;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`      — total number of full passes over the training data
/// - `progress_tx` — optional channel sender; one `TrainEvent::Epoch` is sent
///                   per completed epoch and a `TrainEvent::Finished` at the
///                   end. A dropped receiver does not stop training.
pub struct TrainConfig {
    pub epochs: usize,
    pub progress_tx: Option<mpsc::Sender<TrainEvent>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with no progress channel.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            progress_tx: None,
        }
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<TrainEvent>) -> Self {
        self.progress_tx = Some(tx);
        self
    }
}

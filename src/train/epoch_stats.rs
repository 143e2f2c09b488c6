use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean total squared error over all samples, each measured right after
    /// that sample's update.
    pub avg_cost: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Summary of a whole `train_loop` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub epochs: usize,
    pub elapsed_ms: u64,
    /// `elapsed_ms / epochs`, or 0 when no epoch ran.
    pub avg_epoch_ms: u64,
    /// Average cost of the last epoch, `None` when no epoch ran.
    pub final_cost: Option<f64>,
}

/// Progress notification sent through `TrainConfig::progress_tx`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrainEvent {
    Epoch(EpochStats),
    Finished(TrainingSummary),
}

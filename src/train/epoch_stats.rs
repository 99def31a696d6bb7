use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the
/// training loop sends one `EpochStats` value at the end of every completed
/// epoch. Receivers use this to drive progress displays or charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all examples processed in this epoch.
    pub train_loss: f64,
    /// Training accuracy as a fraction in [0, 1], from an inference pass
    /// over the same batches after the epoch's updates.
    pub train_accuracy: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

use serde::{Serialize, Deserialize};

/// Progress of the training loop after one `learn` call.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, `train_loop`
/// sends one value per completed step; front ends read it to display loss,
/// accuracy and elapsed time without touching the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainStats {
    /// 1-based count of completed `learn` calls.
    pub iteration: usize,
    /// Average cost over the training set after this step.
    pub loss: f64,
    /// Samples whose argmax prediction matches the label.
    pub correct: usize,
    pub total: usize,
    /// `correct / total`, in [0, 1].
    pub accuracy: f64,
    /// Wall-clock duration of this step in milliseconds.
    pub step_ms: u64,
    /// Milliseconds since the loop started.
    pub elapsed_ms: u64,
}

/// What `train_loop` returns once it stops.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
    pub iterations: usize,
    pub last: Option<TrainStats>,
    pub elapsed_ms: u64,
    /// True when the stop flag (or a dropped progress receiver) ended the
    /// loop rather than `max_iterations`.
    pub was_stopped: bool,
}

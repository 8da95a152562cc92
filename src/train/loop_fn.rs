use std::time::Instant;

use log::{debug, info};

use crate::data::training_data::TrainingData;
use crate::error::{Error, Result};
use crate::network::shared::{self, SharedNetwork};
use crate::train::train_config::TrainConfig;
use crate::train::train_stats::{TrainStats, TrainSummary};

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Calls `Network::learn` on the shared network until told to stop.
///
/// Each step holds the network lock for the whole learn-and-measure cycle,
/// so checkpoint saves and interactive edits never observe a half-applied
/// step.
///
/// # Termination
/// The loop ends, always between two steps, when:
/// - `config.stop_flag` is set, **or**
/// - `config.max_iterations` steps have completed, **or**
/// - the `progress_tx` receiver has been dropped.
///
/// # Errors
/// Fails up front on an invalid config or an empty dataset, and propagates
/// any shape mismatch between the data and the network.
pub fn train_loop(
    network: &SharedNetwork,
    data: &[TrainingData],
    config: &TrainConfig,
) -> Result<TrainSummary> {
    config.validate()?;
    if data.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let started = Instant::now();
    let mut iteration = 0;
    let mut last = None;
    let mut was_stopped = false;

    loop {
        if config.should_stop() {
            was_stopped = true;
            break;
        }
        if config.max_iterations.map_or(false, |max| iteration >= max) {
            break;
        }

        let stats = run_one_step(network, data, config.learn_rate, iteration + 1, started)?;
        iteration += 1;
        debug!(
            "iteration {}: loss={:.6} correct={}/{} ({} ms)",
            stats.iteration, stats.loss, stats.correct, stats.total, stats.step_ms
        );
        last = Some(stats.clone());

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                was_stopped = true;
                break;
            }
        }
    }

    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        "training stopped after {} iterations in {} ms (loss {})",
        iteration,
        elapsed_ms,
        last.as_ref().map_or_else(|| "n/a".to_owned(), |s| format!("{:.6}", s.loss)),
    );

    Ok(TrainSummary { iterations: iteration, last, elapsed_ms, was_stopped })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One learn call plus the post-step loss and accuracy, under one lock.
fn run_one_step(
    network: &SharedNetwork,
    data: &[TrainingData],
    learn_rate: f64,
    iteration: usize,
    started: Instant,
) -> Result<TrainStats> {
    let t_start = Instant::now();
    let mut network = shared::lock(network);

    network.learn(data, learn_rate)?;
    let loss = network.average_cost(data)?;
    let correct = network.test(data)?;

    Ok(TrainStats {
        iteration,
        loss,
        correct,
        total: data.len(),
        accuracy: correct as f64 / data.len() as f64,
        step_ms: t_start.elapsed().as_millis() as u64,
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}

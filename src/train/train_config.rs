use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::train::train_stats::TrainStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `learn_rate`          — multiplier applied to every gradient estimate
/// - `checkpoint_interval` — pause between checkpoint saves
/// - `checkpoint_dir`      — directory checkpoints are written to
/// - `max_iterations`      — optional cap on `learn` calls; `None` runs until stopped
/// - `progress_tx`         — optional channel; one `TrainStats` per step.  If the
///                           receiver is dropped the loop terminates.
/// - `stop_flag`           — optional atomic flag; when set from another thread
///                           the loop terminates before the next step.
pub struct TrainConfig {
    pub learn_rate: f64,
    pub checkpoint_interval: Duration,
    pub checkpoint_dir: PathBuf,
    pub max_iterations: Option<usize>,
    pub progress_tx: Option<mpsc::Sender<TrainStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// A config with a ten-minute checkpoint interval into `checkpoints/`,
    /// no iteration cap, no progress channel and no stop flag.
    pub fn new(learn_rate: f64) -> Self {
        TrainConfig {
            learn_rate,
            checkpoint_interval: Duration::from_secs(10 * 60),
            checkpoint_dir: default_checkpoint_dir(),
            max_iterations: None,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn from_settings(settings: &TrainSettings) -> Result<Self> {
        settings.validate()?;
        Ok(TrainConfig {
            learn_rate: settings.learn_rate,
            checkpoint_interval: interval_from_minutes(settings.checkpoint_minutes)?,
            checkpoint_dir: settings.checkpoint_dir.clone(),
            max_iterations: settings.max_iterations,
            progress_tx: None,
            stop_flag: None,
        })
    }

    pub fn validate(&self) -> Result<()> {
        validate_learn_rate(self.learn_rate)?;
        if self.checkpoint_interval.is_zero() {
            return Err(Error::InvalidConfig("checkpoint interval must be positive".into()));
        }
        Ok(())
    }

    pub fn should_stop(&self) -> bool {
        self.stop_flag.as_ref().map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}

/// The on-disk form of the training parameters the console otherwise asks for.
///
/// ```json
/// { "learn_rate": 0.5, "checkpoint_minutes": 5, "checkpoint_dir": "checkpoints" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSettings {
    pub learn_rate: f64,
    pub checkpoint_minutes: u64,
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

impl TrainSettings {
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainSettings> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let settings: TrainSettings = serde_json::from_reader(reader)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        validate_learn_rate(self.learn_rate)?;
        if self.checkpoint_minutes == 0 {
            return Err(Error::InvalidConfig("checkpoint_minutes must be at least 1".into()));
        }
        interval_from_minutes(self.checkpoint_minutes)?;
        Ok(())
    }
}

/// Minutes to a `Duration`, rejecting counts whose seconds overflow `u64`.
pub fn interval_from_minutes(minutes: u64) -> Result<Duration> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| Error::InvalidConfig(format!("checkpoint interval of {} minutes is too long", minutes)))
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from("checkpoints")
}

fn validate_learn_rate(learn_rate: f64) -> Result<()> {
    if !(learn_rate.is_finite() && learn_rate > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "learn rate must be a positive number, got {}",
            learn_rate
        )));
    }
    Ok(())
}

// Console front end: create or load a network, pick a dataset, then train
// until Enter is pressed, checkpointing in the background.
//
// Run with:
//   cargo run --release
//   cargo run --release -- --config settings.json
//
// Log verbosity follows RUST_LOG (default: info).

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc, atomic::{AtomicBool, Ordering}};
use std::thread::{self, JoinHandle};

use log::{error, info, warn};

use slope_nn::data::{idx, iris, max_per_dimension, samples};
use slope_nn::network::shared;
use slope_nn::prompt::{Prompter, MAX_ATTEMPTS};
use slope_nn::train::train_config::interval_from_minutes;
use slope_nn::{
    train_loop, Checkpointer, Error, Network, Result, TrainConfig, TrainSettings, TrainingData,
};

/// Pixel values in IDX files are single unsigned bytes.
const PIXEL_MAX: f64 = u8::MAX as f64;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let settings = match config_arg()? {
        Some(path) => Some(TrainSettings::load_json(path)?),
        None => None,
    };

    let stdin = io::stdin();
    let mut prompt = Prompter::new(stdin.lock(), io::stdout());

    let network = choose_network(&mut prompt)?;
    let data = choose_dataset(&mut prompt, &network)?;

    let config = match settings {
        Some(settings) => TrainConfig::from_settings(&settings)?,
        None => {
            let mut config = TrainConfig::new(prompt.ask_positive_f64("Set a learn rate:")?);
            config.checkpoint_interval = prompt.ask_with("Set a saving interval (in minutes)", |line| {
                line.parse::<u64>()
                    .ok()
                    .filter(|&minutes| minutes > 0)
                    .and_then(|minutes| interval_from_minutes(minutes).ok())
            })?;
            config
        }
    };
    prompt.say(&format!(
        "Training data: {}\nLearn rate: {}\nSave interval: every {} minutes",
        data.len(),
        config.learn_rate,
        config.checkpoint_interval.as_secs() / 60,
    ))?;
    drop(prompt);

    train(network, data, config)
}

/// `--config <path>` is the only recognised argument.
fn config_arg() -> Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => Ok(None),
        Some("--config") => args.next()
            .map(|p| Some(PathBuf::from(p)))
            .ok_or_else(|| Error::InvalidConfig("--config needs a path".into())),
        Some(other) => Err(Error::InvalidConfig(format!("unknown argument '{}'", other))),
    }
}

fn choose_network<R: BufRead, W: Write>(prompt: &mut Prompter<R, W>) -> Result<Network> {
    let action = prompt.ask_choice("Choose:\n(1) Create network\n(2) Load network", 2)?;
    if action == 1 {
        let network = Network::from_layer_sizes(&prompt.ask_layer_sizes()?)?;
        prompt.say("Created network!")?;
        return Ok(network);
    }

    for _ in 0..MAX_ATTEMPTS {
        let path = prompt.ask_line("Path of the saved network:")?;
        match Network::load_json(&path) {
            Ok(network) => {
                prompt.say(&format!("Loaded network with layer sizes {:?}", network.layer_sizes()))?;
                return Ok(network);
            }
            Err(e) => warn!("could not load '{}': {}", path, e),
        }
    }
    Err(Error::InvalidInput("no network could be loaded".into()))
}

fn choose_dataset<R: BufRead, W: Write>(
    prompt: &mut Prompter<R, W>,
    network: &Network,
) -> Result<Vec<TrainingData>> {
    let n_classes = network.output_size();
    let action = prompt.ask_choice(
        "Dataset:\n(1) XOR\n(2) Point samples (x|y|class)\n(3) Iris CSV\n(4) IDX images + labels",
        4,
    )?;

    let data = match action {
        1 => samples::builtin_xor(),
        2 => {
            let path = prompt.ask_line("Path of the sample file:")?;
            let raw = samples::load_samples(path, n_classes)?;
            Network::normalize_set(&raw, &max_per_dimension(&raw))?
        }
        3 => {
            let path = prompt.ask_line("Path of the iris file:")?;
            let raw = iris::load_iris(path)?;
            Network::normalize_set(&raw, &max_per_dimension(&raw))?
        }
        _ => {
            let images = prompt.ask_line("Path of the IDX image file:")?;
            let labels = prompt.ask_line("Path of the IDX label file:")?;
            let limit = prompt.ask_positive_u64("How many samples to train on?")? as usize;
            let mut raw = idx::load_idx_pair(images, labels, n_classes)?;
            raw.truncate(limit);
            let max = vec![PIXEL_MAX; network.inputs()];
            Network::normalize_set(&raw, &max)?
        }
    };

    match data.first() {
        None => Err(Error::EmptyDataset),
        Some(sample) if sample.inputs.len() != network.inputs() => Err(Error::SizeMismatch {
            expected: network.inputs(),
            actual: sample.inputs.len(),
        }),
        Some(sample) if sample.outputs.len() != network.output_size() => Err(Error::SizeMismatch {
            expected: network.output_size(),
            actual: sample.outputs.len(),
        }),
        Some(_) => Ok(data),
    }
}

fn train(network: Network, data: Vec<TrainingData>, mut config: TrainConfig) -> Result<()> {
    let network = shared::share(network);
    let stop_flag = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();
    config.progress_tx = Some(tx);
    config.stop_flag = Some(stop_flag.clone());

    let checkpointer = Checkpointer::spawn(
        network.clone(),
        config.checkpoint_dir.clone(),
        config.checkpoint_interval,
        stop_flag.clone(),
    )?;
    let final_path = config.checkpoint_dir.join("final.json");

    let trainer = {
        let network = network.clone();
        thread::Builder::new()
            .name("train".into())
            .spawn(move || {
                let result = train_loop(&network, &data, &config);
                if let Err(e) = &result {
                    error!("training failed: {}", e);
                }
                if !config.should_stop() {
                    println!("Training ended. Press Enter to exit.");
                }
                result
            })?
    };
    let reporter = thread::spawn(move || {
        for stats in rx {
            info!(
                "iteration {} | loss {:.6} | correct {}/{} ({:.2}%) | {} ms",
                stats.iteration,
                stats.loss,
                stats.correct,
                stats.total,
                stats.accuracy * 100.0,
                stats.elapsed_ms,
            );
        }
    });

    println!("Starting! Press Enter to stop.");
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    stop_flag.store(true, Ordering::Relaxed);

    let summary = match trainer.join() {
        Ok(summary) => summary,
        Err(panic) => std::panic::resume_unwind(panic),
    };
    let written = checkpointer.join();
    join_or_log(reporter, "progress reporter");

    shared::lock(&network).save_json(&final_path)?;
    let summary = summary?;
    info!(
        "{} iterations, {} checkpoints, final network saved to {}",
        summary.iterations,
        written,
        final_path.display()
    );
    Ok(())
}

/// Joins a helper thread whose panic should not abort shutdown.
fn join_or_log<T>(handle: JoinHandle<T>, name: &str) -> Option<T> {
    match handle.join() {
        Ok(value) => Some(value),
        Err(_) => {
            error!("{} thread panicked", name);
            None
        }
    }
}

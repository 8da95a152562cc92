use std::path::{Path, PathBuf};
use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::{info, warn};

use crate::error::Result;
use crate::network::shared::{self, SharedNetwork};

/// How often a waiting checkpointer looks at its stop flag.
const TICK: Duration = Duration::from_millis(50);

/// Background thread that saves the shared network every `interval`.
///
/// Files are named `<unix-millis>.json` inside the checkpoint directory. The
/// stop flag is honoured while waiting; a save that has already started is
/// finished first.
pub struct Checkpointer {
    handle: JoinHandle<usize>,
}

impl Checkpointer {
    pub fn spawn(
        network: SharedNetwork,
        dir: impl Into<PathBuf>,
        interval: Duration,
        stop_flag: Arc<AtomicBool>,
    ) -> Result<Checkpointer> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let handle = thread::Builder::new()
            .name("checkpoint".into())
            .spawn(move || run(network, dir, interval, stop_flag))?;
        Ok(Checkpointer { handle })
    }

    /// Waits for the thread to exit and returns how many checkpoints it wrote.
    pub fn join(self) -> usize {
        match self.handle.join() {
            Ok(written) => written,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

fn run(network: SharedNetwork, dir: PathBuf, interval: Duration, stop_flag: Arc<AtomicBool>) -> usize {
    let mut written = 0;
    while wait(interval, &stop_flag) {
        // Snapshot under the lock, write without it.
        let snapshot = shared::lock(&network).clone();
        let path = checkpoint_path(&dir);
        match snapshot.save_json(&path) {
            Ok(()) => {
                written += 1;
                info!("saved checkpoint {}", path.display());
            }
            Err(e) => warn!("could not save checkpoint {}: {}", path.display(), e),
        }
    }
    written
}

/// Sleeps for `interval` in ticks. Returns false as soon as the flag is set.
/// An interval past the end of `Instant`'s range only ends through the flag.
fn wait(interval: Duration, stop_flag: &AtomicBool) -> bool {
    let deadline = Instant::now().checked_add(interval);
    loop {
        if stop_flag.load(Ordering::Relaxed) {
            return false;
        }
        let tick = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return true;
                }
                TICK.min(deadline - now)
            }
            None => TICK,
        };
        thread::sleep(tick);
    }
}

pub fn checkpoint_path(dir: &Path) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    dir.join(format!("{}.json", millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_returns_false_once_stopped() {
        let flag = AtomicBool::new(true);
        assert!(!wait(Duration::from_secs(60), &flag));
        flag.store(false, Ordering::Relaxed);
        assert!(wait(Duration::from_millis(1), &flag));
    }

    #[test]
    fn unreachable_deadline_waits_for_the_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let setter = {
            let flag = flag.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                flag.store(true, Ordering::Relaxed);
            })
        };
        assert!(!wait(Duration::MAX, &flag));
        setter.join().unwrap();
    }

    #[test]
    fn checkpoint_names_are_json_in_dir() {
        let path = checkpoint_path(Path::new("ckpt"));
        assert_eq!(path.parent(), Some(Path::new("ckpt")));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }
}

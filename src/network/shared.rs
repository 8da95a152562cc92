use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::network::network::Network;

/// A network shared between the training loop, the checkpointer and any
/// interactive editor. The lock serializes `learn`, saves and parameter edits.
pub type SharedNetwork = Arc<Mutex<Network>>;

pub fn share(network: Network) -> SharedNetwork {
    Arc::new(Mutex::new(network))
}

/// Locks the network, recovering from poisoning. Parameters only change in
/// the apply step of `learn` or through `set_param`, neither of which panics
/// halfway through.
pub fn lock(network: &SharedNetwork) -> MutexGuard<'_, Network> {
    network.lock().unwrap_or_else(PoisonError::into_inner)
}

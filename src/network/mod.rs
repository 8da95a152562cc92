pub mod network;
pub mod params;
pub mod shared;

pub use network::Network;
pub use params::{ParamId, ParamSlot};
pub use shared::SharedNetwork;

//! Teleport-chest network
//!
//! Named chest nodes whose volumes open/close a lid and arm delayed
//! teleports to a uniformly-chosen other chest, with a destination lockout
//! preventing immediate back-teleport loops. Everything is driven by host
//! callbacks; the only cross-chest state is the shared lockout table.

pub mod chest;
pub mod lockout;
pub mod network;

pub use chest::{Chest, ChestState};
pub use lockout::LockoutTable;
pub use network::{ChestConfig, RegisterError, TeleportNetwork, ACTOR_TAG, NETWORK_TAG, TARGET_NAME};

//! # Apiary World
//!
//! The shared world state of the colony. Two surfaces here are touched by
//! more than one task and carry the real synchronization obligations:
//!
//! - the [queen's chamber](chamber::QueensChamber) - a strictly-FIFO
//!   rendezvous where drones block until the queen summons them or the
//!   shutdown drain dismisses them, and
//! - the [stores](stores::Stores) - the paired nectar/pollen counters whose
//!   check-and-claim must be atomic per rearing attempt.
//!
//! Everything else ([`registry::BeeRegistry`], the event channel, the
//! lifecycle flags) is bookkeeping the [`hive::Hive`] facade coordinates.
//!
//! ## Module Organization
//!
//! - [`chamber`]: the mating rendezvous monitor
//! - [`stores`]: nectar and pollen accounting
//! - [`registry`]: live/perished bee accounting
//! - [`hive`]: the facade owning all of the above
//! - [`errors`]: error types for world operations

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chamber;
pub mod errors;
pub mod hive;
pub mod registry;
pub mod stores;

// Re-export commonly used types
pub use chamber::QueensChamber;
pub use errors::{HiveError, HiveResult};
pub use hive::{Hive, HiveStats};
pub use registry::{BeeRegistry, RegistryStats};
pub use stores::{StoreLevels, Stores};

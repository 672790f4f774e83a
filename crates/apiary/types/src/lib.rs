//! # Apiary Types
//!
//! Core types for Apiary - a concurrent honey-bee colony simulation.
//!
//! The colony is a population of independently-running bees sharing two
//! synchronized surfaces: the queen's chamber (where drones queue for the
//! mating ritual) and the stores (the nectar and pollen that gate every new
//! bee the queen rears).
//!
//! ## Module Organization
//!
//! - [`bee`]: bee identity, castes, and the drone entity
//! - [`config`]: colony configuration and validation
//! - [`event`]: observable hive events
//!
//! Run loops and the shared world state live in the `apiary-world` and
//! `apiary-runtime` crates; this crate stays dependency-light so both can
//! share it.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bee;
pub mod config;
pub mod event;

// Re-export commonly used types
pub use bee::{BeeId, BeeRole, Drone, FieldResource};
pub use config::HiveConfig;
pub use event::HiveEvent;

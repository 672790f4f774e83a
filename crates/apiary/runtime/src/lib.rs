//! # Apiary Runtime
//!
//! The run loops that bring a hive to life. Every bee is one tokio task
//! holding explicit references to the shared world state - the hive, its
//! chamber, and its stores - rather than any inherited ambient state:
//!
//! - the [queen](queen::Queen) summons waiting drones, rears brood gated by
//!   the stores, and drains the chamber on her way out,
//! - a [drone](drone) enters the chamber once and either mates (and
//!   perishes) or survives to shutdown,
//! - a [worker](worker) forages one resource, trip after trip.
//!
//! The [`Simulation`](simulation::Simulation) driver seeds the population,
//! lets the colony run, and shuts it down without leaving any task blocked.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod drone;
pub mod queen;
pub mod simulation;
pub mod worker;

// Re-export commonly used types
pub use queen::Queen;
pub use simulation::{Simulation, Spawner};

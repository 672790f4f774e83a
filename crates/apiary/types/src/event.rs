//! Observable hive events.
//!
//! The hive publishes these over a broadcast channel so tests and front ends
//! can verify colony behaviour without scraping log output. Exactly one
//! [`HiveEvent::DronePerished`] is published per mated drone and exactly one
//! [`HiveEvent::BroodReared`] per completed mating session.

use crate::bee::{BeeId, BeeRole};
use serde::{Deserialize, Serialize};

/// Something observable happened in the hive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiveEvent {
    /// A bee was registered with the hive.
    BeeSpawned {
        /// The new bee.
        bee: BeeId,
        /// Its caste.
        role: BeeRole,
    },
    /// A drone mated and perished.
    DronePerished {
        /// The perished drone.
        bee: BeeId,
    },
    /// A mating session finished rearing its brood.
    ///
    /// `reared` may fall short of `requested` when the stores ran dry
    /// partway through the session.
    BroodReared {
        /// Brood slots the queen drew for the session.
        requested: u32,
        /// Bees actually reared.
        reared: u32,
    },
}

//! Colony configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one hive.
///
/// Durations are in milliseconds. Validation lives here rather than at the
/// use sites so every hive, including the ones tests construct directly, is
/// checked the same way.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HiveConfig {
    /// Units of nectar in the stores at startup.
    pub initial_nectar: u64,
    /// Units of pollen in the stores at startup.
    pub initial_pollen: u64,
    /// Drones waiting outside the chamber at startup.
    pub initial_drones: usize,
    /// Workers per resource (nectar and pollen each) at startup.
    pub initial_workers_per_resource: usize,
    /// How long the queen and a drone mate.
    pub mate_time_ms: u64,
    /// The queen's rest between mating sessions.
    pub rest_time_ms: u64,
    /// One worker foraging trip, field and back.
    pub gather_time_ms: u64,
    /// Smallest brood a mating session can produce.
    pub min_brood: u32,
    /// Largest brood a mating session can produce.
    pub max_brood: u32,
}

impl Default for HiveConfig {
    fn default() -> Self {
        Self {
            initial_nectar: 10,
            initial_pollen: 10,
            initial_drones: 4,
            initial_workers_per_resource: 2,
            mate_time_ms: 1000,
            rest_time_ms: 1000,
            gather_time_ms: 1500,
            min_brood: 1,
            max_brood: 4,
        }
    }
}

impl HiveConfig {
    /// A small, fast colony for tests.
    pub fn test_hive() -> Self {
        Self {
            initial_nectar: 2,
            initial_pollen: 2,
            initial_drones: 1,
            initial_workers_per_resource: 0,
            mate_time_ms: 10,
            rest_time_ms: 10,
            gather_time_ms: 10,
            min_brood: 1,
            max_brood: 4,
        }
    }

    /// Check the configuration for contradictions.
    ///
    /// Returns a human-readable reason on the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_brood == 0 {
            return Err("min_brood must be at least 1".to_string());
        }
        if self.min_brood > self.max_brood {
            return Err(format!(
                "min_brood ({}) exceeds max_brood ({})",
                self.min_brood, self.max_brood
            ));
        }
        Ok(())
    }

    /// Mating duration as a [`Duration`].
    pub fn mate_time(&self) -> Duration {
        Duration::from_millis(self.mate_time_ms)
    }

    /// Inter-session rest as a [`Duration`].
    pub fn rest_time(&self) -> Duration {
        Duration::from_millis(self.rest_time_ms)
    }

    /// Foraging trip as a [`Duration`].
    pub fn gather_time(&self) -> Duration {
        Duration::from_millis(self.gather_time_ms)
    }
}

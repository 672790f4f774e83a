//! Live/perished bee accounting.
//!
//! The registry hands out [`BeeId`]s and tracks which bees are currently
//! alive. It is plain single-threaded state; the [`Hive`](crate::hive::Hive)
//! owns it behind a lock.

use crate::errors::{HiveError, HiveResult};
use apiary_types::{BeeId, BeeRole};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// What the registry knows about one live bee.
#[derive(Clone, Debug)]
pub struct BeeRecord {
    /// The bee's caste.
    pub role: BeeRole,
    /// When the bee was registered.
    pub spawned_at: DateTime<Utc>,
}

/// Registry of all live bees in the hive.
#[derive(Debug, Default)]
pub struct BeeRegistry {
    bees: HashMap<BeeId, BeeRecord>,
    next_number: u64,
    total_spawned: u64,
    total_perished: u64,
}

impl BeeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new bee and assign it the next identity.
    pub fn register(&mut self, role: BeeRole) -> BeeId {
        self.next_number += 1;
        let id = BeeId::new(self.next_number);
        self.bees.insert(
            id,
            BeeRecord {
                role,
                spawned_at: Utc::now(),
            },
        );
        self.total_spawned += 1;
        id
    }

    /// Remove a perished bee.
    ///
    /// # Errors
    ///
    /// [`HiveError::UnknownBee`] if the bee is not registered (already
    /// perished, or never existed).
    pub fn perish(&mut self, id: BeeId) -> HiveResult<BeeRecord> {
        let record = self.bees.remove(&id).ok_or(HiveError::UnknownBee(id))?;
        self.total_perished += 1;
        Ok(record)
    }

    /// Look up a live bee.
    pub fn get(&self, id: BeeId) -> Option<&BeeRecord> {
        self.bees.get(&id)
    }

    /// Whether a bee is currently alive.
    pub fn is_alive(&self, id: BeeId) -> bool {
        self.bees.contains_key(&id)
    }

    /// Number of live bees.
    pub fn live_count(&self) -> usize {
        self.bees.len()
    }

    /// Number of live bees of one caste.
    pub fn count_by_role(&self, role: BeeRole) -> usize {
        self.bees.values().filter(|record| record.role == role).count()
    }

    /// Snapshot the counters.
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            live: self.bees.len() as u64,
            total_spawned: self.total_spawned,
            total_perished: self.total_perished,
            drones: self.count_by_role(BeeRole::Drone) as u64,
            workers: self
                .bees
                .values()
                .filter(|record| matches!(record.role, BeeRole::Worker(_)))
                .count() as u64,
        }
    }
}

/// Statistics about the bee population.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Bees currently alive.
    pub live: u64,
    /// Bees ever registered.
    pub total_spawned: u64,
    /// Bees ever perished.
    pub total_perished: u64,
    /// Live drones.
    pub drones: u64,
    /// Live workers, both resources.
    pub workers: u64,
}

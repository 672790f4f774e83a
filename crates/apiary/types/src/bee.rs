//! Bee identity, castes, and the drone entity.
//!
//! Every bee in the colony is registered with the hive under a [`BeeId`] and
//! runs as its own task. Only drones carry per-bee shared state: the one-way
//! mated flag, written exactly once by the queen's summon path and read by
//! the owning drone after it leaves the chamber.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Unique identifier for a bee, assigned by the hive registry.
///
/// Identifiers are sequential within one hive and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct BeeId(pub u64);

impl BeeId {
    /// Create a bee ID from its registry number.
    pub const fn new(number: u64) -> Self {
        Self(number)
    }

    /// Get the registry number.
    pub const fn number(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bee #{}", self.0)
    }
}

/// The two resources worker bees forage for and the queen consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldResource {
    /// Nectar, gathered by nectar workers.
    Nectar,
    /// Pollen, gathered by pollen workers.
    Pollen,
}

impl std::fmt::Display for FieldResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldResource::Nectar => write!(f, "nectar"),
            FieldResource::Pollen => write!(f, "pollen"),
        }
    }
}

/// The caste a bee belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeeRole {
    /// The single queen; summons drones and rears the brood.
    Queen,
    /// A drone; waits in the queen's chamber to mate, perishes afterwards.
    Drone,
    /// A worker foraging for one resource.
    Worker(FieldResource),
}

impl std::fmt::Display for BeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeeRole::Queen => write!(f, "queen"),
            BeeRole::Drone => write!(f, "drone"),
            BeeRole::Worker(resource) => write!(f, "{} worker", resource),
        }
    }
}

/// The shared state of one drone.
///
/// The drone's task and the queen's chamber both hold a reference to this
/// entity. The mated flag is one-way: it starts false, is set at most once
/// (by [`mark_mated`](Drone::mark_mated), on the queen's behalf, while the
/// drone is still queued), and has no reset path. The chamber's lock and
/// wake-up establish the happens-before edge between the write and the
/// owning drone's read, so the flag itself only needs atomic access.
#[derive(Debug)]
pub struct Drone {
    id: BeeId,
    mated: AtomicBool,
}

impl Drone {
    /// Create an unmated drone.
    pub fn new(id: BeeId) -> Self {
        Self {
            id,
            mated: AtomicBool::new(false),
        }
    }

    /// The drone's identity.
    pub fn id(&self) -> BeeId {
        self.id
    }

    /// Whether the queen has mated with this drone.
    pub fn has_mated(&self) -> bool {
        self.mated.load(Ordering::SeqCst)
    }

    /// Mark the drone as mated.
    ///
    /// Returns false if the drone was already mated, in which case the
    /// caller has broken the set-once contract and must treat the call as a
    /// protocol violation.
    pub fn mark_mated(&self) -> bool {
        !self.mated.swap(true, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bee_id_display() {
        assert_eq!(BeeId::new(7).to_string(), "bee #7");
    }

    #[test]
    fn test_role_display() {
        assert_eq!(BeeRole::Queen.to_string(), "queen");
        assert_eq!(BeeRole::Drone.to_string(), "drone");
        assert_eq!(
            BeeRole::Worker(FieldResource::Pollen).to_string(),
            "pollen worker"
        );
    }

    #[test]
    fn test_drone_starts_unmated() {
        let drone = Drone::new(BeeId::new(1));
        assert!(!drone.has_mated());
    }

    #[test]
    fn test_mark_mated_is_one_way() {
        let drone = Drone::new(BeeId::new(1));

        assert!(drone.mark_mated());
        assert!(drone.has_mated());

        // A second mark reports the contract breach
        assert!(!drone.mark_mated());
        assert!(drone.has_mated());
    }

    #[test]
    fn test_role_serializes() {
        let role = BeeRole::Worker(FieldResource::Nectar);
        let json = serde_json::to_string(&role).unwrap();
        let back: BeeRole = serde_json::from_str(&json).unwrap();
        assert_eq!(role, back);
    }
}

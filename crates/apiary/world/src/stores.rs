//! Nectar and pollen accounting.
//!
//! The stores are one of the two shared-mutable surfaces in the colony.
//! Every rearing attempt costs exactly one unit of each resource, and the
//! check-and-decrement must be atomic: two attempts must never both see the
//! last pair as available. [`Stores::claim`] is therefore the sole
//! authority - one lock acquisition covers the check and both decrements -
//! while [`Stores::available`] is advisory and may be stale by the time a
//! claim runs.

use crate::errors::{HiveError, HiveResult};
use apiary_types::FieldResource;
use tokio::sync::Mutex;

/// A snapshot of the stores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreLevels {
    /// Units of nectar currently held.
    pub nectar: u64,
    /// Units of pollen currently held.
    pub pollen: u64,
    /// Nectar ever added, initial seed included.
    pub total_nectar: u64,
    /// Pollen ever added, initial seed included.
    pub total_pollen: u64,
    /// Successful claims (each consumed one nectar and one pollen).
    pub claimed_pairs: u64,
}

#[derive(Debug)]
struct Ledger {
    nectar: u64,
    pollen: u64,
    total_nectar: u64,
    total_pollen: u64,
    claimed_pairs: u64,
}

/// The colony's shared nectar and pollen stores.
#[derive(Debug)]
pub struct Stores {
    ledger: Mutex<Ledger>,
}

impl Stores {
    /// Create stores seeded with the given units.
    pub fn new(initial_nectar: u64, initial_pollen: u64) -> Self {
        Self {
            ledger: Mutex::new(Ledger {
                nectar: initial_nectar,
                pollen: initial_pollen,
                total_nectar: initial_nectar,
                total_pollen: initial_pollen,
                claimed_pairs: 0,
            }),
        }
    }

    /// Whether at least one unit of each resource is present.
    ///
    /// Advisory only: another task may claim between this check and a
    /// subsequent [`claim`](Stores::claim), which is why the claim re-checks
    /// under its own lock.
    pub async fn available(&self) -> bool {
        let ledger = self.ledger.lock().await;
        ledger.nectar >= 1 && ledger.pollen >= 1
    }

    /// Atomically take one unit of nectar and one of pollen.
    ///
    /// On [`HiveError::ResourcesExhausted`] both counters are untouched;
    /// a claim never drives either negative.
    pub async fn claim(&self) -> HiveResult<()> {
        let mut ledger = self.ledger.lock().await;
        if ledger.nectar < 1 || ledger.pollen < 1 {
            return Err(HiveError::ResourcesExhausted);
        }
        ledger.nectar -= 1;
        ledger.pollen -= 1;
        ledger.claimed_pairs += 1;
        Ok(())
    }

    /// Add one unit of a resource (a worker returning from the field).
    pub async fn deposit(&self, resource: FieldResource) {
        let mut ledger = self.ledger.lock().await;
        match resource {
            FieldResource::Nectar => {
                ledger.nectar += 1;
                ledger.total_nectar += 1;
            }
            FieldResource::Pollen => {
                ledger.pollen += 1;
                ledger.total_pollen += 1;
            }
        }
    }

    /// Snapshot the current and lifetime counters.
    pub async fn levels(&self) -> StoreLevels {
        let ledger = self.ledger.lock().await;
        StoreLevels {
            nectar: ledger.nectar,
            pollen: ledger.pollen,
            total_nectar: ledger.total_nectar,
            total_pollen: ledger.total_pollen,
            claimed_pairs: ledger.claimed_pairs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_claim_takes_one_pair() {
        let stores = Stores::new(2, 2);

        stores.claim().await.unwrap();

        let levels = stores.levels().await;
        assert_eq!(levels.nectar, 1);
        assert_eq!(levels.pollen, 1);
        assert_eq!(levels.claimed_pairs, 1);
    }

    #[tokio::test]
    async fn test_claim_fails_without_a_full_pair() {
        let stores = Stores::new(1, 0);

        assert!(!stores.available().await);
        assert!(matches!(
            stores.claim().await,
            Err(HiveError::ResourcesExhausted)
        ));

        // A failed claim leaves both counters untouched
        let levels = stores.levels().await;
        assert_eq!(levels.nectar, 1);
        assert_eq!(levels.pollen, 0);
        assert_eq!(levels.claimed_pairs, 0);
    }

    #[tokio::test]
    async fn test_deposit_replenishes() {
        let stores = Stores::new(0, 0);

        stores.deposit(FieldResource::Nectar).await;
        stores.deposit(FieldResource::Pollen).await;

        assert!(stores.available().await);
        stores.claim().await.unwrap();
        assert!(!stores.available().await);
    }

    #[tokio::test]
    async fn test_concurrent_claims_conserve_resources() {
        let stores = Arc::new(Stores::new(5, 5));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let stores = Arc::clone(&stores);
            handles.push(tokio::spawn(async move { stores.claim().await.is_ok() }));
        }

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap() {
                succeeded += 1;
            }
        }

        // Only five pairs existed, so exactly five claims can have won
        assert_eq!(succeeded, 5);
        let levels = stores.levels().await;
        assert_eq!(levels.nectar, 0);
        assert_eq!(levels.pollen, 0);
        assert_eq!(levels.claimed_pairs, 5);
    }

    #[tokio::test]
    async fn test_totals_track_everything_ever_added() {
        let stores = Stores::new(3, 3);
        stores.deposit(FieldResource::Nectar).await;

        let levels = stores.levels().await;
        assert_eq!(levels.total_nectar, 4);
        assert_eq!(levels.total_pollen, 3);
    }
}

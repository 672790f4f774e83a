//! The worker's run loop.
//!
//! Workers replenish the stores the queen spends. Each loop iteration is one
//! foraging trip - out to the field and back - followed by a single deposit
//! of the worker's resource. The trip is a timed rest, so a halted hive cuts
//! it short; a merely deactivated hive lets the trip finish and the worker
//! retires at the next loop check.

use apiary_types::{BeeId, FieldResource};
use apiary_world::Hive;
use std::sync::Arc;

/// Run one worker until the hive stops.
pub async fn run(hive: Arc<Hive>, id: BeeId, resource: FieldResource) {
    let trip = hive.config().gather_time();

    while hive.is_active() {
        if let Err(err) = hive.rest(trip).await {
            tracing::warn!(bee = %id, error = %err, "foraging trip interrupted");
            break;
        }
        hive.deposit(resource).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiary_types::{BeeRole, HiveConfig};

    #[tokio::test(start_paused = true)]
    async fn test_worker_deposits_every_trip() {
        let config = HiveConfig {
            initial_nectar: 0,
            initial_pollen: 0,
            initial_drones: 0,
            gather_time_ms: 100,
            ..HiveConfig::test_hive()
        };
        let hive = Arc::new(Hive::new(config).unwrap());
        let id = hive.add_bee(BeeRole::Worker(FieldResource::Nectar)).await;

        let task = tokio::spawn(run(Arc::clone(&hive), id, FieldResource::Nectar));

        // Three full trips
        tokio::time::sleep(std::time::Duration::from_millis(350)).await;
        hive.deactivate();
        task.await.unwrap();

        let levels = hive.stores().levels().await;
        assert!(levels.nectar >= 3);
        assert_eq!(levels.pollen, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_halt_interrupts_a_trip() {
        let config = HiveConfig {
            gather_time_ms: 3_600_000,
            ..HiveConfig::test_hive()
        };
        let hive = Arc::new(Hive::new(config).unwrap());
        let id = hive.add_bee(BeeRole::Worker(FieldResource::Pollen)).await;
        let before = hive.stores().levels().await.pollen;

        let task = tokio::spawn(run(Arc::clone(&hive), id, FieldResource::Pollen));
        tokio::task::yield_now().await;

        hive.halt();
        task.await.unwrap();

        // The interrupted trip deposited nothing
        assert_eq!(hive.stores().levels().await.pollen, before);
    }
}

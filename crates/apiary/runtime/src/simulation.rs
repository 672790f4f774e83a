//! Spawning bees and driving a whole colony run.

use crate::queen::Queen;
use crate::{drone, worker};
use apiary_types::{BeeId, BeeRole, Drone, FieldResource, HiveConfig};
use apiary_world::{Hive, HiveResult, HiveStats};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Registers new bees with the hive and starts their run loops.
///
/// This is the concrete register-and-start contract: one call produces
/// exactly one registered bee with exactly one task behind it, and the task
/// handle is retained so shutdown can prove every bee finished. The queen
/// holds a clone to rear her brood with.
#[derive(Clone)]
pub struct Spawner {
    hive: Arc<Hive>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Spawner {
    /// Create a spawner for a hive.
    pub fn new(hive: Arc<Hive>) -> Self {
        Self {
            hive,
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a bee of the given caste and start its task.
    pub async fn spawn_bee(&self, role: BeeRole) -> BeeId {
        let id = self.hive.add_bee(role).await;
        let handle = match role {
            BeeRole::Queen => {
                let queen = Queen::new(Arc::clone(&self.hive), self.clone());
                tokio::spawn(async move {
                    if let Err(err) = queen.run().await {
                        tracing::warn!(error = %err, "the queen's reign ended abnormally");
                    }
                })
            }
            BeeRole::Drone => {
                let entity = Arc::new(Drone::new(id));
                tokio::spawn(drone::run(Arc::clone(&self.hive), entity))
            }
            BeeRole::Worker(resource) => {
                tokio::spawn(worker::run(Arc::clone(&self.hive), id, resource))
            }
        };
        self.tasks.lock().await.push(handle);
        id
    }

    /// Await every bee task, including any spawned while joining.
    pub async fn join_all(&self) {
        loop {
            let drained: Vec<JoinHandle<()>> = {
                let mut tasks = self.tasks.lock().await;
                if tasks.is_empty() {
                    break;
                }
                tasks.drain(..).collect()
            };
            for handle in drained {
                if let Err(err) = handle.await {
                    tracing::error!(error = %err, "a bee task panicked");
                }
            }
        }
    }
}

/// Drives one colony from seed population to clean teardown.
pub struct Simulation {
    hive: Arc<Hive>,
    spawner: Spawner,
}

impl Simulation {
    /// Build a hive and its spawner from a configuration.
    ///
    /// # Errors
    ///
    /// [`apiary_world::HiveError::InvalidConfig`] when the configuration is
    /// rejected.
    pub fn new(config: HiveConfig) -> HiveResult<Self> {
        let hive = Arc::new(Hive::new(config)?);
        let spawner = Spawner::new(Arc::clone(&hive));
        Ok(Self { hive, spawner })
    }

    /// The hive under simulation.
    pub fn hive(&self) -> &Arc<Hive> {
        &self.hive
    }

    /// The spawner, for callers adding bees outside the queen's brood.
    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Spawn the seed population: the workers, the drones, and the queen.
    pub async fn populate(&self) {
        let config = self.hive.config().clone();

        for _ in 0..config.initial_workers_per_resource {
            self.spawner
                .spawn_bee(BeeRole::Worker(FieldResource::Nectar))
                .await;
            self.spawner
                .spawn_bee(BeeRole::Worker(FieldResource::Pollen))
                .await;
        }
        for _ in 0..config.initial_drones {
            self.spawner.spawn_bee(BeeRole::Drone).await;
        }
        self.spawner.spawn_bee(BeeRole::Queen).await;

        tracing::info!(
            workers = config.initial_workers_per_resource * 2,
            drones = config.initial_drones,
            "colony populated"
        );
    }

    /// Populate, run for a wall-clock duration, then shut down gracefully.
    pub async fn run_for(&self, duration: Duration) -> HiveStats {
        self.populate().await;
        tokio::time::sleep(duration).await;
        self.shutdown().await
    }

    /// Graceful teardown: deactivate and wait for every bee to finish.
    ///
    /// The queen's exit drains the chamber, so no drone stays blocked and
    /// the join below always completes.
    pub async fn shutdown(&self) -> HiveStats {
        self.hive.deactivate();
        self.spawner.join_all().await;
        self.hive.stats().await
    }

    /// Abrupt teardown: interrupt resting bees, then wait for them.
    pub async fn halt(&self) -> HiveStats {
        self.hive.halt();
        self.spawner.join_all().await;
        self.hive.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_populate_registers_the_seed_population() {
        let config = HiveConfig {
            initial_drones: 2,
            initial_workers_per_resource: 1,
            ..HiveConfig::test_hive()
        };
        let simulation = Simulation::new(config).unwrap();

        simulation.populate().await;

        // 2 workers + 2 drones + the queen
        assert_eq!(simulation.hive().live_count().await, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_completes_with_blocked_drones() {
        let config = HiveConfig {
            initial_nectar: 0,
            initial_pollen: 0,
            initial_drones: 3,
            initial_workers_per_resource: 0,
            ..HiveConfig::test_hive()
        };
        let simulation = Simulation::new(config).unwrap();
        simulation.populate().await;

        while simulation.hive().queens_chamber().waiting_count().await < 3 {
            tokio::task::yield_now().await;
        }

        let stats = simulation.shutdown().await;

        // Nobody mated, nobody perished, nobody is still waiting
        assert_eq!(stats.waiting_drones, 0);
        assert_eq!(stats.bees.total_perished, 0);
        assert_eq!(stats.bees.live, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_halt_completes_with_blocked_drones() {
        let config = HiveConfig {
            initial_nectar: 0,
            initial_pollen: 0,
            initial_drones: 2,
            initial_workers_per_resource: 1,
            gather_time_ms: 3_600_000,
            ..HiveConfig::test_hive()
        };
        let simulation = Simulation::new(config).unwrap();
        simulation.populate().await;

        while simulation.hive().queens_chamber().waiting_count().await < 2 {
            tokio::task::yield_now().await;
        }

        let stats = simulation.halt().await;
        assert_eq!(stats.waiting_drones, 0);
        assert_eq!(stats.bees.total_perished, 0);
    }
}

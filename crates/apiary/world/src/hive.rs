//! The hive - lifecycle authority and owner of the shared world state.
//!
//! The hive coordinates the subsystems (stores, chamber, registry, events)
//! and carries the two lifecycle signals every run loop observes:
//!
//! - the **active flag**, polled at iteration boundaries. Clearing it via
//!   [`Hive::deactivate`] is the graceful stop: in-flight rests run to
//!   completion and loops exit at their next boundary check.
//! - the **halt signal**, fired by [`Hive::halt`] for abnormal teardown. It
//!   cuts timed rests short, which surfaces as [`HiveError::Interrupted`]
//!   in the resting agent.
//!
//! Neither signal unblocks a drone waiting in the chamber; that is the
//! queen's shutdown drain, which runs on her way out of her own loop.

use crate::chamber::QueensChamber;
use crate::errors::{HiveError, HiveResult};
use crate::registry::{BeeRegistry, RegistryStats};
use crate::stores::{StoreLevels, Stores};
use apiary_types::{BeeId, BeeRole, FieldResource, HiveConfig, HiveEvent};
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, Notify};

/// Capacity of the event channel; slow subscribers lag rather than block.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A snapshot of the whole colony, for the final report.
#[derive(Clone, Copy, Debug, Default)]
pub struct HiveStats {
    /// Population counters.
    pub bees: RegistryStats,
    /// Store levels and lifetime totals.
    pub stores: StoreLevels,
    /// Drones still waiting in the chamber.
    pub waiting_drones: usize,
}

/// The hive: shared state and lifecycle for one colony.
#[derive(Debug)]
pub struct Hive {
    config: HiveConfig,
    stores: Stores,
    chamber: QueensChamber,
    registry: Mutex<BeeRegistry>,
    active: AtomicBool,
    halted: AtomicBool,
    halt_wake: Notify,
    events: broadcast::Sender<HiveEvent>,
}

impl Hive {
    /// Create an active hive from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`HiveError::InvalidConfig`] when the configuration is rejected.
    pub fn new(config: HiveConfig) -> HiveResult<Self> {
        config.validate().map_err(HiveError::InvalidConfig)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            stores: Stores::new(config.initial_nectar, config.initial_pollen),
            chamber: QueensChamber::new(),
            registry: Mutex::new(BeeRegistry::new()),
            active: AtomicBool::new(true),
            halted: AtomicBool::new(false),
            halt_wake: Notify::new(),
            events,
            config,
        })
    }

    /// The hive's configuration.
    pub fn config(&self) -> &HiveConfig {
        &self.config
    }

    /// Whether the colony is still running. Polled, never blocks.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Graceful stop: clear the active flag.
    ///
    /// Loops exit at their next boundary check; rests already underway run
    /// to completion.
    pub fn deactivate(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            tracing::info!("hive deactivated");
        }
    }

    /// Abrupt stop: clear the active flag and interrupt every in-flight
    /// rest.
    pub fn halt(&self) {
        self.deactivate();
        if !self.halted.swap(true, Ordering::SeqCst) {
            tracing::warn!("hive halted, interrupting resting bees");
            self.halt_wake.notify_waiters();
        }
    }

    /// Suspend for a fixed duration, racing the halt signal.
    ///
    /// This is the one suspension primitive in the colony: the queen's
    /// mating and inter-session rests and the workers' foraging trips all
    /// run through it. No lock is held while suspended.
    ///
    /// # Errors
    ///
    /// [`HiveError::Interrupted`] when the hive halts mid-rest, or had
    /// already halted when the rest began.
    pub async fn rest(&self, duration: Duration) -> HiveResult<()> {
        let mut halted = pin!(self.halt_wake.notified());
        // Register before reading the flag so a halt in between still wakes us
        halted.as_mut().enable();
        if self.halted.load(Ordering::SeqCst) {
            return Err(HiveError::Interrupted);
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = halted => Err(HiveError::Interrupted),
        }
    }

    /// Advisory check: one unit of each resource present?
    pub async fn has_resources(&self) -> bool {
        self.stores.available().await
    }

    /// Atomically claim one nectar and one pollen.
    ///
    /// # Errors
    ///
    /// [`HiveError::ResourcesExhausted`] when a full pair is not present.
    pub async fn claim_resources(&self) -> HiveResult<()> {
        self.stores.claim().await
    }

    /// A worker deposits one unit it gathered.
    pub async fn deposit(&self, resource: FieldResource) {
        self.stores.deposit(resource).await;
        tracing::debug!(%resource, "worker deposited into the stores");
    }

    /// The shared stores.
    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// The shared mating rendezvous. Stable for the hive's lifetime.
    pub fn queens_chamber(&self) -> &QueensChamber {
        &self.chamber
    }

    /// Register a new bee and return its identity.
    ///
    /// Bookkeeping only; starting the bee's task is the caller's half of
    /// the contract.
    pub async fn add_bee(&self, role: BeeRole) -> BeeId {
        let id = self.registry.lock().await.register(role);
        tracing::debug!(bee = %id, %role, "bee joined the hive");
        let _ = self.events.send(HiveEvent::BeeSpawned { bee: id, role });
        id
    }

    /// Report that a drone mated and perished.
    ///
    /// Called once per perished drone, after it has left the chamber.
    ///
    /// # Errors
    ///
    /// [`HiveError::UnknownBee`] when the bee was never registered or
    /// already perished.
    pub async fn bee_perished(&self, id: BeeId) -> HiveResult<()> {
        self.registry.lock().await.perish(id)?;
        tracing::info!(bee = %id, "drone has perished");
        let _ = self.events.send(HiveEvent::DronePerished { bee: id });
        Ok(())
    }

    /// Publish a brood report for a finished mating session.
    pub fn report_brood(&self, requested: u32, reared: u32) {
        tracing::info!(requested, reared, "queen reared her brood");
        let _ = self.events.send(HiveEvent::BroodReared { requested, reared });
    }

    /// Subscribe to hive events.
    pub fn subscribe(&self) -> broadcast::Receiver<HiveEvent> {
        self.events.subscribe()
    }

    /// Number of live bees.
    pub async fn live_count(&self) -> usize {
        self.registry.lock().await.live_count()
    }

    /// Snapshot the colony for reporting.
    pub async fn stats(&self) -> HiveStats {
        HiveStats {
            bees: self.registry.lock().await.stats(),
            stores: self.stores.levels().await,
            waiting_drones: self.chamber.waiting_count().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn test_hive() -> Hive {
        Hive::new(HiveConfig::test_hive()).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = HiveConfig {
            min_brood: 0,
            ..HiveConfig::default()
        };
        assert!(matches!(
            Hive::new(config),
            Err(HiveError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_starts_active_and_deactivates_once() {
        let hive = test_hive();
        assert!(hive.is_active());

        hive.deactivate();
        assert!(!hive.is_active());

        // Second call is a no-op
        hive.deactivate();
        assert!(!hive.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rest_completes_while_active() {
        let hive = test_hive();
        hive.rest(Duration::from_millis(50)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_halt_interrupts_a_rest() {
        let hive = Arc::new(test_hive());

        let resting = {
            let hive = Arc::clone(&hive);
            tokio::spawn(async move { hive.rest(Duration::from_secs(3600)).await })
        };

        hive.halt();
        assert!(matches!(
            resting.await.unwrap(),
            Err(HiveError::Interrupted)
        ));
        assert!(!hive.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rest_after_halt_fails_immediately() {
        let hive = test_hive();
        hive.halt();

        assert!(matches!(
            hive.rest(Duration::from_secs(3600)).await,
            Err(HiveError::Interrupted)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivate_lets_a_rest_finish() {
        let hive = Arc::new(test_hive());

        let resting = {
            let hive = Arc::clone(&hive);
            tokio::spawn(async move { hive.rest(Duration::from_millis(100)).await })
        };

        hive.deactivate();
        assert!(resting.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_add_bee_and_perish_emit_events() {
        let hive = test_hive();
        let mut events = hive.subscribe();

        let drone = hive.add_bee(BeeRole::Drone).await;
        hive.bee_perished(drone).await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            HiveEvent::BeeSpawned {
                bee: drone,
                role: BeeRole::Drone
            }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            HiveEvent::DronePerished { bee: drone }
        );

        let stats = hive.stats().await;
        assert_eq!(stats.bees.total_spawned, 1);
        assert_eq!(stats.bees.total_perished, 1);
    }

    #[tokio::test]
    async fn test_perish_twice_is_an_error() {
        let hive = test_hive();
        let drone = hive.add_bee(BeeRole::Drone).await;

        hive.bee_perished(drone).await.unwrap();
        assert!(matches!(
            hive.bee_perished(drone).await,
            Err(HiveError::UnknownBee(_))
        ));
    }

    #[tokio::test]
    async fn test_resources_delegate_to_stores() {
        let hive = test_hive();
        assert!(hive.has_resources().await);

        hive.claim_resources().await.unwrap();
        hive.claim_resources().await.unwrap();
        assert!(!hive.has_resources().await);
        assert!(matches!(
            hive.claim_resources().await,
            Err(HiveError::ResourcesExhausted)
        ));

        hive.deposit(FieldResource::Nectar).await;
        hive.deposit(FieldResource::Pollen).await;
        assert!(hive.has_resources().await);
    }
}

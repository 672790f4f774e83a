//! The queen's run loop.
//!
//! The queen is the only bee allowed to mate and the only one that rears
//! brood. Each pass of her reign: when the stores hold a full pair and a
//! drone is waiting, she summons the head of the chamber queue, rests for
//! the mating duration, then rears a freshly-drawn number of brood slots -
//! each slot gated by the stores and cast by a fresh die roll. She rests
//! between sessions whether or not one occurred, and on her way out - loop
//! exit or interrupted rest alike - she closes and drains the chamber so no
//! drone is left waiting forever.

use crate::simulation::Spawner;
use apiary_types::{BeeRole, FieldResource};
use apiary_world::{Hive, HiveResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The queen of one hive.
pub struct Queen {
    hive: Arc<Hive>,
    spawner: Spawner,
}

impl Queen {
    /// Create the queen for a hive.
    pub fn new(hive: Arc<Hive>, spawner: Spawner) -> Self {
        Self { hive, spawner }
    }

    /// Run the queen to completion.
    ///
    /// The chamber drain runs no matter how the reign ended; an interrupted
    /// rest still surfaces as the returned error afterwards.
    pub async fn run(self) -> HiveResult<()> {
        let result = self.reign().await;
        self.dismiss_court().await;
        result
    }

    async fn reign(&self) -> HiveResult<()> {
        let mut rng = StdRng::from_entropy();

        while self.hive.is_active() {
            if self.hive.has_resources().await && self.hive.queens_chamber().has_waiting().await {
                self.hold_court(&mut rng).await?;
            }
            self.hive.rest(self.hive.config().rest_time()).await?;
        }
        Ok(())
    }

    /// One mating session: summon, mate, rear the brood, report.
    async fn hold_court(&self, rng: &mut StdRng) -> HiveResult<()> {
        let config = self.hive.config();

        self.hive.queens_chamber().summon().await?;
        self.hive.rest(config.mate_time()).await?;

        // Both the brood size and every caste roll are drawn fresh for this
        // session
        let requested = rng.gen_range(config.min_brood..=config.max_brood);
        let mut reared = 0;
        for _ in 0..requested {
            if !self.hive.has_resources().await {
                tracing::debug!("stores ran dry, brood slot skipped");
                continue;
            }
            if self.fill_slot(draw_caste(rng)).await {
                reared += 1;
            }
        }

        self.hive.report_brood(requested, reared);
        Ok(())
    }

    /// Rear one bee: register it, start it, claim its resource pair.
    ///
    /// Returns whether the slot counts toward the brood report.
    //
    // Returns a boxed `dyn Future + Send` rather than an `async fn` to break
    // the async-recursion auto-trait cycle (spawn_bee -> queen.run -> reign ->
    // hold_court -> fill_slot -> spawn_bee). The explicit `+ Send` boundary
    // gives the compiler a concrete Send type so the query terminates instead
    // of recursing into its own opaque return type.
    fn fill_slot(&self, caste: BeeRole) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            self.spawner.spawn_bee(caste).await;
            match self.hive.claim_resources().await {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(error = %err, %caste, "brood slot spawned without a resource pair");
                    false
                }
            }
        })
    }

    /// Close the chamber and release every drone still waiting.
    async fn dismiss_court(&self) {
        let chamber = self.hive.queens_chamber();
        chamber.close().await;
        while chamber.has_waiting().await {
            if let Err(err) = chamber.dismiss().await {
                tracing::error!(error = %err, "shutdown drain hit a chamber violation");
                break;
            }
        }
    }
}

/// Roll the five-sided caste die: 1 nectar worker, 2 pollen worker,
/// 3 through 5 a drone.
fn draw_caste(rng: &mut StdRng) -> BeeRole {
    match rng.gen_range(1..=5) {
        1 => BeeRole::Worker(FieldResource::Nectar),
        2 => BeeRole::Worker(FieldResource::Pollen),
        _ => BeeRole::Drone,
    }
}

//! The drone's run loop.
//!
//! A drone does one thing: enter the queen's chamber and wait. Coming back
//! out means one of two fates. If the queen mated with it, the drone reports
//! its own perish to the hive and stops; otherwise the colony shut down
//! first and the drone simply ends, a survivor.

use apiary_types::Drone;
use apiary_world::Hive;
use std::sync::Arc;

/// Run one drone to completion.
pub async fn run(hive: Arc<Hive>, drone: Arc<Drone>) {
    if !hive.is_active() {
        return;
    }

    match hive.queens_chamber().enter(Arc::clone(&drone)).await {
        Ok(()) => {
            if drone.has_mated() {
                if let Err(err) = hive.bee_perished(drone.id()).await {
                    tracing::error!(bee = %drone.id(), error = %err, "perish report failed");
                }
            }
        }
        Err(err) => {
            tracing::error!(bee = %drone.id(), error = %err, "drone could not wait in the chamber");
        }
    }
}

//! The queen's chamber - the mating rendezvous.
//!
//! Drones enter the chamber in arrival order and block. The queen summons
//! the drone at the head of the queue; the shutdown drain dismisses the rest
//! one by one. Admission is strictly FIFO: a drone that entered first leaves
//! first, enforced by the head-check under the queue lock rather than by
//! wake-up order.
//!
//! Wake-ups are broadcast ([`Notify::notify_waiters`]) and a woken drone
//! never assumes eligibility - it re-checks the queue under the lock and
//! goes back to waiting when it is not the selected head. Each waiter
//! registers for the next wake-up while still holding the lock
//! ([`Notified::enable`]), so a summon or dismissal landing between the
//! check and the wait can never be lost.
//!
//! Shutdown starts by [closing](QueensChamber::close) the chamber: once the
//! queue is ordered to drain, a drone arriving late is turned away at the
//! door instead of enqueueing behind a drain that will never look again.
//!
//! [`Notified::enable`]: tokio::sync::futures::Notified::enable

use crate::errors::{HiveError, HiveResult};
use apiary_types::{BeeId, Drone};
use std::collections::VecDeque;
use std::pin::pin;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

#[derive(Debug, Default)]
struct ChamberState {
    suitors: VecDeque<Arc<Drone>>,
    closed: bool,
}

/// The single rendezvous point where drones wait for the queen.
///
/// Shared by every drone task and the queen for the lifetime of the hive.
#[derive(Debug, Default)]
pub struct QueensChamber {
    state: Mutex<ChamberState>,
    wake: Notify,
}

impl QueensChamber {
    /// Create an empty, open chamber.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the chamber and wait to be summoned or dismissed.
    ///
    /// Blocks until either the queen has mated with this drone (it was the
    /// head of the queue when [`summon`](QueensChamber::summon) ran) or the
    /// shutdown drain removed it via [`dismiss`](QueensChamber::dismiss).
    /// A drone arriving after [`close`](QueensChamber::close) is turned away
    /// immediately. On return the drone is out of the queue; whether it
    /// mated is on the drone's own flag.
    ///
    /// # Errors
    ///
    /// [`HiveError::ChamberViolation`] if this drone is already waiting.
    pub async fn enter(&self, drone: Arc<Drone>) -> HiveResult<()> {
        {
            let mut state = self.state.lock().await;
            if state.closed {
                tracing::info!(drone = %drone.id(), "chamber is closed, drone turned away");
                return Ok(());
            }
            if state.suitors.iter().any(|waiting| waiting.id() == drone.id()) {
                return Err(HiveError::ChamberViolation(format!(
                    "{} entered the chamber twice",
                    drone.id()
                )));
            }
            state.suitors.push_back(Arc::clone(&drone));
            tracing::info!(drone = %drone.id(), "drone enters the queen's chamber");
        }

        loop {
            let mut woken = pin!(self.wake.notified());
            {
                let mut state = self.state.lock().await;
                match state
                    .suitors
                    .iter()
                    .position(|waiting| waiting.id() == drone.id())
                {
                    // Removed by the shutdown drain
                    None => break,
                    // Selected head: take ourselves off the queue
                    Some(0) if drone.has_mated() => {
                        state.suitors.pop_front();
                        break;
                    }
                    // Woken without being eligible: wait for the next wake
                    Some(_) => {}
                }
                // Register before the lock drops so no wake is lost
                woken.as_mut().enable();
            }
            woken.await;
        }

        tracing::info!(drone = %drone.id(), mated = drone.has_mated(), "drone leaves the queen's chamber");
        Ok(())
    }

    /// Summon the drone at the head of the queue.
    ///
    /// Marks it mated without removing it - the drone takes itself off the
    /// queue when it wakes - and wakes all waiters so it can observe its new
    /// state. Exactly one drone is marked per call. Callers check
    /// [`has_waiting`](QueensChamber::has_waiting) first.
    ///
    /// # Errors
    ///
    /// [`HiveError::ChamberViolation`] if the chamber is empty or the head
    /// drone was already summoned.
    pub async fn summon(&self) -> HiveResult<BeeId> {
        let state = self.state.lock().await;
        let head = state.suitors.front().ok_or_else(|| {
            HiveError::ChamberViolation("summoned with no drone waiting".to_string())
        })?;
        if !head.mark_mated() {
            return Err(HiveError::ChamberViolation(format!(
                "{} summoned twice",
                head.id()
            )));
        }
        let id = head.id();
        tracing::info!(drone = %id, "queen mates with drone");
        self.wake.notify_waiters();
        Ok(id)
    }

    /// Dismiss the drone at the head of the queue without mating.
    ///
    /// Shutdown drain only: removes the head and wakes all waiters so the
    /// released drone can exit. Repeated calls release every waiter in
    /// arrival order.
    ///
    /// # Errors
    ///
    /// [`HiveError::ChamberViolation`] if the chamber is empty.
    pub async fn dismiss(&self) -> HiveResult<BeeId> {
        let mut state = self.state.lock().await;
        let drone = state.suitors.pop_front().ok_or_else(|| {
            HiveError::ChamberViolation("dismissed with no drone waiting".to_string())
        })?;
        let id = drone.id();
        tracing::info!(drone = %id, "drone dismissed from the chamber");
        self.wake.notify_waiters();
        Ok(id)
    }

    /// Order the queue to drain.
    ///
    /// The first step of the shutdown drain, before the dismissals: from
    /// here on a drone reaching the door is released immediately rather
    /// than enqueued. Idempotent.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if !state.closed {
            state.closed = true;
            tracing::info!(waiting = state.suitors.len(), "queen's chamber closed");
        }
    }

    /// Whether the chamber has been closed for draining.
    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    /// Whether any drone is waiting.
    pub async fn has_waiting(&self) -> bool {
        !self.state.lock().await.suitors.is_empty()
    }

    /// How many drones are waiting.
    pub async fn waiting_count(&self) -> usize {
        self.state.lock().await.suitors.len()
    }
}

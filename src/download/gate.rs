//! Bounded admission control for concurrent fetch units.
//!
//! [`ConcurrencyGate`] wraps a tokio [`Semaphore`] with instrumentation: it
//! tracks how many slots are held right now and the highest number ever held
//! at once. Slots are RAII guards, so a unit that fails, panics or is
//! cancelled still returns its slot.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::engine::EngineError;

/// Counting gate with a fixed capacity.
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    counters: Arc<GateCounters>,
}

#[derive(Debug, Default)]
struct GateCounters {
    active: AtomicUsize,
    peak: AtomicUsize,
}

/// One held gate slot; dropping it releases the slot.
#[derive(Debug)]
pub struct GateSlot {
    _permit: OwnedSemaphorePermit,
    counters: Arc<GateCounters>,
}

impl Drop for GateSlot {
    fn drop(&mut self) {
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ConcurrencyGate {
    /// Creates a gate admitting at most `capacity` holders at once.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            counters: Arc::new(GateCounters::default()),
        }
    }

    /// Waits for a free slot.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GateClosed`] if the gate was closed.
    pub async fn acquire(&self) -> Result<GateSlot, EngineError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| EngineError::GateClosed)?;

        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(active, Ordering::SeqCst);

        Ok(GateSlot {
            _permit: permit,
            counters: Arc::clone(&self.counters),
        })
    }

    /// Closes the gate; pending and future `acquire` calls fail.
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held.
    #[must_use]
    pub fn active(&self) -> usize {
        self.counters.active.load(Ordering::SeqCst)
    }

    /// Highest number of slots held simultaneously since creation.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_gate_never_exceeds_capacity() {
        let gate = ConcurrencyGate::new(2);
        let mut handles = Vec::new();

        for _ in 0..10 {
            let gate = gate.clone();
            handles.push(tokio::spawn(async move {
                let _slot = gate.acquire().await.unwrap();
                assert!(gate.active() <= 2, "active slots exceeded capacity");
                tokio::time::sleep(Duration::from_millis(20)).await;
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(gate.peak(), 2);
        assert_eq!(gate.active(), 0);
    }

    #[tokio::test]
    async fn test_slot_released_on_drop() {
        let gate = ConcurrencyGate::new(1);
        let slot = gate.acquire().await.unwrap();
        assert_eq!(gate.active(), 1);
        drop(slot);
        assert_eq!(gate.active(), 0);

        // A second acquire must not block once the first slot is gone
        let _slot = tokio::time::timeout(Duration::from_secs(1), gate.acquire())
            .await
            .expect("acquire should not block")
            .unwrap();
    }

    #[tokio::test]
    async fn test_slot_released_when_holder_panics() {
        let gate = ConcurrencyGate::new(1);
        let panicking = gate.clone();
        let result = tokio::spawn(async move {
            let _slot = panicking.acquire().await.unwrap();
            panic!("unit failed while holding a slot");
        })
        .await;

        assert!(result.is_err());
        assert_eq!(gate.active(), 0);
        let _slot = tokio::time::timeout(Duration::from_secs(1), gate.acquire())
            .await
            .expect("slot should have been released")
            .unwrap();
    }

    #[tokio::test]
    async fn test_closed_gate_rejects_acquire() {
        let gate = ConcurrencyGate::new(1);
        gate.close();
        assert!(matches!(gate.acquire().await, Err(EngineError::GateClosed)));
    }

    #[test]
    fn test_gate_reports_capacity() {
        let gate = ConcurrencyGate::new(7);
        assert_eq!(gate.capacity(), 7);
        assert_eq!(gate.peak(), 0);
    }
}

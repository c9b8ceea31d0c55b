//! Tick pacing and timed failure injection
//!
//! Both helpers take the caller's clock as plain milliseconds so they can be
//! driven by an animation frame loop, a test, or the CLI's fixed step.

use archsim_model::{GraphStore, ModelError, NodeId};
use std::collections::BTreeMap;

/// Wall-clock interval between ticks at 1x speed
pub const BASE_INTERVAL_MS: f64 = 1000.0;

/// Admits a tick only when the speed-scaled interval has elapsed
///
/// Frames arriving early are dropped, not queued.
#[derive(Debug, Clone)]
pub struct TickGate {
    interval_ms: f64,
    last_tick_ms: Option<u64>,
}

impl TickGate {
    /// Create a gate for a speed multiplier
    #[must_use]
    pub fn new(speed: f64) -> Self {
        Self {
            interval_ms: interval_for(speed),
            last_tick_ms: None,
        }
    }

    /// Change the speed multiplier
    pub fn set_speed(&mut self, speed: f64) {
        self.interval_ms = interval_for(speed);
    }

    /// Current interval
    #[inline]
    #[must_use]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Check whether a frame at `now_ms` should tick, recording it if so
    pub fn admit(&mut self, now_ms: u64) -> bool {
        let due = match self.last_tick_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) as f64 >= self.interval_ms,
        };
        if due {
            self.last_tick_ms = Some(now_ms);
        }
        due
    }

    /// Forget the last tick
    pub fn reset(&mut self) {
        self.last_tick_ms = None;
    }
}

fn interval_for(speed: f64) -> f64 {
    if speed > 0.0 {
        BASE_INTERVAL_MS / speed
    } else {
        BASE_INTERVAL_MS
    }
}

/// Marks nodes failed for a fixed duration
#[derive(Debug, Clone)]
pub struct FailureInjector {
    duration_ms: u64,
    expiries: BTreeMap<NodeId, u64>,
}

impl FailureInjector {
    /// Create an injector with a failure duration
    #[must_use]
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            expiries: BTreeMap::new(),
        }
    }

    /// Fail a node from `now_ms` until the duration elapses
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NodeNotFound`] when the node does not exist.
    pub fn inject(&mut self, store: &mut GraphStore, node: NodeId, now_ms: u64) -> Result<(), ModelError> {
        store.set_manually_failed(node, true)?;
        self.expiries.insert(node, now_ms.saturating_add(self.duration_ms));
        tracing::info!(node = %node, until_ms = now_ms.saturating_add(self.duration_ms), "failure injected");
        Ok(())
    }

    /// Clear every failure whose time is up, returning the recovered nodes
    pub fn expire(&mut self, store: &mut GraphStore, now_ms: u64) -> Vec<NodeId> {
        let due: Vec<NodeId> = self
            .expiries
            .iter()
            .filter(|(_, &until)| until <= now_ms)
            .map(|(&id, _)| id)
            .collect();
        for id in &due {
            self.expiries.remove(id);
            match store.set_manually_failed(*id, false) {
                Ok(()) => tracing::info!(node = %id, "failure cleared"),
                // Node was deleted while failed
                Err(err) => tracing::debug!(node = %id, %err, "failure expired for missing node"),
            }
        }
        due
    }

    /// Nodes currently failed by this injector
    pub fn active(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.expiries.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archsim_model::HealthStatus;
    use archsim_test_utils::{basic_web_app, id_of};

    #[test]
    fn gate_skips_early_frames() {
        let mut gate = TickGate::new(2.0);
        assert_eq!(gate.interval_ms(), 500.0);
        assert!(gate.admit(0));
        assert!(!gate.admit(16));
        assert!(!gate.admit(499));
        assert!(gate.admit(500));
        // a long stall yields one tick, not a backlog
        assert!(gate.admit(5000));
        assert!(!gate.admit(5001));
    }

    #[test]
    fn gate_ignores_non_positive_speed() {
        assert_eq!(TickGate::new(0.0).interval_ms(), BASE_INTERVAL_MS);
    }

    #[test]
    fn injected_failure_expires() {
        let mut store = basic_web_app();
        let server = id_of(&store, "Server");
        let mut injector = FailureInjector::new(10_000);
        injector.inject(&mut store, server, 1_000).unwrap();
        assert!(store.node(server).unwrap().state.is_manually_failed);
        assert_eq!(store.node(server).unwrap().state.health, HealthStatus::Failed);

        assert!(injector.expire(&mut store, 5_000).is_empty());
        assert_eq!(injector.expire(&mut store, 11_000), vec![server]);
        assert!(!store.node(server).unwrap().state.is_manually_failed);
        assert_eq!(injector.active().count(), 0);
    }

    #[test]
    fn inject_unknown_node_fails() {
        let mut store = basic_web_app();
        let mut injector = FailureInjector::new(10);
        assert!(injector.inject(&mut store, NodeId(999), 0).is_err());
        assert_eq!(injector.active().count(), 0);
    }
}

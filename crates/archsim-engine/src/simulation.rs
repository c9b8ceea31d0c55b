//! Simulation session
//!
//! Owns the graph and everything that evolves between ticks: traffic shaper,
//! tick gate, failure injector, metric history and the alert log. The caller
//! supplies the clock through [`Simulation::advance`]; nothing here sleeps or
//! spawns.

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::metrics::{compute_metrics, MetricsHistory};
use crate::scheduler::{FailureInjector, TickGate};
use crate::tick::{tick_with_alert_threshold, Alert, TickOutcome};
use crate::topology::{analyze_topology, TopologyAnalysis};
use crate::traffic::TrafficShaper;
use crate::validator::{validate, ValidationReport};
use archsim_model::{GraphStore, NodeId, Scenario, TrafficPattern};

/// A running simulation over one graph
#[derive(Debug)]
pub struct Simulation {
    store: GraphStore,
    config: SimulationConfig,
    scenario: Option<Scenario>,
    shaper: TrafficShaper,
    gate: TickGate,
    injector: FailureInjector,
    history: MetricsHistory,
    alerts: Vec<Alert>,
    started_at_ms: Option<u64>,
    ticks: u64,
    last: Option<TickOutcome>,
}

impl Simulation {
    /// Start a session over `store`
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`](crate::error::EngineError::InvalidConfig)
    /// when the configuration is out of range.
    pub fn new(store: GraphStore, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            load = config.traffic_load,
            pattern = %config.traffic_pattern,
            "simulation created"
        );
        Ok(Self {
            shaper: TrafficShaper::new(config.traffic_pattern, config.seed),
            gate: TickGate::new(config.speed),
            injector: FailureInjector::new(config.failure_duration_ms),
            history: MetricsHistory::new(config.history_capacity),
            store,
            config,
            scenario: None,
            alerts: Vec::new(),
            started_at_ms: None,
            ticks: 0,
            last: None,
        })
    }

    /// With an active scenario
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.set_scenario(Some(scenario));
        self
    }

    /// Graph being simulated
    #[inline]
    #[must_use]
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Graph for editing between ticks
    #[inline]
    pub fn store_mut(&mut self) -> &mut GraphStore {
        &mut self.store
    }

    /// Current configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Active scenario
    #[inline]
    #[must_use]
    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    /// Replace the active scenario, adopting its suggested load
    pub fn set_scenario(&mut self, scenario: Option<Scenario>) {
        if let Some(load) = scenario.as_ref().and_then(|s| s.traffic_load) {
            self.set_traffic_load(load);
        }
        self.scenario = scenario;
    }

    /// Change the base load
    pub fn set_traffic_load(&mut self, load: f64) {
        self.config.traffic_load = load.max(0.0);
    }

    /// Change the traffic pattern
    pub fn set_pattern(&mut self, pattern: TrafficPattern) {
        self.config.traffic_pattern = pattern;
        self.shaper.set_pattern(pattern);
    }

    /// Change the speed multiplier
    pub fn set_speed(&mut self, speed: f64) {
        self.config.speed = speed;
        self.gate.set_speed(speed);
    }

    /// Fail a node for the configured duration
    ///
    /// # Errors
    ///
    /// Returns a model error when the node does not exist.
    pub fn inject_failure(&mut self, node: NodeId, now_ms: u64) -> Result<()> {
        self.injector.inject(&mut self.store, node, now_ms)?;
        Ok(())
    }

    /// Run one tick if the gate admits `now_ms`
    ///
    /// Expired failures are cleared first so recovery shows on the same
    /// frame. Returns `None` when the frame was skipped.
    pub fn advance(&mut self, now_ms: u64) -> Option<&TickOutcome> {
        self.injector.expire(&mut self.store, now_ms);
        if !self.gate.admit(now_ms) {
            return None;
        }
        let started = *self.started_at_ms.get_or_insert(now_ms);
        let load = self
            .shaper
            .shape(self.config.traffic_load, now_ms.saturating_sub(started));

        let outcome = tick_with_alert_threshold(
            self.store.catalog(),
            self.store.nodes(),
            self.store.edges(),
            load,
            &self.alerts,
            self.config.alert_capacity_threshold,
        );
        self.store.apply_updates(&outcome.node_updates);
        self.alerts.extend(outcome.alerts.iter().cloned());
        self.history.push(outcome.metrics.clone());
        self.ticks += 1;
        tracing::debug!(tick = self.ticks, load, new_alerts = outcome.alerts.len(), "tick applied");
        Some(&*self.last.insert(outcome))
    }

    /// Most recent tick
    #[inline]
    #[must_use]
    pub fn last_tick(&self) -> Option<&TickOutcome> {
        self.last.as_ref()
    }

    /// Ticks run so far
    #[inline]
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Every alert raised so far, oldest first
    #[inline]
    #[must_use]
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Forget raised alerts so they can fire again
    pub fn clear_alerts(&mut self) {
        self.alerts.clear();
    }

    /// Rolling metric history
    #[inline]
    #[must_use]
    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    /// Structural analysis of the current graph
    #[must_use]
    pub fn analyze(&self) -> TopologyAnalysis {
        analyze_topology(self.store.catalog(), self.store.nodes(), self.store.edges())
    }

    /// Validate the current graph at the base traffic load
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let (catalog, nodes, edges) = (self.store.catalog(), self.store.nodes(), self.store.edges());
        let analysis = analyze_topology(catalog, nodes, edges);
        let metrics = compute_metrics(catalog, nodes, edges, self.config.traffic_load);
        validate(
            catalog,
            nodes,
            edges,
            &analysis.single_points_of_failure,
            &metrics,
            self.config.traffic_load,
            self.config.traffic_pattern,
            self.scenario.as_ref(),
        )
    }
}

//! Simulation configuration
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! traffic_load = 1000.0
//! traffic_pattern = "spike"
//! speed = 2.0
//! seed = 7
//! ```

use crate::error::{EngineError, Result};
use crate::metrics::DEFAULT_HISTORY_CAPACITY;
use archsim_model::TrafficPattern;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables of a [`Simulation`](crate::simulation::Simulation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Base requests per second
    pub traffic_load: f64,
    /// Shape applied to the base load
    pub traffic_pattern: TrafficPattern,
    /// Speed multiplier; ticks fire every `1000 / speed` ms
    pub speed: f64,
    /// Seed of the traffic shaper
    pub seed: u64,
    /// Snapshots kept for sparklines
    pub history_capacity: usize,
    /// How long an injected failure lasts
    pub failure_duration_ms: u64,
    /// Load ratio above which nodes raise capacity alerts
    pub alert_capacity_threshold: f64,
}

impl SimulationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base traffic load
    #[inline]
    #[must_use]
    pub fn with_traffic_load(mut self, load: f64) -> Self {
        self.traffic_load = load;
        self
    }

    /// With traffic pattern
    #[inline]
    #[must_use]
    pub fn with_pattern(mut self, pattern: TrafficPattern) -> Self {
        self.traffic_pattern = pattern;
        self
    }

    /// With speed multiplier
    #[inline]
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// With shaper seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// With history capacity
    #[inline]
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// With failure duration
    #[inline]
    #[must_use]
    pub fn with_failure_duration_ms(mut self, duration_ms: u64) -> Self {
        self.failure_duration_ms = duration_ms;
        self
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParse`] for malformed TOML and
    /// [`EngineError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] when the file cannot be read, otherwise as
    /// [`SimulationConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "configuration loaded");
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !self.traffic_load.is_finite() || self.traffic_load < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "traffic_load must be a non-negative number, got {}",
                self.traffic_load
            )));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "speed must be positive, got {}",
                self.speed
            )));
        }
        if self.history_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if !(0.0..=10.0).contains(&self.alert_capacity_threshold) {
            return Err(EngineError::InvalidConfig(format!(
                "alert_capacity_threshold out of range: {}",
                self.alert_capacity_threshold
            )));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            traffic_load: 1000.0,
            traffic_pattern: TrafficPattern::Steady,
            speed: 1.0,
            seed: 42,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            failure_duration_ms: 10_000,
            alert_capacity_threshold: 0.9,
        }
    }
}

//! Active scenario supplied by the external scenario engine

use serde::{Deserialize, Serialize};

/// Scenario the user is currently working through
///
/// Targets override the scale-tier defaults; required kinds feed the
/// scenario completeness check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario identifier, looked up in the scenario tier table
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Declared P99 latency target in milliseconds
    #[serde(default)]
    pub target_p99_ms: Option<f64>,
    /// Declared availability target
    #[serde(default)]
    pub target_availability: Option<f64>,
    /// Component kinds the scenario expects to see
    #[serde(default)]
    pub required_kinds: Vec<String>,
    /// Suggested traffic load
    #[serde(default)]
    pub traffic_load: Option<f64>,
}

impl Scenario {
    /// Create a scenario without targets
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Self::default()
        }
    }

    /// With P99 target
    #[inline]
    #[must_use]
    pub fn with_target_p99(mut self, ms: f64) -> Self {
        self.target_p99_ms = Some(ms);
        self
    }

    /// With availability target
    #[inline]
    #[must_use]
    pub fn with_target_availability(mut self, availability: f64) -> Self {
        self.target_availability = Some(availability);
        self
    }

    /// With required component kinds
    #[must_use]
    pub fn with_required_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_kinds = kinds.into_iter().map(Into::into).collect();
        self
    }
}

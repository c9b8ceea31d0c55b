//! Synthetic traffic patterns

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Shape of the synthetic load applied to the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrafficPattern {
    /// Flat load with small jitter
    #[default]
    Steady,
    /// Occasional short bursts
    Spike,
    /// Smooth periodic wave
    SineWave,
    /// Ramp to a large plateau, then decay
    FlashSale,
}

impl TrafficPattern {
    /// Patterns with large transient bursts
    #[inline]
    #[must_use]
    pub fn is_bursty(self) -> bool {
        matches!(self, Self::Spike | Self::FlashSale)
    }

    /// Stable identifier
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Steady => "steady",
            Self::Spike => "spike",
            Self::SineWave => "sine-wave",
            Self::FlashSale => "flash-sale",
        }
    }
}

impl std::fmt::Display for TrafficPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized traffic pattern name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown traffic pattern: {0}")]
pub struct UnknownPattern(pub String);

impl FromStr for TrafficPattern {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "steady" => Ok(Self::Steady),
            "spike" => Ok(Self::Spike),
            "sine-wave" | "sine" | "wave" => Ok(Self::SineWave),
            "flash-sale" | "flash" => Ok(Self::FlashSale),
            _ => Err(UnknownPattern(s.to_string())),
        }
    }
}

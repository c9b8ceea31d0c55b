//! Traffic shaping
//!
//! The only randomized layer in the engine. Given the base load and the
//! elapsed simulated time, returns the load to feed into the next tick.
//! Randomness comes from a seeded [`StdRng`] so runs replay exactly.

use archsim_model::TrafficPattern;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::TAU;

/// Relative jitter applied to steady traffic
pub const STEADY_JITTER: f64 = 0.05;

/// Per-tick probability of a spike
pub const SPIKE_PROBABILITY: f64 = 0.05;

/// Load multiplier during a spike
pub const SPIKE_MULTIPLIER: f64 = 5.0;

/// Period of the sine-wave pattern in milliseconds
pub const SINE_PERIOD_MS: u64 = 60_000;

/// Period of the flash-sale pattern in milliseconds
pub const FLASH_SALE_PERIOD_MS: u64 = 120_000;

/// Peak multiplier of the flash-sale pattern
pub const FLASH_SALE_PEAK: f64 = 10.0;

/// Modulates a base load according to a [`TrafficPattern`]
#[derive(Debug, Clone)]
pub struct TrafficShaper {
    pattern: TrafficPattern,
    rng: StdRng,
}

impl TrafficShaper {
    /// Create a shaper with a fixed seed
    #[must_use]
    pub fn new(pattern: TrafficPattern, seed: u64) -> Self {
        Self {
            pattern,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Active pattern
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> TrafficPattern {
        self.pattern
    }

    /// Switch pattern, keeping the random stream
    pub fn set_pattern(&mut self, pattern: TrafficPattern) {
        self.pattern = pattern;
    }

    /// Load for the tick at `elapsed_ms` since the simulation started
    pub fn shape(&mut self, base_load: f64, elapsed_ms: u64) -> f64 {
        let base_load = base_load.max(0.0);
        let multiplier = match self.pattern {
            TrafficPattern::Steady => 1.0 + self.rng.gen_range(-STEADY_JITTER..=STEADY_JITTER),
            TrafficPattern::Spike => {
                if self.rng.gen_bool(SPIKE_PROBABILITY) {
                    SPIKE_MULTIPLIER
                } else {
                    1.0
                }
            }
            TrafficPattern::SineWave => sine_multiplier(elapsed_ms),
            TrafficPattern::FlashSale => flash_sale_multiplier(elapsed_ms),
        };
        base_load * multiplier
    }
}

/// `1 + 0.5 sin(2πt / 60s)`
#[must_use]
pub fn sine_multiplier(elapsed_ms: u64) -> f64 {
    let phase = (elapsed_ms % SINE_PERIOD_MS) as f64 / SINE_PERIOD_MS as f64;
    1.0 + 0.5 * (TAU * phase).sin()
}

/// Baseline, ramp to the peak, hold, decay; repeats every two minutes
#[must_use]
pub fn flash_sale_multiplier(elapsed_ms: u64) -> f64 {
    let t = (elapsed_ms % FLASH_SALE_PERIOD_MS) as f64 / 1000.0;
    let extra = FLASH_SALE_PEAK - 1.0;
    match t {
        t if t < 60.0 => 1.0,
        t if t < 70.0 => 1.0 + extra * (t - 60.0) / 10.0,
        t if t < 90.0 => FLASH_SALE_PEAK,
        t => FLASH_SALE_PEAK - extra * (t - 90.0) / 30.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_stays_within_jitter() {
        let mut shaper = TrafficShaper::new(TrafficPattern::Steady, 7);
        for t in 0..200 {
            let load = shaper.shape(1000.0, t * 1000);
            assert!((950.0..=1050.0).contains(&load), "{load}");
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = TrafficShaper::new(TrafficPattern::Spike, 42);
        let mut b = TrafficShaper::new(TrafficPattern::Spike, 42);
        let xs: Vec<f64> = (0..100).map(|t| a.shape(100.0, t)).collect();
        let ys: Vec<f64> = (0..100).map(|t| b.shape(100.0, t)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|&l| l == 100.0 || l == 500.0));
    }

    #[test]
    fn sine_wave_shape() {
        assert!((sine_multiplier(0) - 1.0).abs() < 1e-9);
        assert!((sine_multiplier(15_000) - 1.5).abs() < 1e-9);
        assert!((sine_multiplier(45_000) - 0.5).abs() < 1e-9);
        assert!((sine_multiplier(60_000) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn flash_sale_phases() {
        assert_eq!(flash_sale_multiplier(30_000), 1.0);
        assert!((flash_sale_multiplier(65_000) - 5.5).abs() < 1e-9);
        assert_eq!(flash_sale_multiplier(80_000), 10.0);
        assert!((flash_sale_multiplier(105_000) - 5.5).abs() < 1e-9);
        assert_eq!(flash_sale_multiplier(120_000), 1.0);
    }

    #[test]
    fn deterministic_patterns_ignore_seed() {
        let mut a = TrafficShaper::new(TrafficPattern::FlashSale, 1);
        let mut b = TrafficShaper::new(TrafficPattern::FlashSale, 2);
        assert_eq!(a.shape(100.0, 80_000), b.shape(100.0, 80_000));
    }
}

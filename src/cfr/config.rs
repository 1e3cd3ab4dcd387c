//! Configuration options for the CFR solver.
//!
//! This module provides configuration structs that control the behavior
//! of the training loop: regret flooring, update order, average-strategy
//! weighting and how deals are chosen for each pass.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cfr::best_response::DEFAULT_MAX_ROUNDS;

/// How iterations are weighted in the average strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Averaging {
    /// Every iteration counts equally.
    Uniform,
    /// Iteration `t` is weighted `t - delay`; iterations up to `delay` are skipped.
    Linear {
        /// Iterations excluded from the average.
        delay: u64,
    },
}

impl Averaging {
    /// Weight of iteration `t` (1-based), or `None` if it is excluded.
    pub fn weight(self, t: u64) -> Option<f64> {
        match self {
            Averaging::Uniform => Some(1.0),
            Averaging::Linear { delay } if t > delay => Some((t - delay) as f64),
            Averaging::Linear { .. } => None,
        }
    }
}

/// Which deals a pass visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DealSelection {
    /// All 24 rank triples, weighted by multiplicity.
    Enumerate,
    /// `per_pass` deals drawn uniformly at random, unit weight.
    Sample {
        /// Deals drawn per pass.
        per_pass: usize,
    },
}

/// Configuration for the CFR solver.
///
/// # Example
/// ```
/// use leduc_solver::cfr::CFRConfig;
///
/// let config = CFRConfig::default();
/// assert!(config.use_cfr_plus); // CFR+ is enabled by default
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CFRConfig {
    /// Use CFR+ (floor regrets at zero on every flush).
    pub use_cfr_plus: bool,

    /// Alternate regret updates between players, one pass each.
    ///
    /// When false, one pass updates both players at once.
    pub alternating: bool,

    /// Average-strategy weighting.
    pub averaging: Averaging,

    /// Deal enumeration or sampling.
    pub deals: DealSelection,

    /// Traverse deals in parallel within a pass.
    pub parallel: bool,

    /// Round cap for best-response solves.
    pub best_response_rounds: usize,

    /// Random seed for reproducibility.
    ///
    /// Only used when sampling deals. If `None`, a random seed is used.
    pub seed: Option<u64>,
}

impl Default for CFRConfig {
    fn default() -> Self {
        Self {
            use_cfr_plus: true,
            alternating: true,
            averaging: Averaging::Linear { delay: 0 },
            deals: DealSelection::Enumerate,
            parallel: false,
            best_response_rounds: DEFAULT_MAX_ROUNDS,
            seed: None,
        }
    }
}

impl CFRConfig {
    /// Create a new CFRConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration for vanilla CFR (for comparison/testing).
    ///
    /// Regrets may go negative and every iteration is averaged equally.
    pub fn vanilla() -> Self {
        Self {
            use_cfr_plus: false,
            averaging: Averaging::Uniform,
            ..Default::default()
        }
    }

    /// CFR+ with linear averaging that ignores the first `delay` iterations.
    pub fn delayed(delay: u64) -> Self {
        Self {
            averaging: Averaging::Linear { delay },
            ..Default::default()
        }
    }

    /// Builder method: set whether to use CFR+.
    pub fn with_cfr_plus(mut self, enable: bool) -> Self {
        self.use_cfr_plus = enable;
        self
    }

    /// Builder method: set alternating or simultaneous updates.
    pub fn with_alternating(mut self, enable: bool) -> Self {
        self.alternating = enable;
        self
    }

    /// Builder method: set average-strategy weighting.
    pub fn with_averaging(mut self, averaging: Averaging) -> Self {
        self.averaging = averaging;
        self
    }

    /// Builder method: sample `per_pass` deals instead of enumerating.
    pub fn with_sampling(mut self, per_pass: usize) -> Self {
        self.deals = DealSelection::Sample { per_pass };
        self
    }

    /// Builder method: enable the parallel pass.
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    /// Builder method: set the best-response round cap.
    pub fn with_best_response_rounds(mut self, rounds: usize) -> Self {
        self.best_response_rounds = rounds;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let DealSelection::Sample { per_pass: 0 } = self.deals {
            return Err(ConfigError::InvalidSampleSize(0));
        }

        if self.best_response_rounds == 0 {
            return Err(ConfigError::InvalidRoundCap(self.best_response_rounds));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CFRConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Errors that can occur when loading or validating CFR configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sampling requested with no deals per pass.
    #[error("sampling needs at least one deal per pass, got {0}")]
    InvalidSampleSize(usize),
    /// Best-response round cap must be positive.
    #[error("best-response round cap must be at least 1, got {0}")]
    InvalidRoundCap(usize),
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// Config JSON is malformed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Statistics tracked during CFR training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CFRStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Number of information sets in the table.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// Latest exploitability (chips per hand, both seats summed).
    pub exploitability: Option<f64>,

    /// History of exploitability measurements.
    pub exploitability_history: Vec<ExploitabilityPoint>,
}

/// A single exploitability measurement at a specific iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploitabilityPoint {
    /// Iteration number when this measurement was taken.
    pub iteration: u64,
    /// Exploitability in chips per hand.
    pub exploitability: f64,
}

impl CFRStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }

    /// Record an exploitability measurement.
    pub fn record_exploitability(&mut self, iteration: u64, exploitability: f64) {
        self.exploitability = Some(exploitability);
        self.exploitability_history.push(ExploitabilityPoint {
            iteration,
            exploitability,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_averaging_weights() {
        assert_eq!(Averaging::Uniform.weight(7), Some(1.0));
        assert_eq!(Averaging::Linear { delay: 0 }.weight(3), Some(3.0));
        assert_eq!(Averaging::Linear { delay: 500 }.weight(500), None);
        assert_eq!(Averaging::Linear { delay: 500 }.weight(502), Some(2.0));
    }

    #[test]
    fn test_presets() {
        let vanilla = CFRConfig::vanilla();
        assert!(!vanilla.use_cfr_plus);
        assert_eq!(vanilla.averaging, Averaging::Uniform);

        let delayed = CFRConfig::delayed(500);
        assert!(delayed.use_cfr_plus);
        assert_eq!(delayed.averaging, Averaging::Linear { delay: 500 });
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            CFRConfig::default().with_sampling(0).validate(),
            Err(ConfigError::InvalidSampleSize(0))
        ));
        assert!(matches!(
            CFRConfig::default().with_best_response_rounds(0).validate(),
            Err(ConfigError::InvalidRoundCap(0))
        ));
        assert!(CFRConfig::default().with_sampling(12).validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = CFRConfig::vanilla()
            .with_sampling(16)
            .with_parallel(true)
            .with_seed(42);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CFRConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CFRConfig::from_json_str(r#"{"alternating": false}"#).unwrap();
        assert!(!config.alternating);
        assert!(config.use_cfr_plus);
        assert_eq!(config.deals, DealSelection::Enumerate);

        let config =
            CFRConfig::from_json_str(r#"{"averaging": {"kind": "linear", "delay": 500}}"#).unwrap();
        assert_eq!(config.averaging, Averaging::Linear { delay: 500 });
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(CFRConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            CFRConfig::from_json_str(r#"{"deals": {"kind": "sample", "per_pass": 0}}"#),
            Err(ConfigError::InvalidSampleSize(0))
        ));
    }
}

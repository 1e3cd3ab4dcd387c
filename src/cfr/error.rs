//! Solver error type.

use thiserror::Error;

use crate::cfr::config::ConfigError;
use crate::games::leduc::GameError;

/// Errors returned by the solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Best-response policy iteration hit its round cap while still changing.
    #[error(
        "best response for player {player} did not converge in {rounds} rounds \
         (last value {value:.6})"
    )]
    BestResponseNotConverged {
        /// Responding player.
        player: usize,
        /// Rounds run before giving up.
        rounds: usize,
        /// Value under the last, unconverged policy.
        value: f64,
    },

    /// A saved strategy report has no entry for this state.
    #[error("strategy report has no entry for state {0}")]
    MissingState(String),

    /// A saved entry lacks a usable probability for one of its legal actions.
    #[error("strategy report entry {label}: missing or negative probability for {action}")]
    InvalidProbability {
        /// Label of the offending entry.
        label: String,
        /// Action name in context (`fold`, `call`, ...).
        action: &'static str,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid cards, deal or state label.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Reading or writing a report failed.
    #[error("report I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A report is not valid JSON for its type.
    #[error("failed to parse report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

//! CFR (Counterfactual Regret Minimization) Solver Module.
//!
//! This module provides the CFR+ training machinery for Leduc Hold'em and the
//! exact best-response solver used to measure how far a strategy is from
//! equilibrium.
//!
//! # Overview
//!
//! CFR is an iterative algorithm that converges to Nash equilibrium by:
//! 1. Computing counterfactual regret for each action at each decision point
//! 2. Updating strategies to minimize regret over time
//! 3. Averaging strategies across iterations to converge to equilibrium
//!
//! # Supported Variants
//!
//! - **Vanilla CFR**: regrets accumulate without flooring
//! - **CFR+**: regrets are floored at zero on every flush
//! - **Linear averaging**: iteration `t` is weighted `t`, optionally after a delay
//! - **Alternating or simultaneous updates**
//! - **Enumerated or sampled deals**
//!
//! # Example
//!
//! ```
//! use leduc_solver::cfr::{CFRConfig, CFRSolver};
//!
//! let mut solver = CFRSolver::new(CFRConfig::default());
//! let stats = solver.train(100);
//! println!("Trained {} iterations in {:.2}s", stats.iterations, stats.elapsed_seconds);
//!
//! let exploitability = solver.exploitability().unwrap();
//! println!("{:.3} mbb/hand", exploitability.mbb_per_hand());
//! ```
//!
//! # Theory
//!
//! **Regret**: The difference between the value of an action and the value of the current strategy.
//! ```text
//! Regret(a) = Value(a) - Value(current_strategy)
//! ```
//!
//! **Regret Matching**: Set strategy proportional to positive regrets.
//! ```text
//! Strategy(a) = max(0, Regret(a)) / sum(max(0, Regret(a')))
//! ```
//!
//! # References
//!
//! - Zinkevich, M., et al. "Regret Minimization in Games with Incomplete Information" (2007)
//! - Tammelin, O. "Solving Large Imperfect Information Games Using CFR+" (2014)

pub mod best_response;
pub mod config;
pub mod error;
pub mod solver;
pub mod storage;
pub mod strategy;
pub mod traversal;

// Re-export main types for convenient access
pub use best_response::{BestResponse, DEFAULT_MAX_ROUNDS};
pub use config::{Averaging, CFRConfig, CFRStats, ConfigError, DealSelection, ExploitabilityPoint};
pub use error::{Result, SolverError};
pub use solver::{CFRSolver, Exploitability};
pub use storage::{RegretNode, RegretTable};
pub use strategy::{Strategy, StrategyProfile};
pub use traversal::{traverse, RegretUpdate, Traversal};

//! # Leduc Solver
//!
//! A Counterfactual Regret Minimization (CFR+) solver for Leduc Hold'em, with
//! an exact best-response solver for measuring exploitability.
//!
//! ## Features
//!
//! - **CFR+ and vanilla CFR**: batched regret updates with optional flooring
//! - **Alternating or simultaneous updates**
//! - **Linear averaging** with an optional delay
//! - **Parallel passes**: deals traversed with rayon on per-worker shards
//! - **Exact best response**: policy iteration over all 24 weighted deals
//!
//! ## Quick Start
//!
//! ```
//! use leduc_solver::{CFRConfig, CFRSolver};
//!
//! let mut solver = CFRSolver::new(CFRConfig::default());
//! solver.train(200);
//!
//! let exploitability = solver.exploitability().unwrap();
//! assert!(exploitability.total() < 0.1);
//! ```
//!
//! ## Modules
//!
//! - [`cfr`]: regret storage, traversal, best response and the training loop
//! - [`games`]: the Leduc Hold'em game model and reporting
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    CFRSolver (training loop)                    │
//! │  - Deal enumeration/sampling   - Flush / commit                 │
//! │  - Parallel shards             - Exploitability                 │
//! └─────────────────────────────────────────────────────────────────┘
//!          │                        │                       │
//!          ▼                        ▼                       ▼
//!    ┌───────────┐          ┌──────────────┐        ┌──────────────┐
//!    │ Traversal │ ───────▶ │ RegretTable  │ ─────▶ │ BestResponse │
//!    └───────────┘          └──────────────┘        └──────────────┘
//!          │                                                │
//!          └──────────────────┐        ┌────────────────────┘
//!                             ▼        ▼
//!                      ┌──────────────────────┐
//!                      │  LeducState / Deal   │
//!                      └──────────────────────┘
//! ```

#![warn(missing_docs)]

/// CFR (Counterfactual Regret Minimization) solver module.
pub mod cfr;

/// Game model module.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use cfr::{
    BestResponse, CFRConfig, CFRSolver, CFRStats, Exploitability, RegretTable, Result,
    SolverError, StrategyProfile,
};
pub use games::leduc::{Action, Deal, LeducState, Rank};

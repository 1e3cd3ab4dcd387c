//! CFR+ training loop for Leduc Hold'em.
//!
//! This module drives the core pieces: it picks deals for each pass, runs the
//! traversal for the updating player(s), flushes buffered regrets, tracks
//! statistics and measures exploitability with two best-response solves.
//!
//! One iteration in the default (alternating) mode is:
//! - a pass updating player 0 that also accumulates the average strategy,
//! - a flush,
//! - a pass updating player 1 with accumulation off,
//! - a flush.

use std::time::Instant;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cfr::best_response::BestResponse;
use crate::cfr::config::{CFRConfig, CFRStats, DealSelection};
use crate::cfr::error::Result;
use crate::cfr::storage::RegretTable;
use crate::cfr::strategy::StrategyProfile;
use crate::cfr::traversal::{RegretUpdate, Traversal};
use crate::games::leduc::{Deal, LeducState};

/// The main CFR solver.
///
/// # Example
/// ```
/// use leduc_solver::cfr::{CFRConfig, CFRSolver};
///
/// let mut solver = CFRSolver::new(CFRConfig::default());
/// solver.train(50);
///
/// let exploitability = solver.exploitability().unwrap();
/// assert!(exploitability.total() < 1.0);
/// ```
pub struct CFRSolver {
    /// Configuration for the solver.
    config: CFRConfig,

    /// Regrets and strategy sums for every information state.
    table: RegretTable,

    /// All valid rank triples, used when enumerating.
    deals: Vec<Deal>,

    /// Current iteration count.
    iteration: u64,

    /// Statistics tracking.
    stats: CFRStats,

    /// Random number generator for deal sampling.
    rng: StdRng,
}

impl CFRSolver {
    /// Create a new solver.
    ///
    /// The configuration is used as given; call [`CFRConfig::validate`] first
    /// when it comes from user input.
    pub fn new(config: CFRConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut stats = CFRStats::new();
        let table = RegretTable::new();
        stats.info_sets = table.num_info_sets();

        Self {
            config,
            table,
            deals: Deal::all(),
            iteration: 0,
            stats,
            rng,
        }
    }

    /// Run a single iteration.
    pub fn run_iteration(&mut self) {
        self.iteration += 1;
        let weight = self.config.averaging.weight(self.iteration);

        if self.config.alternating {
            self.run_pass(RegretUpdate::Player(0), weight);
            self.flush();
            self.run_pass(RegretUpdate::Player(1), None);
            self.flush();
        } else {
            self.run_pass(RegretUpdate::Both, weight);
            self.flush();
        }
    }

    /// Deals for one pass with their initial reach weight.
    fn select_deals(&mut self) -> Vec<(Deal, f64)> {
        match self.config.deals {
            DealSelection::Enumerate => self.deals.iter().map(|d| (*d, d.weight())).collect(),
            DealSelection::Sample { per_pass } => (0..per_pass)
                .map(|_| (Deal::sample(&mut self.rng), 1.0))
                .collect(),
        }
    }

    /// Traverse every selected deal once. Regret deltas stay buffered.
    fn run_pass(&mut self, update: RegretUpdate, weight: Option<f64>) {
        let deals = self.select_deals();

        if self.config.parallel {
            // Every worker sees the same frozen regrets; only buffers are merged.
            let base = &self.table;
            let merged = deals
                .par_iter()
                .fold(
                    || base.shard(),
                    |mut shard, (deal, w)| {
                        Traversal::new(deal, update)
                            .with_strategy_weight(weight)
                            .run(&mut shard, LeducState::root(deal), [*w, *w]);
                        shard
                    },
                )
                .reduce_with(|mut a, b| {
                    a.absorb(&b);
                    a
                });

            if let Some(shard) = merged {
                self.table.absorb(&shard);
            }
        } else {
            for (deal, w) in &deals {
                Traversal::new(deal, update)
                    .with_strategy_weight(weight)
                    .run(&mut self.table, LeducState::root(deal), [*w, *w]);
            }
        }
    }

    fn flush(&mut self) {
        if self.config.use_cfr_plus {
            self.table.flush_all();
        } else {
            self.table.commit_all();
        }
    }

    /// Train the solver for a specified number of iterations.
    ///
    /// # Returns
    /// Statistics accumulated over all training so far.
    pub fn train(&mut self, iterations: u64) -> &CFRStats {
        let start_time = Instant::now();
        let base_seconds = self.stats.elapsed_seconds;

        for _ in 0..iterations {
            self.run_iteration();
        }

        self.refresh_stats(base_seconds, start_time);
        &self.stats
    }

    /// Train with a callback for progress tracking.
    ///
    /// # Arguments
    /// * `iterations` - Number of iterations to run
    /// * `callback_interval` - How often to call the callback
    /// * `callback` - Function called every `callback_interval` iterations
    pub fn train_with_callback<F>(
        &mut self,
        iterations: u64,
        callback_interval: u64,
        mut callback: F,
    ) -> &CFRStats
    where
        F: FnMut(&CFRStats),
    {
        let start_time = Instant::now();
        let base_seconds = self.stats.elapsed_seconds;
        let interval = callback_interval.max(1);

        for i in 0..iterations {
            self.run_iteration();

            if (i + 1) % interval == 0 {
                self.refresh_stats(base_seconds, start_time);
                callback(&self.stats);
            }
        }

        self.refresh_stats(base_seconds, start_time);
        &self.stats
    }

    fn refresh_stats(&mut self, base_seconds: f64, start_time: Instant) {
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.table.num_info_sets();
        self.stats.elapsed_seconds = base_seconds + start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
    }

    /// Average strategy at every state.
    pub fn average_strategy(&self) -> StrategyProfile {
        self.table.extract_all()
    }

    /// Best responses to the average strategy for both seats, solved concurrently.
    pub fn best_responses(&self) -> Result<[BestResponse; 2]> {
        BestResponse::for_both_seats(&self.average_strategy(), self.config.best_response_rounds)
    }

    /// Exploitability of the current average strategy.
    ///
    /// The measurement is recorded in the solver statistics.
    pub fn exploitability(&mut self) -> Result<Exploitability> {
        self.measure().map(|(exploitability, _)| exploitability)
    }

    /// Like [`exploitability`](Self::exploitability), also returning the
    /// solved best responses for reporting.
    pub fn measure(&mut self) -> Result<(Exploitability, [BestResponse; 2])> {
        let responses = self.best_responses()?;
        let result = Exploitability::from_responses(&responses);

        self.stats.record_exploitability(self.iteration, result.total());
        info!(
            "iteration {}: exploitability {:.6} ({:.3} mbb/hand), br p0 {:.6}, br p1 {:.6}",
            self.iteration,
            result.total(),
            result.mbb_per_hand(),
            result.values[0],
            result.values[1]
        );

        Ok((result, responses))
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get the number of information sets.
    pub fn num_info_sets(&self) -> usize {
        self.table.num_info_sets()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &CFRStats {
        &self.stats
    }

    /// Get reference to the regret table for analysis.
    pub fn table(&self) -> &RegretTable {
        &self.table
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &CFRConfig {
        &self.config
    }

    /// Reset the solver to initial state.
    pub fn reset(&mut self) {
        self.table.clear();
        self.iteration = 0;
        self.stats = CFRStats::new();
        self.stats.info_sets = self.table.num_info_sets();
    }
}

/// Best-response values against one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exploitability {
    /// Best-response value for each seat, in chips per hand.
    pub values: [f64; 2],
}

impl Exploitability {
    /// Values of two solved best responses, `responses[p]` for seat `p`.
    pub fn from_responses(responses: &[BestResponse; 2]) -> Self {
        Self {
            values: [responses[0].value(), responses[1].value()],
        }
    }

    /// Sum of both best-response values. Zero at equilibrium.
    pub fn total(&self) -> f64 {
        self.values[0] + self.values[1]
    }

    /// Average gain per seat in milli-chips per hand.
    pub fn mbb_per_hand(&self) -> f64 {
        self.total() / 2.0 * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_iteration_counter_and_stats() {
        let mut solver = CFRSolver::new(CFRConfig::default());
        let stats = solver.train(3);
        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.info_sets, 528);
        assert_eq!(solver.iteration(), 3);
    }

    #[test]
    fn test_callback_interval() {
        let mut solver = CFRSolver::new(CFRConfig::default());
        let mut seen = Vec::new();
        solver.train_with_callback(10, 4, |s| seen.push(s.iterations));
        assert_eq!(seen, vec![4, 8]);
    }

    #[test]
    fn test_regrets_non_negative_after_iteration() {
        let mut solver = CFRSolver::new(CFRConfig::default());
        solver.train(5);
        for (_, node) in solver.table().iter() {
            assert!(node.regrets().iter().all(|&r| r >= 0.0));
            assert_eq!(node.pending(), &[0.0; 3]);
        }
    }

    #[test]
    fn test_vanilla_keeps_negative_regrets() {
        let mut solver = CFRSolver::new(CFRConfig::vanilla());
        solver.train(5);
        let any_negative = solver
            .table()
            .iter()
            .any(|(_, node)| node.regrets().iter().any(|&r| r < 0.0));
        assert!(any_negative);
    }

    #[test]
    fn test_delayed_averaging_leaves_sums_empty() {
        let mut solver = CFRSolver::new(CFRConfig::delayed(5));
        solver.train(5);
        assert!(solver
            .table()
            .iter()
            .all(|(_, node)| node.strategy_sum() == &[0.0; 3]));
        assert_eq!(solver.average_strategy(), StrategyProfile::uniform());
    }

    #[test]
    fn test_exploitability_is_recorded() {
        let mut solver = CFRSolver::new(CFRConfig::default());
        solver.train(20);
        let e = solver.exploitability().unwrap();
        assert!(e.total() > 0.0);
        assert_relative_eq!(e.mbb_per_hand(), e.total() * 500.0);
        assert_eq!(solver.stats().exploitability, Some(e.total()));
        assert_eq!(solver.stats().exploitability_history.len(), 1);
    }

    #[test]
    fn test_sampled_training_is_reproducible() {
        let config = CFRConfig::default().with_sampling(8).with_seed(11);
        let mut a = CFRSolver::new(config.clone());
        let mut b = CFRSolver::new(config);
        a.train(10);
        b.train(10);
        assert_eq!(a.table(), b.table());
    }

    #[test]
    fn test_reset() {
        let mut solver = CFRSolver::new(CFRConfig::default());
        solver.train(2);
        solver.reset();
        assert_eq!(solver.iteration(), 0);
        assert_eq!(solver.table(), &RegretTable::new());
    }
}

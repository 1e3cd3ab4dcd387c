//! Exact best response to a fixed strategy profile.
//!
//! A single top-down walk can't do backward induction here: the same
//! information state is reached under many deals, and its best action depends
//! on all of them. The solver therefore alternates two steps:
//!
//! 1. **Evaluate**: walk every deal under the current best-response policy,
//!    accumulating chance-and-opponent-weighted action values per state.
//! 2. **Improve**: at each of the responder's states, put equal probability
//!    on the actions with the highest accumulated value.
//!
//! The loop ends when an improvement step changes nothing. The tree is finite
//! and acyclic, so policies settle from the leaves upward within a few rounds.

use log::{debug, warn};

use crate::cfr::error::{Result, SolverError};
use crate::cfr::strategy::{Strategy, StrategyProfile};
use crate::games::leduc::{Deal, LeducState, NUM_ACTIONS, NUM_STATES};

/// Default cap on evaluation/improvement rounds.
pub const DEFAULT_MAX_ROUNDS: usize = 20;

/// Best-response solver for one fixed opponent profile.
///
/// # Example
/// ```
/// use leduc_solver::cfr::{BestResponse, StrategyProfile};
///
/// let mut br = BestResponse::new(StrategyProfile::uniform());
/// let value = br.compute(0).unwrap();
/// assert!(value > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct BestResponse {
    /// Strategy the responder plays against.
    fixed: StrategyProfile,

    /// Responder's current policy. Only states owned by the responder matter.
    response: StrategyProfile,

    /// Weighted action values accumulated during the last evaluation.
    action_values: Vec<[f64; NUM_ACTIONS]>,

    /// Value of the last `compute`.
    value: f64,

    /// Rounds used by the last `compute`.
    rounds: usize,

    max_rounds: usize,

    deals: Vec<Deal>,
}

impl BestResponse {
    /// Solver against `fixed`, with the default round cap.
    pub fn new(fixed: StrategyProfile) -> Self {
        Self {
            fixed,
            response: StrategyProfile::uniform(),
            action_values: vec![[0.0; NUM_ACTIONS]; NUM_STATES],
            value: 0.0,
            rounds: 0,
            max_rounds: DEFAULT_MAX_ROUNDS,
            deals: Deal::all(),
        }
    }

    /// Builder method: set the round cap.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Solve both seats against `profile` concurrently.
    pub fn for_both_seats(profile: &StrategyProfile, max_rounds: usize) -> Result<[Self; 2]> {
        let solve = |player: usize| -> Result<Self> {
            let mut br = Self::new(profile.clone()).with_max_rounds(max_rounds);
            br.compute(player)?;
            Ok(br)
        };

        let (first, second) = rayon::join(|| solve(0), || solve(1));
        Ok([first?, second?])
    }

    /// Replace the fixed profile.
    pub fn load_strategy(&mut self, fixed: StrategyProfile) {
        self.fixed = fixed;
    }

    /// Compute the best response for `player` and return its value in chips
    /// per hand.
    ///
    /// # Errors
    /// [`SolverError::BestResponseNotConverged`] if the policy is still
    /// changing after the round cap.
    pub fn compute(&mut self, player: usize) -> Result<f64> {
        self.response = StrategyProfile::uniform();
        self.rounds = 0;

        while self.rounds < self.max_rounds {
            self.rounds += 1;
            self.value = self.evaluate(player);
            let changed = self.improve(player);
            debug!(
                "best response p{player}: round {} value {:.6} changed {changed}",
                self.rounds, self.value
            );
            if changed == 0 {
                return Ok(self.value);
            }
        }

        warn!(
            "best response p{player} still changing after {} rounds (value {:.6})",
            self.rounds, self.value
        );
        Err(SolverError::BestResponseNotConverged {
            player,
            rounds: self.rounds,
            value: self.value,
        })
    }

    /// Value of the last `compute`.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Rounds used by the last `compute`.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Responder's policy from the last `compute`.
    pub fn strategy(&self) -> &StrategyProfile {
        &self.response
    }

    /// One evaluation sweep over all deals. Returns the weighted mean value.
    fn evaluate(&mut self, player: usize) -> f64 {
        self.action_values.fill([0.0; NUM_ACTIONS]);

        let mut total = 0.0;
        let mut total_weight = 0.0;
        for i in 0..self.deals.len() {
            let deal = self.deals[i];
            let w = deal.weight();
            total += w * self.walk(&deal, LeducState::root(&deal), player, w);
            total_weight += w;
        }
        total / total_weight
    }

    /// Value of `state` for `player` under the current policies.
    fn walk(&mut self, deal: &Deal, state: LeducState, player: usize, weight: f64) -> f64 {
        let actor = state.acting_player();
        let legal = state.legal_actions();
        let sign = if actor == player { 1.0 } else { -1.0 };

        if actor == player {
            let mut values = [0.0; NUM_ACTIONS];
            for action in legal.iter() {
                values[action.index()] = if state.is_terminal(action) {
                    sign * f64::from(state.payout(action, deal.private_card(1 - actor)))
                } else {
                    self.walk(deal, state.next_state(action, deal), player, weight)
                };
            }

            let slot = &mut self.action_values[state.index()];
            for action in legal.iter() {
                slot[action.index()] += weight * values[action.index()];
            }
            self.response.strategy(&state).expectation(&values)
        } else {
            let strategy = *self.fixed.strategy(&state);
            let mut value = 0.0;
            for action in legal.iter() {
                let p = strategy[action];
                if p == 0.0 {
                    continue;
                }
                let child = if state.is_terminal(action) {
                    sign * f64::from(state.payout(action, deal.private_card(1 - actor)))
                } else {
                    self.walk(deal, state.next_state(action, deal), player, weight * p)
                };
                value += p * child;
            }
            value
        }
    }

    /// Greedy policy update. Returns how many states changed.
    fn improve(&mut self, player: usize) -> usize {
        let mut changed = 0;
        for state in LeducState::all().filter(|s| s.acting_player() == player) {
            let best = Strategy::argmax(self.action_values[state.index()], state.legal_actions());
            if best != *self.response.strategy(&state) {
                self.response.set(&state, best);
                changed += 1;
            }
        }
        changed
    }
}

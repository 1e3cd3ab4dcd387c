//! Per-state action distributions and whole-game strategy profiles.

use std::ops::Index;
use std::path::Path;

use crate::cfr::error::Result;
use crate::games::leduc::{Action, ActionSet, LeducState, StrategyReport, NUM_ACTIONS, NUM_STATES};

/// A probability per action slot.
///
/// Illegal slots hold 0 and legal slots sum to 1 once the strategy has been
/// built through one of the normalizing constructors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Strategy([f64; NUM_ACTIONS]);

impl Strategy {
    /// Uniform over the legal actions.
    pub fn uniform(legal: ActionSet) -> Strategy {
        let mut probs = [0.0; NUM_ACTIONS];
        let p = 1.0 / legal.len() as f64;
        for action in legal.iter() {
            probs[action.index()] = p;
        }
        Strategy(probs)
    }

    /// Normalize non-negative weights over the legal actions.
    ///
    /// Falls back to uniform when the weights sum to zero.
    pub fn from_weights(weights: [f64; NUM_ACTIONS], legal: ActionSet) -> Strategy {
        let sum: f64 = legal.iter().map(|a| weights[a.index()]).sum();
        if sum <= 0.0 {
            return Strategy::uniform(legal);
        }

        let mut probs = [0.0; NUM_ACTIONS];
        for action in legal.iter() {
            probs[action.index()] = weights[action.index()] / sum;
        }
        Strategy(probs)
    }

    /// Equal probability on every legal action attaining the highest value.
    pub fn argmax(values: [f64; NUM_ACTIONS], legal: ActionSet) -> Strategy {
        let best = legal
            .iter()
            .map(|a| values[a.index()])
            .fold(f64::NEG_INFINITY, f64::max);

        let mut probs = [0.0; NUM_ACTIONS];
        let winners = legal.iter().filter(|a| values[a.index()] == best).count();
        let p = 1.0 / winners as f64;
        for action in legal.iter().filter(|a| values[a.index()] == best) {
            probs[action.index()] = p;
        }
        Strategy(probs)
    }

    /// Raw probabilities by slot.
    #[inline]
    pub fn probabilities(&self) -> &[f64; NUM_ACTIONS] {
        &self.0
    }

    /// Probability mass on the legal actions.
    pub fn total(&self, legal: ActionSet) -> f64 {
        legal.iter().map(|a| self[a]).sum()
    }

    /// Expected value given a value per slot.
    #[inline]
    pub fn expectation(&self, values: &[f64; NUM_ACTIONS]) -> f64 {
        self.0.iter().zip(values).map(|(p, v)| p * v).sum()
    }
}

impl Index<Action> for Strategy {
    type Output = f64;

    #[inline]
    fn index(&self, action: Action) -> &f64 {
        &self.0[action.index()]
    }
}

/// A strategy for every information state, indexed by [`LeducState::index`].
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyProfile {
    strategies: Vec<Strategy>,
}

impl StrategyProfile {
    /// Uniform play everywhere.
    pub fn uniform() -> StrategyProfile {
        StrategyProfile {
            strategies: LeducState::all()
                .map(|s| Strategy::uniform(s.legal_actions()))
                .collect(),
        }
    }

    /// Build from a dense vector of per-state strategies.
    ///
    /// # Panics
    /// Panics unless there is exactly one strategy per state.
    pub fn from_vec(strategies: Vec<Strategy>) -> StrategyProfile {
        assert_eq!(strategies.len(), NUM_STATES, "profile needs one strategy per state");
        StrategyProfile { strategies }
    }

    /// Load the profile stored in a saved [`StrategyReport`] JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<StrategyProfile> {
        StrategyReport::load_json(path)?.profile()
    }

    /// Strategy at `state`.
    #[inline]
    pub fn strategy(&self, state: &LeducState) -> &Strategy {
        &self.strategies[state.index()]
    }

    /// Replace the strategy at `state`.
    #[inline]
    pub fn set(&mut self, state: &LeducState, strategy: Strategy) {
        self.strategies[state.index()] = strategy;
    }

    /// `(state, strategy)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (LeducState, &Strategy)> + '_ {
        self.strategies
            .iter()
            .enumerate()
            .map(|(i, s)| (LeducState::from_index(i), s))
    }

    /// Number of states covered.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// True only for a profile with no states, which the constructors never build.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_covers_legal_actions_only() {
        let s = Strategy::uniform(ActionSet::for_raises(0));
        assert_relative_eq!(s[Action::Check], 0.5);
        assert_eq!(s[Action::Bet], 0.0);
        assert_relative_eq!(s[Action::Raise], 0.5);
    }

    #[test]
    fn test_from_weights_normalizes_and_falls_back() {
        let legal = ActionSet::for_raises(1);
        let s = Strategy::from_weights([1.0, 3.0, 0.0], legal);
        assert_relative_eq!(s[Action::Bet], 0.75);
        assert_relative_eq!(s.total(legal), 1.0);

        let fallback = Strategy::from_weights([0.0; NUM_ACTIONS], legal);
        assert_eq!(fallback, Strategy::uniform(legal));
    }

    #[test]
    fn test_from_weights_ignores_illegal_slots() {
        let legal = ActionSet::for_raises(0);
        let s = Strategy::from_weights([1.0, 5.0, 1.0], legal);
        assert_eq!(s[Action::Bet], 0.0);
        assert_relative_eq!(s[Action::Check], 0.5);
    }

    #[test]
    fn test_argmax_splits_ties() {
        let legal = ActionSet::for_raises(2);
        let s = Strategy::argmax([2.0, 5.0, 5.0], legal);
        assert_eq!(s[Action::Check], 0.0);
        assert_relative_eq!(s[Action::Bet], 0.5);
        assert_relative_eq!(s[Action::Raise], 0.5);

        // Illegal slot never wins even with the largest value.
        let capped = Strategy::argmax([1.0, 0.0, 9.0], ActionSet::for_raises(3));
        assert_eq!(capped[Action::Raise], 0.0);
        assert_relative_eq!(capped[Action::Check], 1.0);
    }

    #[test]
    fn test_uniform_profile() {
        let profile = StrategyProfile::uniform();
        assert_eq!(profile.len(), NUM_STATES);
        for (state, strategy) in profile.iter() {
            assert_relative_eq!(strategy.total(state.legal_actions()), 1.0);
        }
    }
}

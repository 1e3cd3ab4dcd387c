//! Storage for CFR regrets and strategy sums.
//!
//! The Leduc tree has a fixed, small set of information states, so storage is
//! a dense `Vec` of [`RegretNode`]s addressed by [`LeducState::index`]. Regret
//! deltas are buffered per node and only become visible at a flush, which
//! keeps every node's current strategy fixed for the duration of a pass.

use crate::cfr::strategy::{Strategy, StrategyProfile};
use crate::games::leduc::{ActionSet, LeducState, NUM_ACTIONS, NUM_STATES};

/// Learning data for one information state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegretNode {
    /// Cumulative counterfactual regret per action.
    regrets: [f64; NUM_ACTIONS],

    /// Regret deltas gathered since the last flush.
    pending: [f64; NUM_ACTIONS],

    /// Reach-weighted sum of current strategies, for the average strategy.
    strategy_sum: [f64; NUM_ACTIONS],
}

impl RegretNode {
    /// Fresh all-zero node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current strategy by regret matching, without touching the accumulator.
    ///
    /// Proportional to positive regrets; uniform if none is positive.
    pub fn regret_matching(&self, legal: ActionSet) -> Strategy {
        Strategy::from_weights(self.regrets.map(|r| r.max(0.0)), legal)
    }

    /// Current strategy, adding `weight * strategy` into the average accumulator.
    pub fn current_strategy(&mut self, legal: ActionSet, weight: f64) -> Strategy {
        let strategy = self.regret_matching(legal);
        for (sum, p) in self.strategy_sum.iter_mut().zip(strategy.probabilities()) {
            *sum += weight * p;
        }
        strategy
    }

    /// Buffer a regret delta for action slot `action`.
    #[inline]
    pub fn apply_delta(&mut self, action: usize, delta: f64) {
        self.pending[action] += delta;
    }

    /// Apply pending deltas and floor regrets at zero (CFR+).
    pub fn flush(&mut self) {
        for (regret, pending) in self.regrets.iter_mut().zip(self.pending.iter_mut()) {
            *regret = (*regret + *pending).max(0.0);
            *pending = 0.0;
        }
    }

    /// Apply pending deltas without flooring (vanilla CFR).
    pub fn commit(&mut self) {
        for (regret, pending) in self.regrets.iter_mut().zip(self.pending.iter_mut()) {
            *regret += *pending;
            *pending = 0.0;
        }
    }

    /// Normalized average strategy; uniform if nothing has been accumulated.
    pub fn stored_strategy(&self, legal: ActionSet) -> Strategy {
        Strategy::from_weights(self.strategy_sum, legal)
    }

    /// Cumulative regrets.
    pub fn regrets(&self) -> &[f64; NUM_ACTIONS] {
        &self.regrets
    }

    /// Deltas not yet flushed.
    pub fn pending(&self) -> &[f64; NUM_ACTIONS] {
        &self.pending
    }

    /// Raw average-strategy accumulator.
    pub fn strategy_sum(&self) -> &[f64; NUM_ACTIONS] {
        &self.strategy_sum
    }

    /// Same regrets, nothing pending or accumulated.
    fn frozen_copy(&self) -> Self {
        Self {
            regrets: self.regrets,
            ..Self::default()
        }
    }

    /// Add another node's pending deltas and accumulator into this one.
    fn absorb(&mut self, other: &RegretNode) {
        for i in 0..NUM_ACTIONS {
            self.pending[i] += other.pending[i];
            self.strategy_sum[i] += other.strategy_sum[i];
        }
    }
}

/// One [`RegretNode`] per Leduc information state.
#[derive(Debug, Clone, PartialEq)]
pub struct RegretTable {
    nodes: Vec<RegretNode>,
}

impl Default for RegretTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RegretTable {
    /// Table with every node zeroed.
    pub fn new() -> Self {
        Self {
            nodes: vec![RegretNode::new(); NUM_STATES],
        }
    }

    /// Node for `state`.
    #[inline]
    pub fn node(&self, state: &LeducState) -> &RegretNode {
        &self.nodes[state.index()]
    }

    /// Mutable node for `state`.
    #[inline]
    pub fn node_mut(&mut self, state: &LeducState) -> &mut RegretNode {
        &mut self.nodes[state.index()]
    }

    /// Flush every node with flooring.
    pub fn flush_all(&mut self) {
        self.nodes.iter_mut().for_each(RegretNode::flush);
    }

    /// Commit every node without flooring.
    pub fn commit_all(&mut self) {
        self.nodes.iter_mut().for_each(RegretNode::commit);
    }

    /// Average strategy at every state.
    pub fn extract_all(&self) -> StrategyProfile {
        StrategyProfile::from_vec(
            self.nodes
                .iter()
                .enumerate()
                .map(|(i, node)| {
                    node.stored_strategy(LeducState::from_index(i).legal_actions())
                })
                .collect(),
        )
    }

    /// Worker copy for a parallel pass: the same regrets, so the same current
    /// strategies, with empty pending buffers and accumulators.
    pub fn shard(&self) -> Self {
        Self {
            nodes: self.nodes.iter().map(RegretNode::frozen_copy).collect(),
        }
    }

    /// Merge a shard's pending deltas and accumulated strategy into this table.
    pub fn absorb(&mut self, shard: &RegretTable) {
        for (node, other) in self.nodes.iter_mut().zip(&shard.nodes) {
            node.absorb(other);
        }
    }

    /// Number of information states.
    pub fn num_info_sets(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate `(state, node)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (LeducState, &RegretNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (LeducState::from_index(i), n))
    }

    /// Zero every node.
    pub fn clear(&mut self) {
        self.nodes.fill(RegretNode::new());
    }
}

//! Recursive CFR traversal for one fixed deal.
//!
//! Utilities are always expressed from the point of view of the player acting
//! at the current state, so a child value is negated whenever the turn passes
//! to the other player.

use crate::cfr::storage::RegretTable;
use crate::games::leduc::{Deal, LeducState, NUM_ACTIONS};

/// Which players receive regret updates during a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegretUpdate {
    /// Alternating updates: only this player's nodes get deltas.
    Player(usize),
    /// Simultaneous updates: every visited node gets deltas.
    Both,
}

impl RegretUpdate {
    /// Whether nodes owned by `player` are updated.
    #[inline]
    pub fn includes(self, player: usize) -> bool {
        match self {
            RegretUpdate::Player(p) => p == player,
            RegretUpdate::Both => true,
        }
    }
}

/// One depth-first walk of the betting tree for a fixed deal.
#[derive(Debug, Clone, Copy)]
pub struct Traversal<'a> {
    deal: &'a Deal,
    update: RegretUpdate,
    strategy_weight: Option<f64>,
}

impl<'a> Traversal<'a> {
    /// Traversal that updates regrets per `update` and does not accumulate
    /// the average strategy.
    pub fn new(deal: &'a Deal, update: RegretUpdate) -> Self {
        Self {
            deal,
            update,
            strategy_weight: None,
        }
    }

    /// Accumulate the average strategy, scaled by `weight` on top of the
    /// acting player's reach. `None` turns accumulation off.
    pub fn with_strategy_weight(mut self, weight: Option<f64>) -> Self {
        self.strategy_weight = weight;
        self
    }

    /// Walk the subtree under `state` and return its value for the acting player.
    ///
    /// `reach[p]` is player `p`'s contribution to the probability of reaching
    /// `state`, including any chance weight the caller folds in.
    pub fn run(&self, table: &mut RegretTable, state: LeducState, reach: [f64; 2]) -> f64 {
        let player = state.acting_player();
        let legal = state.legal_actions();

        let strategy = {
            let node = table.node_mut(&state);
            match self.strategy_weight {
                Some(weight) => node.current_strategy(legal, reach[player] * weight),
                None => node.regret_matching(legal),
            }
        };

        let mut utilities = [0.0; NUM_ACTIONS];
        let mut value = 0.0;

        for action in legal.iter() {
            let p = strategy[action];
            let utility = if state.is_terminal(action) {
                f64::from(state.payout(action, self.deal.private_card(1 - player)))
            } else {
                let mut next_reach = reach;
                next_reach[player] *= p;
                let child = self.run(table, state.next_state(action, self.deal), next_reach);
                if state.next_acting_player(action) == player {
                    child
                } else {
                    -child
                }
            };
            utilities[action.index()] = utility;
            value += p * utility;
        }

        if self.update.includes(player) {
            let opponent_reach = reach[1 - player];
            let node = table.node_mut(&state);
            for action in legal.iter() {
                let regret = utilities[action.index()] - value;
                node.apply_delta(action.index(), regret * opponent_reach);
            }
        }

        value
    }
}

/// Traverse from `state` for `deal`, accumulating the average strategy with
/// unit weight. Returns the value for the player acting at `state`.
pub fn traverse(
    table: &mut RegretTable,
    deal: &Deal,
    state: LeducState,
    reach: [f64; 2],
    update: RegretUpdate,
) -> f64 {
    Traversal::new(deal, update)
        .with_strategy_weight(Some(1.0))
        .run(table, state, reach)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::leduc::{Action, Rank};
    use approx::assert_relative_eq;

    #[test]
    fn test_regret_update_includes() {
        assert!(RegretUpdate::Player(0).includes(0));
        assert!(!RegretUpdate::Player(0).includes(1));
        assert!(RegretUpdate::Both.includes(1));
    }

    #[test]
    fn test_traverse_only_touches_updating_players_regrets() {
        let deal = Deal::new(Rank::King, Rank::Jack, Rank::Queen).unwrap();
        let mut table = RegretTable::new();
        traverse(&mut table, &deal, LeducState::root(&deal), [1.0, 1.0], RegretUpdate::Player(0));

        for (state, node) in table.iter() {
            if state.acting_player() == 1 {
                assert_eq!(node.pending(), &[0.0; NUM_ACTIONS], "{state}");
            }
        }
        let root = LeducState::root(&deal);
        assert!(table.node(&root).pending().iter().any(|&d| d != 0.0));
    }

    #[test]
    fn test_stronger_card_has_higher_uniform_value() {
        // Uniform play ignores the cards, so only showdowns separate the two deals.
        let a = Deal::new(Rank::King, Rank::Jack, Rank::Queen).unwrap();
        let b = Deal::new(Rank::Jack, Rank::King, Rank::Queen).unwrap();
        let mut table = RegretTable::new();

        let va = Traversal::new(&a, RegretUpdate::Both).run(
            &mut table,
            LeducState::root(&a),
            [1.0, 1.0],
        );
        let vb = Traversal::new(&b, RegretUpdate::Both).run(
            &mut table,
            LeducState::root(&b),
            [1.0, 1.0],
        );
        assert!(va > vb, "{va} <= {vb}");
        // Regrets were only buffered, so both walks saw the same uniform strategy.
        assert_eq!(table.node(&LeducState::root(&a)).regrets(), &[0.0; NUM_ACTIONS]);
    }

    #[test]
    fn test_deltas_sum_to_zero_under_node_strategy() {
        let deal = Deal::new(Rank::Queen, Rank::King, Rank::Jack).unwrap();
        let mut table = RegretTable::new();
        let root = LeducState::root(&deal);
        traverse(&mut table, &deal, root, [1.0, 1.0], RegretUpdate::Both);

        // With a uniform strategy the expected regret delta is zero.
        let pending = table.node(&root).pending();
        let net = pending[Action::Check.index()] + pending[Action::Raise.index()];
        assert_relative_eq!(net, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_accumulation_gated_off() {
        let deal = Deal::new(Rank::Queen, Rank::King, Rank::Jack).unwrap();
        let mut table = RegretTable::new();
        Traversal::new(&deal, RegretUpdate::Player(1)).run(
            &mut table,
            LeducState::root(&deal),
            [4.0, 4.0],
        );
        assert!(table.iter().all(|(_, node)| node.strategy_sum() == &[0.0; NUM_ACTIONS]));
    }

    #[test]
    fn test_accumulation_uses_own_reach_and_weight() {
        let deal = Deal::new(Rank::Queen, Rank::King, Rank::Jack).unwrap();
        let mut table = RegretTable::new();
        let root = LeducState::root(&deal);
        Traversal::new(&deal, RegretUpdate::Both)
            .with_strategy_weight(Some(3.0))
            .run(&mut table, root, [2.0, 5.0]);
        let sum: f64 = table.node(&root).strategy_sum().iter().sum();
        assert_relative_eq!(sum, 6.0);
    }
}

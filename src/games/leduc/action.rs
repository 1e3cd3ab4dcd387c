//! Betting actions and legal-action sets.

use std::fmt;

/// Number of action slots. Strategies and regrets are indexed by [`Action::index`].
pub const NUM_ACTIONS: usize = 3;

/// Most aggressive actions (opening bet included) allowed in one round.
pub const MAX_RAISES: u8 = 3;

/// A Leduc betting action.
///
/// The meaning of `Check` and `Bet` depends on the round so far:
/// with no aggression yet `Check` is a passive check, afterwards it is a fold,
/// and `Bet` always matches the outstanding wager (a call).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Check, or fold when facing a bet.
    Check = 0,
    /// Call the outstanding bet.
    Bet = 1,
    /// Bet or raise by one unit of the round's bet size.
    Raise = 2,
}

impl Action {
    /// All actions in slot order.
    pub const ALL: [Action; NUM_ACTIONS] = [Action::Check, Action::Bet, Action::Raise];

    /// Slot of this action in strategy and regret arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short code used in history labels.
    pub fn symbol(self) -> char {
        match self {
            Action::Check => 'c',
            Action::Bet => 'b',
            Action::Raise => 'r',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Check => write!(f, "Check"),
            Action::Bet => write!(f, "Bet"),
            Action::Raise => write!(f, "Raise"),
        }
    }
}

/// Legal actions at a decision point, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionSet {
    actions: [Action; NUM_ACTIONS],
    len: usize,
}

impl ActionSet {
    /// Legal actions after `raises` aggressive actions in the current round.
    ///
    /// - 0: check or raise
    /// - 1, 2: fold, call or raise
    /// - 3 (cap): fold or call
    pub fn for_raises(raises: u8) -> ActionSet {
        match raises {
            0 => ActionSet {
                actions: [Action::Check, Action::Raise, Action::Raise],
                len: 2,
            },
            r if r >= MAX_RAISES => ActionSet {
                actions: [Action::Check, Action::Bet, Action::Bet],
                len: 2,
            },
            _ => ActionSet {
                actions: Action::ALL,
                len: 3,
            },
        }
    }

    /// Number of legal actions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: every decision point has at least two actions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Legal actions as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Action] {
        &self.actions[..self.len]
    }

    /// Iterate over legal actions.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.as_slice().iter().copied()
    }

    /// Whether `action` is legal here.
    pub fn contains(&self, action: Action) -> bool {
        self.as_slice().contains(&action)
    }
}

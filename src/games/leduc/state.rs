//! Information states of the Leduc betting tree.
//!
//! A [`LeducState`] is what the acting player knows at a decision point:
//! their own private card, the public betting so far and, in the second
//! round, the shared card. The opponent's card is never part of the state;
//! it comes from the [`Deal`] only when a showdown is evaluated.
//!
//! ## Round histories
//!
//! Betting inside one round is packed into a code in `0..8`:
//! `4 * opened_with_check + raises`. Every continuing action either opens
//! with a check (`+4`) or raises (`+1`); any other action ends the round or
//! the hand, so the code captures the whole round.
//!
//! ## Dense indexing
//!
//! All 528 states map to indices in `0..528`:
//!
//! ```text
//! round 0:  card * 8 + history                                      (0..24)
//! round 1:  24 + shared * 168 + history * 21 + card * 7 + (first - 1)  (24..528)
//! ```
//!
//! where `first` is the closed round-0 history code (1..=7; code 0 can't
//! close a round).
//!
//! ## Labels
//!
//! `Display` renders states as `J:cr` or `Q|K:rb/c` and [`FromStr`] reads
//! those labels back, which is how saved strategy reports are loaded.

use std::fmt;
use std::str::FromStr;

use super::action::{Action, ActionSet, MAX_RAISES};
use super::card::{compare_hands, Deal, GameError, Rank, NUM_RANKS};

/// Chips each player antes.
pub const ANTE: i32 = 1;

/// Bet size in the first round.
pub const FIRST_ROUND_BET: i32 = 2;

/// Bet size in the second round.
pub const SECOND_ROUND_BET: i32 = 4;

/// Distinct round-history codes.
const HISTORY_CODES: usize = 8;

/// Distinct codes for a closed first round (`1..=7`).
const CLOSED_FIRST_ROUNDS: usize = 7;

/// States in the first betting round.
pub const FIRST_ROUND_STATES: usize = NUM_RANKS * HISTORY_CODES;

/// Total number of information states.
pub const NUM_STATES: usize =
    FIRST_ROUND_STATES + NUM_RANKS * HISTORY_CODES * NUM_RANKS * CLOSED_FIRST_ROUNDS;

/// Betting history of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoundHistory(u8);

impl RoundHistory {
    /// Nothing has happened yet this round.
    pub const OPEN: RoundHistory = RoundHistory(0);

    /// History from its packed code.
    ///
    /// # Panics
    /// Panics if `code >= 8`.
    pub fn from_code(code: u8) -> RoundHistory {
        assert!((code as usize) < HISTORY_CODES, "round history code {code} out of range");
        RoundHistory(code)
    }

    /// Packed code `4 * opened_with_check + raises`.
    #[inline]
    pub fn code(self) -> u8 {
        self.0
    }

    /// Aggressive actions taken this round.
    #[inline]
    pub fn raises(self) -> u8 {
        self.0 % 4
    }

    /// Whether the round started with a check.
    #[inline]
    pub fn opened_with_check(self) -> bool {
        self.0 >= 4
    }

    /// True before the first decision of the round.
    #[inline]
    pub fn is_open(self) -> bool {
        self.0 == 0
    }

    /// Decisions already made this round.
    #[inline]
    pub fn actions_taken(self) -> u8 {
        self.raises() + u8::from(self.opened_with_check())
    }

    /// The one action that closes the round without folding:
    /// a call once someone has bet, a check otherwise.
    #[inline]
    pub fn closing_action(self) -> Action {
        if self.raises() > 0 {
            Action::Bet
        } else {
            Action::Check
        }
    }

    /// History after a continuing action (an opening check or a raise).
    fn after(self, action: Action) -> RoundHistory {
        match action {
            Action::Check => RoundHistory(self.0 + 4),
            _ => RoundHistory(self.0 + 1),
        }
    }
}

impl fmt::Display for RoundHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.opened_with_check() {
            write!(f, "c")?;
        }
        for _ in 0..self.raises() {
            write!(f, "r")?;
        }
        Ok(())
    }
}

/// Public information fixed once the first round closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Board {
    shared: Rank,
    first_round: RoundHistory,
}

/// A decision point as seen by the acting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeducState {
    card: Rank,
    board: Option<Board>,
    history: RoundHistory,
}

impl LeducState {
    /// First decision of the hand, seen by player 0.
    pub fn root(deal: &Deal) -> LeducState {
        LeducState::opening(deal.private_card(0))
    }

    /// First decision of the hand for a player 0 holding `card`.
    pub fn opening(card: Rank) -> LeducState {
        LeducState {
            card,
            board: None,
            history: RoundHistory::OPEN,
        }
    }

    /// Private card of the acting player.
    #[inline]
    pub fn card(&self) -> Rank {
        self.card
    }

    /// Betting round: 0 before the shared card, 1 after.
    #[inline]
    pub fn round(&self) -> usize {
        usize::from(self.board.is_some())
    }

    /// Shared card, once revealed.
    #[inline]
    pub fn shared(&self) -> Option<Rank> {
        self.board.map(|b| b.shared)
    }

    /// Betting so far in the current round.
    #[inline]
    pub fn history(&self) -> RoundHistory {
        self.history
    }

    /// How the first round closed, once in the second round.
    #[inline]
    pub fn first_round(&self) -> Option<RoundHistory> {
        self.board.map(|b| b.first_round)
    }

    /// Aggressive actions in the current round.
    #[inline]
    pub fn raises(&self) -> u8 {
        self.history.raises()
    }

    /// Aggressive actions completed in the first round.
    #[inline]
    pub fn first_round_raises(&self) -> u8 {
        match self.board {
            Some(board) => board.first_round.raises(),
            None => self.history.raises(),
        }
    }

    /// Player to act. Player 0 opens both rounds.
    #[inline]
    pub fn acting_player(&self) -> usize {
        usize::from(self.history.actions_taken() % 2)
    }

    /// Legal actions here.
    #[inline]
    pub fn legal_actions(&self) -> ActionSet {
        ActionSet::for_raises(self.raises())
    }

    /// Whether `action` is a fold (a check while facing a bet).
    #[inline]
    pub fn is_fold(&self, action: Action) -> bool {
        action == Action::Check && self.raises() > 0
    }

    /// Whether `action` closes the current round's betting.
    #[inline]
    pub fn closes_round(&self, action: Action) -> bool {
        !self.history.is_open() && action == self.history.closing_action()
    }

    /// Whether taking `action` here ends the hand.
    #[inline]
    pub fn is_terminal(&self, action: Action) -> bool {
        self.is_fold(action) || (self.board.is_some() && self.closes_round(action))
    }

    /// Player who acts after `action`. Closing the first round hands the
    /// move back to player 0.
    #[inline]
    pub fn next_acting_player(&self, action: Action) -> usize {
        if self.board.is_none() && self.closes_round(action) {
            0
        } else {
            1 - self.acting_player()
        }
    }

    /// Decision point reached by `action`, seen by whoever acts next.
    ///
    /// `action` must not be terminal here.
    pub fn next_state(&self, action: Action, deal: &Deal) -> LeducState {
        debug_assert!(!self.is_terminal(action), "no state follows a terminal action");
        let card = deal.private_card(self.next_acting_player(action));

        match self.board {
            None if self.closes_round(action) => LeducState {
                card,
                board: Some(Board {
                    shared: deal.shared(),
                    first_round: self.history,
                }),
                history: RoundHistory::OPEN,
            },
            board => LeducState {
                card,
                board,
                history: self.history.after(action),
            },
        }
    }

    /// Chips won (positive) or lost by the acting player when `action` ends the hand.
    ///
    /// A fold forfeits what the folder has already put in, not the raise
    /// they are refusing to match. A showdown settles the full matched
    /// investment of `ANTE + 2 * r1 + 4 * r2`.
    ///
    /// `action` must be terminal here.
    pub fn payout(&self, action: Action, opponent: Rank) -> i32 {
        let raises = i32::from(self.raises());
        let first = i32::from(self.first_round_raises());

        if self.is_fold(action) {
            return match self.board {
                None => -(ANTE + FIRST_ROUND_BET * (raises - 1)),
                Some(_) => -(ANTE + FIRST_ROUND_BET * first + SECOND_ROUND_BET * (raises - 1)),
            };
        }

        let Some(board) = self.board else {
            unreachable!("showdown requested before the shared card is revealed");
        };
        let investment = ANTE + FIRST_ROUND_BET * first + SECOND_ROUND_BET * raises;
        compare_hands(self.card, opponent, board.shared).sign() * investment
    }

    /// Dense index in `0..NUM_STATES`.
    pub fn index(&self) -> usize {
        let card = self.card.index();
        let history = usize::from(self.history.code());

        match self.board {
            None => card * HISTORY_CODES + history,
            Some(board) => {
                let first = usize::from(board.first_round.code()) - 1;
                FIRST_ROUND_STATES
                    + board.shared.index() * (HISTORY_CODES * NUM_RANKS * CLOSED_FIRST_ROUNDS)
                    + history * (NUM_RANKS * CLOSED_FIRST_ROUNDS)
                    + card * CLOSED_FIRST_ROUNDS
                    + first
            }
        }
    }

    /// State at a dense index.
    ///
    /// # Panics
    /// Panics if `index >= NUM_STATES`.
    pub fn from_index(index: usize) -> LeducState {
        assert!(index < NUM_STATES, "state index {index} out of range");

        if index < FIRST_ROUND_STATES {
            return LeducState {
                card: Rank::from_index(index / HISTORY_CODES),
                board: None,
                history: RoundHistory((index % HISTORY_CODES) as u8),
            };
        }

        let adj = index - FIRST_ROUND_STATES;
        let per_card = CLOSED_FIRST_ROUNDS;
        let per_history = NUM_RANKS * per_card;
        let per_shared = HISTORY_CODES * per_history;

        LeducState {
            card: Rank::from_index((adj % per_history) / per_card),
            board: Some(Board {
                shared: Rank::from_index(adj / per_shared),
                first_round: RoundHistory((adj % per_card) as u8 + 1),
            }),
            history: RoundHistory(((adj / per_history) % HISTORY_CODES) as u8),
        }
    }

    /// All states in index order.
    pub fn all() -> impl Iterator<Item = LeducState> {
        (0..NUM_STATES).map(LeducState::from_index)
    }
}

impl fmt::Display for LeducState {
    /// Labels such as `J:cr` (first round) or `Q|K:rb/c` (second round:
    /// own card, shared card, closed first round, current round).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.board {
            None => write!(f, "{}:{}", self.card, self.history),
            Some(board) => write!(
                f,
                "{}|{}:{}{}/{}",
                self.card,
                board.shared,
                board.first_round,
                board.first_round.closing_action().symbol(),
                self.history
            ),
        }
    }
}

impl FromStr for LeducState {
    type Err = GameError;

    fn from_str(label: &str) -> Result<Self, GameError> {
        let invalid = || GameError::InvalidLabel(label.to_string());
        let (cards, betting) = label.split_once(':').ok_or_else(invalid)?;

        let Some((own, shared)) = cards.split_once('|') else {
            return Ok(LeducState {
                card: parse_rank(cards, label)?,
                board: None,
                history: parse_history(betting).ok_or_else(invalid)?,
            });
        };

        // The first round is written out with its closing check or call.
        let (closed, current) = betting.split_once('/').ok_or_else(invalid)?;
        let first_round = closed
            .char_indices()
            .next_back()
            .and_then(|(at, close)| {
                let history = parse_history(&closed[..at])?;
                let closes = !history.is_open() && close == history.closing_action().symbol();
                closes.then_some(history)
            })
            .ok_or_else(invalid)?;

        Ok(LeducState {
            card: parse_rank(own, label)?,
            board: Some(Board {
                shared: parse_rank(shared, label)?,
                first_round,
            }),
            history: parse_history(current).ok_or_else(invalid)?,
        })
    }
}

fn parse_rank(symbol: &str, label: &str) -> Result<Rank, GameError> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Rank::from_symbol(c),
        _ => Err(GameError::InvalidLabel(label.to_string())),
    }
}

/// Inverse of `RoundHistory`'s `Display`: an optional `c` then up to three `r`.
fn parse_history(text: &str) -> Option<RoundHistory> {
    let (opened, raises) = match text.strip_prefix('c') {
        Some(rest) => (4, rest),
        None => (0, text),
    };
    if raises.len() > usize::from(MAX_RAISES) || raises.chars().any(|c| c != 'r') {
        return None;
    }
    Some(RoundHistory(opened + raises.len() as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn deal(a: Rank, b: Rank, c: Rank) -> Deal {
        Deal::new(a, b, c).unwrap()
    }

    fn play(deal: &Deal, actions: &[Action]) -> LeducState {
        actions
            .iter()
            .fold(LeducState::root(deal), |state, &a| state.next_state(a, deal))
    }

    fn collect(deal: &Deal, state: LeducState, seen: &mut HashSet<usize>) {
        seen.insert(state.index());
        for action in state.legal_actions().iter() {
            if !state.is_terminal(action) {
                collect(deal, state.next_state(action, deal), seen);
            }
        }
    }

    #[test]
    fn test_index_bijection() {
        for index in 0..NUM_STATES {
            assert_eq!(LeducState::from_index(index).index(), index);
        }
        assert_eq!(NUM_STATES, 528);
    }

    #[test]
    fn test_every_state_is_reachable() {
        let mut seen = HashSet::new();
        for d in Deal::all() {
            collect(&d, LeducState::root(&d), &mut seen);
        }
        assert_eq!(seen.len(), NUM_STATES);
    }

    #[test]
    fn test_acting_player_alternates_and_resets() {
        let d = deal(Rank::Jack, Rank::Queen, Rank::King);
        assert_eq!(LeducState::root(&d).acting_player(), 0);
        assert_eq!(play(&d, &[Action::Check]).acting_player(), 1);
        assert_eq!(play(&d, &[Action::Check, Action::Raise]).acting_player(), 0);

        // P1 calls to close round one; P0 opens round two.
        let second = play(&d, &[Action::Raise, Action::Bet]);
        assert_eq!(second.round(), 1);
        assert_eq!(second.acting_player(), 0);
        assert_eq!(second.card(), Rank::Jack);
        assert_eq!(second.shared(), Some(Rank::King));
    }

    #[test]
    fn test_next_state_carries_the_actors_card() {
        let d = deal(Rank::Jack, Rank::Queen, Rank::King);
        assert_eq!(play(&d, &[Action::Raise]).card(), Rank::Queen);
        assert_eq!(play(&d, &[Action::Raise, Action::Raise]).card(), Rank::Jack);
    }

    #[test]
    fn test_check_check_moves_to_second_round() {
        let d = deal(Rank::Queen, Rank::Jack, Rank::Jack);
        let after_check = play(&d, &[Action::Check]);
        assert!(!after_check.is_terminal(Action::Check));
        assert!(after_check.closes_round(Action::Check));
        assert_eq!(after_check.next_acting_player(Action::Check), 0);

        let second = after_check.next_state(Action::Check, &d);
        assert_eq!(second.first_round(), Some(RoundHistory::from_code(4)));
        assert_eq!(second.first_round_raises(), 0);
    }

    #[test]
    fn test_second_round_terminals() {
        let d = deal(Rank::Queen, Rank::Jack, Rank::Jack);
        let open = play(&d, &[Action::Check, Action::Check]);
        assert!(!open.is_terminal(Action::Check));
        let checked = open.next_state(Action::Check, &d);
        assert!(checked.is_terminal(Action::Check));
        assert!(!checked.is_terminal(Action::Raise));

        let facing = checked.next_state(Action::Raise, &d);
        assert!(facing.is_terminal(Action::Check));
        assert!(facing.is_terminal(Action::Bet));
        assert!(!facing.is_terminal(Action::Raise));
    }

    #[test]
    fn test_raise_cap() {
        let d = deal(Rank::King, Rank::Queen, Rank::Jack);
        let capped = play(&d, &[Action::Raise, Action::Raise, Action::Raise]);
        assert_eq!(capped.raises(), 3);
        assert_eq!(capped.legal_actions().as_slice(), &[Action::Check, Action::Bet]);
    }

    #[test]
    fn test_all_checked_showdown_payout() {
        // Jack vs Queen, King on board: one chip each at stake.
        let d = deal(Rank::Jack, Rank::Queen, Rank::King);
        let last = play(&d, &[Action::Check, Action::Check, Action::Check]);
        assert_eq!(last.acting_player(), 1);
        assert_eq!(last.card(), Rank::Queen);
        assert_eq!(last.payout(Action::Check, Rank::Jack), 1);

        let d = deal(Rank::Queen, Rank::Jack, Rank::King);
        let last = play(&d, &[Action::Check, Action::Check, Action::Check]);
        assert_eq!(last.payout(Action::Check, Rank::Queen), -1);
    }

    #[test]
    fn test_fold_to_opening_raise_loses_ante() {
        let d = deal(Rank::King, Rank::Jack, Rank::Queen);
        let facing = play(&d, &[Action::Raise]);
        assert!(facing.is_terminal(Action::Check));
        assert_eq!(facing.payout(Action::Check, Rank::King), -1);

        let facing_reraise = play(&d, &[Action::Raise, Action::Raise]);
        assert_eq!(facing_reraise.payout(Action::Check, Rank::Jack), -3);
    }

    #[test]
    fn test_second_round_payouts() {
        let d = deal(Rank::Jack, Rank::King, Rank::Jack);
        // r b | r r: first round one raise, second round two raises.
        let facing = play(&d, &[Action::Raise, Action::Bet, Action::Raise, Action::Raise]);
        assert_eq!(facing.acting_player(), 0);
        // Fold: ante + 2 + one second-round bet already matched.
        assert_eq!(facing.payout(Action::Check, Rank::King), -(1 + 2 + 4));
        // Call: paired jack beats king for ante + 2 + 2 * 4.
        assert_eq!(facing.payout(Action::Bet, Rank::King), 1 + 2 + 8);
    }

    #[test]
    fn test_labels() {
        let d = deal(Rank::Queen, Rank::Jack, Rank::King);
        assert_eq!(LeducState::root(&d).to_string(), "Q:");
        assert_eq!(play(&d, &[Action::Check, Action::Raise]).to_string(), "Q:cr");
        assert_eq!(
            play(&d, &[Action::Raise, Action::Raise, Action::Bet, Action::Check]).to_string(),
            "J|K:rrb/c"
        );
        assert_eq!(play(&d, &[Action::Check, Action::Check]).to_string(), "Q|K:cc/");
    }

    #[test]
    fn test_labels_parse_back() {
        for state in LeducState::all() {
            assert_eq!(state.to_string().parse::<LeducState>(), Ok(state));
        }
        let lower = "k|j:cc/r".parse::<LeducState>().unwrap();
        assert_eq!(lower.to_string(), "K|J:cc/r");
    }

    #[test]
    fn test_malformed_labels_rejected() {
        let malformed = [
            "", "K", "K:b", "K:rrrr", "KQ:", "K|J:c/", "K|J:/", "K|J:rr/", "K|J:rc/", "K|J:cc",
        ];
        for label in malformed {
            assert!(
                matches!(label.parse::<LeducState>(), Err(GameError::InvalidLabel(_))),
                "{label:?} accepted"
            );
        }
        assert_eq!("A:".parse::<LeducState>(), Err(GameError::InvalidRankSymbol('A')));
    }
}

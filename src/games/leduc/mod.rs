//! Leduc Hold'em game model.
//!
//! ## Game Rules
//!
//! - 6 cards: two each of Jack, Queen and King; suits don't matter
//! - 2 players, each antes 1 chip and receives 1 private card
//! - Round 1: betting with a bet size of 2
//! - A shared card is revealed
//! - Round 2: betting with a bet size of 4
//! - At most 3 aggressive actions (bet or raise) per round
//! - Player 0 acts first in both rounds
//! - Showdown: pairing the shared card wins, otherwise the higher card wins
//!
//! ## Betting Tree (one round)
//!
//! ```text
//! P0
//! ├── Check
//! │   └── P1
//! │       ├── Check → round over
//! │       └── Raise → (facing a bet)
//! └── Raise → (facing a bet)
//!
//! facing a bet:
//! ├── Check (fold) → hand over
//! ├── Bet (call)   → round over
//! └── Raise        → (facing a bet), unless the cap is reached
//! ```
//!
//! The model is purely functional: [`LeducState`] values are small `Copy`
//! keys and every transition returns a new one.

pub mod action;
pub mod card;
pub mod output;
pub mod state;

pub use action::{Action, ActionSet, MAX_RAISES, NUM_ACTIONS};
pub use card::{compare_hands, Deal, GameError, Outcome, Rank, NUM_RANKS, TOTAL_DEAL_WEIGHT};
pub use output::{BestResponseReport, ReportMetadata, StrategyEntry, StrategyReport};
pub use state::{LeducState, RoundHistory, ANTE, FIRST_ROUND_BET, NUM_STATES, SECOND_ROUND_BET};

//! Cards, deals and showdown comparison.
//!
//! Leduc uses a six-card deck: two copies each of Jack, Queen and King.
//! Suits never matter for hand strength, so a deal is described by the
//! ranks in its three slots plus how many physical deals share those ranks.

use rand::seq::index;
use rand::Rng;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Number of distinct ranks.
pub const NUM_RANKS: usize = 3;

/// Physical copies of each rank in the deck.
pub const COPIES_PER_RANK: usize = 2;

/// Cards in the deck.
pub const DECK_SIZE: usize = NUM_RANKS * COPIES_PER_RANK;

/// Ordered ways to deal three distinguishable cards from the deck.
///
/// This is 6 * 5 * 4 = 120, which is also the sum of [`Deal::multiplicity`]
/// over [`Deal::all`]: six all-distinct triples of 8 plus eighteen paired
/// triples of 4.
pub const TOTAL_DEAL_WEIGHT: f64 = 120.0;

/// Errors raised when building cards, deals or states from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// All three slots hold the same rank, but the deck has only two copies.
    #[error("deal {0}{1}{2} needs three copies of one rank; the deck holds two")]
    ImpossibleDeal(Rank, Rank, Rank),
    /// Unknown rank symbol.
    #[error("unknown rank symbol '{0}' (expected J, Q or K)")]
    InvalidRankSymbol(char),
    /// Text that does not name any information state.
    #[error("malformed state label '{0}'")]
    InvalidLabel(String),
}

/// Card rank. Higher discriminant means a stronger card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    /// Jack (0)
    Jack = 0,
    /// Queen (1)
    Queen = 1,
    /// King (2)
    King = 2,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; NUM_RANKS] = [Rank::Jack, Rank::Queen, Rank::King];

    /// Numeric rank (Jack = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rank from its numeric value.
    ///
    /// # Panics
    /// Panics if `index >= 3`.
    #[inline]
    pub fn from_index(index: usize) -> Rank {
        Self::ALL[index]
    }

    /// Single-letter symbol used in state labels.
    pub fn symbol(self) -> char {
        match self {
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }

    /// Parse a rank symbol (case-insensitive).
    pub fn from_symbol(symbol: char) -> Result<Rank, GameError> {
        match symbol.to_ascii_uppercase() {
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            _ => Err(GameError::InvalidRankSymbol(symbol)),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Result of a showdown from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Opponent holds the better hand.
    Loss = 0,
    /// Hands are equal; the pot is split.
    Push = 1,
    /// Own hand is better.
    Win = 2,
}

impl Outcome {
    /// Multiplier applied to the invested amount: -1, 0 or +1.
    #[inline]
    pub fn sign(self) -> i32 {
        self as i32 - 1
    }
}

/// Compare two private cards given the shared card.
///
/// A card pairing the shared card beats any unpaired card; otherwise the
/// higher rank wins. Equal rank and pairing status is a push.
pub fn compare_hands(own: Rank, opponent: Rank, shared: Rank) -> Outcome {
    let score = |card: Rank| card.index() + if card == shared { 4 } else { 0 };

    match score(own).cmp(&score(opponent)) {
        Ordering::Less => Outcome::Loss,
        Ordering::Equal => Outcome::Push,
        Ordering::Greater => Outcome::Win,
    }
}

/// Cards for one hand: a private card per player plus the shared card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deal {
    private: [Rank; 2],
    shared: Rank,
}

impl Deal {
    /// Build a deal, rejecting the impossible all-same-rank triple.
    pub fn new(first: Rank, second: Rank, shared: Rank) -> Result<Deal, GameError> {
        if first == second && second == shared {
            return Err(GameError::ImpossibleDeal(first, second, shared));
        }
        Ok(Deal {
            private: [first, second],
            shared,
        })
    }

    /// Private card held by `player` (0 or 1).
    #[inline]
    pub fn private_card(&self, player: usize) -> Rank {
        self.private[player]
    }

    /// The card revealed before the second betting round.
    #[inline]
    pub fn shared(&self) -> Rank {
        self.shared
    }

    /// Number of physical deals with these ranks: 8 if all ranks differ, 4 otherwise.
    pub fn multiplicity(&self) -> u32 {
        let [a, b] = self.private;
        let c = self.shared;
        if a != b && a != c && b != c {
            8
        } else {
            4
        }
    }

    /// Chance weight of this rank triple, as a float.
    #[inline]
    pub fn weight(&self) -> f64 {
        f64::from(self.multiplicity())
    }

    /// Every valid rank triple (24 of them), in slot-lexicographic order.
    pub fn all() -> Vec<Deal> {
        let mut deals = Vec::with_capacity(NUM_RANKS * NUM_RANKS * NUM_RANKS - NUM_RANKS);
        for first in Rank::ALL {
            for second in Rank::ALL {
                for shared in Rank::ALL {
                    if let Ok(deal) = Deal::new(first, second, shared) {
                        deals.push(deal);
                    }
                }
            }
        }
        deals
    }

    /// Draw a deal uniformly over the 120 ordered physical deals.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Deal {
        let cards = index::sample(rng, DECK_SIZE, 3);
        let rank = |slot: usize| Rank::from_index(cards.index(slot) / COPIES_PER_RANK);
        Deal {
            private: [rank(0), rank(1)],
            shared: rank(2),
        }
    }
}

impl fmt::Display for Deal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} | {}", self.private[0], self.private[1], self.shared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unpaired_higher_rank_wins() {
        assert_eq!(compare_hands(Rank::Queen, Rank::Jack, Rank::King), Outcome::Win);
        assert_eq!(compare_hands(Rank::Jack, Rank::Queen, Rank::King), Outcome::Loss);
    }

    #[test]
    fn test_pair_beats_higher_card() {
        assert_eq!(compare_hands(Rank::Jack, Rank::King, Rank::Jack), Outcome::Win);
        assert_eq!(compare_hands(Rank::King, Rank::Jack, Rank::Jack), Outcome::Loss);
    }

    #[test]
    fn test_same_rank_pushes() {
        assert_eq!(compare_hands(Rank::Queen, Rank::Queen, Rank::Jack), Outcome::Push);
        assert_eq!(Outcome::Push.sign(), 0);
    }

    #[test]
    fn test_deal_enumeration_weights() {
        let deals = Deal::all();
        assert_eq!(deals.len(), 24);

        let total: f64 = deals.iter().map(Deal::weight).sum();
        assert_eq!(total, TOTAL_DEAL_WEIGHT);

        let distinct = deals.iter().filter(|d| d.multiplicity() == 8).count();
        assert_eq!(distinct, 6);
    }

    #[test]
    fn test_impossible_deal_rejected() {
        let err = Deal::new(Rank::King, Rank::King, Rank::King).unwrap_err();
        assert_eq!(err, GameError::ImpossibleDeal(Rank::King, Rank::King, Rank::King));
        assert!(Deal::new(Rank::King, Rank::King, Rank::Jack).is_ok());
    }

    #[test]
    fn test_rank_parsing() {
        assert_eq!(Rank::from_symbol('q'), Ok(Rank::Queen));
        assert_eq!(Rank::from_symbol('A'), Err(GameError::InvalidRankSymbol('A')));
    }

    #[test]
    fn test_sampled_deals_follow_multiplicity() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = 48_000;
        let mut distinct = 0usize;

        for _ in 0..samples {
            let deal = Deal::sample(&mut rng);
            let (a, b, c) = (deal.private_card(0), deal.private_card(1), deal.shared());
            assert!(Deal::new(a, b, c).is_ok());
            if deal.multiplicity() == 8 {
                distinct += 1;
            }
        }

        // 6 distinct-rank triples of 8 physical deals each: 48 of 120.
        let expected = 48.0 / TOTAL_DEAL_WEIGHT;
        let observed = distinct as f64 / samples as f64;
        assert!((observed - expected).abs() < 0.02, "observed {observed}, expected {expected}");
    }
}

pub(crate) mod detector;
pub(crate) mod hand_analysis;
pub(crate) mod rank_groups;
pub(crate) mod straight_info;
pub(crate) mod suit_info;

use crate::cards::{Card, Rank};
use crate::hand::{Board, HandError, HoleCards};
use core::cmp::Ordering;
use core::fmt;
use detector::DETECTORS;
use hand_analysis::HandAnalysis;

/// Poker hand category from strongest to weakest.
///
/// The derived ordering follows the discriminant, so a *smaller* category is a
/// *stronger* hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Category {
    StraightFlush = 0,
    FourOfAKind = 1,
    FullHouse = 2,
    Flush = 3,
    Straight = 4,
    ThreeOfAKind = 5,
    TwoPair = 6,
    OnePair = 7,
    HighCard = 8,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::StraightFlush => "Straight flush",
            Category::FourOfAKind => "Four of a kind",
            Category::FullHouse => "Full house",
            Category::Flush => "Flush",
            Category::Straight => "Straight",
            Category::ThreeOfAKind => "Three of a kind",
            Category::TwoPair => "Two pair",
            Category::OnePair => "One pair",
            Category::HighCard => "High card",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified five-card hand.
///
/// `values` holds the tie-break ranks in significance order. Which slots are
/// populated depends on the category: one for straights, two for quads and full
/// houses, three for trips and two pair, four for one pair, five for flushes and
/// high cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hand {
    pub cards: [Card; 5],
    pub category: Category,
    pub values: [Option<Rank>; 5],
}

impl Hand {
    /// Tie-break value `n`, counted from 1.
    pub fn value(&self, n: usize) -> Option<Rank> {
        n.checked_sub(1).and_then(|i| self.values.get(i).copied().flatten())
    }

    /// True when `self` is strictly stronger than `other`.
    pub fn beats(&self, other: &Hand) -> bool {
        compare(self, other) == Ordering::Less
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.category)?;
        for (i, c) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str(")")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("expected 5 to 7 cards, got {0}")]
    CardCount(usize),
    #[error("duplicate card {0}")]
    DuplicateCard(Card),
}

/// Classify the best five-card hand found among 5 to 7 distinct cards.
///
/// ```
/// use holdem_engine::cards::parse_cards;
/// use holdem_engine::evaluator::{classify, Category};
/// use holdem_engine::cards::Rank;
///
/// let cards = parse_cards("Qs Qh 2c 5d 8h 9s Jc").unwrap();
/// let hand = classify(&cards).unwrap();
/// assert_eq!(hand.category, Category::OnePair);
/// assert_eq!(hand.value(1), Some(Rank::Queen));
/// assert_eq!(hand.value(2), Some(Rank::Jack));
/// ```
pub fn classify(cards: &[Card]) -> Result<Hand, EvalError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EvalError::CardCount(cards.len()));
    }
    let mut seen = [false; 52];
    for &c in cards {
        if std::mem::replace(&mut seen[c.index()], true) {
            return Err(EvalError::DuplicateCard(c));
        }
    }
    let analysis = HandAnalysis::new(cards);
    DETECTORS
        .iter()
        .find_map(|d| d.detect(&analysis))
        .ok_or(EvalError::CardCount(cards.len()))
}

/// Order two hands by strength: `Less` when `a` is stronger, `Equal` on a split,
/// `Greater` when `b` is stronger. Sorting with it puts the best hand first.
///
/// Categories compare first, then `value1..value5` in order.
pub fn compare(a: &Hand, b: &Hand) -> Ordering {
    a.category.cmp(&b.category).then_with(|| {
        a.values
            .iter()
            .zip(b.values.iter())
            .map(|(x, y)| y.cmp(x))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Classify a player's two hole cards together with the board.
///
/// The board needs at least three cards; at showdown it holds five.
pub fn best_hand(hole: &HoleCards, board: &Board) -> Result<Hand, EvalError> {
    let cards = board.with_hole(hole)?;
    classify(&cards)
}

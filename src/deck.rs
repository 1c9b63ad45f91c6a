use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// An ordered deck. The front of the sequence is the top card.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// ```
    /// use holdem_engine::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s)))
            .collect();
        Self { cards }
    }

    /// Build a deck from cards listed top first.
    pub fn from_cards<I>(cards: I) -> Self
    where
        I: IntoIterator<Item = Card>,
    {
        Self { cards: cards.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Remaining cards, top first.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Draw `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.draw()).collect()
    }

    /// Discard the top card.
    pub fn burn(&mut self) -> Option<Card> {
        self.draw()
    }

    /// True when no card appears twice.
    pub fn is_distinct(&self) -> bool {
        let mut seen = [false; 52];
        self.cards.iter().all(|c| !std::mem::replace(&mut seen[c.index()], true))
    }
}

/// Host-supplied permutation of a deck.
///
/// The engine never shuffles on its own; hosts hand a shuffled [`Deck`] in with the
/// command that starts a hand.
pub trait Shuffler {
    fn shuffle(&mut self, deck: &mut Deck);
}

/// Deterministic shuffler seeded by the host.
#[derive(Debug, Clone)]
pub struct SeededShuffler {
    rng: ChaCha8Rng,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Seed from OS entropy. Only for hosts that do not need replays.
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&mut self, deck: &mut Deck) {
        deck.cards.make_contiguous().shuffle(&mut self.rng);
    }
}

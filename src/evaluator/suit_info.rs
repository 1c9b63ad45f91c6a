use crate::cards::{Card, Suit};

/// The flush suit, if any suit holds at least five of the cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuitInfo {
    pub flush_suit: Option<Suit>,
    /// Cards of the flush suit, highest rank first.
    pub flush_cards: Vec<Card>,
}

impl SuitInfo {
    /// Cards must be sorted by rank descending.
    pub fn detect(sorted: &[Card]) -> Self {
        let flush_suit = Suit::ALL
            .into_iter()
            .find(|&s| sorted.iter().filter(|c| c.suit() == s).count() >= 5);
        let flush_cards = match flush_suit {
            Some(s) => sorted.iter().copied().filter(|c| c.suit() == s).collect(),
            None => Vec::new(),
        };
        SuitInfo { flush_suit, flush_cards }
    }

    pub fn is_flush(&self) -> bool {
        self.flush_suit.is_some()
    }
}

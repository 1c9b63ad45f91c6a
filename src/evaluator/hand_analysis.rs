use super::rank_groups::RankGroups;
use super::straight_info::StraightInfo;
use super::suit_info::SuitInfo;
use crate::cards::{Card, Rank};
use crate::evaluator::{Category, Hand};

/// Pre-computed analysis of 5 to 7 cards.
/// Built once and shared by all category detectors.
#[derive(Debug, Clone)]
pub struct HandAnalysis {
    /// Input cards, rank descending then suit descending.
    pub sorted_cards: Vec<Card>,
    pub rank_groups: RankGroups,
    pub suit_info: SuitInfo,
    pub straight_info: StraightInfo,
}

impl HandAnalysis {
    pub fn new(cards: &[Card]) -> Self {
        let mut sorted_cards = cards.to_vec();
        sorted_cards.sort_by(|a, b| b.cmp(a));

        let rank_groups = RankGroups::from_sorted(&sorted_cards);
        let suit_info = SuitInfo::detect(&sorted_cards);
        let straight_info = StraightInfo::new(&sorted_cards);

        Self { sorted_cards, rank_groups, suit_info, straight_info }
    }

    /// Best `n` cards not already part of `used`, highest rank first.
    pub fn kickers(&self, used: &[Card], n: usize) -> Vec<Card> {
        self.sorted_cards.iter().copied().filter(|c| !used.contains(c)).take(n).collect()
    }

    /// Assemble a [`Hand`] from the primary combination plus kickers.
    ///
    /// `values` lists the tie-break ranks in significance order; missing slots stay `None`.
    pub fn build_hand(&self, category: Category, made: &[Card], values: &[Rank]) -> Hand {
        let mut cards = [self.sorted_cards[0]; 5];
        let kickers = self.kickers(made, 5usize.saturating_sub(made.len()));
        for (slot, card) in cards.iter_mut().zip(made.iter().chain(kickers.iter())) {
            *slot = *card;
        }
        let mut tie = [None; 5];
        for (slot, rank) in tie.iter_mut().zip(values) {
            *slot = Some(*rank);
        }
        Hand { cards, category, values: tie }
    }
}

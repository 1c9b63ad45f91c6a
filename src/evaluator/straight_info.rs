use crate::cards::{Card, Rank, Suit};

/// Per-rank chains of the cards present, indexed by sortable rank.
///
/// Runs are searched ace-high only: A-2-3-4-5 does not count as a straight.
#[derive(Debug, Clone)]
pub struct StraightInfo {
    chains: [Vec<Card>; 15],
}

impl StraightInfo {
    pub fn new(cards: &[Card]) -> Self {
        let mut chains: [Vec<Card>; 15] = Default::default();
        for &card in cards {
            chains[card.rank().value() as usize].push(card);
        }
        for chain in chains.iter_mut() {
            chain.sort_by(|a, b| b.suit().cmp(&a.suit()));
        }
        Self { chains }
    }

    fn suit_mask(&self, value: u8) -> u8 {
        self.chains[value as usize].iter().fold(0, |m, c| m | 1 << c.suit() as u8)
    }

    /// Top rank values of every 5-wide window, highest first.
    fn windows() -> impl Iterator<Item = u8> {
        (Rank::Six.value()..=Rank::Ace.value()).rev()
    }

    /// Highest run of five consecutive ranks in any suits.
    pub fn straight(&self) -> Option<[Card; 5]> {
        Self::windows().find_map(|top| {
            let mut run = [self.chains[top as usize].first().copied()?; 5];
            for (i, slot) in run.iter_mut().enumerate().skip(1) {
                *slot = self.chains[(top - i as u8) as usize].first().copied()?;
            }
            Some(run)
        })
    }

    /// Highest run of five consecutive ranks that all share a suit.
    ///
    /// Walks each 5-wide window and intersects the suits present at every rank.
    pub fn straight_flush(&self) -> Option<[Card; 5]> {
        Self::windows().find_map(|top| {
            let shared = (0..5).fold(0x0f, |mask, i| mask & self.suit_mask(top - i));
            let suit = Suit::ALL.into_iter().rev().find(|&s| shared & (1 << s as u8) != 0)?;
            let mut run = [Card::new(Rank::Two, suit); 5];
            for (i, slot) in run.iter_mut().enumerate() {
                let rank = Rank::from_sorted(top - i as u8)?;
                *slot = Card::new(rank, suit);
            }
            Some(run)
        })
    }
}

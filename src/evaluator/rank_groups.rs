use crate::cards::{Card, Rank};

/// Cards grouped by rank, sorted by (count desc, rank desc).
///
/// Example: As Ah Ad Kc Qs Qd 2h groups as
/// [(Ace, 3), (Queen, 2), (King, 1), (Two, 1)].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankGroups {
    groups: Vec<(Rank, Vec<Card>)>,
}

impl RankGroups {
    /// Group cards that are already sorted by rank descending.
    pub fn from_sorted(cards: &[Card]) -> Self {
        let mut groups: Vec<(Rank, Vec<Card>)> = Vec::new();
        for &card in cards {
            match groups.last_mut() {
                Some((rank, members)) if *rank == card.rank() => members.push(card),
                _ => groups.push((card.rank(), vec![card])),
            }
        }
        // stable: equal counts stay rank-descending
        groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        Self { groups }
    }

    /// Highest rank held four times.
    pub fn quad(&self) -> Option<&[Card]> {
        self.with_at_least(4, None)
    }

    /// Highest rank held at least three times.
    pub fn trips(&self) -> Option<&[Card]> {
        self.with_at_least(3, None)
    }

    /// Highest rank other than `except` held at least twice.
    pub fn pair_except(&self, except: Option<Rank>) -> Option<&[Card]> {
        self.with_at_least(2, except)
    }

    /// Every rank held exactly twice, highest first.
    pub fn pairs(&self) -> Vec<&[Card]> {
        let mut pairs: Vec<&[Card]> = self
            .groups
            .iter()
            .filter(|(_, cards)| cards.len() == 2)
            .map(|(_, cards)| cards.as_slice())
            .collect();
        pairs.sort_by(|a, b| b[0].rank().cmp(&a[0].rank()));
        pairs
    }

    fn with_at_least(&self, n: usize, except: Option<Rank>) -> Option<&[Card]> {
        self.groups
            .iter()
            .filter(|(rank, cards)| cards.len() >= n && Some(*rank) != except)
            .max_by_key(|(rank, _)| *rank)
            .map(|(_, cards)| &cards[..n])
    }

    #[cfg(test)]
    pub fn shape(&self) -> Vec<(Rank, usize)> {
        self.groups.iter().map(|(r, c)| (*r, c.len())).collect()
    }
}

use crate::action::Bet;
use crate::player::PlayerId;

/// Chip denominations used for display stacks, largest first.
pub const DENOMINATIONS: [u64; 9] = [500, 200, 100, 50, 20, 10, 5, 2, 1];

/// Chips put into the pot during a hand, per player, in order of first appearance.
pub fn totals_by_player<'a, I>(bets: I) -> Vec<(PlayerId, u64)>
where
    I: IntoIterator<Item = &'a Bet>,
{
    let mut totals: Vec<(PlayerId, u64)> = Vec::new();
    for bet in bets {
        match totals.iter_mut().find(|(id, _)| *id == bet.player) {
            Some((_, sum)) => *sum += bet.amount,
            None => totals.push((bet.player.clone(), bet.amount)),
        }
    }
    totals
}

/// Result of distributing a pot among its winners.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PotSplit {
    /// Winnings per winner, in the order their tier was settled.
    pub shares: Vec<(PlayerId, u64)>,
    /// Uncontested chips handed back to non-winners who out-bet every winner.
    pub overflow: Vec<(PlayerId, u64)>,
}

impl PotSplit {
    /// Shares followed by overflow, one entry per player.
    pub fn payouts(&self) -> Vec<(PlayerId, u64)> {
        let mut out: Vec<(PlayerId, u64)> = Vec::new();
        for (id, amount) in self.shares.iter().chain(self.overflow.iter()) {
            match out.iter_mut().find(|(p, _)| p == id) {
                Some((_, sum)) => *sum += amount,
                None => out.push((id.clone(), *amount)),
            }
        }
        out
    }

    pub fn share_of(&self, id: &PlayerId) -> u64 {
        self.shares.iter().filter(|(p, _)| p == id).map(|(_, a)| a).sum()
    }

    pub fn total(&self) -> u64 {
        self.shares.iter().chain(self.overflow.iter()).map(|(_, a)| a).sum()
    }
}

fn credit(list: &mut Vec<(PlayerId, u64)>, id: &PlayerId, amount: u64) {
    if amount == 0 {
        return;
    }
    match list.iter_mut().find(|(p, _)| p == id) {
        Some((_, sum)) => *sum += amount,
        None => list.push((id.clone(), amount)),
    }
}

/// Split a pot among `winners` given each contributor's total stake.
///
/// Contributors are walked from the smallest stake up. Each winner caps a tier at
/// what is left of their own stake; the tier takes up to that cap from everyone and
/// is shared evenly by the winners still holding stake. Odd chips roll into the next
/// tier, and whatever is left after the last tier goes one chip at a time to that
/// tier's winners. Stake no winner could cover is returned as overflow.
///
/// ```
/// use holdem_engine::player::PlayerId;
/// use holdem_engine::pot::split_pot;
///
/// let totals: Vec<(PlayerId, u64)> =
///     vec![("a".into(), 100), ("b".into(), 200), ("c".into(), 300)];
/// let split = split_pot(&totals, &[PlayerId::from("b")]);
/// assert_eq!(split.share_of(&"b".into()), 500);
/// assert_eq!(split.overflow, vec![(PlayerId::from("c"), 100)]);
/// ```
pub fn split_pot(totals: &[(PlayerId, u64)], winners: &[PlayerId]) -> PotSplit {
    let mut stakes: Vec<(PlayerId, u64)> = totals.to_vec();
    // stable: equal stakes keep their first-appearance order
    stakes.sort_by_key(|(_, stake)| *stake);

    let mut split = PotSplit::default();
    let mut carry = 0u64;
    let mut last_tier: Vec<PlayerId> = Vec::new();

    let tier_order: Vec<PlayerId> =
        stakes.iter().filter(|(id, _)| winners.contains(id)).map(|(id, _)| id.clone()).collect();

    for winner in &tier_order {
        let cap = stakes.iter().find(|(id, _)| id == winner).map(|(_, s)| *s).unwrap_or(0);
        if cap == 0 {
            continue;
        }
        let eligible: Vec<PlayerId> = stakes
            .iter()
            .filter(|(id, stake)| *stake > 0 && winners.contains(id))
            .map(|(id, _)| id.clone())
            .collect();
        let mut collected = 0u64;
        for (_, stake) in stakes.iter_mut() {
            let take = (*stake).min(cap);
            *stake -= take;
            collected += take;
        }
        let amount = collected + carry;
        let n = eligible.len() as u64;
        let each = amount / n;
        carry = amount % n;
        for id in &eligible {
            credit(&mut split.shares, id, each);
        }
        last_tier = eligible;
    }

    for id in last_tier.iter().take(carry as usize) {
        credit(&mut split.shares, id, 1);
    }

    for (id, stake) in &stakes {
        if *stake > 0 && !winners.contains(id) {
            credit(&mut split.overflow, id, *stake);
        }
    }
    split
}

/// Greedy decomposition of an amount into [`DENOMINATIONS`], for display.
///
/// ```
/// use holdem_engine::pot::chip_breakdown;
///
/// assert_eq!(chip_breakdown(136), vec![100, 20, 10, 5, 1]);
/// ```
pub fn chip_breakdown(mut amount: u64) -> Vec<u64> {
    let mut chips = Vec::new();
    for chip in DENOMINATIONS {
        let quantity = amount / chip;
        chips.extend(std::iter::repeat(chip).take(quantity as usize));
        amount -= chip * quantity;
    }
    chips
}

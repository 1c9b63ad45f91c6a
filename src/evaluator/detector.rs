use super::hand_analysis::HandAnalysis;
use crate::cards::{Card, Rank};
use crate::evaluator::{Category, Hand};

/// Each category detector recognizes its combination and builds the resulting hand.
pub trait CategoryDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Hand>;
}

fn ranks(cards: &[Card]) -> Vec<Rank> {
    cards.iter().map(|c| c.rank()).collect()
}

/// Straight Flush: five consecutive ranks sharing one suit
pub struct StraightFlushDetector;

impl CategoryDetector for StraightFlushDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Hand> {
        let run = analysis.straight_info.straight_flush()?;
        Some(analysis.build_hand(Category::StraightFlush, &run, &[run[0].rank()]))
    }
}

/// Four of a Kind: four cards of one rank plus the best kicker
pub struct FourOfAKindDetector;

impl CategoryDetector for FourOfAKindDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Hand> {
        let quad = analysis.rank_groups.quad()?;
        let kicker = analysis.kickers(quad, 1);
        let values = [quad[0].rank(), kicker.first()?.rank()];
        Some(analysis.build_hand(Category::FourOfAKind, quad, &values))
    }
}

/// Full House: a rank held three times plus a different rank held at least twice
pub struct FullHouseDetector;

impl CategoryDetector for FullHouseDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Hand> {
        let trips = analysis.rank_groups.trips()?;
        let pair = analysis.rank_groups.pair_except(Some(trips[0].rank()))?;
        let made: Vec<Card> = trips.iter().chain(pair).copied().collect();
        let values = [trips[0].rank(), pair[0].rank()];
        Some(analysis.build_hand(Category::FullHouse, &made, &values))
    }
}

/// Flush: the five highest cards of a suit holding at least five
pub struct FlushDetector;

impl CategoryDetector for FlushDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Hand> {
        if !analysis.suit_info.is_flush() {
            return None;
        }
        let top = analysis.suit_info.flush_cards.get(..5)?;
        Some(analysis.build_hand(Category::Flush, top, &ranks(top)))
    }
}

/// Straight: five consecutive ranks in any suits
pub struct StraightDetector;

impl CategoryDetector for StraightDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Hand> {
        let run = analysis.straight_info.straight()?;
        Some(analysis.build_hand(Category::Straight, &run, &[run[0].rank()]))
    }
}

/// Three of a Kind: three cards of one rank plus two kickers
pub struct ThreeOfAKindDetector;

impl CategoryDetector for ThreeOfAKindDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Hand> {
        let trips = analysis.rank_groups.trips()?;
        let mut values = vec![trips[0].rank()];
        values.extend(ranks(&analysis.kickers(trips, 2)));
        Some(analysis.build_hand(Category::ThreeOfAKind, trips, &values))
    }
}

/// Two Pair: the two highest pairs plus the best kicker
pub struct TwoPairDetector;

impl CategoryDetector for TwoPairDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Hand> {
        let pairs = analysis.rank_groups.pairs();
        let (high, low) = match pairs.as_slice() {
            [high, low, ..] => (*high, *low),
            _ => return None,
        };
        let made: Vec<Card> = high.iter().chain(low).copied().collect();
        let mut values = vec![high[0].rank(), low[0].rank()];
        values.extend(ranks(&analysis.kickers(&made, 1)));
        Some(analysis.build_hand(Category::TwoPair, &made, &values))
    }
}

/// One Pair: two cards of one rank plus three kickers
pub struct OnePairDetector;

impl CategoryDetector for OnePairDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Hand> {
        let pair = analysis.rank_groups.pair_except(None)?;
        let mut values = vec![pair[0].rank()];
        values.extend(ranks(&analysis.kickers(pair, 3)));
        Some(analysis.build_hand(Category::OnePair, pair, &values))
    }
}

/// High Card: the five highest cards
pub struct HighCardDetector;

impl CategoryDetector for HighCardDetector {
    fn detect(&self, analysis: &HandAnalysis) -> Option<Hand> {
        let top = analysis.sorted_cards.get(..5)?;
        Some(analysis.build_hand(Category::HighCard, top, &ranks(top)))
    }
}

/// Detectors in priority order, strongest category first.
pub const DETECTORS: [&dyn CategoryDetector; 9] = [
    &StraightFlushDetector,
    &FourOfAKindDetector,
    &FullHouseDetector,
    &FlushDetector,
    &StraightDetector,
    &ThreeOfAKindDetector,
    &TwoPairDetector,
    &OnePairDetector,
    &HighCardDetector,
];

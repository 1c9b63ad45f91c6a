// Host boundary. A `Table` owns the game state together with the collaborators
// the engine needs from outside: a shuffle source, somewhere to report results and
// a store for seats held by players who left. Hosts (the CLI, a server, tests) drive
// the table with commands and render `snapshot()`.

use crate::action::{ActionKind, Decision};
use crate::cards::Card;
use crate::deck::{Deck, Shuffler};
use crate::evaluator::Hand;
use crate::game::{Command, Effect, GameError, GameState, Step, Street};
use crate::hand::HoleCards;
use crate::player::{Outcome, PlayerId, SeatRecord};
use std::collections::BTreeMap;
use tracing::{error, info};

/// Receives the final standings, once per session.
pub trait GameOverReporter {
    fn report(&mut self, session_id: &str, outcomes: &[(PlayerId, Outcome)]);
}

impl<F> GameOverReporter for F
where
    F: FnMut(&str, &[(PlayerId, Outcome)]),
{
    fn report(&mut self, session_id: &str, outcomes: &[(PlayerId, Outcome)]) {
        self(session_id, outcomes)
    }
}

/// Seats kept for players who left, keyed by player.
pub trait RejoinStore {
    fn get(&self, player: &PlayerId) -> Option<SeatRecord>;
    fn put(&mut self, player: PlayerId, record: SeatRecord);
    /// Add winnings to a player who is no longer seated.
    fn credit(&mut self, player: &PlayerId, amount: u64);
    fn remove(&mut self, player: &PlayerId);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryRejoinStore {
    records: BTreeMap<PlayerId, SeatRecord>,
    unclaimed: BTreeMap<PlayerId, u64>,
}

impl MemoryRejoinStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Winnings owed to players with no stored seat.
    pub fn unclaimed(&self, player: &PlayerId) -> u64 {
        self.unclaimed.get(player).copied().unwrap_or(0)
    }
}

impl RejoinStore for MemoryRejoinStore {
    fn get(&self, player: &PlayerId) -> Option<SeatRecord> {
        self.records.get(player).cloned()
    }

    fn put(&mut self, player: PlayerId, mut record: SeatRecord) {
        record.chips += self.unclaimed.remove(&player).unwrap_or(0);
        self.records.insert(player, record);
    }

    fn credit(&mut self, player: &PlayerId, amount: u64) {
        match self.records.get_mut(player) {
            Some(record) => record.chips += amount,
            None => *self.unclaimed.entry(player.clone()).or_insert(0) += amount,
        }
    }

    fn remove(&mut self, player: &PlayerId) {
        self.records.remove(player);
    }
}

/// Per-player view for display consumers. Hole cards are not included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeatView {
    pub player: PlayerId,
    pub chips: u64,
    pub seat_order: Option<usize>,
    pub in_game: bool,
    pub folded: bool,
    pub all_in: bool,
    /// Chips put in during the current street.
    pub street_bet: u64,
    pub last_action: Option<ActionKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub session_id: String,
    pub step: Step,
    pub street: Street,
    pub hand_number: u32,
    pub blind: u64,
    pub board: Vec<Card>,
    pub pot: u64,
    pub dealer: Option<PlayerId>,
    pub current_player: Option<PlayerId>,
    pub to_call: u64,
    pub seats: Vec<SeatView>,
    pub winners: Vec<(PlayerId, u64)>,
    pub winning_hands: Vec<(PlayerId, Hand)>,
    pub game_over: bool,
}

impl Snapshot {
    pub fn of(state: &GameState) -> Self {
        let folded = state.fold_players();
        let skipped = state.skip_players();
        let current = state.current_player();
        let seats = state
            .roster()
            .iter()
            .map(|id| SeatView {
                player: id.clone(),
                chips: state.chips_of(id).unwrap_or(0),
                seat_order: state.seat_order().get(id).copied(),
                in_game: state.remaining().contains(id),
                folded: folded.contains(id),
                all_in: skipped.contains(id) && !folded.contains(id),
                street_bet: state
                    .bets()
                    .iter()
                    .filter(|b| b.player == *id && b.round == state.round())
                    .map(|b| b.amount)
                    .sum(),
                last_action: state.bets().iter().rev().find(|b| b.player == *id).map(|b| b.kind),
            })
            .collect();
        Self {
            session_id: state.session_id().to_string(),
            step: state.step(),
            street: state.street(),
            hand_number: state.hand_number(),
            blind: state.blind(),
            board: state.board().as_slice().to_vec(),
            pot: if state.step() == Step::Play { state.pot() } else { 0 },
            to_call: current.as_ref().map(|id| state.check_amount(id)).unwrap_or(0),
            dealer: state.dealer().cloned(),
            current_player: current,
            seats,
            winners: state.round_winners().to_vec(),
            winning_hands: state.winner_hands().iter().map(|w| (w.player.clone(), w.hand)).collect(),
            game_over: state.is_game_over(),
        }
    }
}

pub struct Table<S, R, P> {
    state: GameState,
    shuffler: S,
    reporter: R,
    store: P,
}

impl<S, R, P> Table<S, R, P>
where
    S: Shuffler,
    R: GameOverReporter,
    P: RejoinStore,
{
    pub fn new(state: GameState, shuffler: S, reporter: R, store: P) -> Self {
        Self { state, shuffler, reporter, store }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.state)
    }

    /// Hole cards for one player, for private display.
    pub fn hole_cards(&self, player: &PlayerId) -> Option<HoleCards> {
        self.state.hole_cards(player)
    }

    fn fresh_deck(&mut self) -> Deck {
        let mut deck = Deck::standard();
        self.shuffler.shuffle(&mut deck);
        deck
    }

    pub fn ready(&mut self, player: impl Into<PlayerId>) -> Result<Vec<Effect>, GameError> {
        let deck = self.fresh_deck();
        self.apply(Command::Ready { player: player.into(), deck })
    }

    pub fn act(&mut self, player: impl Into<PlayerId>, decision: Decision) -> Result<Vec<Effect>, GameError> {
        self.apply(Command::Act { player: player.into(), decision })
    }

    pub fn end_hand(&mut self) -> Result<Vec<Effect>, GameError> {
        self.apply(Command::EndHand)
    }

    pub fn next_hand(&mut self) -> Result<Vec<Effect>, GameError> {
        let deck = self.fresh_deck();
        self.apply(Command::NextHand { deck })
    }

    /// A player connects. Their stored seat, if any, is offered to the engine.
    pub fn join(&mut self, player: impl Into<PlayerId>) -> Result<Vec<Effect>, GameError> {
        let player = player.into();
        let record = self.store.get(&player);
        self.apply(Command::PlayerJoined { player, record })
    }

    pub fn leave(&mut self, player: impl Into<PlayerId>) -> Result<Vec<Effect>, GameError> {
        self.apply(Command::PlayerLeft { player: player.into() })
    }

    /// Apply a command, commit the new state and carry out its effects.
    ///
    /// On error the table keeps its previous state.
    pub fn apply(&mut self, command: Command) -> Result<Vec<Effect>, GameError> {
        let transition = match self.state.apply(command) {
            Ok(t) => t,
            Err(err) => {
                if let GameError::Invariant(violation) = &err {
                    error!(session = self.state.session_id(), %violation, "table_state_kept");
                }
                return Err(err);
            }
        };
        self.state = transition.state;
        for effect in &transition.effects {
            self.carry_out(effect);
        }
        Ok(transition.effects)
    }

    fn carry_out(&mut self, effect: &Effect) {
        match effect {
            Effect::GameOver(outcomes) => {
                info!(session = self.state.session_id(), players = outcomes.len(), "reporting_game_over");
                self.reporter.report(self.state.session_id(), outcomes);
            }
            Effect::SeatSaved { player, record } => self.store.put(player.clone(), record.clone()),
            Effect::SeatRestored { player, .. } => self.store.remove(player),
            Effect::ChipsReturned { player, amount } => self.store.credit(player, *amount),
        }
    }
}

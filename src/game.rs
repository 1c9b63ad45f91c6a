use crate::action::{derive_action, Action, ActionKind, Bet, Decision};
use crate::cards::Card;
use crate::config::{cards_needed, ConfigError, TableConfig};
use crate::deck::Deck;
use crate::evaluator::{best_hand, compare, EvalError, Hand};
use crate::hand::{Board, HoleCards};
use crate::player::{Outcome, PlayerId, SeatRecord};
use crate::pot::{split_pot, totals_by_player, PotSplit};
use crate::seating::{modulo, position, reindex_dealer, rotate_dealer, speaking_order};
use core::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{event, Level};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// Lobby: players join and mark themselves ready.
    Wait,
    /// A hand is being played.
    Play,
    /// The pot has been awarded; winners are on display.
    Win,
    /// Between hands.
    RoundEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    pub fn from_round(round: u8) -> Street {
        match round {
            0 => Street::Preflop,
            1 => Street::Flop,
            2 => Street::Turn,
            3 => Street::River,
            _ => Street::Showdown,
        }
    }
}

/// Rejections. The state is left exactly as it was.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("command not allowed during {actual:?}, expected {expected:?}")]
    WrongStep { expected: Step, actual: Step },
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("it is not {player}'s turn")]
    NotYourTurn { player: PlayerId },
    #[error("raise must be positive")]
    ZeroRaise,
    #[error("{needed} chips needed but only {stack} behind")]
    CannotAfford { needed: u64, stack: u64 },
    #[error("need at least {needed} players, have {seated}")]
    NotEnoughPlayers { needed: usize, seated: usize },
    #[error("table is full ({0} seats)")]
    TableFull(usize),
    #[error("deck holds {available} cards, hand needs {needed}")]
    DeckTooSmall { needed: usize, available: usize },
    #[error("deck contains duplicate cards")]
    DuplicateCards,
    #[error("the game is over")]
    GameOver,
}

/// Internal consistency failures. These indicate a bug, never bad input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    #[error("chips not conserved: {before} before, {after} after")]
    ChipsNotConserved { before: u64, after: u64 },
    #[error("{player} would go below zero chips")]
    NegativeChips { player: PlayerId },
    #[error("{0} is still playing but not seated")]
    RemainingNotSeated(PlayerId),
    #[error("dealer index {dealer} out of range for {seats} seats")]
    DealerOutOfRange { dealer: usize, seats: usize },
    #[error("turn index {turn} out of range for {players_in} players able to act")]
    TurnOutOfRange { turn: usize, players_in: usize },
    #[error("hand evaluation failed: {0}")]
    Evaluation(#[from] EvalError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("invalid action: {0}")]
    Action(#[from] ActionError),
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

/// Everything a host can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Toggle readiness in the lobby. The deck is used if this starts the game.
    Ready { player: PlayerId, deck: Deck },
    Act { player: PlayerId, decision: Decision },
    NextHand { deck: Deck },
    EndHand,
    /// `record` is the rejoin record the host found for this player, if any.
    PlayerJoined { player: PlayerId, record: Option<SeatRecord> },
    PlayerLeft { player: PlayerId },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ready { .. } => "ready",
            Command::Act { .. } => "act",
            Command::NextHand { .. } => "next_hand",
            Command::EndHand => "end_hand",
            Command::PlayerJoined { .. } => "player_joined",
            Command::PlayerLeft { .. } => "player_left",
        }
    }
}

/// Side effects the host has to carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    /// Emitted once, when a single player is left.
    GameOver(Vec<(PlayerId, Outcome)>),
    /// A seated player left; keep this so they can take the seat back.
    SeatSaved { player: PlayerId, record: SeatRecord },
    /// A queued rejoin took its seat; the stored record has been used.
    SeatRestored { player: PlayerId, chips: u64 },
    /// Winnings owed to a player who already left.
    ChipsReturned { player: PlayerId, amount: u64 },
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerCards {
    pub player: PlayerId,
    pub hole: HoleCards,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WinnerHand {
    pub player: PlayerId,
    pub hand: Hand,
}

/// The whole table. Cloned and replaced on every transition, never mutated in place
/// by hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub(crate) config: TableConfig,
    pub(crate) session_id: String,
    pub(crate) step: Step,
    pub(crate) hand_number: u32,
    pub(crate) blind: u64,
    pub(crate) deck: Deck,
    pub(crate) board: Board,
    pub(crate) player_cards: Vec<PlayerCards>,
    pub(crate) bets: Vec<Bet>,
    pub(crate) chips: BTreeMap<PlayerId, u64>,
    pub(crate) seat_order: BTreeMap<PlayerId, usize>,
    pub(crate) roster: Vec<PlayerId>,
    pub(crate) remaining: Vec<PlayerId>,
    pub(crate) players_ready: Vec<PlayerId>,
    pub(crate) pending_joins: Vec<(PlayerId, SeatRecord)>,
    pub(crate) dealer_index: usize,
    pub(crate) turn_index: Option<usize>,
    pub(crate) round: u8,
    pub(crate) round_winners: Vec<(PlayerId, u64)>,
    pub(crate) winner_hands: Vec<WinnerHand>,
    pub(crate) game_over: bool,
}

impl GameState {
    /// A lobby for `players`, who still have to mark themselves ready.
    pub fn new<I>(config: TableConfig, session_id: impl Into<String>, players: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = PlayerId>,
    {
        config.validate()?;
        let mut roster: Vec<PlayerId> = Vec::new();
        for p in players {
            if !roster.contains(&p) {
                roster.push(p);
            }
        }
        if roster.len() > config.max_players {
            return Err(ActionError::TableFull(config.max_players).into());
        }
        Ok(Self {
            blind: config.initial_blind,
            config,
            session_id: session_id.into(),
            step: Step::Wait,
            hand_number: 0,
            deck: Deck::from_cards(Vec::new()),
            board: Board::default(),
            player_cards: Vec::new(),
            bets: Vec::new(),
            chips: BTreeMap::new(),
            seat_order: BTreeMap::new(),
            roster,
            remaining: Vec::new(),
            players_ready: Vec::new(),
            pending_joins: Vec::new(),
            dealer_index: 0,
            turn_index: None,
            round: 0,
            round_winners: Vec::new(),
            winner_hands: Vec::new(),
            game_over: false,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Hands dealt so far this session.
    pub fn hand_number(&self) -> u32 {
        self.hand_number
    }

    /// Current big blind.
    pub fn blind(&self) -> u64 {
        self.blind
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player_cards(&self) -> &[PlayerCards] {
        &self.player_cards
    }

    pub fn hole_cards(&self, player: &PlayerId) -> Option<HoleCards> {
        self.player_cards.iter().find(|pc| pc.player == *player).map(|pc| pc.hole)
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn chips(&self) -> &BTreeMap<PlayerId, u64> {
        &self.chips
    }

    pub fn chips_of(&self, player: &PlayerId) -> Option<u64> {
        self.chips.get(player).copied()
    }

    pub fn seat_order(&self) -> &BTreeMap<PlayerId, usize> {
        &self.seat_order
    }

    /// Everyone seated at the table, including eliminated players.
    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    /// Players still in the game, in seat order.
    pub fn remaining(&self) -> &[PlayerId] {
        &self.remaining
    }

    pub fn players_ready(&self) -> &[PlayerId] {
        &self.players_ready
    }

    pub fn pending_joins(&self) -> impl Iterator<Item = &PlayerId> {
        self.pending_joins.iter().map(|(p, _)| p)
    }

    pub fn dealer_index(&self) -> usize {
        self.dealer_index
    }

    pub fn dealer(&self) -> Option<&PlayerId> {
        self.remaining.get(self.dealer_index)
    }

    /// Index into [`GameState::acting_order`] of the player expected to act.
    pub fn turn_index(&self) -> Option<usize> {
        self.turn_index
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn street(&self) -> Street {
        Street::from_round(self.round)
    }

    pub fn round_winners(&self) -> &[(PlayerId, u64)] {
        &self.round_winners
    }

    pub fn winner_hands(&self) -> &[WinnerHand] {
        &self.winner_hands
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Chips committed to the current hand.
    pub fn pot(&self) -> u64 {
        self.bets.iter().map(|b| b.amount).sum()
    }

    /// Remaining players who folded or went all-in this hand, in seat order.
    pub fn skip_players(&self) -> Vec<PlayerId> {
        self.players_with(ActionKind::is_skip)
    }

    /// Remaining players who folded this hand, in seat order.
    pub fn fold_players(&self) -> Vec<PlayerId> {
        self.players_with(|k| k == ActionKind::Fold)
    }

    fn players_with(&self, pred: impl Fn(ActionKind) -> bool) -> Vec<PlayerId> {
        self.remaining
            .iter()
            .filter(|id| self.bets.iter().any(|b| b.player == **id && pred(b.kind)))
            .cloned()
            .collect()
    }

    /// Players who can still act, in speaking order.
    pub fn acting_order(&self) -> Vec<PlayerId> {
        speaking_order(&self.remaining, self.dealer_index, &self.skip_players())
    }

    pub fn players_in(&self) -> usize {
        self.remaining.len().saturating_sub(self.skip_players().len())
    }

    /// The player expected to act, if any.
    pub fn current_player(&self) -> Option<PlayerId> {
        let t = self.turn_index?;
        self.acting_order().get(t).cloned()
    }

    fn round_contribution(&self, player: &PlayerId) -> u64 {
        self.bets
            .iter()
            .filter(|b| b.round == self.round && b.player == *player)
            .map(|b| b.amount)
            .sum()
    }

    /// Highest amount any remaining player has put in during the current street.
    pub fn max_round_contribution(&self) -> u64 {
        self.remaining.iter().map(|id| self.round_contribution(id)).max().unwrap_or(0)
    }

    /// Chips `player` must add to match the current street's highest contribution.
    pub fn check_amount(&self, player: &PlayerId) -> u64 {
        self.max_round_contribution().saturating_sub(self.round_contribution(player))
    }

    /// Chips owned by seated players plus the live pot.
    pub fn chips_in_play(&self) -> u64 {
        let stacks: u64 = self.chips.values().sum();
        if self.step == Step::Play {
            stacks + self.pot()
        } else {
            stacks
        }
    }

    /// Apply one command and return the resulting state with its side effects.
    ///
    /// `self` is never modified: a rejected command leaves the caller holding the
    /// exact previous state.
    pub fn apply(&self, command: Command) -> Result<Transition, GameError> {
        let name = command.name();
        let mut next = self.clone();
        let mut effects = Vec::new();
        let result = match command {
            Command::Ready { player, deck } => next.ready(player, deck, &mut effects),
            Command::Act { player, decision } => next.act(player, decision, &mut effects),
            Command::NextHand { deck } => next.next_hand(deck, &mut effects),
            Command::EndHand => next.end_hand(&mut effects),
            Command::PlayerJoined { player, record } => next.player_joined(player, record),
            Command::PlayerLeft { player } => next.player_left(player, &mut effects),
        };
        if let Err(error) = result {
            match &error {
                GameError::Invariant(_) => event!(Level::ERROR, command = name, %error, "invariant_violation"),
                _ => event!(Level::WARN, command = name, %error, "command_rejected"),
            }
            return Err(error);
        }
        if let Err(violation) = next.check_invariants(self, &effects) {
            event!(Level::ERROR, command = name, %violation, "invariant_violation");
            return Err(violation.into());
        }
        event!(
            Level::DEBUG,
            command = name,
            step = ?next.step,
            round = next.round,
            turn = ?next.turn_index,
            effects = effects.len(),
            "command_applied"
        );
        Ok(Transition { state: next, effects })
    }

    fn expect_step(&self, expected: Step) -> Result<(), ActionError> {
        if self.step != expected {
            return Err(ActionError::WrongStep { expected, actual: self.step });
        }
        Ok(())
    }

    fn ready(&mut self, player: PlayerId, deck: Deck, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        self.expect_step(Step::Wait)?;
        if !self.roster.contains(&player) {
            return Err(ActionError::UnknownPlayer(player).into());
        }
        if let Some(i) = position(&self.players_ready, &player) {
            self.players_ready.remove(i);
            return Ok(());
        }
        self.players_ready.push(player);
        if self.players_ready.len() < self.roster.len() {
            return Ok(());
        }
        if self.roster.len() < self.config.min_players {
            return Err(ActionError::NotEnoughPlayers {
                needed: self.config.min_players,
                seated: self.roster.len(),
            }
            .into());
        }
        self.start_game(deck, effects)
    }

    fn start_game(&mut self, deck: Deck, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        let starting = self.config.starting_chips;
        self.chips = self.roster.iter().map(|id| (id.clone(), starting)).collect();
        self.seat_order = self.roster.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();
        self.remaining = self.roster.clone();
        self.dealer_index = 0;
        self.hand_number = 0;
        self.blind = self.config.initial_blind;
        event!(Level::INFO, players = self.roster.len(), starting, "game_started");
        self.start_hand(deck, effects)
    }

    fn next_hand(&mut self, deck: Deck, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        self.expect_step(Step::RoundEnd)?;
        if self.game_over {
            return Err(ActionError::GameOver.into());
        }
        if self.remaining.len() < 2 {
            return Err(ActionError::NotEnoughPlayers { needed: 2, seated: self.remaining.len() }.into());
        }
        self.start_hand(deck, effects)
    }

    fn start_hand(&mut self, mut deck: Deck, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        let seated = self.remaining.len();
        let needed = cards_needed(seated);
        if deck.len() < needed {
            return Err(ActionError::DeckTooSmall { needed, available: deck.len() }.into());
        }
        if !deck.is_distinct() {
            return Err(ActionError::DuplicateCards.into());
        }

        self.bets.clear();
        self.board = Board::default();
        self.player_cards.clear();
        self.players_ready.clear();
        self.round = 0;
        self.round_winners.clear();
        self.winner_hands.clear();
        self.step = Step::Play;
        self.hand_number += 1;

        let order = speaking_order(&self.remaining, self.dealer_index, &[]);
        let mut first: Vec<Card> = Vec::with_capacity(order.len());
        for _ in &order {
            first.push(deck.draw().ok_or(ActionError::DeckTooSmall { needed, available: 0 })?);
        }
        for (id, a) in order.iter().zip(first) {
            let b = deck.draw().ok_or(ActionError::DeckTooSmall { needed, available: 0 })?;
            let hole = HoleCards::try_new(a, b).map_err(|_| ActionError::DuplicateCards)?;
            self.player_cards.push(PlayerCards { player: id.clone(), hole });
        }
        self.deck = deck;

        if self.dealer_index == 0 {
            self.blind = self.blind.saturating_mul(2);
        }
        let (small, big) = if seated == 2 {
            (order[1].clone(), order[0].clone())
        } else {
            (order[0].clone(), order[1].clone())
        };
        self.post(&small, self.blind / 2, ActionKind::SmallBlind)?;
        self.post(&big, self.blind, ActionKind::BigBlind)?;

        event!(
            Level::INFO,
            hand = self.hand_number,
            blind = self.blind,
            dealer = %self.remaining[self.dealer_index.min(seated - 1)],
            "hand_started"
        );

        let raw = if seated == 2 { 1 } else { 2 };
        let skip = self.skip_players();
        let acting = speaking_order(&self.remaining, self.dealer_index, &skip);
        if acting.is_empty() {
            self.turn_index = None;
            return self.advance_round(effects);
        }
        let first_actor = (0..seated)
            .map(|k| &order[(raw + k) % seated])
            .find(|id| !skip.contains(id))
            .and_then(|id| position(&acting, id));
        self.turn_index = Some(first_actor.unwrap_or(0));
        Ok(())
    }

    fn post(&mut self, player: &PlayerId, amount: u64, kind: ActionKind) -> Result<(), GameError> {
        let stack = self.chips_of(player).unwrap_or(0);
        let action = derive_action(amount, 0, stack, Some(kind));
        self.record(player, action)
    }

    /// Append a bet and take its chips from the player's stack.
    fn record(&mut self, player: &PlayerId, action: Action) -> Result<(), GameError> {
        let stack = self
            .chips
            .get_mut(player)
            .ok_or_else(|| InvariantViolation::NegativeChips { player: player.clone() })?;
        *stack = stack
            .checked_sub(action.amount)
            .ok_or_else(|| InvariantViolation::NegativeChips { player: player.clone() })?;
        self.bets.push(Bet::new(player.clone(), action, self.round));
        Ok(())
    }

    fn act(&mut self, player: PlayerId, decision: Decision, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        self.expect_step(Step::Play)?;
        if !self.remaining.contains(&player) {
            return Err(ActionError::UnknownPlayer(player).into());
        }
        if self.current_player().as_ref() != Some(&player) {
            return Err(ActionError::NotYourTurn { player }.into());
        }
        let check = self.check_amount(&player);
        let stack = self.chips_of(&player).unwrap_or(0);
        let action = match decision {
            Decision::Fold => derive_action(check, 0, stack, Some(ActionKind::Fold)),
            Decision::CheckOrCall => derive_action(check, 0, stack, None),
            Decision::Raise(0) => return Err(ActionError::ZeroRaise.into()),
            Decision::Raise(raise) => {
                let needed = check.saturating_add(raise);
                if needed > stack {
                    return Err(ActionError::CannotAfford { needed, stack }.into());
                }
                derive_action(check, raise, stack, None)
            }
            Decision::AllIn => derive_action(check, stack.saturating_sub(check), stack, None),
        };
        event!(Level::DEBUG, player = %player, kind = %action.kind, amount = action.amount, "action");
        self.apply_action(&player, action, effects)
    }

    fn apply_action(&mut self, player: &PlayerId, action: Action, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        self.record(player, action)?;

        if self.fold_players().len() + 1 == self.remaining.len() {
            return self.award_uncontested(effects);
        }

        let players_in = self.players_in();
        if players_in == 0 || self.round_complete() {
            return self.advance_round(effects);
        }
        let mut turn = self.turn_index.unwrap_or(0) as i64;
        if !action.kind.is_skip() {
            turn += 1;
        }
        self.turn_index = Some(modulo(turn, players_in));
        Ok(())
    }

    /// Everyone able to act has spoken and matched the highest contribution.
    ///
    /// On the first street both blinds count as spoken entries, even if their poster
    /// has left, while a player all-in on a blind can never speak again.
    fn round_complete(&self) -> bool {
        let skip = self.skip_players();
        let players_in = self.remaining.len().saturating_sub(skip.len());
        let round_bets = self
            .bets
            .iter()
            .enumerate()
            .filter(|(i, b)| {
                b.round == self.round && ((self.round == 0 && *i < 2) || self.remaining.contains(&b.player))
            })
            .count();

        let max = self.max_round_contribution();
        let active = || self.remaining.iter().filter(|id| !skip.contains(id));
        let all_max = active().all(|id| self.round_contribution(id) == max);

        let spoken = if self.round == 0 {
            let blind_all_ins = self
                .bets
                .iter()
                .take(2)
                .filter(|b| b.kind == ActionKind::AllIn && self.remaining.contains(&b.player))
                .count();
            round_bets + blind_all_ins >= self.remaining.len() + 2
        } else {
            round_bets >= players_in
                && active().all(|id| self.bets.iter().any(|b| b.round == self.round && b.player == *id))
        };
        spoken && all_max
    }

    /// Deal the next street, running the board out while nobody can act.
    fn advance_round(&mut self, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        loop {
            self.round += 1;
            let street = self.street();
            if street == Street::Showdown {
                self.turn_index = None;
                return self.showdown(effects);
            }
            self.deck.burn();
            let count = if street == Street::Flop { 3 } else { 1 };
            let dealt = self.deck.draw_n(count);
            self.board.extend(dealt);
            event!(Level::INFO, street = ?street, board = ?self.board.as_slice(), "street_dealt");
            if self.players_in() > 1 {
                self.turn_index = Some(0);
                return Ok(());
            }
            self.turn_index = None;
        }
    }

    fn showdown(&mut self, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        let folded = self.fold_players();
        let mut hands: Vec<WinnerHand> = Vec::new();
        for pc in &self.player_cards {
            if !self.remaining.contains(&pc.player) || folded.contains(&pc.player) {
                continue;
            }
            let hand = best_hand(&pc.hole, &self.board).map_err(InvariantViolation::from)?;
            hands.push(WinnerHand { player: pc.player.clone(), hand });
        }
        hands.sort_by(|a, b| compare(&a.hand, &b.hand));
        let winners: Vec<WinnerHand> = match hands.first() {
            Some(best) => {
                let best = best.hand;
                hands.into_iter().filter(|h| compare(&h.hand, &best) == Ordering::Equal).collect()
            }
            None => Vec::new(),
        };
        let ids: Vec<PlayerId> = winners.iter().map(|w| w.player.clone()).collect();
        for w in &winners {
            event!(Level::INFO, player = %w.player, hand = %w.hand, "showdown_winner");
        }
        self.winner_hands = winners;
        let split = split_pot(&totals_by_player(&self.bets), &ids);
        self.win_round(split, effects)
    }

    fn award_uncontested(&mut self, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        let folded = self.fold_players();
        let winner: Vec<PlayerId> =
            self.remaining.iter().filter(|id| !folded.contains(id)).take(1).cloned().collect();
        event!(Level::INFO, winner = ?winner, pot = self.pot(), "folded_to_winner");
        let split = split_pot(&totals_by_player(&self.bets), &winner);
        self.win_round(split, effects)
    }

    fn win_round(&mut self, split: PotSplit, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        self.step = Step::Win;
        self.turn_index = None;
        self.round_winners = split.payouts();
        for (id, amount) in &self.round_winners {
            match self.chips.get_mut(id) {
                Some(stack) => *stack += amount,
                None => {
                    // queued rejoins are restored from this copy of the record
                    if let Some((_, record)) = self.pending_joins.iter_mut().find(|(p, _)| p == id) {
                        record.chips += amount;
                    }
                    effects.push(Effect::ChipsReturned { player: id.clone(), amount: *amount });
                }
            }
        }
        event!(Level::INFO, payouts = ?self.round_winners, "pot_awarded");

        let before = self.remaining.clone();
        let chips = &self.chips;
        self.remaining.retain(|id| chips.get(id).copied().unwrap_or(0) > 0);
        self.dealer_index = reindex_dealer(&before, self.dealer_index, &self.remaining);
        for gone in before.iter().filter(|id| !self.remaining.contains(id)) {
            event!(Level::INFO, player = %gone, "player_eliminated");
        }

        if self.remaining.len() <= 1 {
            let outcomes = self
                .roster
                .iter()
                .map(|id| {
                    let won = self.chips.get(id).copied().unwrap_or(0) > 0;
                    (id.clone(), if won { Outcome::Won } else { Outcome::Lost })
                })
                .collect();
            self.report_game_over(outcomes, effects);
        }
        Ok(())
    }

    fn report_game_over(&mut self, outcomes: Vec<(PlayerId, Outcome)>, effects: &mut Vec<Effect>) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        event!(Level::INFO, outcomes = ?outcomes, "game_over");
        effects.push(Effect::GameOver(outcomes));
    }

    fn end_hand(&mut self, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        self.expect_step(Step::Win)?;
        let dealer = self.dealer().cloned();

        for (id, record) in std::mem::take(&mut self.pending_joins) {
            self.chips.insert(id.clone(), record.chips);
            self.seat_order.insert(id.clone(), record.seat_order);
            if !self.roster.contains(&id) {
                self.roster.push(id.clone());
            }
            if record.chips > 0 && !self.remaining.contains(&id) {
                self.remaining.push(id.clone());
            }
            event!(Level::INFO, player = %id, chips = record.chips, "seat_restored");
            effects.push(Effect::SeatRestored { player: id, chips: record.chips });
        }
        let seats = &self.seat_order;
        let key = |id: &PlayerId| seats.get(id).copied().unwrap_or(usize::MAX);
        self.roster.sort_by_key(|id| key(id));
        self.remaining.sort_by_key(|id| key(id));

        self.turn_index = None;
        let anchor = dealer.and_then(|id| position(&self.remaining, &id)).unwrap_or(self.dealer_index);
        self.dealer_index = rotate_dealer(anchor, self.remaining.len());
        self.round_winners.clear();
        self.winner_hands.clear();
        self.step = Step::RoundEnd;
        Ok(())
    }

    fn player_joined(&mut self, player: PlayerId, record: Option<SeatRecord>) -> Result<(), GameError> {
        if self.step == Step::Wait {
            if self.roster.contains(&player) {
                return Ok(());
            }
            if self.roster.len() >= self.config.max_players {
                return Err(ActionError::TableFull(self.config.max_players).into());
            }
            event!(Level::INFO, player = %player, "player_joined_lobby");
            self.roster.push(player);
            return Ok(());
        }
        let Some(record) = record else {
            return Ok(());
        };
        let queued = self.pending_joins.iter().any(|(p, _)| *p == player);
        if record.session_id != self.session_id || self.roster.contains(&player) || queued {
            event!(Level::DEBUG, player = %player, "spectator_joined");
            return Ok(());
        }
        event!(Level::INFO, player = %player, chips = record.chips, "rejoin_queued");
        self.pending_joins.push((player, record));
        Ok(())
    }

    fn player_left(&mut self, player: PlayerId, effects: &mut Vec<Effect>) -> Result<(), GameError> {
        self.pending_joins.retain(|(p, _)| *p != player);
        let Some(seat) = position(&self.roster, &player) else {
            return Ok(());
        };
        self.roster.remove(seat);
        if self.step == Step::Wait {
            self.players_ready.retain(|p| *p != player);
            return Ok(());
        }
        let Some(idx) = position(&self.remaining, &player) else {
            self.chips.remove(&player);
            self.seat_order.remove(&player);
            return Ok(());
        };

        let turn_pos = position(&self.acting_order(), &player);
        let was_dealer = idx == self.dealer_index;
        if was_dealer {
            self.dealer_index = modulo(self.dealer_index as i64, self.remaining.len() - 1);
        } else if idx < self.dealer_index {
            self.dealer_index -= 1;
        }

        self.remaining.remove(idx);
        let record = SeatRecord {
            chips: self.chips.remove(&player).unwrap_or(0),
            session_id: self.session_id.clone(),
            seat_order: self.seat_order.remove(&player).unwrap_or(seat),
        };
        event!(Level::INFO, player = %player, chips = record.chips, "player_left");
        if record.chips > 0 {
            effects.push(Effect::SeatSaved { player: player.clone(), record });
        }

        let players_in = self.players_in();
        if let Some(turn) = self.turn_index {
            let mut t = turn as i64;
            if was_dealer {
                t = modulo(t - 1, players_in) as i64;
            }
            match turn_pos.map(|p| p as i64) {
                Some(p) if p == t => t = modulo(t, players_in) as i64,
                Some(p) if p < t => t = modulo(t - 1, players_in) as i64,
                _ => {}
            }
            self.turn_index = Some(t as usize);
        }

        if self.remaining.len() == 1 {
            let survivor = self.remaining[0].clone();
            let outcomes = self
                .roster
                .iter()
                .map(|id| (id.clone(), if *id == survivor { Outcome::Won } else { Outcome::Lost }))
                .collect();
            self.report_game_over(outcomes, effects);
        }

        if self.step != Step::Play {
            return Ok(());
        }
        if !self.remaining.is_empty() && self.fold_players().len() + 1 == self.remaining.len() {
            return self.award_uncontested(effects);
        }
        if players_in == 0 || self.round_complete() {
            return self.advance_round(effects);
        }
        Ok(())
    }

    fn check_invariants(&self, prev: &GameState, effects: &[Effect]) -> Result<(), InvariantViolation> {
        if prev.step != Step::Wait {
            let mut after = self.chips_in_play();
            for effect in effects {
                match effect {
                    Effect::SeatSaved { record, .. } => after += record.chips,
                    Effect::ChipsReturned { amount, .. } => after += amount,
                    Effect::SeatRestored { chips, .. } => after = after.saturating_sub(*chips),
                    Effect::GameOver(_) => {}
                }
            }
            let before = prev.chips_in_play();
            if before != after {
                return Err(InvariantViolation::ChipsNotConserved { before, after });
            }
        }
        if let Some(id) = self.remaining.iter().find(|id| !self.roster.contains(id)) {
            return Err(InvariantViolation::RemainingNotSeated(id.clone()));
        }
        if self.step != Step::Wait && !self.remaining.is_empty() && self.dealer_index >= self.remaining.len() {
            return Err(InvariantViolation::DealerOutOfRange {
                dealer: self.dealer_index,
                seats: self.remaining.len(),
            });
        }
        if let Some(turn) = self.turn_index {
            let players_in = self.players_in();
            if turn >= players_in {
                return Err(InvariantViolation::TurnOutOfRange { turn, players_in });
            }
        }
        Ok(())
    }
}

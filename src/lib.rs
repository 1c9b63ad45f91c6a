//! holdem-engine: Texas Hold'em rules engine
//!
//! Goals:
//! - Deterministic transitions: the same commands and decks always produce the same state
//! - Every command either commits atomically or is rejected with the state untouched
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: evaluate a Hold'em hand
//! ```
//! use holdem_engine::cards::{Card, Rank, Suit};
//! use holdem_engine::evaluator::{best_hand, Category};
//! use holdem_engine::hand::{Board, HoleCards};
//!
//! let hole = HoleCards::try_new(
//!     Card::new(Rank::Ace, Suit::Spades),
//!     Card::new(Rank::Ace, Suit::Hearts),
//! ).unwrap();
//! let board = Board::try_new(vec![
//!     Card::new(Rank::King, Suit::Clubs),
//!     Card::new(Rank::Queen, Suit::Diamonds),
//!     Card::new(Rank::Jack, Suit::Hearts),
//!     Card::new(Rank::Three, Suit::Spades),
//!     Card::new(Rank::Two, Suit::Clubs),
//! ]).unwrap();
//!
//! let hand = best_hand(&hole, &board).unwrap();
//! assert_eq!(hand.category, Category::OnePair);
//! ```
//!
//! ## Quick start: play a hand
//! ```
//! use holdem_engine::action::Decision;
//! use holdem_engine::config::TableConfig;
//! use holdem_engine::deck::SeededShuffler;
//! use holdem_engine::engine::{MemoryRejoinStore, Table};
//! use holdem_engine::game::{GameState, Step};
//! use holdem_engine::player::{Outcome, PlayerId};
//!
//! let players = ["alice", "bob"].map(PlayerId::from);
//! let state = GameState::new(TableConfig::default(), "demo", players).unwrap();
//! let reporter = |_: &str, _: &[(PlayerId, Outcome)]| {};
//! let mut table = Table::new(state, SeededShuffler::new(7), reporter, MemoryRejoinStore::new());
//!
//! table.ready("alice").unwrap();
//! table.ready("bob").unwrap();
//! assert_eq!(table.state().step(), Step::Play);
//!
//! // heads-up the dealer posts the small blind and acts first
//! table.act("alice", Decision::Fold).unwrap();
//! assert_eq!(table.state().step(), Step::Win);
//! assert_eq!(table.state().chips_of(&"bob".into()), Some(1010));
//! ```
//!
//! ## CLI
//! Drive a table from stdin with:
//! ```sh
//! cargo run --bin holdem -- --seed 42 alice bob
//! ```

pub mod action;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod game;
pub mod hand;
pub mod player;
pub mod pot;
pub mod seating;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

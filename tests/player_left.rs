use holdem_engine::action::Decision;
use holdem_engine::config::TableConfig;
use holdem_engine::deck::{Deck, SeededShuffler, Shuffler};
use holdem_engine::game::{Command, Effect, GameError, GameState, Step, Street};
use holdem_engine::player::{Outcome, PlayerId, SeatRecord};
use proptest::prelude::*;

fn start(players: &[&str]) -> GameState {
    let ids: Vec<PlayerId> = players.iter().map(|p| PlayerId::from(*p)).collect();
    let mut state = GameState::new(TableConfig::default(), "42", ids).unwrap();
    for p in players {
        state = state
            .apply(Command::Ready { player: (*p).into(), deck: Deck::standard() })
            .unwrap()
            .state;
    }
    state
}

fn act(state: &GameState, player: &str, decision: Decision) -> GameState {
    state.apply(Command::Act { player: player.into(), decision }).unwrap().state
}

fn leave(state: &GameState, player: &str) -> (GameState, Vec<Effect>) {
    let t = state.apply(Command::PlayerLeft { player: player.into() }).unwrap();
    (t.state, t.effects)
}

fn ids(list: &[&str]) -> Vec<PlayerId> {
    list.iter().map(|s| PlayerId::from(*s)).collect()
}

fn saved(player: &str, chips: u64, seat_order: usize) -> Effect {
    Effect::SeatSaved {
        player: player.into(),
        record: SeatRecord { chips, session_id: "42".into(), seat_order },
    }
}

#[test]
fn spectator_leaving_changes_nothing() {
    let s = start(&["a", "b", "c", "d"]);
    let (next, effects) = leave(&s, "e");
    assert_eq!(next, s);
    assert!(effects.is_empty());
}

#[test]
fn eliminated_player_is_dropped_without_a_record() {
    // b and c get it in preflop and one of them busts
    let mut s = start(&["a", "b", "c"]);
    s = act(&s, "a", Decision::Fold);
    s = act(&s, "b", Decision::AllIn);
    s = act(&s, "c", Decision::CheckOrCall);
    assert_eq!(s.step(), Step::Win);
    let busted: Vec<PlayerId> =
        s.roster().iter().filter(|id| !s.remaining().contains(id)).cloned().collect();
    assert_eq!(busted.len(), 1);
    let gone = busted[0].as_str().to_string();

    let (next, effects) = leave(&s, &gone);
    assert!(effects.is_empty());
    assert!(!next.roster().contains(&busted[0]));
    assert_eq!(next.chips_of(&busted[0]), None);
    assert_eq!(next.remaining(), s.remaining());
}

#[test]
fn leaving_after_the_pot_is_awarded_saves_the_seat() {
    let s = start(&["a", "b", "c", "d"]);
    let s = act(&s, "d", Decision::Fold);
    let s = act(&s, "a", Decision::Fold);
    let s = act(&s, "b", Decision::Fold);
    assert_eq!(s.step(), Step::Win);
    assert_eq!(s.chips_of(&"c".into()), Some(1010));

    let (s, effects) = leave(&s, "b");
    assert_eq!(effects, vec![saved("b", 990, 1)]);
    assert_eq!(s.step(), Step::Win);
    assert_eq!(s.dealer_index(), 0);
    assert_eq!(s.turn_index(), None);
    assert_eq!(s.remaining(), ids(&["a", "c", "d"]).as_slice());
    assert_eq!(s.roster(), ids(&["a", "c", "d"]).as_slice());

    let s = s.apply(Command::EndHand).unwrap().state;
    assert_eq!(s.step(), Step::RoundEnd);
    let (s, effects) = leave(&s, "d");
    assert_eq!(effects, vec![saved("d", 1000, 3)]);
    assert_eq!(s.step(), Step::RoundEnd);
}

#[test]
fn leaving_after_the_current_turn_keeps_the_turn() {
    let s = start(&["a", "b", "c", "d"]);
    let s = act(&s, "d", Decision::CheckOrCall);
    let s = act(&s, "a", Decision::CheckOrCall);
    assert_eq!(s.current_player(), Some("b".into()));
    assert_eq!(s.turn_index(), Some(0));

    let (s, effects) = leave(&s, "c");
    assert_eq!(effects, vec![saved("c", 980, 2)]);
    assert_eq!(s.turn_index(), Some(0));
    assert_eq!(s.current_player(), Some("b".into()));
    assert_eq!(s.street(), Street::Preflop);
    // the big blind stays in the pot
    assert_eq!(s.pot(), 70);

    let s = act(&s, "b", Decision::CheckOrCall);
    assert_eq!(s.street(), Street::Flop);
}

#[test]
fn leaving_before_the_current_turn_shifts_it_down() {
    let s = start(&["a", "b", "c", "d"]);
    let s = act(&s, "d", Decision::CheckOrCall);
    assert_eq!(s.turn_index(), Some(3));

    let (s, _) = leave(&s, "c");
    assert_eq!(s.turn_index(), Some(2));
    assert_eq!(s.current_player(), Some("a".into()));

    let (s, _) = leave(&s, "d");
    assert_eq!(s.turn_index(), Some(1));
    assert_eq!(s.current_player(), Some("a".into()));
    assert_eq!(s.dealer_index(), 0);
}

#[test]
fn last_speaker_leaving_moves_to_the_next_street() {
    let s = start(&["a", "b", "c", "d"]);
    let s = act(&s, "d", Decision::CheckOrCall);
    let s = act(&s, "a", Decision::CheckOrCall);
    let s = act(&s, "b", Decision::CheckOrCall);
    assert_eq!(s.current_player(), Some("c".into()));

    let (s, _) = leave(&s, "c");
    assert_eq!(s.street(), Street::Flop);
    assert_eq!(s.turn_index(), Some(0));
    assert_eq!(s.current_player(), Some("b".into()));
}

#[test]
fn leaving_on_your_turn_passes_it_on() {
    let s = start(&["a", "b", "c", "d"]);
    let s = act(&s, "d", Decision::CheckOrCall);
    let s = act(&s, "a", Decision::CheckOrCall);

    let (s, _) = leave(&s, "b");
    assert_eq!(s.turn_index(), Some(0));
    assert_eq!(s.current_player(), Some("c".into()));
    assert_eq!(s.street(), Street::Preflop);

    // the big blind leaving on their option closes the street
    let (s, _) = leave(&s, "c");
    assert_eq!(s.street(), Street::Flop);
    assert_eq!(s.current_player(), Some("d".into()));
}

#[test]
fn dealer_leaving_passes_the_button_on() {
    let s = start(&["a", "b", "c", "d"]);
    assert_eq!(s.current_player(), Some("d".into()));

    let (s, effects) = leave(&s, "a");
    assert_eq!(effects, vec![saved("a", 1000, 0)]);
    assert_eq!(s.dealer(), Some(&"b".into()));
    assert_eq!(s.current_player(), Some("d".into()));
    assert_eq!(s.turn_index(), Some(1));
}

#[test]
fn dealer_leaving_on_their_turn_passes_the_turn_on() {
    let s = start(&["a", "b", "c", "d"]);
    let s = act(&s, "d", Decision::CheckOrCall);
    assert_eq!(s.current_player(), Some("a".into()));

    let (s, _) = leave(&s, "a");
    assert_eq!(s.dealer(), Some(&"b".into()));
    assert_eq!(s.current_player(), Some("b".into()));
    assert_eq!(s.street(), Street::Preflop);
}

#[test]
fn player_before_the_dealer_leaving_keeps_the_button() {
    let s = start(&["a", "b", "c"]);
    let s = act(&s, "a", Decision::Fold);
    let s = act(&s, "b", Decision::Fold);
    let s = s.apply(Command::EndHand).unwrap().state;
    let s = s.apply(Command::NextHand { deck: Deck::standard() }).unwrap().state;
    assert_eq!(s.dealer(), Some(&"b".into()));

    let (s, _) = leave(&s, "a");
    assert_eq!(s.dealer_index(), 0);
    assert_eq!(s.dealer(), Some(&"b".into()));
}

#[test]
fn last_opponent_leaving_ends_the_game_and_awards_the_pot() {
    let s = start(&["a", "b"]);
    assert_eq!(s.current_player(), Some("a".into()));
    let (s, effects) = leave(&s, "a");
    assert_eq!(
        effects,
        vec![
            saved("a", 990, 0),
            Effect::GameOver(vec![("b".into(), Outcome::Won)]),
        ]
    );
    assert_eq!(s.step(), Step::Win);
    assert_eq!(s.chips_of(&"b".into()), Some(1010));
    assert!(s.is_game_over());

    // no second report
    let (_, effects) = leave(&s, "b");
    assert_eq!(effects, vec![saved("b", 1010, 1)]);
}

#[test]
fn lobby_departure_edits_the_roster() {
    let s = GameState::new(TableConfig::default(), "42", ids(&["a", "b", "c"])).unwrap();
    let s = s.apply(Command::Ready { player: "b".into(), deck: Deck::standard() }).unwrap().state;
    let (s, effects) = leave(&s, "b");
    assert!(effects.is_empty());
    assert_eq!(s.roster(), ids(&["a", "c"]).as_slice());
    assert!(s.players_ready().is_empty());
}

#[test]
fn rejoin_is_queued_and_restored_at_hand_end() {
    let s = start(&["a", "b", "c"]);
    let (s, effects) = leave(&s, "b");
    let record = match &effects[..] {
        [Effect::SeatSaved { record, .. }] => record.clone(),
        other => panic!("unexpected effects {other:?}"),
    };
    assert_eq!(record.chips, 990);
    assert_eq!(s.current_player(), Some("a".into()));

    let wrong = SeatRecord { session_id: "43".into(), ..record.clone() };
    let t = s.apply(Command::PlayerJoined { player: "b".into(), record: Some(wrong) }).unwrap();
    assert_eq!(t.state.pending_joins().count(), 0);

    let s = s
        .apply(Command::PlayerJoined { player: "b".into(), record: Some(record) })
        .unwrap()
        .state;
    assert_eq!(s.pending_joins().cloned().collect::<Vec<_>>(), ids(&["b"]));
    assert!(!s.roster().contains(&"b".into()));

    let s = act(&s, "a", Decision::Fold);
    assert_eq!(s.step(), Step::Win);
    assert_eq!(s.chips_of(&"c".into()), Some(1010));

    let t = s.apply(Command::EndHand).unwrap();
    assert_eq!(t.effects, vec![Effect::SeatRestored { player: "b".into(), chips: 990 }]);
    let s = t.state;
    assert_eq!(s.roster(), ids(&["a", "b", "c"]).as_slice());
    assert_eq!(s.remaining(), ids(&["a", "b", "c"]).as_slice());
    assert_eq!(s.chips_of(&"b".into()), Some(990));
    assert_eq!(s.dealer(), Some(&"b".into()));
    assert_eq!(s.pending_joins().count(), 0);
}

#[test]
fn leaving_with_an_uncovered_bet_returns_the_overflow() {
    let s = start(&["a", "b", "c"]);
    let s = act(&s, "a", Decision::Raise(480));
    let (s, effects) = leave(&s, "a");
    assert_eq!(effects, vec![saved("a", 500, 0)]);
    assert_eq!(s.current_player(), Some("b".into()));

    let t = s.apply(Command::Act { player: "b".into(), decision: Decision::Fold }).unwrap();
    assert_eq!(t.effects, vec![Effect::ChipsReturned { player: "a".into(), amount: 480 }]);
    assert_eq!(t.state.chips_of(&"c".into()), Some(1030));
}

#[test]
fn all_in_player_leaving_saves_no_empty_seat() {
    let s = start(&["a", "b", "c", "d"]);
    let s = act(&s, "d", Decision::AllIn);
    assert_eq!(s.chips_of(&"d".into()), Some(0));

    let (s, effects) = leave(&s, "d");
    assert!(effects.is_empty());
    assert!(!s.roster().contains(&"d".into()));
    assert_eq!(s.current_player(), Some("a".into()));

    // the uncalled part of the all-in still goes back to its owner
    let s = act(&s, "a", Decision::Fold);
    let t = s.apply(Command::Act { player: "b".into(), decision: Decision::Fold }).unwrap();
    assert_eq!(t.effects, vec![Effect::ChipsReturned { player: "d".into(), amount: 980 }]);
    assert_eq!(t.state.chips_of(&"c".into()), Some(1030));
}

#[derive(Debug, Clone)]
enum Move {
    Decide(u8, u64),
    Leave(usize),
}

fn step_strategy() -> impl Strategy<Value = Move> {
    prop_oneof![
        8 => (0u8..4, 1u64..400).prop_map(|(d, r)| Move::Decide(d, r)),
        1 => (0usize..6).prop_map(Move::Leave),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn departures_never_break_the_invariants(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..120),
    ) {
        let players = ["p0", "p1", "p2", "p3", "p4", "p5"];
        let mut shuffler = SeededShuffler::new(seed);
        let mut deal = || {
            let mut d = Deck::standard();
            shuffler.shuffle(&mut d);
            d
        };
        let mut s = GameState::new(TableConfig::default(), "42", ids(&players)).unwrap();
        for p in players {
            s = s.apply(Command::Ready { player: p.into(), deck: deal() }).unwrap().state;
        }
        for step in steps {
            let command = match (s.step(), step) {
                (Step::Win, _) => Command::EndHand,
                (Step::RoundEnd, _) if s.is_game_over() => break,
                (Step::RoundEnd, _) => Command::NextHand { deck: deal() },
                (_, Move::Leave(i)) => Command::PlayerLeft { player: players[i].into() },
                (_, Move::Decide(d, raise)) => match s.current_player() {
                    Some(player) => {
                        let decision = match d {
                            0 => Decision::Fold,
                            1 => Decision::CheckOrCall,
                            2 => Decision::Raise(raise),
                            _ => Decision::AllIn,
                        };
                        Command::Act { player, decision }
                    }
                    None => continue,
                },
            };
            match s.apply(command) {
                Ok(t) => s = t.state,
                Err(GameError::Action(_)) => {}
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }
}

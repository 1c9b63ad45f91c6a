use holdem_engine::action::{ActionKind, Decision};
use holdem_engine::cards::parse_cards;
use holdem_engine::config::TableConfig;
use holdem_engine::deck::Deck;
use holdem_engine::game::{Command, Effect, GameState, Step};
use holdem_engine::player::{Outcome, PlayerId};

fn stacked_deck(top: &str) -> Deck {
    let top = parse_cards(top).expect("valid cards");
    let rest: Vec<_> = Deck::standard().cards().copied().filter(|c| !top.contains(c)).collect();
    Deck::from_cards(top.into_iter().chain(rest))
}

fn start_with(config: TableConfig, players: &[&str], deck: Deck) -> GameState {
    let ids: Vec<PlayerId> = players.iter().map(|p| PlayerId::from(*p)).collect();
    let mut state = GameState::new(config, "s1", ids).unwrap();
    for p in players {
        state = state
            .apply(Command::Ready { player: (*p).into(), deck: deck.clone() })
            .unwrap()
            .state;
    }
    state
}

fn act(state: &GameState, player: &str, decision: Decision) -> GameState {
    state.apply(Command::Act { player: player.into(), decision }).unwrap().state
}

#[test]
fn busted_player_sits_out_the_next_hand() {
    // deal order b, c, a: b gets aces, c gets seven-deuce
    let deck = stacked_deck("As 2c 3d Ah 7d 4s 8h Kd Qs 9c 6h 5s 4h Jh");
    let s = start_with(TableConfig::default(), &["a", "b", "c"], deck);
    let s = act(&s, "a", Decision::Fold);
    let s = act(&s, "b", Decision::AllIn);
    let t = s.apply(Command::Act { player: "c".into(), decision: Decision::CheckOrCall }).unwrap();
    assert!(t.effects.is_empty());
    let s = t.state;

    assert_eq!(s.step(), Step::Win);
    assert_eq!(s.board().len(), 5);
    assert_eq!(s.round_winners(), &[(PlayerId::from("b"), 2000)]);
    assert_eq!(s.chips_of(&"c".into()), Some(0));
    assert_eq!(s.remaining(), &[PlayerId::from("a"), PlayerId::from("b")]);
    // still seated, just out of the game
    assert!(s.roster().contains(&"c".into()));
    assert_eq!(s.dealer(), Some(&"a".into()));
    assert!(!s.is_game_over());

    let s = s.apply(Command::EndHand).unwrap().state;
    assert_eq!(s.dealer(), Some(&"b".into()));
    let s = s.apply(Command::NextHand { deck: Deck::standard() }).unwrap().state;
    assert_eq!(s.player_cards().len(), 2);
    assert!(s.hole_cards(&"c".into()).is_none());
    // heads-up: the dealer posts the small blind
    assert_eq!(s.bets()[0].player, PlayerId::from("b"));
    assert_eq!(s.bets()[0].kind, ActionKind::SmallBlind);
    assert_eq!(s.current_player(), Some("b".into()));
}

#[test]
fn short_stacks_post_blinds_all_in_and_run_out() {
    let config = TableConfig { starting_chips: 15, ..TableConfig::default() };
    let s = start_with(config, &["a", "b", "c"], Deck::standard());
    assert_eq!(s.bets()[1].kind, ActionKind::AllIn);
    assert_eq!(s.bets()[1].amount, 15);
    assert_eq!(s.skip_players(), vec![PlayerId::from("c")]);
    assert_eq!(s.current_player(), Some("a".into()));

    let s = act(&s, "a", Decision::CheckOrCall);
    assert_eq!(s.current_player(), Some("b".into()));
    let t = s.apply(Command::Act { player: "b".into(), decision: Decision::CheckOrCall }).unwrap();
    let s = t.state;
    assert_eq!(s.step(), Step::Win);
    assert_eq!(s.board().len(), 5);
    // a's seven of clubs makes the best flush on a four-club board
    assert_eq!(s.round_winners(), &[(PlayerId::from("a"), 45)]);
    assert!(s.is_game_over());
    assert_eq!(
        t.effects,
        vec![Effect::GameOver(vec![
            ("a".into(), Outcome::Won),
            ("b".into(), Outcome::Lost),
            ("c".into(), Outcome::Lost),
        ])]
    );
}

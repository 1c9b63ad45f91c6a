use holdem_engine::cards::{parse_cards, Card, Rank, Suit};
use holdem_engine::evaluator::{best_hand, classify, compare, Category, EvalError, Hand};
use holdem_engine::hand::{Board, HoleCards};
use std::cmp::Ordering;

fn eval(s: &str) -> Hand {
    classify(&parse_cards(s).expect("valid cards")).expect("classifiable")
}

#[test]
fn category_straight_flush() {
    let sf = [
        Card::new(Rank::Ace, Suit::Spades),
        Card::new(Rank::King, Suit::Spades),
        Card::new(Rank::Queen, Suit::Spades),
        Card::new(Rank::Jack, Suit::Spades),
        Card::new(Rank::Ten, Suit::Spades),
    ];
    let e = classify(&sf).unwrap();
    assert!(matches!(e.category, Category::StraightFlush));
    assert_eq!(e.value(1), Some(Rank::Ace));
    assert_eq!(e.value(2), None);
}

#[test]
fn category_four_of_a_kind() {
    let e = eval("9c 9d 9h 9s Ac");
    assert!(matches!(e.category, Category::FourOfAKind));
    assert_eq!(e.value(1), Some(Rank::Nine));
    assert_eq!(e.value(2), Some(Rank::Ace));
}

#[test]
fn category_full_house() {
    let e = eval("3c 3d 3h Js Jc");
    assert!(matches!(e.category, Category::FullHouse));
    assert_eq!((e.value(1), e.value(2)), (Some(Rank::Three), Some(Rank::Jack)));
}

#[test]
fn category_flush() {
    let e = eval("Kh Th 7h 4h 2h");
    assert!(matches!(e.category, Category::Flush));
    assert_eq!(e.value(5), Some(Rank::Two));
}

#[test]
fn category_straight() {
    let e = eval("9c 8d 7h 6s 5c");
    assert!(matches!(e.category, Category::Straight));
    assert_eq!(e.value(1), Some(Rank::Nine));
}

#[test]
fn category_three_of_a_kind() {
    let e = eval("7c 7d 7h Ks 2c");
    assert!(matches!(e.category, Category::ThreeOfAKind));
    assert_eq!(e.value(2), Some(Rank::King));
    assert_eq!(e.value(3), Some(Rank::Two));
}

#[test]
fn category_two_pair() {
    let e = eval("Qc Qd 4h 4s 9c");
    assert!(matches!(e.category, Category::TwoPair));
    assert_eq!(e.value(1), Some(Rank::Queen));
    assert_eq!(e.value(2), Some(Rank::Four));
    assert_eq!(e.value(3), Some(Rank::Nine));
}

#[test]
fn category_one_pair() {
    let e = eval("Ac Ad 8h 5s 3c");
    assert!(matches!(e.category, Category::OnePair));
    assert_eq!(e.value(4), Some(Rank::Three));
}

#[test]
fn category_high_card() {
    let e = eval("Ac Jd 8h 5s 3c");
    assert!(matches!(e.category, Category::HighCard));
    assert_eq!(e.value(1), Some(Rank::Ace));
}

#[test]
fn wheel_is_only_ace_high() {
    let e = eval("As 2d 3h 4s 5c");
    assert_eq!(e.category, Category::HighCard);
    let e = eval("As 2s 3s 4s 5s");
    assert_eq!(e.category, Category::Flush);
}

#[test]
fn six_high_is_the_lowest_straight() {
    let e = eval("As 2d 3h 4s 5c 6d Kc");
    assert_eq!(e.category, Category::Straight);
    assert_eq!(e.value(1), Some(Rank::Six));
}

#[test]
fn seven_cards_pick_the_best_five() {
    let e = eval("As Ah Ks Qs Js Ts 9s");
    assert_eq!(e.category, Category::StraightFlush);
    assert_eq!(e.value(1), Some(Rank::Ace));
    assert!(e.cards.iter().all(|c| c.suit() == Suit::Spades));

    let e = eval("Qs Qh Qd 8h 8s 8c 3d");
    assert_eq!(e.category, Category::FullHouse);
    assert_eq!((e.value(1), e.value(2)), (Some(Rank::Queen), Some(Rank::Eight)));
}

#[test]
fn straight_beats_trips_flush_beats_straight() {
    let straight = eval("9c 8d 7h 6s 5c");
    let trips = eval("Ac Ad Ah Ks Qc");
    let flush = eval("Kh Th 7h 4h 2h");
    assert_eq!(compare(&straight, &trips), Ordering::Less);
    assert_eq!(compare(&flush, &straight), Ordering::Less);
    assert!(flush.beats(&trips));
}

#[test]
fn kickers_break_ties_and_suits_do_not() {
    let a = eval("Ac Ad Kh 5s 3c");
    let b = eval("As Ah Qh 5d 3d");
    assert_eq!(compare(&a, &b), Ordering::Less);
    assert_eq!(compare(&b, &a), Ordering::Greater);

    let c = eval("Ah As Kd 5c 3h");
    assert_eq!(compare(&a, &c), Ordering::Equal);
}

#[test]
fn board_plays_for_everyone() {
    let board: Board = "Ts Js Qs Ks As".parse().unwrap();
    let a: HoleCards = "2c 3d".parse().unwrap();
    let b: HoleCards = "9s 8s".parse().unwrap();
    let ha = best_hand(&a, &board).unwrap();
    let hb = best_hand(&b, &board).unwrap();
    assert_eq!(compare(&ha, &hb), Ordering::Equal);
}

#[test]
fn invalid_inputs_are_errors() {
    let board: Board = "2c 5d 8h 9s Jc".parse().unwrap();
    let overlapping: HoleCards = "2c Kd".parse().unwrap();
    assert!(matches!(best_hand(&overlapping, &board), Err(EvalError::InvalidHand(_))));

    let dup = parse_cards("As As Kd Qc Jh").unwrap();
    assert_eq!(classify(&dup), Err(EvalError::DuplicateCard(Card::new(Rank::Ace, Suit::Spades))));
}

#[test]
fn display_names_category_and_cards() {
    let e = eval("As Ks Qs Js Ts");
    assert_eq!(e.to_string(), "Straight flush (As Ks Qs Js Ts)");
}

//! Seat and turn-order helpers.
//!
//! Seats are positions in the ordered `remaining` list. The speaking order starts
//! with the seat after the dealer and wraps around, so the dealer speaks last.

use crate::player::PlayerId;

/// Euclidean remainder that tolerates an empty ring: `modulo(x, 0) == 0`.
pub fn modulo(x: i64, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    x.rem_euclid(n as i64) as usize
}

/// Rotate `players` to start right after `dealer`, then drop anyone in `skip`.
///
/// ```
/// use holdem_engine::player::PlayerId;
/// use holdem_engine::seating::speaking_order;
///
/// let seats: Vec<PlayerId> = ["a", "b", "c"].map(PlayerId::from).to_vec();
/// let order = speaking_order(&seats, 0, &[]);
/// assert_eq!(order, ["b", "c", "a"].map(PlayerId::from).to_vec());
/// ```
pub fn speaking_order(players: &[PlayerId], dealer: usize, skip: &[PlayerId]) -> Vec<PlayerId> {
    let split = (dealer + 1).min(players.len());
    let (head, tail) = players.split_at(split);
    tail.iter().chain(head).filter(|id| !skip.contains(id)).cloned().collect()
}

/// Index of `id` in an order, if present.
pub fn position(order: &[PlayerId], id: &PlayerId) -> Option<usize> {
    order.iter().position(|p| p == id)
}

/// The seat after `dealer`, wrapping around `seats` players.
pub fn rotate_dealer(dealer: usize, seats: usize) -> usize {
    modulo(dealer as i64 + 1, seats)
}

/// Re-anchor the dealer after seats were removed.
///
/// Walks backwards from the old dealer (wrapping) to the nearest player who is still
/// seated, and returns that player's index in `after`.
pub fn reindex_dealer(before: &[PlayerId], dealer: usize, after: &[PlayerId]) -> usize {
    let n = before.len();
    (0..n)
        .filter_map(|back| {
            let seat = modulo(dealer as i64 - back as i64, n);
            position(after, &before[seat])
        })
        .next()
        .unwrap_or(0)
}

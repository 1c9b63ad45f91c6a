use crate::player::PlayerId;
use std::fmt;

/// Every entry kind that can appear in a hand's bet log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ActionKind {
    SmallBlind,
    BigBlind,
    Check,
    Call,
    Raise,
    AllIn,
    Fold,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::SmallBlind => "SB",
            ActionKind::BigBlind => "BB",
            ActionKind::Check => "Check",
            ActionKind::Call => "Call",
            ActionKind::Raise => "Raise",
            ActionKind::AllIn => "All-in",
            ActionKind::Fold => "Fold",
        }
    }

    /// Fold and all-in take a player out of the speaking order for the rest of the hand.
    pub fn is_skip(self) -> bool {
        matches!(self, ActionKind::Fold | ActionKind::AllIn)
    }

    pub fn is_forced(self) -> bool {
        matches!(self, ActionKind::SmallBlind | ActionKind::BigBlind)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The chips an action moves, before it is attributed to a player and a street.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub kind: ActionKind,
    pub amount: u64,
    /// Portion of `amount` above the amount needed to call.
    pub raise: u64,
}

/// One entry of the append-only bet log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bet {
    pub amount: u64,
    pub player: PlayerId,
    pub raise: u64,
    pub round: u8,
    pub kind: ActionKind,
}

impl Bet {
    pub fn new(player: PlayerId, action: Action, round: u8) -> Self {
        Self { amount: action.amount, player, raise: action.raise, round, kind: action.kind }
    }
}

/// What a player submits on their turn. The engine turns it into an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Decision {
    Fold,
    CheckOrCall,
    /// Raise by this many chips on top of the call amount.
    Raise(u64),
    AllIn,
}

/// Turn a call amount and a raise into the action a stack can actually afford.
///
/// The chips put in are capped by `stack`; whatever empties the stack is an all-in.
/// A `forced` kind (the blinds) is kept unless the stack runs out.
///
/// ```
/// use holdem_engine::action::{derive_action, Action, ActionKind};
///
/// let a = derive_action(0, 200, 200, None);
/// assert_eq!(a, Action { kind: ActionKind::AllIn, amount: 200, raise: 200 });
///
/// let call = derive_action(40, 0, 1000, None);
/// assert_eq!(call.kind, ActionKind::Call);
/// ```
pub fn derive_action(check: u64, raise: u64, stack: u64, forced: Option<ActionKind>) -> Action {
    if forced == Some(ActionKind::Fold) {
        return Action { kind: ActionKind::Fold, amount: 0, raise: 0 };
    }
    let amount = raise.saturating_add(check).min(stack);
    let kind = if amount == stack {
        ActionKind::AllIn
    } else if raise > 0 {
        ActionKind::Raise
    } else if check > 0 && !forced.is_some_and(ActionKind::is_forced) {
        ActionKind::Call
    } else {
        forced.unwrap_or(ActionKind::Check)
    };
    Action { kind, amount, raise: amount.saturating_sub(check) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_moves_nothing() {
        let a = derive_action(50, 100, 1000, Some(ActionKind::Fold));
        assert_eq!(a, Action { kind: ActionKind::Fold, amount: 0, raise: 0 });
    }

    #[test]
    fn check_call_raise() {
        assert_eq!(derive_action(0, 0, 500, None).kind, ActionKind::Check);
        assert_eq!(
            derive_action(20, 0, 500, None),
            Action { kind: ActionKind::Call, amount: 20, raise: 0 }
        );
        assert_eq!(
            derive_action(20, 40, 500, None),
            Action { kind: ActionKind::Raise, amount: 60, raise: 40 }
        );
    }

    #[test]
    fn short_stack_goes_all_in() {
        assert_eq!(
            derive_action(300, 0, 120, None),
            Action { kind: ActionKind::AllIn, amount: 120, raise: 0 }
        );
        assert_eq!(
            derive_action(20, 100, 80, None),
            Action { kind: ActionKind::AllIn, amount: 80, raise: 60 }
        );
    }

    #[test]
    fn blinds_keep_their_kind() {
        assert_eq!(
            derive_action(10, 0, 1000, Some(ActionKind::SmallBlind)),
            Action { kind: ActionKind::SmallBlind, amount: 10, raise: 0 }
        );
        assert_eq!(derive_action(20, 0, 20, Some(ActionKind::BigBlind)).kind, ActionKind::AllIn);
    }

    #[test]
    fn empty_stack_is_an_all_in_for_nothing() {
        assert_eq!(
            derive_action(0, 0, 0, None),
            Action { kind: ActionKind::AllIn, amount: 0, raise: 0 }
        );
    }

    #[test]
    fn skip_kinds() {
        assert!(ActionKind::Fold.is_skip());
        assert!(ActionKind::AllIn.is_skip());
        assert!(!ActionKind::Raise.is_skip());
        assert!(ActionKind::BigBlind.is_forced());
    }
}

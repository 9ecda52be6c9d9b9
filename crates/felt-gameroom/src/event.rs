use felt_cards::Hand;
use felt_cards::Hole;
use felt_cards::Street;
use felt_core::Chips;
use felt_core::Position;
use felt_gameplay::Action;
use felt_gameplay::Partial;

/// A fact about a hand, fanned out to seated players and appended to the
/// ledger. Hole cards only ever travel to the seat they belong to — every
/// other variant is broadcast-safe.
#[derive(Debug, Clone)]
pub enum Event {
    HandStart {
        hand: u64,
        dealer: Position,
        stacks: Vec<Chips>,
    },
    /// Private: sent only to the seat it belongs to.
    HoleCards {
        hand: u64,
        hole: Hole,
    },
    Board {
        hand: u64,
        street: Street,
        board: Hand,
    },
    Action {
        hand: u64,
        seat: Position,
        action: Action,
        pot: Chips,
    },
    /// Private: a prompt for `recall.hero()` to act.
    Decision {
        hand: u64,
        recall: Partial,
    },
    Reveal {
        hand: u64,
        seat: Position,
        hole: Option<Hole>,
    },
    HandEnd {
        hand: u64,
        winners: Vec<(Position, Chips)>,
        excess_seat: Option<Position>,
        excess_amount: Chips,
    },
    Disconnect(Position),
}

impl Event {
    /// Extracts the chosen action, if this is a player's response event.
    pub fn action(self) -> Option<Action> {
        match self {
            Self::Action { action, .. } => Some(action),
            _ => None,
        }
    }
    /// True for events that must never be broadcast to other seats.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::HoleCards { .. } | Self::Decision { .. })
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::HandStart { hand, dealer, .. } => {
                write!(f, "HandStart(hand={}, dealer=P{})", hand, dealer)
            }
            Self::HoleCards { hand, .. } => write!(f, "HoleCards(hand={})", hand),
            Self::Board { hand, street, board } => {
                write!(f, "Board(hand={}, {}, {})", hand, street, board)
            }
            Self::Action {
                hand, seat, action, ..
            } => write!(f, "Action(hand={}, P{}, {})", hand, seat, action),
            Self::Decision { hand, recall } => {
                write!(f, "Decision(hand={}, P{})", hand, recall.hero())
            }
            Self::Reveal { hand, seat, hole } => match hole {
                Some(h) => write!(f, "Reveal(hand={}, P{}, {})", hand, seat, h),
                None => write!(f, "Reveal(hand={}, P{}, mucked)", hand, seat),
            },
            Self::HandEnd { hand, winners, .. } => write!(f, "HandEnd(hand={}, {:?})", hand, winners),
            Self::Disconnect(pos) => write!(f, "Disconnect(P{})", pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hole_cards_and_decisions_are_private() {
        assert!(Event::HoleCards {
            hand: 0,
            hole: Hole::hidden()
        }
        .is_private());
        assert!(!Event::HandEnd {
            hand: 0,
            winners: vec![],
            excess_seat: None,
            excess_amount: 0,
        }
        .is_private());
    }

    #[test]
    fn action_extracts_only_from_action_variant() {
        let event = Event::Action {
            hand: 0,
            seat: 0,
            action: Action::Check,
            pot: 10,
        };
        assert_eq!(event.action(), Some(Action::Check));
        assert_eq!(Event::Disconnect(0).action(), None);
    }
}

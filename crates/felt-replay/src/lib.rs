//! Deterministic HandSpec -> ReplayTape builder.
//!
//! Drives a [`felt_gameplay::Game`] through a scripted
//! [`felt_dto::HandSpec`], producing the exact envelope sequence a live
//! table would have broadcast for that hand.

mod builder;
mod deck;
mod normalize;

pub use normalize::{NormalizedSeat, NormalizedSpec};

use felt_dto::HandSpec;
use felt_dto::ReplayError;
use felt_dto::ReplayTape;

/// Replays a single hand from its full starting condition and scripted
/// actions, returning the resulting tape or the first error encountered.
pub fn replay(spec: &HandSpec, table_id: uuid::Uuid) -> Result<ReplayTape, ReplayError> {
    builder::build(spec, table_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_dto::ActionSpec;
    use felt_dto::SeatSpec;

    fn seat(chair: usize, stack: i16, hole: Option<[&str; 2]>) -> SeatSpec {
        SeatSpec {
            chair,
            user_id: None,
            name: None,
            stack,
            is_hero: (chair == 0).then_some(true),
            hole: hole.map(|[a, b]| [a.to_string(), b.to_string()]),
        }
    }

    /// Heads-up hand scripted straight through to a river fold, checking the
    /// tape shape rather than exact chip bookkeeping (covered in
    /// `felt-gameplay`).
    #[test]
    fn heads_up_fold_produces_win_by_fold() {
        let spec = HandSpec {
            variant: "NLH".into(),
            table: None,
            dealer_chair: 0,
            seats: vec![
                seat(0, 100, Some(["As", "Ks"])),
                seat(1, 100, Some(["2c", "7d"])),
            ],
            board: None,
            deck: None,
            actions: vec![ActionSpec {
                phase: "PREFLOP".into(),
                chair: 0,
                kind: "FOLD".into(),
                amount_to: 0,
            }],
            rng: Some(felt_dto::RngSpec { seed: 7 }),
        };
        let tape = replay(&spec, uuid::Uuid::nil()).expect("valid script");
        assert_eq!(tape.hero_chair, 0);
        let kinds: Vec<&str> = tape.events.iter().map(|e| e.kind.as_str()).collect();
        assert!(kinds.contains(&"HandStart"));
        assert!(kinds.contains(&"WinByFold"));
        assert!(kinds.contains(&"HandEnd"));
        assert!(!kinds.contains(&"Showdown"));
        assert!(kinds.contains(&"PotUpdate"));
        let pot_update = tape
            .events
            .iter()
            .find(|e| e.kind == "PotUpdate")
            .expect("one PotUpdate per applied action");
        match &pot_update.envelope {
            felt_dto::ServerEnvelope::PotUpdate { pots, .. } => {
                assert_eq!(pots.len(), 1);
                assert!(pots[0].winners.is_empty(), "mid-hand pots have no resolved winner yet");
            }
            other => panic!("expected PotUpdate envelope, got {:?}", other),
        }
    }

    #[test]
    fn out_of_turn_action_is_rejected() {
        let spec = HandSpec {
            variant: "NLH".into(),
            table: None,
            dealer_chair: 0,
            seats: vec![seat(0, 100, None), seat(1, 100, None)],
            board: None,
            deck: None,
            actions: vec![ActionSpec {
                phase: "PREFLOP".into(),
                chair: 1,
                kind: "CALL".into(),
                amount_to: 2,
            }],
            rng: None,
        };
        let err = replay(&spec, uuid::Uuid::nil()).expect_err("chair 1 can't act first heads-up");
        assert_eq!(err.reason, felt_dto::ReplayErrorReason::OutOfTurn);
    }
}

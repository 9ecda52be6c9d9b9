use crate::deck;
use crate::normalize::NormalizedSpec;
use crate::normalize::{self};
use felt_cards::Card;
use felt_cards::Hand as CardSet;
use felt_cards::Hole;
use felt_cards::Street;
use felt_cards::Strength;
use felt_core::Chips;
use felt_core::Position;
use felt_dto::ExpectedState;
use felt_dto::HandResult;
use felt_dto::HandSpec;
use felt_dto::PotResult;
use felt_dto::ReplayError;
use felt_dto::ReplayErrorReason as Reason;
use felt_dto::ReplayTape;
use felt_dto::ServerEnvelope;
use felt_dto::TapeEvent;
use felt_gameplay::Action;
use felt_gameplay::Game;
use felt_gameplay::State;
use felt_gameplay::Turn;
use std::collections::BTreeMap;

fn street_str(street: Street) -> String {
    match street {
        Street::Pref => "PREFLOP",
        Street::Flop => "FLOP",
        Street::Turn => "TURN",
        Street::Rive => "RIVER",
    }
    .to_string()
}

fn parse_phase(s: &str) -> Option<Street> {
    match s.to_uppercase().as_str() {
        "PREFLOP" => Some(Street::Pref),
        "FLOP" => Some(Street::Flop),
        "TURN" => Some(Street::Turn),
        "RIVER" => Some(Street::Rive),
        _ => None,
    }
}

/// Maps a scripted action onto the engine's delta-based [`Action`]. Every
/// chip amount in a `HandSpec` is a target total-this-street ("amountTo"),
/// matching the live server's own CALL normalization; the delta actually
/// applied is `amountTo - actor's current stake`.
fn parse_action(kind: &str, amount_to: Chips, game: &Game) -> Option<Action> {
    let delta = amount_to.saturating_sub(game.actor().stake());
    match kind.to_uppercase().as_str() {
        "CHECK" => Some(Action::Check),
        "FOLD" => Some(Action::Fold),
        "CALL" => Some(Action::Call(delta)),
        "RAISE" | "BET" => Some(Action::Raise(delta)),
        "SHOVE" | "ALLIN" | "ALL_IN" => Some(Action::Shove(delta)),
        _ => None,
    }
}

struct Builder<'a> {
    normalized: &'a NormalizedSpec,
    table_id: uuid::Uuid,
    seq: u64,
    events: Vec<TapeEvent>,
}

impl<'a> Builder<'a> {
    fn header(&self) -> felt_dto::EnvelopeHeader {
        felt_dto::EnvelopeHeader {
            table_id: self.table_id,
            server_seq: self.seq,
            server_ts_ms: self.seq as i64,
        }
    }
    fn push(&mut self, kind: &str, envelope: ServerEnvelope) {
        self.seq += 1;
        let header = felt_dto::EnvelopeHeader {
            table_id: self.table_id,
            server_seq: self.seq,
            server_ts_ms: self.seq as i64,
        };
        let envelope = stamp(envelope, header);
        let envelope_b64 = serde_json::to_string(&envelope).unwrap_or_default();
        self.events.push(TapeEvent {
            kind: kind.to_string(),
            seq: self.seq,
            envelope,
            envelope_b64,
        });
    }
    fn expected(&self, game: &Game) -> ExpectedState {
        let phase = Some(street_str(game.street()));
        match game.turn() {
            Turn::Choice(pos) => ExpectedState {
                action_chair: Some(self.normalized.pos_to_chair(pos)),
                legal_actions: game.legal().iter().map(|a| a.label().to_uppercase()).collect(),
                min_raise_to: game.may_raise().then(|| game.actor().stake() + game.to_raise()),
                call_amount: (game.may_call() || game.may_fold()).then(|| game.actor().stake() + game.to_call()),
                phase,
            },
            _ => ExpectedState {
                action_chair: None,
                legal_actions: vec![],
                min_raise_to: None,
                call_amount: None,
                phase,
            },
        }
    }
    /// Drains every chance node (board reveal) using the precomputed board,
    /// emitting `DealBoard` + `PhaseChange` for each street that opens up.
    fn drain_chance(&mut self, game: &mut Game, board: &[Card; 5]) {
        while matches!(game.turn(), Turn::Chance) {
            let street = game.street().next();
            let cards: Vec<Card> = match street {
                Street::Flop => board[0..3].to_vec(),
                Street::Turn => vec![board[3]],
                Street::Rive => vec![board[4]],
                Street::Pref => Vec::new(),
            };
            let hand = cards.iter().fold(CardSet::empty(), |acc, &c| CardSet::add(acc, CardSet::from(c)));
            *game = game.apply(Action::Draw(hand));
            self.push(
                "DealBoard",
                ServerEnvelope::DealBoard {
                    header: self.header(),
                    street: street_str(street),
                    cards: cards.iter().map(|c| c.to_string()).collect(),
                },
            );
            let (river_rank, river_score) = if street == Street::Rive {
                let strength = Strength::from(CardSet::add(
                    CardSet::from(game.seats()[self.normalized.hero_pos].cards()),
                    CardSet::from(game.board()),
                ));
                (Some(strength.ranking().to_string()), Some(strength.ranking() as i32))
            } else {
                (None, None)
            };
            self.push(
                "PhaseChange",
                ServerEnvelope::PhaseChange {
                    header: self.header(),
                    phase: street_str(street),
                    river_rank,
                    river_score,
                },
            );
        }
    }
}

fn stamp(envelope: ServerEnvelope, header: felt_dto::EnvelopeHeader) -> ServerEnvelope {
    use ServerEnvelope::*;
    match envelope {
        TableSnapshot { seats, board, pot, dealer_chair, .. } => {
            TableSnapshot { header, seats, board, pot, dealer_chair }
        }
        SeatUpdate { seat, .. } => SeatUpdate { header, seat },
        HandStart { hand_id, dealer_chair, stacks, .. } => HandStart { header, hand_id, dealer_chair, stacks },
        DealHoleCards { chair, hole, .. } => DealHoleCards { header, chair, hole },
        ActionPrompt { expected, .. } => ActionPrompt { header, expected },
        ActionResult { chair, action, amount_to, stack, current_bet, pot, .. } => {
            ActionResult { header, chair, action, amount_to, stack, current_bet, pot }
        }
        DealBoard { street, cards, .. } => DealBoard { header, street, cards },
        PotUpdate { pots, .. } => PotUpdate { header, pots },
        PhaseChange { phase, river_rank, river_score, .. } => PhaseChange { header, phase, river_rank, river_score },
        WinByFold { winner_chair, amount, .. } => WinByFold { header, winner_chair, amount },
        Showdown { results, .. } => Showdown { header, results },
        HandEnd { pot_results, player_results, excess_chair, excess_amount, .. } => {
            HandEnd { header, pot_results, player_results, excess_chair, excess_amount }
        }
        Error { reason, message, expected, .. } => Error { header, reason, message, expected },
        LoginResponse { user_id, token, .. } => LoginResponse { header, user_id, token },
        StoryProgress { chapter, complete, .. } => StoryProgress { header, chapter, complete },
    }
}

fn hand_results(game: &Game, normalized: &NormalizedSpec, reveal: bool) -> Vec<HandResult> {
    (0..game.n())
        .map(|pos| {
            let seat = &game.seats()[pos];
            let folded = seat.state() == State::Folding;
            let settlement = &game.settlements()[pos];
            let show = reveal && !folded;
            let (hand_type, hand_score, hand_cards) = if show {
                let combined = CardSet::add(CardSet::from(seat.cards()), CardSet::from(game.board()));
                let strength = Strength::from(combined);
                (
                    strength.ranking().to_string(),
                    strength.ranking() as i32,
                    combined.map(|c| c.to_string()).collect::<Vec<_>>(),
                )
            } else {
                ("mucked".to_string(), 0, Vec::new())
            };
            HandResult {
                chair: normalized.pos_to_chair(pos),
                hand_type: hand_type.clone(),
                hand_score,
                hand_cards: hand_cards.clone(),
                best_five: hand_cards,
                is_winner: settlement.won() > 0,
                win_amount: settlement.pnl().reward().max(0),
                showed: show,
                mucked: !show,
            }
        })
        .collect()
}

/// Drives the engine from a validated `HandSpec`, emitting the same
/// envelope sequence a live table would and stopping at the first
/// normalization or execution failure.
pub fn build(spec: &HandSpec, table_id: uuid::Uuid) -> Result<ReplayTape, ReplayError> {
    let normalized = normalize::normalize(spec)?;
    let slots = deck::resolve(&normalized);
    let n = normalized.seats.len();

    let holes: Vec<Hole> = (0..n).map(|i| Hole::from((slots[i], slots[n + i]))).collect();
    let stacks: Vec<Chips> = normalized.seats.iter().map(|s| s.stack).collect();
    let board: [Card; 5] = [slots[2 * n], slots[2 * n + 1], slots[2 * n + 2], slots[2 * n + 3], slots[2 * n + 4]];

    let mut game = Game::spec(&holes, &stacks, normalized.dealer_pos);

    let mut b = Builder { normalized: &normalized, table_id, seq: 0, events: Vec::new() };

    let stacks_by_chair: BTreeMap<Position, Chips> =
        normalized.seats.iter().map(|s| (s.chair, s.stack)).collect();
    b.push(
        "HandStart",
        ServerEnvelope::HandStart {
            header: b.header(),
            hand_id: table_id.to_string(),
            dealer_chair: normalized.pos_to_chair(normalized.dealer_pos),
            stacks: stacks_by_chair,
        },
    );
    b.push(
        "DealHoleCards",
        ServerEnvelope::DealHoleCards {
            header: b.header(),
            chair: normalized.pos_to_chair(normalized.hero_pos),
            hole: [slots[normalized.hero_pos].to_string(), slots[n + normalized.hero_pos].to_string()],
        },
    );
    let expected = b.expected(&game);
    b.push("ActionPrompt", ServerEnvelope::ActionPrompt { header: b.header(), expected });

    for (step_index, action_spec) in spec.actions.iter().enumerate() {
        b.drain_chance(&mut game, &board);

        let pos = match game.turn() {
            Turn::Choice(pos) => pos,
            Turn::Terminal => {
                return Err(ReplayError::at_step(step_index, Reason::NoActionExpected, "hand already complete", None));
            }
            Turn::Chance => unreachable!("drained above"),
        };
        let expected_chair = normalized.pos_to_chair(pos);
        if expected_chair != action_spec.chair {
            return Err(ReplayError::at_step(
                step_index,
                Reason::OutOfTurn,
                format!("expected chair {} to act, got {}", expected_chair, action_spec.chair),
                Some(b.expected(&game)),
            ));
        }
        let phase = parse_phase(&action_spec.phase).ok_or_else(|| {
            ReplayError::at_step(step_index, Reason::InvalidPhase, format!("unknown phase {:?}", action_spec.phase), None)
        })?;
        if phase != game.street() {
            return Err(ReplayError::at_step(
                step_index,
                Reason::PhaseMismatch,
                format!("action targets {:?} but engine is on {:?}", phase, game.street()),
                Some(b.expected(&game)),
            ));
        }
        let action = parse_action(&action_spec.kind, action_spec.amount_to, &game).ok_or_else(|| {
            ReplayError::at_step(step_index, Reason::InvalidAction, format!("unknown action type {:?}", action_spec.kind), None)
        })?;
        if !game.is_allowed(&action) {
            return Err(ReplayError::at_step(
                step_index,
                Reason::IllegalAction,
                format!("{:?} is not legal for chair {}", action, action_spec.chair),
                Some(b.expected(&game)),
            ));
        }
        game = game.try_apply(action).map_err(|e| {
            ReplayError::at_step(step_index, Reason::ActionApplyFailed, e.to_string(), None)
        })?;

        let acting_seat = &game.seats()[pos];
        b.push(
            "ActionResult",
            ServerEnvelope::ActionResult {
                header: b.header(),
                chair: action_spec.chair,
                action: action.label().to_uppercase(),
                amount_to: acting_seat.stake(),
                stack: acting_seat.stack(),
                current_bet: acting_seat.stake(),
                pot: game.pot(),
            },
        );

        b.push(
            "PotUpdate",
            ServerEnvelope::PotUpdate {
                header: b.header(),
                pots: vec![PotResult { amount: game.pot(), winners: vec![], win_amounts: vec![] }],
            },
        );

        b.drain_chance(&mut game, &board);

        if matches!(game.turn(), Turn::Terminal) {
            let is_showdown = game.is_showdown();
            if is_showdown {
                b.push("PhaseChange", ServerEnvelope::PhaseChange {
                    header: b.header(),
                    phase: "SHOWDOWN".to_string(),
                    river_rank: None,
                    river_score: None,
                });
                let results = hand_results(&game, &normalized, true);
                b.push("Showdown", ServerEnvelope::Showdown { header: b.header(), results });
            } else {
                let settlements = game.settlements();
                let (winner_pos, winner_settlement) = settlements
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, s)| s.pnl().reward())
                    .expect("non-empty seats");
                b.push("WinByFold", ServerEnvelope::WinByFold {
                    header: b.header(),
                    winner_chair: normalized.pos_to_chair(winner_pos),
                    amount: winner_settlement.pnl().reward(),
                });
            }
            let player_results = hand_results(&game, &normalized, is_showdown);
            let total: Chips = player_results.iter().map(|r| r.win_amount).sum();
            let winners: Vec<Position> = player_results.iter().filter(|r| r.is_winner).map(|r| r.chair).collect();
            let win_amounts: Vec<Chips> = player_results.iter().filter(|r| r.is_winner).map(|r| r.win_amount).collect();
            let (excess_pos, excess_amount) = game.excess();
            let excess_chair = excess_pos.map(|pos| normalized.pos_to_chair(pos));
            b.push(
                "HandEnd",
                ServerEnvelope::HandEnd {
                    header: b.header(),
                    pot_results: vec![PotResult { amount: total, winners, win_amounts }],
                    player_results,
                    excess_chair,
                    excess_amount,
                },
            );
            break;
        } else {
            let expected = b.expected(&game);
            b.push("ActionPrompt", ServerEnvelope::ActionPrompt { header: b.header(), expected });
        }
    }

    Ok(ReplayTape { tape_version: ReplayTape::VERSION, table_id, hero_chair: normalized.pos_to_chair(normalized.hero_pos), events: b.events })
}

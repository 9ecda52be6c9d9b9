use felt_cards::Card;
use felt_cards::Hand as CardSet;
use felt_cards::Hole;
use felt_core::Chips;
use felt_core::Position;
use felt_dto::HandSpec;
use felt_dto::ReplayError;
use felt_dto::ReplayErrorReason as Reason;

/// One seat after defaulting and chair-to-position remapping. Table
/// positions are assigned by sorting active chairs ascending — `Game`
/// itself only understands contiguous `0..n` positions, while a `HandSpec`
/// addresses seats by arbitrary table chair numbers.
#[derive(Debug, Clone)]
pub struct NormalizedSeat {
    pub chair: Position,
    pub user_id: String,
    pub name: String,
    pub stack: Chips,
    pub hole: Option<Hole>,
}

/// A validated, defaulted `HandSpec` ready to drive the engine.
#[derive(Debug, Clone)]
pub struct NormalizedSpec {
    pub seats: Vec<NormalizedSeat>,
    pub dealer_pos: Position,
    pub hero_pos: Position,
    /// Dealing-order card constraints: two rounds of hole cards (SB-first),
    /// then flop (3), turn (1), river (1). `None` means "deal from deck".
    pub slot_constraints: Vec<Option<Card>>,
    pub deck: Option<Vec<Card>>,
    pub seed: u64,
}

impl NormalizedSpec {
    pub fn chair_to_pos(&self, chair: Position) -> Option<Position> {
        self.seats.iter().position(|s| s.chair == chair)
    }
    pub fn pos_to_chair(&self, pos: Position) -> Position {
        self.seats[pos].chair
    }
}

fn parse_card(s: &str) -> Option<Card> {
    Card::try_from(s).ok()
}

/// Runs the pre-execution validation and defaulting pass described for the
/// replay engine: variant/seat/blind/dealer shape checks, card parsing and
/// dedup, and userID/name/hero defaulting.
pub fn normalize(spec: &HandSpec) -> Result<NormalizedSpec, ReplayError> {
    if spec.variant != "NLH" {
        return Err(ReplayError::pre_execution(
            Reason::InvalidVariant,
            format!("unsupported variant {:?}", spec.variant),
        ));
    }
    let max_players = spec.seats.len();
    if max_players == 0 {
        return Err(ReplayError::pre_execution(Reason::InvalidSeats, "no seats given"));
    }
    if spec.dealer_chair >= max_players {
        return Err(ReplayError::pre_execution(
            Reason::InvalidDealer,
            format!("dealerChair {} out of range for {} seats", spec.dealer_chair, max_players),
        ));
    }

    let mut chairs_seen = std::collections::HashSet::new();
    for seat in &spec.seats {
        if !chairs_seen.insert(seat.chair) {
            return Err(ReplayError::pre_execution(
                Reason::DuplicateChair,
                format!("chair {} appears more than once", seat.chair),
            ));
        }
        if seat.stack <= 0 {
            return Err(ReplayError::pre_execution(
                Reason::InvalidStack,
                format!("chair {} has non-positive stack {}", seat.chair, seat.stack),
            ));
        }
    }
    if spec.seats.len() < 2 {
        return Err(ReplayError::pre_execution(
            Reason::NotEnoughPlayers,
            "at least two active seats are required",
        ));
    }
    let hero_flags = spec.seats.iter().filter(|s| s.is_hero.unwrap_or(false)).count();
    if hero_flags > 1 {
        return Err(ReplayError::pre_execution(Reason::InvalidHero, "more than one seat flagged isHero"));
    }

    let mut seen_cards = CardSet::empty();
    let mut dup = |c: Card, seen: &mut CardSet| -> Result<(), ReplayError> {
        if seen.contains(&c) {
            return Err(ReplayError::pre_execution(
                Reason::DuplicateCards,
                format!("card {} specified more than once", c),
            ));
        }
        *seen = CardSet::add(*seen, CardSet::from(c));
        Ok(())
    };

    let mut ordered: Vec<_> = spec.seats.iter().collect();
    ordered.sort_by_key(|s| s.chair);

    let mut seats = Vec::with_capacity(ordered.len());
    let mut hole_constraints: Vec<(Option<Card>, Option<Card>)> = Vec::with_capacity(ordered.len());
    for seat in &ordered {
        let hole = match &seat.hole {
            Some([a, b]) => {
                let ca = parse_card(a).ok_or_else(|| {
                    ReplayError::pre_execution(Reason::InvalidHoleCards, format!("bad hole card {:?}", a))
                })?;
                let cb = parse_card(b).ok_or_else(|| {
                    ReplayError::pre_execution(Reason::InvalidHoleCards, format!("bad hole card {:?}", b))
                })?;
                dup(ca, &mut seen_cards)?;
                dup(cb, &mut seen_cards)?;
                hole_constraints.push((Some(ca), Some(cb)));
                Some(Hole::from((ca, cb)))
            }
            None => {
                hole_constraints.push((None, None));
                None
            }
        };
        seats.push(NormalizedSeat {
            chair: seat.chair,
            user_id: seat.user_id.clone().unwrap_or_else(|| (100_000 + seat.chair).to_string()),
            name: seat.name.clone().unwrap_or_else(|| format!("P{}", seat.chair)),
            stack: seat.stack,
            hole,
        });
    }

    let dealer_pos = seats
        .iter()
        .position(|s| s.chair == spec.dealer_chair)
        .ok_or_else(|| ReplayError::pre_execution(Reason::InvalidDealer, "dealerChair is not an active seat"))?;

    let hero_chair = spec
        .seats
        .iter()
        .find(|s| s.is_hero.unwrap_or(false))
        .map(|s| s.chair)
        .unwrap_or_else(|| seats.iter().map(|s| s.chair).min().expect("non-empty"));
    let hero_pos = seats
        .iter()
        .position(|s| s.chair == hero_chair)
        .ok_or_else(|| ReplayError::pre_execution(Reason::InvalidHero, "heroChair is not an active seat"))?;

    let mut board_constraints = [None, None, None, None, None];
    if let Some(board) = &spec.board {
        if let Some(flop) = &board.flop {
            for (i, s) in flop.iter().enumerate() {
                let c = parse_card(s)
                    .ok_or_else(|| ReplayError::pre_execution(Reason::InvalidBoard, format!("bad flop card {:?}", s)))?;
                dup(c, &mut seen_cards)?;
                board_constraints[i] = Some(c);
            }
        }
        if let Some(turn) = &board.turn {
            let c = parse_card(turn)
                .ok_or_else(|| ReplayError::pre_execution(Reason::InvalidBoard, format!("bad turn card {:?}", turn)))?;
            dup(c, &mut seen_cards)?;
            board_constraints[3] = Some(c);
        }
        if let Some(river) = &board.river {
            let c = parse_card(river)
                .ok_or_else(|| ReplayError::pre_execution(Reason::InvalidBoard, format!("bad river card {:?}", river)))?;
            dup(c, &mut seen_cards)?;
            board_constraints[4] = Some(c);
        }
    }

    // Dealing order: SB-first, round 1 (one hole card per seat), round 2,
    // then flop/turn/river.
    let mut slot_constraints = Vec::with_capacity(seats.len() * 2 + 5);
    for (a, _) in &hole_constraints {
        slot_constraints.push(*a);
    }
    for (_, b) in &hole_constraints {
        slot_constraints.push(*b);
    }
    slot_constraints.extend(board_constraints);

    let deck = match &spec.deck {
        Some(cards) => {
            let mut parsed = Vec::with_capacity(cards.len());
            let mut full = CardSet::empty();
            for s in cards {
                let c = parse_card(s)
                    .ok_or_else(|| ReplayError::pre_execution(Reason::InvalidDeck, format!("bad deck card {:?}", s)))?;
                if full.contains(&c) {
                    return Err(ReplayError::pre_execution(
                        Reason::InvalidDeck,
                        format!("deck repeats card {}", c),
                    ));
                }
                full = CardSet::add(full, CardSet::from(c));
                parsed.push(c);
            }
            if parsed.len() != 52 {
                return Err(ReplayError::pre_execution(
                    Reason::InvalidDeck,
                    format!("deck has {} cards, expected 52", parsed.len()),
                ));
            }
            for (i, want) in slot_constraints.iter().enumerate() {
                if let Some(want_card) = want {
                    if parsed[i] != *want_card {
                        return Err(ReplayError::pre_execution(
                            Reason::DeckConstraintMismatch,
                            format!("deck slot {} is {} but a constraint requires {}", i, parsed[i], want_card),
                        ));
                    }
                }
            }
            Some(parsed)
        }
        None => None,
    };

    Ok(NormalizedSpec {
        seats,
        dealer_pos,
        hero_pos,
        slot_constraints,
        deck,
        seed: spec.rng.map(|r| r.seed).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_dto::SeatSpec;

    fn seat(chair: Position, stack: Chips) -> SeatSpec {
        SeatSpec {
            chair,
            user_id: None,
            name: None,
            stack,
            is_hero: None,
            hole: None,
        }
    }

    #[test]
    fn defaults_user_id_and_name_from_chair() {
        let spec = HandSpec {
            variant: "NLH".into(),
            table: None,
            dealer_chair: 0,
            seats: vec![seat(0, 100), seat(2, 100)],
            board: None,
            deck: None,
            actions: vec![],
            rng: None,
        };
        let normalized = normalize(&spec).unwrap();
        assert_eq!(normalized.seats[1].chair, 2);
        assert_eq!(normalized.seats[1].user_id, "100002");
        assert_eq!(normalized.seats[1].name, "P2");
        assert_eq!(normalized.hero_pos, 0); // smallest active chair when none flagged
    }

    #[test]
    fn rejects_dealer_chair_with_no_matching_seat() {
        let spec = HandSpec {
            variant: "NLH".into(),
            table: None,
            dealer_chair: 1,
            seats: vec![seat(0, 100), seat(2, 100)],
            board: None,
            deck: None,
            actions: vec![],
            rng: None,
        };
        assert!(normalize(&spec).is_err());
    }

    #[test]
    fn rejects_duplicate_chairs() {
        let spec = HandSpec {
            variant: "NLH".into(),
            table: None,
            dealer_chair: 0,
            seats: vec![seat(0, 100), seat(0, 100)],
            board: None,
            deck: None,
            actions: vec![],
            rng: None,
        };
        assert!(normalize(&spec).is_err());
    }
}

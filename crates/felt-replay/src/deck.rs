use crate::normalize::NormalizedSpec;
use felt_cards::Card;
use felt_cards::Hand as CardSet;
use rand::SeedableRng;
use rand::seq::SliceRandom;

/// Resolves the dealing-order card sequence for a normalized spec: the
/// caller-provided deck if one was given (already validated against slot
/// constraints during normalization), or a fresh seeded shuffle of the
/// canonical 52-card ordering with constrained cards interleaved back at
/// their slots.
pub fn resolve(spec: &NormalizedSpec) -> Vec<Card> {
    if let Some(deck) = &spec.deck {
        return deck[..spec.slot_constraints.len()].to_vec();
    }
    let constrained = spec
        .slot_constraints
        .iter()
        .flatten()
        .fold(CardSet::empty(), |acc, &c| CardSet::add(acc, CardSet::from(c)));
    let full = CardSet::from(CardSet::mask());
    let mut pool: Vec<Card> = CardSet::diff(full, constrained).collect();
    if spec.seed != 0 {
        let mut rng = rand::rngs::StdRng::seed_from_u64(spec.seed);
        pool.shuffle(&mut rng);
    }
    let mut pool = pool.into_iter();
    spec.slot_constraints
        .iter()
        .map(|slot| slot.unwrap_or_else(|| pool.next().expect("pool covers every unconstrained slot")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedSeat;

    fn spec_with(seed: u64, slots: Vec<Option<Card>>) -> NormalizedSpec {
        NormalizedSpec {
            seats: vec![
                NormalizedSeat { chair: 0, user_id: "1".into(), name: "P0".into(), stack: 100, hole: None },
                NormalizedSeat { chair: 1, user_id: "2".into(), name: "P1".into(), stack: 100, hole: None },
            ],
            dealer_pos: 0,
            hero_pos: 0,
            slot_constraints: slots,
            deck: None,
            seed,
        }
    }

    #[test]
    fn same_seed_yields_same_deck() {
        let slots = vec![None; 9];
        let a = resolve(&spec_with(42, slots.clone()));
        let b = resolve(&spec_with(42, slots));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_seed_keeps_canonical_order() {
        let slots = vec![None; 9];
        let deck = resolve(&spec_with(0, slots));
        let mut sorted = deck.clone();
        sorted.sort();
        assert_eq!(deck, sorted);
    }

    #[test]
    fn constrained_slots_are_preserved() {
        let ace = Card::try_from("As").unwrap();
        let mut slots = vec![None; 9];
        slots[4] = Some(ace);
        let deck = resolve(&spec_with(7, slots));
        assert_eq!(deck[4], ace);
        assert_eq!(deck.len(), 9);
    }
}

use super::card::Card;
use super::hand::Hand;
use super::ranking::Ranking;
use super::strength::Strength;

/// Evaluates the best five-card [`Strength`] obtainable from a hand of five
/// to seven cards (hole cards plus however much of the board is visible).
///
/// Brute forces every 5-card subset (at most C(7,5) = 21) and keeps the max.
/// A lookup-table evaluator would be faster, but this runs once per seat per
/// showdown rather than billions of times in a training loop, so clarity
/// wins.
pub fn evaluate(hand: Hand) -> Strength {
    let cards: Vec<Card> = hand.into_iter().collect();
    debug_assert!(cards.len() >= 5, "need at least 5 cards to evaluate");
    combinations(&cards, 5)
        .into_iter()
        .map(|five| evaluate_five(&five))
        .max()
        .expect("at least one 5-card combination exists")
}

fn combinations(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    if k == 0 {
        return vec![vec![]];
    }
    if cards.len() < k {
        return vec![];
    }
    let mut out = Vec::new();
    for i in 0..=cards.len() - k {
        for mut rest in combinations(&cards[i + 1..], k - 1) {
            rest.insert(0, cards[i]);
            out.push(rest);
        }
    }
    out
}

fn evaluate_five(cards: &[Card]) -> Strength {
    debug_assert_eq!(cards.len(), 5);

    let mut rank_counts = [0u8; 13];
    let mut suit_counts = [0u8; 4];
    let mut rank_mask = 0u16;
    for card in cards {
        let r = card.rank().index() as usize;
        rank_counts[r] += 1;
        rank_mask |= 1 << r;
        suit_counts[u8::from(card.suit()) as usize] += 1;
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight_high = straight_high(rank_mask);

    let mut groups: Vec<(u8, u8)> = (0u8..13)
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let ranking = if is_flush && straight_high.is_some() {
        Ranking::StraightFlush
    } else if groups[0].0 == 4 {
        Ranking::FourOfAKind
    } else if groups[0].0 == 3 && groups.len() > 1 && groups[1].0 >= 2 {
        Ranking::FullHouse
    } else if is_flush {
        Ranking::Flush
    } else if straight_high.is_some() {
        Ranking::Straight
    } else if groups[0].0 == 3 {
        Ranking::ThreeOfAKind
    } else if groups[0].0 == 2 && groups.len() > 1 && groups[1].0 == 2 {
        Ranking::TwoPair
    } else if groups[0].0 == 2 {
        Ranking::OnePair
    } else {
        Ranking::HighCard
    };

    let kickers = match ranking {
        Ranking::Straight | Ranking::StraightFlush => {
            let high = straight_high.expect("straight ranking implies a straight high card");
            [high, 0, 0, 0, 0]
        }
        _ => {
            let mut flat = Vec::with_capacity(5);
            for (count, rank) in &groups {
                for _ in 0..*count {
                    flat.push(*rank);
                }
            }
            flat.resize(5, 0);
            [flat[0], flat[1], flat[2], flat[3], flat[4]]
        }
    };

    Strength::new(ranking, kickers)
}

/// Index of the highest card in the best 5-consecutive-rank run, if any.
/// Ranks are indexed `0..13` for Two through Ace; the wheel (A-2-3-4-5)
/// reports a high of `3` (the Five).
fn straight_high(rank_mask: u16) -> Option<u8> {
    for low in (0u8..=8).rev() {
        let needed = 0b11111u16 << low;
        if rank_mask & needed == needed {
            return Some(low + 4);
        }
    }
    let wheel = (1u16 << 12) | 0b1111;
    if rank_mask & wheel == wheel {
        return Some(3);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_four_of_a_kind() {
        let strength = evaluate(Hand::try_from("Ac Ad Ah As Kc").unwrap());
        assert_eq!(strength.ranking(), Ranking::FourOfAKind);
    }

    #[test]
    fn recognizes_wheel_straight() {
        let strength = evaluate(Hand::try_from("Ac 2d 3h 4s 5c").unwrap());
        assert_eq!(strength.ranking(), Ranking::Straight);
    }

    #[test]
    fn wheel_straight_loses_to_six_high_straight() {
        let wheel = evaluate(Hand::try_from("Ac 2d 3h 4s 5c").unwrap());
        let six_high = evaluate(Hand::try_from("2c 3d 4h 5s 6c").unwrap());
        assert!(six_high > wheel);
    }

    #[test]
    fn best_of_seven_picks_the_flush_over_the_pair() {
        let strength = evaluate(Hand::try_from("2c 3c 9c Jc Kc 9d 9h").unwrap());
        assert_eq!(strength.ranking(), Ranking::Flush);
    }

    #[test]
    fn full_house_beats_flush() {
        let fh = evaluate(Hand::try_from("9c 9d 9h Kc Ks").unwrap());
        let flush = evaluate(Hand::try_from("2c 3c 9c Jc Kc").unwrap());
        assert!(fh > flush);
    }
}

use super::evaluator;
use super::hand::Hand;
use super::ranking::Ranking;

/// The best five-card hand obtainable from a set of cards, ranked for
/// showdown comparison.
///
/// Orders first by [`Ranking`], then by kickers in order of significance
/// (e.g. trip rank before side-card rank). Kicker slots unused by a given
/// ranking are zero-padded on both sides of any comparison, so they never
/// affect the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Strength {
    ranking: Ranking,
    kickers: [u8; 5],
}

impl Strength {
    pub(super) fn new(ranking: Ranking, kickers: [u8; 5]) -> Self {
        Self { ranking, kickers }
    }
    pub fn ranking(&self) -> Ranking {
        self.ranking
    }
}

impl From<Hand> for Strength {
    fn from(hand: Hand) -> Self {
        evaluator::evaluate(hand)
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.ranking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_of_a_kind_outranks_straight() {
        let quads = Strength::from(Hand::try_from("Ac Ad Ah As Kc").unwrap());
        let straight = Strength::from(Hand::try_from("2c 3d 4h 5s 6c").unwrap());
        assert!(quads > straight);
    }

    #[test]
    fn ties_within_same_ranking_break_on_kickers() {
        let ace_pair = Strength::from(Hand::try_from("Ac Ad Kc Qd 2h").unwrap());
        let king_pair = Strength::from(Hand::try_from("Kc Kd Qc Jd 2h").unwrap());
        assert!(ace_pair > king_pair);
    }
}

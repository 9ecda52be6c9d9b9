use super::card::Card;
use super::hand::Hand;

/// A player's two private hole cards.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct Hole(Card, Card);

impl From<(Card, Card)> for Hole {
    fn from((a, b): (Card, Card)) -> Self {
        Self(a, b)
    }
}

impl Hole {
    /// Placeholder used in place of cards a viewpoint cannot see.
    pub fn hidden() -> Self {
        Self(Card::from(0), Card::from(1))
    }
}

impl From<Hole> for Hand {
    fn from(h: Hole) -> Self {
        Hand::add(Hand::from(h.0), Hand::from(h.1))
    }
}

impl std::fmt::Display for Hole {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_two_card_hand() {
        let hole = Hole::from((Card::try_from("As").unwrap(), Card::try_from("Kd").unwrap()));
        assert_eq!(Hand::from(hole).size(), 2);
    }
}

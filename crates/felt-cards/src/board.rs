use super::hand::Hand;
use super::street::Street;

/// The community cards shared by every seat. Visibility (0, 3, 4, or 5
/// cards) determines the current [`Street`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct Board(Hand);

impl Board {
    pub fn empty() -> Self {
        Self(Hand::empty())
    }
    pub fn street(&self) -> Street {
        match self.0.size() {
            0 => Street::Pref,
            3 => Street::Flop,
            4 => Street::Turn,
            5 => Street::Rive,
            n => panic!("board has invalid card count {}", n),
        }
    }
    pub fn add(&mut self, cards: Hand) {
        self.0 = Hand::add(self.0, cards);
    }
    pub fn clear(&mut self) {
        self.0 = Hand::empty();
    }
}

impl From<Board> for Hand {
    fn from(b: Board) -> Self {
        b.0
    }
}
impl From<Hand> for Board {
    fn from(h: Hand) -> Self {
        Self(h)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_preflop() {
        assert_eq!(Board::empty().street(), Street::Pref);
    }

    #[test]
    fn five_cards_is_river() {
        let mut board = Board::empty();
        board.add(Hand::try_from("As Ks Qs Js Ts").unwrap());
        assert_eq!(board.street(), Street::Rive);
    }
}

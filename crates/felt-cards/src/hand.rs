use super::card::Card;

/// An unordered set of cards as a 64-bit bitmask (bit `i` set iff card `i`
/// is present). Cheap to copy, union, and iterate — the workhorse type
/// for decks, boards, and evaluation.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct Hand(u64);

impl Hand {
    /// Bitmask covering all 52 cards.
    pub fn mask() -> u64 {
        (1u64 << 52) - 1
    }
    /// Empty hand.
    pub fn empty() -> Self {
        Self(0)
    }
    /// Number of cards present.
    pub fn size(&self) -> usize {
        self.0.count_ones() as usize
    }
    /// True if the hand contains no cards.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
    /// True if `card` is a member of this hand.
    pub fn contains(&self, card: &Card) -> bool {
        self.0 & u64::from(*card) != 0
    }
    /// Removes `card` from this hand.
    pub fn remove(&mut self, card: Card) {
        self.0 &= !u64::from(card);
    }
    /// Union of two hands.
    pub fn add(a: Self, b: Self) -> Self {
        Self(a.0 | b.0)
    }
    /// Union of two hands (alias of [`Self::add`] for call sites that read
    /// more naturally as a bitwise operation).
    pub fn or(a: Self, b: Self) -> Self {
        Self::add(a, b)
    }
    /// Cards present in `self` but not `other`.
    pub fn diff(a: Self, b: Self) -> Self {
        Self(a.0 & !b.0)
    }
    /// Complement within the full 52-card mask: every card not in `self`.
    pub fn complement(&self) -> Self {
        Self(!self.0 & Self::mask())
    }
}

impl From<u64> for Hand {
    fn from(n: u64) -> Self {
        Self(n)
    }
}
impl From<Hand> for u64 {
    fn from(h: Hand) -> u64 {
        h.0
    }
}
impl From<Card> for Hand {
    fn from(c: Card) -> Self {
        Self(u64::from(c))
    }
}

impl TryFrom<&str> for Hand {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Ok(Card::parse(s)?
            .into_iter()
            .map(Hand::from)
            .fold(Hand::empty(), Hand::add))
    }
}

/// Iterates cards lowest-index first, removing them as it goes.
impl Iterator for Hand {
    type Item = Card;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0 & self.0.wrapping_neg();
        let card = Card::from(bit.trailing_zeros() as u8);
        self.0 &= !bit;
        Some(card)
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for card in *self {
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_counts() {
        let hand = Hand::try_from("As Ks Qs").unwrap();
        assert_eq!(hand.size(), 3);
    }

    #[test]
    fn remove_then_contains_false() {
        let mut hand = Hand::try_from("As Ks").unwrap();
        let ace = Card::try_from("As").unwrap();
        assert!(hand.contains(&ace));
        hand.remove(ace);
        assert!(!hand.contains(&ace));
    }

    #[test]
    fn complement_is_full_mask_minus_self() {
        let hand = Hand::try_from("As").unwrap();
        let rest = hand.complement();
        assert_eq!(rest.size(), 51);
        assert!(!rest.contains(&Card::try_from("As").unwrap()));
    }
}

/// One of the four suits. Internally an index `0..4` (clubs, diamonds,
/// hearts, spades) rather than a bitmask — [`Card`](super::card::Card)'s u32
/// form shifts this index into its own 4-bit lane.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct Suit(u8);

impl From<u8> for Suit {
    fn from(n: u8) -> Self {
        Self(n % 4)
    }
}
impl From<Suit> for u8 {
    fn from(s: Suit) -> u8 {
        s.0
    }
}

impl TryFrom<&str> for Suit {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "c" => Ok(Self(0)),
            "d" => Ok(Self(1)),
            "h" => Ok(Self(2)),
            "s" => Ok(Self(3)),
            _ => Err(format!("invalid suit '{}'", s)),
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", ['c', 'd', 'h', 's'][self.0 as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_all_suits() {
        for s in ["c", "d", "h", "s"] {
            let suit = Suit::try_from(s).unwrap();
            assert_eq!(suit.to_string(), s);
        }
    }
}

/// One of the four betting rounds.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Street {
    Pref,
    Flop,
    Turn,
    Rive,
}

impl Street {
    /// The street that follows this one. Saturates at `Rive`.
    pub fn next(&self) -> Self {
        match self {
            Self::Pref => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::Rive,
            Self::Rive => Self::Rive,
        }
    }
    /// How many new board cards are revealed moving into this street.
    pub fn n_revealed(&self) -> usize {
        match self {
            Self::Pref => 0,
            Self::Flop => 3,
            Self::Turn => 1,
            Self::Rive => 1,
        }
    }
}

impl std::fmt::Display for Street {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Pref => write!(f, "preflop"),
            Self::Flop => write!(f, "flop"),
            Self::Turn => write!(f, "turn"),
            Self::Rive => write!(f, "river"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn river_reveals_one_more() {
        assert_eq!(Street::Turn.next(), Street::Rive);
        assert_eq!(Street::Rive.n_revealed(), 1);
    }

    #[test]
    fn river_next_saturates() {
        assert_eq!(Street::Rive.next(), Street::Rive);
    }
}

use felt_cards::Hand;
use felt_core::Chips;

/// A single decision or forced event applied to a [`Game`](super::game::Game).
///
/// `Check`/`Fold`/`Call`/`Raise`/`Shove` are player choices; `Blind` is a
/// forced post; `Draw` is the dealer revealing board cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Check,
    Fold,
    Call(Chips),
    Blind(Chips),
    Raise(Chips),
    Shove(Chips),
    Draw(Hand),
}

impl Action {
    /// True for actions a seated player actively chooses.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            Self::Check | Self::Fold | Self::Call(_) | Self::Raise(_) | Self::Shove(_)
        )
    }
    /// True for actions that put chips in with initiative (raise or shove).
    pub fn is_aggro(&self) -> bool {
        matches!(self, Self::Raise(_) | Self::Shove(_))
    }
    /// Short display label, ignoring any chip amount. Useful for menu
    /// prompts where the amount is picked in a separate step.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Check => "Check",
            Self::Fold => "Fold",
            Self::Call(_) => "Call",
            Self::Blind(_) => "Blind",
            Self::Raise(_) => "Raise",
            Self::Shove(_) => "Shove",
            Self::Draw(_) => "Draw",
        }
    }
}

/// Parses the wire format produced by [`Display`](std::fmt::Display), e.g.
/// `"CALL 100"` or `"CHECK"`. Used to decode client-submitted action strings.
impl TryFrom<&str> for Action {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> anyhow::Result<Self> {
        let mut parts = s.split_whitespace();
        let tag = parts.next().ok_or_else(|| anyhow::anyhow!("empty action"))?;
        let mut amount = || -> anyhow::Result<Chips> {
            parts
                .next()
                .ok_or_else(|| anyhow::anyhow!("{} is missing an amount", tag))?
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid amount in {:?}", s))
        };
        match tag.to_uppercase().as_str() {
            "CHECK" => Ok(Self::Check),
            "FOLD" => Ok(Self::Fold),
            "CALL" => Ok(Self::Call(amount()?)),
            "RAISE" => Ok(Self::Raise(amount()?)),
            "SHOVE" => Ok(Self::Shove(amount()?)),
            other => Err(anyhow::anyhow!("unrecognized action {:?}", other)),
        }
    }
}

/// Compact numeric encoding for ledger storage: top byte is the action tag,
/// low bits are the chip amount (0 when the action carries none).
/// `Draw` cannot be encoded — board reveals are reconstructed from the
/// hand's recorded board, not replayed as an action row.
impl From<Action> for u32 {
    fn from(action: Action) -> u32 {
        let (tag, amount): (u8, i16) = match action {
            Action::Check => (0, 0),
            Action::Fold => (1, 0),
            Action::Call(c) => (2, c),
            Action::Blind(c) => (3, c),
            Action::Raise(c) => (4, c),
            Action::Shove(c) => (5, c),
            Action::Draw(_) => (6, 0),
        };
        (tag as u32) << 24 | (amount as u16 as u32)
    }
}

impl From<u32> for Action {
    fn from(code: u32) -> Self {
        let tag = (code >> 24) as u8;
        let amount = (code & 0xFFFF) as u16 as Chips;
        match tag {
            0 => Self::Check,
            1 => Self::Fold,
            2 => Self::Call(amount),
            3 => Self::Blind(amount),
            4 => Self::Raise(amount),
            5 => Self::Shove(amount),
            other => panic!("cannot decode action tag {}", other),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Check => write!(f, "CHECK"),
            Self::Fold => write!(f, "FOLD"),
            Self::Call(c) => write!(f, "CALL {}", c),
            Self::Blind(c) => write!(f, "BLIND {}", c),
            Self::Raise(c) => write!(f, "RAISE {}", c),
            Self::Shove(c) => write!(f, "SHOVE {}", c),
            Self::Draw(h) => write!(f, "DRAW {}", h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_and_shove_are_aggro() {
        assert!(Action::Raise(10).is_aggro());
        assert!(Action::Shove(10).is_aggro());
        assert!(!Action::Call(10).is_aggro());
        assert!(!Action::Check.is_aggro());
    }

    #[test]
    fn blind_and_draw_are_not_choices() {
        assert!(!Action::Blind(50).is_choice());
        assert!(!Action::Draw(Hand::empty()).is_choice());
        assert!(Action::Fold.is_choice());
    }

    #[test]
    fn parses_display_format() {
        assert_eq!(Action::try_from("CHECK").unwrap(), Action::Check);
        assert_eq!(Action::try_from("call 100").unwrap(), Action::Call(100));
        assert!(Action::try_from("RAISE").is_err());
        assert!(Action::try_from("nonsense").is_err());
    }

    #[test]
    fn numeric_roundtrip_preserves_amount() {
        for action in [Action::Check, Action::Fold, Action::Call(50), Action::Raise(300)] {
            assert_eq!(Action::from(u32::from(action)), action);
        }
    }
}

use felt_core::Chips;

/// Static configuration for a table, fixed for the lifetime of the table
/// (not the hand). Seating changes between hands; this does not.
///
/// # Fields
///
/// - `max_players` — seat count, 2..=10
/// - `small_blind` / `big_blind` — blind schedule
/// - `ante` — per-player ante posted preflop alongside blinds (0 disables)
/// - `min_buy_in` / `max_buy_in` — stack bounds enforced at buy-in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    max_players: usize,
    small_blind: Chips,
    big_blind: Chips,
    ante: Chips,
    min_buy_in: Chips,
    max_buy_in: Chips,
}

impl TableConfig {
    pub fn new(
        max_players: usize,
        small_blind: Chips,
        big_blind: Chips,
        ante: Chips,
        min_buy_in: Chips,
        max_buy_in: Chips,
    ) -> anyhow::Result<Self> {
        if !(felt_core::MIN_PLAYERS..=felt_core::MAX_PLAYERS).contains(&max_players) {
            return Err(anyhow::anyhow!(
                "max_players {} outside [{}, {}]",
                max_players,
                felt_core::MIN_PLAYERS,
                felt_core::MAX_PLAYERS
            ));
        }
        if small_blind <= 0 || big_blind <= small_blind {
            return Err(anyhow::anyhow!("big blind must exceed small blind > 0"));
        }
        if min_buy_in > max_buy_in {
            return Err(anyhow::anyhow!("min_buy_in exceeds max_buy_in"));
        }
        Ok(Self {
            max_players,
            small_blind,
            big_blind,
            ante,
            min_buy_in,
            max_buy_in,
        })
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }
    pub fn small_blind(&self) -> Chips {
        self.small_blind
    }
    pub fn big_blind(&self) -> Chips {
        self.big_blind
    }
    pub fn ante(&self) -> Chips {
        self.ante
    }
    pub fn min_buy_in(&self) -> Chips {
        self.min_buy_in
    }
    pub fn max_buy_in(&self) -> Chips {
        self.max_buy_in
    }
}

/// Default 6-max table used by `QuickStart` lobby actions.
impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_players: 6,
            small_blind: 50,
            big_blind: 100,
            ante: 0,
            min_buy_in: 5_000,
            max_buy_in: 20_000,
        }
    }
}

impl TableConfig {
    /// Heads-up configuration matching the engine's original training defaults.
    pub fn heads_up() -> Self {
        Self {
            max_players: 2,
            small_blind: felt_core::S_BLIND,
            big_blind: felt_core::B_BLIND,
            ante: 0,
            min_buy_in: felt_core::STACK,
            max_buy_in: felt_core::STACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_seat_count() {
        assert!(TableConfig::new(1, 1, 2, 0, 100, 100).is_err());
        assert!(TableConfig::new(11, 1, 2, 0, 100, 100).is_err());
    }

    #[test]
    fn rejects_inverted_blinds() {
        assert!(TableConfig::new(6, 2, 2, 0, 100, 100).is_err());
        assert!(TableConfig::new(6, 0, 2, 0, 100, 100).is_err());
    }

    #[test]
    fn heads_up_matches_training_defaults() {
        let cfg = TableConfig::heads_up();
        assert_eq!(cfg.small_blind(), felt_core::S_BLIND);
        assert_eq!(cfg.big_blind(), felt_core::B_BLIND);
    }
}

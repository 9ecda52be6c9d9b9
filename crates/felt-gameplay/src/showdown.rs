use super::*;

/// Distributes a hand's pot across one or more side pots.
///
/// Built from one [`Settlement`] per seat (folded or not); [`Self::settle`]
/// returns the same settlements with `reward` filled in.
///
/// # Side pots
///
/// Side pots are formed at each distinct `spent` level among the seats.
/// A seat is eligible for a pot band only if it reached that level and
/// didn't fold. The highest [`Strength`] among eligible seats for a band
/// wins that band; ties split it evenly. A remainder chip from an uneven
/// split goes to the tied winner nearest the left of the dealer button —
/// the seat with the smallest clockwise distance from `dealer + 1`.
pub struct Showdown {
    settlements: Vec<Settlement>,
    excess_chair: Option<felt_core::Position>,
    excess_amount: felt_core::Chips,
}

impl From<Vec<Settlement>> for Showdown {
    fn from(settlements: Vec<Settlement>) -> Self {
        Self {
            settlements,
            excess_chair: None,
            excess_amount: 0,
        }
    }
}

impl Showdown {
    /// Settles every pot band and reports which seat (if any) collected an
    /// odd-chip remainder this hand, and how much.
    pub fn settle(
        mut self,
        dealer: felt_core::Position,
        n: usize,
    ) -> (Vec<Settlement>, Option<felt_core::Position>, felt_core::Chips) {
        let mut levels = self
            .settlements
            .iter()
            .map(|s| s.pnl().risked())
            .filter(|&c| c > 0)
            .collect::<Vec<_>>();
        levels.sort_unstable();
        levels.dedup();

        let mut prev = 0;
        for level in levels {
            let band = level - prev;
            let pot = self
                .settlements
                .iter()
                .map(|s| (s.pnl().risked() - prev).clamp(0, band))
                .sum::<felt_core::Chips>();
            if pot > 0 {
                self.distribute(pot, level, dealer, n);
            }
            prev = level;
        }
        (self.settlements, self.excess_chair, self.excess_amount)
    }

    /// Gives `pot` chips to the best eligible hand(s) for this pot's level.
    /// An uneven split hands its remainder to whichever tied winner sits
    /// closest to the left of `dealer`.
    fn distribute(&mut self, pot: felt_core::Chips, level: felt_core::Chips, dealer: felt_core::Position, n: usize) {
        let eligible: Vec<usize> = self
            .settlements
            .iter()
            .enumerate()
            .filter(|(_, s)| s.pnl().risked() >= level && s.pnl().status().is_active())
            .map(|(i, _)| i)
            .collect();
        if eligible.is_empty() {
            return;
        }
        let best = eligible
            .iter()
            .map(|&i| self.settlements[i].strength().clone())
            .max()
            .expect("eligible is non-empty");
        let winners: Vec<usize> = eligible
            .into_iter()
            .filter(|&i| self.settlements[i].strength() == &best)
            .collect();
        let share = pot / winners.len() as felt_core::Chips;
        let remainder = pot % winners.len() as felt_core::Chips;
        let odd_recipient = winners
            .iter()
            .copied()
            .min_by_key(|&i| (i + n - dealer - 1) % n)
            .expect("winners is non-empty");
        for &i in &winners {
            let extra = if i == odd_recipient { remainder } else { 0 };
            self.settlements[i].add(share + extra);
        }
        if remainder > 0 {
            self.excess_chair = Some(odd_recipient);
            self.excess_amount = remainder;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_cards::Strength;

    fn settlement(spent: felt_core::Chips, state: State, strength: Strength) -> Settlement {
        Settlement::from((spent, state, strength))
    }

    #[test]
    fn single_winner_takes_whole_pot() {
        let lo = Strength::from(felt_cards::Hand::try_from("2c 3c 4c 5c 7d").unwrap());
        let hi = Strength::from(felt_cards::Hand::try_from("Ac Ad Ah As Kc").unwrap());
        let settlements = vec![
            settlement(100, State::Betting, lo),
            settlement(100, State::Betting, hi),
        ];
        let (out, excess_chair, excess_amount) = Showdown::from(settlements).settle(0, 2);
        assert_eq!(out[0].pnl().reward(), 0);
        assert_eq!(out[1].pnl().reward(), 200);
        assert_eq!(excess_chair, None);
        assert_eq!(excess_amount, 0);
    }

    #[test]
    fn side_pot_splits_between_all_in_and_caller() {
        let lo = Strength::from(felt_cards::Hand::try_from("2c 3c 4c 5c 7d").unwrap());
        let hi = Strength::from(felt_cards::Hand::try_from("Ac Ad Ah As Kc").unwrap());
        // seat 0 all-in for 50, seat 1 (hi) covers to 150, seat 2 folds having put in 50
        let settlements = vec![
            settlement(50, State::Shoving, lo),
            settlement(150, State::Betting, hi),
            settlement(50, State::Folding, lo.clone()),
        ];
        let (out, excess_chair, excess_amount) = Showdown::from(settlements).settle(2, 3);
        // main pot (50*3=150) goes to best hand among eligible (seat1, hi)
        // side pot (100) has only seat1 eligible, also goes to seat1
        assert_eq!(out[1].pnl().reward(), 250);
        assert_eq!(out[0].pnl().reward(), 0);
        assert_eq!(out[2].pnl().reward(), 0);
        assert_eq!(excess_chair, None);
        assert_eq!(excess_amount, 0);
    }

    #[test]
    fn odd_chip_goes_to_nearest_seat_left_of_dealer() {
        // seat 0 calls 34 then folds; seats 1 and 2 tie, splitting the main
        // pot 49/49 with one chip left over. With dealer at seat 1, the
        // nearest seat to its left among the tied winners is seat 2 (not
        // seat 1, which the old lowest-index rule would have picked).
        let tie = Strength::from(felt_cards::Hand::try_from("2c 3c 4c 5c 7d").unwrap());
        let settlements = vec![
            settlement(34, State::Folding, tie.clone()),
            settlement(33, State::Betting, tie.clone()),
            settlement(34, State::Betting, tie),
        ];
        let (out, excess_chair, excess_amount) = Showdown::from(settlements).settle(1, 3);
        assert_eq!(excess_chair, Some(2));
        assert_eq!(excess_amount, 1);
        assert_eq!(out[0].pnl().reward(), 0);
        assert_eq!(out[1].pnl().reward(), 49);
        assert_eq!(out[2].pnl().reward(), 52);
    }
}

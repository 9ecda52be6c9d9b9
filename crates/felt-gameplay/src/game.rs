use super::*;
use felt_cards::*;
use felt_core::*;
use std::ops::Not;

/// The memoryless state of a poker hand.
///
/// `Game` is the core state machine for No-Limit Texas Hold'em, encoding everything
/// needed to determine legal actions and compute payoffs. It manages player stacks,
/// the pot, community cards, and whose turn it is to act.
///
/// # Architecture
///
/// The design is deliberately memoryless: `Game` contains only the current state,
/// not the history of how we got here. State transitions are functional —
/// [`apply`](Self::apply) returns a new `Game` rather than mutating in place.
///
/// `Game` models only the seats occupied for the hand currently in progress;
/// players joining, leaving, or sitting out between hands is handled one layer
/// up, which constructs a fresh `Game` from whichever seats are occupied when
/// the next hand starts.
///
/// # Fields
///
/// - `pot` — Total chips in the center (including current street bets)
/// - `board` — Community cards (0–5 depending on street)
/// - `seats` — Per-player state (stack, stake, status, hole cards)
/// - `dealer` — Button position
/// - `ticker` — Action counter for determining whose turn it is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pot: Chips,
    board: Board,
    seats: Vec<Seat>,
    dealer: Position,
    ticker: Position,
}

impl Game {
    /// Starts a hand for the given seats (stack, previously dealt cards
    /// notwithstanding — every seat is dealt a fresh hole) with the dealer
    /// button on `dealer`. Panics if fewer than two seats are given.
    pub fn new(stacks: &[Chips], dealer: Position) -> Self {
        assert!(stacks.len() >= 2, "a hand needs at least two seats");
        let mut deck = Deck::new();
        let seats = stacks
            .iter()
            .map(|&stack| Seat::from((deck.hole(), stack)))
            .collect();
        let mut game = Self {
            pot: 0,
            board: Board::empty(),
            seats,
            dealer: dealer % stacks.len(),
            ticker: 0,
        };
        game.act(game.posts());
        game.act(game.posts());
        game
    }
}

impl Default for Game {
    /// Canonical heads-up starting state, used by the self-contained test
    /// suite below. Real tables always go through [`Game::new`].
    fn default() -> Self {
        let mut deck = Deck::new();
        Self {
            pot: 0,
            board: Board::empty(),
            seats: (0..2)
                .map(|_| deck.hole())
                .map(|h| (h, STACK))
                .map(Seat::from)
                .collect(),
            dealer: 0usize,
            ticker: 0usize,
        }
    }
}

/// Game tree entry points.
impl Game {
    /// Creates the canonical starting state for a heads-up hand: blinds
    /// posted, ready for the dealer's first decision. Default stack is
    /// 100bb with P0 on the button.
    pub fn root() -> Self {
        let mut game = Self::default();
        game.act(game.posts());
        game.act(game.posts());
        game
    }
    /// Starts a hand with specific hole cards per seat, rather than dealing
    /// fresh from a random deck. Used to reconstruct a hand from a recorded
    /// or externally-specified deal (replay). Panics if `holes.len() !=
    /// stacks.len()` or fewer than two seats are given.
    pub fn spec(holes: &[Hole], stacks: &[Chips], dealer: Position) -> Self {
        assert_eq!(holes.len(), stacks.len(), "one hole per seat");
        assert!(stacks.len() >= 2, "a hand needs at least two seats");
        let seats = holes
            .iter()
            .zip(stacks.iter())
            .map(|(&hole, &stack)| Seat::from((hole, stack)))
            .collect();
        let mut game = Self {
            pot: 0,
            board: Board::empty(),
            seats,
            dealer: dealer % stacks.len(),
            ticker: 0,
        };
        game.act(game.posts());
        game.act(game.posts());
        game
    }
    /// Replaces all players' hole cards with the given hand.
    pub fn wipe(mut self, hole: Hole) -> Self {
        for seat in self.seats.iter_mut() {
            seat.reset_cards(hole);
        }
        self
    }
    /// Replaces all players' hole cards EXCEPT the given seat.
    pub fn assume(mut self, hero: Turn, hole: Hole) -> Self {
        self.seats
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| Turn::Choice(*i) != hero)
            .for_each(|(_, seat)| seat.reset_cards(hole));
        self
    }
    /// Fast-forward to the given street by taking passive actions.
    ///
    /// # Panics
    ///
    /// Panics if the target street has already passed or the hand reaches
    /// a terminal state before the target street.
    pub fn ffwd(mut self, target: Street) -> Self {
        while self.street() < target {
            match self.turn() {
                Turn::Terminal => panic!("reached terminal before target street"),
                Turn::Chance => {
                    let action = self.reveal();
                    self.act(action);
                }
                Turn::Choice(_) => {
                    let action = self.passive();
                    self.act(action);
                }
            }
        }
        debug_assert_eq!(self.street(), target, "overshot target street");
        self
    }
}

/// Public state accessors.
impl Game {
    /// Number of seats at the table for this hand.
    pub fn n(&self) -> usize {
        self.seats.len()
    }
    /// Total chips in the pot.
    pub fn pot(&self) -> Chips {
        self.pot
    }
    /// All player seats.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    /// Community cards on the board.
    pub fn board(&self) -> Board {
        self.board
    }
    /// Determines whether it's a player's turn, chance node, or terminal.
    pub fn turn(&self) -> Turn {
        if self.must_stop() {
            Turn::Terminal
        } else if self.must_deal() {
            Turn::Chance
        } else {
            Turn::Choice(self.actor_idx())
        }
    }
    /// The seat of the player to act.
    pub fn actor(&self) -> &Seat {
        self.actor_ref()
    }
    /// The button's seat position.
    pub fn dealer(&self) -> Position {
        self.dealer
    }
    /// Current street based on board cards.
    pub fn street(&self) -> Street {
        self.board.street()
    }
}

/// Action validation and application.
impl Game {
    /// Applies an action mutably and returns a clone of the new state.
    pub fn consume(&mut self, action: Action) -> Self {
        self.act(action);
        self.clone()
    }
    /// Returns a new game state with the action applied.
    ///
    /// Panics if the action is not legal in the current state.
    pub fn apply(&self, action: Action) -> Self {
        self.try_apply(action).expect("valid action")
    }
    /// Fallible version of [`apply`](Self::apply).
    pub fn try_apply(&self, action: Action) -> anyhow::Result<Self> {
        if !self.is_allowed(&action) {
            return Err(anyhow::anyhow!(
                "illegal action {:?} in state {:?}",
                action,
                self.turn()
            ));
        }
        let mut child = self.clone();
        child.act(action);
        Ok(child)
    }
    /// Returns all legal actions in the current state.
    ///
    /// Empty at terminal nodes. Contains exactly one action at chance nodes.
    /// Contains multiple options at decision nodes.
    pub fn legal(&self) -> Vec<Action> {
        if self.must_stop() {
            return vec![];
        }
        if self.must_deal() {
            return vec![self.reveal()];
        }
        if self.must_post() {
            return vec![self.posts()];
        }
        let mut options = Vec::new();
        if self.may_raise() {
            options.push(self.raise());
        }
        if self.may_shove() {
            options.push(self.shove());
        }
        if self.may_call() {
            options.push(self.calls());
        }
        if self.may_fold() {
            options.push(self.folds());
        }
        if self.may_check() {
            options.push(self.check());
        }
        debug_assert!(!options.is_empty());
        options
    }
    /// Checks if a specific action is legal.
    ///
    /// Performs bounds checking for raises (min/max) and draws (correct cards).
    pub fn is_allowed(&self, action: &Action) -> bool {
        match action {
            Action::Raise(raise) => {
                self.may_raise()
                    && self.must_stop().not()
                    && self.must_deal().not()
                    && *raise >= self.to_raise()
                    && *raise <= self.to_shove() - 1
            }
            Action::Draw(cards) => {
                self.must_deal()
                    && self.must_stop().not()
                    && cards.clone().all(|c| self.deck().contains(&c))
                    && cards.count() == self.board().street().next().n_revealed()
            }
            other => self.legal().contains(other),
        }
    }
}

/// Hand-to-hand transitions.
impl Game {
    /// Advances to the next hand if every player can cover the big blind.
    ///
    /// Returns `None` if a player is busted. Otherwise resets the board,
    /// deals new cards, posts blinds, and rotates the button.
    pub fn continuation(mut self) -> Option<Self> {
        debug_assert!(self.turn() == Turn::Terminal);
        self.settlements()
            .iter()
            .zip(self.seats())
            .all(|(s, seat)| seat.stack() + s.pnl().reward() >= Game::bblind())
            .then(|| {
                self.give_chips();
                self.wipe_board();
                self.wipe_seats();
                self.move_button();
                self.act(self.posts());
                self.act(self.posts());
                self
            })
    }

    fn give_chips(&mut self) {
        for (_, (settlement, seat)) in self
            .settlements()
            .iter()
            .zip(self.seats.iter_mut())
            .enumerate()
            .inspect(|(i, (x, s))| log::trace!("{} {} {:>7} {}", i, s.cards(), s.stack(), x.won()))
        {
            seat.win(settlement.pnl().reward());
        }
        self.pot = 0;
    }

    fn wipe_board(&mut self) {
        debug_assert!(self.pot() == 0);
        self.board.clear();
    }
    fn wipe_seats(&mut self) {
        debug_assert!(self.pot() == 0);
        debug_assert!(self.street() == Street::Pref);
        let mut deck = Deck::new();
        for seat in self.seats.iter_mut() {
            seat.reset_state(State::Betting);
            seat.reset_cards(deck.hole());
            seat.reset_stake();
            seat.reset_spent();
        }
    }

    fn move_button(&mut self) {
        debug_assert!(self.pot() == 0);
        debug_assert!(self.street() == Street::Pref);
        self.dealer = (self.dealer + 1) % self.n();
        self.ticker = 0;
    }
}

/// Private mutation methods.
impl Game {
    /// Core state transition logic.
    fn act(&mut self, a: Action) {
        debug_assert!(self.is_allowed(&a));
        match a {
            Action::Check => {
                self.next_player();
            }
            Action::Fold => {
                self.fold();
                self.next_player();
            }
            Action::Call(chips)
            | Action::Blind(chips)
            | Action::Raise(chips)
            | Action::Shove(chips) => {
                self.bet(chips);
                self.next_player();
            }
            Action::Draw(cards) => {
                self.show(cards);
                self.seek_first_actor();
            }
        }
    }
    fn bet(&mut self, bet: Chips) {
        debug_assert!(self.actor_ref().stack() >= bet);
        self.pot += bet;
        self.actor_mut().bet(bet);
        if self.actor_ref().stack() == 0 {
            self.allin();
        }
    }
    fn allin(&mut self) {
        self.actor_mut().reset_state(State::Shoving);
    }
    fn fold(&mut self) {
        self.actor_mut().reset_state(State::Folding);
    }
    fn show(&mut self, hand: Hand) {
        self.ticker = 0;
        self.board.add(hand);
    }
}

/// Street and player advancement.
impl Game {
    /// Resets per-street stakes when a new street begins.
    fn next_street(&mut self) {
        for seat in self.seats.iter_mut() {
            seat.reset_stake();
        }
    }
    /// Advances to the next active player, skipping folded/all-in players.
    fn next_player(&mut self) {
        if !self.is_everyone_alright() {
            loop {
                self.ticker += 1;
                match self.actor_ref().state() {
                    State::Betting => break,
                    State::Folding => continue,
                    State::Shoving => continue,
                }
            }
        }
    }
    /// Resets per-street stakes and seeks the first seat due to act on a
    /// fresh street, WITHOUT forcing at least one step the way
    /// [`next_player`](Self::next_player) does for a same-street advance.
    /// The ticker is already reset to the new street's anchor (dealer+1 mod
    /// n postflop), so this only steps past seats that can't act.
    fn seek_first_actor(&mut self) {
        self.next_street();
        while !matches!(self.actor_ref().state(), State::Betting) {
            if self.is_everyone_alright() {
                break;
            }
            self.ticker += 1;
        }
    }
}

/// Termination and continuation predicates.
impl Game {
    /// True if the hand is complete (showdown or everyone folded).
    pub fn must_stop(&self) -> bool {
        if self.street() == Street::Rive {
            self.is_everyone_alright()
        } else {
            self.is_everyone_folding()
        }
    }
    /// True if we need to deal the next street's cards.
    pub fn must_deal(&self) -> bool {
        self.street() != Street::Rive && self.is_everyone_alright()
    }
    /// True if blinds have not yet been posted.
    pub fn must_post(&self) -> bool {
        self.street() == Street::Pref && self.pot() < Self::sblind() + Self::bblind()
    }
    /// All players have acted and the pot is right.
    fn is_everyone_alright(&self) -> bool {
        self.is_everyone_calling() || self.is_everyone_folding() || self.is_everyone_shoving()
    }
    /// All betting players are in for the same amount.
    fn is_everyone_calling(&self) -> bool {
        self.is_everyone_touched() && self.is_everyone_matched()
    }
    /// All players have acted at least once this street.
    ///
    /// Preflop, the ticker starts at 2 (both blinds already posted) before
    /// any real decision has been made, so the threshold needs one extra
    /// step there; every other street starts the ticker fresh at the first
    /// actor, so `n() - 1` full advances means everyone has been touched.
    fn is_everyone_touched(&self) -> bool {
        let threshold = if self.street() == Street::Pref {
            self.n() + 1
        } else {
            self.n() - 1
        };
        self.ticker > threshold
    }
    /// All betting players are in for the effective stake.
    fn is_everyone_matched(&self) -> bool {
        let stake = self.stakes();
        self.seats
            .iter()
            .filter(|s| s.state() == State::Betting)
            .all(|s| s.stake() == stake)
    }
    /// All non-folded players are all-in.
    fn is_everyone_shoving(&self) -> bool {
        self.seats
            .iter()
            .filter(|s| s.state() != State::Folding)
            .all(|s| s.state() == State::Shoving)
    }
    /// Exactly one player remains (all others folded).
    fn is_everyone_folding(&self) -> bool {
        self.seats
            .iter()
            .filter(|s| s.state() != State::Folding)
            .count()
            == 1
    }
    /// True if folding is a legal option (facing a bet).
    pub fn may_fold(&self) -> bool {
        matches!(self.turn(), Turn::Choice(_)) && self.to_call() > 0
    }
    /// True if calling is legal (facing a bet we can cover).
    pub fn may_call(&self) -> bool {
        matches!(self.turn(), Turn::Choice(_))
            && self.may_fold()
            && self.to_call() < self.to_shove()
    }
    /// True if checking is legal (no bet to call).
    pub fn may_check(&self) -> bool {
        matches!(self.turn(), Turn::Choice(_)) && self.stakes() == self.actor_ref().stake()
    }
    /// True if raising is legal (have chips beyond the min-raise).
    pub fn may_raise(&self) -> bool {
        matches!(self.turn(), Turn::Choice(_)) && self.to_raise() < self.to_shove()
    }
    /// True if shoving (all-in) is legal.
    pub fn may_shove(&self) -> bool {
        matches!(self.turn(), Turn::Choice(_)) && self.to_shove() > 0
    }
}

/// Bet sizing constraints and action constructors.
impl Game {
    /// Chips needed to call the current bet.
    pub fn to_call(&self) -> Chips {
        self.stakes() - self.actor_ref().stake()
    }
    /// Blind amount to post (SB or BB depending on position).
    pub fn to_post(&self) -> Chips {
        debug_assert!(self.street() == Street::Pref);
        if self.actor_idx() == self.sb_pos() {
            Self::sblind().min(self.actor_ref().stack())
        } else {
            Self::bblind().min(self.actor_ref().stack())
        }
    }
    /// All remaining chips (for all-in).
    pub fn to_shove(&self) -> Chips {
        self.actor_ref().stack()
    }
    /// Minimum legal raise size.
    ///
    /// Computed as: chips to call + max(last raise increment, big blind).
    pub fn to_raise(&self) -> Chips {
        let (most_large_stake, next_large_stake) = self
            .seats
            .iter()
            .filter(|s| s.state() != State::Folding)
            .map(|s| s.stake())
            .fold((0, 0), |(most, next), stake| {
                if stake > most {
                    (stake, most)
                } else if stake > next {
                    (most, stake)
                } else {
                    (most, next)
                }
            });
        let relative_raise = most_large_stake - self.actor().stake();
        let marginal_raise = most_large_stake - next_large_stake;
        let required_raise = std::cmp::max(marginal_raise, Self::bblind());
        relative_raise + required_raise
    }
    /// Constructs a minimum-raise action.
    pub fn raise(&self) -> Action {
        Action::Raise(self.to_raise())
    }
    /// Constructs an all-in action.
    pub fn shove(&self) -> Action {
        Action::Shove(self.to_shove())
    }
    /// Constructs a call action.
    pub fn calls(&self) -> Action {
        Action::Call(self.to_call())
    }
    /// Constructs a blind-posting action.
    pub fn posts(&self) -> Action {
        Action::Blind(self.to_post())
    }
    /// Constructs a fold action.
    pub fn folds(&self) -> Action {
        Action::Fold
    }
    /// Constructs a check action.
    pub fn check(&self) -> Action {
        Action::Check
    }
    /// Returns check if allowed, otherwise fold.
    pub fn passive(&self) -> Action {
        if self.may_check() {
            Action::Check
        } else {
            Action::Fold
        }
    }
    /// Deals the next street's cards from the deck.
    pub fn reveal(&self) -> Action {
        Action::Draw(self.deck().deal(self.street()))
    }
}

/// Showdown and payout logic.
impl Game {
    /// Computes final chip distributions at a terminal node.
    pub fn settlements(&self) -> Vec<Settlement> {
        self.settle_showdown().0
    }
    /// Returns the seat that collected this hand's odd-chip remainder (if
    /// any side pot split unevenly) and how many chips it received.
    pub fn excess(&self) -> (Option<Position>, Chips) {
        let (_, chair, amount) = self.settle_showdown();
        (chair, amount)
    }
    fn settle_showdown(&self) -> (Vec<Settlement>, Option<Position>, Chips) {
        debug_assert!(self.must_stop(), "non terminal game state:\n{}", self);
        Showdown::from(self.ledger()).settle(self.dealer(), self.n())
    }
    /// Returns true if this is a showdown (multiple players remain).
    pub fn is_showdown(&self) -> bool {
        self.seats.iter().filter(|s| s.state().is_active()).count() > 1
    }
    fn ledger(&self) -> Vec<Settlement> {
        self.seats
            .iter()
            .enumerate()
            .map(|(position, _)| self.settlement(position))
            .collect()
    }
    fn settlement(&self, position: usize) -> Settlement {
        let seat = &self.seats[position];
        let strength = Strength::from(Hand::add(
            Hand::from(seat.cards()),
            Hand::from(self.board()),
        ));
        Settlement::from((seat.spent(), seat.state(), strength))
    }
}

/// Card operations.
impl Game {
    /// Deals random cards for the next street.
    pub fn draw(&self) -> Hand {
        self.deck().deal(self.street())
    }
    /// Returns the remaining deck (all cards not in play).
    pub fn deck(&self) -> Deck {
        let mut removed = Hand::from(self.board);
        for seat in self.seats.iter() {
            removed = Hand::or(removed, Hand::from(seat.cards()));
        }
        Deck::from(removed.complement())
    }
}

/// Position tracking.
impl Game {
    /// Small blind seat. Heads-up, the button IS the small blind; with
    /// three or more players the small blind sits directly to the
    /// button's left.
    fn sb_pos(&self) -> Position {
        if self.n() == 2 {
            self.dealer
        } else {
            (self.dealer + 1) % self.n()
        }
    }
    /// Big blind seat, always one seat left of the small blind.
    fn bb_pos(&self) -> Position {
        (self.sb_pos() + 1) % self.n()
    }
    /// Index of the player to act.
    ///
    /// Preflop, action starts on the small blind (heads-up: the dealer
    /// themselves). Every other street, action starts on the first active
    /// seat left of the button — which happens to equal the big blind seat
    /// in heads-up and the small blind seat everywhere else, so one
    /// modular formula covers both without special-casing here.
    fn actor_idx(&self) -> Position {
        let anchor = if self.street() == Street::Pref {
            self.sb_pos()
        } else {
            (self.dealer + 1) % self.n()
        };
        (anchor + self.ticker) % self.n()
    }
    fn actor_ref(&self) -> &Seat {
        self.seats
            .get(self.actor_idx())
            .expect("index should be in bounds bc modulo")
    }
    fn actor_mut(&mut self) -> &mut Seat {
        let index = self.actor_idx();
        self.seats
            .get_mut(index)
            .expect("index should be in bounds bc modulo")
    }
}

/// Stack and SPR calculations.
impl Game {
    /// Total chips in play (pot + all stacks).
    pub fn total(&self) -> Chips {
        self.pot() + self.seats().iter().map(|s| s.stack()).sum::<Chips>()
    }
    /// Effective stack: the smallest stack still in the hand, which bounds
    /// how much anyone can actually win.
    pub fn effective(&self) -> Chips {
        self.seats.iter().map(|s| s.stack()).min().unwrap_or(0)
    }
    /// Stack-to-pot ratio (effective stack / pot).
    pub fn spr(&self) -> f32 {
        match self.pot() {
            0 => 0.0,
            p => self.effective() as f32 / p as f32,
        }
    }
    /// Maximum stake among all players this street.
    fn stakes(&self) -> Chips {
        self.seats
            .iter()
            .map(|s| s.stake())
            .max()
            .expect("non-empty seats")
    }
}

/// Blind configuration.
impl Game {
    /// Returns the blind posting actions [SB, BB].
    pub const fn blinds() -> [Action; 2] {
        [Action::Blind(Self::sblind()), Action::Blind(Self::bblind())]
    }
    /// Big blind size.
    pub const fn bblind() -> Chips {
        felt_core::B_BLIND
    }
    /// Small blind size.
    pub const fn sblind() -> Chips {
        felt_core::S_BLIND
    }
}

/// Coercing arbitrary actions into the nearest legal one.
impl Game {
    /// Maps an action to the nearest legal action in the current state.
    ///
    /// Useful for NPC decisions and client-submitted actions that may not
    /// exactly match what's legal (stale min-raise, over-the-top raise,
    /// checking into a bet). Semi-recursive: aggressive actions cascade
    /// through the fallback chain `Raise → Shove → Call → passive`.
    ///
    /// # Mapping rules
    ///
    /// - `Raise(x)` where `x >= to_shove()` → recurse with `Shove`
    /// - `Raise(x)` where `x < to_raise()` → `Raise(to_raise())`
    /// - `Raise(_)` when `!may_raise()` → recurse with `Shove`
    /// - `Shove` when `!may_shove()` → recurse with `Call`
    /// - `Call` when `!may_call()` → `passive()`
    /// - `Check` when `!may_check()` → `Call` or `Fold`
    /// - `Fold` when `!may_fold()` → `Check`
    pub fn snap(&self, action: Action) -> Action {
        match action {
            Action::Raise(x) if x >= self.to_shove() => self.snap(self.shove()), //
            Action::Raise(_) if !self.may_raise() => self.snap(self.shove()),    //
            Action::Raise(x) if x < self.to_raise() => self.raise(),             //
            Action::Raise(x) => Action::Raise(x),                                //
            Action::Shove(_) if self.may_shove() => self.shove(),                //
            Action::Shove(_) if self.may_call() => self.calls(),                 //
            Action::Shove(_) => self.passive(),                                  //
            Action::Call(_) if self.may_call() => self.calls(),                  //
            Action::Call(_) if self.may_shove() => self.shove(),                 //
            Action::Call(_) => self.passive(),                                   //
            Action::Check if self.may_check() => Action::Check,                  //
            Action::Check if self.may_call() => self.calls(),                    //
            Action::Check => self.folds(),                                       //
            Action::Fold if self.may_fold() => Action::Fold,                     //
            Action::Fold => Action::Check,                                       //
            Action::Draw(_) | Action::Blind(_) => action,
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for seat in self.seats.iter() {
            writeln!(
                f,
                "{:>3} {:>3} {:<6}",
                seat.state(),
                seat.cards(),
                seat.stack()
            )?;
        }
        writeln!(f, "Pot   {}", self.pot())?;
        writeln!(f, "Board {}", self.board())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// spec() seats exact hole cards instead of dealing randomly
    #[test]
    fn spec_assigns_requested_holes() {
        let a = Hole::from((Card::try_from("As").unwrap(), Card::try_from("Ks").unwrap()));
        let b = Hole::from((Card::try_from("2c").unwrap(), Card::try_from("7d").unwrap()));
        let game = Game::spec(&[a, b], &[STACK, STACK], 0);
        assert_eq!(game.seats()[0].cards(), a);
        assert_eq!(game.seats()[1].cards(), b);
        assert_eq!(game.pot(), Game::sblind() + Game::bblind());
    }

    /// dealer posts SB, non-dealer posts BB, dealer acts first after blinds
    #[test]
    fn test_root() {
        let game = Game::root();
        assert_eq!(game.board().street(), Street::Pref);
        assert_eq!(game.actor().state(), State::Betting);
        assert_eq!(game.pot(), Game::sblind() + Game::bblind());
        assert_eq!(game.turn(), Turn::Choice(game.dealer)); // dealer acts first
    }

    #[test]
    fn everyone_folds_pref() {
        let game = Game::root();
        let game = game.apply(Action::Fold);
        assert!(game.is_everyone_folding() == true);
        assert!(game.is_everyone_alright() == true);
        assert!(game.is_everyone_calling() == false);
        assert!(game.must_deal() == true); // ambiguous
        assert!(game.must_stop() == true);
    }

    #[test]
    fn everyone_folds_flop() {
        let game = Game::root();
        let flop = game.deck().deal(Street::Pref);
        let game = game.apply(Action::Call(1));
        let game = game.apply(Action::Check);
        let game = game.apply(Action::Draw(flop));
        let game = game.apply(Action::Raise(10));
        let game = game.apply(Action::Fold);
        assert!(game.is_everyone_folding() == true);
        assert!(game.is_everyone_alright() == true);
        assert!(game.is_everyone_calling() == false);
        assert!(game.must_deal() == true); // ambiguous
        assert!(game.must_stop() == true);
    }

    #[test]
    fn history_of_checks() {
        let game = Game::root();
        assert!(game.board().street() == Street::Pref);
        assert!(game.pot() == 3);
        assert!(game.must_post() == false);
        assert!(game.must_stop() == false);
        assert!(game.must_deal() == false);
        assert!(game.is_everyone_alright() == false);
        assert!(game.is_everyone_calling() == false);
        assert!(game.is_everyone_touched() == false);
        assert!(game.is_everyone_matched() == false);

        let game = game.apply(Action::Call(1));
        assert!(game.board().street() == Street::Pref);
        assert!(game.pot() == 4);
        assert!(game.must_post() == false);
        assert!(game.must_stop() == false);
        assert!(game.must_deal() == false);
        assert!(game.is_everyone_alright() == false);
        assert!(game.is_everyone_calling() == false);
        assert!(game.is_everyone_touched() == false);
        assert!(game.is_everyone_matched() == true);

        let game = game.apply(Action::Check);
        assert!(game.board().street() == Street::Pref);
        assert!(game.pot() == 4);
        assert!(game.must_post() == false);
        assert!(game.must_stop() == false);
        assert!(game.must_deal() == true);
        assert!(game.is_everyone_alright() == true);
        assert!(game.is_everyone_calling() == true);
        assert!(game.is_everyone_touched() == true);
        assert!(game.is_everyone_matched() == true);

        let flop = game.deck().deal(game.board().street());
        let game = game.apply(Action::Draw(flop));
        assert!(game.board().street() == Street::Flop);
        assert!(game.pot() == 4);
        assert!(game.must_post() == false);
        assert!(game.must_stop() == false);
        assert!(game.must_deal() == false);
        assert!(game.is_everyone_alright() == false);
        assert!(game.is_everyone_calling() == false);
        assert!(game.is_everyone_touched() == false);
        assert!(game.is_everyone_matched() == true);

        let game = game.apply(Action::Check);
        let game = game.apply(Action::Check);
        assert!(game.board().street() == Street::Flop);
        assert!(game.must_deal() == true);
        assert!(game.is_everyone_touched() == true);

        let turn = game.deck().deal(game.board().street());
        let game = game.apply(Action::Draw(turn));
        assert!(game.board().street() == Street::Turn);
        assert!(game.is_everyone_touched() == false);

        let game = game.apply(Action::Check);
        let game = game.apply(Action::Raise(4));
        assert!(game.pot() == 8);
        assert!(game.is_everyone_touched() == true);
        assert!(game.is_everyone_matched() == false);

        let game = game.apply(Action::Call(4));
        assert!(game.pot() == 12);
        assert!(game.must_deal() == true);

        let rive = game.deck().deal(game.board().street());
        let game = game.apply(Action::Draw(rive));
        assert!(game.board().street() == Street::Rive);
        assert!(game.is_everyone_touched() == false);

        let game = game.apply(Action::Check);
        let game = game.apply(Action::Check);
        assert!(game.must_stop() == true);
    }

    /// next() resets game state correctly after terminal
    #[test]
    fn next_after_fold() {
        let game = Game::root().apply(Action::Fold);
        assert!(game.must_stop());
        let next = game.continuation().expect("can continue");
        assert_eq!(next.street(), Street::Pref);
        assert_eq!(next.pot(), Game::sblind() + Game::bblind());
        assert_eq!(next.board(), Board::empty());
        assert_eq!(next.dealer, 1); // rotated from 0
        assert_eq!(next.turn(), Turn::Choice(1)); // new dealer acts first
        assert!(!next.is_everyone_touched());
    }

    /// dealer rotates correctly across multiple hands
    #[test]
    fn dealer_rotation() {
        let game = Game::root();
        assert_eq!(game.dealer, 0);
        let game = game.apply(Action::Fold).continuation().unwrap();
        assert_eq!(game.dealer, 1);
        let game = game.apply(Action::Fold).continuation().unwrap();
        assert_eq!(game.dealer, 0); // wraps around
        let game = game.apply(Action::Fold).continuation().unwrap();
        assert_eq!(game.dealer, 1);
    }

    /// ticker resets correctly for each new hand, regardless of dealer
    #[test]
    fn ticker_reset_on_next() {
        let g0 = Game::root();
        let g1 = g0.clone().apply(Action::Fold).continuation().unwrap();
        let g2 = g1.clone().apply(Action::Fold).continuation().unwrap();
        assert_eq!(g0.ticker, g1.ticker);
        assert_eq!(g1.ticker, g2.ticker);
        assert_eq!(g0.ticker, 2); // 2 blinds posted
    }

    /// is_everyone_touched works correctly for dealer=1
    #[test]
    fn touched_with_rotated_dealer() {
        let game = Game::root().apply(Action::Fold).continuation().unwrap();
        assert_eq!(game.dealer, 1);
        assert!(!game.is_everyone_touched()); // just blinds
        let game = game.apply(Action::Call(1));
        assert!(!game.is_everyone_touched()); // P1 called, P0 hasn't acted
        let game = game.apply(Action::Check);
        assert!(game.is_everyone_touched()); // both acted
        assert!(game.must_deal());
    }

    /// multi-street hand with rotated dealer
    #[test]
    fn full_hand_rotated_dealer() {
        let game = Game::root().apply(Action::Fold).continuation().unwrap();
        assert_eq!(game.dealer, 1);
        let game = game.apply(Action::Call(1)).apply(Action::Check);
        assert!(game.must_deal());
        let flop = game.deck().deal(Street::Pref);
        let game = game.apply(Action::Draw(flop));
        assert_eq!(game.street(), Street::Flop);
        assert_eq!(game.turn(), Turn::Choice(0)); // non-dealer first postflop
        assert!(!game.is_everyone_touched());
        let game = game.apply(Action::Check).apply(Action::Check);
        assert!(game.is_everyone_touched());
        assert!(game.must_deal());
    }

    /// five consecutive hands, verifying state after each
    #[test]
    fn five_hands_sequence() {
        let mut game = Game::root();
        for i in 0..5 {
            assert_eq!(game.dealer, i % 2);
            assert_eq!(game.pot(), Game::sblind() + Game::bblind());
            assert_eq!(game.street(), Street::Pref);
            assert!(!game.is_everyone_touched());
            assert_eq!(game.turn(), Turn::Choice(game.dealer));
            game = game.apply(Action::Fold).continuation().unwrap();
        }
    }

    /// call-check sequence works identically for both dealer positions
    #[test]
    fn symmetric_preflop_action() {
        let g0 = Game::root();
        assert_eq!(g0.dealer, 0);
        let g0 = g0.apply(Action::Call(1));
        assert!(!g0.is_everyone_touched());
        let g0 = g0.apply(Action::Check);
        assert!(g0.is_everyone_touched());
        assert!(g0.must_deal());
        let g1 = Game::root().apply(Action::Fold).continuation().unwrap();
        assert_eq!(g1.dealer, 1);
        let g1 = g1.apply(Action::Call(1));
        assert!(!g1.is_everyone_touched());
        let g1 = g1.apply(Action::Check);
        assert!(g1.is_everyone_touched());
        assert!(g1.must_deal());
    }

    /// actor position is correct for both dealers on flop
    #[test]
    fn flop_actor_both_dealers() {
        let g0 = Game::root().apply(Action::Call(1)).apply(Action::Check);
        let flop = g0.deck().deal(Street::Pref);
        let g0 = g0.apply(Action::Draw(flop));
        assert_eq!(g0.turn(), Turn::Choice(1)); // P1 (non-dealer) first
        let g1 = Game::root()
            .apply(Action::Fold)
            .continuation()
            .unwrap()
            .apply(Action::Call(1))
            .apply(Action::Check);
        let flop = g1.deck().deal(Street::Pref);
        let g1 = g1.apply(Action::Draw(flop));
        assert_eq!(g1.turn(), Turn::Choice(0)); // P0 (non-dealer) first
    }

    /// shove and call leads to showdown
    #[test]
    fn allin_showdown() {
        let game = Game::root();
        let shove = game.to_shove();
        let game = game.apply(Action::Shove(shove));
        let shove = game.to_shove();
        let game = game.apply(Action::Shove(shove));
        assert!(game.is_everyone_shoving());
        assert!(game.must_stop() || game.must_deal());
    }

    /// shove and fold is terminal
    #[test]
    fn allin_fold() {
        let game = Game::root();
        let shove = game.to_shove();
        let game = game.apply(Action::Shove(shove)).apply(Action::Fold);
        assert!(game.must_stop());
        assert!(game.is_everyone_folding());
    }

    /// raise-reraise sequence keeps action open
    #[test]
    fn raise_reraise() {
        let g0 = Game::root();
        let r1 = g0.to_raise();
        let g1 = g0.apply(Action::Raise(r1));
        let r2 = g1.to_raise();
        let g2 = g1.apply(Action::Raise(r2));
        assert!(!g2.must_deal());
        assert!(!g2.is_everyone_alright());
        assert_eq!(g2.turn(), Turn::Choice(0));
        assert!(g2.may_raise() || g2.may_call());
    }

    /// stacks update correctly after fold (before new blinds)
    #[test]
    fn stacks_after_fold() {
        let game = Game::root().apply(Action::Fold);
        assert!(game.must_stop());
        let settlements = game.settlements();
        assert_eq!(settlements[0].pnl().reward(), 0);
        assert_eq!(settlements[1].pnl().reward(), 3);
        assert_eq!(settlements[0].won(), -1);
        assert_eq!(settlements[1].won(), 1);
    }

    /// stacks update correctly after flop fold
    #[test]
    fn stacks_after_flop_bet_fold() {
        let game = Game::root().apply(Action::Call(1)).apply(Action::Check);
        let flop = game.deck().deal(Street::Pref);
        let game = game.apply(Action::Draw(flop));
        let raise = game.to_raise();
        let game = game.apply(Action::Raise(raise));
        let game = game.apply(Action::Fold);
        assert!(game.must_stop());
        let settlements = game.settlements();
        assert_eq!(settlements[0].pnl().reward(), 0);
        assert!(settlements[1].pnl().reward() > 0);
        assert_eq!(settlements[0].won(), -2);
    }

    /// multi-hand with betting, not just folds
    #[test]
    fn multi_hand_with_betting() {
        let g0 = Game::root();
        let g0 = g0.apply(Action::Call(1)).apply(Action::Check);
        let flop = g0.deck().deal(Street::Pref);
        let g0 = g0.apply(Action::Draw(flop));
        let raise = g0.to_raise();
        let g0 = g0.apply(Action::Raise(raise)).apply(Action::Fold);
        let g1 = g0.continuation().unwrap();
        assert_eq!(g1.dealer, 1);
        let r1 = g1.to_raise();
        let g1 = g1.apply(Action::Raise(r1));
        let c1 = g1.to_call();
        let g1 = g1.apply(Action::Call(c1));
        let flop = g1.deck().deal(Street::Pref);
        let g1 = g1.apply(Action::Draw(flop));
        let raise = g1.to_raise();
        let g1 = g1.apply(Action::Raise(raise)).apply(Action::Fold);
        let g2 = g1.continuation().unwrap();
        assert_eq!(g2.dealer, 0);
        assert_eq!(g2.pot(), 3);
    }

    /// legal() returns correct options preflop after blinds
    #[test]
    fn legal_preflop_options() {
        let game = Game::root();
        let legal = game.legal();
        assert!(legal.contains(&Action::Fold));
        assert!(legal.contains(&Action::Call(1)));
        assert!(legal.iter().any(|a| matches!(a, Action::Raise(_))));
        assert!(legal.iter().any(|a| matches!(a, Action::Shove(_))));
        assert!(!legal.contains(&Action::Check));
    }

    /// legal() after limp allows check
    #[test]
    fn legal_bb_can_check() {
        let game = Game::root().apply(Action::Call(1));
        let legal = game.legal();
        assert!(legal.contains(&Action::Check));
        assert!(!legal.contains(&Action::Fold));
    }

    /// legal() on flop
    #[test]
    fn legal_flop_options() {
        let game = Game::root().apply(Action::Call(1)).apply(Action::Check);
        let flop = game.deck().deal(Street::Pref);
        let game = game.apply(Action::Draw(flop));
        let legal = game.legal();
        assert!(legal.contains(&Action::Check));
        assert!(legal.iter().any(|a| matches!(a, Action::Raise(_))));
        assert!(!legal.contains(&Action::Fold));
    }

    /// terminal via river showdown
    #[test]
    fn terminal_river_showdown() {
        let mut game = Game::root().apply(Action::Call(1)).apply(Action::Check);
        for street in [Street::Pref, Street::Flop, Street::Turn] {
            let cards = game.deck().deal(street);
            game = game
                .apply(Action::Draw(cards))
                .apply(Action::Check)
                .apply(Action::Check);
        }
        assert_eq!(game.street(), Street::Rive);
        assert!(game.must_stop());
        assert!(!game.must_deal());
    }

    /// ten consecutive hands alternate dealers correctly
    #[test]
    fn ten_hands_alternation() {
        let mut game = Game::root();
        for i in 0..10 {
            assert_eq!(game.dealer, i % 2);
            assert_eq!(game.turn(), Turn::Choice(game.dealer));
            game = game.apply(Action::Fold).continuation().unwrap();
        }
    }

    /// min raise calculation
    #[test]
    fn min_raise_size() {
        let game = Game::root();
        assert_eq!(game.to_raise(), 3);
        let game = game.apply(Action::Raise(3));
        assert_eq!(game.to_raise(), 4);
    }

    /// pot size tracks correctly through streets
    #[test]
    fn pot_tracking() {
        let game = Game::root();
        assert_eq!(game.pot(), 3);
        let game = game.apply(Action::Call(1));
        assert_eq!(game.pot(), 4);
        let game = game.apply(Action::Raise(4));
        assert_eq!(game.pot(), 8);
        let game = game.apply(Action::Call(4));
        assert_eq!(game.pot(), 12);
    }

    /// cannot continue if player busts
    #[test]
    fn bust_prevents_next() {
        let game = Game::root();
        let shove = game.to_shove();
        let game = game.apply(Action::Shove(shove));
        let shove = game.to_shove();
        let game = game.apply(Action::Shove(shove));
        let mut game = game;
        while !game.must_stop() {
            if game.must_deal() {
                let cards = game.deck().deal(game.street());
                game = game.apply(Action::Draw(cards));
            }
        }
        let rewards: Vec<_> = game
            .settlements()
            .iter()
            .map(|s| s.pnl().reward())
            .collect();
        assert!(rewards.contains(&0) && rewards.contains(&200));
    }

    /// actor_idx wraps correctly with ticker
    #[test]
    fn actor_idx_wrapping() {
        let game = Game::root();
        assert_eq!(game.actor_idx(), 0); // dealer==sb, ticker=2, (0+2)%2=0
        let game = game.apply(Action::Call(1));
        assert_eq!(game.actor_idx(), 1); // ticker=3, (0+3)%2=1
        let game = game.apply(Action::Check);
        // still preflop (no Draw applied yet): wraps back to the dealer
        assert_eq!(game.actor_idx(), 0);
    }

    /// 3-handed: dealer is neither SB nor BB, SB acts first preflop
    #[test]
    fn three_handed_blind_positions() {
        let game = Game::new(&[STACK, STACK, STACK], 0);
        assert_eq!(game.sb_pos(), 1);
        assert_eq!(game.bb_pos(), 2);
        assert_eq!(game.turn(), Turn::Choice(0)); // UTG (seat left of BB) acts first
    }

    /// 3-handed: button rotates one seat at a time
    #[test]
    fn three_handed_button_rotation() {
        let game = Game::new(&[STACK, STACK, STACK], 0);
        let game = game
            .apply(Action::Fold)
            .continuation()
            .expect("all seats still solvent");
        assert_eq!(game.dealer, 1);
        assert_eq!(game.sb_pos(), 2);
        assert_eq!(game.bb_pos(), 0);
    }

    /// 3-handed: action starts left of the button postflop (SB, since
    /// button isn't SB with 3+ players)
    #[test]
    fn three_handed_postflop_actor() {
        let game = Game::new(&[STACK, STACK, STACK], 0);
        // UTG (seat 0) calls, SB (seat 1) calls, BB (seat 2) checks
        let game = game.apply(Action::Call(game.to_call()));
        let game = game.apply(Action::Call(game.to_call()));
        let game = game.apply(Action::Check);
        assert!(game.must_deal());
        let flop = game.deck().deal(Street::Pref);
        let game = game.apply(Action::Draw(flop));
        assert_eq!(game.turn(), Turn::Choice(1)); // SB acts first postflop
    }

    /// six-handed table still constructs and plays a legal opening action
    #[test]
    fn six_handed_constructs() {
        let game = Game::new(&[STACK; 6], 3);
        assert_eq!(game.n(), 6);
        assert_eq!(game.sb_pos(), 4);
        assert_eq!(game.bb_pos(), 5);
        assert!(game.legal().iter().any(|a| matches!(a, Action::Raise(_))));
    }

    /// snap preserves legal actions unchanged
    #[test]
    fn snap_legal_unchanged() {
        let game = Game::root();
        game.legal()
            .iter()
            .inspect(|&&action| assert_eq!(game.snap(action), action))
            .count();
    }

    /// snap coerces oversized raise to shove
    #[test]
    fn snap_raise_to_shove_too_large() {
        let game = Game::root();
        let shove = game.to_shove();
        assert_eq!(game.snap(Action::Raise(Chips::MAX)), game.shove());
        assert_eq!(game.snap(Action::Raise(shove)), game.shove());
    }

    /// snap coerces undersized raise to min-raise
    #[test]
    fn snap_raise_to_minim_too_small() {
        let game = Game::root();
        let minraise = game.to_raise();
        assert_eq!(game.snap(Action::Raise(1)), Action::Raise(minraise));
        assert_eq!(game.snap(Action::Raise(0)), Action::Raise(minraise));
    }

    /// snap coerces fold to check when not facing bet
    #[test]
    fn snap_fold_to_check_not_facing_bet() {
        let game = Game::root().apply(Action::Call(1));
        assert!(!game.may_fold());
        assert!(game.may_check());
        assert_eq!(game.snap(Action::Fold), Action::Check);
    }

    /// snap coerces check to call when facing bet
    #[test]
    fn snap_check_to_call_facing_bet() {
        let game = Game::root();
        assert!(!game.may_check());
        assert!(game.may_call());
        assert_eq!(game.snap(Action::Check), game.calls());
    }
}

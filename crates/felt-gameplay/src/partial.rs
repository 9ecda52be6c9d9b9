use super::*;
use felt_cards::Hole;
use felt_core::Position;

/// A single seat's view of a hand in progress: its own hole cards visible,
/// every other seat's cards hidden behind [`Hole::hidden`].
///
/// Built by a table actor for each prompt/notification so a player (human or
/// NPC) never receives information it isn't entitled to, while still
/// implementing [`Recall`] so the rest of the replay machinery (`head()`,
/// `states()`, `aggression()`, `choices()`) works unchanged from this seat's
/// perspective.
#[derive(Debug, Clone)]
pub struct Partial {
    hero: Position,
    root: Game,
    actions: Vec<Action>,
}

impl Partial {
    pub fn new(hero: Position, root: Game, actions: Vec<Action>) -> Self {
        Self {
            hero,
            root,
            actions,
        }
    }
    /// Builds a viewpoint from a root game, hiding every seat's cards except
    /// `hero`'s.
    pub fn masked(hero: Position, root: Game, actions: Vec<Action>) -> Self {
        let root = root.assume(Turn::Choice(hero), Hole::hidden());
        Self::new(hero, root, actions)
    }
    pub fn hero(&self) -> Position {
        self.hero
    }
    /// Position of the last seat to take an aggressive action, if any.
    pub fn aggressor(&self) -> Option<Position> {
        self.states()
            .iter()
            .zip(self.complete().iter())
            .rev()
            .find(|(_, a)| a.is_aggro())
            .and_then(|(g, _)| match g.turn() {
                Turn::Choice(p) => Some(p),
                _ => None,
            })
    }
}

impl Recall for Partial {
    fn root(&self) -> Game {
        self.root.clone()
    }
    fn actions(&self) -> &[Action] {
        &self.actions
    }
}

impl std::fmt::Display for Partial {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.head())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_core::STACK;

    #[test]
    fn masked_hides_other_seats() {
        let root = Game::new(&[STACK, STACK], 0);
        let partial = Partial::masked(0, root.clone(), Vec::new());
        assert_ne!(partial.root().seats()[1].cards(), root.seats()[1].cards());
        assert_eq!(partial.root().seats()[0].cards(), root.seats()[0].cards());
    }

    #[test]
    fn choices_match_root_when_no_actions_taken() {
        let root = Game::new(&[STACK, STACK], 0);
        let partial = Partial::masked(0, root.clone(), Vec::new());
        assert_eq!(partial.choices(), root.legal());
    }
}

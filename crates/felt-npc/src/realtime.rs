//! Rule-based brain biased by a persona's style scalars.
use felt_core::Chips;
use felt_gameplay::*;
use felt_gameroom::*;
use rand::Rng;

/// Five bounded (`0.0..=1.0`) scalars loaded from a persona's registry
/// entry. A minimal rule brain uses these to bias action frequency and
/// sizing; it never touches engine state beyond the legal-action set it's
/// handed.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Style {
    /// How often a raise/shove is preferred over calling or checking.
    pub aggression: f32,
    /// How willing the brain is to continue with a marginal hand.
    pub looseness: f32,
    /// How often it shoves instead of sizing down, independent of hand strength.
    pub bluff: f32,
    /// How long it's willing to call rather than raise or fold.
    pub patience: f32,
    /// Where in the legal raise-to range it lands: 0.0 min-raise, 1.0 shove.
    pub sizing: f32,
}

impl Style {
    pub fn new(aggression: f32, looseness: f32, bluff: f32, patience: f32, sizing: f32) -> Self {
        Self {
            aggression,
            looseness,
            bluff,
            patience,
            sizing,
        }
        .clamped()
    }
    fn clamped(self) -> Self {
        let c = |v: f32| v.clamp(0.0, 1.0);
        Self {
            aggression: c(self.aggression),
            looseness: c(self.looseness),
            bluff: c(self.bluff),
            patience: c(self.patience),
            sizing: c(self.sizing),
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            aggression: 0.5,
            looseness: 0.5,
            bluff: 0.15,
            patience: 0.5,
            sizing: 0.4,
        }
    }
}

/// NPC brain parameterized by a [`Style`]. Never sees anything beyond the
/// masked [`Partial`] view the table actor hands it; determinism for a
/// given persona seed follows from `rand::rng()`'s caller-visible sequence
/// being the only source of randomness -- the think delay below only
/// postpones when the decision is submitted, not what it is.
pub struct RuleBrain {
    style: Style,
    think_delay: std::time::Duration,
}

impl RuleBrain {
    pub fn new(style: Style) -> Self {
        Self {
            style,
            think_delay: std::time::Duration::ZERO,
        }
    }
    /// Attaches a persona's think delay. The actor's own mailbox loop
    /// (`Actor::spawn`) already runs each player on its own task, so
    /// sleeping here only ever blocks this seat's decision, never the
    /// table.
    pub fn with_think_delay(mut self, delay: std::time::Duration) -> Self {
        self.think_delay = delay;
        self
    }
    fn act(&self, game: &Game) -> Action {
        let legal = game.legal();
        let has = |pred: fn(&Action) -> bool| legal.iter().any(pred);
        let ref mut rng = rand::rng();

        if has(|a| matches!(a, Action::Raise(_) | Action::Shove(_)))
            && rng.random::<f32>() < self.style.aggression * 0.5
        {
            return self.size(game, &legal, rng);
        }
        if has(|a| matches!(a, Action::Check)) {
            return Action::Check;
        }
        if has(|a| matches!(a, Action::Call(_))) {
            let continues = self.style.looseness.max(self.style.patience * 0.5);
            if rng.random::<f32>() < continues {
                return legal
                    .iter()
                    .copied()
                    .find(|a| matches!(a, Action::Call(_)))
                    .expect("checked above");
            }
        }
        Action::Fold
    }
    fn size(&self, game: &Game, legal: &[Action], rng: &mut impl Rng) -> Action {
        let min = game.to_raise();
        let max = game.to_shove();
        let bluff_shove = rng.random::<f32>() < self.style.bluff * 0.2;
        if bluff_shove || min >= max {
            return legal
                .iter()
                .copied()
                .find(|a| matches!(a, Action::Shove(_)))
                .unwrap_or(Action::Raise(max));
        }
        let span = (max - min) as f32 * self.style.sizing;
        Action::Raise((min as f32 + span) as Chips)
    }
}

#[async_trait::async_trait]
impl Player for RuleBrain {
    async fn notify(&mut self, _event: &Event) {}
    async fn decide(&mut self, recall: &Partial) -> Action {
        if !self.think_delay.is_zero() {
            tokio::time::sleep(self.think_delay).await;
        }
        self.act(&recall.head())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_clamps_out_of_range_scalars() {
        let style = Style::new(2.0, -1.0, 0.5, 0.5, 1.5);
        assert_eq!(style.aggression, 1.0);
        assert_eq!(style.looseness, 0.0);
        assert_eq!(style.sizing, 1.0);
    }

    #[tokio::test]
    async fn rule_brain_always_picks_a_legal_action() {
        let root = Game::new(&[felt_core::STACK, felt_core::STACK], 0);
        let hero = match root.turn() {
            Turn::Choice(pos) => pos,
            _ => panic!("root should be a choice node"),
        };
        let recall = Partial::masked(hero, root.clone(), Vec::new());
        let mut brain = RuleBrain::new(Style::default());
        let action = brain.decide(&recall).await;
        assert!(root.legal().contains(&action));
    }

    #[tokio::test]
    async fn think_delay_postpones_but_never_changes_the_decision() {
        let root = Game::new(&[felt_core::STACK, felt_core::STACK], 0);
        let hero = match root.turn() {
            Turn::Choice(pos) => pos,
            _ => panic!("root should be a choice node"),
        };
        let recall = Partial::masked(hero, root.clone(), Vec::new());
        let delay = std::time::Duration::from_millis(20);
        let mut brain = RuleBrain::new(Style::default()).with_think_delay(delay);
        let started = std::time::Instant::now();
        let action = brain.decide(&recall).await;
        assert!(started.elapsed() >= delay);
        assert!(root.legal().contains(&action));
    }
}

use felt_gameplay::*;
use felt_gameroom::*;
use rand::seq::IndexedRandom;

/// Random player for testing and simulation: chooses uniformly among legal
/// actions with no regard for hand strength.
pub struct Fish;

#[async_trait::async_trait]
impl Player for Fish {
    async fn decide(&mut self, recall: &Partial) -> Action {
        let ref mut rng = rand::rng();
        recall
            .head()
            .legal()
            .choose(rng)
            .copied()
            .expect("non empty legal actions conditional on being asked to move")
    }
    async fn notify(&mut self, _: &Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fish_always_picks_a_legal_action() {
        let root = Game::new(&[felt_core::STACK, felt_core::STACK], 0);
        let hero = match root.turn() {
            Turn::Choice(pos) => pos,
            _ => panic!("root should be a choice node"),
        };
        let recall = Partial::masked(hero, root.clone(), Vec::new());
        let mut fish = Fish;
        let action = fish.decide(&recall).await;
        assert!(root.legal().contains(&action));
    }
}

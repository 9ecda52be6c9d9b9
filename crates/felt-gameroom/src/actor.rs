use super::event::Event;
use super::player::Player;
use tokio::sync::mpsc::UnboundedSender;

/// Bridges a [`Player`] into the engine's shared response channel.
///
/// Each seated player gets its own inbox task: events land there, get
/// `notify`d to the player, and — for [`Event::Decision`] — the player's
/// answer is sent back into the engine's shared channel tagged with this
/// seat's index. The engine never calls a player directly; it only ever
/// writes to the sender this returns.
pub struct Actor;

impl Actor {
    pub fn spawn(
        seat: usize,
        mut player: Box<dyn Player>,
        reply: UnboundedSender<(usize, Event)>,
    ) -> UnboundedSender<Event> {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Event>();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                player.notify(&event).await;
                if let Event::Decision { hand, ref recall } = event {
                    let action = player.decide(recall).await;
                    let pot = recall.head().pot();
                    let response = Event::Action {
                        hand,
                        seat,
                        action,
                        pot,
                    };
                    if reply.send((seat, response)).is_err() {
                        break;
                    }
                }
            }
            log::debug!("[actor] P{} inbox closed", seat);
        });
        tx
    }
}

use super::event::Event;

/// A JSON-encodable wire message. Kept as a bare `serde_json::Value` rather
/// than a tagged enum so the gateway crate doesn't need to depend on every
/// domain type just to forward bytes to a WebSocket.
#[derive(Debug, Clone)]
pub struct ServerMessage(serde_json::Value);

impl ServerMessage {
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }
    /// The out-of-band greeting sent the moment a bridge attaches, before
    /// any table event has fired. Not itself an [`Event`] -- it carries no
    /// hand state, just the table id the socket is now attached to.
    pub fn connected(table: &str) -> Self {
        Self(serde_json::json!({
            "type": "connected",
            "table": table,
        }))
    }
}

/// Translates internal [`Event`]s into the wire schema. Inverse of
/// deserializing a client's submitted action string (see
/// [`Action::try_from`](felt_gameplay::Action)).
pub struct Protocol;

impl Protocol {
    /// Encodes an event for transport. Returns `None` only for events with
    /// no wire representation (there currently are none, but callers should
    /// not assume every variant is terminal).
    pub fn encode(event: &Event) -> Option<ServerMessage> {
        let body = match event {
            Event::HandStart {
                hand,
                dealer,
                stacks,
            } => serde_json::json!({
                "type": "hand_start",
                "hand": hand,
                "dealer": dealer,
                "stacks": stacks,
            }),
            Event::HoleCards { hand, hole } => serde_json::json!({
                "type": "hole_cards",
                "hand": hand,
                "hole": hole.to_string(),
            }),
            Event::Board { hand, street, board } => serde_json::json!({
                "type": "board",
                "hand": hand,
                "street": street.to_string(),
                "board": board.to_string(),
            }),
            Event::Action {
                hand,
                seat,
                action,
                pot,
            } => serde_json::json!({
                "type": "action",
                "hand": hand,
                "seat": seat,
                "action": action.to_string(),
                "pot": pot,
            }),
            Event::Decision { hand, recall } => serde_json::json!({
                "type": "action_prompt",
                "hand": hand,
                "seat": recall.hero(),
            }),
            Event::Reveal { hand, seat, hole } => serde_json::json!({
                "type": "reveal",
                "hand": hand,
                "seat": seat,
                "hole": hole.map(|h| h.to_string()),
            }),
            Event::HandEnd {
                hand,
                winners,
                excess_seat,
                excess_amount,
            } => serde_json::json!({
                "type": "hand_end",
                "hand": hand,
                "winners": winners,
                "excess_seat": excess_seat,
                "excess_amount": excess_amount,
            }),
            Event::Disconnect(seat) => serde_json::json!({
                "type": "disconnect",
                "seat": seat,
            }),
        };
        Some(ServerMessage(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use felt_gameplay::Action;

    #[test]
    fn encodes_action_event_with_readable_action_string() {
        let event = Event::Action {
            hand: 1,
            seat: 0,
            action: Action::Call(100),
            pot: 300,
        };
        let json = Protocol::encode(&event).unwrap().to_json();
        assert!(json.contains("CALL 100"));
    }
}

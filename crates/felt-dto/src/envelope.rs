use felt_core::Chips;
use felt_core::Position;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Header carried by every envelope: which table, its place in the per-table
/// broadcast order, and when the server stamped it.
///
/// `server_seq` is monotonic per table and starts at 1; `0` is reserved for
/// the bootstrap snapshot taken before a hand's first real event (see the
/// replay engine's pre-start snapshot) and never appears on the broadcast
/// ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeHeader {
    pub table_id: uuid::Uuid,
    pub server_seq: u64,
    pub server_ts_ms: i64,
}

/// One seat as rendered for a client: chair index, display name, stack, and
/// whether they're still in the current hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub chair: Position,
    pub user_id: String,
    pub name: String,
    pub stack: Chips,
    pub is_active: bool,
}

/// A player's best-five evaluation, shown at showdown or replay river.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandResult {
    pub chair: Position,
    pub hand_type: String,
    pub hand_score: i32,
    pub hand_cards: Vec<String>,
    pub best_five: Vec<String>,
    pub is_winner: bool,
    pub win_amount: Chips,
    pub showed: bool,
    pub mucked: bool,
}

/// One pot (main or side) and who split it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotResult {
    pub amount: Chips,
    pub winners: Vec<Position>,
    pub win_amounts: Vec<Chips>,
}

/// What a client may legally do right now, so the UI can build controls
/// without guessing at bet sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedState {
    pub action_chair: Option<Position>,
    pub legal_actions: Vec<String>,
    pub min_raise_to: Option<Chips>,
    pub call_amount: Option<Chips>,
    pub phase: Option<String>,
}

/// The shared wire event emitted by both the live table actor and the
/// replay engine. Every table-scoped variant carries an [`EnvelopeHeader`];
/// `LoginResponse` is the one auth-adjacent variant that rides the same
/// envelope so the gateway can push it down the same WebSocket frame type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEnvelope {
    TableSnapshot {
        header: EnvelopeHeader,
        seats: Vec<SeatView>,
        board: Vec<String>,
        pot: Chips,
        dealer_chair: Position,
    },
    SeatUpdate {
        header: EnvelopeHeader,
        seat: SeatView,
    },
    HandStart {
        header: EnvelopeHeader,
        hand_id: String,
        dealer_chair: Position,
        stacks: BTreeMap<Position, Chips>,
    },
    DealHoleCards {
        header: EnvelopeHeader,
        chair: Position,
        hole: [String; 2],
    },
    ActionPrompt {
        header: EnvelopeHeader,
        expected: ExpectedState,
    },
    ActionResult {
        header: EnvelopeHeader,
        chair: Position,
        action: String,
        amount_to: Chips,
        stack: Chips,
        current_bet: Chips,
        pot: Chips,
    },
    DealBoard {
        header: EnvelopeHeader,
        street: String,
        cards: Vec<String>,
    },
    PotUpdate {
        header: EnvelopeHeader,
        pots: Vec<PotResult>,
    },
    PhaseChange {
        header: EnvelopeHeader,
        phase: String,
        river_rank: Option<String>,
        river_score: Option<i32>,
    },
    WinByFold {
        header: EnvelopeHeader,
        winner_chair: Position,
        amount: Chips,
    },
    Showdown {
        header: EnvelopeHeader,
        results: Vec<HandResult>,
    },
    HandEnd {
        header: EnvelopeHeader,
        pot_results: Vec<PotResult>,
        player_results: Vec<HandResult>,
        excess_chair: Option<Position>,
        excess_amount: Chips,
    },
    Error {
        header: EnvelopeHeader,
        reason: String,
        message: String,
        expected: Option<ExpectedState>,
    },
    LoginResponse {
        header: EnvelopeHeader,
        user_id: String,
        token: String,
    },
    StoryProgress {
        header: EnvelopeHeader,
        chapter: String,
        complete: bool,
    },
}

impl ServerEnvelope {
    pub fn header(&self) -> &EnvelopeHeader {
        match self {
            Self::TableSnapshot { header, .. }
            | Self::SeatUpdate { header, .. }
            | Self::HandStart { header, .. }
            | Self::DealHoleCards { header, .. }
            | Self::ActionPrompt { header, .. }
            | Self::ActionResult { header, .. }
            | Self::DealBoard { header, .. }
            | Self::PotUpdate { header, .. }
            | Self::PhaseChange { header, .. }
            | Self::WinByFold { header, .. }
            | Self::Showdown { header, .. }
            | Self::HandEnd { header, .. }
            | Self::Error { header, .. }
            | Self::LoginResponse { header, .. }
            | Self::StoryProgress { header, .. } => header,
        }
    }
    /// Mutable access to the header, so a sender can stamp `server_seq`
    /// after the envelope body is already built.
    pub fn header_mut(&mut self) -> &mut EnvelopeHeader {
        match self {
            Self::TableSnapshot { header, .. }
            | Self::SeatUpdate { header, .. }
            | Self::HandStart { header, .. }
            | Self::DealHoleCards { header, .. }
            | Self::ActionPrompt { header, .. }
            | Self::ActionResult { header, .. }
            | Self::DealBoard { header, .. }
            | Self::PotUpdate { header, .. }
            | Self::PhaseChange { header, .. }
            | Self::WinByFold { header, .. }
            | Self::Showdown { header, .. }
            | Self::HandEnd { header, .. }
            | Self::Error { header, .. }
            | Self::LoginResponse { header, .. }
            | Self::StoryProgress { header, .. } => header,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_through_json() {
        let header = EnvelopeHeader {
            table_id: uuid::Uuid::nil(),
            server_seq: 1,
            server_ts_ms: 1,
        };
        let envelope = ServerEnvelope::WinByFold {
            header,
            winner_chair: 2,
            amount: 150,
        };
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("\"type\":\"WinByFold\""));
        let back: ServerEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.header().server_seq, 1);
    }
}

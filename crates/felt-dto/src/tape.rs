use crate::ServerEnvelope;
use serde::Serialize;

/// The deterministic output of the replay engine: the same envelope stream
/// a live table would have broadcast for this hand, linearized with a
/// monotonic per-tape sequence number.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayTape {
    pub tape_version: u32,
    pub table_id: uuid::Uuid,
    pub hero_chair: usize,
    pub events: Vec<TapeEvent>,
}

impl ReplayTape {
    pub const VERSION: u32 = 1;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TapeEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub seq: u64,
    pub envelope: ServerEnvelope,
    pub envelope_b64: String,
}

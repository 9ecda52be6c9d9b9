use felt_core::Chips;
use felt_core::Position;
use serde::Deserialize;
use serde::Serialize;

/// Deterministic replay input: one hand's full starting condition and its
/// scripted action sequence. Deserialized straight off `POST
/// /api/replay/hands`-style request bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandSpec {
    #[serde(default = "default_variant")]
    pub variant: String,
    pub table: Option<String>,
    pub dealer_chair: Position,
    pub seats: Vec<SeatSpec>,
    #[serde(default)]
    pub board: Option<BoardSpec>,
    #[serde(default)]
    pub deck: Option<Vec<String>>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    #[serde(default)]
    pub rng: Option<RngSpec>,
}

fn default_variant() -> String {
    "NLH".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSpec {
    pub chair: Position,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub stack: Chips,
    #[serde(default)]
    pub is_hero: Option<bool>,
    #[serde(default)]
    pub hole: Option<[String; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSpec {
    #[serde(default)]
    pub flop: Option<[String; 3]>,
    #[serde(default)]
    pub turn: Option<String>,
    #[serde(default)]
    pub river: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSpec {
    pub phase: String,
    pub chair: Position,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount_to: Chips,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngSpec {
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_defaults_to_nlh_when_absent() {
        let spec: HandSpec = serde_json::from_str(
            r#"{"dealerChair":0,"seats":[{"chair":0,"stack":100},{"chair":1,"stack":100}]}"#,
        )
        .unwrap();
        assert_eq!(spec.variant, "NLH");
        assert_eq!(spec.seats.len(), 2);
    }
}

use super::*;
use felt_core::*;

/// Namespace an envelope was produced in.
///
/// `Sandbox` rows always carry a non-empty scenario id; `Live` and `Replay`
/// rows never do. This is enforced at construction so a malformed row can
/// never reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Live,
    Replay,
    Sandbox,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Replay => write!(f, "replay"),
            Self::Sandbox => write!(f, "sandbox"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live" => Ok(Self::Live),
            "replay" => Ok(Self::Replay),
            "sandbox" => Ok(Self::Sandbox),
            other => anyhow::bail!("unknown source {other}"),
        }
    }
}

/// One append-only row in the event ledger.
///
/// Uniquely keyed by `(source, scenario, hand, seq)`; re-inserting the same
/// key is expected to be a no-op for `live`/`sandbox` writers and an upsert
/// for `replay` writers (see [`LedgerEvent::key`]).
#[derive(Debug, Clone)]
pub struct LedgerEvent {
    source: Source,
    scenario: String,
    hand: ID<Hand>,
    seq: u64,
    event_type: String,
    envelope_b64: String,
    server_ts_ms: i64,
}

impl LedgerEvent {
    pub fn new(
        source: Source,
        scenario: impl Into<String>,
        hand: ID<Hand>,
        seq: u64,
        event_type: impl Into<String>,
        envelope_b64: impl Into<String>,
        server_ts_ms: i64,
    ) -> anyhow::Result<Self> {
        let scenario = scenario.into();
        match source {
            Source::Sandbox if scenario.is_empty() => {
                anyhow::bail!("sandbox events require a non-empty scenario id")
            }
            Source::Live | Source::Replay if !scenario.is_empty() => {
                anyhow::bail!("only sandbox events may carry a scenario id")
            }
            _ => {}
        }
        Ok(Self {
            source,
            scenario,
            hand,
            seq,
            event_type: event_type.into(),
            envelope_b64: envelope_b64.into(),
            server_ts_ms,
        })
    }
    pub fn source(&self) -> Source {
        self.source
    }
    pub fn scenario(&self) -> &str {
        &self.scenario
    }
    pub fn hand(&self) -> ID<Hand> {
        self.hand
    }
    pub fn seq(&self) -> u64 {
        self.seq
    }
    pub fn event_type(&self) -> &str {
        &self.event_type
    }
    pub fn envelope_b64(&self) -> &str {
        &self.envelope_b64
    }
    pub fn server_ts_ms(&self) -> i64 {
        self.server_ts_ms
    }
    /// The uniqueness key: `(source, scenario, hand, seq)`.
    pub fn key(&self) -> (Source, String, ID<Hand>, u64) {
        (self.source, self.scenario.clone(), self.hand, self.seq)
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use felt_db::*;

    impl Schema for LedgerEvent {
        fn name() -> &'static str {
            LEDGER_EVENT_STREAM
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::TEXT,
                tokio_postgres::types::Type::TEXT,
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::INT8,
                tokio_postgres::types::Type::TEXT,
                tokio_postgres::types::Type::TEXT,
                tokio_postgres::types::Type::INT8,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                LEDGER_EVENT_STREAM,
                " (
                    source        TEXT NOT NULL,
                    scenario_id   TEXT NOT NULL DEFAULT '',
                    hand_id       UUID NOT NULL,
                    seq           BIGINT NOT NULL,
                    event_type    TEXT NOT NULL,
                    envelope_b64  TEXT NOT NULL,
                    server_ts_ms  BIGINT NOT NULL,
                    created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
                    PRIMARY KEY (source, scenario_id, hand_id, seq)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_ledger_hand ON ",
                LEDGER_EVENT_STREAM,
                " (hand_id);"
            )
        }
        fn copy() -> &'static str {
            unimplemented!()
        }
        fn truncates() -> &'static str {
            const_format::concatcp!("TRUNCATE TABLE ", LEDGER_EVENT_STREAM, ";")
        }
        fn freeze() -> &'static str {
            unimplemented!()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_requires_scenario() {
        let hand = ID::default();
        assert!(LedgerEvent::new(Source::Sandbox, "", hand, 1, "HandStart", "", 0).is_err());
        assert!(LedgerEvent::new(Source::Sandbox, "exp-1", hand, 1, "HandStart", "", 0).is_ok());
    }

    #[test]
    fn live_rejects_scenario() {
        let hand = ID::default();
        assert!(LedgerEvent::new(Source::Live, "exp-1", hand, 1, "HandStart", "", 0).is_err());
    }

    #[test]
    fn source_roundtrips_through_text() {
        use std::str::FromStr;
        for source in [Source::Live, Source::Replay, Source::Sandbox] {
            assert_eq!(Source::from_str(&source.to_string()).unwrap(), source);
        }
    }

    #[test]
    fn key_distinguishes_namespace() {
        let hand = ID::default();
        let live = LedgerEvent::new(Source::Live, "", hand, 1, "HandStart", "", 0).unwrap();
        let replay = LedgerEvent::new(Source::Replay, "", hand, 1, "HandStart", "", 0).unwrap();
        assert_ne!(live.key(), replay.key());
    }
}

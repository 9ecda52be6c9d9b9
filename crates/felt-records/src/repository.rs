use super::*;
use felt_auth::Member;
use felt_core::ID;
use felt_db::*;
use std::str::FromStr;
use std::sync::Arc;
use tokio_postgres::Client;

/// Repository trait for the ledger and per-user audit projection.
#[allow(async_fn_in_trait)]
pub trait AuditRepository {
    async fn append(&self, event: &LedgerEvent) -> Result<(), PgErr>;
    async fn events(&self, source: Source, hand: ID<Hand>) -> Result<Vec<LedgerEvent>, PgErr>;
    async fn upsert_audit(&self, item: &AuditHistoryItem) -> Result<(), PgErr>;
    async fn recent(
        &self,
        user: ID<Member>,
        source: Source,
        limit: i64,
    ) -> Result<Vec<AuditHistoryItem>, PgErr>;
    async fn audit_hand(
        &self,
        user: ID<Member>,
        source: Source,
        hand: ID<Hand>,
    ) -> Result<Option<AuditHistoryItem>, PgErr>;
    async fn saved_count(&self, user: ID<Member>, source: Source) -> Result<i64, PgErr>;
    async fn set_saved(
        &self,
        user: ID<Member>,
        source: Source,
        hand: ID<Hand>,
        saved: bool,
        at: i64,
    ) -> Result<(), PgErr>;
}

impl AuditRepository for Arc<Client> {
    async fn append(&self, event: &LedgerEvent) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                LEDGER_EVENT_STREAM,
                " (source, scenario_id, hand_id, seq, event_type, envelope_b64, server_ts_ms)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (source, scenario_id, hand_id, seq) DO UPDATE SET
                     event_type = EXCLUDED.event_type,
                     envelope_b64 = EXCLUDED.envelope_b64,
                     server_ts_ms = EXCLUDED.server_ts_ms"
            ),
            &[
                &event.source().to_string(),
                &event.scenario(),
                &event.hand().inner(),
                &(event.seq() as i64),
                &event.event_type(),
                &event.envelope_b64(),
                &event.server_ts_ms(),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn events(&self, source: Source, hand: ID<Hand>) -> Result<Vec<LedgerEvent>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT source, scenario_id, hand_id, seq, event_type, envelope_b64, server_ts_ms FROM ",
                LEDGER_EVENT_STREAM,
                " WHERE source = $1 AND hand_id = $2 ORDER BY seq"
            ),
            &[&source.to_string(), &hand.inner()],
        )
        .await
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    let source = Source::from_str(row.get::<_, &str>(0)).expect("stored source");
                    LedgerEvent::new(
                        source,
                        row.get::<_, String>(1),
                        ID::from(row.get::<_, uuid::Uuid>(2)),
                        row.get::<_, i64>(3) as u64,
                        row.get::<_, String>(4),
                        row.get::<_, String>(5),
                        row.get::<_, i64>(6),
                    )
                    .expect("stored event satisfies its own invariants")
                })
                .collect()
        })
    }

    async fn upsert_audit(&self, item: &AuditHistoryItem) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                AUDIT_USER_HAND_HISTORY,
                " (user_id, source, hand_id, played_at, summary_json, tape_blob, is_saved, saved_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 ON CONFLICT (user_id, source, hand_id) DO UPDATE SET
                     summary_json = EXCLUDED.summary_json,
                     tape_blob = EXCLUDED.tape_blob"
            ),
            &[
                &item.user().inner(),
                &item.source().to_string(),
                &item.hand().inner(),
                &item.played_at(),
                &item.summary_json(),
                &item.tape_blob(),
                &item.is_saved(),
                &item.saved_at(),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn recent(
        &self,
        user: ID<Member>,
        source: Source,
        limit: i64,
    ) -> Result<Vec<AuditHistoryItem>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT user_id, source, hand_id, played_at, summary_json, tape_blob, is_saved, saved_at FROM ",
                AUDIT_USER_HAND_HISTORY,
                " WHERE user_id = $1 AND source = $2 ORDER BY played_at DESC LIMIT $3"
            ),
            &[&user.inner(), &source.to_string(), &limit],
        )
        .await
        .map(|rows| rows.iter().map(row_to_audit_item).collect())
    }

    async fn audit_hand(
        &self,
        user: ID<Member>,
        source: Source,
        hand: ID<Hand>,
    ) -> Result<Option<AuditHistoryItem>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT user_id, source, hand_id, played_at, summary_json, tape_blob, is_saved, saved_at FROM ",
                AUDIT_USER_HAND_HISTORY,
                " WHERE user_id = $1 AND source = $2 AND hand_id = $3"
            ),
            &[&user.inner(), &source.to_string(), &hand.inner()],
        )
        .await
        .map(|opt| opt.as_ref().map(row_to_audit_item))
    }

    async fn saved_count(&self, user: ID<Member>, source: Source) -> Result<i64, PgErr> {
        self.query_one(
            const_format::concatcp!(
                "SELECT count(*) FROM ",
                AUDIT_USER_HAND_HISTORY,
                " WHERE user_id = $1 AND source = $2 AND is_saved = TRUE"
            ),
            &[&user.inner(), &source.to_string()],
        )
        .await
        .map(|row| row.get(0))
    }

    async fn set_saved(
        &self,
        user: ID<Member>,
        source: Source,
        hand: ID<Hand>,
        saved: bool,
        at: i64,
    ) -> Result<(), PgErr> {
        let saved_at: Option<i64> = saved.then_some(at);
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                AUDIT_USER_HAND_HISTORY,
                " SET is_saved = $4, saved_at = $5 WHERE user_id = $1 AND source = $2 AND hand_id = $3"
            ),
            &[
                &user.inner(),
                &source.to_string(),
                &hand.inner(),
                &saved,
                &saved_at,
            ],
        )
        .await
        .map(|_| ())
    }
}

fn row_to_audit_item(row: &tokio_postgres::Row) -> AuditHistoryItem {
    AuditHistoryItem::hydrate(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        Source::from_str(row.get::<_, &str>(1)).expect("stored source"),
        ID::from(row.get::<_, uuid::Uuid>(2)),
        row.get::<_, i64>(3),
        row.get::<_, String>(4),
        row.get::<_, Option<String>>(5),
        row.get::<_, bool>(6),
        row.get::<_, Option<i64>>(7),
        row.get::<_, i64>(3),
    )
}

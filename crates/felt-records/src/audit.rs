use super::*;
use felt_auth::Member;
use felt_core::*;

/// A limit was already reached and a save/trim refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditError {
    SavedLimitReached,
}

impl std::fmt::Display for AuditError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::SavedLimitReached => write!(f, "saved hand limit reached"),
        }
    }
}
impl std::error::Error for AuditError {}

/// One user's record of one played hand, from that user's point of view.
///
/// Unique per `(user, source, hand)`. `Source::Sandbox` never appears here —
/// sandbox tapes are not part of a user's audit trail.
#[derive(Debug, Clone)]
pub struct AuditHistoryItem {
    user: ID<Member>,
    source: Source,
    hand: ID<Hand>,
    played_at: i64,
    summary_json: String,
    tape_blob: Option<String>,
    is_saved: bool,
    saved_at: Option<i64>,
    updated_at: i64,
}

impl AuditHistoryItem {
    pub fn new(
        user: ID<Member>,
        source: Source,
        hand: ID<Hand>,
        played_at: i64,
        summary_json: impl Into<String>,
    ) -> Self {
        assert!(source != Source::Sandbox, "sandbox hands are not audited");
        Self {
            user,
            source,
            hand,
            played_at,
            summary_json: summary_json.into(),
            tape_blob: None,
            is_saved: false,
            saved_at: None,
            updated_at: played_at,
        }
    }
    pub fn with_tape(mut self, tape_blob: impl Into<String>) -> Self {
        self.tape_blob = Some(tape_blob.into());
        self
    }
    pub fn user(&self) -> ID<Member> {
        self.user
    }
    pub fn source(&self) -> Source {
        self.source
    }
    pub fn hand(&self) -> ID<Hand> {
        self.hand
    }
    pub fn played_at(&self) -> i64 {
        self.played_at
    }
    pub fn tape_blob(&self) -> Option<&str> {
        self.tape_blob.as_deref()
    }
    pub fn is_saved(&self) -> bool {
        self.is_saved
    }
    pub fn summary_json(&self) -> &str {
        &self.summary_json
    }
    pub fn saved_at(&self) -> Option<i64> {
        self.saved_at
    }
    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }
    /// Reassembles a row fetched from storage. Bypasses the `Sandbox`
    /// assertion in [`Self::new`] since the row already passed it once.
    #[allow(clippy::too_many_arguments)]
    pub fn hydrate(
        user: ID<Member>,
        source: Source,
        hand: ID<Hand>,
        played_at: i64,
        summary_json: String,
        tape_blob: Option<String>,
        is_saved: bool,
        saved_at: Option<i64>,
        updated_at: i64,
    ) -> Self {
        Self {
            user,
            source,
            hand,
            played_at,
            summary_json,
            tape_blob,
            is_saved,
            saved_at,
            updated_at,
        }
    }
    /// Pins this hand against quota trimming. Fails once the caller already
    /// has `saved_limit` hands pinned.
    pub fn pin(&mut self, saved_count: usize, saved_limit: usize, now: i64) -> Result<(), AuditError> {
        if self.is_saved {
            return Ok(());
        }
        if saved_count >= saved_limit {
            return Err(AuditError::SavedLimitReached);
        }
        self.is_saved = true;
        self.saved_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
    pub fn unpin(&mut self, now: i64) {
        self.is_saved = false;
        self.saved_at = None;
        self.updated_at = now;
    }
}

/// Drops the oldest unsaved rows (by `played_at`) until at most
/// `recent_limit` unsaved rows remain. Saved rows are exempt and never
/// counted against the limit.
///
/// Mirrors the quota bound in the testable-properties list: after any
/// sequence of hand completions, the unsaved count per `(user, source)`
/// never exceeds `recent_limit`.
pub fn enforce_recent_quota(rows: &mut Vec<AuditHistoryItem>, recent_limit: usize) {
    let mut unsaved: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_saved())
        .map(|(i, _)| i)
        .collect();
    if unsaved.len() <= recent_limit {
        return;
    }
    unsaved.sort_by_key(|&i| rows[i].played_at());
    let drop = unsaved.len() - recent_limit;
    let mut to_drop: Vec<usize> = unsaved.into_iter().take(drop).collect();
    to_drop.sort_unstable_by(|a, b| b.cmp(a));
    for i in to_drop {
        rows.remove(i);
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use felt_db::*;

    impl Schema for AuditHistoryItem {
        fn name() -> &'static str {
            AUDIT_USER_HAND_HISTORY
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::TEXT,
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::INT8,
                tokio_postgres::types::Type::TEXT,
                tokio_postgres::types::Type::TEXT,
                tokio_postgres::types::Type::BOOL,
                tokio_postgres::types::Type::INT8,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                AUDIT_USER_HAND_HISTORY,
                " (
                    user_id       UUID NOT NULL REFERENCES ",
                USERS,
                "(id),
                    source        TEXT NOT NULL,
                    hand_id       UUID NOT NULL,
                    played_at     BIGINT NOT NULL,
                    summary_json  TEXT NOT NULL,
                    tape_blob     TEXT,
                    is_saved      BOOLEAN NOT NULL DEFAULT FALSE,
                    saved_at      BIGINT,
                    PRIMARY KEY (user_id, source, hand_id)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_audit_user_recent ON ",
                AUDIT_USER_HAND_HISTORY,
                " (user_id, source, played_at);"
            )
        }
        fn copy() -> &'static str {
            unimplemented!()
        }
        fn truncates() -> &'static str {
            const_format::concatcp!("TRUNCATE TABLE ", AUDIT_USER_HAND_HISTORY, ";")
        }
        fn freeze() -> &'static str {
            unimplemented!()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(user: ID<Member>, played_at: i64) -> AuditHistoryItem {
        AuditHistoryItem::new(user, Source::Live, ID::default(), played_at, "{}")
    }

    #[test]
    fn trims_oldest_unsaved_past_limit() {
        let user = ID::default();
        let mut rows: Vec<_> = (0..6).map(|i| item(user, i)).collect();
        enforce_recent_quota(&mut rows, 5);
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.played_at() > 0));
    }

    #[test]
    fn saved_rows_survive_trimming() {
        let user = ID::default();
        let mut rows: Vec<_> = (0..6).map(|i| item(user, i)).collect();
        rows[0].pin(0, 50, 100).unwrap();
        enforce_recent_quota(&mut rows, 5);
        assert!(rows.iter().any(|r| r.played_at() == 0 && r.is_saved()));
    }

    #[test]
    fn pin_respects_saved_limit() {
        let mut row = item(ID::default(), 1);
        assert!(row.pin(50, 50, 100).is_err());
        assert!(row.pin(49, 50, 100).is_ok());
    }
}

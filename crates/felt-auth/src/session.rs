use super::Crypto;
use super::Member;
use felt_core::ID;
use felt_core::Unique;

/// A login session: a hashed bearer token plus its expiry, so a session
/// repository can revoke or simply let it lapse without storing the token
/// itself.
#[derive(Debug, Clone)]
pub struct Session {
    id: ID<Self>,
    user: ID<Member>,
    hash: String,
    expires_at: i64,
}

impl Session {
    pub fn new(id: ID<Self>, user: ID<Member>, hash: String) -> Self {
        let expires_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_secs() as i64
            + Crypto::duration().as_secs() as i64;
        Self {
            id,
            user,
            hash,
            expires_at,
        }
    }
    pub fn user(&self) -> ID<Member> {
        self.user
    }
    pub fn hash(&self) -> &str {
        &self.hash
    }
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }
}

impl Unique for Session {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use felt_db::*;

    impl Schema for Session {
        fn name() -> &'static str {
            SESSIONS
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::TEXT,
                tokio_postgres::types::Type::INT8,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                SESSIONS,
                " (
                    id          UUID PRIMARY KEY,
                    user_id     UUID NOT NULL REFERENCES ",
                USERS,
                "(id),
                    token_hash  TEXT NOT NULL,
                    expires_at  BIGINT NOT NULL,
                    revoked     BOOLEAN NOT NULL DEFAULT FALSE
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_sessions_user ON ",
                SESSIONS,
                " (user_id);"
            )
        }
        fn copy() -> &'static str {
            unimplemented!()
        }
        fn truncates() -> &'static str {
            unimplemented!()
        }
        fn freeze() -> &'static str {
            unimplemented!()
        }
    }
}

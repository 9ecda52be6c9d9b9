use super::*;
use felt_core::*;

/// Persistent identity of a table: created once when a table actor spins
/// up, referenced by every hand it plays.
#[derive(Debug, Clone, Copy)]
pub struct Room {
    id: ID<Self>,
    stakes: Chips,
}

impl Room {
    pub fn new(stakes: Chips) -> Self {
        Self {
            id: ID::default(),
            stakes,
        }
    }
    pub fn stakes(&self) -> Chips {
        self.stakes
    }
}

impl Unique for Room {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use felt_db::*;

    impl Schema for Room {
        fn name() -> &'static str {
            ROOMS
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::INT2,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                ROOMS,
                " (
                    id          UUID PRIMARY KEY,
                    stakes      SMALLINT NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            ""
        }
        fn copy() -> &'static str {
            unimplemented!()
        }
        fn truncates() -> &'static str {
            const_format::concatcp!("TRUNCATE TABLE ", ROOMS, ";")
        }
        fn freeze() -> &'static str {
            unimplemented!()
        }
    }
}

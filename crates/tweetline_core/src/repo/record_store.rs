//! Record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed get/put/delete plus full scan over stored tweets.
//! - Keep SQL and JSON encoding details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Tweet::validate()` before touching storage.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `scan_all` yields tweets in ascending id order.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::{ModelValidationError, Tweet};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for record persistence and decoding.
#[derive(Debug)]
pub enum StoreError {
    Validation(ModelValidationError),
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid tweet record: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "tweet record encoding failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted tweet data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ModelValidationError> for StoreError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Ordered key-value storage for tweets keyed by tweet id.
///
/// Mutating methods take `&mut self`: one caller holds the store for the
/// whole lookup-then-write sequence of an operation.
pub trait RecordStore {
    /// Point lookup by id.
    fn get(&self, id: &str) -> StoreResult<Option<Tweet>>;
    /// Every stored tweet, ascending by id.
    fn scan_all(&self) -> StoreResult<Vec<Tweet>>;
    /// Inserts or replaces the record keyed by `tweet.id`.
    fn put(&mut self, tweet: &Tweet) -> StoreResult<()>;
    /// Removes the record. Returns whether a record existed.
    fn delete(&mut self, id: &str) -> StoreResult<bool>;
}

/// SQLite-backed record store; each tweet is one JSON document row.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `InvalidData` when the connection schema is not fully migrated.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if version != latest_version() {
            return Err(StoreError::InvalidData(format!(
                "connection schema version {version} does not match expected {}",
                latest_version()
            )));
        }
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn get(&self, id: &str) -> StoreResult<Option<Tweet>> {
        let body: Option<String> = self
            .conn
            .query_row("SELECT body FROM tweets WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .optional()?;

        body.map(|body| decode_record(id, &body)).transpose()
    }

    fn scan_all(&self) -> StoreResult<Vec<Tweet>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, body FROM tweets ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tweets = Vec::new();

        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let body: String = row.get(1)?;
            tweets.push(decode_record(&id, &body)?);
        }

        Ok(tweets)
    }

    fn put(&mut self, tweet: &Tweet) -> StoreResult<()> {
        tweet.validate()?;
        let body = serde_json::to_string(tweet)?;

        self.conn.execute(
            "INSERT INTO tweets (id, body) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                body = excluded.body,
                written_at = (strftime('%s', 'now') * 1000);",
            params![tweet.id.as_str(), body],
        )?;
        debug!(
            "event=record_put module=repo status=ok store=sqlite tweet_id={} bytes={}",
            tweet.id,
            body.len()
        );
        Ok(())
    }

    fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let changed = self.conn.execute("DELETE FROM tweets WHERE id = ?1;", [id])?;
        debug!(
            "event=record_delete module=repo status=ok store=sqlite tweet_id={} removed={}",
            id,
            changed > 0
        );
        Ok(changed > 0)
    }
}

fn decode_record(id: &str, body: &str) -> StoreResult<Tweet> {
    let tweet: Tweet = serde_json::from_str(body).map_err(|err| {
        StoreError::InvalidData(format!("undecodable body for tweets.id `{id}`: {err}"))
    })?;
    if tweet.id != id {
        return Err(StoreError::InvalidData(format!(
            "tweets.id `{id}` holds record with id `{}`",
            tweet.id
        )));
    }
    tweet.validate()?;
    Ok(tweet)
}

#[cfg(test)]
mod tests {
    use super::{RecordStore, SqliteRecordStore, StoreError};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let result = SqliteRecordStore::try_new(&conn);
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn get_rejects_row_whose_body_names_another_id() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO tweets (id, body) VALUES ('a', ?1);",
            [r#"{"id":"b","owner":"bob","content":"hi","username":"bob","likes":0,"liked_by":[],"comments":[],"created_at":1,"updated_at":null}"#],
        )
        .unwrap();

        let store = SqliteRecordStore::try_new(&conn).unwrap();
        let err = store.get("a").unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(message) if message.contains("`b`")));
    }
}

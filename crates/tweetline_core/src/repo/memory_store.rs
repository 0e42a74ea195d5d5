//! In-memory record store for tests and ephemeral use.
//!
//! [`InMemoryRecordStore`] keeps tweets in a `BTreeMap`, so full scans come
//! back in ascending id order like the SQLite store. Data is lost on drop.

use super::record_store::{RecordStore, StoreResult};
use crate::model::{Tweet, TweetId};
use std::collections::BTreeMap;

/// Map-backed implementation of [`RecordStore`].
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: BTreeMap<TweetId, Tweet>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, id: &str) -> StoreResult<Option<Tweet>> {
        Ok(self.records.get(id).cloned())
    }

    fn scan_all(&self) -> StoreResult<Vec<Tweet>> {
        Ok(self.records.values().cloned().collect())
    }

    fn put(&mut self, tweet: &Tweet) -> StoreResult<()> {
        tweet.validate()?;
        self.records.insert(tweet.id.clone(), tweet.clone());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.records.remove(id).is_some())
    }
}

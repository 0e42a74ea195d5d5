//! Core domain logic for Tweetline.
//! Owns the tweet/comment model, the record store contract and the
//! ownership-gated mutation rules.

pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use context::{Clock, IdGenerator, ManualClock, SequentialIds, SystemClock, UuidGenerator};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{Comment, CommentId, Identity, ModelValidationError, Tweet, TweetId};
pub use repo::memory_store::InMemoryRecordStore;
pub use repo::record_store::{RecordStore, SqliteRecordStore, StoreError, StoreResult};
pub use service::tweet_service::{
    retweet_content, ConflictKind, ErrorKind, ServiceResult, TweetService, TweetServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

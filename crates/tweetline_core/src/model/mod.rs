//! Tweet/comment domain model.
//!
//! # Responsibility
//! - Define the canonical entities persisted by the record store.
//! - Provide copy-with-change helpers used by the service layer.
//!
//! # Invariants
//! - Every tweet is identified by a stable opaque `TweetId`.
//! - `likes` always equals the size of `liked_by`.
//! - Comments live only inside their parent tweet.

pub mod comment;
pub mod identity;
pub mod tweet;

pub use comment::{Comment, CommentId};
pub use identity::Identity;
pub use tweet::{ModelValidationError, Tweet, TweetId};

/// Returns whether a required text field counts as empty.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

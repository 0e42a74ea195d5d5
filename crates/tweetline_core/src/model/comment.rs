//! Comment entity attached to one tweet.
//!
//! # Invariants
//! - `id` is unique within the parent tweet's comment list.
//! - Comments are never mutated after creation; they are only removed.

use super::identity::Identity;
use super::is_blank;
use super::tweet::ModelValidationError;
use serde::{Deserialize, Serialize};

/// Identifier of a comment, scoped to its parent tweet.
pub type CommentId = String;

/// Reply owned by one identity and stored inside its parent tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    /// Commenter identity; the only identity allowed to delete this comment.
    pub owner: Identity,
    pub content: String,
    /// Display name supplied by the commenter.
    pub username: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Comment {
    /// Creates a validated comment.
    pub fn new(
        id: impl Into<CommentId>,
        owner: Identity,
        content: impl Into<String>,
        username: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, ModelValidationError> {
        let comment = Self {
            id: id.into(),
            owner,
            content: content.into(),
            username: username.into(),
            created_at,
        };
        comment.validate()?;
        Ok(comment)
    }

    /// Checks required text fields.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if is_blank(&self.id) {
            return Err(ModelValidationError::BlankId);
        }
        if is_blank(&self.content) {
            return Err(ModelValidationError::BlankContent);
        }
        if is_blank(&self.username) {
            return Err(ModelValidationError::BlankUsername);
        }
        Ok(())
    }

    pub fn is_owned_by(&self, caller: &Identity) -> bool {
        &self.owner == caller
    }
}

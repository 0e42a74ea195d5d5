//! Tweet entity and its copy-with-change helpers.
//!
//! # Responsibility
//! - Define the persisted shape of a post with its engagement state.
//! - Build updated values from existing ones instead of mutating in place.
//!
//! # Invariants
//! - `id`, `owner` and `created_at` never change after creation.
//! - `likes == liked_by.len()` for every value produced by this module.
//! - `comments` keeps insertion order; removal preserves the order of the rest.
//! - `updated_at` is `None` until the first content edit.

use super::comment::{Comment, CommentId};
use super::identity::Identity;
use super::is_blank;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque unique identifier of a tweet.
pub type TweetId = String;

/// Validation errors for tweet/comment values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    BlankId,
    BlankContent,
    BlankUsername,
    LikeCountMismatch { likes: u64, liked_by: usize },
    DuplicateCommentId(CommentId),
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "id must not be blank"),
            Self::BlankContent => write!(f, "content must not be blank"),
            Self::BlankUsername => write!(f, "username must not be blank"),
            Self::LikeCountMismatch { likes, liked_by } => write!(
                f,
                "like counter {likes} does not match {liked_by} liking identities"
            ),
            Self::DuplicateCommentId(id) => write!(f, "duplicate comment id: {id}"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for ModelValidationError {}

/// Canonical stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: TweetId,
    /// Creator identity. Gates edit and delete.
    pub owner: Identity,
    pub content: String,
    /// Display name supplied at creation.
    pub username: String,
    /// Derived counter, kept in lockstep with `liked_by`.
    pub likes: u64,
    pub liked_by: HashSet<Identity>,
    /// Insertion-ordered replies.
    pub comments: Vec<Comment>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds of the latest content edit.
    pub updated_at: Option<i64>,
}

impl Tweet {
    /// Creates a fresh tweet with zeroed engagement state.
    ///
    /// # Invariants
    /// - `likes = 0`, `liked_by` and `comments` are empty.
    /// - `updated_at` starts as `None`.
    pub fn new(
        id: impl Into<TweetId>,
        owner: Identity,
        content: impl Into<String>,
        username: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, ModelValidationError> {
        let tweet = Self {
            id: id.into(),
            owner,
            content: content.into(),
            username: username.into(),
            likes: 0,
            liked_by: HashSet::new(),
            comments: Vec::new(),
            created_at,
            updated_at: None,
        };
        tweet.validate()?;
        Ok(tweet)
    }

    /// Validates field-level and cross-field invariants.
    ///
    /// # Errors
    /// - Blank id/content/username on the tweet or any comment.
    /// - `likes` differing from the size of `liked_by`.
    /// - Two comments sharing one id.
    /// - `updated_at` earlier than `created_at`.
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
        if self.likes != self.liked_by.len() as u64 {
            return Err(ModelValidationError::LikeCountMismatch {
                likes: self.likes,
                liked_by: self.liked_by.len(),
            });
        }
        if let Some(updated_at) = self.updated_at {
            if updated_at < self.created_at {
                return Err(ModelValidationError::UpdatedBeforeCreated {
                    created_at: self.created_at,
                    updated_at,
                });
            }
        }

        let mut seen = HashSet::with_capacity(self.comments.len());
        for comment in &self.comments {
            comment.validate()?;
            if !seen.insert(comment.id.as_str()) {
                return Err(ModelValidationError::DuplicateCommentId(comment.id.clone()));
            }
        }
        Ok(())
    }

    pub fn is_owned_by(&self, caller: &Identity) -> bool {
        &self.owner == caller
    }

    pub fn is_liked_by(&self, caller: &Identity) -> bool {
        self.liked_by.contains(caller)
    }

    pub fn find_comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|comment| comment.id == comment_id)
    }

    /// Returns a copy with `content` replaced and `updated_at` stamped.
    pub fn with_content(&self, content: impl Into<String>, edited_at: i64) -> Self {
        Self {
            content: content.into(),
            updated_at: Some(edited_at),
            ..self.clone()
        }
    }

    /// Returns a copy with `comment` appended after the existing ones.
    pub fn with_comment(&self, comment: Comment) -> Self {
        let mut next = self.clone();
        next.comments.push(comment);
        next
    }

    /// Returns a copy without the comment `comment_id`.
    ///
    /// Returns `None` when no such comment exists.
    pub fn without_comment(&self, comment_id: &str) -> Option<Self> {
        let position = self
            .comments
            .iter()
            .position(|comment| comment.id == comment_id)?;
        let mut next = self.clone();
        next.comments.remove(position);
        Some(next)
    }

    /// Returns a copy with `caller` added to `liked_by`.
    ///
    /// Returns `None` when `caller` already liked this tweet.
    pub fn with_like(&self, caller: &Identity) -> Option<Self> {
        if self.is_liked_by(caller) {
            return None;
        }
        let mut next = self.clone();
        next.liked_by.insert(caller.clone());
        next.likes = next.liked_by.len() as u64;
        Some(next)
    }

    /// Returns a copy with `caller` removed from `liked_by`.
    ///
    /// Returns `None` when `caller` never liked this tweet.
    pub fn without_like(&self, caller: &Identity) -> Option<Self> {
        if !self.is_liked_by(caller) {
            return None;
        }
        let mut next = self.clone();
        next.liked_by.remove(caller);
        next.likes = next.liked_by.len() as u64;
        Some(next)
    }
}

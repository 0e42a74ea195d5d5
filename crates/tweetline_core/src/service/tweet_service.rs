//! Tweet use-case service.
//!
//! # Responsibility
//! - Expose the read queries and ownership-gated mutations over tweets.
//! - Map storage and model failures into typed service errors.
//!
//! # Invariants
//! - Payload validation runs before any store lookup.
//! - Ownership and state preconditions run before any store write.
//! - Each mutation writes at most one record (one `put` or one `delete`).
//! - `likes == liked_by.len()` on every tweet this service writes.

use crate::context::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::model::{is_blank, Comment, CommentId, Identity, ModelValidationError, Tweet, TweetId};
use crate::repo::record_store::{RecordStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, TweetServiceError>;

/// Coarse failure category surfaced to dispatch layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Unauthorized,
    Conflict,
    Storage,
}

/// Violated state precondition behind a `Conflict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Caller is already in `liked_by`.
    AlreadyLiked,
    /// Tweet has zero likes.
    NoLikes,
    /// Tweet has likes, but none from the caller.
    NotLiked,
}

impl Display for ConflictKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyLiked => write!(f, "already liked"),
            Self::NoLikes => write!(f, "no likes to remove"),
            Self::NotLiked => write!(f, "caller has not liked this tweet"),
        }
    }
}

/// Errors from tweet service operations.
#[derive(Debug)]
pub enum TweetServiceError {
    /// Required text field is empty or whitespace only.
    Validation { field: &'static str },
    TweetNotFound(TweetId),
    CommentNotFound {
        tweet_id: TweetId,
        comment_id: CommentId,
    },
    /// Caller does not own the tweet, or the comment when `comment_id` is set.
    Unauthorized {
        tweet_id: TweetId,
        comment_id: Option<CommentId>,
    },
    Conflict {
        tweet_id: TweetId,
        reason: ConflictKind,
    },
    Store(StoreError),
}

impl TweetServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::TweetNotFound(_) | Self::CommentNotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Store(_) => ErrorKind::Storage,
        }
    }

    /// Stable snake_case code for logs and wire envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_failed",
            Self::TweetNotFound(_) => "tweet_not_found",
            Self::CommentNotFound { .. } => "comment_not_found",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Conflict {
                reason: ConflictKind::AlreadyLiked,
                ..
            } => "already_liked",
            Self::Conflict {
                reason: ConflictKind::NoLikes,
                ..
            } => "no_likes",
            Self::Conflict {
                reason: ConflictKind::NotLiked,
                ..
            } => "not_liked",
            Self::Store(_) => "storage_failed",
        }
    }
}

impl Display for TweetServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field } => write!(f, "`{field}` must not be empty"),
            Self::TweetNotFound(id) => write!(f, "tweet not found: {id}"),
            Self::CommentNotFound {
                tweet_id,
                comment_id,
            } => write!(f, "comment not found: {comment_id} on tweet {tweet_id}"),
            Self::Unauthorized {
                tweet_id,
                comment_id: None,
            } => write!(f, "caller does not own tweet {tweet_id}"),
            Self::Unauthorized {
                tweet_id,
                comment_id: Some(comment_id),
            } => write!(
                f,
                "caller does not own comment {comment_id} on tweet {tweet_id}"
            ),
            Self::Conflict { tweet_id, reason } => write!(f, "tweet {tweet_id}: {reason}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TweetServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for TweetServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ModelValidationError> for TweetServiceError {
    fn from(value: ModelValidationError) -> Self {
        match value {
            ModelValidationError::BlankContent => Self::Validation { field: "content" },
            ModelValidationError::BlankUsername => Self::Validation { field: "username" },
            other => Self::Store(StoreError::Validation(other)),
        }
    }
}

/// Tweet service facade over a record store.
///
/// Mutations take `&mut self`, so one operation runs to completion before
/// the next one can start against the same store.
pub struct TweetService<S: RecordStore> {
    store: S,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl<S: RecordStore> TweetService<S> {
    /// Creates a service with the system clock and UUID ids.
    pub fn new(store: S) -> Self {
        Self::with_collaborators(store, Box::new(SystemClock), Box::new(UuidGenerator))
    }

    /// Creates a service with explicit time and id sources.
    pub fn with_collaborators(
        store: S,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        Self { store, clock, ids }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Gets one tweet by id.
    ///
    /// # Errors
    /// - `TweetNotFound` when no record has this id.
    pub fn get_tweet(&self, id: &str) -> ServiceResult<Tweet> {
        let result = self.load(id);
        log_outcome("tweet_get", id, &result);
        result
    }

    /// Lists every stored tweet in ascending id order.
    ///
    /// Not creation order: with random ids the listing looks shuffled.
    pub fn list_tweets(&self) -> ServiceResult<Vec<Tweet>> {
        match self.store.scan_all() {
            Ok(tweets) => {
                info!(
                    "event=tweet_list module=service status=ok count={}",
                    tweets.len()
                );
                Ok(tweets)
            }
            Err(err) => {
                let err = TweetServiceError::from(err);
                log_failure("tweet_list", "-", &err);
                Err(err)
            }
        }
    }

    /// Creates a tweet owned by `caller`.
    ///
    /// # Contract
    /// - `likes = 0`, empty `liked_by` and `comments`, `updated_at = None`.
    ///
    /// # Errors
    /// - `Validation` when `content` or `username` is empty.
    pub fn post_tweet(
        &mut self,
        caller: &Identity,
        content: impl Into<String>,
        username: impl Into<String>,
    ) -> ServiceResult<Tweet> {
        let result = self.create_tweet(caller, content.into(), username.into());
        let tweet_id = result.as_ref().map_or("-", |tweet| tweet.id.as_str());
        log_outcome("tweet_post", tweet_id, &result);
        result
    }

    /// Replaces the content of a tweet owned by `caller`.
    ///
    /// # Errors
    /// - `Validation` when `content` is empty (checked before lookup).
    /// - `TweetNotFound`, then `Unauthorized` for a non-owner.
    pub fn edit_tweet(
        &mut self,
        caller: &Identity,
        id: &str,
        content: impl Into<String>,
    ) -> ServiceResult<Tweet> {
        let result = self.edit(caller, id, content.into());
        log_outcome("tweet_edit", id, &result);
        result
    }

    /// Deletes a tweet owned by `caller`, returning its last stored value.
    pub fn delete_tweet(&mut self, caller: &Identity, id: &str) -> ServiceResult<Tweet> {
        let result = self.delete(caller, id);
        log_outcome("tweet_delete", id, &result);
        result
    }

    /// Appends a comment by `caller` to any tweet.
    ///
    /// # Errors
    /// - `Validation` when `content` or `username` is empty (before lookup).
    /// - `TweetNotFound` when the tweet is missing.
    pub fn add_comment(
        &mut self,
        caller: &Identity,
        tweet_id: &str,
        content: impl Into<String>,
        username: impl Into<String>,
    ) -> ServiceResult<Tweet> {
        let result = self.comment(caller, tweet_id, content.into(), username.into());
        log_outcome("comment_add", tweet_id, &result);
        result
    }

    /// Removes one comment authored by `caller`.
    ///
    /// Owning the parent tweet grants no right over other people's comments.
    pub fn delete_comment(
        &mut self,
        caller: &Identity,
        tweet_id: &str,
        comment_id: &str,
    ) -> ServiceResult<Tweet> {
        let result = self.uncomment(caller, tweet_id, comment_id);
        log_outcome("comment_delete", tweet_id, &result);
        result
    }

    /// Records a like from `caller`.
    ///
    /// # Errors
    /// - `Conflict(AlreadyLiked)` on a repeat like; nothing is written.
    pub fn add_like(&mut self, caller: &Identity, tweet_id: &str) -> ServiceResult<Tweet> {
        let result = self.like(caller, tweet_id);
        log_outcome("like_add", tweet_id, &result);
        result
    }

    /// Withdraws the like `caller` previously gave.
    ///
    /// # Errors
    /// - `Conflict(NoLikes)` when the tweet has no likes at all.
    /// - `Conflict(NotLiked)` when other identities liked it but `caller` did not.
    pub fn remove_like(&mut self, caller: &Identity, tweet_id: &str) -> ServiceResult<Tweet> {
        let result = self.unlike(caller, tweet_id);
        log_outcome("like_remove", tweet_id, &result);
        result
    }

    /// Creates a new tweet owned by `caller` citing the original's author and text.
    ///
    /// The original tweet is left untouched and the new tweet keeps no
    /// reference to it beyond the citation text.
    pub fn retweet_tweet(
        &mut self,
        caller: &Identity,
        tweet_id: &str,
        username: impl Into<String>,
    ) -> ServiceResult<Tweet> {
        let result = self.retweet(caller, tweet_id, username.into());
        log_outcome("tweet_retweet", tweet_id, &result);
        result
    }

    fn load(&self, id: &str) -> ServiceResult<Tweet> {
        self.store
            .get(id)?
            .ok_or_else(|| TweetServiceError::TweetNotFound(id.to_string()))
    }

    fn load_owned(&self, caller: &Identity, id: &str) -> ServiceResult<Tweet> {
        let tweet = self.load(id)?;
        if !tweet.is_owned_by(caller) {
            return Err(TweetServiceError::Unauthorized {
                tweet_id: tweet.id,
                comment_id: None,
            });
        }
        Ok(tweet)
    }

    fn create_tweet(
        &mut self,
        caller: &Identity,
        content: String,
        username: String,
    ) -> ServiceResult<Tweet> {
        require_text("content", &content)?;
        require_text("username", &username)?;

        let tweet = Tweet::new(
            self.ids.next_id(),
            caller.clone(),
            content,
            username,
            self.clock.now_ms(),
        )?;
        self.store.put(&tweet)?;
        Ok(tweet)
    }

    fn edit(&mut self, caller: &Identity, id: &str, content: String) -> ServiceResult<Tweet> {
        require_text("content", &content)?;
        let current = self.load_owned(caller, id)?;

        // Clock skew must not stamp an edit before the creation time.
        let edited_at = self.clock.now_ms().max(current.created_at);
        let next = current.with_content(content, edited_at);
        self.store.put(&next)?;
        Ok(next)
    }

    fn delete(&mut self, caller: &Identity, id: &str) -> ServiceResult<Tweet> {
        let current = self.load_owned(caller, id)?;
        if !self.store.delete(id)? {
            return Err(TweetServiceError::TweetNotFound(id.to_string()));
        }
        Ok(current)
    }

    fn comment(
        &mut self,
        caller: &Identity,
        tweet_id: &str,
        content: String,
        username: String,
    ) -> ServiceResult<Tweet> {
        require_text("content", &content)?;
        require_text("username", &username)?;
        let current = self.load(tweet_id)?;

        let comment = Comment::new(
            self.ids.next_id(),
            caller.clone(),
            content,
            username,
            self.clock.now_ms(),
        )?;
        let next = current.with_comment(comment);
        self.store.put(&next)?;
        Ok(next)
    }

    fn uncomment(
        &mut self,
        caller: &Identity,
        tweet_id: &str,
        comment_id: &str,
    ) -> ServiceResult<Tweet> {
        let current = self.load(tweet_id)?;
        let not_found = || TweetServiceError::CommentNotFound {
            tweet_id: tweet_id.to_string(),
            comment_id: comment_id.to_string(),
        };

        let comment = current.find_comment(comment_id).ok_or_else(not_found)?;
        if !comment.is_owned_by(caller) {
            return Err(TweetServiceError::Unauthorized {
                tweet_id: tweet_id.to_string(),
                comment_id: Some(comment_id.to_string()),
            });
        }

        let next = current.without_comment(comment_id).ok_or_else(not_found)?;
        self.store.put(&next)?;
        Ok(next)
    }

    fn like(&mut self, caller: &Identity, tweet_id: &str) -> ServiceResult<Tweet> {
        let current = self.load(tweet_id)?;
        let next = current
            .with_like(caller)
            .ok_or_else(|| conflict(tweet_id, ConflictKind::AlreadyLiked))?;
        self.store.put(&next)?;
        Ok(next)
    }

    fn unlike(&mut self, caller: &Identity, tweet_id: &str) -> ServiceResult<Tweet> {
        let current = self.load(tweet_id)?;
        if current.likes == 0 {
            return Err(conflict(tweet_id, ConflictKind::NoLikes));
        }
        let next = current
            .without_like(caller)
            .ok_or_else(|| conflict(tweet_id, ConflictKind::NotLiked))?;
        self.store.put(&next)?;
        Ok(next)
    }

    fn retweet(
        &mut self,
        caller: &Identity,
        tweet_id: &str,
        username: String,
    ) -> ServiceResult<Tweet> {
        require_text("username", &username)?;
        let original = self.load(tweet_id)?;

        let retweet = Tweet::new(
            self.ids.next_id(),
            caller.clone(),
            retweet_content(&original),
            username,
            self.clock.now_ms(),
        )?;
        self.store.put(&retweet)?;
        Ok(retweet)
    }
}

/// Citation text stored as the content of a retweet.
pub fn retweet_content(original: &Tweet) -> String {
    format!("RT @{}: {}", original.username, original.content)
}

fn require_text(field: &'static str, value: &str) -> ServiceResult<()> {
    if is_blank(value) {
        return Err(TweetServiceError::Validation { field });
    }
    Ok(())
}

fn conflict(tweet_id: &str, reason: ConflictKind) -> TweetServiceError {
    TweetServiceError::Conflict {
        tweet_id: tweet_id.to_string(),
        reason,
    }
}

fn log_outcome<T>(event: &str, tweet_id: &str, result: &ServiceResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=service status=ok tweet_id={tweet_id}"),
        Err(err) => log_failure(event, tweet_id, err),
    }
}

fn log_failure(event: &str, tweet_id: &str, err: &TweetServiceError) {
    if err.kind() == ErrorKind::Storage {
        error!(
            "event={event} module=service status=error tweet_id={tweet_id} error_code={} error={err}",
            err.code()
        );
    } else {
        warn!(
            "event={event} module=service status=rejected tweet_id={tweet_id} error_code={}",
            err.code()
        );
    }
}

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record store calls into the tweet/comment/like use-cases.
//! - Keep dispatch layers decoupled from storage details.

pub mod tweet_service;

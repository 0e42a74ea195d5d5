//! Record store abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the keyed storage contract the tweet service builds on.
//! - Isolate SQLite and encoding details from service orchestration.
//!
//! # Invariants
//! - Stores enforce `Tweet::validate()` before persistence.
//! - Full scans are key-ordered (ascending tweet id).

pub mod memory_store;
pub mod record_store;

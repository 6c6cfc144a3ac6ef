//! `contactrank` — find your most frequent correspondents.
//!
//! This crate reads a batch of message headers, aggregates every recipient
//! into a deduplicated contact directory, and offers ranked, searchable and
//! per-contact detail views over it.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod query;
pub mod session;
pub mod source;

//! Core domain types for the Allegro account monitor.
//!
//! This crate provides the fundamental types used throughout the monitor:
//! - `Order`, `MessageThread`: marketplace entities as the monitor sees them
//! - `DedupLedger`: bounded seen-set with deterministic eviction
//! - `is_fresh`: recency classification for timestamped events

pub mod error;
pub mod freshness;
pub mod ledger;
pub mod types;

pub use error::{CoreError, Result};
pub use freshness::is_fresh;
pub use ledger::DedupLedger;
pub use types::{AuthorRole, LineItem, MessageThread, Money, Order, ThreadMessage};

//! Notification payloads and delivery.
//!
//! The monitor loops produce a structured `Notification` plus a target
//! channel id; rendering to the actual chat surface happens behind the
//! `NotificationSink` trait. `DiscordSink` is the production implementation,
//! `MockSink` records deliveries for tests.

pub mod discord;
pub mod error;
pub mod payload;
pub mod sanitize;
pub mod sink;

pub use discord::DiscordSink;
pub use error::{NotifyError, NotifyResult};
pub use payload::{Notification, NotificationField};
pub use sanitize::sanitize_text;
pub use sink::{DynSink, MockSink, NotificationSink};

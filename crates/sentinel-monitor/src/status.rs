//! Process-lifetime counters and the status snapshot.
//!
//! The snapshot is what the operator surface renders for a status query;
//! counters are also dumped at shutdown.

use crate::mode::{ModeController, SafetyMode};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by both loops. Monotonic within one process lifetime.
#[derive(Debug, Default)]
pub struct Counters {
    pub order_cycles: AtomicU64,
    pub orders_recorded: AtomicU64,
    pub order_notifications: AtomicU64,
    pub message_cycles: AtomicU64,
    pub messages_recorded: AtomicU64,
    pub message_notifications: AtomicU64,
    pub reply_previews: AtomicU64,
    pub replies_sent: AtomicU64,
    pub failed_cycles: AtomicU64,
}

impl Counters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time view of modes, credential presence and counters.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub monitor_active: bool,
    pub responder_active: bool,
    pub safety: SafetyMode,
    pub authenticated: bool,
    pub order_cycles: u64,
    pub orders_recorded: u64,
    pub order_notifications: u64,
    pub message_cycles: u64,
    pub messages_recorded: u64,
    pub message_notifications: u64,
    pub reply_previews: u64,
    pub replies_sent: u64,
    pub failed_cycles: u64,
}

impl StatusSnapshot {
    /// Capture the current state.
    #[must_use]
    pub fn capture(modes: &ModeController, authenticated: bool, counters: &Counters) -> Self {
        Self {
            monitor_active: modes.monitor_active(),
            responder_active: modes.responder_active(),
            safety: modes.safety(),
            authenticated,
            order_cycles: counters.order_cycles.load(Ordering::Relaxed),
            orders_recorded: counters.orders_recorded.load(Ordering::Relaxed),
            order_notifications: counters.order_notifications.load(Ordering::Relaxed),
            message_cycles: counters.message_cycles.load(Ordering::Relaxed),
            messages_recorded: counters.messages_recorded.load(Ordering::Relaxed),
            message_notifications: counters.message_notifications.load(Ordering::Relaxed),
            reply_previews: counters.reply_previews.load(Ordering::Relaxed),
            replies_sent: counters.replies_sent.load(Ordering::Relaxed),
            failed_cycles: counters.failed_cycles.load(Ordering::Relaxed),
        }
    }
}

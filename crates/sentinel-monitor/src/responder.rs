//! Auto-responder loop over unread buyer threads.
//!
//! Each cycle fetches threads and considers only unread ones whose last
//! message is from the buyer. A fresh, not-yet-seen message raises a
//! new-message notification; the reply decision is then gated by
//! `responder_active` and the TEST/LIVE safety mode. TEST renders a
//! preview and leaves marketplace state untouched; LIVE sends the canned
//! reply and marks the thread read.
//!
//! The thread read flag is the only guard that survives a restart. If
//! mark-read fails after a successful send, the thread stays unread and the
//! same message can be re-replied next cycle: at-least-once by design, and
//! logged at error level when it happens.

use crate::api::DynMarketplace;
use crate::error::MonitorResult;
use crate::mode::{ModeController, SafetyMode};
use crate::status::Counters;
use chrono::{Duration, Utc};
use sentinel_core::{is_fresh, DedupLedger, MessageThread, ThreadMessage};
use sentinel_notify::{sanitize_text, DynSink, Notification};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Embed accent for new-message notifications.
const MESSAGE_COLOR: u32 = 0x3498db;

/// Embed accent for test-mode reply previews.
const PREVIEW_COLOR: u32 = 0xff9900;

/// Longest message excerpt included in a notification.
const EXCERPT_MAX_CHARS: usize = 300;

/// Configuration for the auto-responder loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Cycle period (seconds). Fixed, no backoff.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Threads fetched per cycle.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,
    /// Freshness window (seconds) for buyer messages.
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,
    /// Seen-set capacity for message ids.
    #[serde(default = "default_ledger_capacity")]
    pub ledger_capacity: usize,
    /// Target channel for message notifications and previews.
    pub channel_id: u64,
    /// Canned reply sent to buyers in LIVE mode.
    #[serde(default = "default_reply_text")]
    pub reply_text: String,
}

fn default_interval_secs() -> u64 {
    90
}

fn default_fetch_limit() -> u32 {
    20
}

fn default_freshness_window_secs() -> u64 {
    86_400 // 24 hours
}

fn default_ledger_capacity() -> usize {
    sentinel_core::ledger::DEFAULT_CAPACITY
}

fn default_reply_text() -> String {
    "Dziękujemy za wiadomość! Odpowiemy najszybciej jak to możliwe.".to_string()
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            fetch_limit: default_fetch_limit(),
            freshness_window_secs: default_freshness_window_secs(),
            ledger_capacity: default_ledger_capacity(),
            channel_id: 0,
            reply_text: default_reply_text(),
        }
    }
}

/// The message polling task. One instance owns the message seen-set.
pub struct AutoResponder {
    api: DynMarketplace,
    sink: DynSink,
    modes: Arc<ModeController>,
    counters: Arc<Counters>,
    config: ResponderConfig,
    ledger: DedupLedger,
}

impl AutoResponder {
    pub fn new(
        api: DynMarketplace,
        sink: DynSink,
        modes: Arc<ModeController>,
        counters: Arc<Counters>,
        config: ResponderConfig,
    ) -> MonitorResult<Self> {
        let ledger = DedupLedger::new(config.ledger_capacity)?;
        Ok(Self {
            api,
            sink,
            modes,
            counters,
            config,
            ledger,
        })
    }

    /// Run the loop until the owning task is aborted.
    pub async fn run(mut self) {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(self.config.interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_secs = self.config.interval_secs,
            channel_id = self.config.channel_id,
            "Auto-responder started"
        );

        loop {
            ticker.tick().await;
            Counters::incr(&self.counters.message_cycles);
            if let Err(e) = self.cycle().await {
                Counters::incr(&self.counters.failed_cycles);
                warn!(error = %e, "Responder cycle failed, retrying on next tick");
            }
        }
    }

    /// One polling cycle.
    async fn cycle(&mut self) -> MonitorResult<()> {
        if !self.modes.monitor_active() && !self.modes.responder_active() {
            debug!("Monitor and responder both inactive, skipping cycle");
            return Ok(());
        }
        if !self.api.is_authenticated() {
            debug!("No credential, skipping responder cycle");
            return Ok(());
        }

        let threads = self
            .api
            .list_message_threads(self.config.fetch_limit)
            .await?;

        let now = Utc::now();
        let window = Duration::seconds(self.config.freshness_window_secs as i64);

        for thread in threads {
            if !thread.awaiting_seller() {
                continue;
            }
            let Some(message) = thread.last_message.as_ref() else {
                continue;
            };

            let novel = !self.ledger.seen(&message.id);
            if novel {
                self.ledger.record(message.id.clone());
                Counters::incr(&self.counters.messages_recorded);
            }

            if !is_fresh(&message.created_at, now, window) {
                debug!(thread_id = %thread.id, "Stale buyer message, no action");
                continue;
            }

            if novel && self.modes.monitor_active() {
                self.notify_new_message(&thread, message).await;
            }

            if !self.modes.responder_active() {
                continue;
            }

            match self.modes.safety() {
                SafetyMode::Test => {
                    // Marketplace state stays untouched in test mode; the
                    // seen-set keeps the preview from repeating every cycle.
                    if novel {
                        self.preview_reply(&thread).await;
                    }
                }
                SafetyMode::Live => {
                    self.reply_and_mark_read(&thread, message).await;
                }
            }
        }

        Ok(())
    }

    async fn notify_new_message(&self, thread: &MessageThread, message: &ThreadMessage) {
        info!(thread_id = %thread.id, from = %thread.interlocutor_login, "New buyer message");
        let notification = render_message(thread, message);
        match self.sink.deliver(self.config.channel_id, notification).await {
            Ok(()) => Counters::incr(&self.counters.message_notifications),
            Err(e) => warn!(error = %e, thread_id = %thread.id, "Message notification failed"),
        }
    }

    async fn preview_reply(&self, thread: &MessageThread) {
        let notification = render_reply_preview(thread, &self.config.reply_text);
        match self.sink.deliver(self.config.channel_id, notification).await {
            Ok(()) => Counters::incr(&self.counters.reply_previews),
            Err(e) => warn!(error = %e, thread_id = %thread.id, "Reply preview failed"),
        }
    }

    async fn reply_and_mark_read(&self, thread: &MessageThread, message: &ThreadMessage) {
        match self
            .api
            .send_reply(&thread.id, &self.config.reply_text)
            .await
        {
            Ok(true) => {
                Counters::incr(&self.counters.replies_sent);
                info!(thread_id = %thread.id, "Auto-reply sent");
                if let Err(e) = self.api.mark_read(&thread.id, &message.id).await {
                    // The read flag is the only restart-surviving guard, so
                    // this thread may be re-replied next cycle.
                    error!(
                        error = %e,
                        thread_id = %thread.id,
                        "Reply sent but mark-read failed, thread stays unread"
                    );
                }
            }
            Ok(false) => {
                warn!(thread_id = %thread.id, "Reply not created, thread left unread for retry");
            }
            Err(e) => {
                warn!(
                    error = %e,
                    thread_id = %thread.id,
                    "Reply send failed, thread left unread for retry"
                );
            }
        }
    }
}

/// Render a buyer message as a notification payload.
fn render_message(thread: &MessageThread, message: &ThreadMessage) -> Notification {
    Notification::new("New buyer message")
        .field("From", thread.interlocutor_login.as_str())
        .field("Message", excerpt(&sanitize_text(&message.text)))
        .footer(format!("Thread {}", thread.id))
        .mention_everyone(true)
        .color(MESSAGE_COLOR)
}

/// Render the reply the responder would send in LIVE mode.
fn render_reply_preview(thread: &MessageThread, reply_text: &str) -> Notification {
    Notification::new("Would reply (test mode)")
        .field("To", thread.interlocutor_login.as_str())
        .field("Reply", reply_text)
        .footer(format!("Thread {}", thread.id))
        .color(PREVIEW_COLOR)
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_MAX_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
    format!("{truncated}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketplace;
    use chrono::SecondsFormat;
    use sentinel_core::AuthorRole;
    use sentinel_notify::MockSink;

    fn ts(offset_secs: i64) -> String {
        (Utc::now() + Duration::seconds(offset_secs)).to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn thread(id: &str, read: bool, author: AuthorRole, created_at: String) -> MessageThread {
        MessageThread {
            id: id.to_string(),
            interlocutor_login: "buyer01".to_string(),
            read,
            last_message: Some(ThreadMessage {
                id: format!("{id}-msg"),
                created_at,
                text: "Czy produkt jest <b>dostępny</b>?".to_string(),
                author,
            }),
        }
    }

    struct Fixture {
        api: Arc<MockMarketplace>,
        sink: Arc<MockSink>,
        modes: Arc<ModeController>,
        responder: AutoResponder,
    }

    fn fixture() -> Fixture {
        let api = Arc::new(MockMarketplace::new());
        let sink = Arc::new(MockSink::new());
        let modes = Arc::new(ModeController::new(true));
        let counters = Arc::new(Counters::new());
        let responder = AutoResponder::new(
            api.clone(),
            sink.clone(),
            modes.clone(),
            counters,
            ResponderConfig {
                channel_id: 200,
                ..ResponderConfig::default()
            },
        )
        .unwrap();
        Fixture {
            api,
            sink,
            modes,
            responder,
        }
    }

    #[tokio::test]
    async fn test_test_mode_previews_without_marketplace_writes() {
        let mut f = fixture();
        f.modes.set_responder(true);
        f.api
            .set_threads(vec![thread("t-1", false, AuthorRole::Buyer, ts(-60))]);

        f.responder.cycle().await.unwrap();

        assert!(f.api.get_replies().is_empty());
        assert!(f.api.get_reads().is_empty());

        let deliveries = f.sink.get_deliveries();
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].1.title, "New buyer message");
        assert_eq!(deliveries[1].1.title, "Would reply (test mode)");

        // The preview does not repeat every cycle.
        f.responder.cycle().await.unwrap();
        assert_eq!(f.sink.get_deliveries().len(), 2);
    }

    #[tokio::test]
    async fn test_live_mode_sends_one_reply_and_marks_read() {
        let mut f = fixture();
        f.modes.set_responder(true);
        f.modes.set_safety(SafetyMode::Live);
        f.api
            .set_threads(vec![thread("t-1", false, AuthorRole::Buyer, ts(-60))]);

        f.responder.cycle().await.unwrap();

        let replies = f.api.get_replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].0, "t-1");
        assert_eq!(f.api.get_reads(), vec![("t-1".to_string(), "t-1-msg".to_string())]);

        // The marketplace now reports the thread read: no further action.
        f.api
            .set_threads(vec![thread("t-1", true, AuthorRole::Buyer, ts(-60))]);
        f.responder.cycle().await.unwrap();
        assert_eq!(f.api.get_replies().len(), 1);
    }

    #[tokio::test]
    async fn test_live_mode_resends_when_mark_read_fails() {
        let mut f = fixture();
        f.modes.set_responder(true);
        f.modes.set_safety(SafetyMode::Live);
        f.api.set_fail_mark_read(true);
        f.api
            .set_threads(vec![thread("t-1", false, AuthorRole::Buyer, ts(-60))]);

        // At-least-once: the thread stays unread, so the reply repeats.
        f.responder.cycle().await.unwrap();
        f.responder.cycle().await.unwrap();

        assert_eq!(f.api.get_replies().len(), 2);
        assert!(f.api.get_reads().is_empty());
    }

    #[tokio::test]
    async fn test_seller_last_word_triggers_nothing() {
        let mut f = fixture();
        f.modes.set_responder(true);
        f.modes.set_safety(SafetyMode::Live);
        f.api
            .set_threads(vec![thread("t-1", false, AuthorRole::Seller, ts(-60))]);

        f.responder.cycle().await.unwrap();

        assert!(f.api.get_replies().is_empty());
        assert!(f.sink.get_deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_read_thread_triggers_nothing() {
        let mut f = fixture();
        f.modes.set_responder(true);
        f.modes.set_safety(SafetyMode::Live);
        f.api
            .set_threads(vec![thread("t-1", true, AuthorRole::Buyer, ts(-60))]);

        f.responder.cycle().await.unwrap();

        assert!(f.api.get_replies().is_empty());
        assert!(f.sink.get_deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_responder_inactive_still_notifies() {
        let mut f = fixture();
        f.api
            .set_threads(vec![thread("t-1", false, AuthorRole::Buyer, ts(-60))]);

        f.responder.cycle().await.unwrap();

        let deliveries = f.sink.get_deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].1.title, "New buyer message");
        assert!(deliveries[0].1.mention_everyone);
        assert!(f.api.get_replies().is_empty());

        // Seen-set suppresses the duplicate on the next cycle.
        f.responder.cycle().await.unwrap();
        assert_eq!(f.sink.get_deliveries().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_reply_is_retried_next_cycle() {
        let mut f = fixture();
        f.modes.set_responder(true);
        f.modes.set_safety(SafetyMode::Live);
        f.api.set_reply_created(false);
        f.api
            .set_threads(vec![thread("t-1", false, AuthorRole::Buyer, ts(-60))]);

        f.responder.cycle().await.unwrap();
        assert!(f.api.get_reads().is_empty());

        f.responder.cycle().await.unwrap();
        assert_eq!(f.api.get_replies().len(), 2);
    }

    #[tokio::test]
    async fn test_stale_message_no_action() {
        let mut f = fixture();
        f.modes.set_responder(true);
        f.modes.set_safety(SafetyMode::Live);
        // Two days old: outside the default 24-hour window.
        f.api
            .set_threads(vec![thread("t-1", false, AuthorRole::Buyer, ts(-172_800))]);

        f.responder.cycle().await.unwrap();

        assert!(f.sink.get_deliveries().is_empty());
        assert!(f.api.get_replies().is_empty());
        assert!(f.responder.ledger.seen("t-1-msg"));
    }

    #[tokio::test]
    async fn test_both_inactive_skips_cycle() {
        let mut f = fixture();
        f.modes.set_monitor(false);
        f.api
            .set_threads(vec![thread("t-1", false, AuthorRole::Buyer, ts(-60))]);

        f.responder.cycle().await.unwrap();

        assert!(f.sink.get_deliveries().is_empty());
        assert!(f.responder.ledger.is_empty());
    }

    #[test]
    fn test_render_message_sanitizes_html() {
        let t = thread("t-1", false, AuthorRole::Buyer, ts(0));
        let n = render_message(&t, t.last_message.as_ref().unwrap());

        assert_eq!(n.fields[1].value, "Czy produkt jest **dostępny**?");
        assert_eq!(n.footer_text.as_deref(), Some("Thread t-1"));
        assert!(n.mention_everyone);
        assert_eq!(n.color, Some(MESSAGE_COLOR));
    }

    #[test]
    fn test_excerpt_truncates_long_text() {
        let long = "x".repeat(EXCERPT_MAX_CHARS + 50);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_MAX_CHARS + 1);
        assert!(cut.ends_with('…'));

        assert_eq!(excerpt("short"), "short");
    }
}

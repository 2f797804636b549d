//! Notification sink trait.
//!
//! Abstracts the chat surface so the loops can be exercised against a
//! recording mock. Trait objects need dyn-compatible async methods, hence
//! the boxed-future signature.

use crate::error::NotifyResult;
use crate::payload::Notification;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Trait for delivering notifications to a chat channel.
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification to the given channel.
    fn deliver(&self, channel_id: u64, notification: Notification) -> BoxFuture<'_, NotifyResult<()>>;
}

/// Arc wrapper for sink trait objects.
pub type DynSink = Arc<dyn NotificationSink>;

/// Recording sink for tests.
#[derive(Debug, Default)]
pub struct MockSink {
    /// Recorded deliveries for verification.
    deliveries: parking_lot::Mutex<Vec<(u64, Notification)>>,
    /// Whether the next delivery fails.
    fail_next: std::sync::atomic::AtomicBool,
}

impl MockSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next delivery return an error.
    pub fn set_fail_next(&self, fail: bool) {
        self.fail_next
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Get recorded deliveries.
    #[must_use]
    pub fn get_deliveries(&self) -> Vec<(u64, Notification)> {
        self.deliveries.lock().clone()
    }

    /// Clear recorded deliveries.
    pub fn clear_deliveries(&self) {
        self.deliveries.lock().clear();
    }
}

impl NotificationSink for MockSink {
    fn deliver(&self, channel_id: u64, notification: Notification) -> BoxFuture<'_, NotifyResult<()>> {
        Box::pin(async move {
            if self.fail_next.swap(false, std::sync::atomic::Ordering::SeqCst) {
                return Err(crate::error::NotifyError::Status {
                    status: 500,
                    body: "mock failure".to_string(),
                });
            }
            self.deliveries.lock().push((channel_id, notification));
            Ok(())
        })
    }
}

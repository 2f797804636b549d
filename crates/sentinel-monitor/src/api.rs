//! Marketplace API seam for the loops.
//!
//! Trait-based abstraction over the five calls the loops make, allowing
//! unit tests against a recording mock. `AllegroClient` is the production
//! implementation.

use sentinel_allegro::{AllegroClient, ClientError, ClientResult};
use sentinel_core::{MessageThread, Order};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// The marketplace surface the loops poll and write through.
pub trait MarketplaceApi: Send + Sync {
    /// True once a credential is held; loops skip cycles without one.
    fn is_authenticated(&self) -> bool;

    /// Recent orders, ascending by update time.
    fn list_recent_orders(&self, limit: u32) -> BoxFuture<'_, ClientResult<Vec<Order>>>;

    /// Message threads, as the marketplace returns them.
    fn list_message_threads(&self, limit: u32) -> BoxFuture<'_, ClientResult<Vec<MessageThread>>>;

    /// Post a reply; true iff the marketplace created it.
    fn send_reply<'a>(&'a self, thread_id: &'a str, text: &'a str)
        -> BoxFuture<'a, ClientResult<bool>>;

    /// Mark a thread read up to the given message.
    fn mark_read<'a>(
        &'a self,
        thread_id: &'a str,
        message_id: &'a str,
    ) -> BoxFuture<'a, ClientResult<()>>;
}

/// Arc wrapper for marketplace trait objects.
pub type DynMarketplace = Arc<dyn MarketplaceApi>;

impl MarketplaceApi for AllegroClient {
    fn is_authenticated(&self) -> bool {
        self.credentials().is_authenticated()
    }

    fn list_recent_orders(&self, limit: u32) -> BoxFuture<'_, ClientResult<Vec<Order>>> {
        Box::pin(AllegroClient::list_recent_orders(self, limit))
    }

    fn list_message_threads(&self, limit: u32) -> BoxFuture<'_, ClientResult<Vec<MessageThread>>> {
        Box::pin(AllegroClient::list_message_threads(self, limit))
    }

    fn send_reply<'a>(
        &'a self,
        thread_id: &'a str,
        text: &'a str,
    ) -> BoxFuture<'a, ClientResult<bool>> {
        Box::pin(AllegroClient::send_reply(self, thread_id, text))
    }

    fn mark_read<'a>(
        &'a self,
        thread_id: &'a str,
        message_id: &'a str,
    ) -> BoxFuture<'a, ClientResult<()>> {
        Box::pin(AllegroClient::mark_read(self, thread_id, message_id))
    }
}

/// Recording marketplace mock for loop tests.
#[derive(Debug, Default)]
pub struct MockMarketplace {
    authenticated: AtomicBool,
    orders: parking_lot::Mutex<Vec<Order>>,
    threads: parking_lot::Mutex<Vec<MessageThread>>,
    fail_listings: AtomicBool,
    /// Value `send_reply` resolves to (created or rejected).
    reply_created: AtomicBool,
    fail_mark_read: AtomicBool,
    replies: parking_lot::Mutex<Vec<(String, String)>>,
    reads: parking_lot::Mutex<Vec<(String, String)>>,
}

impl MockMarketplace {
    /// Create an authenticated mock with no data.
    #[must_use]
    pub fn new() -> Self {
        let mock = Self::default();
        mock.authenticated.store(true, Ordering::SeqCst);
        mock.reply_created.store(true, Ordering::SeqCst);
        mock
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.store(authenticated, Ordering::SeqCst);
    }

    pub fn set_orders(&self, orders: Vec<Order>) {
        *self.orders.lock() = orders;
    }

    pub fn set_threads(&self, threads: Vec<MessageThread>) {
        *self.threads.lock() = threads;
    }

    /// Make both listing calls fail with a transient error.
    pub fn set_fail_listings(&self, fail: bool) {
        self.fail_listings.store(fail, Ordering::SeqCst);
    }

    /// Set whether `send_reply` reports the reply as created.
    pub fn set_reply_created(&self, created: bool) {
        self.reply_created.store(created, Ordering::SeqCst);
    }

    pub fn set_fail_mark_read(&self, fail: bool) {
        self.fail_mark_read.store(fail, Ordering::SeqCst);
    }

    /// Recorded `(thread_id, text)` reply calls.
    #[must_use]
    pub fn get_replies(&self) -> Vec<(String, String)> {
        self.replies.lock().clone()
    }

    /// Recorded `(thread_id, message_id)` mark-read calls.
    #[must_use]
    pub fn get_reads(&self) -> Vec<(String, String)> {
        self.reads.lock().clone()
    }
}

impl MarketplaceApi for MockMarketplace {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn list_recent_orders(&self, _limit: u32) -> BoxFuture<'_, ClientResult<Vec<Order>>> {
        Box::pin(async move {
            if self.fail_listings.load(Ordering::SeqCst) {
                return Err(ClientError::Status {
                    status: 503,
                    body: "mock outage".to_string(),
                });
            }
            Ok(self.orders.lock().clone())
        })
    }

    fn list_message_threads(&self, _limit: u32) -> BoxFuture<'_, ClientResult<Vec<MessageThread>>> {
        Box::pin(async move {
            if self.fail_listings.load(Ordering::SeqCst) {
                return Err(ClientError::Status {
                    status: 503,
                    body: "mock outage".to_string(),
                });
            }
            Ok(self.threads.lock().clone())
        })
    }

    fn send_reply<'a>(
        &'a self,
        thread_id: &'a str,
        text: &'a str,
    ) -> BoxFuture<'a, ClientResult<bool>> {
        Box::pin(async move {
            self.replies
                .lock()
                .push((thread_id.to_string(), text.to_string()));
            Ok(self.reply_created.load(Ordering::SeqCst))
        })
    }

    fn mark_read<'a>(
        &'a self,
        thread_id: &'a str,
        message_id: &'a str,
    ) -> BoxFuture<'a, ClientResult<()>> {
        Box::pin(async move {
            if self.fail_mark_read.load(Ordering::SeqCst) {
                return Err(ClientError::Status {
                    status: 500,
                    body: "mock mark-read failure".to_string(),
                });
            }
            self.reads
                .lock()
                .push((thread_id.to_string(), message_id.to_string()));
            Ok(())
        })
    }
}

//! Order monitor loop: fetch → dedupe → freshness-filter → notify.
//!
//! Two states: Uninitialized (no successful fetch yet) and Steady. The
//! first successful fetch bulk-absorbs every visible order id without
//! notifying, which is what keeps a restart from replaying recent history.
//! In Steady state every unseen order is recorded first and notified only
//! if fresh, so an id can never fire twice while the ledger holds it.

use crate::api::DynMarketplace;
use crate::error::MonitorResult;
use crate::mode::ModeController;
use crate::status::Counters;
use chrono::{Duration, Utc};
use sentinel_core::{is_fresh, DedupLedger, Order};
use sentinel_notify::{DynSink, Notification};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Embed accent for order notifications.
const ORDER_COLOR: u32 = 0x2ecc71;

/// Configuration for the order monitor loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMonitorConfig {
    /// Cycle period (seconds). Fixed, no backoff.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Orders fetched per cycle.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,
    /// Freshness window (seconds). Short, so a wiped ledger does not
    /// resurrect history as notifications.
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,
    /// Dedup ledger capacity.
    #[serde(default = "default_ledger_capacity")]
    pub ledger_capacity: usize,
    /// Target channel for order notifications.
    pub channel_id: u64,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_fetch_limit() -> u32 {
    20
}

fn default_freshness_window_secs() -> u64 {
    2_700 // 45 minutes
}

fn default_ledger_capacity() -> usize {
    sentinel_core::ledger::DEFAULT_CAPACITY
}

impl Default for OrderMonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            fetch_limit: default_fetch_limit(),
            freshness_window_secs: default_freshness_window_secs(),
            ledger_capacity: default_ledger_capacity(),
            channel_id: 0,
        }
    }
}

/// The order polling task. One instance owns the order ledger.
pub struct OrderMonitor {
    api: DynMarketplace,
    sink: DynSink,
    modes: Arc<ModeController>,
    counters: Arc<Counters>,
    config: OrderMonitorConfig,
    ledger: DedupLedger,
    initialized: bool,
}

impl OrderMonitor {
    pub fn new(
        api: DynMarketplace,
        sink: DynSink,
        modes: Arc<ModeController>,
        counters: Arc<Counters>,
        config: OrderMonitorConfig,
    ) -> MonitorResult<Self> {
        let ledger = DedupLedger::new(config.ledger_capacity)?;
        Ok(Self {
            api,
            sink,
            modes,
            counters,
            config,
            ledger,
            initialized: false,
        })
    }

    /// Run the loop until the owning task is aborted.
    ///
    /// One task owns the loop and cycles are awaited sequentially, so a
    /// slow fetch delays the next tick instead of overlapping it.
    pub async fn run(mut self) {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(self.config.interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_secs = self.config.interval_secs,
            channel_id = self.config.channel_id,
            "Order monitor started"
        );

        loop {
            ticker.tick().await;
            Counters::incr(&self.counters.order_cycles);
            if let Err(e) = self.cycle().await {
                Counters::incr(&self.counters.failed_cycles);
                warn!(error = %e, "Order cycle failed, retrying on next tick");
            }
        }
    }

    /// One polling cycle.
    async fn cycle(&mut self) -> MonitorResult<()> {
        if !self.modes.monitor_active() {
            debug!("Order monitor inactive, skipping cycle");
            return Ok(());
        }
        if !self.api.is_authenticated() {
            debug!("No credential, skipping order cycle");
            return Ok(());
        }

        let orders = self.api.list_recent_orders(self.config.fetch_limit).await?;

        if !self.initialized {
            let absorbed = orders.len();
            self.ledger.absorb(orders.iter().map(|o| o.id.clone()));
            self.initialized = true;
            info!(absorbed, "First fetch: absorbed visible orders without notifying");
            return Ok(());
        }

        let now = Utc::now();
        let window = Duration::seconds(self.config.freshness_window_secs as i64);

        for order in orders {
            if self.ledger.seen(&order.id) {
                continue;
            }
            // Record before notifying: a duplicate notification is worse
            // than a dropped one here.
            self.ledger.record(order.id.clone());
            Counters::incr(&self.counters.orders_recorded);

            if !is_fresh(&order.updated_at, now, window) {
                debug!(order_id = %order.id, "Stale order recorded without notification");
                continue;
            }

            info!(order_id = %order.id, buyer = %order.buyer_login, "New order");
            self.sink
                .deliver(self.config.channel_id, render_order(&order))
                .await?;
            Counters::incr(&self.counters.order_notifications);
        }

        Ok(())
    }
}

/// Render one order as a notification payload.
fn render_order(order: &Order) -> Notification {
    let mut notification = Notification::new("New order")
        .field("Buyer", order.buyer_login.as_str())
        .field("Total", order.total.to_string());

    if !order.line_items.is_empty() {
        let items: Vec<String> = order
            .line_items
            .iter()
            .map(|item| format!("{}× {}", item.quantity, item.name))
            .collect();
        notification = notification.field("Items", items.join("\n"));
    }

    notification
        .footer(format!("Order {}", order.id))
        .color(ORDER_COLOR)
}

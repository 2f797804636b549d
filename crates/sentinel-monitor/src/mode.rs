//! Operator-controlled mode flags.
//!
//! Process-wide switches the (out-of-scope) command surface flips. The
//! responder write path is additionally gated by `SafetyMode`: TEST renders
//! previews only and never touches marketplace state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Gate on the responder's write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyMode {
    /// Preview-only: no reply is sent, no thread is marked read.
    #[default]
    Test,
    /// Real outbound writes.
    Live,
}

impl fmt::Display for SafetyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test => write!(f, "test"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// Shared mode flags, mutated only by explicit operator action.
///
/// The responder starts inactive and safety starts TEST unconditionally;
/// the monitor's initial state is the operator's (config) choice. Nothing
/// here is persisted.
#[derive(Debug)]
pub struct ModeController {
    monitor_active: AtomicBool,
    responder_active: AtomicBool,
    live: AtomicBool,
}

impl ModeController {
    /// Create the controller in the safest combination.
    #[must_use]
    pub fn new(monitor_active: bool) -> Self {
        Self {
            monitor_active: AtomicBool::new(monitor_active),
            responder_active: AtomicBool::new(false),
            live: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn monitor_active(&self) -> bool {
        self.monitor_active.load(Ordering::SeqCst)
    }

    pub fn set_monitor(&self, active: bool) {
        self.monitor_active.store(active, Ordering::SeqCst);
    }

    #[must_use]
    pub fn responder_active(&self) -> bool {
        self.responder_active.load(Ordering::SeqCst)
    }

    pub fn set_responder(&self, active: bool) {
        self.responder_active.store(active, Ordering::SeqCst);
    }

    #[must_use]
    pub fn safety(&self) -> SafetyMode {
        if self.live.load(Ordering::SeqCst) {
            SafetyMode::Live
        } else {
            SafetyMode::Test
        }
    }

    pub fn set_safety(&self, mode: SafetyMode) {
        self.live.store(mode == SafetyMode::Live, Ordering::SeqCst);
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(true)
    }
}

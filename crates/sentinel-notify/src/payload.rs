//! Structured notification payload.
//!
//! This is the whole contract between the monitor loops and the chat
//! surface: a title, name/value fields, optional footer metadata, and an
//! everyone-mention flag for events that need immediate operator attention.

use serde::{Deserialize, Serialize};

/// A single name/value pair rendered inside the notification body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationField {
    pub name: String,
    pub value: String,
}

/// One renderable event summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub fields: Vec<NotificationField>,
    pub footer_text: Option<String>,
    pub mention_everyone: bool,
    /// Accent color for surfaces that support one (0xRRGGBB).
    pub color: Option<u32>,
}

impl Notification {
    /// Start a notification with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            footer_text: None,
            mention_everyone: false,
            color: None,
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(NotificationField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn mention_everyone(mut self, mention: bool) -> Self {
        self.mention_everyone = mention;
        self
    }

    #[must_use]
    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }
}

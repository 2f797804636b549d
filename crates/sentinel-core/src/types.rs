//! Marketplace entities as the monitor consumes them.
//!
//! These are the post-decode shapes, independent of the wire format. Wire
//! DTOs live in `sentinel-allegro` and convert into these.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amount with its currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    /// ISO 4217 code, e.g. "PLN".
    pub currency: String,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// A single purchased line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
}

/// A checkout form (order) fetched from the marketplace.
///
/// Immutable once fetched; the monitor never re-reads a prior order's
/// content. `updated_at` stays the raw RFC 3339 string from the wire and is
/// parsed only at the freshness check, which fails open on garbage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub buyer_login: String,
    pub total: Money,
    pub line_items: Vec<LineItem>,
    /// Last-update timestamp, raw RFC 3339.
    pub updated_at: String,
}

/// Role of a message author within a thread.
///
/// Unknown wire roles deserialize to `Other` and are treated as non-buyer,
/// so the responder never replies to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorRole {
    Buyer,
    Seller,
    #[serde(other)]
    Other,
}

impl AuthorRole {
    /// True only for the counterparty the responder may answer.
    #[must_use]
    pub fn is_buyer(&self) -> bool {
        matches!(self, Self::Buyer)
    }
}

impl fmt::Display for AuthorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buyer => write!(f, "buyer"),
            Self::Seller => write!(f, "seller"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// The most recent message within a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    /// Creation timestamp, raw RFC 3339.
    pub created_at: String,
    pub text: String,
    pub author: AuthorRole,
}

/// A conversation thread between the account holder and a counterparty.
///
/// The read flag is the marketplace-side state the responder writes back via
/// mark-read; a thread with no `last_message` is never acted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageThread {
    pub id: String,
    pub interlocutor_login: String,
    pub read: bool,
    pub last_message: Option<ThreadMessage>,
}

impl MessageThread {
    /// True when the thread needs responder attention: unread and the last
    /// word belongs to the buyer.
    #[must_use]
    pub fn awaiting_seller(&self) -> bool {
        !self.read
            && self
                .last_message
                .as_ref()
                .is_some_and(|m| m.author.is_buyer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn message(author: AuthorRole) -> ThreadMessage {
        ThreadMessage {
            id: "msg-1".to_string(),
            created_at: "2024-05-01T10:00:00Z".to_string(),
            text: "hello".to_string(),
            author,
        }
    }

    #[test]
    fn test_author_role_decodes_wire_values() {
        let buyer: AuthorRole = serde_json::from_str("\"BUYER\"").unwrap();
        assert_eq!(buyer, AuthorRole::Buyer);

        let seller: AuthorRole = serde_json::from_str("\"SELLER\"").unwrap();
        assert_eq!(seller, AuthorRole::Seller);

        // Anything the API grows later must not break decoding.
        let unknown: AuthorRole = serde_json::from_str("\"SYSTEM\"").unwrap();
        assert_eq!(unknown, AuthorRole::Other);
        assert!(!unknown.is_buyer());
    }

    #[test]
    fn test_awaiting_seller_requires_unread_and_buyer() {
        let thread = MessageThread {
            id: "t-1".to_string(),
            interlocutor_login: "buyer01".to_string(),
            read: false,
            last_message: Some(message(AuthorRole::Buyer)),
        };
        assert!(thread.awaiting_seller());

        let read = MessageThread {
            read: true,
            ..thread.clone()
        };
        assert!(!read.awaiting_seller());

        let own_reply = MessageThread {
            last_message: Some(message(AuthorRole::Seller)),
            ..thread.clone()
        };
        assert!(!own_reply.awaiting_seller());

        let empty = MessageThread {
            last_message: None,
            ..thread
        };
        assert!(!empty.awaiting_seller());
    }

    #[test]
    fn test_money_display() {
        let total = Money {
            amount: dec!(123.45),
            currency: "PLN".to_string(),
        };
        assert_eq!(total.to_string(), "123.45 PLN");
    }
}

//! Wire DTOs for the Allegro REST API.
//!
//! Shapes follow the public API responses; conversions into the
//! `sentinel-core` types happen here so the client surface never leaks
//! marketplace JSON.

use rust_decimal::Decimal;
use sentinel_core::{AuthorRole, LineItem, MessageThread, Money, Order, ThreadMessage};
use serde::Deserialize;

/// Successful token exchange response. Extra fields (expiry, refresh token)
/// are ignored: the store keeps only the access token.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// `GET /order/checkout-forms` envelope.
#[derive(Debug, Deserialize)]
pub struct CheckoutFormsResponse {
    #[serde(rename = "checkoutForms", default)]
    pub checkout_forms: Vec<CheckoutFormDto>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutFormDto {
    pub id: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub buyer: BuyerDto,
    pub summary: SummaryDto,
    #[serde(rename = "lineItems", default)]
    pub line_items: Vec<LineItemDto>,
}

#[derive(Debug, Deserialize)]
pub struct BuyerDto {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryDto {
    #[serde(rename = "totalToPay")]
    pub total_to_pay: MoneyDto,
}

/// Amounts come over the wire as decimal strings, e.g. `"123.45"`.
#[derive(Debug, Deserialize)]
pub struct MoneyDto {
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct LineItemDto {
    pub quantity: u32,
    pub offer: OfferDto,
}

#[derive(Debug, Deserialize)]
pub struct OfferDto {
    pub name: String,
}

impl From<CheckoutFormDto> for Order {
    fn from(dto: CheckoutFormDto) -> Self {
        Order {
            id: dto.id,
            buyer_login: dto.buyer.login,
            total: Money {
                amount: dto.summary.total_to_pay.amount,
                currency: dto.summary.total_to_pay.currency,
            },
            line_items: dto
                .line_items
                .into_iter()
                .map(|item| LineItem {
                    name: item.offer.name,
                    quantity: item.quantity,
                })
                .collect(),
            updated_at: dto.updated_at,
        }
    }
}

/// `GET /messaging/threads` envelope.
#[derive(Debug, Deserialize)]
pub struct ThreadsResponse {
    #[serde(default)]
    pub threads: Vec<ThreadDto>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadDto {
    pub id: String,
    pub read: bool,
    pub interlocutor: Option<InterlocutorDto>,
    #[serde(rename = "lastMessage")]
    pub last_message: Option<LastMessageDto>,
}

#[derive(Debug, Deserialize)]
pub struct InterlocutorDto {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct LastMessageDto {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(default)]
    pub text: String,
    pub author: AuthorDto,
}

#[derive(Debug, Deserialize)]
pub struct AuthorDto {
    pub role: AuthorRole,
}

impl From<ThreadDto> for MessageThread {
    fn from(dto: ThreadDto) -> Self {
        MessageThread {
            id: dto.id,
            interlocutor_login: dto
                .interlocutor
                .map(|i| i.login)
                .unwrap_or_else(|| "unknown".to_string()),
            read: dto.read,
            last_message: dto.last_message.map(|m| ThreadMessage {
                id: m.id,
                created_at: m.created_at,
                text: m.text,
                author: m.author.role,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_checkout_forms() {
        let body = r#"{
            "checkoutForms": [{
                "id": "c9a2...01",
                "updatedAt": "2024-05-01T10:15:00Z",
                "buyer": {"login": "buyer01"},
                "summary": {"totalToPay": {"amount": "123.45", "currency": "PLN"}},
                "lineItems": [
                    {"quantity": 2, "offer": {"name": "USB cable"}},
                    {"quantity": 1, "offer": {"name": "Charger"}}
                ]
            }]
        }"#;

        let decoded: CheckoutFormsResponse = serde_json::from_str(body).unwrap();
        let order: Order = decoded.checkout_forms.into_iter().next().unwrap().into();

        assert_eq!(order.id, "c9a2...01");
        assert_eq!(order.buyer_login, "buyer01");
        assert_eq!(order.total.amount, dec!(123.45));
        assert_eq!(order.total.currency, "PLN");
        assert_eq!(order.line_items.len(), 2);
        assert_eq!(order.line_items[0].name, "USB cable");
        assert_eq!(order.line_items[0].quantity, 2);
    }

    #[test]
    fn test_decode_checkout_forms_missing_line_items() {
        let body = r#"{
            "checkoutForms": [{
                "id": "x",
                "updatedAt": "2024-05-01T10:15:00Z",
                "buyer": {"login": "b"},
                "summary": {"totalToPay": {"amount": "1.00", "currency": "PLN"}}
            }]
        }"#;

        let decoded: CheckoutFormsResponse = serde_json::from_str(body).unwrap();
        let order: Order = decoded.checkout_forms.into_iter().next().unwrap().into();
        assert!(order.line_items.is_empty());
    }

    #[test]
    fn test_decode_threads() {
        let body = r#"{
            "threads": [{
                "id": "t-1",
                "read": false,
                "interlocutor": {"login": "buyer01"},
                "lastMessage": {
                    "id": "m-1",
                    "createdAt": "2024-05-01T10:20:00Z",
                    "text": "Is it in stock?",
                    "author": {"role": "BUYER"}
                }
            }, {
                "id": "t-2",
                "read": true,
                "interlocutor": null,
                "lastMessage": null
            }]
        }"#;

        let decoded: ThreadsResponse = serde_json::from_str(body).unwrap();
        let threads: Vec<MessageThread> =
            decoded.threads.into_iter().map(MessageThread::from).collect();

        assert_eq!(threads.len(), 2);
        assert!(threads[0].awaiting_seller());
        assert_eq!(threads[0].last_message.as_ref().unwrap().id, "m-1");
        assert_eq!(threads[1].interlocutor_login, "unknown");
        assert!(threads[1].last_message.is_none());
    }

    #[test]
    fn test_decode_empty_envelopes() {
        let forms: CheckoutFormsResponse = serde_json::from_str("{}").unwrap();
        assert!(forms.checkout_forms.is_empty());

        let threads: ThreadsResponse = serde_json::from_str("{}").unwrap();
        assert!(threads.threads.is_empty());
    }
}

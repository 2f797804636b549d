//! Allegro REST client.
//!
//! Thin HTTP wrapper over the marketplace endpoints the monitor needs:
//! - OAuth2 authorization-code exchange (token held in `CredentialStore`)
//! - `order/checkout-forms` listing
//! - `messaging/threads` listing, reply send, mark-read
//!
//! Every call except the token exchange requires a stored credential and
//! short-circuits with `ClientError::MissingCredential` before any I/O when
//! none is present.

pub mod client;
pub mod credentials;
pub mod error;
pub mod model;

pub use client::{AllegroClient, ClientConfig};
pub use credentials::{AccessToken, CredentialStore};
pub use error::{ClientError, ClientResult};

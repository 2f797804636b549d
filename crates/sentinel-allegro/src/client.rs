//! HTTP client for the Allegro REST API.

use crate::credentials::{AccessToken, CredentialStore};
use crate::error::{ClientError, ClientResult};
use crate::model::{CheckoutFormsResponse, ThreadsResponse, TokenResponse};
use reqwest::{Client, StatusCode};
use sentinel_core::{MessageThread, Order};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Media type required by the public API.
const ALLEGRO_MEDIA_TYPE: &str = "application/vnd.allegro.public.v1+json";

/// Connection settings for the marketplace.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST base, e.g. "https://api.allegro.pl".
    pub api_base: String,
    /// OAuth base, e.g. "https://allegro.pl/auth/oauth".
    pub auth_base: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Client for the order and messaging endpoints.
///
/// All calls except `exchange_code` require a credential in the store and
/// short-circuit with `ClientError::MissingCredential` before any I/O.
pub struct AllegroClient {
    http: Client,
    config: ClientConfig,
    credentials: Arc<CredentialStore>,
}

impl AllegroClient {
    /// Create a new client around a shared credential store.
    pub fn new(config: ClientConfig, credentials: Arc<CredentialStore>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            http,
            config,
            credentials,
        })
    }

    /// Shared credential store handle.
    #[must_use]
    pub fn credentials(&self) -> Arc<CredentialStore> {
        Arc::clone(&self.credentials)
    }

    /// Exchange an authorization code for an access token and store it.
    ///
    /// The only call that does not need a stored credential. A rejected code
    /// is an `Auth` error surfaced to the operator, never retried here.
    pub async fn exchange_code(&self, code: &str) -> ClientResult<()> {
        let url = format!("{}/token", self.config.auth_base.trim_end_matches('/'));
        info!(url = %url, "Exchanging authorization code");

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Auth(format!("HTTP {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Auth(format!("Token response decode failed: {e}")))?;

        self.credentials.set(AccessToken::new(token.access_token));
        info!("Access token stored");
        Ok(())
    }

    /// Fetch recent orders, ascending by update time.
    pub async fn list_recent_orders(&self, limit: u32) -> ClientResult<Vec<Order>> {
        let url = format!(
            "{}/order/checkout-forms?limit={limit}",
            self.config.api_base.trim_end_matches('/')
        );
        let body = self.get_authorized(&url).await?;

        let decoded: CheckoutFormsResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("checkout-forms: {e}")))?;

        let mut orders: Vec<Order> = decoded.checkout_forms.into_iter().map(Order::from).collect();
        // RFC 3339 UTC timestamps sort lexicographically in time order.
        orders.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));

        debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }

    /// Fetch message threads, most recent first as the API returns them.
    pub async fn list_message_threads(&self, limit: u32) -> ClientResult<Vec<MessageThread>> {
        let url = format!(
            "{}/messaging/threads?limit={limit}",
            self.config.api_base.trim_end_matches('/')
        );
        let body = self.get_authorized(&url).await?;

        let decoded: ThreadsResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(format!("threads: {e}")))?;

        let threads = decoded.threads.into_iter().map(MessageThread::from).collect();
        Ok(threads)
    }

    /// Post a reply into a thread. Returns true iff the API created it.
    pub async fn send_reply(&self, thread_id: &str, text: &str) -> ClientResult<bool> {
        let token = self.require_token()?;
        let url = format!(
            "{}/messaging/threads/{thread_id}/messages",
            self.config.api_base.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(token.expose())
            .header(reqwest::header::ACCEPT, ALLEGRO_MEDIA_TYPE)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let created = response.status() == StatusCode::CREATED;
        if !created {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(thread_id, %status, body = %body, "Reply was not created");
        }
        Ok(created)
    }

    /// Mark a thread read up to the given message.
    pub async fn mark_read(&self, thread_id: &str, last_seen_message_id: &str) -> ClientResult<()> {
        let token = self.require_token()?;
        let url = format!(
            "{}/messaging/threads/{thread_id}/read",
            self.config.api_base.trim_end_matches('/')
        );

        let response = self
            .http
            .put(&url)
            .bearer_auth(token.expose())
            .header(reqwest::header::ACCEPT, ALLEGRO_MEDIA_TYPE)
            .json(&json!({ "lastSeenMessageId": last_seen_message_id }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Authorized GET returning the raw body on 2xx.
    async fn get_authorized(&self, url: &str) -> ClientResult<String> {
        let token = self.require_token()?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token.expose())
            .header(reqwest::header::ACCEPT, ALLEGRO_MEDIA_TYPE)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }

    fn require_token(&self) -> ClientResult<AccessToken> {
        self.credentials
            .token()
            .ok_or(ClientError::MissingCredential)
    }
}

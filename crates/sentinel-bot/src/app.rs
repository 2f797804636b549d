//! Main application orchestration.
//!
//! Wires the credential store, marketplace client, Discord sink, mode
//! flags and the two polling tasks; then waits for ctrl-c.

use crate::config::{AppConfig, Secrets};
use crate::error::AppResult;
use sentinel_allegro::{AllegroClient, ClientConfig, CredentialStore};
use sentinel_monitor::{
    AutoResponder, Counters, DynMarketplace, ModeController, OrderMonitor, StatusSnapshot,
};
use sentinel_notify::{DiscordSink, DynSink};
use std::sync::Arc;
use tracing::{info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    secrets: Secrets,
    credentials: Arc<CredentialStore>,
    modes: Arc<ModeController>,
    counters: Arc<Counters>,
}

impl Application {
    /// Create a new application. Loop tasks start in `run()`.
    pub fn new(config: AppConfig, secrets: Secrets) -> AppResult<Self> {
        config.validate()?;
        let modes = Arc::new(ModeController::new(config.modes.monitor_enabled));
        Ok(Self {
            config,
            secrets,
            credentials: Arc::new(CredentialStore::new()),
            modes,
            counters: Arc::new(Counters::new()),
        })
    }

    /// Mode flags, for an operator surface to toggle at runtime.
    #[must_use]
    pub fn modes(&self) -> Arc<ModeController> {
        Arc::clone(&self.modes)
    }

    /// Current status, for an operator surface to render.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot::capture(
            &self.modes,
            self.credentials.is_authenticated(),
            &self.counters,
        )
    }

    /// Run until ctrl-c.
    pub async fn run(&mut self) -> AppResult<()> {
        let client = Arc::new(AllegroClient::new(
            ClientConfig {
                api_base: self.config.allegro.api_base.clone(),
                auth_base: self.config.allegro.auth_base.clone(),
                client_id: self.secrets.client_id.clone(),
                client_secret: self.secrets.client_secret.clone(),
                redirect_uri: self.config.allegro.redirect_uri.clone(),
            },
            Arc::clone(&self.credentials),
        )?);

        // A rejected code is an operator problem; report it and stop.
        match &self.secrets.auth_code {
            Some(code) => client.exchange_code(code).await?,
            None => warn!(
                "No ALLEGRO_AUTH_CODE provided; loops stay idle until a credential is stored"
            ),
        }

        let sink: DynSink = Arc::new(DiscordSink::with_api_base(
            self.secrets.bot_token.clone(),
            self.config.discord.api_base.clone(),
        )?);
        let api: DynMarketplace = client;

        let monitor = OrderMonitor::new(
            Arc::clone(&api),
            Arc::clone(&sink),
            Arc::clone(&self.modes),
            Arc::clone(&self.counters),
            self.config.monitor.clone(),
        )?;
        let responder = AutoResponder::new(
            api,
            sink,
            Arc::clone(&self.modes),
            Arc::clone(&self.counters),
            self.config.responder.clone(),
        )?;

        let monitor_handle = tokio::spawn(monitor.run());
        let responder_handle = tokio::spawn(responder.run());
        info!("Monitor tasks running");

        tokio::signal::ctrl_c().await?;
        info!("Shutdown signal received");

        monitor_handle.abort();
        responder_handle.abort();

        let status = self.status();
        info!(?status, "Final status");
        Ok(())
    }
}

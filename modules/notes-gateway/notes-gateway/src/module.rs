use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use notes_gateway_sdk::{CategoryClientV1, Deadline, NoteClientV1, TagClientV1, UserClientV1};
use tracing::info;

use crate::api::rest::routes;
use crate::config::{GatewayConfig, RuntimeConfig};
use crate::infra::clients::{CategoryClient, NoteClient, TagClient, UserClient};
use crate::infra::rest::{HttpExchange, ReqwestExchange, RestClient};

/// Shared application state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) categories: Arc<dyn CategoryClientV1>,
    pub(crate) tags: Arc<dyn TagClientV1>,
    pub(crate) notes: Arc<dyn NoteClientV1>,
    pub(crate) users: Arc<dyn UserClientV1>,
    pub(crate) config: RuntimeConfig,
}

impl AppState {
    /// Build the resource clients on top of `exchange`. All four share it,
    /// and with it the connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if a service base URL is not absolute.
    pub fn with_exchange(
        cfg: &GatewayConfig,
        exchange: Arc<dyn HttpExchange>,
    ) -> anyhow::Result<Self> {
        let request_timeout = Duration::from_secs(cfg.request_timeout_secs);
        let rest = |name: &str, base: &str| {
            RestClient::new(base, Arc::clone(&exchange))
                .map_err(|e| anyhow::anyhow!("invalid {name} base URL '{base}': {e}"))
        };

        let services = &cfg.services;
        Ok(Self {
            categories: Arc::new(CategoryClient::new(
                rest("category service", &services.category_service_url)?,
                request_timeout,
            )),
            tags: Arc::new(TagClient::new(
                rest("tag service", &services.tag_service_url)?,
                request_timeout,
            )),
            notes: Arc::new(NoteClient::new(
                rest("note service", &services.note_service_url)?,
                request_timeout,
            )),
            users: Arc::new(UserClient::new(
                rest("user service", &services.user_service_url)?,
                request_timeout,
            )),
            config: cfg.into(),
        })
    }

    /// Deadline for a request entering the gateway now.
    pub(crate) fn deadline(&self) -> Deadline {
        Deadline::after(self.config.inbound_timeout)
    }
}

/// Notes gateway module: wires the HTTP client, resource clients and routes.
pub struct NotesGatewayModule {
    state: AppState,
}

impl NotesGatewayModule {
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(cfg: &GatewayConfig) -> anyhow::Result<Self> {
        info!("Initializing notes gateway module");
        cfg.validate()?;
        info!(
            client_timeout_secs = cfg.client_timeout_secs,
            request_timeout_secs = cfg.request_timeout_secs,
            inbound_timeout_secs = cfg.inbound_timeout_secs,
            "notes gateway timeouts"
        );

        let exchange: Arc<dyn HttpExchange> = Arc::new(ReqwestExchange::new(Duration::from_secs(
            cfg.client_timeout_secs,
        ))?);
        let state = AppState::with_exchange(cfg, exchange)?;

        info!(services = ?cfg.services, "Notes gateway module initialized");
        Ok(Self { state })
    }

    #[must_use]
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.state.clone())
    }
}

//! Top-level test harness: a mock resource service and the real gateway
//! router pointed at it.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use crate::api::rest::routes;
use crate::config::{GatewayConfig, ServicesConfig};
use crate::infra::rest::{CLIENT_TIMEOUT, HttpExchange, ReqwestExchange};
use crate::module::AppState;

use super::api_v1::ApiV1;
use super::mock::MockDownstream;

/// Fully-wired test environment.
pub struct AppHarness {
    mock: MockDownstream,
    router: Router,
}

impl AppHarness {
    pub fn builder() -> AppHarnessBuilder {
        AppHarnessBuilder::default()
    }

    pub fn api_v1(&self) -> ApiV1<'_> {
        ApiV1::new(self)
    }

    /// The server standing in for all four resource services.
    pub fn mock(&self) -> &MockDownstream {
        &self.mock
    }

    pub(crate) fn router(&self) -> &Router {
        &self.router
    }
}

/// Builder for [`AppHarness`].
#[derive(Default)]
pub struct AppHarnessBuilder {
    inbound_timeout: Option<Duration>,
    extra_routes: Option<Router>,
}

impl AppHarnessBuilder {
    /// Override the per-request deadline given at handler entry.
    #[must_use]
    pub fn with_inbound_timeout(mut self, timeout: Duration) -> Self {
        self.inbound_timeout = Some(timeout);
        self
    }

    /// Mount additional routes under the same middleware stack.
    #[must_use]
    pub fn with_routes(mut self, routes: Router) -> Self {
        self.extra_routes = Some(routes);
        self
    }

    pub async fn build(self) -> AppHarness {
        let mock = MockDownstream::start().await;
        let cfg = GatewayConfig {
            services: ServicesConfig::all_at(&mock.base_url()),
            ..GatewayConfig::default()
        };

        let exchange: Arc<dyn HttpExchange> =
            Arc::new(ReqwestExchange::new(CLIENT_TIMEOUT).expect("http client"));
        let mut state = AppState::with_exchange(&cfg, exchange).expect("app state");
        if let Some(timeout) = self.inbound_timeout {
            state.config.inbound_timeout = timeout;
        }

        let router = match self.extra_routes {
            Some(extra) => routes::with_middleware(extra, state.clone()).merge(routes::router(state)),
            None => routes::router(state),
        };

        AppHarness { mock, router }
    }
}

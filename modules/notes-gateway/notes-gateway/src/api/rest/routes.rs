use axum::Router;
use axum::body::Body;
use axum::extract::Extension;
use axum::routing::get;
use http::Request;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{Span, debug_span};

use super::error::panic_response;
use super::handlers::{categories, notes, tags, users};
use crate::module::AppState;

/// Gateway routes for all four resources with the middleware stack applied.
pub fn router(state: AppState) -> Router {
    with_middleware(resource_routes(), state)
}

fn resource_routes() -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/{uuid}",
            get(categories::get_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/api/tags", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/api/tags/{id}",
            get(tags::get_tag)
                .patch(tags::update_tag)
                .delete(tags::delete_tag),
        )
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/api/notes/{uuid}",
            get(notes::get_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/api/users", get(users::find_user).post(users::create_user))
        .route(
            "/api/users/{uuid}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}

/// Inject `state`, turn handler panics into 500 responses and trace every
/// request. Applies to all routes already present in `routes`.
pub fn with_middleware(routes: Router, state: AppState) -> Router {
    routes
        .layer(Extension(state))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
}

/// Span fields are method and path only; the query string can carry user
/// credentials (`GET /api/users?email=..&password=..`).
fn request_span(req: &Request<Body>) -> Span {
    debug_span!("request", method = %req.method(), path = %req.uri().path())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{GatewayConfig, ServicesConfig};
    use crate::test_support::CountingExchange;

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn failed_credential_lookup_logs_no_password() {
        let cfg = GatewayConfig {
            services: ServicesConfig::all_at("http://users:10001"),
            ..GatewayConfig::default()
        };
        let exchange =
            Arc::new(CountingExchange::ok(200, "[]").with_delay(Duration::from_secs(2)));
        let mut state = AppState::with_exchange(&cfg, exchange.clone()).unwrap();
        state.config.inbound_timeout = Duration::from_millis(50);

        let resp = router(state)
            .oneshot(
                Request::get("/api/users?email=a%40b.c&password=hunter2secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(exchange.calls(), 1);
        assert!(logs_contain("resource client failed"));
        assert!(logs_contain("path=/api/users"));
        assert!(!logs_contain("hunter2secret"));
    }
}

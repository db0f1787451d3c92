//! Shared application router builder.
//!
//! Provides [`build_app_router`] so both the production binary (`main.rs`)
//! and integration tests (`tests/common/mod.rs`) use the exact same middleware
//! stack.

use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{CorsConfig, ServerConfig};
use crate::routes;
use crate::state::AppState;

const WILDCARD: &str = "*";

/// Build the full application [`Router`] with all middleware layers.
///
/// The middleware stack is applied bottom-up:
///
/// 1. CORS
/// 2. Set request ID on incoming requests
/// 3. Structured request/response tracing
/// 4. Propagate request ID to response
/// 5. Request timeout
/// 6. Panic recovery (catch panics, return 500)
///
/// Fails if the CORS configuration contains an invalid origin, method or
/// header.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> anyhow::Result<Router> {
    let cors = build_cors_layer(&config.cors)?;
    let request_id_header = HeaderName::from_static("x-request-id");

    Ok(Router::new()
        // Health check at root level (not under /api/v1).
        .merge(routes::health::router())
        // API v1 routes.
        .nest("/api/v1", routes::api_routes())
        // -- Middleware stack (applied bottom-up) --
        // Panic recovery: catch panics and return 500.
        .layer(CatchPanicLayer::new())
        // Request timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // CORS.
        .layer(cors)
        // Shared state.
        .with_state(state))
}

/// Build the CORS middleware layer from configuration.
///
/// A `*` entry allows any value for that list. Browsers refuse credentialed
/// requests against wildcard policies, so credentials are only enabled when
/// origins, methods and headers are all explicit.
pub fn build_cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origin = if is_wildcard(&config.origins) {
        AllowOrigin::any()
    } else {
        let origins = config
            .origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin '{o}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    let methods = if is_wildcard(&config.methods) {
        AllowMethods::any()
    } else {
        let methods = config
            .methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                    .with_context(|| format!("Invalid CORS method '{m}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowMethods::list(methods)
    };

    let headers = if is_wildcard(&config.headers) {
        AllowHeaders::any()
    } else {
        let headers = config
            .headers
            .iter()
            .map(|h| {
                HeaderName::from_bytes(h.as_bytes())
                    .with_context(|| format!("Invalid CORS header '{h}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowHeaders::list(headers)
    };

    let any_wildcard = is_wildcard(&config.origins)
        || is_wildcard(&config.methods)
        || is_wildcard(&config.headers);
    let credentials = config.credentials && !any_wildcard;
    if config.credentials && any_wildcard {
        tracing::warn!("CORS credentials disabled because the policy contains a wildcard");
    }

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(credentials)
        .max_age(Duration::from_secs(3600)))
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == WILDCARD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cors(origins: &[&str], methods: &[&str], headers: &[&str]) -> CorsConfig {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        CorsConfig {
            origins: owned(origins),
            methods: owned(methods),
            headers: owned(headers),
            credentials: true,
        }
    }

    #[test]
    fn wildcard_policy_builds() {
        assert!(build_cors_layer(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn explicit_policy_builds() {
        let config = cors(
            &["http://localhost:5173"],
            &["get", "POST"],
            &["content-type"],
        );
        assert!(build_cors_layer(&config).is_ok());
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let config = cors(&["bad\norigin"], &["GET"], &["content-type"]);
        let err = build_cors_layer(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid CORS origin"));
    }

    #[test]
    fn invalid_header_is_rejected() {
        let config = cors(&["http://localhost:5173"], &["GET"], &["bad header"]);
        assert!(build_cors_layer(&config).is_err());
    }
}

pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod testing;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::{from_fn_with_state, map_response, map_response_with_state},
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::{ImageStorage, SecurityConfig};
use crate::services::images::STORAGE_ROUTE;
use crate::state::AppState;

/// Build the full router for `state`
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        // Guest-only
        .merge(guest_routes(state.clone()))
        // Bearer token required
        .merge(protected_routes(state.clone()))
        .fallback(handlers::public::not_found);

    if config.images.storage == ImageStorage::Disk {
        router = router.nest_service(STORAGE_ROUTE, ServeDir::new(&config.images.directory));
    }

    // Global middleware
    router = router
        .layer(map_response_with_state(
            state.clone(),
            middleware::envelope::redact_internal_errors,
        ))
        .layer(map_response(middleware::envelope::method_not_allowed_envelope))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn guest_routes(state: AppState) -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/login", post(public::login_post))
        .route_layer(from_fn_with_state(state, middleware::guest_only_middleware))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{auth, division, employee};

    Router::new()
        // Session and profile
        .route("/logout", post(auth::logout_post))
        .route("/profile", put(auth::profile_put))
        // Divisions (read-only)
        .route("/divisions", get(division::divisions_get))
        // Employees
        .route(
            "/employees",
            get(employee::employees_get).post(employee::employees_post),
        )
        .route(
            "/employees/:id",
            put(employee::employee_put)
                .patch(employee::employee_put)
                .delete(employee::employee_delete)
                .post(employee::employee_post_override),
        )
        .route_layer(from_fn_with_state(state, middleware::bearer_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

/// Serve `state` on an already-bound listener until the future is dropped
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, app(state)).await
}

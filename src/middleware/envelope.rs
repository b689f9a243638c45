// Router-wide response fixups so every error leaves in the JSON envelope

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::{ApiError, InternalErrorRendered};
use crate::state::AppState;

/// Replace axum's empty 405 (known path, wrong method) with an error envelope
pub async fn method_not_allowed_envelope(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut enveloped =
        ApiError::method_not_allowed("The method is not supported for this route.").into_response();
    if let Some(allow) = allow {
        enveloped.headers_mut().insert(header::ALLOW, allow);
    }
    enveloped
}

/// Hide internal error detail when the router's own config is production
pub async fn redact_internal_errors(State(state): State<AppState>, response: Response) -> Response {
    if !state.config.is_production() || response.extensions().get::<InternalErrorRendered>().is_none() {
        return response;
    }

    let mut redacted = (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(ApiError::internal(String::new()).to_json(true)),
    )
        .into_response();
    redacted.extensions_mut().insert(InternalErrorRendered);
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::database::MemoryStore;
    use crate::services::InlineImageStore;
    use crate::testing::{test_config, TestRequest};
    use axum::{middleware::map_response_with_state, routing::get, Router};
    use std::sync::Arc;

    fn failing_router(environment: Environment) -> Router {
        let mut config = test_config();
        config.environment = environment;
        let state = AppState::new(config, Arc::new(MemoryStore::new()), Arc::new(InlineImageStore));

        Router::new()
            .route(
                "/boom",
                get(|| async { Err::<(), _>(ApiError::internal("pool timed out")) }),
            )
            .layer(map_response_with_state(state.clone(), redact_internal_errors))
            .with_state(state)
    }

    #[tokio::test]
    async fn production_state_hides_internal_detail() {
        let (status, body) = TestRequest::get("/boom")
            .send(failing_router(Environment::Production))
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn development_state_keeps_internal_detail() {
        let (status, body) = TestRequest::get("/boom")
            .send(failing_router(Environment::Development))
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "pool timed out");
    }

    #[tokio::test]
    async fn other_responses_pass_through() {
        let ok = StatusCode::OK.into_response();
        assert_eq!(method_not_allowed_envelope(ok).await.status(), StatusCode::OK);

        let mut bare = StatusCode::METHOD_NOT_ALLOWED.into_response();
        bare.headers_mut()
            .insert(header::ALLOW, header::HeaderValue::from_static("GET,HEAD"));
        let enveloped = method_not_allowed_envelope(bare).await;
        assert_eq!(enveloped.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(enveloped.headers()[header::ALLOW], "GET,HEAD");
        assert!(enveloped.headers().contains_key(header::CONTENT_TYPE));
    }
}

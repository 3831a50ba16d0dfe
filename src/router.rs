//! Standalone HTTP server adapter for long-running hosts.
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::common::errors::Error;
use crate::common::utils::PREFLIGHT_MAX_AGE_SECS;
use crate::lookup::{find_household, FindRequest, HouseholdMatch};
use crate::rsvp::{submit_rsvp, SubmitRequest, SubmitResponse};
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(PREFLIGHT_MAX_AGE_SECS));

    Router::new()
        .route("/find", post(find_handler))
        .route("/api/find", post(find_handler))
        .route("/submit", post(submit_handler))
        .route("/api/submit", post(submit_handler))
        .method_not_allowed_fallback(|| async { Error::MethodNotAllowed })
        .fallback(|| async { Error::UnknownRoute })
        .layer(cors)
        .layer(middleware::map_response(preflight_no_content))
        .with_state(state)
}

async fn find_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FindRequest>, JsonRejection>,
) -> Result<Json<HouseholdMatch>, Error> {
    let Json(payload) = payload.map_err(rejection)?;
    let found = find_household(
        state.store(),
        state.settings.name_rule,
        payload.name.as_deref(),
    )
    .await?;

    Ok(Json(found))
}

async fn submit_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, Error> {
    let Json(payload) = payload.map_err(rejection)?;
    let submitted = submit_rsvp(state.store(), state.mailer(), &state.settings, payload).await?;

    Ok(Json(submitted))
}

fn rejection(rejection: JsonRejection) -> Error {
    Error::validation(rejection.body_text())
}

/// The CORS layer answers preflights with 200; browsers and the Lambda
/// adapter use 204.
async fn preflight_no_content(mut response: Response) -> Response {
    let is_preflight = response
        .headers()
        .contains_key(axum::http::header::ACCESS_CONTROL_ALLOW_METHODS);
    if is_preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            info!("Rejected request: {self}");
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Household;
    use crate::config::Settings;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    fn app() -> Router {
        let store = MemoryStore::with_households(vec![Household {
            id: "H1".into(),
            guests: vec!["Jane Doe".into()],
            lookup: vec!["jane doe".into()],
        }]);
        router(AppState::new(Arc::new(store), None, Settings::default()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn both_route_prefixes_are_served() {
        for uri in ["/find", "/api/find"] {
            let response = app()
                .oneshot(post_json(uri, r#"{"name":" JANE doe"}"#))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                body_json(response).await,
                serde_json::json!({ "householdId": "H1", "guests": ["Jane Doe"] })
            );
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let response = app().oneshot(post_json("/submit", "{")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn preflight_gets_no_content_with_cors_headers() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/submit")
            .header("origin", "https://wedding.example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn other_methods_are_not_allowed() {
        let request = Request::builder()
            .method("GET")
            .uri("/find")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Method not allowed" })
        );
    }

    #[tokio::test]
    async fn unknown_paths_get_a_json_not_found() {
        let response = app()
            .oneshot(post_json("/rsvp", r#"{"name":"Jane Doe"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Not found" })
        );
    }
}

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::engine::engine::JokeEngine;
use crate::engine::protocol::{EngineError, EngineResult, UpstreamFailure};
use crate::model::joke_artifact::JokeArtifact;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<JokeEngine>,
}

/// Caller-facing failure payload.
#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ErrorBody {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }
}

pub fn create_router(engine: Arc<JokeEngine>, static_dir: Option<&Path>) -> Router {
    let state = AppState { engine };

    let mut router = Router::new()
        .route("/api/joke", post(generate_joke).fallback(method_not_allowed))
        .route("/api/health", get(health_check))
        .with_state(state);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http())
}

/// POST /api/joke
async fn generate_joke(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return assemble(Err(EngineError::Request(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ))))
        }
    };

    // A panic inside the pipeline surfaces as a JoinError instead of tearing down the connection.
    let engine = state.engine.clone();
    let result = tokio::spawn(async move { engine.handle(&body).await })
        .await
        .unwrap_or_else(|join_err| Err(EngineError::Internal(join_err.to_string())));

    assemble(result)
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::message("Method not allowed")),
    )
}

/// GET /api/health
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "stub": state.engine.is_stub() }))
}

/// Turn a pipeline outcome into the HTTP response callers see.
pub fn assemble(result: EngineResult<JokeArtifact>) -> Response {
    match result {
        Ok(artifact) => (StatusCode::OK, Json(artifact)).into_response(),
        Err(err) => {
            let (status, body) = error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

pub fn error_response(err: &EngineError) -> (StatusCode, ErrorBody) {
    match err {
        EngineError::Request(message) => {
            info!(%message, "rejected request");
            (StatusCode::BAD_REQUEST, ErrorBody::message(message.clone()))
        }
        EngineError::Upstream(failure) => {
            warn!(%failure, "upstream failure returned to caller");
            upstream_response(failure)
        }
        EngineError::Contract { message, raw } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorBody {
                error: format!("Generator output rejected: {}", message),
                raw: Some(raw.clone()),
                ..ErrorBody::default()
            },
        ),
        EngineError::Internal(detail) => {
            error!(%detail, "unexpected failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::message("Internal server error"),
            )
        }
    }
}

fn upstream_response(failure: &UpstreamFailure) -> (StatusCode, ErrorBody) {
    match failure {
        UpstreamFailure::Status { status, body } => {
            let code = StatusCode::from_u16(*status)
                .ok()
                .filter(|c| c.is_client_error() || c.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            (
                code,
                ErrorBody {
                    error: "Upstream error".into(),
                    status: Some(*status),
                    detail: Some(body.clone()),
                    raw: None,
                },
            )
        }
        UpstreamFailure::Timeout { .. } => (
            StatusCode::GATEWAY_TIMEOUT,
            ErrorBody {
                error: "Upstream timeout".into(),
                detail: Some(failure.to_string()),
                ..ErrorBody::default()
            },
        ),
        UpstreamFailure::Network(_) => (
            StatusCode::BAD_GATEWAY,
            ErrorBody {
                error: "Upstream unreachable".into(),
                detail: Some(failure.to_string()),
                ..ErrorBody::default()
            },
        ),
        UpstreamFailure::MalformedBody { status, detail } => (
            StatusCode::BAD_GATEWAY,
            ErrorBody {
                error: "Malformed upstream response".into(),
                status: Some(*status),
                detail: Some(detail.clone()),
                raw: None,
            },
        ),
    }
}

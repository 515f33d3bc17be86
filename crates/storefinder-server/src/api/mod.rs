mod stores;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefinder_core::{Backend, ErrorKind, StoreError, StoreRepository, ValidationError};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState<R> {
    pub repo: R,
    pub backend: Backend,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    backend: String,
    store_count: Option<usize>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn validation_error(request_id: &str, error: &ValidationError) -> ApiError {
    ApiError::new(request_id, "validation_error", error.to_string())
}

/// Translate a repository failure into its HTTP error. Backend failures are
/// logged here and reported to the client without detail.
pub(super) fn map_store_error(request_id: &str, error: &StoreError) -> ApiError {
    match error.kind() {
        ErrorKind::InvalidArgument => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        ErrorKind::DoesNotExist => ApiError::new(request_id, "not_found", error.to_string()),
        ErrorKind::Conflict => ApiError::new(request_id, "conflict", error.to_string()),
        ErrorKind::OperationFailed => {
            tracing::error!(error = %error, request_id, "store operation failed");
            ApiError::new(
                request_id,
                "internal_error",
                "store backend operation failed",
            )
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app<R>(state: AppState<R>) -> Router
where
    R: StoreRepository + Clone + 'static,
{
    Router::new()
        .route("/api/v1/health", get(health::<R>))
        .route(
            "/api/v1/stores",
            get(stores::search_stores::<R>).post(stores::create_store::<R>),
        )
        .route(
            "/api/v1/stores/{store_id}",
            get(stores::get_store::<R>)
                .put(stores::put_store::<R>)
                .patch(stores::patch_store::<R>)
                .delete(stores::delete_store::<R>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let backend = state.backend.to_string();

    match state.repo.count_stores().await {
        Ok(count) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    backend,
                    store_count: Some(count),
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store backend unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        backend,
                        store_count: None,
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

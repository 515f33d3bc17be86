//! Store handlers: search, create, fetch, upsert, patch, delete.

use std::str::FromStr;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use storefinder_core::{SearchParams, SearchRequest, Store, StoreChanges, StoreId, StoreRepository};

use crate::middleware::RequestId;

use super::{map_store_error, validation_error, ApiError, ApiResponse, AppState, ResponseMeta};

type StoreResponse = (StatusCode, Json<ApiResponse<Store>>);

fn parse_store_id(req_id: &str, raw: &str) -> Result<StoreId, ApiError> {
    StoreId::from_str(raw).map_err(|e| validation_error(req_id, &e))
}

fn map_json_rejection(req_id: &str, rejection: &JsonRejection) -> ApiError {
    let code = match rejection {
        JsonRejection::JsonDataError(_) => "validation_error",
        _ => "bad_request",
    };
    ApiError::new(req_id, code, rejection.body_text())
}

fn respond(req_id: &RequestId, status: StatusCode, store: Store) -> StoreResponse {
    (
        status,
        Json(ApiResponse {
            data: store,
            meta: ResponseMeta::new(req_id.0.clone()),
        }),
    )
}

/// GET /api/v1/stores: search by name, center/radius, zip code and limit.
pub(super) async fn search_stores<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Store>>>, ApiError> {
    let rid = req_id.0.as_str();
    let Query(params) = query.map_err(|e| ApiError::new(rid, "bad_request", e.body_text()))?;
    let request = SearchRequest::try_from(params).map_err(|e| validation_error(rid, &e))?;

    let stores = state
        .repo
        .search_for_stores(&request)
        .await
        .map_err(|e| map_store_error(rid, &e))?;

    Ok(Json(ApiResponse {
        data: stores,
        meta: ResponseMeta::new(req_id.0.clone()),
    }))
}

/// POST /api/v1/stores: add a store whose id is not taken yet.
pub(super) async fn create_store<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<Store>, JsonRejection>,
) -> Result<StoreResponse, ApiError> {
    let rid = req_id.0.as_str();
    let Json(store) = body.map_err(|e| map_json_rejection(rid, &e))?;

    state
        .repo
        .add_store(store.clone())
        .await
        .map_err(|e| map_store_error(rid, &e))?;

    tracing::info!(store_id = %store.store_id(), "store created");
    Ok(respond(&req_id, StatusCode::CREATED, store))
}

/// GET /api/v1/stores/{store_id}
pub(super) async fn get_store<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<StoreResponse, ApiError> {
    let rid = req_id.0.as_str();
    let id = parse_store_id(rid, &raw_id)?;

    let store = state
        .repo
        .get_store(id)
        .await
        .map_err(|e| map_store_error(rid, &e))?;

    Ok(respond(&req_id, StatusCode::OK, store))
}

/// PUT /api/v1/stores/{store_id}: insert or fully replace.
///
/// Answers 201 when the store was created and 200 when it replaced one.
pub(super) async fn put_store<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
    body: Result<Json<Store>, JsonRejection>,
) -> Result<StoreResponse, ApiError> {
    let rid = req_id.0.as_str();
    let id = parse_store_id(rid, &raw_id)?;
    let Json(store) = body.map_err(|e| map_json_rejection(rid, &e))?;

    if store.store_id() != id {
        return Err(ApiError::new(
            rid,
            "validation_error",
            format!(
                "store_id in body ({}) does not match path ({id})",
                store.store_id()
            ),
        ));
    }

    let inserted = state
        .repo
        .update_store(store.clone())
        .await
        .map_err(|e| map_store_error(rid, &e))?;

    let status = if inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(respond(&req_id, status, store))
}

/// PATCH /api/v1/stores/{store_id}: change selected fields, keeping the rest.
pub(super) async fn patch_store<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
    body: Result<Json<StoreChanges>, JsonRejection>,
) -> Result<StoreResponse, ApiError> {
    let rid = req_id.0.as_str();
    let id = parse_store_id(rid, &raw_id)?;
    let Json(changes) = body.map_err(|e| map_json_rejection(rid, &e))?;

    let current = state
        .repo
        .get_store(id)
        .await
        .map_err(|e| map_store_error(rid, &e))?;
    let updated = current
        .copy_with(changes)
        .map_err(|e| validation_error(rid, &e))?;

    state
        .repo
        .update_store(updated.clone())
        .await
        .map_err(|e| map_store_error(rid, &e))?;

    Ok(respond(&req_id, StatusCode::OK, updated))
}

/// DELETE /api/v1/stores/{store_id}
pub(super) async fn delete_store<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let rid = req_id.0.as_str();
    let id = parse_store_id(rid, &raw_id)?;

    state
        .repo
        .delete_store(id)
        .await
        .map_err(|e| map_store_error(rid, &e))?;

    tracing::info!(store_id = %id, "store deleted");
    Ok(StatusCode::NO_CONTENT)
}

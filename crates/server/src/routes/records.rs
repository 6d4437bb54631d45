use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use common::types::Message;
use serde_json::Value;
use service::Record;
use tracing::debug;

use crate::errors::ApiError;
use crate::routes::AppState;

/// List every record in insertion order
pub async fn list_records(State(state): State<AppState>) -> Json<Vec<Record>> {
    let records = state.store.list().await;
    debug!(count = records.len(), "list records");
    Json(records)
}

/// Create a record; the store assigns its `id`
pub async fn create_record(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let Json(fields) = body?;
    let record = state.store.create(fields).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetch one record by id
pub async fn get_record(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Record>, ApiError> {
    let Path(id) = id?;
    state.store.get(id).await.map(Json).ok_or(ApiError::NotFound)
}

/// Merge the body's fields into an existing record
pub async fn update_record(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Record>, ApiError> {
    let Path(id) = id?;
    let Json(fields) = body?;
    let record = state.store.update(id, fields).await?;
    Ok(Json(record))
}

/// Delete by id; succeeds whether or not the record existed
pub async fn delete_record(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Message>, ApiError> {
    let Path(id) = id?;
    let existed = state.store.delete(id).await?;
    debug!(id, existed, "delete record");
    Ok(Json(Message { message: "Entry deleted" }))
}

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use taskboard_core::{SearchParams, TaskList, TaskUpdate};

use crate::state::ApiState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Store failures are logged in full and reported without detail.
fn store_error(error: taskboard_db::Error) -> ApiError {
    match error {
        taskboard_db::Error::Invalid(e) => {
            tracing::error!("error {}: {}", StatusCode::UNPROCESSABLE_ENTITY.as_u16(), e);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        taskboard_db::Error::TaskNotFound(_) => {
            tracing::error!("error {}: {}", StatusCode::NOT_FOUND.as_u16(), error);
            error_response(StatusCode::NOT_FOUND, error.to_string())
        }
        other => {
            tracing::error!("error {}: {}", StatusCode::INTERNAL_SERVER_ERROR.as_u16(), other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// A present but malformed number degrades to 0 with a warning.
fn parse_number(name: &str, raw: Option<&String>) -> u16 {
    match raw.map(|value| value.trim()).filter(|value| !value.is_empty()) {
        None => 0,
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("can't parse {} parameter: {:?}", name, value);
            0
        }),
    }
}

/// Search parameters from the query string. A missing or zero page is
/// reported as page 1.
pub fn search_params(query: &HashMap<String, String>) -> SearchParams {
    let limit = parse_number("limit", query.get("limit"));
    let page = match parse_number("page", query.get("page")) {
        0 => 1,
        page => page,
    };
    let status = query.get("status").map(String::as_str).unwrap_or_default();

    SearchParams::new(status, limit, page)
}

/// List tasks with their organisation, ops and shifts
pub async fn list_tasks(
    State(state): State<ApiState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<TaskList>, ApiError> {
    let params = search_params(&query);

    state
        .store
        .list_tasks(&params)
        .await
        .map(Json)
        .map_err(store_error)
}

/// Assign a task to an operator
pub async fn assign_task(
    State(state): State<ApiState>,
    Path(task_id): Path<String>,
    payload: Result<Json<TaskUpdate>, JsonRejection>,
) -> Result<Json<TaskUpdate>, ApiError> {
    let Json(update) = payload.map_err(|rejection| {
        tracing::error!(
            "error {}: {}",
            StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
            rejection.body_text()
        );
        error_response(StatusCode::UNPROCESSABLE_ENTITY, "empty payload")
    })?;

    if let Err(e) = update.validate() {
        tracing::error!("error {}: {}", StatusCode::UNPROCESSABLE_ENTITY.as_u16(), e);
        return Err(error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()));
    }

    state
        .store
        .assign_task(&task_id, &update)
        .await
        .map_err(store_error)?;

    Ok(Json(update))
}

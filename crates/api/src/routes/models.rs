//! Process model CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use process_store::{ProcessName, ProcessRecord, ProcessStore, UpsertOutcome};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Required keys of the upsert request body.
const PROCESS_NAME: &str = "processName";
const WORKSPACE_DATA: &str = "workspaceData";
const WARNINGS: &str = "warnings";

/// Shared application state accessible from all handlers.
pub struct AppState<S: ProcessStore> {
    pub store: S,
}

// -- Request types --

#[derive(Deserialize)]
pub struct UpsertQuery {
    #[serde(rename = "overwriteExisting")]
    pub overwrite_existing: Option<String>,
}

#[derive(Deserialize)]
pub struct NameQuery {
    #[serde(rename = "processName")]
    pub process_name: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ProcessResponse {
    #[serde(rename = "processName")]
    pub process_name: String,
    pub workspace: serde_json::Value,
    #[serde(rename = "currentWarnings")]
    pub current_warnings: serde_json::Value,
}

#[derive(Serialize)]
pub struct ListResponse {
    #[serde(rename = "processName")]
    pub process_name: Vec<String>,
}

// -- Handlers --

/// POST /api/models — create a process, or overwrite an existing one when
/// `overwriteExisting=true` is passed.
#[tracing::instrument(skip(state, query, body))]
pub async fn upsert<S: ProcessStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<UpsertQuery>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let name = ProcessName::new(&string_field(&body, PROCESS_NAME)?);
    let workspace = required_field(&body, WORKSPACE_DATA)?;
    let warnings = required_field(&body, WARNINGS)?;
    let overwrite = is_true(query.overwrite_existing.as_deref());

    let record = ProcessRecord {
        name: name.clone(),
        workspace,
        current_warnings: warnings,
    };

    match state.store.upsert(record, overwrite).await? {
        UpsertOutcome::Created => {
            metrics::counter!("processes_created").increment(1);
            tracing::info!(name = %name, "process created");
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse {
                    message: format!("Process {name} created."),
                }),
            ))
        }
        UpsertOutcome::Overwritten => {
            metrics::counter!("processes_overwritten").increment(1);
            tracing::info!(name = %name, "process overwritten");
            Ok((
                StatusCode::OK,
                Json(MessageResponse {
                    message: format!("Process {name} overwritten."),
                }),
            ))
        }
    }
}

/// GET /api/models — return the workspace and warnings of a process.
#[tracing::instrument(skip(state, query))]
pub async fn get<S: ProcessStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<NameQuery>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let name = name_param(&query)?;

    let record = state
        .store
        .get(&name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Process {name} does not exist.")))?;

    Ok(Json(ProcessResponse {
        process_name: record.name.into(),
        workspace: record.workspace,
        current_warnings: record.current_warnings,
    }))
}

/// DELETE /api/models — remove a process entirely.
#[tracing::instrument(skip(state, query))]
pub async fn delete<S: ProcessStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<NameQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let name = name_param(&query)?;

    let removed = state.store.delete(&name).await?;
    if !removed {
        return Err(ApiError::NotFound(format!(
            "Process {name} does not exist."
        )));
    }

    metrics::counter!("processes_deleted").increment(1);
    tracing::info!(name = %name, "process deleted");
    Ok(Json(MessageResponse {
        message: format!("Process {name} deleted."),
    }))
}

/// GET /api/models/list — list the names of all stored processes.
#[tracing::instrument(skip(state))]
pub async fn list<S: ProcessStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<ListResponse>, ApiError> {
    let names = state.store.list().await?;
    Ok(Json(ListResponse {
        process_name: names,
    }))
}

// -- Request plumbing --

/// The overwrite switch accepts the literal text `true` in any casing;
/// anything else (or absence) means false.
fn is_true(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn name_param(query: &NameQuery) -> Result<ProcessName, ApiError> {
    query
        .process_name
        .as_deref()
        .map(ProcessName::new)
        .ok_or_else(|| {
            ApiError::BadRequest("Process name not found in request parameters.".to_string())
        })
}

fn required_field(body: &serde_json::Value, key: &str) -> Result<serde_json::Value, ApiError> {
    body.get(key)
        .cloned()
        .ok_or_else(|| ApiError::BadRequest(format!("{key} not found in request body.")))
}

/// Like [`required_field`], but coerces non-string values to their JSON text.
fn string_field(body: &serde_json::Value, key: &str) -> Result<String, ApiError> {
    Ok(match required_field(body, key)? {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

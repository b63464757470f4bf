//! HTTP API for worker registration, assignment, and submission.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::coordinator::{AssignOutcome, Coordinator};
use crate::error::CoordinatorError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
}

/// Build the Axum router for the coordinator API.
pub fn api_routes(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/worker_register", post(worker_register))
        .route("/assign_task", post(assign_task))
        .route("/submit_task", post(submit_task))
        .route("/add_task", post(add_task))
        .route("/finish_all", post(finish_all))
        .layer(CorsLayer::permissive())
        .with_state(AppState { coordinator })
}

type ApiResponse = (StatusCode, Json<serde_json::Value>);

fn error_response(err: CoordinatorError) -> ApiResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": err.to_string()})),
    )
}

// ── Health & status ─────────────────────────────────────────────────────

async fn health() -> ApiResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({"status": "ok", "service": "foreman"})),
    )
}

async fn status(State(state): State<AppState>) -> ApiResponse {
    let snapshot = state.coordinator.snapshot().await;
    (StatusCode::OK, Json(serde_json::json!(snapshot)))
}

// ── Worker-facing operations ────────────────────────────────────────────

#[derive(Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    worker_id: String,
}

async fn worker_register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResponse {
    info!(worker_id = %body.worker_id, "Worker registration request received");
    match state.coordinator.register(&body.worker_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "worker registered successfully"})),
        ),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
struct WorkerQuery {
    #[serde(default)]
    worker_id: String,
}

async fn assign_task(
    State(state): State<AppState>,
    Query(query): Query<WorkerQuery>,
) -> ApiResponse {
    info!(worker_id = %query.worker_id, "Task assignment request received");
    match state.coordinator.assign(&query.worker_id).await {
        Ok(AssignOutcome::Assigned { idx, content }) => (
            StatusCode::OK,
            Json(serde_json::json!({"task_id": idx, "task": content})),
        ),
        // Both no-work cases are successful queries, not caller errors.
        Ok(AssignOutcome::NoTasks) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "no task to assign"})),
        ),
        Ok(AssignOutcome::AllDone) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "all tasks are done"})),
        ),
        Err(e) => error_response(e),
    }
}

async fn submit_task(
    State(state): State<AppState>,
    Query(query): Query<WorkerQuery>,
) -> ApiResponse {
    info!(worker_id = %query.worker_id, "Task submission request received");
    match state.coordinator.submit(&query.worker_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "task submitted successfully"})),
        ),
        Err(e) => error_response(e),
    }
}

// ── Registry extension hooks ────────────────────────────────────────────

#[derive(Deserialize)]
struct AddTaskRequest {
    #[serde(default)]
    task_content: Vec<u64>,
    chunk_size: Option<usize>,
}

async fn add_task(
    State(state): State<AppState>,
    Json(body): Json<AddTaskRequest>,
) -> ApiResponse {
    match state
        .coordinator
        .add_chunks(body.task_content, body.chunk_size)
        .await
    {
        Ok(ids) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "tasks added successfully",
                "task_ids": ids,
            })),
        ),
        Err(e) => error_response(e),
    }
}

async fn finish_all(State(state): State<AppState>) -> ApiResponse {
    let flipped = state.coordinator.finish_all().await;
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "all tasks marked done",
            "newly_done": flipped,
        })),
    )
}

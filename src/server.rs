//! Embedded HTTP API server.
//!
//! Serves the JSON API the web client consumes: tags, problems,
//! attempts, the review queue, and the dashboard summary. All state
//! lives in the shared [`ProblemStore`] behind a mutex; handlers are
//! short and synchronous once the lock is held.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::dashboard;
use crate::problems::{NewAttempt, ProblemStore, StoreError};
use crate::review::scheduler::Grade;

/// Shared server state.
#[derive(Clone)]
pub struct ApiState {
    store: Arc<Mutex<ProblemStore>>,
}

impl ApiState {
    fn store(&self) -> Result<MutexGuard<'_, ProblemStore>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::internal("store lock poisoned"))
    }
}

/// An API failure carrying the HTTP status to answer with.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "ok": false, "error": self.message })),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::ProblemNotFound(_) | StoreError::AttemptNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            StoreError::Sqlite(_) | StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn ok() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

// ==================== Tags ====================

async fn list_tags(State(state): State<ApiState>) -> ApiResult<Json<serde_json::Value>> {
    let tags = state.store()?.list_tags()?;
    Ok(Json(json!({ "tags": tags })))
}

#[derive(Deserialize)]
struct CreateTag {
    #[serde(default)]
    name: String,
}

async fn create_tag(
    State(state): State<ApiState>,
    Json(body): Json<CreateTag>,
) -> ApiResult<Json<serde_json::Value>> {
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("tag name is required"));
    }
    state.store()?.add_tag(&body.name)?;
    Ok(ok())
}

#[derive(Deserialize)]
struct RenameTag {
    #[serde(default)]
    old: String,
    #[serde(default)]
    new: String,
}

async fn rename_tag(
    State(state): State<ApiState>,
    Json(body): Json<RenameTag>,
) -> ApiResult<Json<serde_json::Value>> {
    let renamed = state.store()?.rename_tag(&body.old, &body.new)?;
    if !renamed {
        return Err(ApiError::bad_request("could not rename tag"));
    }
    Ok(ok())
}

// ==================== Problems ====================

#[derive(Deserialize)]
struct ProblemQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    tags: String,
}

/// Split a comma-separated tag filter into trimmed, non-empty names.
fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

async fn list_problems(
    State(state): State<ApiState>,
    Query(query): Query<ProblemQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let tags = split_tags(&query.tags);
    let problems = state.store()?.list_problems(&query.search, &tags, today())?;
    Ok(Json(json!({ "problems": problems })))
}

async fn problem_detail(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = state.store()?;
    let detail = store.problem_detail(id, today())?;
    let attempts = store.attempts_for(id)?;
    Ok(Json(json!({ "detail": detail, "attempts": attempts })))
}

async fn delete_problem(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    let store = state.store()?;
    store.problem_detail(id, today())?;
    store.delete_problem(id)?;
    Ok(ok())
}

// ==================== Attempts ====================

async fn create_attempt(
    State(state): State<ApiState>,
    Json(body): Json<NewAttempt>,
) -> ApiResult<Json<serde_json::Value>> {
    let problem_id = state.store()?.add_attempt(&body, today())?;
    Ok(Json(json!({ "ok": true, "problem_id": problem_id })))
}

#[derive(Deserialize)]
struct UpdateAttempt {
    #[serde(default)]
    notes: String,
}

async fn update_attempt(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateAttempt>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store()?.update_attempt(id, &body.notes)?;
    Ok(ok())
}

async fn delete_attempt(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state.store()?.delete_attempt(id)?;
    Ok(ok())
}

// ==================== Reviews ====================

#[derive(Deserialize)]
struct ReviewQuery {
    #[serde(default = "default_review_limit")]
    limit: usize,
}

fn default_review_limit() -> usize {
    1
}

async fn due_reviews(
    State(state): State<ApiState>,
    Query(query): Query<ReviewQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let reviews = state.store()?.due_reviews(query.limit, today())?;
    Ok(Json(json!({ "reviews": reviews })))
}

#[derive(Deserialize)]
struct RecordReview {
    #[serde(default)]
    grade: String,
}

async fn record_review(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(body): Json<RecordReview>,
) -> ApiResult<Json<serde_json::Value>> {
    let grade = Grade::parse(&body.grade);
    state.store()?.mark_review(id, grade, today())?;
    Ok(ok())
}

#[derive(Deserialize)]
struct SnoozeRequest {
    #[serde(default)]
    until: String,
}

async fn snooze_problem(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(body): Json<SnoozeRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let until = NaiveDate::parse_from_str(body.until.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request("invalid snooze date, expected YYYY-MM-DD"))?;
    state.store()?.snooze(id, until)?;
    Ok(ok())
}

// ==================== Dashboard ====================

async fn dashboard_summary(State(state): State<ApiState>) -> ApiResult<Json<serde_json::Value>> {
    let summary = dashboard::summarize(&*state.store()?, today())?;
    Ok(Json(json!(summary)))
}

// ==================== Wiring ====================

/// Build the API router over a shared store.
pub fn router(store: Arc<Mutex<ProblemStore>>) -> Router {
    Router::new()
        .route("/api/tags", get(list_tags).post(create_tag))
        .route("/api/tags/rename", post(rename_tag))
        .route("/api/problems", get(list_problems))
        .route(
            "/api/problems/{id}",
            get(problem_detail).delete(delete_problem),
        )
        .route("/api/attempts", post(create_attempt))
        .route(
            "/api/attempts/{id}",
            patch(update_attempt).delete(delete_attempt),
        )
        .route("/api/reviews", get(due_reviews))
        .route("/api/reviews/{id}", post(record_review))
        .route("/api/reviews/{id}/snooze", post(snooze_problem))
        .route("/api/dashboard", get(dashboard_summary))
        .layer(CorsLayer::permissive())
        .with_state(ApiState { store })
}

/// Bind and serve the API until the process exits.
pub async fn serve(store: ProblemStore, addr: &str) -> anyhow::Result<()> {
    let app = router(Arc::new(Mutex::new(store)));
    let listener = TcpListener::bind(addr).await?;
    log::info!("API server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags(""), Vec::<String>::new());
        assert_eq!(split_tags("Array"), vec!["Array"]);
        assert_eq!(
            split_tags(" Array , DP ,, Two Pointers "),
            vec!["Array", "DP", "Two Pointers"]
        );
    }

    #[test]
    fn test_store_error_status_mapping() {
        let err: ApiError = StoreError::ProblemNotFound(7).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: ApiError = StoreError::AttemptNotFound(7).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: ApiError = StoreError::InvalidInput("notes are required".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}

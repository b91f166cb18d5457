// --------------------------------------------------
// Handles API endpoints for task CRUD, the stopwatch,
// sub-categories and data management (export / clear-all).
//
// Missing tasks answer 404; repeating a timer operation that
// is already in effect answers 200 with the unchanged task.
// --------------------------------------------------

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::models::{Task, TaskCategory, TaskDraft, TaskId, TaskPatch};
use crate::summary;
use crate::task_store::TaskStore;

/// A task plus its live elapsed seconds at response time.
#[derive(Debug, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub elapsed: u64,
}

impl TaskView {
    fn new(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            elapsed: summary::effective_elapsed(task, now),
            task: task.clone(),
        }
    }
}

fn views<'a>(tasks: impl IntoIterator<Item = &'a Task>, store: &TaskStore) -> Vec<TaskView> {
    let now = store.now().with_timezone(&Utc);
    tasks.into_iter().map(|t| TaskView::new(t, now)).collect()
}

// Current state of `id` after an operation, or 404
fn task_response(store: &TaskStore, id: &TaskId) -> axum::response::Response {
    match store.get(id) {
        Some(task) => {
            let now = store.now().with_timezone(&Utc);
            Json(TaskView::new(task, now)).into_response()
        }
        None => (StatusCode::NOT_FOUND, "task not found").into_response(),
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Default, Deserialize)]
pub struct TasksQuery {
    pub category: Option<TaskCategory>,
    pub from: Option<String>, // RFC3339
    pub to: Option<String>,   // RFC3339
}

// -----------------------------
// GET /api/tasks
// All tasks, optionally narrowed by category and/or creation range
// -----------------------------
pub async fn get_tasks(State(state): State<AppState>, Query(q): Query<TasksQuery>) -> impl IntoResponse {
    let store = state.store.lock();

    let mut tasks: Vec<&Task> = match (q.from.as_deref(), q.to.as_deref()) {
        (None, None) => store.tasks().iter().collect(),
        (from, to) => {
            let start = match from.map(parse_instant) {
                Some(Some(dt)) => dt,
                Some(None) => return (StatusCode::BAD_REQUEST, "invalid from").into_response(),
                None => DateTime::<Utc>::MIN_UTC,
            };
            let end = match to.map(parse_instant) {
                Some(Some(dt)) => dt,
                Some(None) => return (StatusCode::BAD_REQUEST, "invalid to").into_response(),
                None => DateTime::<Utc>::MAX_UTC,
            };
            store.tasks_by_date_range(start, end)
        }
    };

    if let Some(category) = q.category {
        tasks.retain(|t| t.category() == category);
    }

    Json(views(tasks, &store)).into_response()
}

// -----------------------------
// GET /api/tasks/today
// -----------------------------
pub async fn get_today_tasks(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock();
    Json(views(store.today_tasks(), &store))
}

// -----------------------------
// GET /api/tasks/active
// Polled by the UI (about once per second) to refresh running timers
// -----------------------------
pub async fn get_active_tasks(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock();
    Json(views(store.active_tasks(), &store))
}

// -----------------------------
// GET /api/tasks/:id
// -----------------------------
pub async fn get_task(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let store = state.store.lock();
    task_response(&store, &TaskId::from(id))
}

// -----------------------------
// POST /api/tasks
// Creates a task (timer idle) and saves the collection
// -----------------------------
pub async fn create_task(State(state): State<AppState>, Json(draft): Json<TaskDraft>) -> impl IntoResponse {
    let mut store = state.store.lock();
    let task = store.create(draft);
    task_response(&store, &task.id)
}

// -----------------------------
// PUT /api/tasks/:id
// Merges the given fields into an existing task
// -----------------------------
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> impl IntoResponse {
    let id = TaskId::from(id);
    let mut store = state.store.lock();
    store.update(&id, patch);
    task_response(&store, &id)
}

// -----------------------------
// DELETE /api/tasks/:id
// -----------------------------
pub async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let mut store = state.store.lock();
    if !store.delete(&TaskId::from(id)) {
        return (StatusCode::NOT_FOUND, "task not found").into_response();
    }
    Json(serde_json::json!({ "ok": true })).into_response()
}

// -----------------------------
// POST /api/tasks/:id/start
// -----------------------------
pub async fn start_timer(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let id = TaskId::from(id);
    let mut store = state.store.lock();
    store.start_timer(&id);
    task_response(&store, &id)
}

// -----------------------------
// POST /api/tasks/:id/pause
// -----------------------------
pub async fn pause_timer(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let id = TaskId::from(id);
    let mut store = state.store.lock();
    store.pause_timer(&id);
    task_response(&store, &id)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryInput {
    pub sub_category: String,
}

// -----------------------------
// PUT /api/tasks/:id/sub-category
// Re-attributes running time to a new sub-category
// -----------------------------
pub async fn change_sub_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SubCategoryInput>,
) -> impl IntoResponse {
    let sub_category = input.sub_category.trim();
    if sub_category.is_empty() {
        return (StatusCode::BAD_REQUEST, "subCategory required").into_response();
    }
    let id = TaskId::from(id);
    let mut store = state.store.lock();
    store.change_sub_category(&id, sub_category);
    task_response(&store, &id)
}

#[derive(Debug, Deserialize)]
pub struct CustomSubCategoryInput {
    pub name: String,
}

// -----------------------------
// POST /api/tasks/:id/custom-sub-categories
// -----------------------------
pub async fn add_custom_sub_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CustomSubCategoryInput>,
) -> impl IntoResponse {
    let name = input.name.trim();
    if name.is_empty() {
        return (StatusCode::BAD_REQUEST, "name required").into_response();
    }
    let id = TaskId::from(id);
    let mut store = state.store.lock();
    store.add_custom_sub_category(&id, name);
    task_response(&store, &id)
}

// -----------------------------
// GET /api/export
// Stored blob as a dated download; a notice when nothing is stored
// -----------------------------
pub async fn export_data(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock();
    match store.export() {
        Ok(Some(export)) => (
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.filename),
                ),
            ],
            export.contents,
        )
            .into_response(),
        Ok(None) => Json(serde_json::json!({ "ok": false, "notice": "No data to export" })).into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "failed to read stored tasks").into_response(),
    }
}

// -----------------------------
// DELETE /api/data
// Removes every task and the stored blob
// -----------------------------
pub async fn clear_data(State(state): State<AppState>) -> impl IntoResponse {
    let mut store = state.store.lock();
    store.clear_all();
    Json(serde_json::json!({ "ok": true }))
}

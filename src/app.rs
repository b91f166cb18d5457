// --------------------------------------------------
// Router wiring and shared state.
//
// The task store is the single shared mutable resource; every handler
// takes the lock for exactly one synchronous store operation.
// --------------------------------------------------

use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use chrono::Weekday;
use parking_lot::Mutex;
use tower_http::services::ServeDir;

use crate::routes_summary;
use crate::routes_tasks;
use crate::task_store::TaskStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<TaskStore>>,
    pub week_start: Weekday,
}

impl AppState {
    pub fn new(store: TaskStore, week_start: Weekday) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            week_start,
        }
    }
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // tasks
        .route("/tasks", get(routes_tasks::get_tasks).post(routes_tasks::create_task))
        .route("/tasks/today", get(routes_tasks::get_today_tasks))
        .route("/tasks/active", get(routes_tasks::get_active_tasks))
        .route(
            "/tasks/:id",
            get(routes_tasks::get_task)
                .put(routes_tasks::update_task)
                .delete(routes_tasks::delete_task),
        )
        // timer
        .route("/tasks/:id/start", post(routes_tasks::start_timer))
        .route("/tasks/:id/pause", post(routes_tasks::pause_timer))
        .route("/tasks/:id/sub-category", put(routes_tasks::change_sub_category))
        .route(
            "/tasks/:id/custom-sub-categories",
            post(routes_tasks::add_custom_sub_category),
        )
        // reports
        .route("/summary/daily", get(routes_summary::get_daily_summary))
        .route("/summary/weekly", get(routes_summary::get_weekly_summary))
        // data management
        .route("/export", get(routes_tasks::export_data))
        .route("/data", delete(routes_tasks::clear_data))
        .with_state(state)
}

/// API under `/api`, everything else served from the PWA bundle.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .nest("/api", api_router(state))
        .nest_service("/", ServeDir::new(static_dir))
}

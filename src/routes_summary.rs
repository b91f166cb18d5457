use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::models::TaskCategory;
use crate::summary::{self, CategoryBreakdown, DailySummary, MinistryTotals, WeeklySummary};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub date: Option<String>, // "YYYY-MM-DD", defaults to today
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTime {
    pub category: TaskCategory,
    pub label: &'static str,
    pub icon: &'static str,
    pub seconds: u64,
    pub formatted: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummaryResponse {
    #[serde(flatten)]
    pub summary: DailySummary,
    pub total_formatted: String,
    pub top_categories: Vec<CategoryTime>,
    pub totals: MinistryTotals,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummaryResponse {
    #[serde(flatten)]
    pub summary: WeeklySummary,
    pub total_formatted: String,
    pub task_count: usize,
    pub top_categories: Vec<CategoryTime>,
    pub totals: MinistryTotals,
}

// Categories with logged time, most first
fn top_categories(breakdown: &CategoryBreakdown) -> Vec<CategoryTime> {
    breakdown
        .top()
        .into_iter()
        .map(|(category, seconds)| CategoryTime {
            category,
            label: category.label(),
            icon: category.icon(),
            seconds,
            formatted: summary::format_time_compact(seconds),
        })
        .collect()
}

// Missing date means today; an unparseable one yields None
fn resolve_date(raw: Option<&str>, today: NaiveDate) -> Option<NaiveDate> {
    match raw {
        None => Some(today),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
    }
}

pub async fn get_daily_summary(State(state): State<AppState>, Query(q): Query<SummaryQuery>) -> impl IntoResponse {
    let store = state.store.lock();
    let Some(date) = resolve_date(q.date.as_deref(), store.now().date_naive()) else {
        return (StatusCode::BAD_REQUEST, "invalid date").into_response();
    };

    let daily = store.daily_summary(date);
    let totals = summary::ministry_totals(&daily.tasks);

    Json(DailySummaryResponse {
        total_formatted: summary::format_time_compact(daily.total_time),
        top_categories: top_categories(&daily.category_breakdown),
        totals,
        summary: daily,
    })
    .into_response()
}

pub async fn get_weekly_summary(State(state): State<AppState>, Query(q): Query<SummaryQuery>) -> impl IntoResponse {
    let store = state.store.lock();
    let Some(anchor) = resolve_date(q.date.as_deref(), store.now().date_naive()) else {
        return (StatusCode::BAD_REQUEST, "invalid date").into_response();
    };

    let weekly = store.weekly_summary(anchor, state.week_start);
    let totals = summary::ministry_totals(weekly.tasks());

    Json(WeeklySummaryResponse {
        total_formatted: summary::format_time_compact(weekly.total_time),
        task_count: weekly.tasks().count(),
        top_categories: top_categories(&weekly.category_breakdown),
        totals,
        summary: weekly,
    })
    .into_response()
}

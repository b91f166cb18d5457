/*
Daily / weekly rollups over the task list.
No store access and no side effects: the only input besides the tasks is
the clock (current instant and local-day rules), so the same clock state
always gives the same result. Safe to call every second for a live view.
*/

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::Serialize;

use crate::clock::Clock;
use crate::models::{Task, TaskCategory, TaskKind};

// Whole seconds between `since` and `now`, floored; clock skew counts as 0.
pub fn live_seconds(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - since).num_seconds()).unwrap_or(0)
}

/// Closed-session time plus the live duration of the open session, if any.
pub fn effective_elapsed(task: &Task, now: DateTime<Utc>) -> u64 {
    let live = task
        .current_session_start()
        .map_or(0, |since| live_seconds(since, now));
    task.total_time() + live
}

// Calendar day a task is attributed to: the local date of its creation,
// under the offset that applied at that instant.
pub fn local_day<C: Clock + ?Sized>(task: &Task, clock: &C) -> NaiveDate {
    clock.local_date(task.created_at)
}

/// Seconds per category. Always carries all seven categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryBreakdown(BTreeMap<TaskCategory, u64>);

impl Default for CategoryBreakdown {
    fn default() -> Self {
        Self(TaskCategory::ALL.iter().map(|c| (*c, 0)).collect())
    }
}

impl CategoryBreakdown {
    pub fn get(&self, category: TaskCategory) -> u64 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    pub fn add(&mut self, category: TaskCategory, secs: u64) {
        *self.0.entry(category).or_insert(0) += secs;
    }

    pub fn absorb(&mut self, other: &CategoryBreakdown) {
        for (category, secs) in other.iter() {
            self.add(category, secs);
        }
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskCategory, u64)> + '_ {
        self.0.iter().map(|(c, s)| (*c, *s))
    }

    /// Categories with time logged, most time first.
    pub fn top(&self) -> Vec<(TaskCategory, u64)> {
        let mut used: Vec<_> = self.iter().filter(|(_, s)| *s > 0).collect();
        used.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        used
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub total_time: u64,
    pub category_breakdown: CategoryBreakdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub daily_summaries: Vec<DailySummary>,
    pub total_time: u64,
    pub category_breakdown: CategoryBreakdown,
}

impl WeeklySummary {
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.daily_summaries.iter().flat_map(|d| d.tasks.iter())
    }
}

/// Build the summary for one local calendar day.
///
/// A task counts entirely toward the day it was created on, including any
/// live time of a running timer; sessions crossing midnight are not split.
pub fn daily_summary<C: Clock + ?Sized>(tasks: &[Task], date: NaiveDate, clock: &C) -> DailySummary {
    summarize_day(tasks, date, clock.now_utc(), clock)
}

// One day, with live time measured against a fixed `now_utc`.
fn summarize_day<C: Clock + ?Sized>(
    tasks: &[Task],
    date: NaiveDate,
    now_utc: DateTime<Utc>,
    clock: &C,
) -> DailySummary {
    let day_tasks: Vec<Task> = tasks
        .iter()
        .filter(|t| local_day(t, clock) == date)
        .cloned()
        .collect();

    let mut category_breakdown = CategoryBreakdown::default();
    let mut total_time = 0;
    for task in &day_tasks {
        let secs = effective_elapsed(task, now_utc);
        total_time += secs;
        category_breakdown.add(task.category(), secs);
    }

    DailySummary {
        date,
        tasks: day_tasks,
        total_time,
        category_breakdown,
    }
}

// First and last day of the 7-day window containing `date`.
pub fn week_bounds(date: NaiveDate, week_start: Weekday) -> (NaiveDate, NaiveDate) {
    let back = (date.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7;
    let start = date - Duration::days(i64::from(back));
    (start, start + Duration::days(6))
}

/// Build the summary for the week containing `anchor`: one daily summary
/// per day of the window plus their aggregate.
pub fn weekly_summary<C: Clock + ?Sized>(
    tasks: &[Task],
    anchor: NaiveDate,
    week_start: Weekday,
    clock: &C,
) -> WeeklySummary {
    let (week_start, week_end) = week_bounds(anchor, week_start);
    let now = clock.now_utc();

    let daily_summaries: Vec<DailySummary> = week_start
        .iter_days()
        .take(7)
        .map(|day| summarize_day(tasks, day, now, clock))
        .collect();

    let mut category_breakdown = CategoryBreakdown::default();
    let mut total_time = 0;
    for day in &daily_summaries {
        total_time += day.total_time;
        category_breakdown.absorb(&day.category_breakdown);
    }

    WeeklySummary {
        week_start,
        week_end,
        daily_summaries,
        total_time,
        category_breakdown,
    }
}

/// Counters recorded in category details, summed over a set of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinistryTotals {
    pub tracts_shared: u64,
    pub people_prayed: u64,
    pub repentances: u64,
    pub invitations: u64,
    pub chapters_read: u64,
    pub pages_read: u64,
}

pub fn ministry_totals<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> MinistryTotals {
    let mut totals = MinistryTotals::default();
    for task in tasks {
        match &task.kind {
            TaskKind::Evangelism(Some(d)) => {
                totals.tracts_shared += u64::from(d.tracts_shared);
                totals.people_prayed += u64::from(d.people_prayed);
                totals.repentances += u64::from(d.repentances);
                totals.invitations += u64::from(d.invitations);
            }
            TaskKind::BibleStudy(Some(d)) => totals.chapters_read += u64::from(d.chapters_read),
            TaskKind::Literature(Some(d)) => totals.pages_read += u64::from(d.pages_read),
            _ => {}
        }
    }
    totals
}

// "MM:SS", or "HH:MM:SS" once an hour is reached
pub fn format_time(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

// "Xm", or "Xh Ym" once an hour is reached
pub fn format_time_compact(secs: u64) -> String {
    let (h, m) = (secs / 3600, (secs % 3600) / 60);
    if h > 0 { format!("{h}h {m}m") } else { format!("{m}m") }
}

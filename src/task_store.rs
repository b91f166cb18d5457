/*
The task store: owns the task collection and every mutation of it.
Each mutation is a synchronous read-modify-write on the in-memory list,
followed by a save of the whole list through the repository.
Mutations on a missing task, or on a task already in the target state,
are no-ops and report `false`.
*/

use chrono::{DateTime, FixedOffset, NaiveDate, Utc, Weekday};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::models::{
    SubCategoryTime, Task, TaskCategory, TaskDraft, TaskId, TaskKind, TaskPatch, TaskSession,
    TimerState,
};
use crate::store::{MemoryStore, StoreError, TaskRepository};
use crate::summary::{self, DailySummary, WeeklySummary};

/// Persisted blob offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub contents: String,
}

pub struct TaskStore {
    tasks: Vec<Task>,
    repo: Box<dyn TaskRepository>,
    clock: Box<dyn Clock>,
}

impl TaskStore {
    /// Load the persisted collection once and take ownership of it.
    ///
    /// Malformed data is logged and replaced by an empty collection.
    pub fn open(repo: impl TaskRepository + 'static, clock: impl Clock + 'static) -> Self {
        let tasks = match repo.load() {
            Ok(tasks) => {
                info!(count = tasks.len(), "loaded tasks");
                tasks
            }
            Err(e) => {
                warn!(error = %e, "failed to load stored tasks, starting empty");
                Vec::new()
            }
        };

        Self {
            tasks,
            repo: Box::new(repo),
            clock: Box::new(clock),
        }
    }

    pub fn in_memory(clock: impl Clock + 'static) -> Self {
        Self::open(MemoryStore::new(), clock)
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // Fire-and-forget: a failed save is logged, never surfaced.
    fn persist(&self) {
        if let Err(e) = self.repo.save(&self.tasks) {
            error!(error = %e, "failed to save tasks");
        }
    }

    // Apply `f` to the task with `id`; bump updated_at and save when it
    // reports a change.
    fn mutate(&mut self, id: &TaskId, f: impl FnOnce(&mut Task, DateTime<Utc>) -> bool) -> bool {
        let now = self.clock.now_utc();
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            debug!(task_id = %id, "task not found");
            return false;
        };
        if !f(task, now) {
            return false;
        }
        task.updated_at = task.updated_at.max(now);
        self.persist();
        true
    }

    // -----------------------------
    // CRUD
    // -----------------------------

    pub fn create(&mut self, draft: TaskDraft) -> Task {
        let now = self.clock.now_utc();
        let category = draft.category.unwrap_or_default();
        let title = draft
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| category.label().to_string());

        let task = Task {
            id: TaskId::new(),
            title,
            kind: TaskKind::from_parts(category, draft.details),
            description: draft.description,
            location: draft.location,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
            sessions: Vec::new(),
            timer: TimerState::Idle,
            current_sub_category: None,
            custom_sub_categories: Vec::new(),
            sub_category_breakdown: Vec::new(),
        };

        debug!(task_id = %task.id, ?category, "task created");
        self.tasks.insert(0, task.clone());
        self.persist();
        task
    }

    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) -> bool {
        self.mutate(id, |task, _| {
            if let Some(title) = patch.title {
                task.title = title;
            }
            if patch.description.is_some() {
                task.description = patch.description;
            }
            if patch.location.is_some() {
                task.location = patch.location;
            }
            if patch.notes.is_some() {
                task.notes = patch.notes;
            }
            task.kind = task.kind.merged(patch.category, patch.details);
            true
        })
    }

    pub fn delete(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        debug!(task_id = %id, "task deleted");
        self.persist();
        true
    }

    // -----------------------------
    // Timer
    // -----------------------------

    /// Idle -> Running. A running timer keeps its original start.
    pub fn start_timer(&mut self, id: &TaskId) -> bool {
        self.mutate(id, |task, now| match task.timer {
            TimerState::Running { .. } => false,
            TimerState::Idle => {
                task.timer = TimerState::Running { since: now };
                debug!(task_id = %task.id, "timer started");
                true
            }
        })
    }

    /// Running -> Idle, closing the open session.
    pub fn pause_timer(&mut self, id: &TaskId) -> bool {
        self.mutate(id, |task, now| match task.timer {
            TimerState::Idle => false,
            TimerState::Running { since } => {
                let duration = close_session(task, since, now);
                task.timer = TimerState::Idle;
                debug!(task_id = %task.id, duration, "timer paused");
                true
            }
        })
    }

    /// Switch the sub-category the running time is attributed to.
    ///
    /// On a running task the time since the session start is closed into a
    /// session for the previous sub-category and a new session opens at
    /// `now`; the timer stays running throughout. On an idle task only the
    /// label changes.
    pub fn change_sub_category(&mut self, id: &TaskId, sub_category: impl Into<String>) -> bool {
        let sub_category = sub_category.into();
        self.mutate(id, |task, now| {
            switch_sub_category(task, sub_category, now);
            true
        })
    }

    /// Add a user-defined sub-category (exact, case-sensitive match dedupes).
    pub fn add_custom_sub_category(&mut self, id: &TaskId, name: impl Into<String>) -> bool {
        let name = name.into();
        self.mutate(id, |task, _| {
            if task.custom_sub_categories.contains(&name) {
                return false;
            }
            task.custom_sub_categories.push(name);
            true
        })
    }

    pub fn effective_elapsed(&self, id: &TaskId) -> Option<u64> {
        let now = self.clock.now_utc();
        self.get(id).map(|t| summary::effective_elapsed(t, now))
    }

    // -----------------------------
    // Derived views
    // -----------------------------

    pub fn active_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_active()).collect()
    }

    // Tasks created on the current local calendar day
    pub fn today_tasks(&self) -> Vec<&Task> {
        let today = self.clock.today();
        self.tasks
            .iter()
            .filter(|t| summary::local_day(t, self.clock.as_ref()) == today)
            .collect()
    }

    pub fn tasks_by_category(&self, category: TaskCategory) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.category() == category).collect()
    }

    // created_at within [start, end], both inclusive
    pub fn tasks_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.created_at >= start && t.created_at <= end)
            .collect()
    }

    pub fn daily_summary(&self, date: NaiveDate) -> DailySummary {
        summary::daily_summary(&self.tasks, date, self.clock.as_ref())
    }

    pub fn weekly_summary(&self, anchor: NaiveDate, week_start: Weekday) -> WeeklySummary {
        summary::weekly_summary(&self.tasks, anchor, week_start, self.clock.as_ref())
    }

    // -----------------------------
    // Data management
    // -----------------------------

    /// The persisted blob as stored, named after the current local date.
    /// `Ok(None)` when nothing has been stored yet.
    pub fn export(&self) -> Result<Option<Export>, StoreError> {
        let Some(contents) = self.repo.read_raw().inspect_err(|e| {
            error!(error = %e, "failed to read stored tasks for export");
        })?
        else {
            return Ok(None);
        };
        let date = self.clock.now().format("%Y-%m-%d");
        Ok(Some(Export {
            filename: format!("ministry-tracker-data-{date}.json"),
            contents,
        }))
    }

    /// Drop every task and remove the persisted blob.
    pub fn clear_all(&mut self) {
        if let Err(e) = self.repo.clear() {
            error!(error = %e, "failed to remove stored tasks");
        }
        info!(count = self.tasks.len(), "all tasks cleared");
        self.tasks.clear();
    }
}

// Close the open interval [since, now] into a session tagged with the
// current sub-category; returns its whole-second duration.
fn close_session(task: &mut Task, since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let duration = summary::live_seconds(since, now);
    let sub_category = task.current_sub_category.clone();

    if let Some(name) = &sub_category {
        match task
            .sub_category_breakdown
            .iter_mut()
            .find(|s| &s.sub_category == name)
        {
            Some(entry) => entry.duration += duration,
            None => task.sub_category_breakdown.push(SubCategoryTime {
                sub_category: name.clone(),
                duration,
            }),
        }
    }

    task.sessions.push(TaskSession {
        id: TaskId::new().to_string(),
        start_time: since,
        end_time: Some(now),
        duration,
        sub_category,
    });
    duration
}

// Running: close the elapsed part under the old label and reopen at `now`.
// A split with no whole second elapsed keeps the current start.
fn switch_sub_category(task: &mut Task, sub_category: String, now: DateTime<Utc>) {
    if let TimerState::Running { since } = task.timer {
        if summary::live_seconds(since, now) > 0 {
            close_session(task, since, now);
            task.timer = TimerState::Running { since: now };
        }
    }
    debug!(task_id = %task.id, sub_category = %sub_category, "sub-category changed");
    task.current_sub_category = Some(sub_category);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::{DetailFields, EvangelismDetails};
    use chrono::{Duration, TimeZone};
    use std::io;

    // Repository whose reads always fail
    struct UnreadableStore;

    impl TaskRepository for UnreadableStore {
        fn read_raw(&self) -> Result<Option<String>, StoreError> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied").into())
        }

        fn write_raw(&self, _blob: &str) -> Result<(), StoreError> {
            Ok(())
        }

        fn clear(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn start() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 9, 20, 9, 0, 0)
            .unwrap()
    }

    fn fixture() -> (TaskStore, ManualClock, MemoryStore) {
        let clock = ManualClock::new(start());
        let repo = MemoryStore::new();
        let store = TaskStore::open(repo.clone(), clock.clone());
        (store, clock, repo)
    }

    #[test]
    fn create_fills_defaults_and_prepends() {
        let (mut store, clock, repo) = fixture();

        let first = store.create(TaskDraft::new(TaskCategory::BibleStudy));
        clock.advance_secs(5);
        let second = store.create(TaskDraft::default().title("Visit hospital"));

        assert_eq!(first.title, "Bible Study");
        assert_eq!(first.category(), TaskCategory::BibleStudy);
        assert_eq!(first.created_at, first.updated_at);
        assert!(first.sessions.is_empty());
        assert_eq!(first.total_time(), 0);
        assert!(!first.is_active());
        assert_eq!(second.category(), TaskCategory::Other);
        assert_eq!(store.tasks()[0].id, second.id);
        assert_eq!(repo.load().unwrap().len(), 2);
    }

    #[test]
    fn create_keeps_only_matching_details() {
        let (mut store, _, _) = fixture();
        let draft = TaskDraft {
            category: Some(TaskCategory::Evangelism),
            details: DetailFields {
                evangelism_details: Some(EvangelismDetails {
                    tracts_shared: 30,
                    ..EvangelismDetails::default()
                }),
                literature_details: Some(Default::default()),
                ..DetailFields::default()
            },
            ..TaskDraft::default()
        };

        let task = store.create(draft);
        assert!(matches!(task.kind, TaskKind::Evangelism(Some(ref d)) if d.tracts_shared == 30));
    }

    #[test]
    fn start_then_pause_records_one_session() {
        let (mut store, clock, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::BibleStudy)).id;

        assert!(store.start_timer(&id));
        clock.advance_secs(125);
        assert!(store.pause_timer(&id));

        let task = store.get(&id).unwrap();
        assert_eq!(task.sessions.len(), 1);
        assert_eq!(task.sessions[0].duration, 125);
        assert_eq!(task.sessions[0].start_time, start().with_timezone(&Utc));
        assert_eq!(task.sessions[0].end_time, Some(clock.now_utc()));
        assert_eq!(task.total_time(), 125);
        assert!(!task.is_active());
        assert_eq!(task.current_session_start(), None);
    }

    #[test]
    fn pause_on_idle_task_is_noop() {
        let (mut store, clock, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Prayer)).id;
        store.start_timer(&id);
        clock.advance_secs(30);
        store.pause_timer(&id);
        let before = store.get(&id).unwrap().clone();

        clock.advance_secs(30);
        assert!(!store.pause_timer(&id));

        assert_eq!(store.get(&id).unwrap(), &before);
    }

    #[test]
    fn start_on_running_task_keeps_original_start() {
        let (mut store, clock, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Prayer)).id;
        store.start_timer(&id);
        clock.advance_secs(40);

        assert!(!store.start_timer(&id));
        assert_eq!(
            store.get(&id).unwrap().current_session_start(),
            Some(start().with_timezone(&Utc))
        );
        assert_eq!(store.effective_elapsed(&id), Some(40));
    }

    #[test]
    fn missing_ids_are_ignored() {
        let (mut store, _, repo) = fixture();
        let ghost = TaskId::from("ghost");

        assert!(!store.update(&ghost, TaskPatch::default()));
        assert!(!store.delete(&ghost));
        assert!(!store.start_timer(&ghost));
        assert!(!store.pause_timer(&ghost));
        assert!(!store.change_sub_category(&ghost, "x"));
        assert!(!store.add_custom_sub_category(&ghost, "x"));
        assert_eq!(store.effective_elapsed(&ghost), None);
        assert!(repo.blob().is_none());
    }

    #[test]
    fn effective_elapsed_never_decreases() {
        let (mut store, clock, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Meditation)).id;
        let mut last = 0;

        for step in 0..6 {
            if step % 2 == 0 {
                store.start_timer(&id);
            } else {
                store.pause_timer(&id);
            }
            clock.advance_secs(17);
            let now = store.effective_elapsed(&id).unwrap();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 17 * 3);
    }

    #[test]
    fn sub_category_change_splits_running_time() {
        let (mut store, clock, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Evangelism)).id;
        store.change_sub_category(&id, "Street Evangelism");
        store.start_timer(&id);
        clock.advance_secs(300);

        assert!(store.change_sub_category(&id, "Door-to-Door"));

        let task = store.get(&id).unwrap();
        assert!(task.is_active());
        assert_eq!(task.current_session_start(), Some(clock.now_utc()));
        assert_eq!(task.current_sub_category.as_deref(), Some("Door-to-Door"));
        assert_eq!(task.sessions.len(), 1);
        assert_eq!(task.sessions[0].sub_category.as_deref(), Some("Street Evangelism"));
        assert_eq!(task.sub_category_time("Street Evangelism"), 300);
        assert_eq!(task.total_time(), 300);

        clock.advance_secs(120);
        store.pause_timer(&id);

        let task = store.get(&id).unwrap();
        assert_eq!(task.total_time(), 420);
        assert_eq!(task.sub_category_time("Door-to-Door"), 120);
        let breakdown: u64 = task.sub_category_breakdown.iter().map(|s| s.duration).sum();
        assert!(breakdown <= task.total_time());
    }

    #[test]
    fn sub_category_change_accumulates_existing_entry() {
        let (mut store, clock, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Prayer)).id;
        store.change_sub_category(&id, "Intercession");
        store.start_timer(&id);
        clock.advance_secs(60);
        store.change_sub_category(&id, "Thanksgiving");
        clock.advance_secs(10);
        store.change_sub_category(&id, "Intercession");
        clock.advance_secs(60);
        store.pause_timer(&id);

        let task = store.get(&id).unwrap();
        assert_eq!(task.sessions.len(), 3);
        assert_eq!(task.sub_category_breakdown.len(), 2);
        assert_eq!(task.sub_category_time("Intercession"), 120);
        assert_eq!(task.sub_category_time("Thanksgiving"), 10);
    }

    #[test]
    fn sub_category_change_without_label_keeps_time() {
        let (mut store, clock, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Other)).id;
        store.start_timer(&id);
        clock.advance_secs(45);

        store.change_sub_category(&id, "Training");

        let task = store.get(&id).unwrap();
        assert!(task.is_active());
        assert_eq!(task.total_time(), 45);
        assert_eq!(task.sessions[0].sub_category, None);
        assert!(task.sub_category_breakdown.is_empty());
        assert_eq!(store.effective_elapsed(&id), Some(45));
    }

    #[test]
    fn sub_category_change_with_no_elapsed_keeps_start() {
        let (mut store, _, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Evangelism)).id;
        store.change_sub_category(&id, "Street Evangelism");
        store.start_timer(&id);

        assert!(store.change_sub_category(&id, "Door-to-Door"));

        let task = store.get(&id).unwrap();
        assert!(task.is_active());
        assert!(task.sessions.is_empty());
        assert!(task.sub_category_breakdown.is_empty());
        assert_eq!(task.current_session_start(), Some(start().with_timezone(&Utc)));
        assert_eq!(task.current_sub_category.as_deref(), Some("Door-to-Door"));
        assert_eq!(store.effective_elapsed(&id), Some(0));
    }

    #[test]
    fn sub_category_change_on_idle_task_only_relabels() {
        let (mut store, _, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Fellowship)).id;

        assert!(store.change_sub_category(&id, "Cell Meeting"));

        let task = store.get(&id).unwrap();
        assert!(!task.is_active());
        assert!(task.sessions.is_empty());
        assert_eq!(task.current_sub_category.as_deref(), Some("Cell Meeting"));
    }

    #[test]
    fn custom_sub_categories_are_a_set() {
        let (mut store, _, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Literature)).id;

        assert!(store.add_custom_sub_category(&id, "Missions"));
        assert!(!store.add_custom_sub_category(&id, "Missions"));
        assert!(store.add_custom_sub_category(&id, "missions"));

        assert_eq!(store.get(&id).unwrap().custom_sub_categories, vec!["Missions", "missions"]);
    }

    #[test]
    fn update_merges_fields_and_bumps_updated_at() {
        let (mut store, clock, repo) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Evangelism)).id;
        clock.advance_secs(60);

        let patch = TaskPatch {
            notes: Some("met two students".to_string()),
            details: DetailFields {
                evangelism_details: Some(EvangelismDetails {
                    tracts_shared: 8,
                    ..EvangelismDetails::default()
                }),
                ..DetailFields::default()
            },
            ..TaskPatch::default()
        };
        assert!(store.update(&id, patch));

        let task = store.get(&id).unwrap();
        assert_eq!(task.title, "Evangelism");
        assert_eq!(task.notes.as_deref(), Some("met two students"));
        assert_eq!(task.updated_at, clock.now_utc());
        assert!(task.updated_at > task.created_at);
        assert!(matches!(task.kind, TaskKind::Evangelism(Some(ref d)) if d.tracts_shared == 8));
        assert_eq!(repo.load().unwrap()[0].notes.as_deref(), Some("met two students"));
    }

    #[test]
    fn updated_at_does_not_go_backwards() {
        let (mut store, clock, _) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Other)).id;
        clock.advance(Duration::minutes(-10));

        store.update(&id, TaskPatch::default());

        let task = store.get(&id).unwrap();
        assert_eq!(task.updated_at, task.created_at);
    }

    #[test]
    fn delete_removes_and_persists() {
        let (mut store, _, repo) = fixture();
        let keep = store.create(TaskDraft::new(TaskCategory::Prayer)).id;
        let drop = store.create(TaskDraft::new(TaskCategory::Prayer)).id;

        assert!(store.delete(&drop));

        assert_eq!(store.len(), 1);
        let stored = repo.load().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, keep);
    }

    #[test]
    fn reopening_restores_running_timer() {
        let (mut store, clock, repo) = fixture();
        let id = store.create(TaskDraft::new(TaskCategory::Prayer)).id;
        store.start_timer(&id);
        clock.advance_secs(90);
        store.pause_timer(&id);
        store.start_timer(&id);
        let saved: Vec<Task> = store.tasks().to_vec();

        let reopened = TaskStore::open(repo, clock.clone());

        assert_eq!(reopened.tasks(), saved.as_slice());
        clock.advance_secs(10);
        assert_eq!(reopened.effective_elapsed(&id), Some(100));
    }

    #[test]
    fn malformed_blob_starts_empty() {
        let clock = ManualClock::new(start());
        let store = TaskStore::open(MemoryStore::with_blob("[{\"id\":"), clock);
        assert!(store.is_empty());
    }

    #[test]
    fn queries_filter_current_collection() {
        let (mut store, clock, _) = fixture();
        let yesterday = store.create(TaskDraft::new(TaskCategory::Prayer)).id;
        clock.advance(Duration::days(1));
        let today_a = store.create(TaskDraft::new(TaskCategory::Prayer)).id;
        let today_b = store.create(TaskDraft::new(TaskCategory::Evangelism)).id;
        store.start_timer(&today_b);

        let today: Vec<_> = store.today_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(today, vec![today_b.clone(), today_a.clone()]);

        let active: Vec<_> = store.active_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(active, vec![today_b]);

        assert_eq!(store.tasks_by_category(TaskCategory::Prayer).len(), 2);

        let from = start().with_timezone(&Utc);
        let range = store.tasks_by_date_range(from, from);
        assert_eq!(range.len(), 1);
        assert_eq!(range[0].id, yesterday);
    }

    #[test]
    fn date_range_end_is_inclusive() {
        let (mut store, clock, _) = fixture();
        let first = store.create(TaskDraft::new(TaskCategory::Prayer)).id;
        clock.advance_secs(3600);
        let second = store.create(TaskDraft::new(TaskCategory::Prayer));
        clock.advance_secs(1);
        store.create(TaskDraft::new(TaskCategory::Prayer));

        let range: Vec<_> = store
            .tasks_by_date_range(start().with_timezone(&Utc), second.created_at)
            .iter()
            .map(|t| t.id.clone())
            .collect();

        assert_eq!(range, vec![second.id.clone(), first]);

        let just_before = second.created_at - Duration::seconds(1);
        assert!(store
            .tasks_by_date_range(just_before - Duration::seconds(1), just_before)
            .is_empty());
    }

    #[test]
    fn today_keeps_tasks_on_their_creation_day_across_offset_change() {
        let summer = FixedOffset::east_opt(2 * 3600).unwrap();
        let winter = FixedOffset::east_opt(3600).unwrap();
        let clock = ManualClock::new(summer.with_ymd_and_hms(2026, 10, 20, 0, 30, 0).unwrap());
        clock.change_offset(Utc.with_ymd_and_hms(2026, 10, 25, 1, 0, 0).unwrap(), winter);
        let mut store = TaskStore::in_memory(clock.clone());
        let id = store.create(TaskDraft::new(TaskCategory::Prayer)).id;
        store.start_timer(&id);
        clock.advance_secs(600);
        store.pause_timer(&id);

        clock.set(Utc.with_ymd_and_hms(2026, 11, 2, 11, 0, 0).unwrap());

        let oct19 = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let oct20 = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        assert_eq!(store.daily_summary(oct19).total_time, 0);
        assert_eq!(store.daily_summary(oct20).total_time, 600);
        assert!(store.today_tasks().is_empty());
    }

    #[test]
    fn today_summary_matches_logged_time() {
        let (mut store, clock, _) = fixture();
        store.create(TaskDraft::new(TaskCategory::Evangelism));
        let prayer = store.create(TaskDraft::new(TaskCategory::Prayer)).id;
        store.start_timer(&prayer);
        clock.advance_secs(600);
        store.pause_timer(&prayer);

        let s = store.daily_summary(clock.now().date_naive());
        assert_eq!(s.total_time, 600);
        assert_eq!(s.category_breakdown.get(TaskCategory::Prayer), 600);
        assert_eq!(s.category_breakdown.get(TaskCategory::Evangelism), 0);

        let w = store.weekly_summary(clock.now().date_naive(), Weekday::Sun);
        assert_eq!(w.total_time, 600);
    }

    #[test]
    fn export_uses_stored_blob() {
        let (mut store, _, repo) = fixture();
        assert!(matches!(store.export(), Ok(None)));

        store.create(TaskDraft::new(TaskCategory::Prayer));
        let export = store.export().unwrap().unwrap();

        assert_eq!(export.filename, "ministry-tracker-data-2026-09-20.json");
        assert_eq!(Some(export.contents), repo.blob());
    }

    #[test]
    fn clear_all_removes_everything() {
        let (mut store, _, repo) = fixture();
        store.create(TaskDraft::new(TaskCategory::Prayer));

        store.clear_all();

        assert!(store.is_empty());
        assert!(repo.blob().is_none());
        assert!(matches!(store.export(), Ok(None)));
    }

    #[test]
    fn export_reports_read_failure() {
        let store = TaskStore::open(UnreadableStore, ManualClock::new(start()));

        assert!(store.is_empty());
        assert!(matches!(store.export(), Err(StoreError::Io(_))));
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Opaque task identifier.
// New ids are UUID v4 strings; ids found in older exports are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Evangelism,
    Prayer,
    BibleStudy,
    Meditation,
    Literature,
    Fellowship,
    #[default]
    Other,
}

impl TaskCategory {
    // Fixed display / breakdown order
    pub const ALL: [TaskCategory; 7] = [
        TaskCategory::Evangelism,
        TaskCategory::Prayer,
        TaskCategory::BibleStudy,
        TaskCategory::Meditation,
        TaskCategory::Literature,
        TaskCategory::Fellowship,
        TaskCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskCategory::Evangelism => "Evangelism",
            TaskCategory::Prayer => "Prayer",
            TaskCategory::BibleStudy => "Bible Study",
            TaskCategory::Meditation => "Meditation",
            TaskCategory::Literature => "Christian Literature",
            TaskCategory::Fellowship => "Fellowship",
            TaskCategory::Other => "Other Ministry",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TaskCategory::Evangelism => "📢",
            TaskCategory::Prayer => "🙏",
            TaskCategory::BibleStudy => "📖",
            TaskCategory::Meditation => "🕊️",
            TaskCategory::Literature => "📚",
            TaskCategory::Fellowship => "🤝",
            TaskCategory::Other => "✨",
        }
    }

    /// Built-in sub-categories offered for every task of this category.
    pub fn default_sub_categories(self) -> &'static [&'static str] {
        match self {
            TaskCategory::Evangelism => &[
                "Street Evangelism",
                "Door-to-Door",
                "Campus Outreach",
                "Hospital Visitation",
                "Market Evangelism",
                "One-on-One",
                "Online Evangelism",
            ],
            TaskCategory::Prayer => &[
                "Personal Prayer",
                "Intercession",
                "Group Prayer",
                "Night Vigil",
                "Fasting Prayer",
                "Warfare Prayer",
                "Thanksgiving",
            ],
            TaskCategory::BibleStudy => &[
                "Personal Study",
                "Group Study",
                "Bible School",
                "Devotional",
                "Topical Study",
                "Book Study",
            ],
            TaskCategory::Meditation => &[
                "Scripture Meditation",
                "Worship Meditation",
                "Silent Meditation",
                "Listening Prayer",
            ],
            TaskCategory::Literature => &[
                "Christian Books",
                "Devotionals",
                "Theology",
                "Biography",
                "Ministry Materials",
            ],
            TaskCategory::Fellowship => &[
                "Cell Meeting",
                "Youth Fellowship",
                "Sunday Service",
                "Bible Study Group",
                "Prayer Meeting",
                "Outreach Team",
            ],
            TaskCategory::Other => &["Ministry Work", "Volunteer Service", "Training", "Other"],
        }
    }
}

// -----------------------------
// Category-specific details
// -----------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EvangelismDetails {
    pub tracts_shared: u32,
    pub people_prayed: u32,
    pub repentances: u32,
    pub invitations: u32,
    pub location: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrayerType {
    #[default]
    Personal,
    Group,
    Intercession,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PrayerDetails {
    pub prayer_type: PrayerType,
    pub prayer_points: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BibleStudyDetails {
    pub chapters_read: u32,
    pub book: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MeditationDetails {
    pub scripture: String,
    pub revelation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LiteratureDetails {
    pub title: String,
    pub author: String,
    pub pages_read: u32,
}

/// The loose "one optional field per category" shape used on the wire and
/// in the persisted blob. Only the entry matching the task's category
/// survives conversion into a [`TaskKind`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evangelism_details: Option<EvangelismDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prayer_details: Option<PrayerDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bible_study_details: Option<BibleStudyDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meditation_details: Option<MeditationDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literature_details: Option<LiteratureDetails>,
}

/// A task's category together with the detail record that belongs to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskKind {
    Evangelism(Option<EvangelismDetails>),
    Prayer(Option<PrayerDetails>),
    BibleStudy(Option<BibleStudyDetails>),
    Meditation(Option<MeditationDetails>),
    Literature(Option<LiteratureDetails>),
    Fellowship,
    #[default]
    Other,
}

impl TaskKind {
    pub fn category(&self) -> TaskCategory {
        match self {
            TaskKind::Evangelism(_) => TaskCategory::Evangelism,
            TaskKind::Prayer(_) => TaskCategory::Prayer,
            TaskKind::BibleStudy(_) => TaskCategory::BibleStudy,
            TaskKind::Meditation(_) => TaskCategory::Meditation,
            TaskKind::Literature(_) => TaskCategory::Literature,
            TaskKind::Fellowship => TaskCategory::Fellowship,
            TaskKind::Other => TaskCategory::Other,
        }
    }

    // Picks the detail record matching `category`, discarding the rest.
    pub fn from_parts(category: TaskCategory, details: DetailFields) -> Self {
        match category {
            TaskCategory::Evangelism => TaskKind::Evangelism(details.evangelism_details),
            TaskCategory::Prayer => TaskKind::Prayer(details.prayer_details),
            TaskCategory::BibleStudy => TaskKind::BibleStudy(details.bible_study_details),
            TaskCategory::Meditation => TaskKind::Meditation(details.meditation_details),
            TaskCategory::Literature => TaskKind::Literature(details.literature_details),
            TaskCategory::Fellowship => TaskKind::Fellowship,
            TaskCategory::Other => TaskKind::Other,
        }
    }

    pub fn into_parts(self) -> (TaskCategory, DetailFields) {
        let category = self.category();
        let mut details = DetailFields::default();
        match self {
            TaskKind::Evangelism(d) => details.evangelism_details = d,
            TaskKind::Prayer(d) => details.prayer_details = d,
            TaskKind::BibleStudy(d) => details.bible_study_details = d,
            TaskKind::Meditation(d) => details.meditation_details = d,
            TaskKind::Literature(d) => details.literature_details = d,
            TaskKind::Fellowship | TaskKind::Other => {}
        }
        (category, details)
    }

    pub fn has_details(&self) -> bool {
        match self {
            TaskKind::Evangelism(d) => d.is_some(),
            TaskKind::Prayer(d) => d.is_some(),
            TaskKind::BibleStudy(d) => d.is_some(),
            TaskKind::Meditation(d) => d.is_some(),
            TaskKind::Literature(d) => d.is_some(),
            TaskKind::Fellowship | TaskKind::Other => false,
        }
    }

    // Result of applying an optional category change and detail update.
    //
    // - category changes: details are taken from `details` (or none)
    // - same category: details replaced only when a matching record is given
    pub fn merged(&self, category: Option<TaskCategory>, details: DetailFields) -> Self {
        let category = category.unwrap_or_else(|| self.category());
        let incoming = TaskKind::from_parts(category, details);
        if category != self.category() || incoming.has_details() {
            incoming
        } else {
            self.clone()
        }
    }
}

// -----------------------------
// Timing
// -----------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub duration: u64, // seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryTime {
    pub sub_category: String,
    pub duration: u64, // seconds
}

/// Stopwatch state of a single task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimerState {
    #[default]
    Idle,
    Running { since: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub kind: TaskKind,
    pub description: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sessions: Vec<TaskSession>,
    pub timer: TimerState,
    pub current_sub_category: Option<String>,
    pub custom_sub_categories: Vec<String>,
    pub sub_category_breakdown: Vec<SubCategoryTime>,
}

impl Task {
    pub fn category(&self) -> TaskCategory {
        self.kind.category()
    }

    // Sum of all closed sessions; the open interval is not included.
    pub fn total_time(&self) -> u64 {
        self.sessions.iter().map(|s| s.duration).sum()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.timer, TimerState::Running { .. })
    }

    pub fn current_session_start(&self) -> Option<DateTime<Utc>> {
        match self.timer {
            TimerState::Running { since } => Some(since),
            TimerState::Idle => None,
        }
    }

    /// Category defaults followed by this task's own custom sub-categories.
    pub fn all_sub_categories(&self) -> Vec<String> {
        self.category()
            .default_sub_categories()
            .iter()
            .map(|s| s.to_string())
            .chain(self.custom_sub_categories.iter().cloned())
            .collect()
    }

    pub fn sub_category_time(&self, name: &str) -> u64 {
        self.sub_category_breakdown
            .iter()
            .find(|s| s.sub_category == name)
            .map_or(0, |s| s.duration)
    }
}

// Persisted shape of a task (camelCase, flat detail fields).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: TaskId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: TaskCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    sessions: Vec<TaskSession>,
    // written for readers of the blob; recomputed from sessions on load
    #[serde(default)]
    total_time: u64,
    #[serde(default)]
    is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_session_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_sub_category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    custom_sub_categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sub_category_breakdown: Vec<SubCategoryTime>,
    #[serde(flatten)]
    details: DetailFields,
}

impl From<TaskRecord> for Task {
    fn from(r: TaskRecord) -> Self {
        let timer = match (r.is_active, r.current_session_start) {
            (true, Some(since)) => TimerState::Running { since },
            _ => TimerState::Idle,
        };
        Task {
            id: r.id,
            title: r.title,
            kind: TaskKind::from_parts(r.category, r.details),
            description: r.description,
            location: r.location,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
            sessions: r.sessions,
            timer,
            current_sub_category: r.current_sub_category,
            custom_sub_categories: r.custom_sub_categories,
            sub_category_breakdown: r.sub_category_breakdown,
        }
    }
}

impl From<Task> for TaskRecord {
    fn from(t: Task) -> Self {
        let total_time = t.total_time();
        let is_active = t.is_active();
        let current_session_start = t.current_session_start();
        let (category, details) = t.kind.into_parts();
        TaskRecord {
            id: t.id,
            title: t.title,
            category,
            description: t.description,
            location: t.location,
            notes: t.notes,
            created_at: t.created_at,
            updated_at: t.updated_at,
            sessions: t.sessions,
            total_time,
            is_active,
            current_session_start,
            current_sub_category: t.current_sub_category,
            custom_sub_categories: t.custom_sub_categories,
            sub_category_breakdown: t.sub_category_breakdown,
            details,
        }
    }
}

// -----------------------------
// Inputs
// -----------------------------

/// Fields accepted when creating a task. Everything is optional:
/// category defaults to `other`, title to the category label.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub category: Option<TaskCategory>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub details: DetailFields,
}

impl TaskDraft {
    pub fn new(category: TaskCategory) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Partial update. Timing state is not part of it: sessions and the
/// running timer only change through the timer operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub category: Option<TaskCategory>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub details: DetailFields,
}

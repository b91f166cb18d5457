/*
Wall-clock source for the task store.
Injected so the stopwatch can be driven by a stubbed clock in tests.
Also owns the local-time rules that map an instant to its calendar day.
*/

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    /// Current instant in local wall time.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Local calendar day of `at`, using the offset in force at that
    /// instant (not the current one).
    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate;

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

// Local -> FixedOffset (uses the current system offset)
pub fn now_fixed_offset() -> DateTime<FixedOffset> {
    chrono::Local::now().fixed_offset()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        now_fixed_offset()
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&chrono::Local).date_naive()
    }
}

#[derive(Debug)]
struct ManualTime {
    now: DateTime<Utc>,
    base_offset: FixedOffset,
    // (from, offset) pairs sorted by `from`
    offset_changes: Vec<(DateTime<Utc>, FixedOffset)>,
}

impl ManualTime {
    fn offset_at(&self, at: DateTime<Utc>) -> FixedOffset {
        self.offset_changes
            .iter()
            .rev()
            .find(|(from, _)| *from <= at)
            .map_or(self.base_offset, |(_, offset)| *offset)
    }
}

/// Manually driven clock. Clones share the same state, so a test can keep
/// one handle and give another to the store.
///
/// Starts with the offset of its start instant; `change_offset` adds a
/// rule switch (a DST transition, for instance) at a given instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<Mutex<ManualTime>>,
}

impl ManualClock {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            time: Arc::new(Mutex::new(ManualTime {
                now: start.with_timezone(&Utc),
                base_offset: *start.offset(),
                offset_changes: Vec::new(),
            })),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.time.lock().now = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut time = self.time.lock();
        time.now += by;
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }

    pub fn change_offset(&self, from: DateTime<Utc>, offset: FixedOffset) {
        let mut time = self.time.lock();
        time.offset_changes.push((from, offset));
        time.offset_changes.sort_by_key(|(from, _)| *from);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let time = self.time.lock();
        time.now.with_timezone(&time.offset_at(time.now))
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        let time = self.time.lock();
        at.with_timezone(&time.offset_at(at)).date_naive()
    }
}

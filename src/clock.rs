use time::OffsetDateTime;

use crate::model::EntryDate;

/// Source of "today" for the editor.
pub trait Clock {
    fn today(&self) -> EntryDate;
}

/// Wall clock in the local timezone, falling back to UTC when the local
/// offset cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> EntryDate {
        let now = OffsetDateTime::now_local().unwrap_or_else(|err| {
            tracing::debug!(?err, "local offset unavailable, using UTC");
            OffsetDateTime::now_utc()
        });
        EntryDate::new(now.date())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub EntryDate);

impl Clock for FixedClock {
    fn today(&self) -> EntryDate {
        self.0
    }
}

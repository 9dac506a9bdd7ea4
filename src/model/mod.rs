//! Diary data model.
//!
//! An entry is keyed by its calendar date; there is at most one entry per
//! date and edits replace the entry wholesale.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use time::macros::format_description;
use time::{Date, Month};

use crate::error::{DiaryError, DiaryResult};

/// Calendar day, rendered and parsed as `YYYY-MM-DD`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct EntryDate(Date);

impl EntryDate {
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> DiaryResult<Self> {
        let month = Month::try_from(month).map_err(|_| DiaryError::InvalidDate {
            input: format!("{year:04}-{month:02}-{day:02}"),
        })?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| DiaryError::InvalidDate {
                input: format!("{year:04}-{:02}-{day:02}", u8::from(month)),
            })
    }

    pub fn as_date(&self) -> Date {
        self.0
    }

    pub fn next_day(&self) -> DiaryResult<Self> {
        self.0.next_day().map(Self).ok_or_else(|| DiaryError::DateOutOfRange {
            from: self.to_string(),
        })
    }

    pub fn previous_day(&self) -> DiaryResult<Self> {
        self.0
            .previous_day()
            .map(Self)
            .ok_or_else(|| DiaryError::DateOutOfRange {
                from: self.to_string(),
            })
    }

    /// Long form used in headers, e.g. `Tuesday, June 25 2024`.
    pub fn long_label(&self) -> String {
        self.0
            .format(&format_description!(
                "[weekday repr:long], [month repr:long] [day padding:none] [year]"
            ))
            .unwrap_or_else(|_| self.to_string())
    }
}

impl From<Date> for EntryDate {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl FromStr for EntryDate {
    type Err = DiaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Date::parse(trimmed, &format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| DiaryError::InvalidDate {
                input: trimmed.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiaryEntry {
    pub date: EntryDate,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl DiaryEntry {
    pub fn new(
        date: EntryDate,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            date,
            title: title.into(),
            content: content.into(),
            tags,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Intersection test: an empty filter matches every entry.
    pub fn has_all_tags<'a, I>(&self, filter: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        filter.into_iter().all(|tag| self.has_tag(tag))
    }

    pub fn preview(&self, lines: usize) -> String {
        if lines == 0 {
            return String::new();
        }
        let mut out = Vec::with_capacity(lines);
        for line in self.content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            out.push(trimmed);
            if out.len() == lines {
                break;
            }
        }
        out.join("\n")
    }
}

/// Picker-facing view of a tag. Always derived from `tags`, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagOption {
    pub value: String,
    pub label: String,
}

impl TagOption {
    pub fn new(tag: impl Into<String>) -> Self {
        let value = tag.into();
        Self {
            label: value.clone(),
            value,
        }
    }

    pub fn from_tags(tags: &[String]) -> Vec<TagOption> {
        tags.iter().map(TagOption::new).collect()
    }
}

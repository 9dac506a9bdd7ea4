use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};

use crate::model::{DiaryEntry, EntryDate};

pub mod seed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// In-memory diary entries, one per date, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: IndexMap<EntryDate, DiaryEntry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples() -> Self {
        let mut store = Self::new();
        for entry in seed::sample_entries() {
            store.upsert_by_date(entry.date, entry.title, entry.content, entry.tags);
        }
        tracing::debug!(entries = store.len(), "seeded sample diary entries");
        store
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiaryEntry> {
        self.entries.values()
    }

    pub fn contains(&self, date: EntryDate) -> bool {
        self.entries.contains_key(&date)
    }

    pub fn find_by_date(&self, date: EntryDate) -> Option<&DiaryEntry> {
        self.entries.get(&date)
    }

    /// Replaces title, content and tags of the entry for `date`, appending a
    /// new entry when none exists yet.
    pub fn upsert_by_date(
        &mut self,
        date: EntryDate,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> Upsert {
        let title = title.into();
        let content = content.into();
        let outcome = match self.entries.entry(date) {
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.title = title;
                existing.content = content;
                existing.tags = tags;
                Upsert::Updated
            }
            Entry::Vacant(slot) => {
                slot.insert(DiaryEntry::new(date, title, content, tags));
                Upsert::Inserted
            }
        };
        tracing::debug!(%date, ?outcome, "upserted diary entry");
        outcome
    }

    /// Removes the entry for `date`. Absent dates are a no-op.
    pub fn delete_by_date(&mut self, date: EntryDate) -> Option<DiaryEntry> {
        // shift_remove keeps the remaining insertion order intact
        let removed = self.entries.shift_remove(&date);
        if removed.is_some() {
            tracing::debug!(%date, "deleted diary entry");
        }
        removed
    }

    /// Entries carrying every tag in `filter`, newest first.
    pub fn list<'a, I>(&self, filter: I) -> Vec<&DiaryEntry>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let filter: Vec<&String> = filter.into_iter().collect();
        let mut matches: Vec<&DiaryEntry> = self
            .entries
            .values()
            .filter(|entry| entry.has_all_tags(filter.iter().copied()))
            .collect();
        matches.sort_by(|a, b| b.date.cmp(&a.date));
        matches
    }

    pub fn list_all(&self) -> Vec<&DiaryEntry> {
        self.list(std::iter::empty::<&String>())
    }

    /// Union of tags across all entries in first-seen order.
    pub fn known_tags(&self) -> Vec<String> {
        let mut seen: IndexSet<String> = IndexSet::new();
        for entry in self.entries.values() {
            for tag in &entry.tags {
                if !seen.contains(tag.as_str()) {
                    seen.insert(tag.clone());
                }
            }
        }
        seen.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(s: &str) -> EntryDate {
        s.parse().expect("valid date")
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn dates(entries: &[&DiaryEntry]) -> Vec<String> {
        entries.iter().map(|e| e.date.to_string()).collect()
    }

    #[test]
    fn upsert_on_distinct_dates_keeps_one_entry_each() {
        let mut store = EntryStore::new();
        store.upsert_by_date(date("2024-06-20"), "a", "", vec![]);
        store.upsert_by_date(date("2024-06-21"), "b", "", vec![]);
        store.upsert_by_date(date("2024-06-20"), "a2", "body", vec![]);
        let all = store.list_all();
        assert_eq!(all.len(), 2);
        assert_eq!(store.find_by_date(date("2024-06-20")).unwrap().title, "a2");
        assert_eq!(store.find_by_date(date("2024-06-21")).unwrap().title, "b");
    }

    #[test]
    fn second_upsert_overwrites_in_place() {
        let mut store = EntryStore::new();
        let d = date("2024-06-25");
        assert_matches!(store.upsert_by_date(d, "first", "x", tags(&["a"])), Upsert::Inserted);
        assert_matches!(store.upsert_by_date(d, "second", "y", tags(&["b"])), Upsert::Updated);
        assert_eq!(store.len(), 1);
        let entry = store.find_by_date(d).unwrap();
        assert_eq!(entry.date, d);
        assert_eq!(entry.title, "second");
        assert_eq!(entry.content, "y");
        assert_eq!(entry.tags, tags(&["b"]));
    }

    #[test]
    fn update_preserves_insertion_position() {
        let mut store = EntryStore::new();
        store.upsert_by_date(date("2024-06-22"), "x", "", vec![]);
        store.upsert_by_date(date("2024-06-20"), "y", "", vec![]);
        store.upsert_by_date(date("2024-06-22"), "x2", "", vec![]);
        let order: Vec<_> = store.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(order, vec!["2024-06-22", "2024-06-20"]);
    }

    #[test]
    fn filter_uses_intersection_semantics() {
        let mut store = EntryStore::new();
        store.upsert_by_date(date("2024-06-20"), "ab", "", tags(&["a", "b"]));
        store.upsert_by_date(date("2024-06-21"), "a", "", tags(&["a"]));
        store.upsert_by_date(date("2024-06-22"), "bc", "", tags(&["b", "c"]));

        let filter = tags(&["a", "b"]);
        let matches = store.list(&filter);
        assert_eq!(dates(&matches), vec!["2024-06-20"]);

        let only_a = tags(&["a"]);
        assert_eq!(dates(&store.list(&only_a)), vec!["2024-06-21", "2024-06-20"]);

        let missing = tags(&["zzz"]);
        assert!(store.list(&missing).is_empty());
    }

    #[test]
    fn list_sorts_newest_first() {
        let mut store = EntryStore::new();
        store.upsert_by_date(date("2024-06-20"), "", "", vec![]);
        store.upsert_by_date(date("2024-06-25"), "", "", vec![]);
        store.upsert_by_date(date("2024-06-22"), "", "", vec![]);
        assert_eq!(
            dates(&store.list_all()),
            vec!["2024-06-25", "2024-06-22", "2024-06-20"]
        );
    }

    #[test]
    fn list_orders_across_years_by_calendar() {
        let mut store = EntryStore::new();
        store.upsert_by_date(date("2023-12-31"), "", "", vec![]);
        store.upsert_by_date(date("2024-01-01"), "", "", vec![]);
        assert_eq!(dates(&store.list_all()), vec!["2024-01-01", "2023-12-31"]);
    }

    #[test]
    fn deleting_absent_date_leaves_store_unchanged() {
        let mut store = EntryStore::with_samples();
        let before: Vec<DiaryEntry> = store.iter().cloned().collect();
        assert!(store.delete_by_date(date("1999-01-01")).is_none());
        let after: Vec<DiaryEntry> = store.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn delete_removes_only_the_keyed_entry() {
        let mut store = EntryStore::with_samples();
        let removed = store.delete_by_date(date("2024-06-23")).expect("sample entry");
        assert_eq!(removed.title, "Learning a New Framework");
        assert_eq!(store.len(), 5);
        assert!(!store.contains(date("2024-06-23")));
        assert!(store.delete_by_date(date("2024-06-23")).is_none());
    }

    #[test]
    fn samples_seed_six_days() {
        let store = EntryStore::with_samples();
        assert_eq!(store.len(), 6);
        assert_eq!(
            dates(&store.list_all()),
            vec![
                "2024-06-25",
                "2024-06-24",
                "2024-06-23",
                "2024-06-22",
                "2024-06-21",
                "2024-06-20"
            ]
        );
        let learning = tags(&["learning", "coding"]);
        assert_eq!(
            dates(&store.list(&learning)),
            vec!["2024-06-24", "2024-06-23"]
        );
    }

    #[test]
    fn known_tags_are_deduplicated_union() {
        let mut store = EntryStore::new();
        store.upsert_by_date(date("2024-06-20"), "", "", tags(&["a", "b"]));
        store.upsert_by_date(date("2024-06-21"), "", "", tags(&["b", "c", "c"]));
        assert_eq!(store.known_tags(), tags(&["a", "b", "c"]));
        store.delete_by_date(date("2024-06-20"));
        assert_eq!(store.known_tags(), tags(&["b", "c"]));
    }
}

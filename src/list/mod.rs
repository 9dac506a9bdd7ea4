use indexmap::IndexSet;

use crate::model::{EntryDate, TagOption};
use crate::store::EntryStore;

/// What activating part of the list asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListIntent {
    Select(EntryDate),
    Delete(EntryDate),
    Add,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub date: EntryDate,
    pub title: String,
    pub tags: Vec<String>,
    pub preview: String,
}

/// Tag-filtered, newest-first projection of the store.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    filter: IndexSet<String>,
    cursor: usize,
    preview_lines: usize,
}

impl ListView {
    pub fn new(preview_lines: usize) -> Self {
        Self {
            filter: IndexSet::new(),
            cursor: 0,
            preview_lines,
        }
    }

    pub fn filter(&self) -> impl Iterator<Item = &String> {
        self.filter.iter()
    }

    pub fn filter_tags(&self) -> Vec<String> {
        self.filter.iter().cloned().collect()
    }

    pub fn has_filter(&self) -> bool {
        !self.filter.is_empty()
    }

    pub fn set_filter(&mut self, store: &EntryStore, tags: Vec<String>) {
        self.filter = tags.into_iter().collect();
        self.clamp(store);
    }

    pub fn clear_filter(&mut self, store: &EntryStore) {
        self.filter.clear();
        self.clamp(store);
    }

    pub fn rows(&self, store: &EntryStore) -> Vec<EntryRow> {
        store
            .list(self.filter.iter())
            .into_iter()
            .map(|entry| EntryRow {
                date: entry.date,
                title: entry.title.clone(),
                tags: entry.tags.clone(),
                preview: entry.preview(self.preview_lines),
            })
            .collect()
    }

    pub fn visible_len(&self, store: &EntryStore) -> usize {
        store.list(self.filter.iter()).len()
    }

    /// Options offered for filtering and tagging, recomputed from the store.
    pub fn known_tag_options(store: &EntryStore) -> Vec<TagOption> {
        TagOption::from_tags(&store.known_tags())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, store: &EntryStore, delta: isize) {
        let len = self.visible_len(store);
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = (self.cursor as isize + delta).clamp(0, len as isize - 1);
        self.cursor = next as usize;
    }

    pub fn focus_date(&mut self, store: &EntryStore, date: EntryDate) {
        if let Some(idx) = store
            .list(self.filter.iter())
            .iter()
            .position(|entry| entry.date == date)
        {
            self.cursor = idx;
        }
    }

    /// Keeps the cursor inside the visible rows after the store or filter
    /// changed.
    pub fn clamp(&mut self, store: &EntryStore) {
        let len = self.visible_len(store);
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn highlighted_date(&self, store: &EntryStore) -> Option<EntryDate> {
        store
            .list(self.filter.iter())
            .get(self.cursor)
            .map(|entry| entry.date)
    }

    pub fn select_intent(&self, store: &EntryStore) -> Option<ListIntent> {
        self.highlighted_date(store).map(ListIntent::Select)
    }

    pub fn delete_intent(&self, store: &EntryStore) -> Option<ListIntent> {
        self.highlighted_date(store).map(ListIntent::Delete)
    }

    pub fn add_intent(&self) -> ListIntent {
        ListIntent::Add
    }
}

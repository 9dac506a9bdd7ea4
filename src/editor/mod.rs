//! Editor controller.
//!
//! Tracks the selected date and mirrors the title, content and tags of the
//! entry for that date. Every field edit writes all three fields back
//! through [`EntryStore::upsert_by_date`], so the first edit on an empty
//! day creates its entry.

use crate::clock::Clock;
use crate::model::{DiaryEntry, EntryDate};
use crate::store::EntryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// The selected date has an entry in the store.
    Bound,
    /// No entry yet; mirrors hold empty defaults.
    Unbound,
}

#[derive(Debug, Clone)]
pub struct EditorController {
    today: EntryDate,
    selected_date: EntryDate,
    binding: Binding,
    title: String,
    content: String,
    tags: Vec<String>,
    visible: bool,
    date_picker_open: bool,
    scroll_requested: bool,
}

impl EditorController {
    pub fn new(store: &EntryStore, today: EntryDate) -> Self {
        let mut editor = Self {
            today,
            selected_date: today,
            binding: Binding::Unbound,
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            visible: false,
            date_picker_open: false,
            scroll_requested: false,
        };
        editor.on_select_date(store, today);
        editor
    }

    pub fn today(&self) -> EntryDate {
        self.today
    }

    pub fn selected_date(&self) -> EntryDate {
        self.selected_date
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_date_picker_open(&self) -> bool {
        self.date_picker_open
    }

    pub fn can_go_next(&self) -> bool {
        self.selected_date != self.today
    }

    /// Picks up a new "today" (e.g. after midnight) without moving the
    /// selected date.
    pub fn refresh_today(&mut self, clock: &dyn Clock) {
        let today = clock.today();
        if today != self.today {
            tracing::info!(from = %self.today, to = %today, "calendar day rolled over");
            self.today = today;
        }
    }

    /// Selects `date` and re-derives the binding and every mirror field
    /// from the store.
    pub fn on_select_date(&mut self, store: &EntryStore, date: EntryDate) {
        self.selected_date = date;
        match store.find_by_date(date) {
            Some(entry) => {
                self.binding = Binding::Bound;
                self.title = entry.title.clone();
                self.content = entry.content.clone();
                self.tags = entry.tags.clone();
            }
            None => {
                self.binding = Binding::Unbound;
                self.title.clear();
                self.content.clear();
                self.tags.clear();
            }
        }
        tracing::debug!(%date, binding = ?self.binding, "selected diary date");
    }

    pub fn set_title(&mut self, store: &mut EntryStore, title: impl Into<String>) {
        self.title = title.into();
        self.commit(store);
    }

    pub fn set_content(&mut self, store: &mut EntryStore, content: impl Into<String>) {
        self.content = content.into();
        self.commit(store);
    }

    pub fn set_tags(&mut self, store: &mut EntryStore, tags: Vec<String>) {
        self.tags = tags;
        self.commit(store);
    }

    /// Appends a brand-new tag to the selected day. Blank values and tags the
    /// day already carries are ignored. Returns whether the tag was added.
    pub fn create_tag(&mut self, store: &mut EntryStore, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.tags.iter().any(|tag| tag == value) {
            return false;
        }
        self.tags.push(value.to_string());
        self.commit(store);
        true
    }

    fn commit(&mut self, store: &mut EntryStore) {
        store.upsert_by_date(
            self.selected_date,
            self.title.clone(),
            self.content.clone(),
            self.tags.clone(),
        );
        self.binding = Binding::Bound;
    }

    /// Moves one day forward; blocked once the selection reaches today.
    pub fn next(&mut self, store: &EntryStore) {
        if !self.can_go_next() {
            return;
        }
        match self.selected_date.next_day() {
            Ok(date) => self.on_select_date(store, date),
            Err(err) => tracing::warn!(%err, "cannot move to the next day"),
        }
    }

    pub fn previous(&mut self, store: &EntryStore) {
        match self.selected_date.previous_day() {
            Ok(date) => self.on_select_date(store, date),
            Err(err) => tracing::warn!(%err, "cannot move to the previous day"),
        }
    }

    pub fn pick_date(&mut self, store: &EntryStore, date: EntryDate) {
        self.on_select_date(store, date);
        self.date_picker_open = false;
    }

    pub fn close_date_picker(&mut self) {
        self.date_picker_open = false;
    }

    pub fn toggle_date_picker(&mut self) {
        self.date_picker_open = !self.date_picker_open;
    }

    /// Opens the editor on an entry picked from the list.
    pub fn select_entry(&mut self, store: &EntryStore, date: EntryDate) {
        self.on_select_date(store, date);
        self.visible = true;
        self.date_picker_open = false;
        self.scroll_requested = true;
    }

    /// Jumps to today and shows the editor. The date picker opens unless
    /// today already has an entry.
    pub fn open_add(&mut self, store: &EntryStore) {
        self.on_select_date(store, self.today);
        if !store.contains(self.today) {
            self.date_picker_open = true;
        }
        self.visible = true;
    }

    /// Deletes the entry for `date`. When it was the selected one the editor
    /// snaps back to today and hides.
    pub fn delete_entry(&mut self, store: &mut EntryStore, date: EntryDate) -> Option<DiaryEntry> {
        let removed = store.delete_by_date(date);
        if date == self.selected_date {
            self.on_select_date(store, self.today);
            self.visible = false;
            self.date_picker_open = false;
        }
        removed
    }

    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }
}

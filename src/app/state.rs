use crate::clock::Clock;
use crate::editor::{Binding, EditorController};
use crate::list::{EntryRow, ListIntent, ListView};
use crate::model::{EntryDate, TagOption};
use crate::picker::{DatePicker, TagPicker, TagPickerMode, TagPickerOutcome};
use crate::store::EntryStore;

use super::actions::{IntentDispatcher, IntentOutcome};
use super::text::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    List,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Tags,
    Content,
}

impl EditorField {
    fn next(self) -> Self {
        match self {
            EditorField::Title => EditorField::Tags,
            EditorField::Tags => EditorField::Content,
            EditorField::Content => EditorField::Title,
        }
    }
}

#[derive(Debug, Clone)]
pub enum OverlayState {
    DatePicker(DatePicker),
    TagPicker(TagPicker),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

#[derive(Debug, Clone)]
pub struct AppState {
    store: EntryStore,
    editor: EditorController,
    list: ListView,
    pub focus: FocusPane,
    pub field: EditorField,
    title_field: TextField,
    content_field: TextField,
    overlay: Option<OverlayState>,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(store: EntryStore, today: EntryDate, preview_lines: usize) -> Self {
        let editor = EditorController::new(&store, today);
        let title_field = TextField::single_line(editor.title());
        let content_field = TextField::multi_line(editor.content());
        Self {
            store,
            editor,
            list: ListView::new(preview_lines),
            focus: FocusPane::List,
            field: EditorField::Title,
            title_field,
            content_field,
            overlay: None,
            status_message: None,
        }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn editor(&self) -> &EditorController {
        &self.editor
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn rows(&self) -> Vec<EntryRow> {
        self.list.rows(&self.store)
    }

    pub fn known_tag_options(&self) -> Vec<TagOption> {
        ListView::known_tag_options(&self.store)
    }

    pub fn title_field(&self) -> &TextField {
        &self.title_field
    }

    pub fn content_field(&self) -> &TextField {
        &self.content_field
    }

    pub fn overlay(&self) -> Option<&OverlayState> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn set_status_message<S: Into<String>>(&mut self, message: Option<S>) {
        self.status_message = message.map(Into::into);
    }

    pub fn refresh_today(&mut self, clock: &dyn Clock) {
        self.editor.refresh_today(clock);
    }

    pub fn dispatch(&mut self, intent: ListIntent) -> IntentOutcome {
        let outcome = IntentDispatcher::new(&mut self.store, &mut self.editor).apply(intent);
        tracing::debug!(?intent, ?outcome, "applied list intent");
        match outcome {
            IntentOutcome::Selected(date) => {
                self.list.focus_date(&self.store, date);
                self.set_status_message(Some(format!("Editing {date}")));
            }
            IntentOutcome::Deleted { date, existed } => {
                self.list.clamp(&self.store);
                let message = if existed {
                    format!("Deleted entry for {date}")
                } else {
                    format!("No entry for {date}")
                };
                self.set_status_message(Some(message));
            }
            IntentOutcome::Added { date, picker_opened } => {
                self.focus = FocusPane::Editor;
                self.field = EditorField::Title;
                let message = if picker_opened {
                    "Pick a day: arrows move • Enter choose • Esc keep today".to_string()
                } else {
                    format!("Today ({date}) already has an entry")
                };
                self.set_status_message(Some(message));
            }
        }
        self.after_selection_change();
        outcome
    }

    /// Re-syncs the text fields, the date picker overlay and focus after the
    /// editor switched dates or visibility.
    fn after_selection_change(&mut self) {
        self.title_field = TextField::single_line(self.editor.title());
        self.content_field = TextField::multi_line(self.editor.content());
        self.sync_date_picker();
        if self.editor.take_scroll_request() {
            self.focus = FocusPane::Editor;
            self.field = EditorField::Title;
        }
        if !self.editor.is_visible() {
            self.focus = FocusPane::List;
        }
    }

    fn sync_date_picker(&mut self) {
        let showing = matches!(self.overlay, Some(OverlayState::DatePicker(_)));
        if self.editor.is_date_picker_open() && !showing {
            self.overlay = Some(OverlayState::DatePicker(DatePicker::new(
                self.editor.selected_date(),
                self.editor.today(),
            )));
        } else if !self.editor.is_date_picker_open() && showing {
            self.overlay = None;
        }
    }

    pub fn list_move(&mut self, delta: isize) {
        self.list.move_cursor(&self.store, delta);
    }

    pub fn activate_highlighted(&mut self) {
        match self.list.select_intent(&self.store) {
            Some(intent) => {
                self.dispatch(intent);
            }
            None => self.set_status_message(Some("No entries to open")),
        }
    }

    pub fn delete_highlighted(&mut self) {
        match self.list.delete_intent(&self.store) {
            Some(intent) => {
                self.dispatch(intent);
            }
            None => self.set_status_message(Some("No entries to delete")),
        }
    }

    pub fn add_entry(&mut self) {
        let intent = self.list.add_intent();
        self.dispatch(intent);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::List if self.editor.is_visible() => FocusPane::Editor,
            FocusPane::List => {
                self.set_status_message(Some("Open an entry (Enter) or add one (a) first"));
                FocusPane::List
            }
            FocusPane::Editor => FocusPane::List,
        };
    }

    pub fn cycle_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn previous_day(&mut self) {
        self.editor.previous(&self.store);
        self.after_selection_change();
    }

    pub fn next_day(&mut self) {
        if !self.editor.can_go_next() {
            self.set_status_message(Some("Tomorrow has not happened yet"));
            return;
        }
        self.editor.next(&self.store);
        self.after_selection_change();
    }

    pub fn toggle_date_picker(&mut self) {
        self.editor.toggle_date_picker();
        self.sync_date_picker();
    }

    pub fn insert_char(&mut self, ch: char) {
        match self.field {
            EditorField::Title => {
                if self.title_field.insert_char(ch) {
                    self.commit_title();
                }
            }
            EditorField::Content => {
                if self.content_field.insert_char(ch) {
                    self.commit_content();
                }
            }
            EditorField::Tags => {
                self.open_tag_picker();
                if let Some(OverlayState::TagPicker(picker)) = self.overlay.as_mut() {
                    picker.push_char(ch);
                }
            }
        }
    }

    pub fn insert_newline(&mut self) {
        match self.field {
            EditorField::Title => self.field = EditorField::Tags,
            EditorField::Tags => self.open_tag_picker(),
            EditorField::Content => {
                if self.content_field.insert_newline() {
                    self.commit_content();
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            EditorField::Title => {
                if self.title_field.backspace() {
                    self.commit_title();
                }
            }
            EditorField::Content => {
                if self.content_field.backspace() {
                    self.commit_content();
                }
            }
            EditorField::Tags => {
                let mut tags = self.editor.tags().to_vec();
                if let Some(removed) = tags.pop() {
                    self.editor.set_tags(&mut self.store, tags);
                    self.after_write();
                    self.set_status_message(Some(format!("Removed tag {removed}")));
                }
            }
        }
    }

    pub fn delete_forward(&mut self) {
        let changed = match self.field {
            EditorField::Title => self.title_field.delete(),
            EditorField::Content => self.content_field.delete(),
            EditorField::Tags => false,
        };
        if changed {
            match self.field {
                EditorField::Title => self.commit_title(),
                _ => self.commit_content(),
            }
        }
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        let field = match self.field {
            EditorField::Title => &mut self.title_field,
            EditorField::Content => &mut self.content_field,
            EditorField::Tags => return,
        };
        match movement {
            CursorMove::Left => field.move_left(),
            CursorMove::Right => field.move_right(),
            CursorMove::Up => field.move_up(),
            CursorMove::Down => field.move_down(),
            CursorMove::Home => field.move_home(),
            CursorMove::End => field.move_end(),
        };
    }

    fn commit_title(&mut self) {
        self.editor
            .set_title(&mut self.store, self.title_field.as_str());
        self.after_write();
    }

    fn commit_content(&mut self) {
        self.editor
            .set_content(&mut self.store, self.content_field.as_str());
        self.after_write();
    }

    /// An edit may add or drop the entry from the filtered rows.
    fn after_write(&mut self) {
        self.list.clamp(&self.store);
    }

    pub fn date_picker_move_days(&mut self, days: i64) {
        if let Some(OverlayState::DatePicker(picker)) = self.overlay.as_mut() {
            picker.move_days(days);
        }
    }

    pub fn date_picker_move_months(&mut self, months: i32) {
        if let Some(OverlayState::DatePicker(picker)) = self.overlay.as_mut() {
            picker.move_months(months);
        }
    }

    pub fn date_picker_jump_to_today(&mut self) {
        if let Some(OverlayState::DatePicker(picker)) = self.overlay.as_mut() {
            picker.jump_to_max();
        }
    }

    pub fn date_picker_confirm(&mut self) {
        let Some(OverlayState::DatePicker(picker)) = self.overlay.as_ref() else {
            return;
        };
        let date = picker.confirm();
        self.editor.pick_date(&self.store, date);
        self.overlay = None;
        let message = match self.editor.binding() {
            Binding::Bound => format!("Editing {date}"),
            Binding::Unbound => format!("{date} is empty; start typing to write it"),
        };
        self.set_status_message(Some(message));
        self.after_selection_change();
    }

    pub fn date_picker_cancel(&mut self) {
        self.editor.close_date_picker();
        self.sync_date_picker();
    }

    pub fn open_tag_picker(&mut self) {
        if matches!(self.overlay, Some(OverlayState::TagPicker(_))) {
            return;
        }
        let picker = TagPicker::new(
            TagPickerMode::Assign,
            self.editor.tags(),
            &self.known_tag_options(),
        );
        self.overlay = Some(OverlayState::TagPicker(picker));
    }

    pub fn open_filter_picker(&mut self) {
        let picker = TagPicker::new(
            TagPickerMode::Filter,
            &self.list.filter_tags(),
            &self.known_tag_options(),
        );
        self.overlay = Some(OverlayState::TagPicker(picker));
    }

    pub fn clear_filter(&mut self) {
        self.list.clear_filter(&self.store);
        self.set_status_message(Some("Filter cleared"));
    }

    pub fn close_tag_picker(&mut self) {
        if matches!(self.overlay, Some(OverlayState::TagPicker(_))) {
            self.overlay = None;
        }
    }

    pub fn tag_picker_move(&mut self, delta: isize) {
        if let Some(OverlayState::TagPicker(picker)) = self.overlay.as_mut() {
            picker.move_cursor(delta);
        }
    }

    pub fn tag_picker_begin_input(&mut self) {
        if let Some(OverlayState::TagPicker(picker)) = self.overlay.as_mut() {
            picker.begin_input();
        }
    }

    pub fn tag_picker_push_char(&mut self, ch: char) {
        if let Some(OverlayState::TagPicker(picker)) = self.overlay.as_mut() {
            picker.push_char(ch);
        }
    }

    pub fn tag_picker_pop_char(&mut self) {
        if let Some(OverlayState::TagPicker(picker)) = self.overlay.as_mut() {
            picker.pop_char();
        }
    }

    pub fn tag_picker_cancel_input(&mut self) {
        if let Some(OverlayState::TagPicker(picker)) = self.overlay.as_mut() {
            picker.cancel_input();
        }
    }

    pub fn tag_picker_is_typing(&self) -> bool {
        matches!(&self.overlay, Some(OverlayState::TagPicker(picker)) if picker.is_typing())
    }

    pub fn tag_picker_toggle(&mut self) {
        let Some(OverlayState::TagPicker(picker)) = self.overlay.as_mut() else {
            return;
        };
        let mode = picker.mode();
        if let Some(outcome) = picker.toggle_current() {
            self.apply_tag_outcome(mode, outcome);
        }
    }

    pub fn tag_picker_submit(&mut self) {
        let Some(OverlayState::TagPicker(picker)) = self.overlay.as_mut() else {
            return;
        };
        let mode = picker.mode();
        match picker.submit_input() {
            Some(outcome) => self.apply_tag_outcome(mode, outcome),
            None if mode == TagPickerMode::Filter => {
                self.set_status_message(Some("Only existing tags can be used as filters"));
            }
            None => {}
        }
    }

    fn apply_tag_outcome(&mut self, mode: TagPickerMode, outcome: TagPickerOutcome) {
        match (mode, outcome) {
            (TagPickerMode::Assign, TagPickerOutcome::Selection(tags)) => {
                self.editor.set_tags(&mut self.store, tags);
            }
            (TagPickerMode::Assign, TagPickerOutcome::Create(value)) => {
                if self.editor.create_tag(&mut self.store, &value) {
                    self.set_status_message(Some(format!("Created tag {value}")));
                }
            }
            (TagPickerMode::Filter, TagPickerOutcome::Selection(tags)) => {
                self.list.set_filter(&self.store, tags);
            }
            (TagPickerMode::Filter, TagPickerOutcome::Create(value)) => {
                tracing::warn!(%value, "filter picker emitted a create request");
            }
        }
        self.after_write();
        self.resync_tag_picker();
    }

    fn resync_tag_picker(&mut self) {
        let universe = self.known_tag_options();
        if let Some(OverlayState::TagPicker(picker)) = self.overlay.as_mut() {
            match picker.mode() {
                TagPickerMode::Assign => picker.sync(self.editor.tags(), &universe),
                TagPickerMode::Filter => picker.sync(&self.list.filter_tags(), &universe),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(s: &str) -> EntryDate {
        s.parse().expect("valid date")
    }

    fn state() -> AppState {
        AppState::new(EntryStore::with_samples(), date("2024-06-25"), 1)
    }

    fn type_text(state: &mut AppState, text: &str) {
        for ch in text.chars() {
            state.insert_char(ch);
        }
    }

    #[test]
    fn selecting_row_opens_editor_with_focus() {
        let mut state = state();
        state.list_move(1);
        state.activate_highlighted();
        assert!(state.editor().is_visible());
        assert_eq!(state.editor().selected_date(), date("2024-06-24"));
        assert_eq!(state.focus, FocusPane::Editor);
        assert_eq!(state.title_field().as_str(), "Solving a Complex Bug");
    }

    #[test]
    fn typing_on_empty_day_creates_entry_once() {
        let mut state = state();
        state.activate_highlighted();
        state.previous_day();
        state.previous_day();
        state.previous_day();
        state.previous_day();
        state.previous_day();
        state.previous_day();
        assert_eq!(state.editor().selected_date(), date("2024-06-19"));
        assert_matches!(state.editor().binding(), Binding::Unbound);
        type_text(&mut state, "Rest");
        assert_eq!(state.store().len(), 7);
        assert_eq!(state.store().find_by_date(date("2024-06-19")).unwrap().title, "Rest");
        assert_eq!(state.rows().last().unwrap().date, date("2024-06-19"));
    }

    #[test]
    fn content_edits_write_through_every_keystroke() {
        let mut state = state();
        state.activate_highlighted();
        state.field = EditorField::Content;
        state.move_cursor(CursorMove::End);
        type_text(&mut state, "!");
        state.insert_newline();
        type_text(&mut state, "PS");
        let entry = state.store().find_by_date(date("2024-06-25")).unwrap();
        assert!(entry.content.ends_with("application.!\nPS"));
        state.backspace();
        let entry = state.store().find_by_date(date("2024-06-25")).unwrap();
        assert!(entry.content.ends_with("application.!\nP"));
    }

    #[test]
    fn delete_intent_does_not_select_row() {
        let mut state = state();
        state.list_move(2);
        state.delete_highlighted();
        assert_eq!(state.store().len(), 5);
        assert!(!state.editor().is_visible());
        assert_eq!(state.editor().selected_date(), date("2024-06-25"));
        assert_eq!(state.focus, FocusPane::List);
    }

    #[test]
    fn deleting_selected_entry_hides_editor() {
        let mut state = state();
        state.list_move(3);
        state.activate_highlighted();
        assert_eq!(state.editor().selected_date(), date("2024-06-22"));
        let outcome = state.dispatch(ListIntent::Delete(date("2024-06-22")));
        assert_matches!(outcome, IntentOutcome::Deleted { existed: true, .. });
        assert!(!state.editor().is_visible());
        assert_eq!(state.editor().selected_date(), date("2024-06-25"));
        assert_eq!(state.focus, FocusPane::List);
    }

    #[test]
    fn add_on_empty_today_opens_date_picker() {
        let mut state = AppState::new(EntryStore::new(), date("2024-06-25"), 1);
        state.add_entry();
        assert_matches!(state.overlay(), Some(OverlayState::DatePicker(_)));
        state.date_picker_move_days(-2);
        state.date_picker_confirm();
        assert!(state.overlay().is_none());
        assert_eq!(state.editor().selected_date(), date("2024-06-23"));
        assert!(state.store().is_empty());
    }

    #[test]
    fn add_when_today_exists_skips_picker() {
        let mut state = state();
        state.add_entry();
        assert!(state.overlay().is_none());
        assert!(state.editor().is_visible());
        assert_eq!(state.focus, FocusPane::Editor);
    }

    #[test]
    fn cancelling_date_picker_keeps_date() {
        let mut state = state();
        state.activate_highlighted();
        state.toggle_date_picker();
        state.date_picker_move_days(-5);
        state.date_picker_cancel();
        assert!(state.overlay().is_none());
        assert!(!state.editor().is_date_picker_open());
        assert_eq!(state.editor().selected_date(), date("2024-06-25"));
    }

    #[test]
    fn next_day_is_refused_at_today() {
        let mut state = state();
        state.activate_highlighted();
        state.next_day();
        assert_eq!(state.editor().selected_date(), date("2024-06-25"));
        assert_eq!(
            state.status_message.as_deref(),
            Some("Tomorrow has not happened yet")
        );
    }

    #[test]
    fn created_tag_lands_once_in_entry_and_picker() {
        let mut state = state();
        state.activate_highlighted();
        state.field = EditorField::Tags;
        type_text(&mut state, "shipping");
        state.tag_picker_submit();
        let entry = state.store().find_by_date(date("2024-06-25")).unwrap();
        let count = entry.tags.iter().filter(|t| t.as_str() == "shipping").count();
        assert_eq!(count, 1);
        assert_eq!(entry.tags.len(), 6);
        let Some(OverlayState::TagPicker(picker)) = state.overlay() else {
            panic!("tag picker should stay open");
        };
        assert_eq!(picker.selection(), entry.tags.as_slice());
        assert!(state.known_tag_options().contains(&TagOption::new("shipping")));
    }

    #[test]
    fn backspace_on_tags_drops_last_tag() {
        let mut state = state();
        state.activate_highlighted();
        state.field = EditorField::Tags;
        state.backspace();
        let entry = state.store().find_by_date(date("2024-06-25")).unwrap();
        assert_eq!(entry.tags.last().map(String::as_str), Some("achievement"));
    }

    #[test]
    fn filter_picker_narrows_list() {
        let mut state = state();
        state.open_filter_picker();
        type_text_into_picker(&mut state, "design");
        state.tag_picker_submit();
        let rows = state.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, date("2024-06-22"));
        state.close_tag_picker();
        state.clear_filter();
        assert_eq!(state.rows().len(), 6);
    }

    #[test]
    fn filter_picker_rejects_unknown_tags() {
        let mut state = state();
        state.open_filter_picker();
        type_text_into_picker(&mut state, "nope");
        state.tag_picker_submit();
        assert_eq!(state.rows().len(), 6);
        assert_eq!(
            state.status_message.as_deref(),
            Some("Only existing tags can be used as filters")
        );
    }

    #[test]
    fn focus_stays_on_list_while_editor_hidden() {
        let mut state = state();
        state.toggle_focus();
        assert_eq!(state.focus, FocusPane::List);
        state.activate_highlighted();
        state.toggle_focus();
        assert_eq!(state.focus, FocusPane::List);
        state.toggle_focus();
        assert_eq!(state.focus, FocusPane::Editor);
    }

    #[test]
    fn removing_a_filtered_tag_keeps_cursor_on_a_row() {
        let mut state = state();
        state.open_filter_picker();
        type_text_into_picker(&mut state, "development");
        state.tag_picker_submit();
        state.close_tag_picker();
        assert_eq!(state.rows().len(), 3);

        state.list_move(2);
        state.activate_highlighted();
        assert_eq!(state.editor().selected_date(), date("2024-06-20"));
        state.field = EditorField::Tags;
        state.backspace();

        assert_eq!(state.rows().len(), 2);
        assert_eq!(state.list().cursor(), 1);
        state.activate_highlighted();
        assert_eq!(state.editor().selected_date(), date("2024-06-22"));
    }

    fn type_text_into_picker(state: &mut AppState, text: &str) {
        state.tag_picker_begin_input();
        for ch in text.chars() {
            state.tag_picker_push_char(ch);
        }
    }
}

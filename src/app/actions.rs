use crate::editor::EditorController;
use crate::list::ListIntent;
use crate::model::EntryDate;
use crate::store::EntryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    Selected(EntryDate),
    Deleted { date: EntryDate, existed: bool },
    Added { date: EntryDate, picker_opened: bool },
}

/// Applies list intents to the store through the editor controller.
pub struct IntentDispatcher<'a> {
    store: &'a mut EntryStore,
    editor: &'a mut EditorController,
}

impl<'a> IntentDispatcher<'a> {
    pub fn new(store: &'a mut EntryStore, editor: &'a mut EditorController) -> Self {
        Self { store, editor }
    }

    pub fn apply(&mut self, intent: ListIntent) -> IntentOutcome {
        match intent {
            ListIntent::Select(date) => {
                self.editor.select_entry(self.store, date);
                IntentOutcome::Selected(date)
            }
            ListIntent::Delete(date) => {
                let existed = self.editor.delete_entry(self.store, date).is_some();
                IntentOutcome::Deleted { date, existed }
            }
            ListIntent::Add => {
                self.editor.open_add(self.store);
                IntentOutcome::Added {
                    date: self.editor.selected_date(),
                    picker_opened: self.editor.is_date_picker_open(),
                }
            }
        }
    }
}

use crate::model::TagOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPickerMode {
    /// Tags of the entry being edited; new values may be created.
    Assign,
    /// List filter; only known tags can be chosen.
    Filter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagPickerOutcome {
    Selection(Vec<String>),
    Create(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPickerItem {
    pub option: TagOption,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct TagPicker {
    mode: TagPickerMode,
    items: Vec<TagPickerItem>,
    selection: Vec<String>,
    cursor: usize,
    input: Option<String>,
}

impl TagPicker {
    pub fn new(mode: TagPickerMode, current: &[String], universe: &[TagOption]) -> Self {
        let mut picker = Self {
            mode,
            items: Vec::new(),
            selection: Vec::new(),
            cursor: 0,
            input: None,
        };
        picker.sync(current, universe);
        picker
    }

    /// Rebuilds the option list from the canonical selection and universe.
    pub fn sync(&mut self, current: &[String], universe: &[TagOption]) {
        let mut items: Vec<TagPickerItem> = universe
            .iter()
            .map(|option| TagPickerItem {
                option: option.clone(),
                selected: false,
            })
            .collect();
        for tag in current {
            if !items.iter().any(|item| &item.option.value == tag) {
                items.push(TagPickerItem {
                    option: TagOption::new(tag.clone()),
                    selected: false,
                });
            }
        }
        for item in &mut items {
            item.selected = current.contains(&item.option.value);
        }
        self.items = items;
        self.selection = current.to_vec();
        if self.cursor >= self.items.len() {
            self.cursor = self.items.len().saturating_sub(1);
        }
    }

    pub fn mode(&self) -> TagPickerMode {
        self.mode
    }

    pub fn items(&self) -> &[TagPickerItem] {
        &self.items
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn is_typing(&self) -> bool {
        self.input.is_some()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.items.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.items.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Flips the option under the cursor, keeping selection order stable.
    pub fn toggle_current(&mut self) -> Option<TagPickerOutcome> {
        let item = self.items.get_mut(self.cursor)?;
        item.selected = !item.selected;
        let value = item.option.value.clone();
        if item.selected {
            self.selection.push(value);
        } else {
            self.selection.retain(|tag| tag != &value);
        }
        Some(TagPickerOutcome::Selection(self.selection.clone()))
    }

    pub fn begin_input(&mut self) {
        self.input.get_or_insert_with(String::new);
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.get_or_insert_with(String::new).push(ch);
    }

    pub fn pop_char(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.pop();
        }
    }

    /// Known options containing the typed text, case-insensitively.
    pub fn suggestions(&self) -> Vec<&TagOption> {
        let Some(input) = self.input.as_deref() else {
            return Vec::new();
        };
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.items
            .iter()
            .filter(|item| item.option.label.to_lowercase().contains(&needle))
            .map(|item| &item.option)
            .collect()
    }

    /// Submits the typed text. An existing option is selected; an unknown
    /// value becomes a create request in assign mode and is rejected in
    /// filter mode.
    pub fn submit_input(&mut self) -> Option<TagPickerOutcome> {
        let value = self.input.take()?.trim().to_string();
        if value.is_empty() {
            return None;
        }
        if let Some(idx) = self
            .items
            .iter()
            .position(|item| item.option.value == value)
        {
            self.cursor = idx;
            if self.items[idx].selected {
                return None;
            }
            return self.toggle_current();
        }
        match self.mode {
            TagPickerMode::Assign => Some(TagPickerOutcome::Create(value)),
            TagPickerMode::Filter => None,
        }
    }
}

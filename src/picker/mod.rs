//! Date and tag picking surfaces used by the editor and the list filter.

mod date;
mod tags;

pub use date::DatePicker;
pub use tags::{TagPicker, TagPickerItem, TagPickerMode, TagPickerOutcome};

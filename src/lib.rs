pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod editor;
pub mod error;
pub mod list;
pub mod model;
pub mod picker;
pub mod store;
pub mod ui;

pub use config::{AppConfig, ConfigLoader, ConfigPaths};
pub use editor::{Binding, EditorController};
pub use error::{DiaryError, DiaryResult};
pub use list::{EntryRow, ListIntent, ListView};
pub use model::{DiaryEntry, EntryDate, TagOption};
pub use store::{EntryStore, Upsert};

//! Draft state behind the dashboard editing pages.

pub mod document_editor;
pub mod settings_editor;

pub use document_editor::DocumentEditor;
pub use settings_editor::{EditOutcome, SettingsEditor};

pub mod context_menu;
pub mod tab;
pub mod tabs;
pub mod unsaved_dialog;

pub use tabs::TabStrip;
pub use unsaved_dialog::UnsavedChangesDialog;

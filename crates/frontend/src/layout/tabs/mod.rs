//! Tab management module
//!
//! Contains:
//! - `session` - canonical tab list and active selection (pure state)
//! - `registry` - mapping of `ModuleKey` to the module that renders it
//! - `render_slots` - per-tab render lifecycle of the keep-alive host
//! - `page` - `TabPage`, the keep-alive viewport of one tab
//! - `close_guard` - guarded close protocol around the unsaved-changes dialog
//! - `geometry` - scroll math for the strip and the viewports
//! - `tab_labels` - display form of tab titles

pub mod close_guard;
pub mod geometry;
pub mod page;
pub mod registry;
pub mod render_slots;
pub mod session;
pub mod tab_labels;

pub use close_guard::{CloseController, GuardOutcome};
pub use page::{RenderHost, TabPage};
pub use registry::{ModuleEntry, ModuleFactory, ModuleProps, ModuleRegistry};
pub use session::{Session, Tab};

pub mod center;
pub mod global_context;
pub mod tabs;
pub mod top_header;

use center::tabs::{TabStrip, UnsavedChangesDialog};
use center::Center;
use leptos::prelude::*;
use top_header::TopHeader;

/// Main application shell.
///
/// ```text
/// +------------------------------------------+
/// |  TopHeader (title, open-tabs dropdown)   |
/// +------------------------------------------+
/// |  TabStrip                                |
/// +------------------------------------------+
/// |  Center (keep-alive tab pages)           |
/// +------------------------------------------+
/// ```
///
/// The unsaved-changes dialog is mounted here once for the whole app.
#[component]
pub fn Shell() -> impl IntoView {
    view! {
        <div class="app-layout">
            <TopHeader />
            <div class="app-main">
                <TabStrip />
                <Center />
            </div>
            <UnsavedChangesDialog />
        </div>
    }
}

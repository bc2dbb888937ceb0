//! TopHeader component - application top bar.
//!
//! Contains the application title and the open-tabs dropdown.

pub mod windows_dropdown;

use crate::shared::icons::icon;
use leptos::prelude::*;
use windows_dropdown::WindowsDropdown;

#[component]
pub fn TopHeader() -> impl IntoView {
    view! {
        <div class="top-header">
            <div class="top-header__brand">
                {icon("flask")}
                <span class="top-header__title">"Sample Tracker"</span>
            </div>
            <div class="top-header__actions">
                <WindowsDropdown />
            </div>
        </div>
    }
}

use super::context_menu::TabMenu;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::{tab_tooltip, truncate_title};
use crate::layout::tabs::CloseController;
use crate::shared::icons::icon;
use contracts::shared::tabs::TabId;
use leptos::ev;
use leptos::prelude::*;

/// Handle of one tab in the strip.
///
/// Reads its title and dirty flag from the session on every change; the close
/// button goes through the guarded close, never straight to the session.
#[component]
pub fn TabHandle(tab_id: TabId, on_menu: Callback<TabMenu>) -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let closer = use_context::<CloseController>().expect("CloseController context not found");
    let max_chars = tabs_store.config.with_value(|c| c.title_max_chars);

    let is_active = Memo::new(move |_| tabs_store.is_active(tab_id));
    let title = Memo::new(move |_| {
        tabs_store
            .session
            .with(|s| s.get(tab_id).map(|t| t.title.clone()).unwrap_or_default())
    });
    let is_dirty = Memo::new(move |_| {
        tabs_store
            .session
            .with(|s| s.get(tab_id).is_some_and(|t| t.is_dirty))
    });

    let on_click = move |_| tabs_store.switch_tab(tab_id);

    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        closer.request_close(tab_id);
    };

    let on_context_menu = move |ev: ev::MouseEvent| {
        ev.prevent_default();
        on_menu.run(TabMenu {
            tab_id,
            x: ev.client_x(),
            y: ev.client_y(),
        });
    };

    view! {
        <div
            class="tab"
            class:tab--active=is_active
            class:tab--dirty=is_dirty
            role="tab"
            aria-selected=move || is_active.get().to_string()
            data-tab-handle=tab_id.to_string()
            title=move || tab_tooltip(&title.get(), is_dirty.get())
            on:click=on_click
            on:contextmenu=on_context_menu
        >
            <span class="tab__title">{move || truncate_title(&title.get(), max_chars)}</span>
            <Show when=move || is_dirty.get()>
                <span class="tab__dirty" aria-label="Unsaved changes">"●"</span>
            </Show>
            <button
                class="tab__close"
                title="Close"
                disabled=move || closer.is_busy()
                on:click=on_close
            >
                {icon("x")}
            </button>
        </div>
    }
}

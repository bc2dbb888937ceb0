use crate::layout::tabs::CloseController;
use contracts::shared::tabs::TabId;
use leptos::ev;
use leptos::prelude::*;

/// Where a tab's context menu was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabMenu {
    pub tab_id: TabId,
    pub x: i32,
    pub y: i32,
}

/// Close / close others / close all for the tab the menu was opened on.
///
/// Any click elsewhere dismisses it.
#[component]
pub fn TabContextMenu(menu: RwSignal<Option<TabMenu>>) -> impl IntoView {
    let closer = use_context::<CloseController>().expect("CloseController context not found");

    let dismiss = window_event_listener(ev::click, move |_| menu.set(None));
    on_cleanup(move || dismiss.remove());

    move || {
        menu.get().map(|anchor| {
            let tab_id = anchor.tab_id;
            view! {
                <div
                    class="tab-menu"
                    role="menu"
                    style=format!(
                        "position: fixed; left: {}px; top: {}px; z-index: 900;",
                        anchor.x,
                        anchor.y,
                    )
                >
                    <button
                        class="tab-menu__item"
                        role="menuitem"
                        disabled=move || closer.is_busy()
                        on:click=move |_| closer.request_close(tab_id)
                    >
                        "Close"
                    </button>
                    <button
                        class="tab-menu__item"
                        role="menuitem"
                        disabled=move || closer.is_busy()
                        on:click=move |_| closer.close_others(tab_id)
                    >
                        "Close others"
                    </button>
                    <button
                        class="tab-menu__item"
                        role="menuitem"
                        disabled=move || closer.is_busy()
                        on:click=move |_| closer.close_all()
                    >
                        "Close all"
                    </button>
                </div>
            }
        })
    }
}

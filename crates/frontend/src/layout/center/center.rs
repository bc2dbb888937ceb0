use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::{RenderHost, Tab as TabData, TabPage};
use leptos::prelude::*;

/// Keep-alive render host: one mounted `TabPage` per open tab.
///
/// Pages are keyed by tab id, so switching tabs only flips visibility; a page
/// is created when its tab opens and destroyed when the tab is closed.
#[component]
pub fn Center() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    provide_context(RenderHost::new());

    let is_empty = move || tabs_store.session.with(|s| s.is_empty());

    view! {
        <div data-zone="center" class="app-tabs" style="flex: 1; position: relative; overflow: hidden;">
            <For
                each=move || tabs_store.session.with(|s| s.tabs().to_vec())
                key=|tab| tab.id
                children=move |tab: TabData| {
                    view! {
                        <TabPage tab_id=tab.id module_key=tab.module_key params=tab.params />
                    }
                }
            />
            <Show when=is_empty>
                <div class="app-tabs__empty">"No open tabs"</div>
            </Show>
        </div>
    }
}

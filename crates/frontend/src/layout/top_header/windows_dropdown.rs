//! WindowsDropdown component - overview of all open tabs.
//!
//! A compact list for switching between tabs when the strip overflows. Closing
//! from here goes through the same guarded close as the strip.

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::CloseController;
use crate::shared::icons::icon;
use contracts::shared::tabs::TabId;
use leptos::ev;
use leptos::prelude::*;

#[component]
pub fn WindowsDropdown() -> impl IntoView {
    let ctx =
        leptos::context::use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let closer = use_context::<CloseController>().expect("CloseController not found");

    let is_open = RwSignal::new(false);

    let trigger_text = move || {
        ctx.session.with(|s| match s.active_tab() {
            Some(tab) => format!("{} ({})", tab.title, s.len()),
            None => format!("Tabs ({})", s.len()),
        })
    };

    let toggle_dropdown = move |_| {
        is_open.update(|open| *open = !*open);
    };

    let switch_window = move |tab_id: TabId| {
        ctx.switch_tab(tab_id);
        is_open.set(false);
    };

    view! {
        <div class="windows-dropdown">
            <button
                class="windows-dropdown__trigger"
                on:click=toggle_dropdown
                title="Open tabs"
            >
                <span class="windows-dropdown__trigger-text">{trigger_text}</span>
                {move || if is_open.get() {
                    icon("chevron-up")
                } else {
                    icon("chevron-down")
                }}
            </button>

            <Show when=move || is_open.get()>
                <div class="windows-dropdown__menu">
                    {move || {
                        let tabs = ctx.session.with(|s| s.snapshot());
                        if tabs.is_empty() {
                            return view! {
                                <div class="windows-dropdown__empty">"No open tabs"</div>
                            }.into_any();
                        }
                        tabs.into_iter().map(|tab| {
                            let tab_id = tab.id;
                            view! {
                                <div
                                    class="windows-dropdown__item"
                                    class:windows-dropdown__item--active=tab.is_active
                                    on:click=move |_| switch_window(tab_id)
                                >
                                    <span class="windows-dropdown__item-title">
                                        {tab.title}
                                        {tab.is_dirty.then_some(" ●")}
                                    </span>
                                    <button
                                        class="windows-dropdown__item-close"
                                        disabled=move || closer.is_busy()
                                        on:click=move |ev: ev::MouseEvent| {
                                            ev.stop_propagation();
                                            closer.request_close(tab_id);
                                        }
                                        title="Close tab"
                                    >
                                        {icon("x")}
                                    </button>
                                </div>
                            }
                        }).collect_view().into_any()
                    }}
                </div>
            </Show>
        </div>
    }
}

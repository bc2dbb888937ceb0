use super::context_menu::{TabContextMenu, TabMenu};
use super::tab::TabHandle;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::geometry::{overflow, reveal_offset, step_offset, Overflow, StepDirection};
use crate::shared::icons::icon;
use contracts::shared::tabs::TabId;
use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Horizontally scrollable strip with one handle per open tab.
#[component]
pub fn TabStrip() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let scroll_step = tabs_store.config.with_value(|c| c.strip_scroll_step);

    let scroller = NodeRef::<Div>::new();
    let arrows = RwSignal::new(Overflow::default());
    let menu = RwSignal::new(None::<TabMenu>);

    let measure = move || {
        if let Some(el) = scroller.get_untracked() {
            arrows.set(overflow(el.scroll_left(), el.client_width(), el.scroll_width()));
        }
    };

    let resize = window_event_listener(ev::resize, move |_| measure());
    on_cleanup(move || resize.remove());

    // Handles are laid out after the tab list changes; measure on the next frame.
    let tab_count = Memo::new(move |_| tabs_store.session.with(|s| s.len()));
    Effect::new(move |_| {
        tab_count.track();
        request_animation_frame(measure);
    });

    let active = Memo::new(move |_| tabs_store.active_tab_id());
    Effect::new(move |_| {
        if let Some(tab_id) = active.get() {
            request_animation_frame(move || {
                reveal_handle(scroller, tab_id);
                measure();
            });
        }
    });

    let step = move |direction: StepDirection| {
        if let Some(el) = scroller.get_untracked() {
            let target = step_offset(
                el.scroll_left(),
                el.client_width(),
                el.scroll_width(),
                scroll_step,
                direction,
            );
            el.set_scroll_left(target);
        }
    };

    let on_menu = Callback::new(move |anchor: TabMenu| menu.set(Some(anchor)));

    view! {
        <div class="tab-strip" role="tablist">
            <Show when=move || arrows.get().left>
                <button
                    class="tab-strip__arrow tab-strip__arrow--left"
                    title="Scroll left"
                    on:click=move |_| step(StepDirection::Left)
                >
                    {icon("chevron-left")}
                </button>
            </Show>
            <div
                class="tab-strip__scroller"
                style="position: relative; overflow-x: auto; scroll-behavior: smooth; white-space: nowrap;"
                node_ref=scroller
                on:scroll=move |_| measure()
            >
                <For
                    each=move || tabs_store.session.with(|s| s.tabs().iter().map(|t| t.id).collect::<Vec<_>>())
                    key=|tab_id| *tab_id
                    children=move |tab_id| view! { <TabHandle tab_id=tab_id on_menu=on_menu /> }
                />
            </div>
            <Show when=move || arrows.get().right>
                <button
                    class="tab-strip__arrow tab-strip__arrow--right"
                    title="Scroll right"
                    on:click=move |_| step(StepDirection::Right)
                >
                    {icon("chevron-right")}
                </button>
            </Show>
            <TabContextMenu menu=menu />
        </div>
    }
}

/// Scroll the strip just enough to show the handle of `tab_id` in full.
fn reveal_handle(scroller: NodeRef<Div>, tab_id: TabId) {
    let Some(el) = scroller.get_untracked() else {
        return;
    };
    let selector = format!("[data-tab-handle=\"{}\"]", tab_id);
    let Some(handle) = el
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|node| node.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    if let Some(target) = reveal_offset(
        el.scroll_left(),
        el.client_width(),
        handle.offset_left(),
        handle.offset_width(),
    ) {
        el.set_scroll_left(target);
    }
}

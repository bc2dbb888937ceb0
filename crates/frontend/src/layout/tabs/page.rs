//! TabPage - keep-alive viewport of one tab.
//!
//! Responsible for:
//! - resolving the tab's module once per tab lifetime (placeholder meanwhile)
//! - hiding the viewport while the tab is inactive, without unmounting it
//! - recording the scroll offset while active and restoring it after the tab
//!   becomes visible again

use super::geometry::restore_target;
use super::registry::{
    loading_view, unknown_module_view, ModuleEntry, ModuleFactory, ModuleProps, ModuleRegistry,
};
use super::render_slots::{RenderPhase, RenderSlots};
use crate::layout::global_context::{AppGlobalContext, HostedTab};
use contracts::shared::tabs::{ModuleKey, TabId, TabParams};
use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Render-slot arena shared by all pages of the host, provided via context.
#[derive(Clone, Copy)]
pub struct RenderHost {
    pub slots: RwSignal<RenderSlots>,
}

impl RenderHost {
    pub fn new() -> Self {
        Self {
            slots: RwSignal::new(RenderSlots::new()),
        }
    }
}

impl Default for RenderHost {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn TabPage(tab_id: TabId, module_key: ModuleKey, params: TabParams) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let host = use_context::<RenderHost>().expect("RenderHost context not found");
    let registry = use_context::<ModuleRegistry>().expect("ModuleRegistry context not found");

    log::debug!("TabPage created for {} ('{}')", tab_id, module_key);
    on_cleanup(move || {
        log::debug!("TabPage destroyed for {}", tab_id);
        host.slots.update(|slots| {
            slots.remove(tab_id);
        });
    });

    let is_active = Memo::new(move |_| ctx.is_active(tab_id));
    let phase = Memo::new(move |_| host.slots.with(|slots| slots.phase(tab_id)));
    let factory = RwSignal::new(None::<ModuleFactory>);

    // One-time resolution.
    host.slots.update(|slots| {
        slots.ensure(tab_id);
    });
    if let Some(ticket) = host.slots.try_update(|slots| slots.begin_resolve(tab_id)).flatten() {
        match registry.resolve(&module_key) {
            None => {
                log::warn!("no module registered for '{}' ({})", module_key, tab_id);
                host.slots.update(|slots| {
                    slots.mark_unknown(ticket);
                });
            }
            Some(ModuleEntry::Ready(ready)) => {
                factory.set(Some(ready));
                host.slots.update(|slots| {
                    slots.mark_ready(ticket);
                });
            }
            Some(ModuleEntry::Lazy(loader)) => {
                spawn_local(async move {
                    let loaded = loader().await;
                    let current = host
                        .slots
                        .try_with_untracked(|slots| slots.is_current(ticket))
                        .unwrap_or(false);
                    if !current {
                        log::debug!("discarding late module for closed {}", tab_id);
                        return;
                    }
                    let _ = factory.try_set(Some(loaded));
                    host.slots.update(|slots| {
                        slots.mark_ready(ticket);
                    });
                });
            }
        }
    }

    let viewport = NodeRef::<Div>::new();

    // Record scroll only while this tab is the visible one.
    let on_scroll = move |_| {
        if !is_active.get_untracked() {
            return;
        }
        if let Some(el) = viewport.get_untracked() {
            ctx.save_scroll_position(tab_id, el.scroll_top());
        }
    };

    // Restore after the viewport turns visible and layout has settled.
    Effect::new(move |was_active: Option<bool>| {
        let active = is_active.get();
        if active && was_active != Some(true) {
            request_animation_frame(move || {
                let Some(offset) = ctx.session.with_untracked(|s| restore_target(s, tab_id)) else {
                    return;
                };
                if let Some(el) = viewport.get_untracked() {
                    el.set_scroll_top(offset);
                }
            });
        }
        active
    });

    let props = ModuleProps {
        tab_id,
        params,
        is_active: is_active.into(),
        tab: HostedTab::new(tab_id, ctx),
    };
    let content = move || match phase.get() {
        Some(RenderPhase::Ready) => match factory.get() {
            // Untracked so signals read while building the module never remount it.
            Some(build) => {
                let props = props.clone();
                untrack(move || build(props))
            }
            None => loading_view(),
        },
        Some(RenderPhase::Unknown) => unknown_module_view(&module_key),
        _ => loading_view(),
    };

    view! {
        <div
            class="tabs__item"
            class:tabs__item--hidden=move || !is_active.get()
            style=move || {
                if is_active.get() {
                    "overflow: auto; height: 100%;"
                } else {
                    "display: none;"
                }
            }
            aria-hidden=move || (!is_active.get()).to_string()
            data-tab-id=tab_id.to_string()
            node_ref=viewport
            on:scroll=on_scroll
        >
            {content}
        </div>
    }
}

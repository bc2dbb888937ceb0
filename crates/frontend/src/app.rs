use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::{CloseController, ModuleRegistry};
use crate::layout::Shell;
use crate::shared::config::load_tabs_config;
use leptos::prelude::*;
use thaw::ConfigProvider;

/// Application root.
///
/// `registry` holds the screens that tabs can host; the surrounding
/// application opens tabs through the `AppGlobalContext` found in context.
#[component]
pub fn App(registry: ModuleRegistry) -> impl IntoView {
    let tabs_store = AppGlobalContext::new(load_tabs_config());

    // The tab session store, the single close controller and the module registry.
    provide_context(tabs_store);
    provide_context(CloseController::new(tabs_store));
    provide_context(registry);

    view! {
        <ConfigProvider>
            <Shell />
        </ConfigProvider>
    }
}

pub mod app;
pub mod layout;
pub mod shared;

use app::App;
use layout::tabs::ModuleRegistry;
use leptos::prelude::*;
use wasm_bindgen::prelude::wasm_bindgen;

/// Mount the workspace with the given screens.
pub fn mount_app(registry: ModuleRegistry) {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    log::info!("mounting tab workspace with {} module(s)", registry.len());
    leptos::mount::mount_to_body(move || view! { <App registry=registry /> });
}

#[wasm_bindgen(start)]
pub fn start() {
    mount_app(ModuleRegistry::new());
}

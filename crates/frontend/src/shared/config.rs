//! Startup configuration of the tab workspace.
//!
//! The embedded defaults from `contracts` can be overridden per browser through
//! localStorage, e.g. `{"bulk_close": "keep_dirty"}`.

use contracts::shared::tabs_config::TabsConfig;
use web_sys::window;

const TABS_CONFIG_STORAGE_KEY: &str = "lab-tabs-config";

/// Load the tab configuration: localStorage override, else embedded defaults.
pub fn load_tabs_config() -> TabsConfig {
    let defaults = TabsConfig::embedded().unwrap_or_else(|e| {
        log::warn!("embedded tabs config is invalid, using built-in defaults: {}", e);
        TabsConfig::default()
    });

    let Some(raw) = window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(TABS_CONFIG_STORAGE_KEY).ok().flatten())
    else {
        return defaults;
    };

    match TabsConfig::from_json(&raw) {
        Ok(config) => {
            log::info!("tabs config loaded from localStorage: {:?}", config);
            config
        }
        Err(e) => {
            log::warn!("ignoring invalid '{}' override: {}", TABS_CONFIG_STORAGE_KEY, e);
            defaults
        }
    }
}

//! Module registry - maps a tab's `ModuleKey` to the unit that renders it.
//!
//! Screens register themselves here at startup; the keep-alive host only ever
//! asks for an entry and renders it. A key with no entry gets an inline
//! placeholder instead of failing the host.

use crate::layout::global_context::HostedTab;
use contracts::shared::tabs::{ModuleKey, TabId, TabParams};
use leptos::prelude::*;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Everything a hosted module receives about the tab it lives in.
#[derive(Clone)]
pub struct ModuleProps {
    pub tab_id: TabId,
    pub params: TabParams,
    /// False while the tab is hidden; modules may pause expensive work.
    pub is_active: Signal<bool>,
    pub tab: HostedTab,
}

pub type ModuleFactory = Arc<dyn Fn(ModuleProps) -> AnyView + Send + Sync>;

pub type ModuleLoader =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ModuleFactory>>> + Send + Sync>;

#[derive(Clone)]
pub enum ModuleEntry {
    /// Renderable right away.
    Ready(ModuleFactory),
    /// Needs a one-time asynchronous load before the first render.
    Lazy(ModuleLoader),
}

#[derive(Clone, Default)]
pub struct ModuleRegistry {
    entries: HashMap<ModuleKey, ModuleEntry>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, key: &str, factory: F) -> Self
    where
        F: Fn(ModuleProps) -> AnyView + Send + Sync + 'static,
    {
        self.entries
            .insert(ModuleKey::from(key), ModuleEntry::Ready(Arc::new(factory)));
        self
    }

    pub fn register_lazy<L, Fut>(mut self, key: &str, loader: L) -> Self
    where
        L: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ModuleFactory> + 'static,
    {
        let loader: ModuleLoader = Arc::new(move || {
            Box::pin(loader()) as Pin<Box<dyn Future<Output = ModuleFactory>>>
        });
        self.entries
            .insert(ModuleKey::from(key), ModuleEntry::Lazy(loader));
        self
    }

    pub fn resolve(&self, key: &ModuleKey) -> Option<ModuleEntry> {
        self.entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shown in place of content when no module is registered for the key.
pub fn unknown_module_view(key: &ModuleKey) -> AnyView {
    let key = key.to_string();
    view! {
        <div class="placeholder placeholder--unknown-module">
            <strong>"Unknown module"</strong>
            <code>{key}</code>
        </div>
    }
    .into_any()
}

/// Shown in a tab's viewport while its module is first resolved.
pub fn loading_view() -> AnyView {
    view! {
        <div class="placeholder placeholder--loading">"Loading…"</div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_view(_: ModuleProps) -> AnyView {
        view! { <div></div> }.into_any()
    }

    #[test]
    fn test_resolve_known_and_unknown_keys() {
        let registry = ModuleRegistry::new()
            .register("sample-query", empty_view)
            .register_lazy("project", || async {
                Arc::new(empty_view) as ModuleFactory
            });

        assert_eq!(registry.len(), 2);
        assert!(matches!(
            registry.resolve(&ModuleKey::from("sample-query")),
            Some(ModuleEntry::Ready(_))
        ));
        assert!(matches!(
            registry.resolve(&ModuleKey::from("project")),
            Some(ModuleEntry::Lazy(_))
        ));
        assert!(registry.resolve(&ModuleKey::from("destroy-request")).is_none());
    }
}

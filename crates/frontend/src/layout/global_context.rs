use crate::layout::tabs::session::{CloseOutcome, Session};
use contracts::shared::tabs::{ModuleKey, TabId, TabParams};
use contracts::shared::tabs_config::TabsConfig;
use leptos::prelude::*;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Save routine registered by a hosted module for its own tab.
pub type SaveHandler =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = Result<(), String>>>> + Send + Sync>;

/// Application-wide tab session store, provided via context.
///
/// The only writer of the session. Every other component reads the signal and
/// calls these methods; each call is one complete transition.
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub session: RwSignal<Session>,
    pub config: StoredValue<TabsConfig>,
    save_handlers: StoredValue<HashMap<TabId, SaveHandler>>,
}

impl AppGlobalContext {
    pub fn new(config: TabsConfig) -> Self {
        Self {
            session: RwSignal::new(Session::new(config.neighbor_on_close, config.bulk_close)),
            config: StoredValue::new(config),
            save_handlers: StoredValue::new(HashMap::new()),
        }
    }

    /// Open a new tab and activate it. Never deduplicates; see [`Self::open_or_focus`].
    ///
    /// Returns `None` only if the session has been disposed.
    pub fn open_tab(&self, module_key: &str, params: TabParams, title: &str) -> Option<TabId> {
        let Some(id) = self
            .session
            .try_update(|s| s.open_tab(ModuleKey::from(module_key), params, title.to_string()))
        else {
            log::warn!("open_tab: session disposed, '{}' not opened", module_key);
            return None;
        };
        log::debug!("open_tab: {} key='{}' title='{}'", id, module_key, title);
        Some(id)
    }

    /// Activate the first tab already opened for this module and params, or open one.
    pub fn open_or_focus(&self, module_key: &str, params: TabParams, title: &str) -> Option<TabId> {
        let key = ModuleKey::from(module_key);
        let existing = self.session.try_with_untracked(|s| s.find(&key, &params))?;
        match existing {
            Some(id) => {
                self.switch_tab(id);
                Some(id)
            }
            None => self.open_tab(module_key, params, title),
        }
    }

    pub fn switch_tab(&self, id: TabId) {
        let switched = self
            .session
            .try_maybe_update(|s| {
                let changed = s.switch_tab(id);
                (changed, changed)
            })
            .unwrap_or(false);
        if switched {
            log::debug!("switch_tab: {}", id);
        } else {
            log::debug!("switch_tab: {} ignored (unknown or already active)", id);
        }
    }

    /// `false` means the tab has unsaved changes and `force` was not set.
    pub fn close_tab(&self, id: TabId, force: bool) -> bool {
        let outcome = self
            .session
            .try_maybe_update(|s| {
                let outcome = s.try_close(id, force);
                (outcome == CloseOutcome::Closed, outcome)
            })
            .unwrap_or(CloseOutcome::Missing);
        match outcome {
            CloseOutcome::Closed => {
                log::debug!("close_tab: {} closed (force={})", id, force);
                self.drop_save_handlers(&[id]);
                true
            }
            CloseOutcome::Blocked => {
                log::debug!("close_tab: {} blocked by unsaved changes", id);
                false
            }
            CloseOutcome::Missing => {
                log::debug!("close_tab: {} already gone", id);
                true
            }
        }
    }

    pub fn close_other_tabs(&self, keep: TabId) {
        let closed = self
            .session
            .try_maybe_update(|s| {
                let active_before = s.active_tab_id();
                let closed = s.close_other_tabs(keep);
                (!closed.is_empty() || s.active_tab_id() != active_before, closed)
            })
            .unwrap_or_default();
        log::debug!("close_other_tabs: kept {}, closed {}", keep, closed.len());
        self.drop_save_handlers(&closed);
    }

    pub fn close_all_tabs(&self) {
        let closed = self
            .session
            .try_maybe_update(|s| {
                let closed = s.close_all_tabs();
                (!closed.is_empty(), closed)
            })
            .unwrap_or_default();
        log::debug!("close_all_tabs: closed {}", closed.len());
        self.drop_save_handlers(&closed);
    }

    pub fn set_dirty(&self, id: TabId, dirty: bool) {
        self.session.maybe_update(|s| s.set_dirty(id, dirty));
    }

    /// Scroll offsets are never rendered, so subscribers are not notified.
    pub fn save_scroll_position(&self, id: TabId, offset: i32) {
        self.session
            .try_update_untracked(|s| s.save_scroll_position(id, offset));
    }

    pub fn update_tab_title(&self, id: TabId, title: &str) {
        self.session.maybe_update(|s| s.update_title(id, title));
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.session.with(|s| s.active_tab_id())
    }

    pub fn is_active(&self, id: TabId) -> bool {
        self.session.with(|s| s.is_active(id))
    }

    pub fn title_of_untracked(&self, id: TabId) -> Option<String> {
        self.session
            .with_untracked(|s| s.get(id).map(|t| t.title.clone()))
    }

    pub fn register_save_handler(&self, id: TabId, handler: SaveHandler) {
        if !self.session.with_untracked(|s| s.contains(id)) {
            return;
        }
        self.save_handlers.update_value(|handlers| {
            handlers.insert(id, handler);
        });
    }

    pub fn save_handler(&self, id: TabId) -> Option<SaveHandler> {
        self.save_handlers
            .with_value(|handlers| handlers.get(&id).cloned())
    }

    fn drop_save_handlers(&self, closed: &[TabId]) {
        if closed.is_empty() {
            return;
        }
        self.save_handlers.update_value(|handlers| {
            for id in closed {
                handlers.remove(id);
            }
        });
    }
}

/// Capability handed to a hosted module: it can only touch its own tab.
#[derive(Clone, Copy)]
pub struct HostedTab {
    id: TabId,
    ctx: AppGlobalContext,
}

impl HostedTab {
    pub(crate) fn new(id: TabId, ctx: AppGlobalContext) -> Self {
        Self { id, ctx }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.ctx.set_dirty(self.id, dirty);
    }

    pub fn update_title(&self, title: &str) {
        self.ctx.update_tab_title(self.id, title);
    }

    /// Used by the unsaved-changes dialog when "save" runs module handlers.
    pub fn register_save_handler<F, Fut>(&self, handler: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + 'static,
    {
        let handler: SaveHandler = Arc::new(move || {
            Box::pin(handler()) as Pin<Box<dyn Future<Output = Result<(), String>>>>
        });
        self.ctx.register_save_handler(self.id, handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::tabs_config::BulkClosePolicy;

    fn with_ctx(config: TabsConfig, test: impl FnOnce(AppGlobalContext)) {
        let owner = Owner::new();
        owner.with(|| test(AppGlobalContext::new(config)));
    }

    #[test]
    fn test_open_switch_close_through_context() {
        with_ctx(TabsConfig::default(), |ctx| {
            let a = ctx.open_tab("sample-query", TabParams::new(), "Samples").unwrap();
            let b = ctx.open_tab("project", TabParams::new(), "Project 12").unwrap();
            assert_eq!(ctx.session.get_untracked().active_tab_id(), Some(b));

            ctx.switch_tab(a);
            assert_eq!(ctx.session.get_untracked().active_tab_id(), Some(a));

            assert!(ctx.close_tab(a, false));
            assert_eq!(ctx.session.get_untracked().active_tab_id(), Some(b));
        });
    }

    #[test]
    fn test_open_or_focus_reuses_matching_tab() {
        with_ctx(TabsConfig::default(), |ctx| {
            let params = TabParams::new().with("request_id", 88);
            let first = ctx
                .open_or_focus("destroy-request", params.clone(), "Destroy request #88")
                .unwrap();
            ctx.open_tab("sample-query", TabParams::new(), "Samples").unwrap();
            let again = ctx
                .open_or_focus("destroy-request", params, "Destroy request #88")
                .unwrap();

            assert_eq!(first, again);
            assert_eq!(ctx.session.with_untracked(|s| s.len()), 2);
            assert_eq!(ctx.session.with_untracked(|s| s.active_tab_id()), Some(first));
        });
    }

    #[test]
    fn test_hosted_tab_only_touches_own_tab() {
        with_ctx(TabsConfig::default(), |ctx| {
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();
            let b = ctx.open_tab("b", TabParams::new(), "B").unwrap();
            let hosted = HostedTab::new(a, ctx);

            hosted.set_dirty(true);
            hosted.update_title("Project 12");

            ctx.session.with_untracked(|s| {
                assert!(s.get(a).unwrap().is_dirty);
                assert_eq!(s.get(a).unwrap().title, "Project 12");
                assert!(!s.get(b).unwrap().is_dirty);
                assert_eq!(s.get(b).unwrap().title, "B");
            });
        });
    }

    #[test]
    fn test_save_handlers_dropped_with_their_tab() {
        with_ctx(TabsConfig::default(), |ctx| {
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();
            let b = ctx.open_tab("b", TabParams::new(), "B").unwrap();
            HostedTab::new(a, ctx).register_save_handler(|| async { Ok(()) });
            HostedTab::new(b, ctx).register_save_handler(|| async { Ok(()) });

            ctx.close_other_tabs(b);
            assert!(ctx.save_handler(a).is_none());
            assert!(ctx.save_handler(b).is_some());

            ctx.close_all_tabs();
            assert!(ctx.save_handler(b).is_none());

            // Registering for a closed tab is ignored.
            HostedTab::new(a, ctx).register_save_handler(|| async { Ok(()) });
            assert!(ctx.save_handler(a).is_none());
        });
    }

    #[test]
    fn test_bulk_policy_comes_from_config() {
        let config = TabsConfig {
            bulk_close: BulkClosePolicy::KeepDirty,
            ..TabsConfig::default()
        };
        with_ctx(config, |ctx| {
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();
            ctx.open_tab("b", TabParams::new(), "B").unwrap();
            ctx.set_dirty(a, true);

            ctx.close_all_tabs();
            ctx.session.with_untracked(|s| {
                assert_eq!(s.len(), 1);
                assert_eq!(s.active_tab_id(), Some(a));
            });
        });
    }

    #[test]
    fn test_scroll_save_is_recorded() {
        with_ctx(TabsConfig::default(), |ctx| {
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();
            ctx.save_scroll_position(a, 240);
            assert_eq!(
                ctx.session.with_untracked(|s| s.get(a).unwrap().scroll_position),
                240
            );
        });
    }

    #[test]
    fn test_open_after_disposal_yields_no_id() {
        with_ctx(TabsConfig::default(), |ctx| {
            let a = ctx.open_tab("sample-query", TabParams::new(), "Samples").unwrap();
            assert_eq!(a, TabId(1));

            ctx.session.dispose();
            assert_eq!(ctx.open_tab("project", TabParams::new(), "Project 12"), None);
            assert_eq!(ctx.open_or_focus("sample-query", TabParams::new(), "Samples"), None);
        });
    }
}

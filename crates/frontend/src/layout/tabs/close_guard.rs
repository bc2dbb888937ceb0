//! Guarded close protocol.
//!
//! A close request first tries a non-forced close. If the tab has unsaved
//! changes the request becomes *pending* and the unsaved-changes dialog asks
//! the user. Only one close can be pending at a time; further requests are
//! rejected until the pending one is resolved and, if the user chose to save,
//! until that save has finished.

use crate::layout::global_context::AppGlobalContext;
use contracts::shared::tabs::TabId;
use contracts::shared::tabs_config::SaveOutcomePolicy;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

/// Answer of the unsaved-changes dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Cancel,
    Discard,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClose {
    pub tab_id: TabId,
    pub title: String,
}

/// What the controller must do after the dialog resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardAction {
    /// Leave the tab open.
    Keep,
    ForceClose(TabId),
    /// Run the tab's save handler, close if it succeeds.
    SaveThenClose(TabId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseGuard {
    pending: Option<PendingClose>,
}

impl CloseGuard {
    pub fn pending(&self) -> Option<&PendingClose> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns false (and changes nothing) if another close is already pending.
    pub fn begin(&mut self, tab_id: TabId, title: String) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(PendingClose { tab_id, title });
        true
    }

    /// Clear the pending close and map the answer to an action.
    pub fn resolve(&mut self, outcome: GuardOutcome, policy: SaveOutcomePolicy) -> GuardAction {
        let Some(pending) = self.pending.take() else {
            return GuardAction::Keep;
        };
        match (outcome, policy) {
            (GuardOutcome::Cancel, _) => GuardAction::Keep,
            (GuardOutcome::Discard, _) | (GuardOutcome::Save, SaveOutcomePolicy::Discard) => {
                GuardAction::ForceClose(pending.tab_id)
            }
            (GuardOutcome::Save, SaveOutcomePolicy::Handler) => {
                GuardAction::SaveThenClose(pending.tab_id)
            }
        }
    }

    /// Drop the pending close if its tab disappeared by other means.
    pub fn forget_if_gone(&mut self, still_open: impl Fn(TabId) -> bool) -> bool {
        match &self.pending {
            Some(pending) if !still_open(pending.tab_id) => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

/// Drives the protocol against the session. Provided once via context.
#[derive(Clone, Copy)]
pub struct CloseController {
    ctx: AppGlobalContext,
    pub guard: RwSignal<CloseGuard>,
    /// Tab whose save handler is still running after the dialog answered "save".
    saving: RwSignal<Option<TabId>>,
}

impl CloseController {
    pub fn new(ctx: AppGlobalContext) -> Self {
        Self {
            ctx,
            guard: RwSignal::new(CloseGuard::default()),
            saving: RwSignal::new(None),
        }
    }

    /// Tracked; close triggers disable themselves while this is true.
    pub fn is_busy(&self) -> bool {
        self.guard.with(|g| g.is_pending()) || self.saving.with(Option::is_some)
    }

    fn is_busy_untracked(&self) -> bool {
        self.guard.with_untracked(|g| g.is_pending())
            || self.saving.with_untracked(Option::is_some)
    }

    pub fn request_close(&self, tab_id: TabId) {
        if self.is_busy_untracked() {
            log::debug!("close of {} rejected: another close is in progress", tab_id);
            return;
        }
        if self.ctx.close_tab(tab_id, false) {
            return;
        }
        let Some(title) = self.ctx.title_of_untracked(tab_id) else {
            return;
        };
        self.guard.update(|g| {
            g.begin(tab_id, title);
        });
    }

    pub fn close_others(&self, keep: TabId) {
        if !self.is_busy_untracked() {
            self.ctx.close_other_tabs(keep);
        }
    }

    pub fn close_all(&self) {
        if !self.is_busy_untracked() {
            self.ctx.close_all_tabs();
        }
    }

    pub fn resolve(&self, outcome: GuardOutcome) {
        let policy = self.ctx.config.with_value(|c| c.save_outcome);
        let action = self
            .guard
            .try_update(|g| g.resolve(outcome, policy))
            .unwrap_or(GuardAction::Keep);
        log::debug!("unsaved-changes dialog: {:?} -> {:?}", outcome, action);

        match action {
            GuardAction::Keep => {}
            GuardAction::ForceClose(tab_id) => {
                self.ctx.close_tab(tab_id, true);
            }
            GuardAction::SaveThenClose(tab_id) => self.save_then_close(tab_id),
        }
    }

    fn save_then_close(&self, tab_id: TabId) {
        let Some(save) = self.begin_save(tab_id) else {
            log::warn!("no save handler registered for {}; tab left open", tab_id);
            return;
        };
        spawn_local(async move {
            save.await;
        });
    }

    /// Mark `tab_id` as saving and return the future that runs its handler.
    ///
    /// The future closes the tab if the save succeeds and resolves to whether
    /// it did. The controller stays busy until the future completes.
    pub(crate) fn begin_save(
        &self,
        tab_id: TabId,
    ) -> Option<impl Future<Output = bool> + 'static> {
        let handler = self.ctx.save_handler(tab_id)?;
        self.saving.set(Some(tab_id));
        let this = *self;
        Some(async move {
            let closed = match handler().await {
                Ok(()) => this.ctx.close_tab(tab_id, true),
                Err(e) => {
                    log::warn!("save of {} failed, tab left open: {}", tab_id, e);
                    false
                }
            };
            let _ = this.saving.try_set(None);
            closed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::global_context::HostedTab;
    use contracts::shared::tabs::TabParams;
    use contracts::shared::tabs_config::TabsConfig;
    use futures::executor::block_on;

    fn handler_config() -> TabsConfig {
        TabsConfig {
            save_outcome: SaveOutcomePolicy::Handler,
            ..TabsConfig::default()
        }
    }

    #[test]
    fn test_only_one_pending_close() {
        let mut guard = CloseGuard::default();
        assert!(guard.begin(TabId(1), "Project 12".into()));
        assert!(!guard.begin(TabId(2), "Samples".into()));
        assert_eq!(guard.pending().unwrap().tab_id, TabId(1));
    }

    #[test]
    fn test_outcomes_under_discard_policy() {
        let policy = SaveOutcomePolicy::Discard;
        let mut guard = CloseGuard::default();

        guard.begin(TabId(1), "A".into());
        assert_eq!(guard.resolve(GuardOutcome::Cancel, policy), GuardAction::Keep);
        assert!(!guard.is_pending());

        guard.begin(TabId(1), "A".into());
        assert_eq!(
            guard.resolve(GuardOutcome::Discard, policy),
            GuardAction::ForceClose(TabId(1))
        );

        guard.begin(TabId(1), "A".into());
        assert_eq!(
            guard.resolve(GuardOutcome::Save, policy),
            GuardAction::ForceClose(TabId(1))
        );
    }

    #[test]
    fn test_save_under_handler_policy() {
        let mut guard = CloseGuard::default();
        guard.begin(TabId(4), "Destroy request #88".into());
        assert_eq!(
            guard.resolve(GuardOutcome::Save, SaveOutcomePolicy::Handler),
            GuardAction::SaveThenClose(TabId(4))
        );
    }

    #[test]
    fn test_resolve_without_pending_keeps() {
        let mut guard = CloseGuard::default();
        assert_eq!(
            guard.resolve(GuardOutcome::Discard, SaveOutcomePolicy::Discard),
            GuardAction::Keep
        );
    }

    #[test]
    fn test_forget_if_gone() {
        let mut guard = CloseGuard::default();
        guard.begin(TabId(1), "A".into());
        assert!(!guard.forget_if_gone(|_| true));
        assert!(guard.forget_if_gone(|_| false));
        assert!(!guard.is_pending());
    }

    #[test]
    fn test_dirty_close_confirmed_by_discard() {
        let owner = Owner::new();
        owner.with(|| {
            let ctx = AppGlobalContext::new(TabsConfig::default());
            let controller = CloseController::new(ctx);
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();
            let b = ctx.open_tab("b", TabParams::new(), "B").unwrap();
            ctx.set_dirty(b, true);

            controller.request_close(b);
            assert_eq!(ctx.session.with_untracked(|s| s.len()), 2);
            assert_eq!(
                controller.guard.with_untracked(|g| g.pending().cloned()),
                Some(PendingClose { tab_id: b, title: "B".into() })
            );

            // A second request while the dialog is open is rejected.
            controller.request_close(a);
            assert_eq!(ctx.session.with_untracked(|s| s.len()), 2);
            controller.close_all();
            assert_eq!(ctx.session.with_untracked(|s| s.len()), 2);

            controller.resolve(GuardOutcome::Discard);
            ctx.session.with_untracked(|s| {
                assert_eq!(s.len(), 1);
                assert_eq!(s.active_tab_id(), Some(a));
            });
            assert!(!controller.guard.with_untracked(|g| g.is_pending()));
        });
    }

    #[test]
    fn test_cancel_leaves_dirty_tab_open() {
        let owner = Owner::new();
        owner.with(|| {
            let ctx = AppGlobalContext::new(TabsConfig::default());
            let controller = CloseController::new(ctx);
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();
            ctx.set_dirty(a, true);

            controller.request_close(a);
            controller.resolve(GuardOutcome::Cancel);
            ctx.session.with_untracked(|s| {
                assert!(s.contains(a));
                assert_eq!(s.active_tab_id(), Some(a));
            });
        });
    }

    #[test]
    fn test_clean_close_needs_no_dialog() {
        let owner = Owner::new();
        owner.with(|| {
            let ctx = AppGlobalContext::new(TabsConfig::default());
            let controller = CloseController::new(ctx);
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();

            controller.request_close(a);
            assert!(ctx.session.with_untracked(|s| s.is_empty()));
            assert!(!controller.guard.with_untracked(|g| g.is_pending()));
        });
    }

    #[test]
    fn test_save_without_handler_keeps_tab() {
        let owner = Owner::new();
        owner.with(|| {
            let config = TabsConfig {
                save_outcome: SaveOutcomePolicy::Handler,
                ..TabsConfig::default()
            };
            let ctx = AppGlobalContext::new(config);
            let controller = CloseController::new(ctx);
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();
            ctx.set_dirty(a, true);

            controller.request_close(a);
            controller.resolve(GuardOutcome::Save);
            assert!(ctx.session.with_untracked(|s| s.contains(a)));
            assert!(!controller.guard.with_untracked(|g| g.is_pending()));
        });
    }

    #[test]
    fn test_successful_save_closes_dirty_tab() {
        let owner = Owner::new();
        owner.with(|| {
            let ctx = AppGlobalContext::new(handler_config());
            let controller = CloseController::new(ctx);
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();
            let b = ctx.open_tab("b", TabParams::new(), "B").unwrap();
            ctx.set_dirty(b, true);
            HostedTab::new(b, ctx).register_save_handler(|| async { Ok(()) });

            controller.request_close(b);
            let action = controller
                .guard
                .try_update(|g| g.resolve(GuardOutcome::Save, SaveOutcomePolicy::Handler))
                .unwrap();
            assert_eq!(action, GuardAction::SaveThenClose(b));

            let save = controller.begin_save(b).unwrap();
            assert!(block_on(save));
            ctx.session.with_untracked(|s| {
                assert!(!s.contains(b));
                assert_eq!(s.active_tab_id(), Some(a));
            });
            assert!(!controller.is_busy_untracked());
        });
    }

    #[test]
    fn test_failed_save_keeps_dirty_tab_open() {
        let owner = Owner::new();
        owner.with(|| {
            let ctx = AppGlobalContext::new(handler_config());
            let controller = CloseController::new(ctx);
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();
            ctx.set_dirty(a, true);
            HostedTab::new(a, ctx)
                .register_save_handler(|| async { Err("sample service unavailable".to_string()) });

            let save = controller.begin_save(a).unwrap();
            assert!(!block_on(save));
            ctx.session.with_untracked(|s| {
                assert!(s.contains(a));
                assert!(s.get(a).unwrap().is_dirty);
            });
            assert!(!controller.is_busy_untracked());
        });
    }

    #[test]
    fn test_close_triggers_stay_disabled_while_saving() {
        let owner = Owner::new();
        owner.with(|| {
            let ctx = AppGlobalContext::new(handler_config());
            let controller = CloseController::new(ctx);
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();
            let b = ctx.open_tab("b", TabParams::new(), "B").unwrap();
            ctx.set_dirty(b, true);
            HostedTab::new(b, ctx).register_save_handler(|| async { Ok(()) });

            let save = controller.begin_save(b).unwrap();
            assert!(controller.is_busy_untracked());

            // Neither a second dialog for b nor other closes start while b saves.
            controller.request_close(b);
            assert!(!controller.guard.with_untracked(|g| g.is_pending()));
            controller.request_close(a);
            controller.close_all();
            assert_eq!(ctx.session.with_untracked(|s| s.len()), 2);

            assert!(block_on(save));
            assert!(!controller.is_busy_untracked());
            controller.request_close(a);
            assert!(ctx.session.with_untracked(|s| s.is_empty()));
        });
    }

    #[test]
    fn test_begin_save_without_handler_is_none() {
        let owner = Owner::new();
        owner.with(|| {
            let ctx = AppGlobalContext::new(handler_config());
            let controller = CloseController::new(ctx);
            let a = ctx.open_tab("a", TabParams::new(), "A").unwrap();

            assert!(controller.begin_save(a).is_none());
            assert!(!controller.is_busy_untracked());
        });
    }
}

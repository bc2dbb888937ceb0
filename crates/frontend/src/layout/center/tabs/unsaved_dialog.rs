//! Unsaved-changes dialog shown when a dirty tab is asked to close.
//!
//! Mounted once at the root. It is open exactly while the close controller
//! holds a pending close and reports one of cancel / discard / save back.

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::{CloseController, GuardOutcome};
use contracts::shared::tabs_config::SaveOutcomePolicy;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn UnsavedChangesDialog() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let closer = use_context::<CloseController>().expect("CloseController context not found");
    let save_runs_handler =
        tabs_store.config.with_value(|c| c.save_outcome == SaveOutcomePolicy::Handler);

    let open = RwSignal::new(false);

    // Stays closed while an answered "save" is still running.
    Effect::new(move |_| open.set(closer.guard.with(|g| g.is_pending())));

    // Dismissed by overlay click or Escape while still pending: same as cancel.
    Effect::new(move |_| {
        if !open.get() && closer.guard.with_untracked(|g| g.is_pending()) {
            closer.resolve(GuardOutcome::Cancel);
        }
    });

    // The tab may vanish under the dialog (e.g. its module saved and closed it).
    Effect::new(move |_| {
        tabs_store.session.track();
        closer.guard.maybe_update(|g| {
            g.forget_if_gone(|tab_id| tabs_store.session.with_untracked(|s| s.contains(tab_id)))
        });
    });

    // Resolve on the next tick so the button's handler is not dropped mid-dispatch.
    let answer = move |outcome: GuardOutcome| {
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            closer.resolve(outcome);
        });
    };

    let message = move || {
        closer.guard.with(|g| {
            g.pending()
                .map(|p| format!("\"{}\" has unsaved changes.", p.title))
                .unwrap_or_default()
        })
    };

    view! {
        <Dialog open=open>
            <DialogSurface>
                <DialogBody>
                    <DialogTitle>"Close tab?"</DialogTitle>
                    <DialogContent>
                        <p>{message}</p>
                        <Show when=move || !save_runs_handler>
                            <p class="dialog__hint">
                                "Saving from this dialog is not available yet: \"Save and close\" closes without saving."
                            </p>
                        </Show>
                    </DialogContent>
                    <DialogActions>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| answer(GuardOutcome::Save)
                        >
                            "Save and close"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| answer(GuardOutcome::Discard)
                        >
                            "Discard changes"
                        </Button>
                        <Button
                            appearance=ButtonAppearance::Subtle
                            on_click=move |_| answer(GuardOutcome::Cancel)
                        >
                            "Cancel"
                        </Button>
                    </DialogActions>
                </DialogBody>
            </DialogSurface>
        </Dialog>
    }
}

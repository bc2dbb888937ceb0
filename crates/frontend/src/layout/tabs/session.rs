//! Tab session state - the canonical list of open tabs and the active one.
//!
//! `Session` is a plain value. Every operation is a complete transition: it
//! either applies fully or leaves the session untouched. Operations that name a
//! tab id no longer present are no-ops; closing can race with a queued click.
//!
//! The session never deduplicates opens. Opening the same module with the same
//! params twice yields two tabs; callers who want one tab per target use
//! [`Session::find`] first.

use contracts::shared::tabs::{ModuleKey, TabId, TabParams, TabSnapshot};
use contracts::shared::tabs_config::{BulkClosePolicy, NeighborPolicy};

#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub id: TabId,
    pub module_key: ModuleKey,
    pub title: String,
    pub params: TabParams,
    pub is_dirty: bool,
    pub scroll_position: i32,
}

/// Result of a close attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// Dirty and not forced; nothing changed.
    Blocked,
    /// Unknown id; nothing changed.
    Missing,
}

#[derive(Debug, Clone)]
pub struct Session {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    next_id: u64,
    neighbor_policy: NeighborPolicy,
    bulk_policy: BulkClosePolicy,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(NeighborPolicy::default(), BulkClosePolicy::default())
    }
}

impl Session {
    pub fn new(neighbor_policy: NeighborPolicy, bulk_policy: BulkClosePolicy) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_id: 1,
            neighbor_policy,
            bulk_policy,
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn is_active(&self, id: TabId) -> bool {
        self.active == Some(id)
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.position(id).is_some()
    }

    /// First tab opened for exactly this module and params.
    pub fn find(&self, module_key: &ModuleKey, params: &TabParams) -> Option<TabId> {
        self.tabs
            .iter()
            .find(|t| &t.module_key == module_key && &t.params == params)
            .map(|t| t.id)
    }

    pub fn snapshot(&self) -> Vec<TabSnapshot> {
        self.tabs
            .iter()
            .map(|t| TabSnapshot {
                id: t.id,
                module_key: t.module_key.clone(),
                title: t.title.clone(),
                is_dirty: t.is_dirty,
                scroll_position: t.scroll_position,
                is_active: self.is_active(t.id),
            })
            .collect()
    }

    /// Append a new clean tab and make it active.
    pub fn open_tab(&mut self, module_key: ModuleKey, params: TabParams, title: String) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        self.tabs.push(Tab {
            id,
            module_key,
            title,
            params,
            is_dirty: false,
            scroll_position: 0,
        });
        self.active = Some(id);
        id
    }

    /// Returns true if the active tab changed.
    pub fn switch_tab(&mut self, id: TabId) -> bool {
        if !self.contains(id) || self.active == Some(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Close one tab. A dirty tab is only closed when `force` is set.
    pub fn try_close(&mut self, id: TabId, force: bool) -> CloseOutcome {
        let Some(index) = self.position(id) else {
            return CloseOutcome::Missing;
        };
        if self.tabs[index].is_dirty && !force {
            return CloseOutcome::Blocked;
        }

        let order = self.ids();
        self.tabs.remove(index);
        if self.active == Some(id) {
            self.active = self.neighbor_of(&order, index);
        }
        CloseOutcome::Closed
    }

    /// `false` only when the close was blocked by unsaved changes.
    ///
    /// An unknown id reports `true`: the tab is already gone.
    pub fn close_tab(&mut self, id: TabId, force: bool) -> bool {
        self.try_close(id, force) != CloseOutcome::Blocked
    }

    /// Close every tab except `keep` and activate it. Returns the closed ids.
    pub fn close_other_tabs(&mut self, keep: TabId) -> Vec<TabId> {
        if !self.contains(keep) {
            return Vec::new();
        }
        let closed = self.sweep(|t| t.id != keep);
        self.active = Some(keep);
        closed
    }

    /// Close every tab. Returns the closed ids.
    pub fn close_all_tabs(&mut self) -> Vec<TabId> {
        let order = self.ids();
        let active_index = self.active.and_then(|id| self.position(id));
        let closed = self.sweep(|_| true);
        if let Some(index) = active_index {
            if !self.active.is_some_and(|id| self.contains(id)) {
                self.active = self.neighbor_of(&order, index);
            }
        }
        closed
    }

    /// Returns true if the flag changed.
    pub fn set_dirty(&mut self, id: TabId, dirty: bool) -> bool {
        match self.get_mut(id) {
            Some(tab) if tab.is_dirty != dirty => {
                tab.is_dirty = dirty;
                true
            }
            _ => false,
        }
    }

    /// Returns true if the stored offset changed. Negative offsets clamp to 0.
    pub fn save_scroll_position(&mut self, id: TabId, offset: i32) -> bool {
        let offset = offset.max(0);
        match self.get_mut(id) {
            Some(tab) if tab.scroll_position != offset => {
                tab.scroll_position = offset;
                true
            }
            _ => false,
        }
    }

    /// Returns true if the title changed.
    pub fn update_title(&mut self, id: TabId, title: &str) -> bool {
        match self.get_mut(id) {
            Some(tab) if tab.title != title => {
                tab.title = title.to_string();
                true
            }
            _ => false,
        }
    }

    fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    fn ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id).collect()
    }

    /// Remove the tabs selected by `target`, honouring the bulk policy.
    fn sweep(&mut self, target: impl Fn(&Tab) -> bool) -> Vec<TabId> {
        let keep_dirty = self.bulk_policy == BulkClosePolicy::KeepDirty;
        let mut closed = Vec::new();
        self.tabs.retain(|t| {
            let remove = target(t) && !(keep_dirty && t.is_dirty);
            if remove {
                closed.push(t.id);
            }
            !remove
        });
        if self.tabs.is_empty() {
            self.active = None;
        }
        closed
    }

    /// Surviving neighbour of `order[index]`, looked up in the pre-removal order.
    fn neighbor_of(&self, order: &[TabId], index: usize) -> Option<TabId> {
        let before = order[..index].iter().rev().find(|id| self.contains(**id));
        let after = order
            .get(index + 1..)
            .and_then(|rest| rest.iter().find(|id| self.contains(**id)));
        match self.neighbor_policy {
            NeighborPolicy::PreferPrevious => before.or(after),
            NeighborPolicy::PreferNext => after.or(before),
        }
        .copied()
    }
}

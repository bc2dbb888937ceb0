//! Per-tab render slots of the keep-alive host.
//!
//! The session owns tab data; this arena owns render bookkeeping keyed by the
//! same `TabId`. A slot walks `Unresolved -> Resolving -> Ready` exactly once
//! (or ends in `Unknown` when no module is registered for the key) and lives
//! until the tab's page is torn down.

use contracts::shared::tabs::TabId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Unresolved,
    Resolving,
    Ready,
    Unknown,
}

/// Proof that a resolution was started for a particular slot incarnation.
///
/// A result carrying a stale ticket (slot removed, or removed and recreated)
/// is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveTicket {
    pub tab_id: TabId,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    phase: RenderPhase,
    generation: u64,
    resolutions: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RenderSlots {
    slots: HashMap<TabId, Slot>,
    next_generation: u64,
}

impl RenderSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the slot if it does not exist yet and return its phase.
    pub fn ensure(&mut self, tab_id: TabId) -> RenderPhase {
        if let Some(slot) = self.slots.get(&tab_id) {
            return slot.phase;
        }
        let generation = self.next_generation;
        self.next_generation += 1;
        self.slots.insert(
            tab_id,
            Slot {
                phase: RenderPhase::Unresolved,
                generation,
                resolutions: 0,
            },
        );
        RenderPhase::Unresolved
    }

    /// Start resolving. Only an `Unresolved` slot yields a ticket.
    pub fn begin_resolve(&mut self, tab_id: TabId) -> Option<ResolveTicket> {
        let slot = self.slots.get_mut(&tab_id)?;
        if slot.phase != RenderPhase::Unresolved {
            return None;
        }
        slot.phase = RenderPhase::Resolving;
        slot.resolutions += 1;
        Some(ResolveTicket {
            tab_id,
            generation: slot.generation,
        })
    }

    /// Returns false if the result must be discarded.
    pub fn mark_ready(&mut self, ticket: ResolveTicket) -> bool {
        self.finish(ticket, RenderPhase::Ready)
    }

    /// Returns false if the result must be discarded.
    pub fn mark_unknown(&mut self, ticket: ResolveTicket) -> bool {
        self.finish(ticket, RenderPhase::Unknown)
    }

    pub fn is_current(&self, ticket: ResolveTicket) -> bool {
        self.slots.get(&ticket.tab_id).is_some_and(|slot| {
            slot.generation == ticket.generation && slot.phase == RenderPhase::Resolving
        })
    }

    pub fn phase(&self, tab_id: TabId) -> Option<RenderPhase> {
        self.slots.get(&tab_id).map(|slot| slot.phase)
    }

    /// How many resolutions were ever started for the live slot.
    pub fn resolutions(&self, tab_id: TabId) -> u32 {
        self.slots.get(&tab_id).map_or(0, |slot| slot.resolutions)
    }

    pub fn remove(&mut self, tab_id: TabId) -> bool {
        self.slots.remove(&tab_id).is_some()
    }

    fn finish(&mut self, ticket: ResolveTicket, phase: RenderPhase) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        if let Some(slot) = self.slots.get_mut(&ticket.tab_id) {
            slot.phase = phase;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_resolves_once() {
        let mut slots = RenderSlots::new();
        let id = TabId(1);

        assert_eq!(slots.ensure(id), RenderPhase::Unresolved);
        let ticket = slots.begin_resolve(id).unwrap();
        assert_eq!(slots.phase(id), Some(RenderPhase::Resolving));
        assert!(slots.begin_resolve(id).is_none());

        assert!(slots.mark_ready(ticket));
        assert_eq!(slots.phase(id), Some(RenderPhase::Ready));
        assert!(!slots.mark_ready(ticket));

        // Visiting the tab again only re-ensures the slot.
        assert_eq!(slots.ensure(id), RenderPhase::Ready);
        assert!(slots.begin_resolve(id).is_none());
        assert_eq!(slots.resolutions(id), 1);
    }

    #[test]
    fn test_unknown_module_is_terminal() {
        let mut slots = RenderSlots::new();
        let id = TabId(3);
        slots.ensure(id);
        let ticket = slots.begin_resolve(id).unwrap();

        assert!(slots.mark_unknown(ticket));
        assert_eq!(slots.phase(id), Some(RenderPhase::Unknown));
        assert!(slots.begin_resolve(id).is_none());
    }

    #[test]
    fn test_late_result_after_removal_is_discarded() {
        let mut slots = RenderSlots::new();
        let id = TabId(4);
        slots.ensure(id);
        let ticket = slots.begin_resolve(id).unwrap();

        assert!(slots.remove(id));
        assert!(!slots.mark_ready(ticket));
        assert_eq!(slots.phase(id), None);
    }

    #[test]
    fn test_recreated_slot_rejects_old_ticket() {
        let mut slots = RenderSlots::new();
        let id = TabId(5);
        slots.ensure(id);
        let stale = slots.begin_resolve(id).unwrap();
        slots.remove(id);

        slots.ensure(id);
        let fresh = slots.begin_resolve(id).unwrap();
        assert!(!slots.mark_ready(stale));
        assert_eq!(slots.phase(id), Some(RenderPhase::Resolving));
        assert!(slots.mark_ready(fresh));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut slots = RenderSlots::new();
        let (a, b) = (TabId(1), TabId(2));
        slots.ensure(a);
        slots.ensure(b);
        let ta = slots.begin_resolve(a).unwrap();
        slots.mark_ready(ta);
        let _tb = slots.begin_resolve(b).unwrap();

        assert_eq!(slots.phase(a), Some(RenderPhase::Ready));
        assert_eq!(slots.phase(b), Some(RenderPhase::Resolving));
        slots.remove(b);
        assert_eq!(slots.phase(a), Some(RenderPhase::Ready));
        assert_eq!(slots.phase(b), None);
    }
}

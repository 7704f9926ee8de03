//! # Dual-Pane Coordinator
//!
//! Keeps the rendered panes in line with the back stack and the latest
//! layout. Each reconcile computes a fresh [`PaneAssignment`] and sends only
//! the difference to the navigators: `hide` for entries leaving a slot while
//! still on the stack, `navigate` for entries entering one. Entries that left
//! the stack were already told through `pop_back_stack`.
//!
//! The coordinator reads the stack and never changes it.

use log::debug;

use crate::core::back_stack::BackStack;
use crate::core::entry::EntryId;
use crate::error::NavResult;
use crate::navigator::{NavigatorKind, NavigatorRegistry};
use crate::pane::{PaneAssignment, PaneLayout, assign};

#[derive(Debug, Default)]
pub struct DualPaneCoordinator {
    layout: PaneLayout,
    rendered: PaneAssignment,
}

impl DualPaneCoordinator {
    pub fn new(layout: PaneLayout) -> Self {
        Self {
            layout,
            rendered: PaneAssignment::default(),
        }
    }

    pub fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    /// What the navigators were last told to show.
    pub fn assignment(&self) -> &PaneAssignment {
        &self.rendered
    }

    /// Records a new layout. Returns false when nothing changed.
    pub fn set_layout(&mut self, layout: PaneLayout) -> bool {
        if layout == self.layout {
            return false;
        }
        debug!("Pane layout {:?} -> {:?}", self.layout.pane_count, layout.pane_count);
        self.layout = layout;
        true
    }

    /// Forces `id` to be re-sent on the next reconcile, e.g. after its
    /// arguments changed in place.
    pub fn invalidate(&mut self, id: EntryId) {
        if self.rendered.primary == Some(id) {
            self.rendered.primary = None;
            self.rendered.spanned = false;
        }
        if self.rendered.secondary == Some(id) {
            self.rendered.secondary = None;
        }
        self.rendered.overlays.retain(|o| *o != id);
    }

    /// Drops everything rendered, e.g. when the stack is torn down.
    pub fn reset(&mut self) {
        self.rendered = PaneAssignment::default();
    }

    /// Re-assigns panes and dispatches the changes. Returns true when the
    /// assignment changed.
    pub fn reconcile(&mut self, stack: &BackStack, navigators: &mut NavigatorRegistry) -> NavResult<bool> {
        let next = assign(stack.entries(), &self.layout, |e| {
            navigators.kind(e.navigator()).unwrap_or(NavigatorKind::NoOp)
        });
        if next == self.rendered {
            return Ok(false);
        }

        let before = self.rendered.slots();
        let after = next.slots();

        for (slot, id) in before.iter().filter(|s| !after.contains(s)) {
            if let Some(entry) = stack.get(*id) {
                navigators.get_mut(entry.navigator())?.hide(entry, *slot);
            }
        }
        for (slot, id) in after.iter().filter(|s| !before.contains(s)) {
            if let Some(entry) = stack.get(*id) {
                navigators.get_mut(entry.navigator())?.navigate(entry, *slot);
            }
        }

        debug!(
            "Panes: primary={:?} secondary={:?} spanned={} overlays={}",
            next.primary.and_then(|id| stack.get(id)).map(|e| e.destination().as_str()),
            next.secondary.and_then(|id| stack.get(id)).map(|e| e.destination().as_str()),
            next.spanned,
            next.overlays.len()
        );
        self.rendered = next;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::BackStackEntry;
    use crate::graph::action::LaunchScreen;
    use crate::graph::args::Args;
    use crate::navigator::Slot;
    use crate::test_support::{Call, RecordingNavigator};

    fn setup() -> (NavigatorRegistry, crate::test_support::CallLog) {
        let (nav, log) = RecordingNavigator::host();
        let mut registry = NavigatorRegistry::new();
        registry.register("host", nav).unwrap();
        (registry, log)
    }

    fn push(stack: &mut BackStack, dest: &str) -> EntryId {
        let entry = BackStackEntry::new(dest.into(), "host", Args::new(), LaunchScreen::Default);
        let id = entry.id();
        stack.push(entry);
        id
    }

    #[test]
    fn test_flip_to_dual_sends_only_changes() {
        let (mut registry, log) = setup();
        let mut stack = BackStack::new();
        push(&mut stack, "home");
        let dash = push(&mut stack, "dashboard");
        let reg = push(&mut stack, "register");

        let mut coordinator = DualPaneCoordinator::new(PaneLayout::single());
        assert!(coordinator.reconcile(&stack, &mut registry).unwrap());
        assert_eq!(log.take(), vec![Call::Navigate("register".into(), Slot::Primary)]);

        coordinator.set_layout(PaneLayout::dual());
        coordinator.reconcile(&stack, &mut registry).unwrap();
        assert_eq!(coordinator.assignment().primary, Some(dash));
        assert_eq!(coordinator.assignment().secondary, Some(reg));
        assert_eq!(
            log.take(),
            vec![
                Call::Hide("register".into(), Slot::Primary),
                Call::Navigate("dashboard".into(), Slot::Primary),
                Call::Navigate("register".into(), Slot::Secondary),
            ]
        );

        // nothing changed, nothing sent
        assert!(!coordinator.reconcile(&stack, &mut registry).unwrap());
        assert!(log.take().is_empty());
    }

    #[test]
    fn test_popped_entries_are_not_hidden() {
        let (mut registry, log) = setup();
        let mut stack = BackStack::new();
        push(&mut stack, "home");
        push(&mut stack, "dashboard");
        let mut coordinator = DualPaneCoordinator::new(PaneLayout::dual());
        coordinator.reconcile(&stack, &mut registry).unwrap();
        log.take();

        stack.truncate(1);
        coordinator.reconcile(&stack, &mut registry).unwrap();
        // home stays in primary; the secondary pane is left empty
        assert!(log.take().is_empty());
        assert_eq!(coordinator.assignment().secondary, None);
    }

    #[test]
    fn test_invalidate_forces_resend() {
        let (mut registry, log) = setup();
        let mut stack = BackStack::new();
        let home = push(&mut stack, "home");
        let mut coordinator = DualPaneCoordinator::new(PaneLayout::single());
        coordinator.reconcile(&stack, &mut registry).unwrap();
        log.take();

        coordinator.invalidate(home);
        coordinator.reconcile(&stack, &mut registry).unwrap();
        assert_eq!(log.take(), vec![Call::Navigate("home".into(), Slot::Primary)]);
    }

    #[test]
    fn test_set_layout_reports_change() {
        let mut coordinator = DualPaneCoordinator::new(PaneLayout::single());
        assert!(!coordinator.set_layout(PaneLayout::single()));
        assert!(coordinator.set_layout(PaneLayout::dual()));
        assert!(coordinator.layout().is_dual());
    }
}

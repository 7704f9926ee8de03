use log::debug;

use crate::core::entry::{BackStackEntry, EntryId};
use crate::navigator::{Navigator, NavigatorKind, Slot};

/// Floating content (dialogs, sheets) shown above the panes.
///
/// Closing an overlay is handled by the overlay itself, so pops report
/// `true`.
#[derive(Debug, Default)]
pub struct OverlayNavigator {
    open: Vec<EntryId>,
}

impl OverlayNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn is_open(&self, id: EntryId) -> bool {
        self.open.contains(&id)
    }
}

impl Navigator for OverlayNavigator {
    fn kind(&self) -> NavigatorKind {
        NavigatorKind::Overlay
    }

    fn navigate(&mut self, entry: &BackStackEntry, _slot: Slot) {
        if !self.open.contains(&entry.id()) {
            debug!("overlay: open {} ({})", entry.destination(), entry.id());
            self.open.push(entry.id());
        }
    }

    fn pop_back_stack(&mut self, entry: &BackStackEntry) -> bool {
        let before = self.open.len();
        self.open.retain(|id| *id != entry.id());
        debug!("overlay: close {} ({})", entry.destination(), entry.id());
        before != self.open.len()
    }

    fn hide(&mut self, entry: &BackStackEntry, _slot: Slot) {
        self.open.retain(|id| *id != entry.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::action::LaunchScreen;
    use crate::graph::args::Args;

    #[test]
    fn test_overlay_consumes_its_own_pop() {
        let mut nav = OverlayNavigator::new();
        let dialog = BackStackEntry::new("confirm".into(), "dialog", Args::new(), LaunchScreen::Default);
        nav.navigate(&dialog, Slot::Overlay);
        nav.navigate(&dialog, Slot::Overlay);
        assert_eq!(nav.open_count(), 1);
        assert!(nav.pop_back_stack(&dialog));
        assert!(!nav.is_open(dialog.id()));
        // already closed: nothing left to consume
        assert!(!nav.pop_back_stack(&dialog));
    }
}

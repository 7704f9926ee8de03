use std::collections::BTreeMap;

use log::debug;

use crate::core::entry::{BackStackEntry, EntryId};
use crate::graph::DestinationId;
use crate::navigator::{HostInfo, Navigator, NavigatorKind, Slot};

/// Renders destinations into the primary or secondary container.
///
/// Keeps a record of what each slot currently shows so hosts can mirror it.
#[derive(Debug, Default)]
pub struct HostNavigator {
    shown: BTreeMap<Slot, (EntryId, DestinationId)>,
    attached_to: Option<DestinationId>,
}

impl HostNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination shown in `slot`, if any.
    pub fn shown(&self, slot: Slot) -> Option<&DestinationId> {
        self.shown.get(&slot).map(|(_, d)| d)
    }

    pub fn attached_to(&self) -> Option<&DestinationId> {
        self.attached_to.as_ref()
    }

    fn vacate(&mut self, id: EntryId) {
        self.shown.retain(|_, (shown, _)| *shown != id);
    }
}

impl Navigator for HostNavigator {
    fn kind(&self) -> NavigatorKind {
        NavigatorKind::Host
    }

    fn navigate(&mut self, entry: &BackStackEntry, slot: Slot) {
        debug!("host: show {} ({}) in {:?}", entry.destination(), entry.id(), slot);
        // Spanning takes over both panes
        if slot == Slot::Spanned {
            self.shown.remove(&Slot::Primary);
            self.shown.remove(&Slot::Secondary);
        } else if matches!(slot, Slot::Primary | Slot::Secondary) {
            self.shown.remove(&Slot::Spanned);
        }
        self.vacate(entry.id());
        self.shown.insert(slot, (entry.id(), entry.destination().clone()));
    }

    fn pop_back_stack(&mut self, entry: &BackStackEntry) -> bool {
        debug!("host: pop {} ({})", entry.destination(), entry.id());
        self.vacate(entry.id());
        false
    }

    fn on_attach(&mut self, host: &HostInfo) {
        self.attached_to = Some(host.graph.clone());
    }

    fn hide(&mut self, entry: &BackStackEntry, slot: Slot) {
        if self.shown.get(&slot).is_some_and(|(id, _)| *id == entry.id()) {
            self.shown.remove(&slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::action::LaunchScreen;
    use crate::graph::args::Args;
    use crate::pane::PaneLayout;

    fn entry(dest: &str) -> BackStackEntry {
        BackStackEntry::new(dest.into(), "host", Args::new(), LaunchScreen::Default)
    }

    #[test]
    fn test_tracks_slots() {
        let mut nav = HostNavigator::new();
        let home = entry("home");
        let dash = entry("dashboard");
        nav.navigate(&home, Slot::Primary);
        nav.navigate(&dash, Slot::Secondary);
        assert_eq!(nav.shown(Slot::Primary).map(|d| d.as_str()), Some("home"));
        assert_eq!(nav.shown(Slot::Secondary).map(|d| d.as_str()), Some("dashboard"));

        // moving an entry to another slot vacates the old one
        nav.navigate(&dash, Slot::Primary);
        assert_eq!(nav.shown(Slot::Primary).map(|d| d.as_str()), Some("dashboard"));
        assert!(nav.shown(Slot::Secondary).is_none());
    }

    #[test]
    fn test_pop_is_left_to_the_controller() {
        let mut nav = HostNavigator::new();
        let home = entry("home");
        nav.navigate(&home, Slot::Primary);
        assert!(!nav.pop_back_stack(&home));
        assert!(nav.shown(Slot::Primary).is_none());
    }

    #[test]
    fn test_spanned_replaces_panes() {
        let mut nav = HostNavigator::new();
        nav.navigate(&entry("home"), Slot::Primary);
        nav.navigate(&entry("dashboard"), Slot::Secondary);
        nav.navigate(&entry("video"), Slot::Spanned);
        assert!(nav.shown(Slot::Primary).is_none());
        assert!(nav.shown(Slot::Secondary).is_none());
        assert_eq!(nav.shown(Slot::Spanned).map(|d| d.as_str()), Some("video"));
    }

    #[test]
    fn test_hide_only_clears_matching_entry() {
        let mut nav = HostNavigator::new();
        let home = entry("home");
        let dash = entry("dashboard");
        nav.navigate(&home, Slot::Primary);
        nav.hide(&dash, Slot::Primary);
        assert!(nav.shown(Slot::Primary).is_some());
        nav.hide(&home, Slot::Primary);
        assert!(nav.shown(Slot::Primary).is_none());
    }

    #[test]
    fn test_attach_records_graph() {
        let mut nav = HostNavigator::new();
        nav.on_attach(&HostInfo {
            graph: "main".into(),
            layout: PaneLayout::single(),
        });
        assert_eq!(nav.attached_to().map(|g| g.as_str()), Some("main"));
    }
}

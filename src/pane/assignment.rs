//! Mapping of the back stack onto panes. Always derived, never stored as truth.

use serde::{Deserialize, Serialize};

use crate::core::entry::{BackStackEntry, EntryId};
use crate::graph::action::LaunchScreen;
use crate::navigator::{NavigatorKind, Slot};
use crate::pane::PaneLayout;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneAssignment {
    pub primary: Option<EntryId>,
    pub secondary: Option<EntryId>,
    /// The primary entry covers both panes.
    pub spanned: bool,
    /// Overlay entries above the newest pane entry, bottom first.
    pub overlays: Vec<EntryId>,
}

impl PaneAssignment {
    /// Every rendered (slot, entry) pair, panes first then overlays.
    pub fn slots(&self) -> Vec<(Slot, EntryId)> {
        let mut slots = Vec::with_capacity(2 + self.overlays.len());
        match (self.primary, self.spanned) {
            (Some(p), true) => slots.push((Slot::Spanned, p)),
            (Some(p), false) => slots.push((Slot::Primary, p)),
            (None, _) => {}
        }
        if let Some(s) = self.secondary {
            slots.push((Slot::Secondary, s));
        }
        slots.extend(self.overlays.iter().map(|o| (Slot::Overlay, *o)));
        slots
    }

    pub fn is_rendered(&self, id: EntryId) -> bool {
        self.primary == Some(id) || self.secondary == Some(id) || self.overlays.contains(&id)
    }
}

/// Distributes the newest pane-eligible entries over the panes in `layout`.
///
/// Single pane: the newest eligible entry takes the primary pane. Dual pane:
/// the two newest eligible entries go older-to-primary, newer-to-secondary,
/// unless the newest entry's launch screen says otherwise.
pub fn assign<F>(entries: &[BackStackEntry], layout: &PaneLayout, kind_of: F) -> PaneAssignment
where
    F: Fn(&BackStackEntry) -> NavigatorKind,
{
    let eligible: Vec<&BackStackEntry> = entries
        .iter()
        .filter(|e| kind_of(e).is_pane_eligible())
        .collect();

    let newest_pos = entries.iter().rposition(|e| kind_of(e).is_pane_eligible());
    let overlays = entries[newest_pos.map_or(0, |p| p + 1)..]
        .iter()
        .filter(|e| kind_of(e) == NavigatorKind::Overlay)
        .map(|e| e.id())
        .collect();

    let mut assignment = PaneAssignment {
        overlays,
        ..Default::default()
    };
    let Some(newest) = eligible.last() else {
        return assignment;
    };

    if !layout.is_dual() {
        assignment.primary = Some(newest.id());
        return assignment;
    }

    let older = eligible.len().checked_sub(2).map(|i| eligible[i]);
    match (newest.launch_screen(), older) {
        (LaunchScreen::Both, _) => {
            assignment.primary = Some(newest.id());
            assignment.spanned = true;
        }
        (LaunchScreen::Start, _) => assignment.primary = Some(newest.id()),
        (LaunchScreen::End, None) => assignment.secondary = Some(newest.id()),
        (LaunchScreen::Default | LaunchScreen::End, Some(older)) => {
            assignment.primary = Some(older.id());
            assignment.secondary = Some(newest.id());
        }
        (LaunchScreen::Default, None) => assignment.primary = Some(newest.id()),
    }
    assignment
}

//! # Navigators
//!
//! A navigator attaches and detaches the visual side of a destination inside
//! a host container. The controller never renders anything itself: it picks
//! an entry and a [`Slot`] and hands both to the navigator registered under
//! the destination's navigator name.
//!
//! Navigators receive entries by reference for the duration of a call. If they
//! need to remember one they keep its [`EntryId`](crate::core::entry::EntryId),
//! never the entry.

pub mod navigators;
pub mod registry;

use serde::{Deserialize, Serialize};

use crate::core::entry::BackStackEntry;
use crate::graph::{DestinationBuilder, DestinationId};
use crate::pane::PaneLayout;

pub use registry::NavigatorRegistry;

/// How a navigator's destinations take part in pane assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorKind {
    /// Renders into the primary or secondary pane.
    Host,
    /// Renders above existing content without taking a pane.
    Overlay,
    /// Never rendered.
    NoOp,
}

impl NavigatorKind {
    pub fn is_pane_eligible(self) -> bool {
        matches!(self, NavigatorKind::Host)
    }
}

/// Where an entry is being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Primary,
    Secondary,
    /// Both panes, as one surface.
    Spanned,
    Overlay,
}

/// Passed to every navigator when a controller starts.
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub graph: DestinationId,
    pub layout: PaneLayout,
}

pub trait Navigator: Send {
    fn kind(&self) -> NavigatorKind;

    /// Lets the navigator decorate destinations created through it.
    fn create_destination(&self, dest: DestinationBuilder) -> DestinationBuilder {
        dest
    }

    /// Show `entry` in `slot`. Must not fail for entries of this navigator.
    fn navigate(&mut self, entry: &BackStackEntry, slot: Slot);

    /// `entry` is leaving the stack. Returns true when the navigator already
    /// tore its view down itself, so no further render calls are sent for it.
    fn pop_back_stack(&mut self, entry: &BackStackEntry) -> bool;

    fn on_attach(&mut self, _host: &HostInfo) {}

    /// `entry` stays on the stack but is no longer shown in `slot`.
    fn hide(&mut self, _entry: &BackStackEntry, _slot: Slot) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_hosts_take_panes() {
        assert!(NavigatorKind::Host.is_pane_eligible());
        assert!(!NavigatorKind::Overlay.is_pane_eligible());
        assert!(!NavigatorKind::NoOp.is_pane_eligible());
    }
}

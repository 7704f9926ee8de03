use crate::core::entry::BackStackEntry;
use crate::navigator::{Navigator, NavigatorKind, Slot};

/// Navigator for destinations with no visual representation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn kind(&self) -> NavigatorKind {
        NavigatorKind::NoOp
    }

    fn navigate(&mut self, _entry: &BackStackEntry, _slot: Slot) {}

    fn pop_back_stack(&mut self, _entry: &BackStackEntry) -> bool {
        false
    }
}

//! Ordered history of entries. Only the controller mutates it.

use crate::core::entry::{BackStackEntry, EntryId, Lifecycle};
use crate::graph::{DestinationId, NavGraph};

#[derive(Debug, Default)]
pub struct BackStack {
    entries: Vec<BackStackEntry>,
}

impl BackStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[BackStackEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &BackStackEntry> {
        self.entries.iter()
    }

    pub fn top(&self) -> Option<&BackStackEntry> {
        self.entries.last()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut BackStackEntry> {
        self.entries.last_mut()
    }

    /// Entry directly below the top.
    pub fn previous(&self) -> Option<&BackStackEntry> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    pub fn get(&self, id: EntryId) -> Option<&BackStackEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut BackStackEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Index of the topmost entry for `destination` within the first `limit` entries.
    pub fn position_of(&self, destination: &DestinationId, limit: usize) -> Option<usize> {
        self.entries[..limit.min(self.entries.len())]
            .iter()
            .rposition(|e| e.destination == *destination)
    }

    /// Start index of the topmost contiguous run of entries nested in `graph`,
    /// looking only at the first `limit` entries.
    pub fn graph_run_start(&self, graph: &NavGraph, graph_id: &DestinationId, limit: usize) -> Option<usize> {
        let visible = &self.entries[..limit.min(self.entries.len())];
        let last = visible
            .iter()
            .rposition(|e| graph.is_within(&e.destination, graph_id))?;
        let run = visible[..=last]
            .iter()
            .rev()
            .take_while(|e| graph.is_within(&e.destination, graph_id))
            .count();
        Some(last + 1 - run)
    }

    pub(crate) fn push(&mut self, entry: BackStackEntry) {
        self.entries.push(entry);
    }

    /// Removes every entry at or above `len`, returned top first.
    pub(crate) fn truncate(&mut self, len: usize) -> Vec<BackStackEntry> {
        if len >= self.entries.len() {
            return Vec::new();
        }
        let mut removed = self.entries.split_off(len);
        removed.reverse();
        removed
    }

    /// Top entry RESUMED, everything below STARTED.
    pub(crate) fn settle(&mut self) {
        let last = self.entries.len().saturating_sub(1);
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.lifecycle = if i == last {
                Lifecycle::Resumed
            } else {
                Lifecycle::Started
            };
        }
    }

    pub fn destinations(&self) -> Vec<&DestinationId> {
        self.entries.iter().map(|e| &e.destination).collect()
    }
}

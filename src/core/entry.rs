//! Back stack entries: a live instance of a destination.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::graph::DestinationId;
use crate::graph::action::LaunchScreen;
use crate::graph::args::Args;

/// Unique id of one entry. Stable across pane flips and snapshot restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First block is plenty for log lines
        let s = self.0.to_string();
        f.write_str(s.split('-').next().unwrap_or(&s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Created,
    Started,
    Resumed,
    Destroyed,
}

/// Opaque per-entry key/value store owned by host code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedState(BTreeMap<String, serde_json::Value>);

impl SavedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[derive(Debug, Clone)]
pub struct BackStackEntry {
    pub(crate) id: EntryId,
    pub(crate) destination: DestinationId,
    pub(crate) navigator: String,
    pub(crate) args: Args,
    pub(crate) launch_screen: LaunchScreen,
    pub(crate) saved_state: SavedState,
    pub(crate) lifecycle: Lifecycle,
}

impl BackStackEntry {
    pub(crate) fn new(
        destination: DestinationId,
        navigator: impl Into<String>,
        args: Args,
        launch_screen: LaunchScreen,
    ) -> Self {
        Self {
            id: EntryId::new(),
            destination,
            navigator: navigator.into(),
            args,
            launch_screen,
            saved_state: SavedState::new(),
            lifecycle: Lifecycle::Created,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn destination(&self) -> &DestinationId {
        &self.destination
    }

    pub fn navigator(&self) -> &str {
        &self.navigator
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Launch screen resolved at navigation time (options over destination).
    pub fn launch_screen(&self) -> LaunchScreen {
        self.launch_screen
    }

    pub fn saved_state(&self) -> &SavedState {
        &self.saved_state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Moves to `Destroyed` and releases the state container.
    pub(crate) fn destroy(&mut self) {
        self.lifecycle = Lifecycle::Destroyed;
        self.saved_state.clear();
    }
}

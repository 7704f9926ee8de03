//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use crate::core::config::ControllerConfig;
use crate::core::controller::NavController;
use crate::core::entry::BackStackEntry;
use crate::graph::action::Action;
use crate::graph::args::{ArgType, Args, Argument};
use crate::graph::{DestinationBuilder, GRAPH_NAVIGATOR, NavGraph, NavGraphBuilder};
use crate::navigator::{HostInfo, Navigator, NavigatorKind, NavigatorRegistry, Slot};

/// The graph most tests run against:
///
/// ```text
/// main (start: home)            action to_home -> home
/// ├── home                      to_dashboard, to_register, to_scores, confirm
/// ├── dashboard
/// ├── register                  app://duo/users/new
/// ├── registered                up = dashboard
/// ├── confirm_exit              (dialog)
/// └── scores (start: leaderboard)
///     ├── leaderboard           show_profile -> profile { tab = "scores" }
///     └── profile               app://duo/users/{user_id}
/// ```
pub fn sample_graph() -> NavGraph {
    NavGraphBuilder::new("main", "home")
        .action("main", "to_home", Action::new("home"))
        .destination(
            "main",
            DestinationBuilder::new("home", "host")
                .label("Home")
                .action("to_dashboard", Action::new("dashboard"))
                .action("to_register", Action::new("register"))
                .action("to_scores", Action::new("scores"))
                .action("confirm", Action::new("confirm_exit")),
        )
        .destination("main", DestinationBuilder::new("dashboard", "host"))
        .destination(
            "main",
            DestinationBuilder::new("register", "host").deep_link("app://duo/users/new"),
        )
        .destination("main", DestinationBuilder::new("registered", "host").up("dashboard"))
        .destination("main", DestinationBuilder::new("confirm_exit", "dialog"))
        .graph("main", DestinationBuilder::new("scores", GRAPH_NAVIGATOR), "leaderboard")
        .destination(
            "scores",
            DestinationBuilder::new("leaderboard", "host").action(
                "show_profile",
                Action::new("profile").with_args(Args::new().with("tab", "scores")),
            ),
        )
        .destination(
            "scores",
            DestinationBuilder::new("profile", "host")
                .argument("user_id", Argument::new(ArgType::Str))
                .argument("tab", Argument::with_default(ArgType::Str, "overview"))
                .deep_link("app://duo/users/{user_id}"),
        )
        .build()
        .expect("sample graph is valid")
}

/// One navigator call, by destination id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String, Slot),
    Pop(String),
    Hide(String, Slot),
    Attach(String),
}

/// Shared call log; clones see the same calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    /// Returns and clears everything recorded so far.
    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Navigator that records every call it receives.
pub struct RecordingNavigator {
    kind: NavigatorKind,
    log: CallLog,
}

impl RecordingNavigator {
    pub fn host() -> (Self, CallLog) {
        let log = CallLog::default();
        (Self::with_log(NavigatorKind::Host, log.clone()), log)
    }

    pub fn with_log(kind: NavigatorKind, log: CallLog) -> Self {
        Self { kind, log }
    }
}

impl Navigator for RecordingNavigator {
    fn kind(&self) -> NavigatorKind {
        self.kind
    }

    fn navigate(&mut self, entry: &BackStackEntry, slot: Slot) {
        self.log.push(Call::Navigate(entry.destination().to_string(), slot));
    }

    fn pop_back_stack(&mut self, entry: &BackStackEntry) -> bool {
        self.log.push(Call::Pop(entry.destination().to_string()));
        self.kind == NavigatorKind::Overlay
    }

    fn on_attach(&mut self, host: &HostInfo) {
        self.log.push(Call::Attach(host.graph.to_string()));
    }

    fn hide(&mut self, entry: &BackStackEntry, slot: Slot) {
        self.log.push(Call::Hide(entry.destination().to_string(), slot));
    }
}

/// A controller over [`sample_graph`] with recording "host" and "dialog"
/// navigators sharing one log.
pub fn test_controller() -> (NavController, CallLog) {
    test_controller_with(ControllerConfig::default())
}

pub fn test_controller_with(config: ControllerConfig) -> (NavController, CallLog) {
    let log = CallLog::default();
    let mut registry = NavigatorRegistry::new();
    registry
        .register("host", RecordingNavigator::with_log(NavigatorKind::Host, log.clone()))
        .unwrap();
    registry
        .register("dialog", RecordingNavigator::with_log(NavigatorKind::Overlay, log.clone()))
        .unwrap();
    (NavController::new(sample_graph(), registry, config), log)
}

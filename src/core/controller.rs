//! # Navigation Controller
//!
//! Single authority over the back stack. Every public operation follows the
//! same shape:
//!
//! ```text
//!   resolve (read-only, may fail) ──▶ commit ──▶ settle ──▶ drain queue ──▶ pump layouts
//!                                      │           │
//!                         navigators.pop_back_stack │
//!                                      coordinator.reconcile + listeners
//! ```
//!
//! Nothing is mutated until resolution has fully succeeded, so a failed call
//! leaves the stack exactly as it was. Listener failures are the exception:
//! listeners run after the commit and their error is reported with the stack
//! already changed.

use std::collections::{HashSet, VecDeque};

use chrono::Utc;
use log::{debug, info, warn};

use crate::core::back_stack::BackStack;
use crate::core::command::{Command, DestinationChanged, ListenerId, NavQueue, NavTarget};
use crate::core::config::{ControllerConfig, ExitPolicy};
use crate::core::entry::{BackStackEntry, EntryId, SavedState};
use crate::core::snapshot::{SNAPSHOT_VERSION, Snapshot, SnapshotEntry};
use crate::error::{ListenerError, NavError, NavResult};
use crate::graph::action::{Action, LaunchScreen};
use crate::graph::args::{Args, with_defaults};
use crate::graph::{Destination, DestinationId, NavGraph, NavOptions, PopUpTo};
use crate::navigator::{HostInfo, NavigatorRegistry};
use crate::pane::{DualPaneCoordinator, LayoutReceiver, LayoutSender, PaneAssignment, PaneLayout, layout_channel};

/// Longest chain of listener-queued commands one public call will run.
pub const MAX_QUEUED_COMMANDS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, not started.
    Idle,
    /// Top entry RESUMED, the rest STARTED.
    Settled,
    /// Inside a mutation. Never observable from outside.
    Transitioning,
    /// The last entry was popped under `ExitPolicy::ExitHost`.
    Finished,
}

type Listener = Box<dyn FnMut(DestinationChanged<'_>, &mut NavQueue) -> Result<(), ListenerError> + Send>;
type ExitHandler = Box<dyn FnMut() + Send>;

/// Fully resolved navigate request.
struct NavPlan {
    /// Stack length to truncate to before pushing.
    keep: usize,
    entry: BackStackEntry,
    /// singleTop hit: update the entry at `keep - 1` instead of pushing.
    reuse_top: bool,
}

pub struct NavController {
    graph: NavGraph,
    navigators: NavigatorRegistry,
    stack: BackStack,
    coordinator: DualPaneCoordinator,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    pending: VecDeque<Command>,
    state: EngineState,
    config: ControllerConfig,
    layout_tx: LayoutSender,
    layout_rx: LayoutReceiver,
    /// The host has delivered at least one layout signal.
    layout_reported: bool,
    on_exit: Option<ExitHandler>,
}

impl NavController {
    pub fn new(graph: NavGraph, navigators: NavigatorRegistry, config: ControllerConfig) -> Self {
        let (layout_tx, layout_rx) = layout_channel(config.layout_queue_capacity);
        Self {
            graph,
            navigators,
            stack: BackStack::new(),
            coordinator: DualPaneCoordinator::default(),
            listeners: Vec::new(),
            next_listener: 0,
            pending: VecDeque::new(),
            state: EngineState::Idle,
            config,
            layout_tx,
            layout_rx,
            layout_reported: false,
            on_exit: None,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn navigators(&self) -> &NavigatorRegistry {
        &self.navigators
    }

    /// Registering navigators after `start` is fine; replacing one that
    /// renders live entries is the caller's responsibility.
    pub fn navigators_mut(&mut self) -> &mut NavigatorRegistry {
        &mut self.navigators
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn back_stack(&self) -> &BackStack {
        &self.stack
    }

    pub fn current_entry(&self) -> Option<&BackStackEntry> {
        self.stack.top()
    }

    pub fn current_destination(&self) -> Option<&Destination> {
        self.stack.top().and_then(|e| self.graph.get(&e.destination))
    }

    pub fn previous_entry(&self) -> Option<&BackStackEntry> {
        self.stack.previous()
    }

    /// Topmost entry for `destination`.
    pub fn back_stack_entry(&self, destination: &DestinationId) -> NavResult<&BackStackEntry> {
        self.stack
            .position_of(destination, self.stack.len())
            .map(|i| &self.stack.entries()[i])
            .ok_or_else(|| NavError::DestinationNotOnStack(destination.clone()))
    }

    pub fn saved_state_mut(&mut self, entry: EntryId) -> Option<&mut SavedState> {
        self.stack.get_mut(entry).map(|e| &mut e.saved_state)
    }

    pub fn pane_assignment(&self) -> &PaneAssignment {
        self.coordinator.assignment()
    }

    pub fn layout(&self) -> &PaneLayout {
        self.coordinator.layout()
    }

    /// Sender for the host's window observer.
    pub fn layout_sender(&self) -> LayoutSender {
        self.layout_tx.clone()
    }

    pub fn set_exit_handler<F>(&mut self, handler: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_exit = Some(Box::new(handler));
    }

    // ========================================================================
    // Start / restore
    // ========================================================================

    /// Pushes the root graph's start destination.
    pub fn start(&mut self) -> NavResult<()> {
        if !self.ready_to_start()? {
            return Ok(());
        }
        self.check_navigators()?;
        let entry = self.new_entry(self.graph.start_leaf(self.graph.root()), &Args::new(), None)?;
        info!("Starting {} at {}", self.graph.id(), entry.destination);
        self.begin(vec![entry])
    }

    /// Starts at the destination a deep link resolves to, with a synthetic
    /// stack underneath: the start destination of every enclosing graph that
    /// does not already start at the target.
    pub fn start_with_deep_link(&mut self, route: &str) -> NavResult<()> {
        if !self.ready_to_start()? {
            return Ok(());
        }
        self.check_navigators()?;
        let matched = self
            .graph
            .resolve_deep_link(route)
            .ok_or_else(|| NavError::InvalidDestination {
                target: route.to_string(),
                from: self.graph.id().to_string(),
            })?;
        let target = self.graph.start_leaf(matched.destination);

        let mut parents: Vec<&Destination> = self.graph.ancestors(target).collect();
        parents.reverse();
        let mut entries: Vec<BackStackEntry> = Vec::new();
        for graph in parents {
            let start = self.graph.start_leaf(graph);
            let duplicate = entries.last().is_some_and(|e| e.destination == start.id);
            if start.id != target.id && !duplicate {
                entries.push(self.new_entry(start, &Args::new(), None)?);
            }
        }
        entries.push(self.new_entry(target, &matched.args, None)?);

        info!(
            "Starting {} from deep link {} ({} entries)",
            self.graph.id(),
            matched.pattern,
            entries.len()
        );
        self.begin(entries)
    }

    /// Rebuilds the stack from a snapshot, replacing whatever is there. The
    /// snapshot's pane layout is only used when the host has not reported one
    /// to this controller yet.
    pub fn restore(&mut self, snapshot: &Snapshot) -> NavResult<()> {
        if snapshot.graph_id != *self.graph.id() {
            return Err(NavError::GraphMismatch {
                snapshot: snapshot.graph_id.clone(),
                loaded: self.graph.id().clone(),
            });
        }
        self.check_navigators()?;

        let mut entries = Vec::with_capacity(snapshot.entries.len());
        let mut seen = HashSet::with_capacity(snapshot.entries.len());
        for saved in &snapshot.entries {
            if !seen.insert(saved.id) {
                return Err(NavError::DuplicateEntry(saved.id));
            }
            let dest = self
                .graph
                .get(&saved.destination)
                .filter(|d| !d.is_graph())
                .ok_or_else(|| NavError::UnknownDestination(saved.destination.clone()))?;
            let mut entry = self.new_entry(dest, &saved.args, Some(saved.launch_screen))?;
            entry.id = saved.id;
            entry.saved_state = saved.saved_state.clone();
            entries.push(entry);
        }
        if entries.is_empty() {
            info!("Snapshot of {} is empty, starting fresh", snapshot.graph_id);
            entries.push(self.new_entry(self.graph.start_leaf(self.graph.root()), &Args::new(), None)?);
        }

        self.state = EngineState::Transitioning;
        self.dispose(0, None);
        self.coordinator.reset();
        if self.layout_reported {
            debug!("Keeping host layout, ignoring layout stored in snapshot");
        } else {
            self.coordinator.set_layout(snapshot.layout.clone());
        }
        info!(
            "Restoring {} entries of {} captured at {}",
            entries.len(),
            snapshot.graph_id,
            snapshot.captured_at.to_rfc3339()
        );
        self.begin(entries)
    }

    /// Logical copy of the current state.
    pub fn capture(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            graph_id: self.graph.id().clone(),
            captured_at: Utc::now(),
            entries: self
                .stack
                .iter()
                .map(|e| SnapshotEntry {
                    id: e.id,
                    destination: e.destination.clone(),
                    args: e.args.clone(),
                    launch_screen: e.launch_screen,
                    saved_state: e.saved_state.clone(),
                })
                .collect(),
            layout: self.coordinator.layout().clone(),
        }
    }

    fn ready_to_start(&self) -> NavResult<bool> {
        match self.state {
            EngineState::Idle => Ok(true),
            EngineState::Finished => Err(NavError::NotActive),
            EngineState::Settled | EngineState::Transitioning => {
                warn!("Controller already started, ignoring start request");
                Ok(false)
            }
        }
    }

    /// Every leaf must have a registered navigator before anything is shown.
    fn check_navigators(&self) -> NavResult<()> {
        for dest in self.graph.iter().filter(|d| !d.is_graph()) {
            self.navigators.get(&dest.navigator)?;
        }
        Ok(())
    }

    fn begin(&mut self, entries: Vec<BackStackEntry>) -> NavResult<()> {
        self.navigators.attach_all(&HostInfo {
            graph: self.graph.id().clone(),
            layout: self.coordinator.layout().clone(),
        });
        for entry in entries {
            self.stack.push(entry);
        }
        let settled = self.settle().map(|()| true);
        self.complete(settled).map(|_| ())
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn navigate(&mut self, target: NavTarget, args: Args, options: Option<NavOptions>) -> NavResult<()> {
        self.run(Command::Navigate { target, args, options }).map(|_| ())
    }

    /// Shorthand for navigating to a destination id with no arguments.
    pub fn navigate_to(&mut self, destination: impl Into<DestinationId>) -> NavResult<()> {
        self.navigate(NavTarget::Destination(destination.into()), Args::new(), None)
    }

    /// Pops the top entry. Returns false when nothing was popped.
    pub fn pop_back_stack(&mut self) -> NavResult<bool> {
        self.run(Command::PopBackStack {
            destination: None,
            inclusive: false,
        })
    }

    /// Pops every entry above the topmost `destination`, and that entry too
    /// when `inclusive`.
    pub fn pop_back_stack_to(&mut self, destination: impl Into<DestinationId>, inclusive: bool) -> NavResult<bool> {
        self.run(Command::PopBackStack {
            destination: Some(destination.into()),
            inclusive,
        })
    }

    pub fn navigate_up(&mut self) -> NavResult<bool> {
        self.run(Command::NavigateUp)
    }

    /// The host already removed `entry` (e.g. a back gesture). Entries above
    /// it are popped normally; its own navigator is not asked again.
    pub fn on_host_popped(&mut self, entry: EntryId) -> NavResult<bool> {
        self.ensure_settled()?;
        let Some(index) = self.stack.index_of(entry) else {
            warn!("Host popped entry {entry} which is not on the back stack");
            return Ok(false);
        };
        if index == 0 {
            return match self.config.exit_policy {
                ExitPolicy::ExitHost => {
                    self.finish(Some(entry));
                    Ok(true)
                }
                ExitPolicy::Refuse => {
                    warn!("Host popped the root entry {entry}; keeping it");
                    Ok(false)
                }
            };
        }
        debug!("Host popped {entry}");
        self.state = EngineState::Transitioning;
        self.dispose(index, Some(entry));
        let settled = self.settle().map(|()| true);
        self.complete(settled)
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Registers a listener and immediately calls it with the current
    /// destination when the controller is running.
    pub fn add_on_destination_changed_listener<F>(&mut self, listener: F) -> NavResult<ListenerId>
    where
        F: FnMut(DestinationChanged<'_>, &mut NavQueue) -> Result<(), ListenerError> + Send + 'static,
    {
        let mut listener: Listener = Box::new(listener);
        if self.state == EngineState::Settled
            && let Some(entry) = self.stack.top()
            && let Some(destination) = self.graph.get(&entry.destination)
        {
            let mut queue = NavQueue::new();
            listener(
                DestinationChanged {
                    destination,
                    args: &entry.args,
                    entry: entry.id,
                },
                &mut queue,
            )
            .map_err(NavError::Listener)?;
            self.pending.extend(queue.drain());
        }

        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        self.complete(Ok(true)).map(|_| id)
    }

    pub fn remove_on_destination_changed_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        before != self.listeners.len()
    }

    // ========================================================================
    // Pane layout
    // ========================================================================

    /// Applies a layout signal directly. Before `start` it is only recorded.
    pub fn layout_changed(&mut self, layout: PaneLayout) -> NavResult<bool> {
        self.layout_reported = true;
        if !self.coordinator.set_layout(layout) || self.state != EngineState::Settled {
            return Ok(false);
        }
        self.coordinator.reconcile(&self.stack, &mut self.navigators)
    }

    /// Applies the newest queued layout signal, if any.
    pub fn pump_layout_events(&mut self) -> NavResult<bool> {
        match self.layout_rx.drain_latest() {
            Some(layout) => self.layout_changed(layout),
            None => Ok(false),
        }
    }

    /// Waits for the next layout signal and applies it (collapsing any burst).
    pub async fn wait_for_layout(&mut self) -> NavResult<bool> {
        match self.layout_rx.recv_latest().await {
            Some(layout) => self.layout_changed(layout),
            None => Ok(false),
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_settled(&self) -> NavResult<()> {
        match self.state {
            EngineState::Settled => Ok(()),
            _ => Err(NavError::NotActive),
        }
    }

    fn run(&mut self, command: Command) -> NavResult<bool> {
        self.ensure_settled()?;
        let result = self.execute(command);
        self.complete(result)
    }

    /// Runs queued listener commands, then queued layout signals.
    fn complete(&mut self, result: NavResult<bool>) -> NavResult<bool> {
        let result = result.and_then(|changed| self.drain_pending().map(|()| changed));
        if result.is_err() {
            self.pending.clear();
        }
        let pumped = self.pump_layout_events();
        let changed = result?;
        pumped?;
        Ok(changed)
    }

    fn drain_pending(&mut self) -> NavResult<()> {
        let mut executed = 0;
        while let Some(command) = self.pending.pop_front() {
            if self.state != EngineState::Settled {
                debug!("Controller no longer active, dropping {} queued commands", self.pending.len() + 1);
                self.pending.clear();
                break;
            }
            executed += 1;
            if executed > MAX_QUEUED_COMMANDS {
                return Err(NavError::QueueOverflow {
                    max: MAX_QUEUED_COMMANDS,
                });
            }
            debug!("Running queued {:?}", command);
            self.execute(command)?;
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) -> NavResult<bool> {
        match command {
            Command::Navigate { target, args, options } => {
                let plan = self.plan_navigate(&target, args, options)?;
                self.apply(plan)?;
                Ok(true)
            }
            Command::PopBackStack { destination, inclusive } => {
                let keep = match destination {
                    None => self.stack.len().saturating_sub(1),
                    Some(id) => {
                        let pop = PopUpTo {
                            destination: id,
                            inclusive,
                        };
                        self.pop_up_to_len(&pop, self.stack.len())
                            .ok_or(NavError::DestinationNotOnStack(pop.destination))?
                    }
                };
                self.pop_to(keep)
            }
            Command::NavigateUp => self.navigate_up_inner(),
        }
    }

    fn plan_navigate(&self, target: &NavTarget, args: Args, options: Option<NavOptions>) -> NavResult<NavPlan> {
        let top = self.stack.top().ok_or(NavError::NotActive)?;
        let invalid = || NavError::InvalidDestination {
            target: target.describe(),
            from: top.destination.to_string(),
        };

        let mut keep = self.stack.len();
        let (dest, supplied, options) = match target {
            NavTarget::Destination(id) => {
                let dest = self
                    .graph
                    .find_destination(&top.destination, id)
                    .map_err(|_| invalid())?;
                (dest, args, options.unwrap_or_default())
            }
            NavTarget::Action(action_id) => {
                let (source, action) = self.find_action(action_id).ok_or_else(invalid)?;
                keep = source + 1;
                let from = &self.stack.entries()[source].destination;
                let dest = self
                    .graph
                    .find_destination(from, &action.target)
                    .map_err(|_| invalid())?;
                let mut merged = action.args.clone();
                merged.merge(&args);
                (dest, merged, options.unwrap_or_else(|| action.options.clone()))
            }
            NavTarget::Route(route) => {
                let matched = self.graph.resolve_deep_link(route).ok_or_else(invalid)?;
                let mut merged = matched.args;
                merged.merge(&args);
                (matched.destination, merged, options.unwrap_or_default())
            }
        };
        self.plan_for(dest, &supplied, &options, keep)
    }

    fn plan_for(&self, dest: &Destination, args: &Args, options: &NavOptions, mut keep: usize) -> NavResult<NavPlan> {
        let leaf = self.graph.start_leaf(dest);
        let entry = self.new_entry(leaf, args, options.launch_screen)?;

        if let Some(pop) = &options.pop_up_to {
            match self.pop_up_to_len(pop, keep) {
                Some(len) => keep = len,
                None => warn!(
                    "popUpTo {} is not on the back stack, navigating to {} without popping",
                    pop.destination, leaf.id
                ),
            }
        }
        let reuse_top = options.single_top
            && keep > 0
            && self.stack.entries()[keep - 1].destination == leaf.id;

        Ok(NavPlan { keep, entry, reuse_top })
    }

    /// Looks an action up on the top entry. In dual-pane mode, falls back to
    /// the entry shown in the primary pane. Returns the index of the entry
    /// the action was found on.
    fn find_action(&self, action_id: &str) -> Option<(usize, Action)> {
        let top_index = self.stack.len().checked_sub(1)?;
        let top = &self.stack.entries()[top_index];
        if let Some(action) = self.graph.find_action(&top.destination, action_id) {
            return Some((top_index, action.clone()));
        }

        if self.coordinator.layout().is_dual()
            && let Some(primary) = self.coordinator.assignment().primary
            && let Some(index) = self.stack.index_of(primary)
            && index != top_index
        {
            let entry = &self.stack.entries()[index];
            if let Some(action) = self.graph.find_action(&entry.destination, action_id) {
                debug!("Action {action_id} resolved against primary pane entry {}", entry.destination);
                return Some((index, action.clone()));
            }
        }
        None
    }

    /// Stack length after popping up to `pop`, looking at the first `limit`
    /// entries. `None` when the target is not on the stack.
    fn pop_up_to_len(&self, pop: &PopUpTo, limit: usize) -> Option<usize> {
        let target = self.graph.get(&pop.destination)?;
        if target.is_graph() {
            if target.id == *self.graph.id() {
                return Some(0);
            }
            return self.stack.graph_run_start(&self.graph, &pop.destination, limit);
        }
        let index = self.stack.position_of(&pop.destination, limit)?;
        Some(if pop.inclusive { index } else { index + 1 })
    }

    fn new_entry(&self, dest: &Destination, args: &Args, launch: Option<LaunchScreen>) -> NavResult<BackStackEntry> {
        self.navigators.get(&dest.navigator)?;
        let args = with_defaults(&dest.id, &dest.arguments, args)?;
        Ok(BackStackEntry::new(
            dest.id.clone(),
            dest.navigator.clone(),
            args,
            launch.unwrap_or(dest.launch_screen),
        ))
    }

    fn apply(&mut self, plan: NavPlan) -> NavResult<()> {
        self.state = EngineState::Transitioning;
        self.dispose(plan.keep, None);
        if plan.reuse_top
            && let Some(top) = self.stack.top_mut()
        {
            debug!("singleTop: updating {} ({}) in place", top.destination, top.id);
            top.args = plan.entry.args;
            top.launch_screen = plan.entry.launch_screen;
            let id = top.id;
            self.coordinator.invalidate(id);
        } else {
            debug!("Push {} ({})", plan.entry.destination, plan.entry.id);
            self.stack.push(plan.entry);
        }
        self.settle()
    }

    fn pop_to(&mut self, keep: usize) -> NavResult<bool> {
        if keep >= self.stack.len() {
            return Ok(false);
        }
        if keep == 0 {
            return Ok(self.exit_or_refuse());
        }
        self.state = EngineState::Transitioning;
        self.dispose(keep, None);
        self.settle()?;
        Ok(true)
    }

    fn navigate_up_inner(&mut self) -> NavResult<bool> {
        let top = self.stack.top().ok_or(NavError::NotActive)?;
        let current = self
            .graph
            .get(&top.destination)
            .ok_or_else(|| NavError::UnknownDestination(top.destination.clone()))?;
        let replace_current = NavOptions::new().pop_up_to(current.id.clone(), true);

        if let Some(up) = &current.up {
            if let Some(index) = self.stack.position_of(up, self.stack.len() - 1) {
                return self.pop_to(index + 1);
            }
            let up_dest = self
                .graph
                .get(up)
                .ok_or_else(|| NavError::DestinationNotFound(up.clone()))?;
            let plan = self.plan_for(up_dest, &Args::new(), &replace_current, self.stack.len())?;
            self.apply(plan)?;
            return Ok(true);
        }

        if self.stack.len() > 1 {
            return self.pop_to(self.stack.len() - 1);
        }

        // Single entry (a deep-link entry point): go to the start of the
        // closest enclosing graph that does not start here.
        let fallback = self
            .graph
            .ancestors(current)
            .map(|g| self.graph.start_leaf(g))
            .find(|leaf| leaf.id != current.id);
        match fallback {
            Some(start) => {
                let plan = self.plan_for(start, &Args::new(), &replace_current, self.stack.len())?;
                self.apply(plan)?;
                Ok(true)
            }
            None => Ok(self.exit_or_refuse()),
        }
    }

    /// Terminal pop. Returns whether anything happened.
    fn exit_or_refuse(&mut self) -> bool {
        match self.config.exit_policy {
            ExitPolicy::Refuse => {
                debug!("Refusing to pop the last entry");
                false
            }
            ExitPolicy::ExitHost => {
                self.finish(None);
                true
            }
        }
    }

    fn finish(&mut self, already_popped: Option<EntryId>) {
        info!("Back stack exhausted, exiting host");
        self.state = EngineState::Transitioning;
        self.dispose(0, already_popped);
        self.coordinator.reset();
        self.pending.clear();
        self.state = EngineState::Finished;
        if let Some(handler) = self.on_exit.as_mut() {
            handler();
        }
    }

    /// Removes every entry at or above `keep`, top first, telling each
    /// navigator except for `skip`'s.
    fn dispose(&mut self, keep: usize, skip: Option<EntryId>) {
        for mut entry in self.stack.truncate(keep) {
            if Some(entry.id) != skip
                && let Ok(navigator) = self.navigators.get_mut(&entry.navigator)
            {
                let handled = navigator.pop_back_stack(&entry);
                debug!(
                    "Pop {} ({}){}",
                    entry.destination,
                    entry.id,
                    if handled { ", handled by navigator" } else { "" }
                );
            }
            entry.destroy();
        }
    }

    /// Fixes lifecycles, re-renders panes and notifies listeners.
    fn settle(&mut self) -> NavResult<()> {
        self.stack.settle();
        self.state = EngineState::Settled;
        debug!(
            "Stack: [{}]",
            self.stack
                .iter()
                .map(|e| e.destination.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.coordinator.reconcile(&self.stack, &mut self.navigators)?;
        self.notify_listeners()
    }

    fn notify_listeners(&mut self) -> NavResult<()> {
        let Some(entry) = self.stack.top() else {
            return Ok(());
        };
        let Some(destination) = self.graph.get(&entry.destination) else {
            return Ok(());
        };
        let change = DestinationChanged {
            destination,
            args: &entry.args,
            entry: entry.id,
        };
        let mut queue = NavQueue::new();
        for (_, listener) in self.listeners.iter_mut() {
            listener(change, &mut queue).map_err(NavError::Listener)?;
        }
        self.pending.extend(queue.drain());
        Ok(())
    }
}

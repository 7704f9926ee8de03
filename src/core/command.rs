//! Navigation requests and the queue listeners use to issue them.
//!
//! Listeners run while the controller is still finishing a mutation, so they
//! cannot call back into it. Instead they get a [`NavQueue`]; whatever they
//! push there runs in FIFO order once the current operation has settled.

use crate::core::entry::EntryId;
use crate::graph::args::Args;
use crate::graph::{Destination, DestinationId, NavOptions};

/// What to navigate to.
#[derive(Debug, Clone, PartialEq)]
pub enum NavTarget {
    Destination(DestinationId),
    /// An action id on the current destination or one of its graphs.
    Action(String),
    /// A deep-link route.
    Route(String),
}

impl NavTarget {
    pub fn destination(id: impl Into<DestinationId>) -> Self {
        NavTarget::Destination(id.into())
    }

    pub fn action(id: impl Into<String>) -> Self {
        NavTarget::Action(id.into())
    }

    pub fn route(route: impl Into<String>) -> Self {
        NavTarget::Route(route.into())
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            NavTarget::Destination(id) => id.to_string(),
            NavTarget::Action(id) => format!("action {id}"),
            NavTarget::Route(route) => route.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Navigate {
        target: NavTarget,
        args: Args,
        /// `None` falls back to the action's own options.
        options: Option<NavOptions>,
    },
    PopBackStack {
        destination: Option<DestinationId>,
        inclusive: bool,
    },
    NavigateUp,
}

/// Commands queued by listeners.
#[derive(Debug, Default)]
pub struct NavQueue {
    commands: Vec<Command>,
}

impl NavQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn navigate(&mut self, target: NavTarget, args: Args, options: Option<NavOptions>) {
        self.push(Command::Navigate { target, args, options });
    }

    pub fn pop_back_stack(&mut self, destination: Option<DestinationId>, inclusive: bool) {
        self.push(Command::PopBackStack { destination, inclusive });
    }

    pub fn navigate_up(&mut self) {
        self.push(Command::NavigateUp);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.commands.drain(..)
    }
}

/// Passed to listeners after each committed change.
#[derive(Debug, Clone, Copy)]
pub struct DestinationChanged<'a> {
    pub destination: &'a Destination,
    pub args: &'a Args,
    pub entry: EntryId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_keeps_order() {
        let mut queue = NavQueue::new();
        queue.navigate(NavTarget::destination("dashboard"), Args::new(), None);
        queue.navigate_up();
        queue.pop_back_stack(Some("home".into()), false);
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[1], Command::NavigateUp);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_describe_target() {
        assert_eq!(NavTarget::action("go").describe(), "action go");
        assert_eq!(NavTarget::route("app://x").describe(), "app://x");
    }
}

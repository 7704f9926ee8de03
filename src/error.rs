//! # Errors
//!
//! Every failure the navigation core can report. All of them surface
//! synchronously to the caller of the operation that triggered them.
//!
//! Stack mutation is all-or-nothing: anything in the resolution phase
//! (`InvalidDestination`, `InvalidArgument`, `NavigatorNotFound`, ...) aborts
//! before an entry is pushed or popped. `Listener` is the one exception, since
//! listeners only run after the mutation has been committed.

use thiserror::Error;

use crate::core::entry::EntryId;
use crate::graph::DestinationId;

/// Error type returned by listeners. Boxed so host code can use any error.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum NavError {
    /// The id, action or route does not resolve within the reachable graph scope.
    #[error("cannot resolve navigation target {target} from {from}")]
    InvalidDestination { target: String, from: String },

    /// A graph lookup found no destination with this id in scope.
    #[error("destination {0} not found")]
    DestinationNotFound(DestinationId),

    /// A pop target is not on the current back stack.
    #[error("destination {0} is not on the back stack")]
    DestinationNotOnStack(DestinationId),

    #[error("a navigator named \"{0}\" is already registered")]
    DuplicateNavigator(String),

    #[error("no navigator named \"{0}\" is registered")]
    NavigatorNotFound(String),

    /// Snapshot was captured against a different graph.
    #[error("snapshot graph {snapshot} does not match loaded graph {loaded}")]
    GraphMismatch {
        snapshot: DestinationId,
        loaded: DestinationId,
    },

    /// Snapshot references a destination that no longer exists.
    #[error("snapshot references unknown destination {0}")]
    UnknownDestination(DestinationId),

    /// Snapshot lists the same entry id twice.
    #[error("snapshot lists entry {0} more than once")]
    DuplicateEntry(EntryId),

    /// The graph failed validation when it was built.
    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    /// An argument does not match the type its destination declares.
    #[error("argument '{name}' of {destination} must be {expected}")]
    InvalidArgument {
        destination: DestinationId,
        name: String,
        expected: &'static str,
    },

    /// The controller has not been started, or has exited.
    #[error("navigation controller is not active")]
    NotActive,

    /// A destination-changed listener failed.
    #[error("destination listener failed: {0}")]
    Listener(#[source] ListenerError),

    /// Listeners kept queueing navigation past the allowed chain length.
    #[error("listener-triggered navigation exceeded {max} chained commands")]
    QueueOverflow { max: usize },
}

impl NavError {
    /// True for errors caused by the graph or snapshot the host supplied,
    /// as opposed to a bad runtime request.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NavError::MalformedGraph(_)
                | NavError::DuplicateNavigator(_)
                | NavError::NavigatorNotFound(_)
                | NavError::GraphMismatch { .. }
                | NavError::UnknownDestination(_)
                | NavError::DuplicateEntry(_)
        )
    }
}

pub type NavResult<T> = Result<T, NavError>;

//! duonav: a destination-graph navigation controller that can spread its
//! back stack over one or two panes.

pub mod core;
pub mod error;
pub mod graph;
pub mod navigator;
pub mod pane;
pub mod replay;

#[cfg(test)]
pub mod test_support;

pub use crate::core::{EngineState, NavController, NavTarget};
pub use error::{NavError, NavResult};
pub use graph::{DestinationBuilder, DestinationId, NavGraph, NavGraphBuilder, NavOptions};

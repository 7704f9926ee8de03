//! # Destination Graph
//!
//! Immutable-after-build model of navigable nodes and the actions between
//! them. Nested graphs form a tree stored in an arena:
//!
//! ```text
//! NavGraph
//! ├── nodes: Vec<Destination>      // index 0 is the root graph
//! │     ├── parent: Option<NodeIndex>    (non-owning back-reference)
//! │     └── kind: Graph { children }     (owning child list)
//! ├── index: HashMap<DestinationId, NodeIndex>
//! └── deep links, in registration order
//! ```
//!
//! Ids are unique across the whole tree, which also makes them unique within
//! any graph and its ancestors. Build with [`NavGraphBuilder`] or
//! [`inflater::inflate`].

pub mod action;
pub mod args;
pub mod builder;
pub mod deep_link;
pub mod inflater;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};
use action::{Action, LaunchScreen};
use args::{Args, Argument};
use deep_link::{DeepLink, better};

pub use action::{NavOptions, PopUpTo};
pub use builder::{DestinationBuilder, NavGraphBuilder};

/// Stable destination id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DestinationId(String);

impl DestinationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DestinationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DestinationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&DestinationId> for DestinationId {
    fn from(id: &DestinationId) -> Self {
        id.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Leaf,
    Graph {
        start: DestinationId,
        children: Vec<NodeIndex>,
    },
}

/// A navigable node. Graphs are destinations too.
#[derive(Debug, Clone)]
pub struct Destination {
    pub(crate) id: DestinationId,
    pub(crate) navigator: String,
    pub(crate) label: Option<String>,
    pub(crate) arguments: BTreeMap<String, Argument>,
    pub(crate) actions: BTreeMap<String, Action>,
    pub(crate) deep_links: Vec<DeepLink>,
    pub(crate) launch_screen: LaunchScreen,
    pub(crate) up: Option<DestinationId>,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) kind: NodeKind,
}

impl Destination {
    pub fn id(&self) -> &DestinationId {
        &self.id
    }

    /// Name of the navigator capability that renders this destination.
    pub fn navigator(&self) -> &str {
        &self.navigator
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn arguments(&self) -> &BTreeMap<String, Argument> {
        &self.arguments
    }

    pub fn action(&self, action_id: &str) -> Option<&Action> {
        self.actions.get(action_id)
    }

    pub fn launch_screen(&self) -> LaunchScreen {
        self.launch_screen
    }

    /// Explicit "up" target, when it differs from "back".
    pub fn up(&self) -> Option<&DestinationId> {
        self.up.as_ref()
    }

    pub fn is_graph(&self) -> bool {
        matches!(self.kind, NodeKind::Graph { .. })
    }

    /// Start destination id when this node is a graph.
    pub fn start(&self) -> Option<&DestinationId> {
        match &self.kind {
            NodeKind::Graph { start, .. } => Some(start),
            NodeKind::Leaf => None,
        }
    }

    pub fn deep_link_patterns(&self) -> impl Iterator<Item = &str> {
        self.deep_links.iter().map(|d| d.pattern.as_str())
    }
}

/// Result of a successful deep-link resolution.
#[derive(Debug, Clone)]
pub struct DeepLinkMatch<'g> {
    pub destination: &'g Destination,
    pub args: Args,
    pub pattern: &'g str,
}

#[derive(Debug, Clone)]
pub struct NavGraph {
    pub(crate) nodes: Vec<Destination>,
    pub(crate) index: HashMap<DestinationId, NodeIndex>,
}

pub const GRAPH_NAVIGATOR: &str = "graph";

impl NavGraph {
    pub(crate) const ROOT: NodeIndex = NodeIndex(0);

    /// Root graph id; snapshots are keyed by it.
    pub fn id(&self) -> &DestinationId {
        &self.root().id
    }

    pub fn root(&self) -> &Destination {
        &self.nodes[Self::ROOT.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.nodes.iter()
    }

    /// Looks an id up anywhere in the tree.
    pub fn get(&self, id: &DestinationId) -> Option<&Destination> {
        self.index.get(id).map(|i| &self.nodes[i.0])
    }

    pub fn parent(&self, dest: &Destination) -> Option<&Destination> {
        dest.parent.map(|p| &self.nodes[p.0])
    }

    /// Parent graphs from the closest outwards.
    pub fn ancestors<'g>(&'g self, dest: &'g Destination) -> impl Iterator<Item = &'g Destination> + 'g {
        std::iter::successors(self.parent(dest), move |d| self.parent(d))
    }

    /// True when `id` is `graph` itself or nested anywhere below it.
    pub fn is_within(&self, id: &DestinationId, graph: &DestinationId) -> bool {
        let Some(dest) = self.get(id) else {
            return false;
        };
        dest.id == *graph || self.ancestors(dest).any(|a| a.id == *graph)
    }

    /// Finds `id` from `scope`: the scope's own graph (the scope itself when it
    /// is a graph, else its parent), then each ancestor graph in turn.
    pub fn find_destination(&self, scope: &DestinationId, id: &DestinationId) -> NavResult<&Destination> {
        let not_found = || NavError::DestinationNotFound(id.clone());
        let scope_node = self.get(scope).ok_or_else(not_found)?;
        let mut graph = if scope_node.is_graph() {
            Some(scope_node)
        } else {
            self.parent(scope_node)
        };

        while let Some(g) = graph {
            if g.id == *id {
                return Ok(g);
            }
            if let NodeKind::Graph { children, .. } = &g.kind
                && let Some(found) = children.iter().map(|c| &self.nodes[c.0]).find(|c| c.id == *id)
            {
                return Ok(found);
            }
            graph = self.parent(g);
        }
        Err(not_found())
    }

    /// Looks up an action on `from`, then on each ancestor graph.
    pub fn find_action(&self, from: &DestinationId, action_id: &str) -> Option<&Action> {
        let dest = self.get(from)?;
        std::iter::once(dest)
            .chain(self.ancestors(dest))
            .find_map(|d| d.actions.get(action_id))
    }

    /// Descends through nested graphs to the leaf that is actually shown.
    pub fn start_leaf<'g>(&'g self, dest: &'g Destination) -> &'g Destination {
        let mut current = dest;
        while let NodeKind::Graph { start, .. } = &current.kind {
            match self.get(start) {
                Some(next) => current = next,
                // build() guarantees every start exists
                None => break,
            }
        }
        current
    }

    /// Resolves a route against every registered pattern. The most specific
    /// match wins; ties go to the pattern registered first.
    pub fn resolve_deep_link(&self, route: &str) -> Option<DeepLinkMatch<'_>> {
        let mut best: Option<(DeepLinkMatch<'_>, (deep_link::Specificity, usize))> = None;
        for dest in &self.nodes {
            for link in &dest.deep_links {
                let Some(args) = link.pattern.matches(route, &dest.arguments) else {
                    continue;
                };
                let rank = (link.pattern.specificity(), link.order);
                let replace = match &best {
                    None => true,
                    Some((_, current)) => better(rank, *current) == Ordering::Greater,
                };
                if replace {
                    best = Some((
                        DeepLinkMatch {
                            destination: dest,
                            args,
                            pattern: link.pattern.as_str(),
                        },
                        rank,
                    ));
                }
            }
        }
        best.map(|(m, _)| m)
    }
}

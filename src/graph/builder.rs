//! Fluent graph construction with validation deferred to [`NavGraphBuilder::build`].
//!
//! ```ignore
//! let graph = NavGraphBuilder::new("main", "home")
//!     .destination("main", DestinationBuilder::new("home", "host"))
//!     .destination("main", DestinationBuilder::new("dashboard", "host"))
//!     .action("home", "to_dashboard", Action::new("dashboard"))
//!     .build()?;
//! ```

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::error::{NavError, NavResult};
use crate::graph::action::{Action, LaunchScreen};
use crate::graph::args::Argument;
use crate::graph::deep_link::{DeepLink, RoutePattern};
use crate::graph::{Destination, DestinationId, GRAPH_NAVIGATOR, NavGraph, NodeIndex, NodeKind};

/// Description of one destination before it is placed in a graph.
#[derive(Debug, Clone)]
pub struct DestinationBuilder {
    id: DestinationId,
    navigator: String,
    label: Option<String>,
    arguments: BTreeMap<String, Argument>,
    actions: Vec<(String, Action)>,
    deep_links: Vec<String>,
    launch_screen: LaunchScreen,
    up: Option<DestinationId>,
}

impl DestinationBuilder {
    pub fn new(id: impl Into<DestinationId>, navigator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            navigator: navigator.into(),
            label: None,
            arguments: BTreeMap::new(),
            actions: Vec::new(),
            deep_links: Vec::new(),
            launch_screen: LaunchScreen::Default,
            up: None,
        }
    }

    pub fn id(&self) -> &DestinationId {
        &self.id
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn argument(mut self, name: impl Into<String>, argument: Argument) -> Self {
        self.arguments.insert(name.into(), argument);
        self
    }

    pub fn action(mut self, action_id: impl Into<String>, action: Action) -> Self {
        self.actions.push((action_id.into(), action));
        self
    }

    pub fn deep_link(mut self, pattern: impl Into<String>) -> Self {
        self.deep_links.push(pattern.into());
        self
    }

    pub fn launch_screen(mut self, launch_screen: LaunchScreen) -> Self {
        self.launch_screen = launch_screen;
        self
    }

    /// Declares where "up" goes from this destination.
    pub fn up(mut self, target: impl Into<DestinationId>) -> Self {
        self.up = Some(target.into());
        self
    }
}

enum Pending {
    Node {
        parent: DestinationId,
        dest: DestinationBuilder,
        graph_start: Option<DestinationId>,
    },
    Action {
        source: DestinationId,
        action_id: String,
        action: Action,
    },
    DeepLink {
        dest: DestinationId,
        pattern: String,
    },
}

/// Collects graph pieces in declaration order and validates them on `build()`.
pub struct NavGraphBuilder {
    root: DestinationBuilder,
    root_start: DestinationId,
    pending: Vec<Pending>,
}

impl NavGraphBuilder {
    pub fn new(id: impl Into<DestinationId>, start: impl Into<DestinationId>) -> Self {
        Self {
            root: DestinationBuilder::new(id, GRAPH_NAVIGATOR),
            root_start: start.into(),
            pending: Vec::new(),
        }
    }

    pub fn root_label(mut self, label: impl Into<String>) -> Self {
        self.root = self.root.label(label);
        self
    }

    /// Adds a leaf destination under the graph `parent`.
    pub fn add_destination(mut self, parent: impl Into<DestinationId>, dest: DestinationBuilder) -> Self {
        self.pending.push(Pending::Node {
            parent: parent.into(),
            dest,
            graph_start: None,
        });
        self
    }

    /// Short alias for [`add_destination`](Self::add_destination).
    pub fn destination(self, parent: impl Into<DestinationId>, dest: DestinationBuilder) -> Self {
        self.add_destination(parent, dest)
    }

    /// Adds a nested graph under `parent`. Its children are added afterwards
    /// with `parent` set to this graph's id.
    pub fn graph(
        mut self,
        parent: impl Into<DestinationId>,
        dest: DestinationBuilder,
        start: impl Into<DestinationId>,
    ) -> Self {
        self.pending.push(Pending::Node {
            parent: parent.into(),
            dest,
            graph_start: Some(start.into()),
        });
        self
    }

    pub fn add_action(
        mut self,
        source: impl Into<DestinationId>,
        action_id: impl Into<String>,
        action: Action,
    ) -> Self {
        self.pending.push(Pending::Action {
            source: source.into(),
            action_id: action_id.into(),
            action,
        });
        self
    }

    pub fn action(self, source: impl Into<DestinationId>, action_id: impl Into<String>, action: Action) -> Self {
        self.add_action(source, action_id, action)
    }

    pub fn add_deep_link(mut self, dest: impl Into<DestinationId>, pattern: impl Into<String>) -> Self {
        self.pending.push(Pending::DeepLink {
            dest: dest.into(),
            pattern: pattern.into(),
        });
        self
    }

    pub fn build(self) -> NavResult<NavGraph> {
        let malformed = |msg: String| NavError::MalformedGraph(msg);
        let mut graph = NavGraph {
            nodes: Vec::new(),
            index: HashMap::new(),
        };
        let mut deep_link_order = 0usize;
        let mut actions: Vec<(DestinationId, String, Action)> = Vec::new();

        let root_id = self.root.id.clone();
        insert_node(&mut graph, None, self.root, Some(self.root_start), &mut actions, &mut deep_link_order)?;

        for item in self.pending {
            match item {
                Pending::Node {
                    parent,
                    dest,
                    graph_start,
                } => {
                    let parent_idx = *graph
                        .index
                        .get(&parent)
                        .ok_or_else(|| malformed(format!("parent graph {parent} of {} does not exist", dest.id)))?;
                    if !graph.nodes[parent_idx.0].is_graph() {
                        return Err(malformed(format!("{parent} is not a graph and cannot hold {}", dest.id)));
                    }
                    insert_node(
                        &mut graph,
                        Some(parent_idx),
                        dest,
                        graph_start,
                        &mut actions,
                        &mut deep_link_order,
                    )?;
                }
                Pending::Action {
                    source,
                    action_id,
                    action,
                } => actions.push((source, action_id, action)),
                Pending::DeepLink { dest, pattern } => {
                    let idx = *graph
                        .index
                        .get(&dest)
                        .ok_or_else(|| malformed(format!("deep link on unknown destination {dest}")))?;
                    let pattern = RoutePattern::parse(&pattern)?;
                    graph.nodes[idx.0].deep_links.push(DeepLink {
                        pattern,
                        order: deep_link_order,
                    });
                    deep_link_order += 1;
                }
            }
        }

        for (source, action_id, action) in actions {
            let idx = *graph
                .index
                .get(&source)
                .ok_or_else(|| malformed(format!("action {action_id} on unknown destination {source}")))?;
            graph.nodes[idx.0].actions.insert(action_id, action);
        }

        validate(&graph)?;
        debug!(
            "Built graph {} with {} nodes and {} deep links",
            root_id,
            graph.nodes.len(),
            deep_link_order
        );
        Ok(graph)
    }
}

fn insert_node(
    graph: &mut NavGraph,
    parent: Option<NodeIndex>,
    dest: DestinationBuilder,
    graph_start: Option<DestinationId>,
    actions: &mut Vec<(DestinationId, String, Action)>,
    deep_link_order: &mut usize,
) -> NavResult<()> {
    if dest.id.as_str().is_empty() {
        return Err(NavError::MalformedGraph("destinations must have an id".into()));
    }
    if graph.index.contains_key(&dest.id) {
        return Err(NavError::MalformedGraph(format!("duplicate destination id {}", dest.id)));
    }
    if dest.navigator.is_empty() {
        return Err(NavError::MalformedGraph(format!("{} has no navigator name", dest.id)));
    }

    let mut deep_links = Vec::with_capacity(dest.deep_links.len());
    for raw in &dest.deep_links {
        deep_links.push(DeepLink {
            pattern: RoutePattern::parse(raw)?,
            order: *deep_link_order,
        });
        *deep_link_order += 1;
    }
    for (action_id, action) in dest.actions {
        actions.push((dest.id.clone(), action_id, action));
    }

    let idx = NodeIndex(graph.nodes.len());
    let kind = match graph_start {
        Some(start) => NodeKind::Graph {
            start,
            children: Vec::new(),
        },
        None => NodeKind::Leaf,
    };
    graph.index.insert(dest.id.clone(), idx);
    graph.nodes.push(Destination {
        id: dest.id,
        navigator: dest.navigator,
        label: dest.label,
        arguments: dest.arguments,
        actions: BTreeMap::new(),
        deep_links,
        launch_screen: dest.launch_screen,
        up: dest.up,
        parent,
        kind,
    });
    if let Some(p) = parent
        && let NodeKind::Graph { children, .. } = &mut graph.nodes[p.0].kind
    {
        children.push(idx);
    }
    Ok(())
}

fn validate(graph: &NavGraph) -> NavResult<()> {
    let malformed = |msg: String| Err(NavError::MalformedGraph(msg));
    for dest in &graph.nodes {
        if let NodeKind::Graph { start, children } = &dest.kind {
            if start == &dest.id {
                return malformed(format!("graph {} cannot start at itself", dest.id));
            }
            if !children.iter().any(|c| graph.nodes[c.0].id == *start) {
                return malformed(format!("start destination {start} is not a child of graph {}", dest.id));
            }
        }

        for (action_id, action) in &dest.actions {
            if graph.find_destination(&dest.id, &action.target).is_err() {
                return malformed(format!(
                    "action {action_id} on {} targets {} which is not reachable",
                    dest.id, action.target
                ));
            }
            if let Some(pop) = &action.options.pop_up_to
                && graph.get(&pop.destination).is_none()
            {
                return malformed(format!(
                    "action {action_id} on {} pops up to unknown destination {}",
                    dest.id, pop.destination
                ));
            }
        }

        if let Some(up) = &dest.up
            && graph.get(up).is_none()
        {
            return malformed(format!("{} declares unknown up destination {up}", dest.id));
        }
    }
    Ok(())
}

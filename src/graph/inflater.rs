//! Declarative graph files.
//!
//! A graph file is TOML. The top-level table is the root graph; nested graphs
//! go under `[[graphs]]` and may nest further:
//!
//! ```toml
//! id = "main"
//! start = "home"
//!
//! [[destinations]]
//! id = "home"
//! navigator = "host"
//! actions = [{ id = "to_dashboard", target = "dashboard" }]
//!
//! [[destinations]]
//! id = "dashboard"
//! navigator = "host"
//! launch_screen = "end"
//!
//! [[graphs]]
//! id = "scores"
//! start = "leaderboard"
//! [[graphs.destinations]]
//! id = "leaderboard"
//! navigator = "host"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{NavError, NavResult};
use crate::graph::action::{Action, LaunchScreen, NavOptions};
use crate::graph::args::{Args, Argument};
use crate::graph::builder::{DestinationBuilder, NavGraphBuilder};
use crate::graph::{DestinationId, GRAPH_NAVIGATOR, NavGraph};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphDef {
    id: String,
    start: String,
    label: Option<String>,
    #[serde(default)]
    actions: Vec<ActionDef>,
    #[serde(default)]
    deep_links: Vec<String>,
    #[serde(default)]
    destinations: Vec<DestinationDef>,
    #[serde(default)]
    graphs: Vec<GraphDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DestinationDef {
    id: String,
    navigator: String,
    label: Option<String>,
    #[serde(default)]
    launch_screen: LaunchScreen,
    up: Option<String>,
    #[serde(default)]
    arguments: BTreeMap<String, Argument>,
    #[serde(default)]
    actions: Vec<ActionDef>,
    #[serde(default)]
    deep_links: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ActionDef {
    id: String,
    target: String,
    #[serde(default)]
    pop_up_to: Option<String>,
    #[serde(default)]
    inclusive: bool,
    #[serde(default)]
    single_top: bool,
    #[serde(default)]
    launch_screen: Option<LaunchScreen>,
    #[serde(default)]
    args: Args,
}

impl ActionDef {
    fn into_action(self) -> (String, Action) {
        let mut options = NavOptions::new().single_top(self.single_top);
        if let Some(pop) = self.pop_up_to {
            options = options.pop_up_to(pop, self.inclusive);
        }
        options.launch_screen = self.launch_screen;
        let action = Action::new(self.target)
            .with_options(options)
            .with_args(self.args);
        (self.id, action)
    }
}

impl DestinationDef {
    fn into_builder(self) -> DestinationBuilder {
        let mut b = DestinationBuilder::new(self.id, self.navigator).launch_screen(self.launch_screen);
        if let Some(label) = self.label {
            b = b.label(label);
        }
        if let Some(up) = self.up {
            b = b.up(up);
        }
        for (name, arg) in self.arguments {
            b = b.argument(name, arg);
        }
        for def in self.actions {
            let (id, action) = def.into_action();
            b = b.action(id, action);
        }
        for link in self.deep_links {
            b = b.deep_link(link);
        }
        b
    }
}

fn graph_builder(def: &GraphDef) -> DestinationBuilder {
    let mut b = DestinationBuilder::new(def.id.as_str(), GRAPH_NAVIGATOR);
    if let Some(label) = &def.label {
        b = b.label(label.as_str());
    }
    b
}

/// Adds `def`'s contents (not `def` itself) under the graph `def.id`.
fn add_children(mut builder: NavGraphBuilder, def: GraphDef) -> NavGraphBuilder {
    let parent = DestinationId::from(def.id);
    for (id, action) in def.actions.into_iter().map(ActionDef::into_action) {
        builder = builder.add_action(&parent, id, action);
    }
    for link in def.deep_links {
        builder = builder.add_deep_link(&parent, link);
    }
    for dest in def.destinations {
        builder = builder.add_destination(&parent, dest.into_builder());
    }
    for nested in def.graphs {
        let node = graph_builder(&nested);
        let start = nested.start.clone();
        builder = builder.graph(&parent, node, start);
        builder = add_children(builder, nested);
    }
    builder
}

/// Parses and validates a TOML graph description.
pub fn inflate(source: &str) -> NavResult<NavGraph> {
    let def: GraphDef = toml::from_str(source).map_err(|e| NavError::MalformedGraph(e.to_string()))?;
    let mut root = NavGraphBuilder::new(def.id.as_str(), def.start.as_str());
    if let Some(label) = &def.label {
        root = root.root_label(label.as_str());
    }
    add_children(root, def).build()
}

/// Reads and inflates a graph file.
pub fn inflate_file(path: &Path) -> NavResult<NavGraph> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| NavError::MalformedGraph(format!("{}: {e}", path.display())))?;
    inflate(&source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::args::{ArgType, ArgValue};

    const SAMPLE: &str = r#"
id = "main"
start = "home"
label = "Main"

actions = [{ id = "to_home", target = "home", pop_up_to = "main" }]

[[destinations]]
id = "home"
navigator = "host"
actions = [
    { id = "to_dashboard", target = "dashboard" },
    { id = "to_scores", target = "scores", single_top = true },
]

[[destinations]]
id = "dashboard"
navigator = "host"
launch_screen = "end"

[[graphs]]
id = "scores"
start = "leaderboard"

[[graphs.destinations]]
id = "leaderboard"
navigator = "host"

[[graphs.destinations]]
id = "profile"
navigator = "host"
up = "leaderboard"
deep_links = ["app://duo/users/{user_id}"]

[graphs.destinations.arguments.user_id]
type = "int"

[graphs.destinations.arguments.tab]
type = "string"
default = "overview"
"#;

    #[test]
    fn test_inflate_sample() {
        let graph = inflate(SAMPLE).unwrap();
        assert_eq!(graph.id().as_str(), "main");
        assert_eq!(graph.root().label(), Some("Main"));
        assert_eq!(graph.len(), 6);

        let dashboard = graph.get(&"dashboard".into()).unwrap();
        assert_eq!(dashboard.launch_screen(), LaunchScreen::End);

        let scores = graph.get(&"scores".into()).unwrap();
        assert_eq!(scores.start().map(|s| s.as_str()), Some("leaderboard"));

        let profile = graph.get(&"profile".into()).unwrap();
        assert_eq!(profile.up().map(|u| u.as_str()), Some("leaderboard"));
        assert_eq!(profile.arguments()["user_id"].ty, ArgType::Int);
        assert_eq!(
            profile.arguments()["tab"].default,
            Some(ArgValue::from("overview"))
        );
    }

    #[test]
    fn test_inflated_actions_and_deep_links() {
        let graph = inflate(SAMPLE).unwrap();
        let action = graph.find_action(&"home".into(), "to_scores").unwrap();
        assert!(action.options.single_top);

        let inherited = graph.find_action(&"profile".into(), "to_home").unwrap();
        assert_eq!(
            inherited.options.pop_up_to.as_ref().map(|p| p.destination.as_str()),
            Some("main")
        );

        let m = graph.resolve_deep_link("app://duo/users/9").unwrap();
        assert_eq!(m.destination.id().as_str(), "profile");
        assert_eq!(m.args.get("user_id"), Some(&ArgValue::Int(9)));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = inflate("id = \"m\"\nstart = \"a\"\ncolour = \"red\"").unwrap_err();
        assert!(matches!(err, NavError::MalformedGraph(_)));
    }

    #[test]
    fn test_validation_errors_surface() {
        let src = r#"
id = "m"
start = "a"
[[destinations]]
id = "a"
navigator = "host"
actions = [{ id = "go", target = "nowhere" }]
"#;
        let err = inflate(src).unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }
}

//! Actions (graph edges) and the options that shape a navigation.

use serde::{Deserialize, Serialize};

use crate::graph::DestinationId;
use crate::graph::args::Args;

/// Which pane a destination prefers when two panes are active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchScreen {
    /// Newest entry goes to the secondary pane, the one before it to the primary.
    #[default]
    Default,
    /// Newest entry takes the primary pane; secondary stays empty.
    Start,
    /// Newest entry takes the secondary pane even when it is the only one.
    End,
    /// Newest entry spans both panes.
    Both,
}

/// Truncate the stack down to `destination` before pushing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopUpTo {
    pub destination: DestinationId,
    #[serde(default)]
    pub inclusive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavOptions {
    #[serde(default)]
    pub pop_up_to: Option<PopUpTo>,
    #[serde(default)]
    pub single_top: bool,
    /// Overrides the destination's own launch screen when set.
    #[serde(default)]
    pub launch_screen: Option<LaunchScreen>,
}

impl NavOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop_up_to(mut self, destination: impl Into<DestinationId>, inclusive: bool) -> Self {
        self.pop_up_to = Some(PopUpTo {
            destination: destination.into(),
            inclusive,
        });
        self
    }

    pub fn single_top(mut self, single_top: bool) -> Self {
        self.single_top = single_top;
        self
    }

    pub fn launch_screen(mut self, launch_screen: LaunchScreen) -> Self {
        self.launch_screen = Some(launch_screen);
        self
    }
}

/// A directed edge from its owning destination to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub target: DestinationId,
    pub options: NavOptions,
    /// Argument template merged under the caller's arguments.
    pub args: Args,
}

impl Action {
    pub fn new(target: impl Into<DestinationId>) -> Self {
        Self {
            target: target.into(),
            options: NavOptions::default(),
            args: Args::new(),
        }
    }

    pub fn with_options(mut self, options: NavOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let opts = NavOptions::new()
            .pop_up_to("home", true)
            .single_top(true)
            .launch_screen(LaunchScreen::End);
        let pop = opts.pop_up_to.as_ref().unwrap();
        assert_eq!(pop.destination.as_str(), "home");
        assert!(pop.inclusive);
        assert!(opts.single_top);
        assert_eq!(opts.launch_screen, Some(LaunchScreen::End));
    }

    #[test]
    fn test_launch_screen_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            screen: LaunchScreen,
        }
        let w: Wrapper = toml::from_str(r#"screen = "both""#).unwrap();
        assert_eq!(w.screen, LaunchScreen::Both);
    }
}

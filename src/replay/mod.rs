//! # Script Replay
//!
//! Host adapter used by the `duonav` binary: drives a [`NavController`] from
//! a [`script`] and writes the stack and pane state after every step.
//! Layout steps go through the controller's layout queue the way a window
//! observer would deliver them.

pub mod script;

use std::io::Write;

use log::{debug, info};
use thiserror::Error;

use crate::core::controller::NavController;
use crate::core::snapshot::Snapshot;
use crate::error::NavError;
use crate::pane::{PaneCount, PaneLayout};

pub use script::{ScriptError, Step, parse_script};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("step {step}: {source}")]
    Nav {
        step: usize,
        #[source]
        source: NavError,
    },
    #[error("step {0}: no snapshot captured yet")]
    NothingCaptured(usize),
    #[error("step {0}: the layout queue is closed")]
    LayoutClosed(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One-line description of the stack and panes.
pub fn describe(controller: &NavController) -> String {
    let stack = controller.back_stack();
    let name = |id| {
        stack
            .get(id)
            .map(|e| e.destination().as_str())
            .unwrap_or("?")
    };
    let entries: Vec<&str> = stack.iter().map(|e| e.destination().as_str()).collect();
    let panes = controller.pane_assignment();

    let mut out = format!("stack: [{}]", entries.join(" > "));
    match (panes.primary, panes.spanned) {
        (Some(p), true) => out.push_str(&format!("  spanned: {}", name(p))),
        (Some(p), false) => out.push_str(&format!("  primary: {}", name(p))),
        (None, _) => out.push_str("  primary: -"),
    }
    if controller.layout().is_dual() && !panes.spanned {
        match panes.secondary {
            Some(s) => out.push_str(&format!("  secondary: {}", name(s))),
            None => out.push_str("  secondary: -"),
        }
    }
    if !panes.overlays.is_empty() {
        let overlays: Vec<&str> = panes.overlays.iter().map(|o| name(*o)).collect();
        out.push_str(&format!("  overlays: [{}]", overlays.join(", ")));
    }
    out
}

/// Runs `steps` in order, writing the resulting state after each one.
///
/// Stops at the first failing step. The returned snapshot is the last one
/// taken by a `capture` step.
pub async fn run_script<W: Write>(
    controller: &mut NavController,
    steps: &[Step],
    out: &mut W,
) -> Result<Option<Snapshot>, ReplayError> {
    let mut captured: Option<Snapshot> = None;
    writeln!(out, "start  {}", describe(controller))?;

    for (i, step) in steps.iter().enumerate() {
        let n = i + 1;
        let nav = |source| ReplayError::Nav { step: n, source };
        debug!("Replay step {n}: {:?}", step);

        let label = match step {
            Step::Navigate { target, args, options } => {
                controller
                    .navigate(target.clone(), args.clone(), options.clone())
                    .map_err(nav)?;
                format!("navigate {}", target.describe())
            }
            Step::Pop { destination, inclusive } => {
                let popped = match destination {
                    Some(dest) => controller.pop_back_stack_to(dest, *inclusive),
                    None => controller.pop_back_stack(),
                }
                .map_err(nav)?;
                if popped { "pop".to_string() } else { "pop (refused)".to_string() }
            }
            Step::Up => {
                let moved = controller.navigate_up().map_err(nav)?;
                if moved { "up".to_string() } else { "up (refused)".to_string() }
            }
            Step::HostPop => {
                let top = controller.current_entry().map(|e| e.id());
                let popped = match top {
                    Some(id) => controller.on_host_popped(id).map_err(nav)?,
                    None => false,
                };
                if popped { "host-pop".to_string() } else { "host-pop (ignored)".to_string() }
            }
            Step::Layout(count) => {
                let layout = match count {
                    PaneCount::Single => PaneLayout::single(),
                    PaneCount::Dual => PaneLayout::dual(),
                };
                controller
                    .layout_sender()
                    .send(layout)
                    .await
                    .map_err(|_| ReplayError::LayoutClosed(n))?;
                controller.wait_for_layout().await.map_err(nav)?;
                format!("layout {}", u8::from(*count))
            }
            Step::State(key, value) => {
                let id = controller.current_entry().map(|e| e.id()).ok_or_else(|| nav(NavError::NotActive))?;
                let json = serde_json::to_value(value).map_err(|e| ReplayError::Io(e.into()))?;
                if let Some(state) = controller.saved_state_mut(id) {
                    state.insert(key.clone(), json);
                }
                format!("state {key}={value}")
            }
            Step::Capture => {
                captured = Some(controller.capture());
                "capture".to_string()
            }
            Step::Restore => {
                let snapshot = captured.as_ref().ok_or(ReplayError::NothingCaptured(n))?;
                controller.restore(snapshot).map_err(nav)?;
                "restore".to_string()
            }
        };
        writeln!(out, "{label:<24} {}", describe(controller))?;
    }

    info!("Replayed {} steps", steps.len());
    Ok(captured)
}

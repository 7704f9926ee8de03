//! # Panes
//!
//! The host reports how many panes are available through a [`PaneLayout`]
//! signal. The back stack is mapped onto those panes as a derived
//! [`PaneAssignment`]; the stack itself never changes because of a layout.
//!
//! ```text
//!  window observer ──LayoutSender──▶ LayoutReceiver ──latest──▶ NavController
//!                                                                  │
//!                                  BackStack ──assign()──▶ PaneAssignment
//!                                                                  │
//!                                     DualPaneCoordinator ── diff ─┘
//!                                          │
//!                               navigate / hide per Navigator
//! ```

pub mod assignment;
pub mod channel;
pub mod coordinator;

use serde::{Deserialize, Serialize};

pub use assignment::{PaneAssignment, assign};
pub use channel::{LayoutReceiver, LayoutSender, layout_channel};
pub use coordinator::DualPaneCoordinator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaneCount {
    #[default]
    Single,
    Dual,
}

impl TryFrom<u8> for PaneCount {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(PaneCount::Single),
            2 => Ok(PaneCount::Dual),
            other => Err(format!("pane count must be 1 or 2, got {other}")),
        }
    }
}

impl From<PaneCount> for u8 {
    fn from(c: PaneCount) -> u8 {
        match c {
            PaneCount::Single => 1,
            PaneCount::Dual => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Window geometry as reported by the host. Carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub bounds: Rect,
    #[serde(default)]
    pub hinge: Option<Rect>,
}

/// One pane-layout signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneLayout {
    pub pane_count: PaneCount,
    #[serde(default)]
    pub geometry: Geometry,
}

impl PaneLayout {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn dual() -> Self {
        Self {
            pane_count: PaneCount::Dual,
            geometry: Geometry::default(),
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn is_dual(&self) -> bool {
        self.pane_count == PaneCount::Dual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_count_serializes_as_number() {
        let json = serde_json::to_string(&PaneLayout::dual()).unwrap();
        assert!(json.contains(r#""pane_count":2"#));
        let back: PaneLayout = serde_json::from_str(r#"{"pane_count":1}"#).unwrap();
        assert_eq!(back, PaneLayout::single());
        assert!(serde_json::from_str::<PaneLayout>(r#"{"pane_count":3}"#).is_err());
    }
}

//! # Core Navigation Logic
//!
//! The back stack engine and everything it owns. It knows nothing about
//! how destinations are drawn; that is the navigators' job.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │          CORE           │
//!                    │     (this module)       │
//!                    │                         │
//!                    │  • NavController        │
//!                    │  • BackStack / entries  │
//!                    │  • Command / NavQueue   │
//!                    │  • Snapshot, config     │
//!                    │                         │
//!                    │  No rendering.          │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │   graph    │      │    pane    │      │ navigator  │
//!     │ (lookups)  │      │ (panes)    │      │ (render)   │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`controller`]: `NavController`, the single writer of the back stack
//! - [`back_stack`]: ordered entries and the truncation helpers
//! - [`entry`]: `BackStackEntry`, its id, lifecycle and saved state
//! - [`command`]: navigation requests and the listener queue
//! - [`snapshot`]: capture/restore shape and its JSON persistence
//! - [`config`]: layered configuration

pub mod back_stack;
pub mod command;
pub mod config;
pub mod controller;
pub mod entry;
pub mod snapshot;

pub use command::{Command, DestinationChanged, ListenerId, NavQueue, NavTarget};
pub use controller::{EngineState, NavController};

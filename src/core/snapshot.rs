//! # State Snapshots
//!
//! A snapshot is the logical shape of a controller's state: graph id, the
//! ordered entries with their arguments and saved state, and the last pane
//! layout. `NavController::capture`/`restore` produce and consume it; the
//! functions here persist it as JSON under a snapshot directory, one
//! `<graph id>.json` per graph.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::entry::{EntryId, SavedState};
use crate::graph::DestinationId;
use crate::graph::action::LaunchScreen;
use crate::graph::args::Args;
use crate::pane::PaneLayout;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub version: u32,
    pub graph_id: DestinationId,
    pub captured_at: DateTime<Utc>,
    /// Bottom of the stack first.
    pub entries: Vec<SnapshotEntry>,
    #[serde(default)]
    pub layout: PaneLayout,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
    pub id: EntryId,
    pub destination: DestinationId,
    #[serde(default)]
    pub args: Args,
    #[serde(default)]
    pub launch_screen: LaunchScreen,
    #[serde(default)]
    pub saved_state: SavedState,
}

fn invalid_data<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// File name for a graph's snapshot. Bytes outside `[A-Za-z0-9-]` are written
/// as `_xx` (lowercase hex), so distinct ids never share a file.
fn snapshot_path(dir: &Path, graph_id: &DestinationId) -> PathBuf {
    let mut name = String::with_capacity(graph_id.as_str().len());
    for byte in graph_id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("_{byte:02x}"));
        }
    }
    dir.join(format!("{name}.json"))
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data).map_err(invalid_data)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Writes `snapshot` under `dir`, creating it if needed. Returns the file path.
pub fn save_snapshot(dir: &Path, snapshot: &Snapshot) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = snapshot_path(dir, &snapshot.graph_id);
    atomic_write_json(&path, snapshot)?;
    debug!(
        "Saved snapshot of {} ({} entries) to {}",
        snapshot.graph_id,
        snapshot.entries.len(),
        path.display()
    );
    Ok(path)
}

/// Loads the snapshot for `graph_id`, or `None` if there isn't one.
pub fn load_snapshot(dir: &Path, graph_id: &DestinationId) -> io::Result<Option<Snapshot>> {
    let path = snapshot_path(dir, graph_id);
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(&path)?;
    let snapshot: Snapshot = serde_json::from_str(&json).map_err(invalid_data)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(invalid_data(format!(
            "snapshot format version {} is not supported (expected {SNAPSHOT_VERSION})",
            snapshot.version
        )));
    }
    Ok(Some(snapshot))
}

pub fn delete_snapshot(dir: &Path, graph_id: &DestinationId) -> io::Result<()> {
    let path = snapshot_path(dir, graph_id);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

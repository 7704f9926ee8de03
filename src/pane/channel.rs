//! Bounded queue carrying pane-layout signals from the host's window observer
//! to the controller. Consumers only ever care about the newest value.

use log::debug;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::pane::PaneLayout;

pub const DEFAULT_LAYOUT_QUEUE_CAPACITY: usize = 8;

/// Sending half, handed to the window observer.
#[derive(Debug, Clone)]
pub struct LayoutSender {
    tx: mpsc::Sender<PaneLayout>,
}

/// Receiving half, owned by the controller.
#[derive(Debug)]
pub struct LayoutReceiver {
    rx: mpsc::Receiver<PaneLayout>,
}

/// Creates a layout queue. A capacity of zero is bumped to one.
pub fn layout_channel(capacity: usize) -> (LayoutSender, LayoutReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (LayoutSender { tx }, LayoutReceiver { rx })
}

impl LayoutSender {
    /// Waits for queue space. Fails, handing the layout back, once the
    /// controller is gone.
    pub async fn send(&self, layout: PaneLayout) -> Result<(), PaneLayout> {
        self.tx.send(layout).await.map_err(|e| e.0)
    }

    /// Never waits. A full or closed queue hands the layout back.
    pub fn try_send(&self, layout: PaneLayout) -> Result<(), PaneLayout> {
        self.tx.try_send(layout).map_err(|e| match e {
            TrySendError::Full(l) | TrySendError::Closed(l) => l,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl LayoutReceiver {
    /// Empties the queue without waiting and returns the newest value.
    pub fn drain_latest(&mut self) -> Option<PaneLayout> {
        let mut latest = None;
        let mut skipped = 0usize;
        while let Ok(layout) = self.rx.try_recv() {
            if latest.replace(layout).is_some() {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!("Collapsed {skipped} stale layout events");
        }
        latest
    }

    /// Waits for at least one value, then collapses anything else queued
    /// behind it. `None` once every sender is dropped.
    pub async fn recv_latest(&mut self) -> Option<PaneLayout> {
        let first = self.rx.recv().await?;
        Some(self.drain_latest().unwrap_or(first))
    }
}

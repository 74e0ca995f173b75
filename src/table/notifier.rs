//! Change notification for UI bindings observing a search table.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages broadcast when a search table's observable state changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum TableEvent {
    LoadingChanged {
        loading: bool,
    },
    /// Position or size changed by a user action, before the fetch resolves.
    PageChanged {
        current_page: usize,
        page_size: usize,
    },
    /// A fetch cycle stored new rows and totals.
    DataUpdated {
        rows: usize,
        current_page: usize,
        total: usize,
        total_pages: usize,
    },
    FetchFailed {
        message: String,
    },
}

/// Pub/sub notifier for table state changes.
#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<TableEvent>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    /// Create a new ChangeNotifier with a buffer of 64 messages.
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TableEvent> {
        self.tx.subscribe()
    }

    /// Broadcast an event. Having no subscribers is not an error.
    pub fn notify(&self, event: TableEvent) {
        let _ = self.tx.send(event);
    }
}

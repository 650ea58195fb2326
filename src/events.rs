//! Application-level signals shared between dashboard consumers.

use tokio::sync::broadcast;

use crate::models::ClientId;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    SwitchTab(String),
    /// Ask the UI to start the Open Finance connect flow.
    OpenFinanceConnect,
    /// An institution was linked; provenance must be re-resolved.
    OpenFinanceEnabled,
    PrefillChat(String),
    ClientSelected(ClientId),
    DataSourceChanged,
}

impl AppEvent {
    /// Whether the event invalidates the currently assembled view.
    pub fn requires_refresh(&self) -> bool {
        matches!(self, AppEvent::OpenFinanceEnabled | AppEvent::DataSourceChanged)
    }
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns the number of subscribers reached; zero is not an error.
    pub fn publish(&self, event: AppEvent) -> usize {
        tracing::debug!(?event, "Publishing app event");
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::events::AppEvent;
use crate::models::ClientId;

use super::{DashboardAssembler, DashboardView, LoadState};

#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    Applied(Arc<DashboardView>),
    /// A newer selection started while this one was loading; its result was
    /// discarded.
    Stale,
}

#[derive(Default)]
struct SessionState {
    client: Option<ClientId>,
    view: Option<Arc<DashboardView>>,
    load_state: LoadState,
}

/// The currently selected client and its view. Only the most recent
/// selection may publish a result.
pub struct DashboardSession {
    assembler: DashboardAssembler,
    generation: AtomicU64,
    state: RwLock<SessionState>,
}

impl DashboardSession {
    pub fn new(assembler: DashboardAssembler) -> Self {
        Self {
            assembler,
            generation: AtomicU64::new(0),
            state: RwLock::new(SessionState::default()),
        }
    }

    pub async fn select_client(&self, client: ClientId) -> SelectOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write().await;
            if state.client != Some(client) {
                state.view = None;
            }
            state.client = Some(client);
            state.load_state = LoadState::Loading;
        }
        tracing::info!(client = %client, generation, "Loading client dashboard");

        let assembled = self.assembler.assemble(client).await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(client = %client, generation, "Discarding stale dashboard");
            return SelectOutcome::Stale;
        }
        let view = Arc::new(assembled.view);
        state.view = Some(Arc::clone(&view));
        state.load_state = assembled.state;
        SelectOutcome::Applied(view)
    }

    /// Re-assemble the current client. `None` when nothing is selected.
    pub async fn refresh(&self) -> Option<SelectOutcome> {
        let client = self.current_client().await?;
        Some(self.select_client(client).await)
    }

    pub async fn handle_event(&self, event: &AppEvent) -> Option<SelectOutcome> {
        match event {
            AppEvent::ClientSelected(client) => Some(self.select_client(*client).await),
            AppEvent::OpenFinanceEnabled => {
                self.assembler.set_open_finance_enabled(true);
                self.refresh().await
            }
            event if event.requires_refresh() => self.refresh().await,
            _ => None,
        }
    }

    /// Apply events until the bus closes. Lagged receivers skip ahead and
    /// refresh once.
    pub async fn listen(&self, mut events: broadcast::Receiver<AppEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => {
                    self.handle_event(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Dashboard session lagged behind events");
                    self.refresh().await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    pub async fn state(&self) -> LoadState {
        self.state.read().await.load_state
    }

    pub async fn current_view(&self) -> Option<Arc<DashboardView>> {
        self.state.read().await.view.clone()
    }

    pub async fn current_client(&self) -> Option<ClientId> {
        self.state.read().await.client
    }

    pub fn assembler(&self) -> &DashboardAssembler {
        &self.assembler
    }
}

//! In-memory backend for tests and offline runs.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::models::{
    ClientId, DividendRecord, FinancialGoal, PortfolioSummary, PortfolioValuePoint,
    ProfileSummary,
};

use super::{BackendError, BackendResult, BackendSource};

/// Individual fetches, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    PortfolioSummary,
    Dividends,
    ProfileSummary,
    PortfolioHistory,
    Goals,
}

#[derive(Debug, Clone, Default)]
struct ClientRows {
    portfolio: Option<PortfolioSummary>,
    dividends: Vec<DividendRecord>,
    profile: Option<ProfileSummary>,
    history: Vec<PortfolioValuePoint>,
    goals: Vec<FinancialGoal>,
}

/// In-memory backend. Clients without rows behave like a reachable backend
/// that has nothing stored for them.
pub struct MemoryBackend {
    clients: Mutex<HashMap<ClientId, ClientRows>>,
    failures: Mutex<HashSet<FetchKind>>,
    delays: Mutex<HashMap<ClientId, Duration>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashSet::new()),
            delays: Mutex::new(HashMap::new()),
        }
    }

    pub async fn set_portfolio_summary(&self, client: ClientId, summary: PortfolioSummary) {
        let mut clients = self.clients.lock().await;
        clients.entry(client).or_default().portfolio = Some(summary);
    }

    pub async fn add_dividends(&self, client: ClientId, records: &[DividendRecord]) {
        let mut clients = self.clients.lock().await;
        clients
            .entry(client)
            .or_default()
            .dividends
            .extend_from_slice(records);
    }

    pub async fn set_profile_summary(&self, client: ClientId, profile: ProfileSummary) {
        let mut clients = self.clients.lock().await;
        clients.entry(client).or_default().profile = Some(profile);
    }

    pub async fn add_history(&self, client: ClientId, points: &[PortfolioValuePoint]) {
        let mut clients = self.clients.lock().await;
        clients
            .entry(client)
            .or_default()
            .history
            .extend_from_slice(points);
    }

    pub async fn add_goals(&self, client: ClientId, goals: &[FinancialGoal]) {
        let mut clients = self.clients.lock().await;
        clients
            .entry(client)
            .or_default()
            .goals
            .extend_from_slice(goals);
    }

    /// Make every subsequent `kind` fetch fail.
    pub async fn fail(&self, kind: FetchKind) {
        self.failures.lock().await.insert(kind);
    }

    pub async fn recover(&self, kind: FetchKind) {
        self.failures.lock().await.remove(&kind);
    }

    /// Delay every fetch for `client`.
    pub async fn set_delay(&self, client: ClientId, delay: Duration) {
        self.delays.lock().await.insert(client, delay);
    }

    async fn before_fetch(&self, client: ClientId, kind: FetchKind) -> BackendResult<()> {
        let delay = self.delays.lock().await.get(&client).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failures.lock().await.contains(&kind) {
            return Err(BackendError::Unavailable(format!(
                "injected failure for {kind:?}"
            )));
        }
        Ok(())
    }

    async fn rows(&self, client: ClientId) -> ClientRows {
        let clients = self.clients.lock().await;
        clients.get(&client).cloned().unwrap_or_default()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl BackendSource for MemoryBackend {
    async fn fetch_portfolio_summary(
        &self,
        client: ClientId,
    ) -> BackendResult<Option<PortfolioSummary>> {
        self.before_fetch(client, FetchKind::PortfolioSummary).await?;
        Ok(self.rows(client).await.portfolio)
    }

    async fn fetch_dividends(&self, client: ClientId) -> BackendResult<Vec<DividendRecord>> {
        self.before_fetch(client, FetchKind::Dividends).await?;
        Ok(self.rows(client).await.dividends)
    }

    async fn fetch_profile_summary(
        &self,
        client: ClientId,
    ) -> BackendResult<Option<ProfileSummary>> {
        self.before_fetch(client, FetchKind::ProfileSummary).await?;
        Ok(self.rows(client).await.profile)
    }

    async fn fetch_portfolio_history(
        &self,
        client: ClientId,
    ) -> BackendResult<Vec<PortfolioValuePoint>> {
        self.before_fetch(client, FetchKind::PortfolioHistory).await?;
        Ok(self.rows(client).await.history)
    }

    async fn fetch_goals(&self, client: ClientId) -> BackendResult<Vec<FinancialGoal>> {
        self.before_fetch(client, FetchKind::Goals).await?;
        Ok(self.rows(client).await.goals)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

//! Read-only data collaborators keyed by client id.

mod memory;
pub mod raw;
#[cfg(feature = "remote")]
mod supabase;

pub use memory::{FetchKind, MemoryBackend};
#[cfg(feature = "remote")]
pub use supabase::SupabaseClient;

use crate::models::{
    ClientId, DividendRecord, FinancialGoal, PortfolioSummary, PortfolioValuePoint,
    ProfileSummary,
};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[cfg(feature = "remote")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned status {status} for table '{table}'")]
    Status { table: String, status: u16 },

    #[error("Failed to decode rows from table '{table}': {message}")]
    Decode { table: String, message: String },

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Primary hosted datastore. Every returned entity is tagged with the
/// source's provenance.
#[async_trait::async_trait]
pub trait BackendSource: Send + Sync {
    async fn fetch_portfolio_summary(&self, client: ClientId)
        -> BackendResult<Option<PortfolioSummary>>;

    async fn fetch_dividends(&self, client: ClientId) -> BackendResult<Vec<DividendRecord>>;

    async fn fetch_profile_summary(&self, client: ClientId)
        -> BackendResult<Option<ProfileSummary>>;

    async fn fetch_portfolio_history(&self, client: ClientId)
        -> BackendResult<Vec<PortfolioValuePoint>>;

    async fn fetch_goals(&self, client: ClientId) -> BackendResult<Vec<FinancialGoal>>;

    fn name(&self) -> &str;
}

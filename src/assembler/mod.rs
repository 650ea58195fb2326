//! Builds the per-client dashboard view from whatever real data the
//! collaborators return, falling back to synthetic data section by section.

mod financial;
mod goals;
mod insights;
mod session;

pub use financial::{FinancialOverview, OpenFinanceOverview};
pub use goals::{GoalView, GoalsPanel, GoalsSummary};
pub use insights::{CategoryCount, InsightsPanel};
pub use session::{DashboardSession, SelectOutcome};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendResult, BackendSource};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::defaults::DefaultDataSet;
use crate::dividends::DEFAULT_MONTHS_TO_CONSIDER;
use crate::insights::{InsightContext, InsightGenerator, RuleBasedInsights};
use crate::models::{ClientId, DataSource};
use crate::open_finance::{NoopOpenFinance, OpenFinanceSource};

use financial::{build_financial, merge_dividends, FinancialInputs};

/// Loading lifecycle of a client's dashboard. There is no error state:
/// failures degrade to synthetic data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    /// Every section came from real data.
    Loaded,
    LoadedWithPartialData,
    /// No section came from real data.
    LoadedSynthetic,
}

impl LoadState {
    pub fn from_sources(sources: &[DataSource]) -> Self {
        let real = sources.iter().filter(|s| s.is_real()).count();
        if sources.is_empty() || real == 0 {
            LoadState::LoadedSynthetic
        } else if real == sources.len() {
            LoadState::Loaded
        } else {
            LoadState::LoadedWithPartialData
        }
    }

    pub fn is_loaded(self) -> bool {
        matches!(
            self,
            LoadState::Loaded | LoadState::LoadedWithPartialData | LoadState::LoadedSynthetic
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub client: ClientId,
    pub financial: FinancialOverview,
    pub goals: GoalsPanel,
    pub insights: InsightsPanel,
    pub generated_at: DateTime<Utc>,
}

impl DashboardView {
    /// Provenance of each fetched section, in display order. Insights are
    /// derived and not included.
    pub fn section_sources(&self) -> [(&'static str, DataSource); 5] {
        [
            ("portfolio", self.financial.portfolio.data_source),
            ("dividends", self.financial.recent_dividends.data_source),
            ("profile", self.financial.profile.data_source),
            ("history", self.financial.history.data_source),
            ("goals", self.goals.goals.data_source),
        ]
    }

    pub fn load_state(&self) -> LoadState {
        let sources = self.section_sources().map(|(_, source)| source);
        LoadState::from_sources(&sources)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledDashboard {
    pub view: DashboardView,
    pub state: LoadState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssemblerOptions {
    pub months_to_consider: usize,
    pub recent_limit: usize,
    pub open_finance_enabled: bool,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            months_to_consider: DEFAULT_MONTHS_TO_CONSIDER,
            recent_limit: 10,
            open_finance_enabled: false,
        }
    }
}

impl From<&Config> for AssemblerOptions {
    fn from(config: &Config) -> Self {
        Self {
            months_to_consider: config.dividends.months_to_consider,
            recent_limit: config.dividends.recent_limit,
            open_finance_enabled: config.open_finance.enabled,
        }
    }
}

pub struct DashboardAssembler {
    backend: Arc<dyn BackendSource>,
    open_finance: Arc<dyn OpenFinanceSource>,
    insights: Arc<dyn InsightGenerator>,
    defaults: Arc<DefaultDataSet>,
    clock: Arc<dyn Clock>,
    options: AssemblerOptions,
    /// Starts from `options.open_finance_enabled`; flipped at runtime when an
    /// institution gets linked.
    open_finance_enabled: AtomicBool,
}

/// Log a failed fetch and treat it as missing data.
fn absorb<T>(
    result: BackendResult<T>,
    client: ClientId,
    source: &str,
    section: &'static str,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(
                client = %client,
                source,
                section,
                error = %err,
                "Fetch failed; falling back to synthetic data"
            );
            None
        }
    }
}

fn non_empty<T>(items: Option<Vec<T>>) -> Option<Vec<T>> {
    items.filter(|v| !v.is_empty())
}

impl DashboardAssembler {
    pub fn new(backend: Arc<dyn BackendSource>, defaults: Arc<DefaultDataSet>) -> Self {
        Self {
            backend,
            open_finance: Arc::new(NoopOpenFinance),
            insights: Arc::new(RuleBasedInsights::default()),
            defaults,
            clock: Arc::new(SystemClock),
            options: AssemblerOptions::default(),
            open_finance_enabled: AtomicBool::new(false),
        }
    }

    pub fn with_open_finance(mut self, open_finance: Arc<dyn OpenFinanceSource>) -> Self {
        self.open_finance = open_finance;
        self
    }

    pub fn with_insights(mut self, insights: Arc<dyn InsightGenerator>) -> Self {
        self.insights = insights;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_options(mut self, options: AssemblerOptions) -> Self {
        self.open_finance_enabled = AtomicBool::new(options.open_finance_enabled);
        self.options = options;
        self
    }

    pub fn open_finance_enabled(&self) -> bool {
        self.open_finance_enabled.load(Ordering::SeqCst)
    }

    /// Takes effect on the next [`assemble`](Self::assemble).
    pub fn set_open_finance_enabled(&self, enabled: bool) {
        self.open_finance_enabled.store(enabled, Ordering::SeqCst);
    }

    pub async fn assemble(&self, client: ClientId) -> AssembledDashboard {
        tracing::debug!(client = %client, backend = self.backend.name(), "Assembling dashboard");
        let backend_name = self.backend.name();

        let (portfolio, dividends, profile, history, goals) = tokio::join!(
            self.backend.fetch_portfolio_summary(client),
            self.backend.fetch_dividends(client),
            self.backend.fetch_profile_summary(client),
            self.backend.fetch_portfolio_history(client),
            self.backend.fetch_goals(client),
        );
        let portfolio = absorb(portfolio, client, backend_name, "portfolio").flatten();
        let dividends = non_empty(absorb(dividends, client, backend_name, "dividends"));
        let profile = absorb(profile, client, backend_name, "profile").flatten();
        let history = non_empty(absorb(history, client, backend_name, "history"));
        let goals = non_empty(absorb(goals, client, backend_name, "goals"));

        let (accounts, investments, transactions) = if self.open_finance_enabled() {
            let of_name = self.open_finance.name();
            let (accounts, investments, transactions) = tokio::join!(
                self.open_finance.list_accounts(client),
                self.open_finance.list_investments(client),
                self.open_finance.list_transactions(client),
            );
            (
                absorb(accounts, client, of_name, "accounts").unwrap_or_default(),
                absorb(investments, client, of_name, "investments").unwrap_or_default(),
                absorb(transactions, client, of_name, "transactions").unwrap_or_default(),
            )
        } else {
            Default::default()
        };

        let linked_dividends = transactions
            .iter()
            .filter_map(|t| t.to_dividend())
            .collect::<Vec<_>>();
        let dividends = merge_dividends(dividends, linked_dividends);
        let linked_cash =
            (!accounts.is_empty()).then(|| accounts.iter().map(|a| a.balance).sum::<f64>());
        let open_finance = OpenFinanceOverview::build(accounts, investments);

        tracing::debug!(
            client = %client,
            portfolio = portfolio.is_some(),
            dividends = dividends.as_ref().map_or(0, Vec::len),
            profile = profile.is_some(),
            history = history.as_ref().map_or(0, Vec::len),
            goals = goals.as_ref().map_or(0, Vec::len),
            "Fetched real data"
        );

        let now = self.clock.now();
        let generated = {
            let context = InsightContext {
                client,
                portfolio: portfolio.as_ref(),
                dividends: dividends.as_deref().unwrap_or_default(),
                goals: goals.as_deref().unwrap_or_default(),
                linked_cash,
                now,
            };
            if context.has_real_input() {
                self.insights.generate(&context)
            } else {
                Vec::new()
            }
        };

        let synthetic = self.defaults.for_client(client);
        let financial = build_financial(
            FinancialInputs {
                portfolio,
                dividends,
                profile,
                history,
                open_finance,
            },
            synthetic,
            self.clock.current_year(),
            self.options.months_to_consider,
            self.options.recent_limit,
        );
        let view = DashboardView {
            client,
            financial,
            goals: GoalsPanel::build(goals, &synthetic.goals),
            insights: InsightsPanel::build(generated, &synthetic.insights),
            generated_at: now,
        };
        let state = view.load_state();
        tracing::info!(client = %client, ?state, "Dashboard assembled");
        AssembledDashboard { view, state }
    }
}

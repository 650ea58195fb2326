mod client;
mod data_source;
mod dividend;
mod goal;
mod insight;
mod open_finance;
mod portfolio;

pub use client::{ClientId, ClientIdError};
pub use data_source::{DataSource, DisplaySource, Sourced};
pub use dividend::{DividendRecord, DEFAULT_DIVIDEND_KIND};
pub use goal::{progress_percent, FinancialGoal, GoalCategory, Priority};
pub use insight::{AIInsight, InsightAgent, InsightCategory};
pub use open_finance::{OpenFinanceAccount, OpenFinanceInvestment, OpenFinanceTransaction};
pub use portfolio::{
    Allocation, AssetClass, PortfolioSummary, PortfolioValuePoint, ProfileSummary,
};

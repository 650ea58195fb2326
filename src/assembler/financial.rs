use serde::{Deserialize, Serialize};

use crate::defaults::SyntheticClientData;
use crate::dividends::{dedupe, most_recent, total_by_asset, AssetTotal, DividendStats};
use crate::models::{
    DataSource, DividendRecord, OpenFinanceAccount, OpenFinanceInvestment, PortfolioSummary,
    PortfolioValuePoint, ProfileSummary, Sourced,
};
use crate::provenance::{resolve, resolve_with};

/// Bank-linked balances; every figure is tagged [`DataSource::OpenFinance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenFinanceOverview {
    pub accounts: Vec<OpenFinanceAccount>,
    pub investments: Vec<OpenFinanceInvestment>,
    pub institutions: Vec<String>,
    pub total_balance: Sourced<f64>,
    pub total_invested: Sourced<f64>,
}

impl OpenFinanceOverview {
    /// `None` when nothing is linked.
    pub fn build(
        accounts: Vec<OpenFinanceAccount>,
        investments: Vec<OpenFinanceInvestment>,
    ) -> Option<Self> {
        if accounts.is_empty() && investments.is_empty() {
            return None;
        }
        let mut institutions: Vec<String> = accounts
            .iter()
            .map(|a| a.institution.clone())
            .chain(investments.iter().map(|i| i.institution.clone()))
            .collect();
        institutions.sort();
        institutions.dedup();

        let total_balance = accounts.iter().map(|a| a.balance).sum();
        let total_invested = investments.iter().map(|i| i.balance).sum();
        Some(Self {
            accounts,
            investments,
            institutions,
            total_balance: Sourced::new(total_balance, DataSource::OpenFinance),
            total_invested: Sourced::new(total_invested, DataSource::OpenFinance),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialOverview {
    pub portfolio: Sourced<PortfolioSummary>,
    pub total_portfolio_value: Sourced<f64>,
    pub dividends: Sourced<DividendStats>,
    pub recent_dividends: Sourced<Vec<DividendRecord>>,
    pub top_payers: Sourced<Vec<AssetTotal>>,
    pub profile: Sourced<ProfileSummary>,
    pub history: Sourced<Vec<PortfolioValuePoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_finance: Option<OpenFinanceOverview>,
}

/// Single tag shared by every record, or `Calculated` for a mix.
pub(crate) fn uniform_source(records: &[DividendRecord]) -> DataSource {
    let mut sources = records.iter().map(|r| r.source);
    match sources.next() {
        Some(first) if sources.all(|s| s == first) => first,
        Some(_) => DataSource::Calculated,
        None => DataSource::Synthetic,
    }
}

/// Merge primary and bank-linked payments, dropping duplicates. `None`
/// when neither source has any.
pub(crate) fn merge_dividends(
    primary: Option<Vec<DividendRecord>>,
    linked: Vec<DividendRecord>,
) -> Option<Vec<DividendRecord>> {
    let mut all = primary.unwrap_or_default();
    all.extend(linked);
    let merged = dedupe(&all);
    (!merged.is_empty()).then_some(merged)
}

pub(crate) struct FinancialInputs {
    pub portfolio: Option<PortfolioSummary>,
    /// Deduplicated real payments.
    pub dividends: Option<Vec<DividendRecord>>,
    pub profile: Option<ProfileSummary>,
    pub history: Option<Vec<PortfolioValuePoint>>,
    pub open_finance: Option<OpenFinanceOverview>,
}

pub(crate) fn build_financial(
    inputs: FinancialInputs,
    synthetic: &SyntheticClientData,
    year: i32,
    months_to_consider: usize,
    recent_limit: usize,
) -> FinancialOverview {
    let portfolio_source = inputs
        .portfolio
        .as_ref()
        .map_or(DataSource::Supabase, |p| p.source);
    let total_portfolio_value = resolve(
        inputs.portfolio.as_ref().map(|p| p.total_portfolio_value),
        synthetic.portfolio.total_portfolio_value,
        portfolio_source,
    );
    let portfolio = resolve_with(
        inputs.portfolio,
        || synthetic.portfolio.clone(),
        portfolio_source,
    );

    let dividend_source = inputs
        .dividends
        .as_deref()
        .map_or(DataSource::Supabase, uniform_source);
    let records = resolve_with(
        inputs.dividends,
        || synthetic.dividends.clone(),
        dividend_source,
    );
    let derived_source = if records.is_real() {
        DataSource::Calculated
    } else {
        DataSource::Synthetic
    };
    let dividends = Sourced::new(
        DividendStats::compute(&records.value, year, months_to_consider),
        derived_source,
    );
    let top_payers = Sourced::new(total_by_asset(&records.value), derived_source);
    let recent_dividends = records.map(|r| most_recent(&r, recent_limit));

    let profile_source = inputs
        .profile
        .as_ref()
        .map_or(DataSource::Supabase, |p| p.source);
    let profile = resolve_with(inputs.profile, || synthetic.profile.clone(), profile_source);

    let history = resolve_with(
        inputs.history,
        || synthetic.history.clone(),
        DataSource::Supabase,
    );

    FinancialOverview {
        portfolio,
        total_portfolio_value,
        dividends,
        recent_dividends,
        top_payers,
        profile,
        history,
        open_finance: inputs.open_finance,
    }
}

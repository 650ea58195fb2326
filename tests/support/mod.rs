#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use raiox::assembler::{AssemblerOptions, DashboardAssembler};
use raiox::backend::MemoryBackend;
use raiox::clock::FixedClock;
use raiox::defaults::DefaultDataSet;
use raiox::models::{
    DataSource, DividendRecord, FinancialGoal, GoalCategory, OpenFinanceAccount,
    OpenFinanceTransaction, PortfolioSummary, Priority,
};
use raiox::open_finance::MemoryOpenFinance;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
}

pub struct Harness {
    pub backend: Arc<MemoryBackend>,
    pub open_finance: Arc<MemoryOpenFinance>,
    pub assembler: DashboardAssembler,
}

/// Assembler over in-memory collaborators with the clock pinned to
/// [`today`]. Open Finance is enabled.
pub fn harness() -> Harness {
    harness_with(AssemblerOptions {
        open_finance_enabled: true,
        ..AssemblerOptions::default()
    })
}

pub fn harness_with(options: AssemblerOptions) -> Harness {
    let backend = Arc::new(MemoryBackend::new());
    let open_finance = Arc::new(MemoryOpenFinance::new());
    let assembler = DashboardAssembler::new(
        backend.clone(),
        Arc::new(DefaultDataSet::demo(today())),
    )
    .with_open_finance(open_finance.clone())
    .with_clock(Arc::new(FixedClock::on(today())))
    .with_options(options);
    Harness {
        backend,
        open_finance,
        assembler,
    }
}

pub fn dividend(asset: &str, date: &str, value: f64) -> DividendRecord {
    DividendRecord::new(asset, date, value, DataSource::Supabase)
}

pub fn portfolio() -> PortfolioSummary {
    PortfolioSummary::from_values(
        [60_000.0, 30_000.0, 5_000.0, 5_000.0, 0.0],
        DataSource::Supabase,
    )
}

pub fn goal(name: &str, category: GoalCategory, target: f64, current: f64) -> FinancialGoal {
    FinancialGoal {
        id: name.to_lowercase(),
        name: name.to_string(),
        target_amount: target,
        current_amount: current,
        deadline: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        priority: Priority::High,
        category,
        monthly_contribution: 500.0,
        achievable: true,
        required_return: 6.0,
        source: DataSource::Supabase,
    }
}

pub fn account(institution: &str, balance: f64) -> OpenFinanceAccount {
    OpenFinanceAccount {
        id: format!("{}-acct", institution.to_lowercase()),
        institution: institution.to_string(),
        kind: "checking".to_string(),
        balance,
    }
}

pub fn earning(
    account_id: &str,
    date: NaiveDate,
    description: &str,
    amount: f64,
) -> OpenFinanceTransaction {
    OpenFinanceTransaction {
        id: format!("{description}-{date}"),
        account_id: account_id.to_string(),
        date,
        description: description.to_string(),
        amount,
        kind: "Dividendo".to_string(),
    }
}

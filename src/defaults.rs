//! Synthetic fallback data shown when a client has no real data.
//!
//! A [`DefaultDataSet`] is built once and handed to the assembler; tests can
//! construct their own instead of patching shared state.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate, TimeZone, Utc};

use crate::models::{
    AIInsight, ClientId, DataSource, DividendRecord, FinancialGoal, GoalCategory, InsightAgent,
    InsightCategory, PortfolioSummary, PortfolioValuePoint, Priority, ProfileSummary,
};

/// Demo accounts with their own synthetic profiles.
pub const DEMO_CLIENT_IDS: [ClientId; 3] = [
    ClientId::new(1001),
    ClientId::new(1002),
    ClientId::new(1003),
];

/// Fully synthetic data for one client. Every entity is tagged
/// [`DataSource::Synthetic`].
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticClientData {
    pub portfolio: PortfolioSummary,
    pub dividends: Vec<DividendRecord>,
    pub profile: ProfileSummary,
    pub history: Vec<PortfolioValuePoint>,
    pub goals: Vec<FinancialGoal>,
    pub insights: Vec<AIInsight>,
}

#[derive(Debug, Clone)]
pub struct DefaultDataSet {
    generic: SyntheticClientData,
    clients: HashMap<ClientId, SyntheticClientData>,
}

impl DefaultDataSet {
    pub fn new(generic: SyntheticClientData) -> Self {
        Self {
            generic,
            clients: HashMap::new(),
        }
    }

    pub fn with_client(mut self, client: ClientId, data: SyntheticClientData) -> Self {
        self.clients.insert(client, data);
        self
    }

    /// Demo data set anchored at `reference`: twelve months of dividends and
    /// history ending the month before it.
    pub fn demo(reference: NaiveDate) -> Self {
        let generic = Profile::MODERATE.build(500_000.0, reference);
        Self::new(generic)
            .with_client(DEMO_CLIENT_IDS[0], Profile::CONSERVATIVE.build(250_000.0, reference))
            .with_client(DEMO_CLIENT_IDS[1], Profile::MODERATE.build(850_000.0, reference))
            .with_client(DEMO_CLIENT_IDS[2], Profile::AGGRESSIVE.build(2_400_000.0, reference))
    }

    /// Client-specific data for demo ids, the generic set otherwise.
    pub fn for_client(&self, client: ClientId) -> &SyntheticClientData {
        self.clients.get(&client).unwrap_or(&self.generic)
    }

    pub fn is_demo_client(&self, client: ClientId) -> bool {
        self.clients.contains_key(&client)
    }
}

struct Profile {
    name: &'static str,
    summary: &'static str,
    tags: [&'static str; 3],
    /// Share per asset class, in `AssetClass::ALL` order; sums to 1.
    weights: [f64; 5],
    /// Annual dividend yield on the equity + real estate sleeve.
    yield_on_income_assets: f64,
}

impl Profile {
    const CONSERVATIVE: Profile = Profile {
        name: "conservador",
        summary: "Investidor conservador focado em preservação de capital e liquidez.",
        tags: ["renda fixa", "reserva de emergência", "baixo risco"],
        weights: [0.70, 0.10, 0.10, 0.08, 0.02],
        yield_on_income_assets: 0.08,
    };

    const MODERATE: Profile = Profile {
        name: "moderado",
        summary: "Investidor moderado buscando equilíbrio entre renda e crescimento.",
        tags: ["diversificação", "dividendos", "longo prazo"],
        weights: [0.40, 0.30, 0.15, 0.10, 0.05],
        yield_on_income_assets: 0.07,
    };

    const AGGRESSIVE: Profile = Profile {
        name: "arrojado",
        summary: "Investidor arrojado com foco em crescimento e exposição internacional.",
        tags: ["ações", "internacional", "crescimento"],
        weights: [0.15, 0.45, 0.10, 0.10, 0.20],
        yield_on_income_assets: 0.05,
    };

    fn build(&self, total: f64, reference: NaiveDate) -> SyntheticClientData {
        let values = self.weights.map(|w| (total * w).round());
        let portfolio = PortfolioSummary::from_values(values, DataSource::Synthetic);
        let income_assets = values[1] + values[3];
        let monthly_income = (income_assets * self.yield_on_income_assets / 12.0).round();

        SyntheticClientData {
            dividends: synthetic_dividends(monthly_income, reference),
            history: synthetic_history(portfolio.total_portfolio_value, reference),
            goals: synthetic_goals(portfolio.total_portfolio_value, reference),
            insights: synthetic_insights(reference),
            profile: ProfileSummary {
                summary: self.summary.to_string(),
                tags: self.tags.iter().map(|t| t.to_string()).collect(),
                investor_profile: Some(self.name.to_string()),
                source: DataSource::Synthetic,
            },
            portfolio,
        }
    }
}

fn month_start_before(reference: NaiveDate, months_back: u32) -> NaiveDate {
    let first = reference.with_day(1).unwrap_or(reference);
    first
        .checked_sub_months(Months::new(months_back))
        .unwrap_or(first)
}

const DIVIDEND_PAYERS: [(&str, f64); 4] = [
    ("ITSA4", 0.35),
    ("TAEE11", 0.25),
    ("BBAS3", 0.25),
    ("HGLG11", 0.15),
];

fn synthetic_dividends(monthly_income: f64, reference: NaiveDate) -> Vec<DividendRecord> {
    let mut records = Vec::new();
    for months_back in (1..=12).rev() {
        let month = month_start_before(reference, months_back);
        for (i, (asset, share)) in DIVIDEND_PAYERS.iter().enumerate() {
            let day = month.with_day(5 + 5 * i as u32).unwrap_or(month);
            let kind = if *asset == "HGLG11" { "Rendimento" } else { "Dividend" };
            records.push(
                DividendRecord::new(
                    *asset,
                    day.format("%Y-%m-%d").to_string(),
                    (monthly_income * share * 100.0).round() / 100.0,
                    DataSource::Synthetic,
                )
                .with_kind(kind),
            );
        }
    }
    records
}

fn synthetic_history(total: f64, reference: NaiveDate) -> Vec<PortfolioValuePoint> {
    // Linear growth of 0.8% per month up to the current total.
    (0..12u32)
        .rev()
        .map(|months_back| PortfolioValuePoint {
            date: month_start_before(reference, months_back),
            value: (total / (1.0 + 0.008 * months_back as f64)).round(),
        })
        .collect()
}

fn years_after(reference: NaiveDate, years: u32) -> NaiveDate {
    reference
        .checked_add_months(Months::new(12 * years))
        .unwrap_or(reference)
}

fn synthetic_goals(total: f64, reference: NaiveDate) -> Vec<FinancialGoal> {
    let goal = |id: &str,
                name: &str,
                category: GoalCategory,
                priority: Priority,
                target: f64,
                current: f64,
                years: u32,
                monthly: f64,
                achievable: bool,
                required_return: f64| FinancialGoal {
        id: id.to_string(),
        name: name.to_string(),
        target_amount: target.round(),
        current_amount: current.round(),
        deadline: years_after(reference, years),
        priority,
        category,
        monthly_contribution: monthly.round(),
        achievable,
        required_return,
        source: DataSource::Synthetic,
    };
    vec![
        goal(
            "demo-emergency",
            "Reserva de emergência",
            GoalCategory::Emergency,
            Priority::High,
            total * 0.10,
            total * 0.08,
            1,
            total * 0.002,
            true,
            4.5,
        ),
        goal(
            "demo-retirement",
            "Aposentadoria",
            GoalCategory::Retirement,
            Priority::High,
            total * 4.0,
            total * 0.6,
            20,
            total * 0.006,
            true,
            7.2,
        ),
        goal(
            "demo-travel",
            "Viagem internacional",
            GoalCategory::Travel,
            Priority::Low,
            total * 0.05,
            total * 0.01,
            2,
            total * 0.001,
            false,
            18.0,
        ),
    ]
}

fn synthetic_insights(reference: NaiveDate) -> Vec<AIInsight> {
    let ts = Utc
        .from_utc_datetime(&reference.and_hms_opt(9, 0, 0).unwrap_or_default());
    vec![
        AIInsight::new(
            InsightCategory::Allocation,
            "Diversificação equilibrada",
            "Sua carteira distribui o risco entre renda fixa, ações e fundos imobiliários.",
            ts,
            DataSource::Synthetic,
        )
        .with_priority(Priority::Medium)
        .with_agent(InsightAgent::Investor),
        AIInsight::new(
            InsightCategory::Goal,
            "Reserva de emergência quase completa",
            "Faltam poucos aportes para completar seis meses de despesas guardados.",
            ts,
            DataSource::Synthetic,
        )
        .with_priority(Priority::High)
        .with_agent(InsightAgent::Planner),
        AIInsight::new(
            InsightCategory::Tax,
            "Isenção de IR em dividendos",
            "Dividendos de ações brasileiras são isentos de imposto de renda para pessoa física.",
            ts,
            DataSource::Synthetic,
        )
        .with_priority(Priority::Low)
        .with_agent(InsightAgent::Planner)
        .seen(),
    ]
}

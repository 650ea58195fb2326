//! Untyped backend rows and their conversion into typed entities.
//!
//! Rows are deserialized leniently (every column optional, numerics as
//! [`RawNumber`]) and converted immediately; nothing past this module sees
//! stringly-typed data.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{
    DataSource, DividendRecord, FinancialGoal, GoalCategory, PortfolioSummary,
    PortfolioValuePoint, Priority, ProfileSummary, DEFAULT_DIVIDEND_KIND,
};
use crate::normalize::{to_number, RawNumber};

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split(|c: char| c == ' ' || c == 'T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPortfolioRow {
    #[serde(alias = "renda_fixa")]
    pub fixed_income: RawNumber,
    #[serde(alias = "acoes")]
    pub equities: RawNumber,
    #[serde(alias = "fundos")]
    pub funds: RawNumber,
    #[serde(alias = "fiis")]
    pub real_estate: RawNumber,
    #[serde(alias = "internacional")]
    pub international: RawNumber,
    #[serde(alias = "total")]
    pub total_portfolio_value: RawNumber,
}

impl RawPortfolioRow {
    pub fn into_summary(self, source: DataSource) -> PortfolioSummary {
        let values = [
            to_number(&self.fixed_income),
            to_number(&self.equities),
            to_number(&self.funds),
            to_number(&self.real_estate),
            to_number(&self.international),
        ];
        PortfolioSummary::from_values(values, source)
            .with_total(to_number(&self.total_portfolio_value))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDividendRow {
    #[serde(alias = "ticker", alias = "ativo")]
    pub asset: Option<String>,
    #[serde(alias = "data_pagamento", alias = "date")]
    pub payment_date: Option<String>,
    #[serde(rename = "type", alias = "tipo")]
    pub kind: Option<String>,
    #[serde(alias = "valor")]
    pub value: RawNumber,
    #[serde(alias = "quantidade")]
    pub quantity: RawNumber,
}

impl RawDividendRow {
    /// Rows without an asset are rejected. A missing or malformed payment
    /// date is kept verbatim.
    pub fn into_record(self, source: DataSource) -> Result<DividendRecord, String> {
        let asset = non_empty(self.asset).ok_or_else(|| "dividend row without asset".to_string())?;
        let mut record = DividendRecord::new(
            asset,
            self.payment_date.unwrap_or_default().trim(),
            to_number(&self.value),
            source,
        )
        .with_kind(self.kind.unwrap_or_else(|| DEFAULT_DIVIDEND_KIND.to_string()));
        if !self.quantity.is_missing() {
            record = record.with_quantity(to_number(&self.quantity));
        }
        Ok(record)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProfileRow {
    #[serde(alias = "resumo")]
    pub summary: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(alias = "perfil")]
    pub investor_profile: Option<String>,
}

impl RawProfileRow {
    pub fn into_profile(self, source: DataSource) -> Result<ProfileSummary, String> {
        let summary =
            non_empty(self.summary).ok_or_else(|| "profile row without summary".to_string())?;
        let tags = self
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(ProfileSummary {
            summary,
            tags,
            investor_profile: non_empty(self.investor_profile),
            source,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHistoryRow {
    #[serde(alias = "data")]
    pub date: Option<String>,
    #[serde(alias = "valor")]
    pub value: RawNumber,
}

impl RawHistoryRow {
    pub fn into_point(self) -> Result<PortfolioValuePoint, String> {
        let raw = self.date.unwrap_or_default();
        let date = parse_day(&raw).ok_or_else(|| format!("invalid history date {raw:?}"))?;
        Ok(PortfolioValuePoint {
            date,
            value: to_number(&self.value),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawGoalRow {
    pub id: Option<serde_json::Value>,
    #[serde(alias = "title", alias = "nome")]
    pub name: Option<String>,
    pub target_amount: RawNumber,
    pub current_amount: RawNumber,
    pub deadline: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub monthly_contribution: RawNumber,
    pub achievable: Option<bool>,
    pub required_return: RawNumber,
}

impl RawGoalRow {
    /// Goals need a name and a parseable deadline. Unknown priorities default
    /// to medium; unknown categories to `Other`.
    pub fn into_goal(self, source: DataSource) -> Result<FinancialGoal, String> {
        let name = non_empty(self.name).ok_or_else(|| "goal row without name".to_string())?;
        let raw_deadline = self.deadline.unwrap_or_default();
        let deadline = parse_day(&raw_deadline)
            .ok_or_else(|| format!("goal {name:?} has invalid deadline {raw_deadline:?}"))?;
        let id = match self.id {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => name.to_lowercase().replace(' ', "-"),
        };
        Ok(FinancialGoal {
            id,
            name,
            target_amount: to_number(&self.target_amount),
            current_amount: to_number(&self.current_amount),
            deadline,
            priority: self
                .priority
                .as_deref()
                .and_then(Priority::parse)
                .unwrap_or(Priority::Medium),
            category: self
                .category
                .as_deref()
                .map_or(GoalCategory::Other, GoalCategory::parse),
            monthly_contribution: to_number(&self.monthly_contribution),
            achievable: self.achievable.unwrap_or(false),
            required_return: to_number(&self.required_return),
            source,
        })
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    FixedIncome,
    Equities,
    Funds,
    RealEstate,
    International,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::FixedIncome,
        AssetClass::Equities,
        AssetClass::Funds,
        AssetClass::RealEstate,
        AssetClass::International,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AssetClass::FixedIncome => "Renda Fixa",
            AssetClass::Equities => "Ações",
            AssetClass::Funds => "Fundos",
            AssetClass::RealEstate => "Fundos Imobiliários",
            AssetClass::International => "Internacional",
        }
    }
}

/// Value held in one asset class and its share of the total, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Allocation {
    pub value: f64,
    pub percentage: f64,
}

/// Snapshot of a client's holdings by asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub fixed_income: Allocation,
    pub equities: Allocation,
    pub funds: Allocation,
    pub real_estate: Allocation,
    pub international: Allocation,
    pub total_portfolio_value: f64,
    pub source: DataSource,
}

impl PortfolioSummary {
    /// Build a summary from per-class values, deriving the total and
    /// percentages. Values are in [`AssetClass::ALL`] order.
    pub fn from_values(values: [f64; 5], source: DataSource) -> Self {
        let total: f64 = values.iter().sum();
        let alloc = |value: f64| Allocation {
            value,
            percentage: if total > 0.0 { value / total * 100.0 } else { 0.0 },
        };
        Self {
            fixed_income: alloc(values[0]),
            equities: alloc(values[1]),
            funds: alloc(values[2]),
            real_estate: alloc(values[3]),
            international: alloc(values[4]),
            total_portfolio_value: total,
            source,
        }
    }

    /// Replace the total with an externally reported figure and recompute
    /// percentages against it. Non-positive totals are ignored.
    pub fn with_total(mut self, total: f64) -> Self {
        if total <= 0.0 || !total.is_finite() {
            return self;
        }
        self.total_portfolio_value = total;
        for alloc in [
            &mut self.fixed_income,
            &mut self.equities,
            &mut self.funds,
            &mut self.real_estate,
            &mut self.international,
        ] {
            alloc.percentage = alloc.value / total * 100.0;
        }
        self
    }

    pub fn allocation(&self, class: AssetClass) -> Allocation {
        match class {
            AssetClass::FixedIncome => self.fixed_income,
            AssetClass::Equities => self.equities,
            AssetClass::Funds => self.funds,
            AssetClass::RealEstate => self.real_estate,
            AssetClass::International => self.international,
        }
    }

    pub fn allocations(&self) -> impl Iterator<Item = (AssetClass, Allocation)> + '_ {
        AssetClass::ALL
            .into_iter()
            .map(|class| (class, self.allocation(class)))
    }

    /// Asset class with the largest share, if the portfolio holds anything.
    pub fn largest_class(&self) -> Option<(AssetClass, Allocation)> {
        self.allocations()
            .filter(|(_, a)| a.value > 0.0)
            .max_by(|(_, a), (_, b)| a.percentage.total_cmp(&b.percentage))
    }

    pub fn is_empty(&self) -> bool {
        self.total_portfolio_value <= 0.0 && self.allocations().all(|(_, a)| a.value <= 0.0)
    }
}

/// One point of the portfolio-value time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Free-text investor profile summary with tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investor_profile: Option<String>,
    pub source: DataSource,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" | "alta" => Some(Priority::High),
            "medium" | "media" | "média" => Some(Priority::Medium),
            "low" | "baixa" => Some(Priority::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Emergency,
    Housing,
    Education,
    Retirement,
    Travel,
    Vehicle,
    Business,
    Other,
}

impl GoalCategory {
    /// Unknown categories map to `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "emergency" => GoalCategory::Emergency,
            "housing" => GoalCategory::Housing,
            "education" => GoalCategory::Education,
            "retirement" => GoalCategory::Retirement,
            "travel" => GoalCategory::Travel,
            "vehicle" => GoalCategory::Vehicle,
            "business" => GoalCategory::Business,
            _ => GoalCategory::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDate,
    pub priority: Priority,
    pub category: GoalCategory,
    pub monthly_contribution: f64,
    /// Judgment supplied by the planner; not derived here.
    pub achievable: bool,
    /// Annual return (percent) needed to reach the target on time.
    pub required_return: f64,
    pub source: DataSource,
}

impl FinancialGoal {
    /// `current / target * 100`, never negative. A non-positive target
    /// yields 0.
    pub fn progress(&self) -> f64 {
        progress_percent(self.current_amount, self.target_amount)
    }

    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }
}

pub fn progress_percent(current: f64, target: f64) -> f64 {
    if target <= 0.0 || !target.is_finite() {
        return 0.0;
    }
    (current / target * 100.0).max(0.0)
}

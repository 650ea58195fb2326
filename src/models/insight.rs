use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DataSource, Priority};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Risk,
    Opportunity,
    Goal,
    Education,
    Tax,
    Budget,
    Allocation,
    Savings,
}

/// Specialist that produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightAgent {
    Planner,
    Investor,
    /// ESG/agribusiness specialist.
    Farmer,
    Insurancer,
    Credit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIInsight {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: InsightCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<InsightAgent>,
    pub timestamp: DateTime<Utc>,
    pub is_new: bool,
    pub source: DataSource,
}

impl AIInsight {
    const NAMESPACE: Uuid = Uuid::from_u128(0x2f1c_7a4e_90b3_4d6e_a1f8_5c3e_7b92_d401);

    /// Build an insight with an id derived from its category and title, so
    /// regenerating the same insight keeps its identity.
    pub fn new(
        category: InsightCategory,
        title: impl Into<String>,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
        source: DataSource,
    ) -> Self {
        let title = title.into();
        let key = format!("{category:?}:{title}");
        Self {
            id: Uuid::new_v5(&Self::NAMESPACE, key.as_bytes()).to_string(),
            title,
            description: description.into(),
            category,
            priority: None,
            agent: None,
            timestamp,
            is_new: true,
            source,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_agent(mut self, agent: InsightAgent) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn seen(mut self) -> Self {
        self.is_new = false;
        self
    }
}

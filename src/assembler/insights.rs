use serde::{Deserialize, Serialize};

use crate::models::{AIInsight, DataSource, InsightCategory, Sourced};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: InsightCategory,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsPanel {
    pub insights: Sourced<Vec<AIInsight>>,
    pub new_count: usize,
    /// Most frequent category first.
    pub by_category: Vec<CategoryCount>,
}

impl InsightsPanel {
    /// Uses generated insights when there are any, the synthetic set
    /// otherwise.
    pub fn build(generated: Vec<AIInsight>, synthetic: &[AIInsight]) -> Self {
        let insights = if generated.is_empty() {
            Sourced::synthetic(synthetic.to_vec())
        } else {
            Sourced::new(generated, DataSource::Calculated)
        };
        Self::from_sourced(insights)
    }

    fn from_sourced(insights: Sourced<Vec<AIInsight>>) -> Self {
        let insights = insights.map(|mut list| {
            // Unprioritized insights sort after `Low`.
            list.sort_by(|a, b| match (a.priority, b.priority) {
                (Some(pa), Some(pb)) => pa.cmp(&pb),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| b.timestamp.cmp(&a.timestamp)));
            list
        });

        let new_count = insights.value.iter().filter(|i| i.is_new).count();
        let mut by_category: Vec<CategoryCount> = Vec::new();
        for insight in &insights.value {
            match by_category.iter_mut().find(|c| c.category == insight.category) {
                Some(entry) => entry.count += 1,
                None => by_category.push(CategoryCount {
                    category: insight.category,
                    count: 1,
                }),
            }
        }
        by_category.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            insights,
            new_count,
            by_category,
        }
    }

    pub fn filter(&self, category: InsightCategory) -> Vec<&AIInsight> {
        self.insights
            .value
            .iter()
            .filter(|i| i.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.insights.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insights.value.is_empty()
    }
}

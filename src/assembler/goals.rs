use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{progress_percent, DataSource, FinancialGoal, Sourced};
use crate::provenance::resolve_with;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalView {
    pub goal: FinancialGoal,
    /// Percent of the target reached, never negative.
    pub progress: f64,
}

impl From<FinancialGoal> for GoalView {
    fn from(goal: FinancialGoal) -> Self {
        let progress = goal.progress();
        Self { goal, progress }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalsSummary {
    pub total_target: f64,
    pub total_current: f64,
    pub overall_progress: f64,
    pub achievable_count: usize,
    pub total_count: usize,
    pub next_deadline: Option<NaiveDate>,
    pub monthly_contribution: f64,
}

impl GoalsSummary {
    pub fn compute(goals: &[FinancialGoal]) -> Self {
        let total_target = goals.iter().map(|g| g.target_amount).sum();
        let total_current = goals.iter().map(|g| g.current_amount).sum();
        Self {
            total_target,
            total_current,
            overall_progress: progress_percent(total_current, total_target),
            achievable_count: goals.iter().filter(|g| g.achievable).count(),
            total_count: goals.len(),
            next_deadline: goals.iter().map(|g| g.deadline).min(),
            monthly_contribution: goals.iter().map(|g| g.monthly_contribution).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalsPanel {
    pub goals: Sourced<Vec<GoalView>>,
    pub summary: Sourced<GoalsSummary>,
}

impl GoalsPanel {
    /// Goals ordered by priority, then nearest deadline.
    pub fn build(real: Option<Vec<FinancialGoal>>, synthetic: &[FinancialGoal]) -> Self {
        let goals = resolve_with(real, || synthetic.to_vec(), DataSource::Supabase);
        let summary = if goals.is_real() {
            Sourced::new(GoalsSummary::compute(&goals.value), DataSource::Calculated)
        } else {
            Sourced::synthetic(GoalsSummary::compute(&goals.value))
        };
        let goals = goals.map(|mut goals| {
            goals.sort_by(|a, b| {
                a.priority
                    .cmp(&b.priority)
                    .then_with(|| a.deadline.cmp(&b.deadline))
            });
            goals.into_iter().map(GoalView::from).collect()
        });
        Self { goals, summary }
    }

    pub fn is_empty(&self) -> bool {
        self.goals.value.is_empty()
    }
}

//! Insight generation over a client's assembled data.

use chrono::{DateTime, Utc};

use crate::config::DisplayConfig;
use crate::dividends::{
    monthly_average, total_by_asset, total_dividends, DEFAULT_MONTHS_TO_CONSIDER,
};
use crate::format::{format_currency_display, format_percent};
use crate::models::{
    AIInsight, ClientId, DataSource, DividendRecord, FinancialGoal, GoalCategory, InsightAgent,
    InsightCategory, PortfolioSummary, Priority,
};

/// Real inputs available to an insight generator. Synthetic fallbacks are
/// never passed in.
#[derive(Debug, Clone)]
pub struct InsightContext<'a> {
    pub client: ClientId,
    pub portfolio: Option<&'a PortfolioSummary>,
    pub dividends: &'a [DividendRecord],
    pub goals: &'a [FinancialGoal],
    /// Cash held in linked bank accounts.
    pub linked_cash: Option<f64>,
    pub now: DateTime<Utc>,
}

impl InsightContext<'_> {
    pub fn has_real_input(&self) -> bool {
        self.portfolio.is_some() || !self.dividends.is_empty() || !self.goals.is_empty()
    }
}

pub trait InsightGenerator: Send + Sync {
    fn generate(&self, context: &InsightContext<'_>) -> Vec<AIInsight>;
}

/// Threshold-based rules over allocation, goals and dividend income.
#[derive(Debug, Clone)]
pub struct RuleBasedInsights {
    /// Largest asset-class share (percent) above which concentration is flagged.
    pub concentration_limit: f64,
    /// International share (percent) below which diversification is suggested.
    pub min_international: f64,
    /// Share of dividend income from one asset (percent) flagged as dependency.
    pub payer_concentration_limit: f64,
    /// Linked cash as a share of the portfolio (percent) flagged as idle.
    pub idle_cash_limit: f64,
    /// Currency rendering used in insight descriptions.
    pub display: DisplayConfig,
}

impl Default for RuleBasedInsights {
    fn default() -> Self {
        Self {
            concentration_limit: 50.0,
            min_international: 5.0,
            payer_concentration_limit: 50.0,
            idle_cash_limit: 20.0,
            display: DisplayConfig::default(),
        }
    }
}

impl RuleBasedInsights {
    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    fn currency(&self, value: f64) -> String {
        format_currency_display(Some(value), &self.display)
    }

    fn portfolio_rules(&self, ctx: &InsightContext<'_>, out: &mut Vec<AIInsight>) {
        let Some(portfolio) = ctx.portfolio.filter(|p| !p.is_empty()) else {
            return;
        };

        if let Some((class, alloc)) = portfolio.largest_class() {
            if alloc.percentage > self.concentration_limit {
                out.push(
                    insight(
                        ctx,
                        InsightCategory::Risk,
                        format!("Concentração em {}", class.label()),
                        format!(
                            "{} da carteira está em {}. Considere rebalancear para reduzir o \
                            risco.",
                            format_percent(Some(alloc.percentage), 1),
                            class.label()
                        ),
                    )
                    .with_priority(Priority::High)
                    .with_agent(InsightAgent::Investor),
                );
            }
        }

        if portfolio.international.percentage < self.min_international {
            out.push(
                insight(
                    ctx,
                    InsightCategory::Opportunity,
                    "Diversificação internacional",
                    format!(
                        "Apenas {} da carteira está no exterior. Ativos internacionais reduzem a \
                        dependência do mercado local.",
                        format_percent(Some(portfolio.international.percentage), 1)
                    ),
                )
                .with_priority(Priority::Medium)
                .with_agent(InsightAgent::Investor),
            );
        }

        let total = portfolio.total_portfolio_value;
        if let Some(cash) = ctx.linked_cash.filter(|c| *c > 0.0 && total > 0.0) {
            let share = cash / total * 100.0;
            if share > self.idle_cash_limit {
                out.push(
                    insight(
                        ctx,
                        InsightCategory::Savings,
                        "Dinheiro parado em conta",
                        format!(
                            "{} em contas vinculadas equivale a {} da carteira. Avalie aplicar o \
                            excedente.",
                            self.currency(cash),
                            format_percent(Some(share), 1)
                        ),
                    )
                    .with_priority(Priority::Medium)
                    .with_agent(InsightAgent::Planner),
                );
            }
        }
    }

    fn goal_rules(&self, ctx: &InsightContext<'_>, out: &mut Vec<AIInsight>) {
        if ctx.goals.is_empty() {
            return;
        }

        match ctx
            .goals
            .iter()
            .find(|g| g.category == GoalCategory::Emergency)
        {
            Some(emergency) if emergency.progress() < 50.0 => out.push(
                insight(
                    ctx,
                    InsightCategory::Goal,
                    "Reforce sua reserva de emergência",
                    format!(
                        "A reserva está em {} da meta. Priorize aportes antes de investimentos de \
                        maior risco.",
                        format_percent(Some(emergency.progress()), 0)
                    ),
                )
                .with_priority(Priority::High)
                .with_agent(InsightAgent::Planner),
            ),
            Some(_) => {}
            None => out.push(
                insight(
                    ctx,
                    InsightCategory::Education,
                    "Crie uma reserva de emergência",
                    "Nenhuma meta de reserva foi encontrada. O ideal é manter de 6 a 12 meses de \
                    despesas em liquidez diária.",
                )
                .with_priority(Priority::Medium)
                .with_agent(InsightAgent::Planner),
            ),
        }

        for goal in ctx.goals.iter().filter(|g| !g.achievable) {
            out.push(
                insight(
                    ctx,
                    InsightCategory::Goal,
                    format!("Meta \"{}\" precisa de ajustes", goal.name),
                    format!(
                        "Seriam necessários {} ao ano de retorno. Aumente o aporte mensal de {} \
                        ou estenda o prazo.",
                        format_percent(Some(goal.required_return), 1),
                        self.currency(goal.monthly_contribution)
                    ),
                )
                .with_priority(goal.priority)
                .with_agent(InsightAgent::Planner),
            );
        }
    }

    fn dividend_rules(&self, ctx: &InsightContext<'_>, out: &mut Vec<AIInsight>) {
        let total = total_dividends(ctx.dividends);
        if total <= 0.0 {
            return;
        }

        let average = monthly_average(ctx.dividends, DEFAULT_MONTHS_TO_CONSIDER);
        out.push(
            insight(
                ctx,
                InsightCategory::Opportunity,
                "Renda passiva com dividendos",
                format!(
                    "Sua carteira gera em média {} por mês em proventos. Reinvestir acelera o \
                    efeito dos juros compostos.",
                    self.currency(average)
                ),
            )
            .with_priority(Priority::Low)
            .with_agent(InsightAgent::Investor),
        );

        if let Some(top) = total_by_asset(ctx.dividends).first() {
            let share = top.amount / total * 100.0;
            if share > self.payer_concentration_limit {
                out.push(
                    insight(
                        ctx,
                        InsightCategory::Risk,
                        format!("Proventos concentrados em {}", top.asset),
                        format!(
                            "{} dos proventos vêm de um único ativo.",
                            format_percent(Some(share), 1)
                        ),
                    )
                    .with_priority(Priority::Medium)
                    .with_agent(InsightAgent::Investor),
                );
            }
        }

        if ctx
            .dividends
            .iter()
            .any(|d| {
                let kind = d.kind.to_lowercase();
                kind.contains("jcp") || kind.contains("juros")
            })
        {
            out.push(
                insight(
                    ctx,
                    InsightCategory::Tax,
                    "JCP tem imposto retido na fonte",
                    "Juros sobre capital próprio sofrem retenção de 15% de IR, ao contrário dos \
                    dividendos.",
                )
                .with_priority(Priority::Low)
                .with_agent(InsightAgent::Planner),
            );
        }
    }
}

fn insight(
    ctx: &InsightContext<'_>,
    category: InsightCategory,
    title: impl Into<String>,
    description: impl Into<String>,
) -> AIInsight {
    AIInsight::new(category, title, description, ctx.now, DataSource::Calculated)
}

impl InsightGenerator for RuleBasedInsights {
    fn generate(&self, context: &InsightContext<'_>) -> Vec<AIInsight> {
        let mut out = Vec::new();
        self.portfolio_rules(context, &mut out);
        self.goal_rules(context, &mut out);
        self.dividend_rules(context, &mut out);
        tracing::debug!(client = %context.client, count = out.len(), "Generated insights");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    fn ctx<'a>(
        portfolio: Option<&'a PortfolioSummary>,
        dividends: &'a [DividendRecord],
        goals: &'a [FinancialGoal],
    ) -> InsightContext<'a> {
        InsightContext {
            client: ClientId::new(1),
            portfolio,
            dividends,
            goals,
            linked_cash: None,
            now: now(),
        }
    }

    fn goal(category: GoalCategory, current: f64, achievable: bool) -> FinancialGoal {
        FinancialGoal {
            id: format!("{category:?}"),
            name: format!("{category:?}"),
            target_amount: 100.0,
            current_amount: current,
            deadline: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            priority: Priority::Medium,
            category,
            monthly_contribution: 10.0,
            achievable,
            required_return: 25.0,
            source: DataSource::Supabase,
        }
    }

    fn titles(insights: &[AIInsight]) -> Vec<&str> {
        insights.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn no_input_means_no_insights() {
        let context = ctx(None, &[], &[]);
        assert!(!context.has_real_input());
        assert!(RuleBasedInsights::default().generate(&context).is_empty());
    }

    #[test]
    fn flags_concentration_and_missing_international() {
        let portfolio =
            PortfolioSummary::from_values([80.0, 20.0, 0.0, 0.0, 0.0], DataSource::Supabase);
        let insights = RuleBasedInsights::default().generate(&ctx(Some(&portfolio), &[], &[]));
        let titles = titles(&insights);
        assert!(titles.contains(&"Concentração em Renda Fixa"));
        assert!(titles.contains(&"Diversificação internacional"));
        assert!(insights.iter().all(|i| i.source == DataSource::Calculated));
        assert!(insights.iter().all(|i| i.is_new));
    }

    #[test]
    fn balanced_portfolio_is_not_flagged() {
        let portfolio =
            PortfolioSummary::from_values([30.0, 30.0, 20.0, 10.0, 10.0], DataSource::Supabase);
        let insights = RuleBasedInsights::default().generate(&ctx(Some(&portfolio), &[], &[]));
        assert!(insights.is_empty());
    }

    #[test]
    fn idle_cash_is_flagged_against_portfolio_total() {
        let portfolio =
            PortfolioSummary::from_values([30.0, 30.0, 20.0, 10.0, 10.0], DataSource::Supabase);
        let mut context = ctx(Some(&portfolio), &[], &[]);
        context.linked_cash = Some(50.0);
        let insights = RuleBasedInsights::default().generate(&context);
        assert_eq!(titles(&insights), vec!["Dinheiro parado em conta"]);
        assert_eq!(insights[0].category, InsightCategory::Savings);
    }

    #[test]
    fn idle_cash_needs_a_positive_total() {
        let portfolio =
            PortfolioSummary::from_values([100.0, -100.0, 0.0, 0.0, 0.0], DataSource::Supabase);
        assert!(!portfolio.is_empty());
        let mut context = ctx(Some(&portfolio), &[], &[]);
        context.linked_cash = Some(50.0);
        let insights = RuleBasedInsights::default().generate(&context);
        assert!(!titles(&insights).contains(&"Dinheiro parado em conta"));
    }

    #[test]
    fn descriptions_use_configured_currency() {
        let goals = vec![goal(GoalCategory::Emergency, 80.0, false)];
        let display = DisplayConfig {
            currency_symbol: Some("US$".to_string()),
            currency_decimals: 0,
            currency_grouping: false,
        };
        let insights = RuleBasedInsights::default()
            .with_display(display)
            .generate(&ctx(None, &[], &goals));
        let adjust = insights
            .iter()
            .find(|i| i.title.contains("precisa de ajustes"))
            .unwrap();
        assert!(adjust.description.contains("US$ 10"));
        assert!(!adjust.description.contains("R$"));
    }

    #[test]
    fn goal_rules_cover_emergency_and_unachievable_goals() {
        let goals = vec![
            goal(GoalCategory::Emergency, 20.0, true),
            goal(GoalCategory::Travel, 10.0, false),
        ];
        let insights = RuleBasedInsights::default().generate(&ctx(None, &[], &goals));
        let titles = titles(&insights);
        assert!(titles.contains(&"Reforce sua reserva de emergência"));
        assert!(titles.contains(&"Meta \"Travel\" precisa de ajustes"));
    }

    #[test]
    fn missing_emergency_goal_suggests_one() {
        let goals = vec![goal(GoalCategory::Retirement, 50.0, true)];
        let insights = RuleBasedInsights::default().generate(&ctx(None, &[], &goals));
        assert_eq!(titles(&insights), vec!["Crie uma reserva de emergência"]);
        assert_eq!(insights[0].category, InsightCategory::Education);
    }

    #[test]
    fn dividend_rules_report_income_concentration_and_jcp() {
        let dividends = vec![
            DividendRecord::new("PETR4", "2024-01-10", 90.0, DataSource::Supabase).with_kind("JCP"),
            DividendRecord::new("VALE3", "2024-02-10", 10.0, DataSource::Supabase),
        ];
        let insights = RuleBasedInsights::default().generate(&ctx(None, &dividends, &[]));
        let titles = titles(&insights);
        assert!(titles.contains(&"Renda passiva com dividendos"));
        assert!(titles.contains(&"Proventos concentrados em PETR4"));
        assert!(titles.contains(&"JCP tem imposto retido na fonte"));
    }
}

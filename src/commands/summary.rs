//! The summary command handler.

use crate::args::SummaryArgs;
use crate::commands::{money, open_session, Out};
use crate::ledger::{self, CategoryTotals, Totals};
use crate::model::{Amount, Category, CategoryFilter, Period};
use crate::{Config, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Everything the summary panel and the pie chart show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub totals: Totals,
    pub by_category: CategoryTotals,
    /// Pie chart magnitudes in `Category::ALL` order.
    pub chart: [Amount; 5],
    pub reference: NaiveDate,
    /// Spent in the month containing `reference`.
    pub month: Amount,
    /// Spent since the start of the week containing `reference`.
    pub week: Amount,
}

pub async fn summary(
    config: Config,
    user: Option<&str>,
    args: SummaryArgs,
) -> Result<Out<Summary>> {
    let session = open_session(&config, user).await?;
    let reference = args.date().unwrap_or_else(|| Local::now().date_naive());
    let totals = session.totals();
    let by_category = session.category_totals();
    let summary = Summary {
        totals,
        chart: ledger::chart_series(&by_category),
        by_category,
        reference,
        month: ledger::sum_amount(&session.view(&CategoryFilter::All, Period::Monthly, reference)),
        week: ledger::sum_amount(&session.view(&CategoryFilter::All, Period::Weekly, reference)),
    };

    if totals.over_budget {
        warn!(
            "You have exceeded your budget of {} by {}",
            money(&config, totals.budget),
            money(&config, totals.expense - totals.budget)
        );
    }
    Ok(Out::new(message(&config, &summary), summary))
}

fn message(config: &Config, s: &Summary) -> String {
    let budget = if s.totals.budget.is_zero() {
        "not set".to_string()
    } else {
        money(config, s.totals.budget)
    };
    let mut lines = vec![
        format!("Total income:   {}", money(config, s.totals.income)),
        format!("Total expense:  {}", money(config, s.totals.expense)),
        format!("Savings:        {}", money(config, s.totals.savings)),
        format!("Budget:         {budget}"),
        format!("This month:     {}", money(config, s.month)),
        format!("This week:      {}", money(config, s.week)),
        "By category:".to_string(),
    ];
    lines.extend(
        Category::ALL
            .iter()
            .map(|c| format!("  {:<15} {}", c.label(), money(config, s.by_category.get(*c)))),
    );
    if s.totals.over_budget {
        lines.push("You have exceeded your budget!".to_string());
    }
    lines.join("\n")
}

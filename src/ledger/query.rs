//! Filters and aggregates over an expense list.

use crate::model::{Amount, Category, CategoryFilter, Expenses, Period, Settings};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keeps the records whose category string equals the filter's name. `All` keeps everything.
pub fn filter_by_category(list: &Expenses, category: &CategoryFilter) -> Expenses {
    match category {
        CategoryFilter::All => list.clone(),
        CategoryFilter::Named(name) => list
            .iter()
            .filter(|e| e.category() == name)
            .cloned()
            .collect(),
    }
}

/// Keeps the records that fall in `period` relative to `reference`.
///
/// `Weekly` has no upper bound: records dated after `reference` are kept.
pub fn filter_by_period(list: &Expenses, period: Period, reference: NaiveDate) -> Expenses {
    match period {
        Period::All => list.clone(),
        Period::Monthly => list
            .iter()
            .filter(|e| {
                e.date().month() == reference.month() && e.date().year() == reference.year()
            })
            .cloned()
            .collect(),
        Period::Weekly => {
            let start = week_start(reference);
            list.iter().filter(|e| e.date() >= start).cloned().collect()
        }
    }
}

/// The Sunday on or before `reference`.
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    let offset = u64::from(reference.weekday().num_days_from_sunday());
    reference
        .checked_sub_days(Days::new(offset))
        .unwrap_or(NaiveDate::MIN)
}

/// Sum of every record's amount.
pub fn sum_amount(list: &Expenses) -> Amount {
    list.iter().map(|e| e.amount()).sum()
}

/// Per-category totals. Every requested category is present, with zero when nothing matches.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTotals(BTreeMap<Category, Amount>);

impl CategoryTotals {
    pub fn get(&self, category: Category) -> Amount {
        self.0.get(&category).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Amount)> + '_ {
        self.0.iter().map(|(c, a)| (*c, *a))
    }
}

/// For each of `categories`, the sum of the amounts of records whose category matches it.
pub fn sum_by_category(list: &Expenses, categories: &[Category]) -> CategoryTotals {
    CategoryTotals(
        categories
            .iter()
            .map(|category| {
                let total: Amount = list
                    .iter()
                    .filter(|e| category.matches(e.category()))
                    .map(|e| e.amount())
                    .sum();
                (*category, total)
            })
            .collect(),
    )
}

/// The five magnitudes a pie chart needs, aligned with `Category::ALL`.
pub fn chart_series(totals: &CategoryTotals) -> [Amount; 5] {
    Category::ALL.map(|c| totals.get(c))
}

/// Income minus everything spent.
pub fn compute_savings(income: Amount, list: &Expenses) -> Amount {
    income - sum_amount(list)
}

/// True when a budget is set and the list's total exceeds it.
pub fn over_budget(list: &Expenses, budget_limit: Amount) -> bool {
    budget_limit.is_positive() && sum_amount(list) > budget_limit
}

/// The session totals shown beside the list.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Totals {
    pub income: Amount,
    pub expense: Amount,
    pub savings: Amount,
    pub budget: Amount,
    pub over_budget: bool,
}

/// Computes the totals over the whole list using the user's income and budget.
pub fn totals(list: &Expenses, settings: &Settings) -> Totals {
    let expense = sum_amount(list);
    Totals {
        income: settings.income(),
        expense,
        savings: compute_savings(settings.income(), list),
        budget: settings.budget(),
        over_budget: over_budget(list, settings.budget()),
    }
}

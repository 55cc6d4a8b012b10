//! The expense ledger operations: pure functions over an `Expenses` list.
//!
//! - `mutate` - insert, update and delete, each returning a new list
//! - `query` - category and period filters, sums, savings and budget checks

mod mutate;
mod query;

pub use mutate::{delete_by_id, insert, update_by_id};
pub use query::{
    chart_series, compute_savings, filter_by_category, filter_by_period, over_budget, sum_amount,
    sum_by_category, totals, week_start, CategoryTotals, Totals,
};

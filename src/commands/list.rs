//! The list command handler and its output formats.

use crate::args::{ListArgs, OutputFormat};
use crate::commands::{money, open_session, plural, Out};
use crate::error::{IntoResult, Res};
use crate::model::{Expenses, DATE_FORMAT};
use crate::{Config, ErrorType, Result};
use anyhow::Context;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};
use tracing::debug;

const HEADERS: [&str; 5] = ["ID", "Name", "Amount", "Category", "Date"];
const EMPTY: &str = "No expenses to display";

/// Listed rows in the requested output format.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rows {
    /// JSON array of expense objects.
    Json(serde_json::Value),
    /// Aligned table as a single formatted string.
    Table(String),
    /// CSV data with a header row.
    Csv(String),
}

impl Debug for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => write!(f, "Rows::Json({v:?})"),
            Rows::Table(s) => write!(f, "Rows::Table({} chars)", s.len()),
            Rows::Csv(s) => write!(f, "Rows::Csv({} chars)", s.len()),
        }
    }
}

impl Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => match serde_json::to_string_pretty(v) {
                Ok(s) => write!(f, "{s}"),
                Err(_) => write!(f, "{v:?}"),
            },
            Rows::Table(s) => write!(f, "{s}"),
            Rows::Csv(s) => write!(f, "{s}"),
        }
    }
}

/// Lists the session user's expenses that pass the category filter and the period filter. The
/// period is measured from `--date`, or today.
pub async fn list(config: Config, user: Option<&str>, args: ListArgs) -> Result<Out<Rows>> {
    let session = open_session(&config, user).await?;
    let reference = args.date().unwrap_or_else(|| Local::now().date_naive());
    let shown = session.view(args.category(), args.period(), reference);
    debug!(
        "Showing {} of {} expense{} (category {}, period {})",
        shown.len(),
        session.expenses().len(),
        plural(session.expenses().len()),
        args.category(),
        args.period()
    );
    let rows = rows(&config, &shown, args.format()).pub_result(ErrorType::Internal)?;
    Ok(Out::new(rows.to_string(), rows))
}

fn rows(config: &Config, list: &Expenses, format: OutputFormat) -> Res<Rows> {
    Ok(match format {
        OutputFormat::Json => {
            Rows::Json(serde_json::to_value(list).context("Unable to serialize expenses")?)
        }
        OutputFormat::Table => Rows::Table(table(config, list)),
        OutputFormat::Csv => Rows::Csv(csv(list)?),
    })
}

fn table(config: &Config, list: &Expenses) -> String {
    if list.is_empty() {
        return EMPTY.to_string();
    }
    let cells: Vec<[String; 5]> = list
        .iter()
        .map(|e| {
            [
                e.id().to_string(),
                e.name().to_string(),
                money(config, e.amount()),
                e.category().to_string(),
                e.date().format(DATE_FORMAT).to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |row: &[String]| -> String {
        let padded: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            // amounts are right-aligned
            .map(|(i, (cell, w))| match i {
                2 => format!("{cell:>w$}"),
                _ => format!("{cell:<w$}"),
            })
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = vec![line(header.as_slice()), line(separator.as_slice())];
    lines.extend(cells.iter().map(|row| line(row.as_slice())));
    lines.join("\n")
}

fn csv(list: &Expenses) -> Res<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["id", "name", "amount", "category", "date"])
        .context("Unable to write CSV header")?;
    for e in list {
        writer
            .write_record([
                e.id().to_string(),
                e.name().to_string(),
                e.amount().value().to_string(),
                e.category().to_string(),
                e.date().format(DATE_FORMAT).to_string(),
            ])
            .context("Unable to write CSV row")?;
    }
    let bytes = writer.into_inner().context("Unable to flush CSV")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::date;
    use crate::model::{Category, CategoryFilter, Period};
    use crate::test::TestEnv;

    async fn seeded() -> TestEnv {
        let env = TestEnv::new().await;
        env.seed(
            "asha",
            &[
                ("Groceries", "100", "Food", "2025-03-01"),
                ("Bus, return", "50", "Transport", "2025-03-05"),
                ("Snacks", "25", "Food", "2025-02-27"),
            ],
        )
        .await;
        env
    }

    fn args(category: CategoryFilter, period: Period, format: OutputFormat) -> ListArgs {
        ListArgs::new(category, period, format, Some(date("2025-03-12")))
    }

    #[tokio::test]
    async fn test_list_table() {
        let env = seeded().await;
        let a = args(CategoryFilter::All, Period::All, OutputFormat::Table);
        let out = list(env.config().clone(), Some("asha"), a).await.unwrap();
        let lines: Vec<&str> = out.message().lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("| ID"));
        assert!(lines[2].contains("Groceries"));
        assert!(lines[2].contains("₹100.00"));
        // every line is the same width
        assert!(lines.iter().all(|l| l.chars().count() == lines[0].chars().count()));
    }

    #[tokio::test]
    async fn test_list_empty() {
        let env = TestEnv::new().await;
        let a = args(CategoryFilter::All, Period::All, OutputFormat::Table);
        let out = list(env.config().clone(), Some("asha"), a).await.unwrap();
        assert_eq!(out.message(), EMPTY);
    }

    #[tokio::test]
    async fn test_list_filters_json() {
        let env = seeded().await;
        let a = args(Category::Food.into(), Period::Monthly, OutputFormat::Json);
        let out = list(env.config().clone(), Some("asha"), a).await.unwrap();
        let Some(Rows::Json(serde_json::Value::Array(items))) = out.structure() else {
            panic!("expected a JSON array, got {:?}", out.structure());
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "Groceries");
        assert_eq!(items[0]["amount"], 100.0);
        assert_eq!(items[0]["date"], "2025-03-01");
    }

    #[tokio::test]
    async fn test_list_csv() {
        let env = seeded().await;
        let a = args(CategoryFilter::named("Transport"), Period::All, OutputFormat::Csv);
        let out = list(env.config().clone(), Some("asha"), a).await.unwrap();
        let lines: Vec<&str> = out.message().lines().collect();
        assert_eq!(lines[0], "id,name,amount,category,date");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(",\"Bus, return\",50,Transport,2025-03-05"), "{}", lines[1]);
    }
}

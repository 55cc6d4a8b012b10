//! The add command handler.

use crate::args::AddArgs;
use crate::commands::{money, open_session, Out};
use crate::model::{Expense, ExpenseForm, DATE_FORMAT};
use crate::error::IntoResult;
use crate::{Config, ErrorType, Result, Submission};
use anyhow::anyhow;
use chrono::Local;

/// Adds an expense for the session's user. A missing date means today.
pub async fn add(config: Config, user: Option<&str>, args: AddArgs) -> Result<Out<Expense>> {
    let mut session = open_session(&config, user).await?;
    let date = match args.date() {
        Some(date) => date.to_string(),
        None => Local::now().date_naive().format(DATE_FORMAT).to_string(),
    };
    let form = ExpenseForm::new(args.name(), args.amount(), args.category(), date);
    let expense = added(session.submit(&form).await?)?;
    Ok(Out::new(
        format!(
            "Added expense {}: {} {} ({}, {})",
            expense.id(),
            expense.name(),
            money(&config, expense.amount()),
            expense.category(),
            expense.date().format(DATE_FORMAT)
        ),
        expense,
    ))
}

/// A fresh session is always adding, so anything but `Added` is a bug.
fn added(submission: Submission) -> Result<Expense> {
    match submission {
        Submission::Added(expense) => Ok(expense),
        other => Err(anyhow!("Expected a new expense, got {other:?}"))
            .pub_result(ErrorType::Internal),
    }
}

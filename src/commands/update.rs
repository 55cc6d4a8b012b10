//! The edit command handler.

use crate::args::EditArgs;
use crate::commands::{open_session, Out};
use crate::model::Expense;
use crate::error::IntoResult;
use crate::{Config, ErrorType, Result, Submission};
use anyhow::anyhow;

/// Prefills the expense form from the record, overrides the given fields and submits it. An
/// unknown id changes nothing.
pub async fn edit(config: Config, user: Option<&str>, args: EditArgs) -> Result<Out<Expense>> {
    let mut session = open_session(&config, user).await?;
    let Some(mut form) = session.begin_edit(args.id()) else {
        return Ok(format!("No expense with ID {}, nothing was changed", args.id()).into());
    };
    if let Some(name) = args.name() {
        form.name = name.to_string();
    }
    if let Some(amount) = args.amount() {
        form.amount = amount.to_string();
    }
    if let Some(category) = args.category() {
        form.category = category.to_string();
    }
    if let Some(date) = args.date() {
        form.date = date.to_string();
    }
    let expense = updated(session.submit(&form).await?)?;
    Ok(Out::new(format!("Updated expense {}", expense.id()), expense))
}

/// The record was found by `begin_edit` on this same session, so anything but `Updated` is a bug.
fn updated(submission: Submission) -> Result<Expense> {
    match submission {
        Submission::Updated(expense) => Ok(expense),
        other => Err(anyhow!("Expected an updated expense, got {other:?}"))
            .pub_result(ErrorType::Internal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::{amount, date, expense};
    use crate::model::ExpenseId;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_edit_overrides_only_given_fields() {
        let env = TestEnv::new().await;
        let ids = env
            .seed("asha", &[("Groceries", "100", "Food", "2025-03-01")])
            .await;

        let args = EditArgs::new(ids[0]).with_amount("120").with_date("2025-03-02");
        let out = edit(env.config().clone(), Some("asha"), args).await.unwrap();
        let updated = out.structure().unwrap();
        assert_eq!(updated.id(), ids[0]);
        assert_eq!(updated.name(), "Groceries");
        assert_eq!(updated.amount(), amount("120"));
        assert_eq!(updated.category(), "Food");
        assert_eq!(updated.date(), date("2025-03-02"));

        let session = env.session("asha").await;
        assert_eq!(session.expenses().get(ids[0]), Some(updated));
    }

    #[tokio::test]
    async fn test_edit_unknown_id_is_a_no_op() {
        let env = TestEnv::new().await;
        env.seed("asha", &[("Groceries", "100", "Food", "2025-03-01")])
            .await;
        let before = env.session("asha").await.expenses().clone();

        let args = EditArgs::new(ExpenseId::new(1)).with_name("Other");
        let out = edit(env.config().clone(), Some("asha"), args).await.unwrap();
        assert!(out.structure().is_none());
        assert_eq!(env.session("asha").await.expenses(), &before);
    }

    #[tokio::test]
    async fn test_edit_rejects_invalid_values() {
        let env = TestEnv::new().await;
        let ids = env
            .seed("asha", &[("Groceries", "100", "Food", "2025-03-01")])
            .await;
        let args = EditArgs::new(ids[0]).with_amount("0");
        let err = edit(env.config().clone(), Some("asha"), args)
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        let session = env.session("asha").await;
        assert_eq!(session.expenses().get(ids[0]).unwrap().amount(), amount("100"));
    }

    #[test]
    fn test_updated_accepts_only_an_updated_expense() {
        let record = expense(1, "Bus", "20", "Transport", "2025-03-01");
        assert_eq!(updated(Submission::Updated(record.clone())).unwrap(), record);

        let err = updated(Submission::Added(record)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Internal);
        let err = updated(Submission::NotFound(ExpenseId::new(1))).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Internal);
    }
}

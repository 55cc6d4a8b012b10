//! A logged-in user's working state: the expense list, the income and budget settings, and whether
//! the expense form is adding a new record or editing an existing one.

use crate::error::IntoResult;
use crate::ledger::{self, CategoryTotals, Totals};
use crate::model::{
    Amount, Category, CategoryFilter, Expense, ExpenseForm, ExpenseId, Expenses, Period, Settings,
};
use crate::store::{KeyValueStore, RecordStore, UserKeys};
use crate::{ErrorType, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What the next `submit` does.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Adding,
    Editing(ExpenseId),
}

/// The result of a successful `submit`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Submission {
    Added(Expense),
    Updated(Expense),
    /// The record being edited no longer exists. The list was persisted unchanged.
    NotFound(ExpenseId),
}

/// One user's session over a `KeyValueStore`.
///
/// Every mutation is applied to a copy of the list, persisted, and only then becomes the session's
/// list. A mutation that fails validation or persistence leaves the session as it was.
#[derive(Debug)]
pub struct Session<S> {
    records: RecordStore<S>,
    user: UserKeys,
    expenses: Expenses,
    settings: Settings,
    mode: FormMode,
}

impl<S: KeyValueStore> Session<S> {
    /// Loads `username`'s expenses and settings. Unreadable data loads as empty.
    pub async fn open(store: S, username: &str) -> Result<Self> {
        let user = UserKeys::new(username)?;
        let records = RecordStore::new(store);
        let expenses = records.load(&user.expenses()).await;
        let settings = records.load_settings(&user.settings()).await;
        debug!(
            "Opened a session for '{}' with {} expenses",
            user.username(),
            expenses.len()
        );
        Ok(Self {
            records,
            user,
            expenses,
            settings,
            mode: FormMode::Adding,
        })
    }

    pub fn username(&self) -> &str {
        self.user.username()
    }

    pub fn expenses(&self) -> &Expenses {
        &self.expenses
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn into_store(self) -> S {
        self.records.into_inner()
    }

    /// Switches the form to editing `id` and returns the form prefilled with its values. Returns
    /// `None` and stays in the current mode when there is no such record.
    pub fn begin_edit(&mut self, id: ExpenseId) -> Option<ExpenseForm> {
        let expense = self.expenses.get(id)?;
        self.mode = FormMode::Editing(id);
        Some(ExpenseForm::from(expense))
    }

    /// Leaves editing mode without changing anything.
    pub fn cancel_edit(&mut self) {
        self.mode = FormMode::Adding;
    }

    /// Validates `form` and either adds a new record or updates the one being edited.
    pub async fn submit(&mut self, form: &ExpenseForm) -> Result<Submission> {
        self.submit_at(form, Utc::now()).await
    }

    /// `submit` with an explicit clock for the identifier of a new record.
    pub async fn submit_at(
        &mut self,
        form: &ExpenseForm,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        let fields = form.validate().pub_result(ErrorType::Validation)?;
        let (next, submission) = match self.mode {
            FormMode::Adding => {
                let record = Expense::new(self.expenses.next_id(now), fields);
                let next = ledger::insert(&self.expenses, record.clone())
                    .pub_result(ErrorType::Validation)?;
                (next, Submission::Added(record))
            }
            FormMode::Editing(id) => {
                let next = ledger::update_by_id(&self.expenses, id, fields)
                    .pub_result(ErrorType::Validation)?;
                let submission = match next.get(id) {
                    Some(record) => Submission::Updated(record.clone()),
                    None => Submission::NotFound(id),
                };
                (next, submission)
            }
        };
        self.records.persist(&self.user.expenses(), &next).await?;
        self.expenses = next;
        self.mode = FormMode::Adding;
        match &submission {
            Submission::Added(e) => info!("Added expense {} '{}'", e.id(), e.name()),
            Submission::Updated(e) => info!("Updated expense {} '{}'", e.id(), e.name()),
            Submission::NotFound(id) => debug!("Expense {id} was not found, nothing updated"),
        }
        Ok(submission)
    }

    /// Removes the record with `id` and persists the list. Returns whether a record was removed.
    /// Deleting the record being edited ends editing.
    pub async fn delete(&mut self, id: ExpenseId) -> Result<bool> {
        let next = ledger::delete_by_id(&self.expenses, id);
        let removed = next.len() < self.expenses.len();
        self.records.persist(&self.user.expenses(), &next).await?;
        self.expenses = next;
        if self.mode == FormMode::Editing(id) {
            self.mode = FormMode::Adding;
        }
        Ok(removed)
    }

    pub async fn set_income(&mut self, income: Amount) -> Result<()> {
        let mut next = self.settings;
        next.set_income(income).pub_result(ErrorType::Validation)?;
        self.save_settings(next).await
    }

    /// Sets the budget limit. Zero means no budget.
    pub async fn set_budget(&mut self, budget: Amount) -> Result<()> {
        let mut next = self.settings;
        next.set_budget(budget).pub_result(ErrorType::Validation)?;
        self.save_settings(next).await
    }

    async fn save_settings(&mut self, next: Settings) -> Result<()> {
        self.records
            .persist_settings(&self.user.settings(), &next)
            .await?;
        self.settings = next;
        Ok(())
    }

    /// The records shown for the given filters, category first, then period relative to
    /// `reference`.
    pub fn view(
        &self,
        category: &CategoryFilter,
        period: Period,
        reference: NaiveDate,
    ) -> Expenses {
        let by_category = ledger::filter_by_category(&self.expenses, category);
        ledger::filter_by_period(&by_category, period, reference)
    }

    /// Income, expense, savings and budget over the whole list, regardless of any view filter.
    pub fn totals(&self) -> Totals {
        ledger::totals(&self.expenses, &self.settings)
    }

    /// Totals per chart category over the whole list.
    pub fn category_totals(&self) -> CategoryTotals {
        ledger::sum_by_category(&self.expenses, &Category::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::{amount, date};
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap()
    }

    async fn session() -> Session<MemoryStore> {
        Session::open(MemoryStore::default(), "asha").await.unwrap()
    }

    async fn add(
        s: &mut Session<MemoryStore>,
        name: &str,
        amt: &str,
        cat: &str,
        d: &str,
    ) -> Expense {
        match s
            .submit_at(&ExpenseForm::new(name, amt, cat, d), now())
            .await
            .unwrap()
        {
            Submission::Added(e) => e,
            other => panic!("expected an added expense, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_persists_and_reloads() {
        let mut s = session().await;
        let first = add(&mut s, "Groceries", "100", "Food", "2025-03-01").await;
        let second = add(&mut s, "Bus", "50", "Transport", "2025-03-05").await;
        assert_eq!(first.id().value(), now().timestamp_millis() as u64);
        assert!(second.id() > first.id());

        let store = s.into_store();
        let reopened = Session::open(store, "asha").await.unwrap();
        assert_eq!(reopened.expenses().len(), 2);
        assert_eq!(reopened.expenses().get(first.id()), Some(&first));
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let mut s = session().await;
        add(&mut s, "Groceries", "100", "Food", "2025-03-01").await;
        let other = Session::open(s.into_store(), "bo").await.unwrap();
        assert!(other.expenses().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_submit_changes_nothing() {
        let mut s = session().await;
        add(&mut s, "Groceries", "100", "Food", "2025-03-01").await;
        let before = s.expenses().clone();

        let err = s
            .submit_at(&ExpenseForm::new("Bad", "0", "Food", "2025-03-01"), now())
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(s.expenses(), &before);
        assert_eq!(s.mode(), FormMode::Adding);
    }

    #[tokio::test]
    async fn test_edit_flow() {
        let mut s = session().await;
        let e = add(&mut s, "Groceries", "100", "Food", "2025-03-01").await;

        let mut form = s.begin_edit(e.id()).unwrap();
        assert_eq!(s.mode(), FormMode::Editing(e.id()));
        assert_eq!(form.name, "Groceries");

        // A rejected edit keeps editing mode.
        form.amount = "abc".to_string();
        assert!(s.submit_at(&form, now()).await.is_err());
        assert_eq!(s.mode(), FormMode::Editing(e.id()));

        form.amount = "120".to_string();
        let updated = match s.submit_at(&form, now()).await.unwrap() {
            Submission::Updated(updated) => updated,
            other => panic!("expected an update, got {other:?}"),
        };
        assert_eq!(updated.id(), e.id());
        assert_eq!(updated.amount(), amount("120"));
        assert_eq!(s.mode(), FormMode::Adding);
        assert_eq!(s.expenses().len(), 1);
    }

    #[tokio::test]
    async fn test_begin_edit_unknown_id() {
        let mut s = session().await;
        assert!(s.begin_edit(ExpenseId::new(42)).is_none());
        assert_eq!(s.mode(), FormMode::Adding);
    }

    #[tokio::test]
    async fn test_cancel_edit() {
        let mut s = session().await;
        let e = add(&mut s, "Groceries", "100", "Food", "2025-03-01").await;
        s.begin_edit(e.id()).unwrap();
        s.cancel_edit();
        assert_eq!(s.mode(), FormMode::Adding);
        add(&mut s, "Bus", "50", "Transport", "2025-03-05").await;
        assert_eq!(s.expenses().len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let mut s = session().await;
        let e = add(&mut s, "Groceries", "100", "Food", "2025-03-01").await;
        s.begin_edit(e.id()).unwrap();
        assert!(s.delete(e.id()).await.unwrap());
        assert_eq!(s.mode(), FormMode::Adding);
        assert!(s.expenses().is_empty());
        assert!(!s.delete(e.id()).await.unwrap());

        let reopened = Session::open(s.into_store(), "asha").await.unwrap();
        assert!(reopened.expenses().is_empty());
    }

    #[tokio::test]
    async fn test_settings_and_totals() {
        let mut s = session().await;
        add(&mut s, "Groceries", "100", "Food", "2025-03-01").await;
        add(&mut s, "Bus", "50", "Transport", "2025-03-05").await;
        add(&mut s, "Snacks", "25", "Food", "2025-02-27").await;
        s.set_income(amount("1000")).await.unwrap();
        s.set_budget(amount("150")).await.unwrap();

        let err = s.set_budget(amount("-1")).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(s.settings().budget(), amount("150"));

        let totals = s.totals();
        assert_eq!(totals.expense, amount("175"));
        assert_eq!(totals.savings, amount("825"));
        assert!(totals.over_budget);
        assert_eq!(s.category_totals().get(Category::Food), amount("125"));

        let reopened = Session::open(s.into_store(), "asha").await.unwrap();
        assert_eq!(reopened.settings().income(), amount("1000"));
        assert_eq!(reopened.settings().budget(), amount("150"));
    }

    #[tokio::test]
    async fn test_view_does_not_change_totals() {
        let mut s = session().await;
        add(&mut s, "Groceries", "100", "Food", "2025-03-01").await;
        add(&mut s, "Bus", "50", "Transport", "2025-03-05").await;
        add(&mut s, "Snacks", "25", "Food", "2025-02-27").await;

        let food = s.view(&CategoryFilter::from(Category::Food), Period::All, date("2025-03-12"));
        assert_eq!(food.len(), 2);
        let food_in_march = s.view(
            &CategoryFilter::from(Category::Food),
            Period::Monthly,
            date("2025-03-12"),
        );
        assert_eq!(food_in_march.len(), 1);
        assert_eq!(s.totals().expense, amount("175"));
    }

    #[tokio::test]
    async fn test_open_rejects_empty_username() {
        let err = Session::open(MemoryStore::default(), "").await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Session);
    }
}

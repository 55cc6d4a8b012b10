use crate::model::Amount;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

/// The date format used by forms and by the stored records.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifies one expense within a user's list.
///
/// Fresh identifiers are derived from the current time in milliseconds and bumped past the
/// largest identifier already in the list, so they are unique and increase in insertion order.
/// Zero means "not assigned yet".
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ExpenseId(u64);

impl ExpenseId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExpenseId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Reasons a record or form is rejected. A rejected mutation changes nothing.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("the expense name must not be empty")]
    EmptyName,
    #[error("the amount must be a positive number, got '{0}'")]
    InvalidAmount(String),
    #[error("the category must not be empty")]
    EmptyCategory,
    #[error("the date must not be empty")]
    EmptyDate,
    #[error("the date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("the expense ID must be assigned before it is stored")]
    UnassignedId,
    #[error("an expense with ID {0} already exists")]
    DuplicateId(ExpenseId),
    #[error("the {0} must not be negative, got '{1}'")]
    Negative(&'static str, String),
    #[error("the {0} must not be more than 999,999,999,999.99, got '{1}'")]
    TooLarge(&'static str, String),
}

/// The editable fields of an expense, already parsed and validated.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFields {
    pub name: String,
    pub amount: Amount,
    pub category: String,
    pub date: NaiveDate,
}

impl ExpenseFields {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !self.amount.is_positive() || !self.amount.is_storable() {
            return Err(ValidationError::InvalidAmount(self.amount.value().to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(())
    }
}

/// A single expense record.
///
/// Serialized with the field names `id`, `name`, `amount`, `category` and `date`. Records written
/// without an `id` deserialize with an unassigned one; see `Expenses::assign_missing_ids`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default)]
    id: ExpenseId,
    name: String,
    amount: Amount,
    category: String,
    date: NaiveDate,
}

impl Expense {
    pub fn new(id: ExpenseId, fields: ExpenseFields) -> Self {
        Self {
            id,
            name: fields.name,
            amount: fields.amount,
            category: fields.category,
            date: fields.date,
        }
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn fields(&self) -> ExpenseFields {
        ExpenseFields {
            name: self.name.clone(),
            amount: self.amount,
            category: self.category.clone(),
            date: self.date,
        }
    }

    /// Checks the record's fields and that its identifier has been assigned.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.id.is_assigned() {
            return Err(ValidationError::UnassignedId);
        }
        self.fields().validate()
    }

    /// Replaces every editable field, keeping the identifier.
    pub(crate) fn replace_fields(&mut self, fields: ExpenseFields) {
        self.name = fields.name;
        self.amount = fields.amount;
        self.category = fields.category;
        self.date = fields.date;
    }
}

/// The ordered list of a user's expenses. Insertion order is display order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expenses(Vec<Expense>);

impl Expenses {
    pub fn new(data: Vec<Expense>) -> Self {
        Self(data)
    }

    pub fn data(&self) -> &[Expense] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expense> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.0.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ExpenseId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get_mut(&mut self, id: ExpenseId) -> Option<&mut Expense> {
        self.0.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn push(&mut self, expense: Expense) {
        self.0.push(expense)
    }

    pub(crate) fn retain(&mut self, f: impl FnMut(&Expense) -> bool) {
        self.0.retain(f)
    }

    fn max_id(&self) -> u64 {
        self.0.iter().map(|e| e.id.value()).max().unwrap_or(0)
    }

    fn taken_ids(&self) -> BTreeSet<u64> {
        self.0
            .iter()
            .map(|e| e.id.value())
            .filter(|&id| id != 0)
            .collect()
    }

    /// Returns a fresh identifier derived from `now`, bumped past every identifier in the list.
    ///
    /// When the list already holds `u64::MAX`, the smallest unused identifier is returned instead.
    pub fn next_id(&self, now: DateTime<Utc>) -> ExpenseId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        match self.max_id().checked_add(1) {
            Some(next) => ExpenseId(millis.max(next)),
            None => ExpenseId(smallest_unused(&self.taken_ids())),
        }
    }

    /// Gives every record that has no identifier, or repeats an earlier record's identifier, a
    /// new one past the current maximum. Once the maximum is `u64::MAX`, the smallest unused
    /// identifiers are handed out instead. Returns how many records were changed.
    pub fn assign_missing_ids(&mut self) -> usize {
        let mut taken = self.taken_ids();
        let mut next = self.max_id().checked_add(1);
        let mut seen = BTreeSet::new();
        let mut changed = 0;
        for expense in self.0.iter_mut() {
            if expense.id.is_assigned() && seen.insert(expense.id) {
                continue;
            }
            let id = match next {
                Some(id) => {
                    next = id.checked_add(1);
                    id
                }
                None => smallest_unused(&taken),
            };
            taken.insert(id);
            expense.id = ExpenseId(id);
            seen.insert(expense.id);
            changed += 1;
        }
        changed
    }
}

fn smallest_unused(taken: &BTreeSet<u64>) -> u64 {
    (1..=u64::MAX).find(|id| !taken.contains(id)).unwrap_or(0)
}

impl FromIterator<Expense> for Expenses {
    fn from_iter<T: IntoIterator<Item = Expense>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Expenses {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Expenses {
    type Item = Expense;
    type IntoIter = std::vec::IntoIter<Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The raw values of the expense form, exactly as typed.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub name: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl ExpenseForm {
    pub fn new(
        name: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            category: category.into(),
            date: date.into(),
        }
    }

    /// Parses and checks every field. The checks run in form order: name, amount, category, date.
    pub fn validate(&self) -> Result<ExpenseFields, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        // Cents only, at most `Amount::MAX`
        let amount = match Amount::from_str(&self.amount).map(Amount::to_cents) {
            Ok(amount) if amount.is_positive() && amount <= Amount::MAX => amount,
            _ => {
                return Err(ValidationError::InvalidAmount(self.amount.trim().to_string()))
            }
        };

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        let date = self.date.trim();
        if date.is_empty() {
            return Err(ValidationError::EmptyDate);
        }
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(date.to_string()))?;

        Ok(ExpenseFields {
            name: name.to_string(),
            amount,
            category: category.to_string(),
            date,
        })
    }
}

impl From<&Expense> for ExpenseForm {
    /// Prefills the form from an existing record.
    fn from(expense: &Expense) -> Self {
        Self {
            name: expense.name.clone(),
            amount: expense.amount.value().to_string(),
            category: expense.category.clone(),
            date: expense.date.format(DATE_FORMAT).to_string(),
        }
    }
}

use crate::model::{Amount, ValidationError};
use serde::{Deserialize, Serialize};

/// A user's income and budget limit. Income is set by the user and never derived from records.
/// A budget of zero means no budget.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Settings {
    income: Amount,
    budget: Amount,
}

impl Settings {
    pub fn new(income: Amount, budget: Amount) -> Result<Self, ValidationError> {
        let mut settings = Settings::default();
        settings.set_income(income)?;
        settings.set_budget(budget)?;
        Ok(settings)
    }

    pub fn income(&self) -> Amount {
        self.income
    }

    pub fn budget(&self) -> Amount {
        self.budget
    }

    pub fn set_income(&mut self, income: Amount) -> Result<(), ValidationError> {
        let income = checked("income", income)?;
        self.income = income;
        Ok(())
    }

    pub fn set_budget(&mut self, budget: Amount) -> Result<(), ValidationError> {
        let budget = checked("budget", budget)?;
        self.budget = budget;
        Ok(())
    }
}

/// Rounds to cents and checks the value is neither negative nor above `Amount::MAX`.
fn checked(what: &'static str, value: Amount) -> Result<Amount, ValidationError> {
    let value = value.to_cents();
    if value.is_negative() {
        return Err(ValidationError::Negative(what, value.to_string()));
    }
    if value > Amount::MAX {
        return Err(ValidationError::TooLarge(what, value.value().to_string()));
    }
    Ok(value)
}

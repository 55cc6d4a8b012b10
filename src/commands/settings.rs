//! The set-income command handler.

use crate::args::SetIncomeArgs;
use crate::commands::{money, open_session, Out};
use crate::model::Settings;
use crate::{Config, Result};

/// Sets the income, the budget limit, or both. With neither given, reports the current values.
pub async fn set_income(
    config: Config,
    user: Option<&str>,
    args: SetIncomeArgs,
) -> Result<Out<Settings>> {
    let mut session = open_session(&config, user).await?;
    if let Some(income) = args.income() {
        session.set_income(income).await?;
    }
    if let Some(budget) = args.budget() {
        session.set_budget(budget).await?;
    }
    let settings = *session.settings();
    Ok(Out::new(
        format!(
            "Income is {}, budget is {}",
            money(&config, settings.income()),
            money(&config, settings.budget())
        ),
        settings,
    ))
}

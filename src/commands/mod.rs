//! Command handlers for the expenses CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod backup;
mod delete;
mod init;
mod insert;
mod list;
mod login;
mod settings;
mod summary;
mod update;

use crate::error::IntoResult;
use crate::model::Amount;
use crate::store::{FileStore, RecordStore};
use crate::{Config, ErrorType, Result, Session};
use anyhow::anyhow;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use backup::backup;
pub use delete::delete;
pub use init::init;
pub use insert::add;
pub use list::{list, Rows};
pub use login::{login, logout};
pub use settings::set_income;
pub use summary::{summary, Summary};
pub use update::edit;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Opens a session for `user`, or for the logged-in user when `user` is `None`.
pub(crate) async fn open_session(
    config: &Config,
    user: Option<&str>,
) -> Result<Session<FileStore>> {
    let username = match user {
        Some(user) => user.to_string(),
        None => RecordStore::new(config.store())
            .logged_in_user()
            .await
            .ok_or_else(|| {
                anyhow!("No user is logged in. Run 'expenses login <username>' or pass --user")
            })
            .pub_result(ErrorType::Session)?,
    };
    Session::open(config.store(), &username).await
}

/// Formats `amount` with the configured currency symbol, e.g. `₹1,250.00` or `-₹75.50`.
pub(crate) fn money(config: &Config, amount: Amount) -> String {
    let symbol = config.currency_symbol();
    if amount.is_negative() {
        format!("-{symbol}{}", Amount::ZERO - amount)
    } else {
        format!("{symbol}{amount}")
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_open_session_requires_a_user() {
        let env = TestEnv::new().await;
        let err = open_session(env.config(), None).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Session);

        let session = open_session(env.config(), Some("asha")).await.unwrap();
        assert_eq!(session.username(), "asha");
    }

    #[tokio::test]
    async fn test_money() {
        let env = TestEnv::new().await;
        let config = env.config();
        assert_eq!(money(config, Amount::from_str("1250").unwrap()), "₹1,250.00");
        assert_eq!(money(config, Amount::from_str("-75.5").unwrap()), "-₹75.50");
        assert_eq!(money(config, Amount::ZERO), "₹0.00");
    }
}

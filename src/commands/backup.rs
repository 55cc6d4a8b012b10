//! The backup command handler.

use crate::commands::{open_session, plural, Out};
use crate::error::IntoResult;
use crate::store::UserKeys;
use crate::{Config, ErrorType, Result};
use std::path::PathBuf;

/// Writes the session user's expenses to `.backups/expenses_<user>.YYYY-MM-DD-NNN.json`.
pub async fn backup(config: Config, user: Option<&str>) -> Result<Out<PathBuf>> {
    let session = open_session(&config, user).await?;
    let prefix = UserKeys::new(session.username())?.expenses();
    let path = config
        .backup()
        .save_json(&prefix, session.expenses())
        .await
        .pub_result(ErrorType::Storage)?;
    let count = session.expenses().len();
    Ok(Out::new(
        format!(
            "Backed up {count} expense{} to {}",
            plural(count),
            path.display()
        ),
        path,
    ))
}

//! The delete command handler.

use crate::args::DeleteArgs;
use crate::commands::{open_session, plural, Out};
use crate::model::ExpenseId;
use crate::{Config, Result};
use tracing::warn;

/// Deletes each of the given expenses. IDs that do not exist are skipped with a warning.
pub async fn delete(
    config: Config,
    user: Option<&str>,
    args: DeleteArgs,
) -> Result<Out<Vec<ExpenseId>>> {
    let mut session = open_session(&config, user).await?;
    let mut deleted = Vec::new();
    for &id in args.ids() {
        if session.delete(id).await? {
            deleted.push(id);
        } else {
            warn!("No expense with ID {id}");
        }
    }
    let count = deleted.len();
    Ok(Out::new(
        format!("Deleted {count} expense{}", plural(count)),
        deleted,
    ))
}

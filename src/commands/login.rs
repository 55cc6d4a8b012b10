//! Login and logout command handlers.

use crate::commands::Out;
use crate::store::{RecordStore, UserKeys};
use crate::{Config, Result};

/// Stores `username` as the logged-in user.
pub async fn login(config: Config, username: &str) -> Result<Out<String>> {
    let user = UserKeys::new(username)?;
    RecordStore::new(config.store()).log_in(&user).await?;
    Ok(Out::new(
        format!("Logged in as '{}'", user.username()),
        user.username().to_string(),
    ))
}

/// Forgets the logged-in user. Their expenses stay in storage.
pub async fn logout(config: Config) -> Result<Out<()>> {
    let mut records = RecordStore::new(config.store());
    let message = match records.logged_in_user().await {
        Some(username) => format!("Logged out '{username}'"),
        None => "Nobody was logged in".to_string(),
    };
    records.log_out().await?;
    Ok(message.into())
}

use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the home directory with its `.backups` subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `expenses_home` - The directory that will be the home directory, e.g. `$HOME/expenses`
/// - `currency` - The symbol printed before amounts, `₹` if `None`
///
/// # Errors
/// - Returns an error if the directory is already initialized or any file operation fails.
pub async fn init(expenses_home: &Path, currency: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(expenses_home, currency).await?;
    Ok(format!(
        "Successfully created the expenses directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let out = init(&home, Some("€")).await.unwrap();
        assert!(out.message().starts_with("Successfully created"));
        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.currency_symbol(), "€");
        assert!(init(&home, None).await.is_err());
    }
}

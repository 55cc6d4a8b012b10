//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{ExpenseForm, ExpenseId};
use crate::store::FileStore;
use crate::{Config, Session, Submission};
use tempfile::TempDir;

/// Test environment with an initialized expenses home directory.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("expenses");
        let config = Config::create(&root, None).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Opens a fresh session for `username` on the home directory's storage file.
    pub async fn session(&self, username: &str) -> Session<FileStore> {
        Session::open(self.config.store(), username).await.unwrap()
    }

    /// Adds `(name, amount, category, date)` records for `username` and returns their ids.
    pub async fn seed(&self, username: &str, rows: &[(&str, &str, &str, &str)]) -> Vec<ExpenseId> {
        let mut session = self.session(username).await;
        let mut ids = Vec::new();
        for (name, amount, category, date) in rows {
            let form = ExpenseForm::new(*name, *amount, *category, *date);
            match session.submit(&form).await.unwrap() {
                Submission::Added(expense) => ids.push(expense.id()),
                other => panic!("seeding should only add, got {other:?}"),
            }
        }
        ids
    }
}

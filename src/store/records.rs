//! Reading and writing expense lists, settings and the logged-in user through a `KeyValueStore`.

use crate::error::{IntoResult, Res};
use crate::model::{Expenses, Settings};
use crate::store::KeyValueStore;
use crate::{ErrorType, Result};
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The key under which the current user is stored as `{"username": "..."}`.
pub const LOGGED_IN_USER: &str = "loggedInUser";

const EXPENSES_PREFIX: &str = "expenses_";
const SETTINGS_PREFIX: &str = "budget_";

/// The storage keys that belong to one user.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct UserKeys {
    username: String,
}

impl UserKeys {
    /// Fails with `ErrorType::Session` if `username` is empty or contains whitespace.
    pub fn new(username: &str) -> Result<Self> {
        Self::validate(username).pub_result(ErrorType::Session)?;
        Ok(Self {
            username: username.to_string(),
        })
    }

    fn validate(username: &str) -> Res<()> {
        ensure!(!username.is_empty(), "The username must not be empty");
        ensure!(
            !username.chars().any(char::is_whitespace),
            "The username '{username}' must not contain whitespace"
        );
        Ok(())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `expenses_<username>`
    pub fn expenses(&self) -> String {
        format!("{EXPENSES_PREFIX}{}", self.username)
    }

    /// `budget_<username>`
    pub fn settings(&self) -> String {
        format!("{SETTINGS_PREFIX}{}", self.username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggedInUser {
    username: String,
}

/// Loads and persists records by key. Loading never fails: anything unreadable becomes the empty
/// value and a warning is logged.
#[derive(Debug, Clone, Default)]
pub struct RecordStore<S> {
    store: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Reads the list stored under `key`. Records without an id, or with an id already taken,
    /// get a fresh one.
    pub async fn load(&self, key: &str) -> Expenses {
        let Some(mut list) = self.load_json::<Expenses>(key).await else {
            return Expenses::default();
        };
        let assigned = list.assign_missing_ids();
        if assigned > 0 {
            debug!("Assigned new ids to {assigned} records loaded from '{key}'");
        }
        list
    }

    /// Writes the full list under `key`, replacing what was there.
    pub async fn persist(&mut self, key: &str, list: &Expenses) -> Result<()> {
        self.save_json(key, list).await.pub_result(ErrorType::Storage)
    }

    /// Reads the settings stored under `key`, zero income and budget if there are none.
    pub async fn load_settings(&self, key: &str) -> Settings {
        self.load_json(key).await.unwrap_or_default()
    }

    pub async fn persist_settings(&mut self, key: &str, settings: &Settings) -> Result<()> {
        self.save_json(key, settings)
            .await
            .pub_result(ErrorType::Storage)
    }

    /// The username stored under `loggedInUser`, if any.
    pub async fn logged_in_user(&self) -> Option<String> {
        self.load_json::<LoggedInUser>(LOGGED_IN_USER)
            .await
            .map(|u| u.username)
            .filter(|u| !u.is_empty())
    }

    pub async fn log_in(&mut self, user: &UserKeys) -> Result<()> {
        let value = LoggedInUser {
            username: user.username().to_string(),
        };
        self.save_json(LOGGED_IN_USER, &value)
            .await
            .pub_result(ErrorType::Storage)
    }

    pub async fn log_out(&mut self) -> Result<()> {
        self.store
            .remove(LOGGED_IN_USER)
            .await
            .context("Unable to remove the logged-in user")
            .pub_result(ErrorType::Storage)
    }

    async fn load_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Nothing stored under '{key}'");
                return None;
            }
            Err(e) => {
                warn!("Unable to read '{key}' from storage, using an empty value: {e:#}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("The value stored under '{key}' is malformed, using an empty value: {e}");
                None
            }
        }
    }

    async fn save_json<T: Serialize + Sync>(&mut self, key: &str, value: &T) -> Res<()> {
        let json =
            serde_json::to_string(value).with_context(|| format!("Unable to serialize '{key}'"))?;
        self.store
            .set(key, &json)
            .await
            .with_context(|| format!("Unable to write '{key}' to storage"))
    }
}

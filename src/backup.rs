//! Dated, rotating JSON snapshots of an expense list.

use crate::error::Res;
use crate::model::Expenses;
use crate::{utils, Config};
use anyhow::Context;
use chrono::Local;
use std::path::PathBuf;
use tracing::debug;

const EXTENSION: &str = "json";

/// Writes backup files into the backups directory and deletes the oldest ones beyond
/// `backup_copies`. Create one with `Config::backup()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
        }
    }

    /// Saves `data` as `{prefix}.YYYY-MM-DD-NNN.json`, where NNN counts up within a day, then
    /// rotates. Returns the path of the new file.
    pub async fn save_json(&self, prefix: &str, data: &Expenses) -> Res<PathBuf> {
        let date = today();
        let seq = self.next_sequence_number(prefix, &date).await?;
        let path = self
            .backups_dir
            .join(format!("{prefix}.{date}-{seq:03}.{EXTENSION}"));

        let json = serde_json::to_string_pretty(data).context("Failed to serialize expenses")?;
        utils::write(&path, json).await?;
        debug!("Wrote backup {}", path.display());

        self.rotate(prefix).await?;
        Ok(path)
    }

    async fn next_sequence_number(&self, prefix: &str, date: &str) -> Res<u32> {
        let max_seq = self
            .backup_names(prefix)
            .await?
            .iter()
            .filter_map(|name| parse_sequence_number(name, prefix, date))
            .max()
            .unwrap_or(0);
        Ok(max_seq + 1)
    }

    async fn rotate(&self, prefix: &str) -> Res<()> {
        // Names sort by date, then sequence number.
        let mut names = self.backup_names(prefix).await?;
        names.sort();
        let to_delete = names.len().saturating_sub(self.backup_copies as usize);
        for name in names.into_iter().take(to_delete) {
            let path = self.backups_dir.join(&name);
            debug!("Rotating out backup {}", path.display());
            utils::remove(&path).await?;
        }
        Ok(())
    }

    async fn backup_names(&self, prefix: &str) -> Res<Vec<String>> {
        let mut names = Vec::new();
        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_backup_file(&name, prefix) {
                names.push(name);
            }
        }
        Ok(names)
    }
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// `expenses_asha.2025-03-12-004.json` -> `Some(4)` for prefix `expenses_asha` and that date.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    filename
        .strip_prefix(&format!("{prefix}.{date}-"))?
        .strip_suffix(&format!(".{EXTENSION}"))?
        .parse()
        .ok()
}

fn is_backup_file(filename: &str, prefix: &str) -> bool {
    filename
        .strip_prefix(&format!("{prefix}."))
        .and_then(|rest| rest.strip_suffix(&format!(".{EXTENSION}")))
        // the remainder is YYYY-MM-DD-NNN
        .is_some_and(|stamp| {
            stamp.len() > 11 && stamp.chars().all(|c| c.is_ascii_digit() || c == '-')
        })
}

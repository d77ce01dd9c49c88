//! Persisted ban list: a pretty-printed JSON array of numeric ids.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use intake_core::write_text_atomic;
use serde_json::Value;

pub const DEFAULT_BAN_LIST_FILE_NAME: &str = "blocked_users.json";

pub(crate) struct BanListStore {
    path: PathBuf,
    banned: BTreeSet<i64>,
}

impl BanListStore {
    /// Loads the ban list, treating a missing or malformed file as empty.
    pub(crate) fn load(path: PathBuf) -> Self {
        let banned = match read_ban_list(&path) {
            Ok(banned) => banned,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %format!("{error:#}"),
                    "ban list file is unreadable; starting with an empty ban list"
                );
                BTreeSet::new()
            }
        };
        Self { path, banned }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn contains(&self, id: i64) -> bool {
        self.banned.contains(&id)
    }

    pub(crate) fn insert(&mut self, id: i64) -> bool {
        self.banned.insert(id)
    }

    pub(crate) fn remove(&mut self, id: i64) -> bool {
        self.banned.remove(&id)
    }

    pub(crate) fn sorted_ids(&self) -> Vec<i64> {
        self.banned.iter().copied().collect()
    }

    pub(crate) fn save(&self) -> Result<()> {
        let payload = serde_json::to_string_pretty(&self.sorted_ids())
            .context("failed to encode ban list")?;
        write_text_atomic(&self.path, &payload)
            .with_context(|| format!("failed to write ban list {}", self.path.display()))
    }
}

fn read_ban_list(path: &Path) -> Result<BTreeSet<i64>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read ban list {}", path.display()))?;
    let parsed = serde_json::from_str::<Value>(&raw)
        .with_context(|| format!("failed to parse ban list {}", path.display()))?;
    let Value::Array(items) = parsed else {
        bail!("ban list {} is not a JSON array", path.display());
    };
    Ok(items.iter().filter_map(ban_list_item_id).collect())
}

fn ban_list_item_id(item: &Value) -> Option<i64> {
    match item {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

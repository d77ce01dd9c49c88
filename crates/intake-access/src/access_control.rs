//! Shared access-control component: privileged operators plus the ban list.

use std::{
    collections::BTreeSet,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

use anyhow::Result;

use crate::ban_list::BanListStore;

/// Maximum number of ids shown by a ban-list listing before it is truncated.
pub const BAN_LIST_DISPLAY_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnbanOutcome {
    Removed,
    NotPresent,
}

/// Answers privilege and ban questions for every inbound identity.
///
/// The privileged set is fixed at construction. Ban-list mutations hold the
/// store lock across the in-memory change and the file rewrite, so a reader
/// never sees a set that disagrees with a completed write.
pub struct AccessControl {
    privileged: BTreeSet<i64>,
    ban_list: Mutex<BanListStore>,
}

impl AccessControl {
    pub fn load(privileged: BTreeSet<i64>, ban_list_path: PathBuf) -> Self {
        let store = BanListStore::load(ban_list_path);
        tracing::info!(
            privileged = privileged.len(),
            banned = store.sorted_ids().len(),
            path = %store.path().display(),
            "access control loaded"
        );
        Self {
            privileged,
            ban_list: Mutex::new(store),
        }
    }

    pub fn is_privileged(&self, id: i64) -> bool {
        self.privileged.contains(&id)
    }

    pub fn is_banned(&self, id: i64) -> bool {
        self.store().contains(id)
    }

    /// Adds `id` to the ban list and persists the full list.
    pub fn ban(&self, id: i64) -> Result<BanOutcome> {
        let mut store = self.store();
        if !store.insert(id) {
            return Ok(BanOutcome::AlreadyPresent);
        }
        if let Err(error) = store.save() {
            store.remove(id);
            return Err(error);
        }
        tracing::info!(user_id = id, "user banned");
        Ok(BanOutcome::Added)
    }

    /// Removes `id` from the ban list and persists the full list.
    pub fn unban(&self, id: i64) -> Result<UnbanOutcome> {
        let mut store = self.store();
        if !store.remove(id) {
            return Ok(UnbanOutcome::NotPresent);
        }
        if let Err(error) = store.save() {
            store.insert(id);
            return Err(error);
        }
        tracing::info!(user_id = id, "user unbanned");
        Ok(UnbanOutcome::Removed)
    }

    /// Returns every banned id in ascending order.
    pub fn list_banned(&self) -> Vec<i64> {
        self.store().sorted_ids()
    }

    fn store(&self) -> MutexGuard<'_, BanListStore> {
        // Mutations roll back on persist failure, so a poisoned lock still
        // guards a consistent set.
        self.ban_list
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

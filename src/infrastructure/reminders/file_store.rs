//! TOML-file reminder store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::{Reminder, ReminderId};
use crate::domain::errors::StoreError;
use crate::domain::ports::ReminderStorePort;
use crate::infrastructure::atomic_write::write_atomic;

/// On-disk layout. `next_id` only grows, so deleted ids are never reissued.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReminderTable {
    next_id: i64,
    #[serde(default)]
    reminders: Vec<Reminder>,
}

impl Default for ReminderTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            reminders: Vec::new(),
        }
    }
}

/// Reminder store backed by a single TOML document, replaced atomically on
/// every write.
pub struct FileReminderStore {
    path: PathBuf,
    table: Mutex<Option<ReminderTable>>,
}

impl FileReminderStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<ReminderTable, StoreError> {
        if !self.path.exists() {
            debug!(path = ?self.path, "Reminder file not found, starting empty");
            return Ok(ReminderTable::default());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::read_failed(e.to_string()))?;

        toml::from_str(&content).map_err(|e| {
            warn!(path = ?self.path, error = %e, "Reminder file is corrupt");
            StoreError::corrupt(e.to_string())
        })
    }

    async fn save(&self, table: &ReminderTable) -> Result<(), StoreError> {
        let content =
            toml::to_string_pretty(table).map_err(|e| StoreError::write_failed(e.to_string()))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, content.as_bytes()))
            .await
            .map_err(|e| StoreError::write_failed(e.to_string()))?
            .map_err(|e| StoreError::write_failed(e.to_string()))
    }

    /// Runs `op` against the cached table and persists it when `op` reports a
    /// change. The cache is only updated after a successful write.
    async fn with_table<T>(
        &self,
        op: impl FnOnce(&mut ReminderTable) -> (T, bool),
    ) -> Result<T, StoreError> {
        let mut guard = self.table.lock().await;
        let mut table = match guard.as_ref() {
            Some(table) => table.clone(),
            None => self.load().await?,
        };

        let (value, changed) = op(&mut table);
        if changed {
            self.save(&table).await?;
        }
        *guard = Some(table);

        Ok(value)
    }
}

#[async_trait]
impl ReminderStorePort for FileReminderStore {
    async fn create(
        &self,
        owner_id: &str,
        message: &str,
        created_at: &str,
    ) -> Result<Reminder, StoreError> {
        self.with_table(|table| {
            let reminder = Reminder::new(table.next_id, owner_id, created_at, message);
            table.next_id += 1;
            table.reminders.push(reminder.clone());
            (reminder, true)
        })
        .await
    }

    async fn list_for(&self, owner_id: &str) -> Result<Vec<Reminder>, StoreError> {
        self.with_table(|table| {
            let owned = table
                .reminders
                .iter()
                .filter(|r| r.is_owned_by(owner_id))
                .cloned()
                .collect();
            (owned, false)
        })
        .await
    }

    async fn delete(&self, owner_id: &str, id: ReminderId) -> Result<bool, StoreError> {
        self.with_table(|table| {
            let before = table.reminders.len();
            table
                .reminders
                .retain(|r| !(r.id() == id && r.is_owned_by(owner_id)));
            let removed = table.reminders.len() != before;
            (removed, removed)
        })
        .await
    }
}

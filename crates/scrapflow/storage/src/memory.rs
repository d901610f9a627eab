//! In-memory reference implementation for Scrapflow storage traits.
//!
//! This adapter is deterministic and test-friendly. Each table sits behind
//! a single lock, so the deactivate-and-insert of a configuration version
//! and the revision check on a transaction are atomic.

use crate::model::{ConfigurationFilter, QueryWindow};
use crate::traits::{ConfigurationStore, TransactionStore};
use crate::{StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scrapflow_types::{
    ConfigurationId, ConfigurationKey, TenantId, Transaction, TransactionId, WorkflowConfiguration,
};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct ConfigurationTable {
    rows: HashMap<ConfigurationId, WorkflowConfiguration>,
    /// Logical key -> id of its single active row
    active: HashMap<ConfigurationKey, ConfigurationId>,
}

impl ConfigurationTable {
    fn ensure_key_free(
        &self,
        key: &ConfigurationKey,
        except: Option<&ConfigurationId>,
    ) -> StorageResult<()> {
        match self.active.get(key) {
            Some(existing) if Some(existing) != except => Err(StorageError::Conflict(format!(
                "an active configuration already exists for {}",
                key
            ))),
            _ => Ok(()),
        }
    }

    /// A row may only be inserted as a new, open, active version.
    fn ensure_insertable(&self, row: &WorkflowConfiguration) -> StorageResult<()> {
        if !row.is_active || row.effective_to.is_some() {
            return Err(StorageError::InvalidInput(format!(
                "configuration {} must be inserted as the active version",
                row.id
            )));
        }
        if self.rows.contains_key(&row.id) {
            return Err(StorageError::Conflict(format!(
                "configuration {} already exists",
                row.id
            )));
        }
        Ok(())
    }

    fn insert_active(
        &mut self,
        row: WorkflowConfiguration,
    ) -> StorageResult<WorkflowConfiguration> {
        self.ensure_insertable(&row)?;
        self.active.insert(row.key(), row.id.clone());
        self.rows.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    fn deactivate(
        &mut self,
        id: &ConfigurationId,
        at: DateTime<Utc>,
    ) -> StorageResult<WorkflowConfiguration> {
        let row = self
            .rows
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(format!("configuration {} not found", id)))?;
        if !row.is_active {
            return Err(StorageError::Conflict(format!(
                "configuration {} is no longer the active version",
                id
            )));
        }
        row.is_active = false;
        row.effective_to = Some(at);
        let key = row.key();
        let snapshot = row.clone();
        self.active.remove(&key);
        Ok(snapshot)
    }
}

/// In-memory Scrapflow storage adapter.
#[derive(Default)]
pub struct InMemoryScrapflowStorage {
    transactions: RwLock<HashMap<TransactionId, Transaction>>,
    configurations: RwLock<ConfigurationTable>,
}

impl InMemoryScrapflowStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryScrapflowStorage {
    async fn create_transaction(&self, transaction: Transaction) -> StorageResult<Transaction> {
        let mut guard = self
            .transactions
            .write()
            .map_err(|_| StorageError::Backend("transactions lock poisoned".to_string()))?;

        if guard.contains_key(&transaction.id) {
            return Err(StorageError::Conflict(format!(
                "transaction {} already exists",
                transaction.id
            )));
        }

        guard.insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn get_transaction(&self, id: &TransactionId) -> StorageResult<Option<Transaction>> {
        let guard = self
            .transactions
            .read()
            .map_err(|_| StorageError::Backend("transactions lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn save_transaction(
        &self,
        mut transaction: Transaction,
        expected_revision: u64,
    ) -> StorageResult<Transaction> {
        let mut guard = self
            .transactions
            .write()
            .map_err(|_| StorageError::Backend("transactions lock poisoned".to_string()))?;
        let stored = guard.get_mut(&transaction.id).ok_or_else(|| {
            StorageError::NotFound(format!("transaction {} not found", transaction.id))
        })?;

        if stored.revision != expected_revision {
            return Err(StorageError::Conflict(format!(
                "transaction {} was modified concurrently: expected revision {}, found {}",
                transaction.id, expected_revision, stored.revision
            )));
        }
        if stored.current_level > transaction.current_level {
            return Err(StorageError::InvariantViolation(format!(
                "transaction {} cannot move back from level {} to level {}",
                transaction.id,
                stored.current_level.number(),
                transaction.current_level.number()
            )));
        }

        transaction.revision = expected_revision + 1;
        *stored = transaction.clone();
        Ok(transaction)
    }

    async fn list_transactions(
        &self,
        tenant_id: &TenantId,
        window: QueryWindow,
    ) -> StorageResult<Vec<Transaction>> {
        let guard = self
            .transactions
            .read()
            .map_err(|_| StorageError::Backend("transactions lock poisoned".to_string()))?;
        let mut values = guard
            .values()
            .filter(|tx| &tx.tenant_id == tenant_id)
            .cloned()
            .collect::<Vec<_>>();
        values.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(apply_window(values, window))
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryScrapflowStorage {
    async fn insert_configuration(
        &self,
        row: WorkflowConfiguration,
    ) -> StorageResult<WorkflowConfiguration> {
        let mut guard = self
            .configurations
            .write()
            .map_err(|_| StorageError::Backend("configuration lock poisoned".to_string()))?;
        guard.ensure_key_free(&row.key(), None)?;
        guard.insert_active(row)
    }

    async fn get_configuration(
        &self,
        id: &ConfigurationId,
    ) -> StorageResult<Option<WorkflowConfiguration>> {
        let guard = self
            .configurations
            .read()
            .map_err(|_| StorageError::Backend("configuration lock poisoned".to_string()))?;
        Ok(guard.rows.get(id).cloned())
    }

    async fn find_configurations(
        &self,
        filter: &ConfigurationFilter,
    ) -> StorageResult<Vec<WorkflowConfiguration>> {
        let guard = self
            .configurations
            .read()
            .map_err(|_| StorageError::Backend("configuration lock poisoned".to_string()))?;
        let mut values = guard
            .rows
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect::<Vec<_>>();
        values.sort_by(|a, b| {
            a.operational_level
                .cmp(&b.operational_level)
                .then(a.display_order.cmp(&b.display_order))
                .then_with(|| a.field_name.cmp(&b.field_name))
                .then(a.version.cmp(&b.version))
        });
        Ok(values)
    }

    async fn supersede_configuration(
        &self,
        current: &ConfigurationId,
        replacement: WorkflowConfiguration,
    ) -> StorageResult<WorkflowConfiguration> {
        let mut guard = self
            .configurations
            .write()
            .map_err(|_| StorageError::Backend("configuration lock poisoned".to_string()))?;

        let existing = guard
            .rows
            .get(current)
            .ok_or_else(|| StorageError::NotFound(format!("configuration {} not found", current)))?;
        if !existing.is_active {
            return Err(StorageError::Conflict(format!(
                "configuration {} is no longer the active version",
                current
            )));
        }
        // Check everything before the first write so a rejection leaves the
        // table untouched.
        guard.ensure_key_free(&replacement.key(), Some(current))?;
        guard.ensure_insertable(&replacement)?;

        guard.deactivate(current, replacement.effective_from)?;
        guard.insert_active(replacement)
    }

    async fn retire_configuration(
        &self,
        id: &ConfigurationId,
        at: DateTime<Utc>,
    ) -> StorageResult<WorkflowConfiguration> {
        let mut guard = self
            .configurations
            .write()
            .map_err(|_| StorageError::Backend("configuration lock poisoned".to_string()))?;
        guard.deactivate(id, at)
    }
}

fn apply_window<T>(items: Vec<T>, window: QueryWindow) -> Vec<T> {
    let iter = items.into_iter().skip(window.offset);
    if window.limit == 0 {
        iter.collect()
    } else {
        iter.take(window.limit).collect()
    }
}

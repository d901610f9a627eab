use crate::model::{ConfigurationFilter, QueryWindow};
use crate::StorageResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scrapflow_types::{ConfigurationId, TenantId, Transaction, TransactionId, WorkflowConfiguration};

/// Storage interface for delivery transactions.
///
/// Every write is checked against the revision the caller read. A writer
/// holding a stale copy gets `StorageError::Conflict` and must re-read.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert a new transaction. Fails with `Conflict` if the id exists.
    async fn create_transaction(&self, transaction: Transaction) -> StorageResult<Transaction>;

    /// Get one transaction by id.
    async fn get_transaction(&self, id: &TransactionId) -> StorageResult<Option<Transaction>>;

    /// Replace a transaction if its stored revision equals
    /// `expected_revision`. Returns the stored row with the bumped revision.
    async fn save_transaction(
        &self,
        transaction: Transaction,
        expected_revision: u64,
    ) -> StorageResult<Transaction>;

    /// List a tenant's transactions, most recently updated first.
    async fn list_transactions(
        &self,
        tenant_id: &TenantId,
        window: QueryWindow,
    ) -> StorageResult<Vec<Transaction>>;
}

/// Storage interface for versioned field configuration.
///
/// Rows are append-only. The only mutation a store performs on an
/// existing row is deactivation (`is_active = false`, `effective_to` set).
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Insert a new active row. Fails with `Conflict` if another active row
    /// already exists for the same logical key.
    async fn insert_configuration(
        &self,
        row: WorkflowConfiguration,
    ) -> StorageResult<WorkflowConfiguration>;

    /// Get one row by id, active or not.
    async fn get_configuration(
        &self,
        id: &ConfigurationId,
    ) -> StorageResult<Option<WorkflowConfiguration>>;

    /// All rows matching `filter`, ordered by level, display order, name, version.
    async fn find_configurations(
        &self,
        filter: &ConfigurationFilter,
    ) -> StorageResult<Vec<WorkflowConfiguration>>;

    /// Atomically deactivate `current` (closing its window at the
    /// replacement's `effective_from`) and insert `replacement`.
    ///
    /// Fails with `Conflict`, leaving both untouched, if `current` is no
    /// longer active or if the replacement's logical key already has a
    /// different active row.
    async fn supersede_configuration(
        &self,
        current: &ConfigurationId,
        replacement: WorkflowConfiguration,
    ) -> StorageResult<WorkflowConfiguration>;

    /// Deactivate the active row `id` without a replacement.
    async fn retire_configuration(
        &self,
        id: &ConfigurationId,
        at: DateTime<Utc>,
    ) -> StorageResult<WorkflowConfiguration>;
}

/// Unified storage bundle used by the workflow engine.
pub trait ScrapflowStorage: TransactionStore + ConfigurationStore + Send + Sync {}

impl<T> ScrapflowStorage for T where T: TransactionStore + ConfigurationStore + Send + Sync {}

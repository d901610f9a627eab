//! Workflow engine: progression validation and level completion
//!
//! The engine holds no state of its own between calls. Each operation
//! reads the transaction, decides with pure functions, and writes at most
//! once with an optimistic revision check.

use crate::config::EngineConfig;
use crate::evidence::is_protected_evidence_field;
use crate::field_config::FieldConfigurationManager;
use crate::field_validation::check_level_record;
use crate::progression::evaluate_progression;
use scrapflow_storage::{QueryWindow, ScrapflowStorage};
use scrapflow_types::{
    FactoryId, LevelRecord, ProcessingResult, TenantId, Transaction, TransactionId,
    ValidationResult, WorkflowConfiguration, WorkflowError, WorkflowResult,
};
use std::sync::Arc;

/// Entry point for the scrap delivery pipeline
pub struct WorkflowEngine<S> {
    storage: Arc<S>,
    fields: FieldConfigurationManager<S>,
    config: EngineConfig,
}

impl<S: ScrapflowStorage> WorkflowEngine<S> {
    /// Create an engine with default configuration.
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_config(storage, EngineConfig::default())
    }

    pub fn with_config(storage: Arc<S>, config: EngineConfig) -> Self {
        let fields = FieldConfigurationManager::new(Arc::clone(&storage));
        Self {
            storage,
            fields,
            config,
        }
    }

    /// Field configuration management on the same store.
    pub fn field_configurations(&self) -> &FieldConfigurationManager<S> {
        &self.fields
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Transactions ─────────────────────────────────────────────────

    /// Open a new delivery at vendor dispatch.
    pub async fn create_transaction(
        &self,
        tenant_id: TenantId,
        factory_id: FactoryId,
    ) -> WorkflowResult<Transaction> {
        let transaction = self
            .storage
            .create_transaction(Transaction::new(tenant_id, factory_id))
            .await?;
        tracing::info!(
            transaction_id = %transaction.id,
            tenant_id = %transaction.tenant_id,
            factory_id = %transaction.factory_id,
            "Transaction created"
        );
        Ok(transaction)
    }

    pub async fn get_transaction(&self, id: &TransactionId) -> WorkflowResult<Transaction> {
        self.storage
            .get_transaction(id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("Transaction {} not found", id)))
    }

    /// A tenant's transactions, most recently updated first.
    pub async fn list_transactions(
        &self,
        tenant_id: &TenantId,
        window: QueryWindow,
    ) -> WorkflowResult<Vec<Transaction>> {
        Ok(self.storage.list_transactions(tenant_id, window).await?)
    }

    // ── Progression ──────────────────────────────────────────────────

    /// Check whether `transaction_id` may move to `target_level`.
    ///
    /// Rule failures come back in the result; only a missing transaction
    /// or a storage failure is an `Err`.
    pub async fn validate_level_progression(
        &self,
        transaction_id: &TransactionId,
        target_level: u8,
    ) -> WorkflowResult<ValidationResult> {
        let transaction = self.get_transaction(transaction_id).await?;
        let result = evaluate_progression(&transaction, target_level);
        tracing::debug!(
            transaction_id = %transaction_id,
            current_level = transaction.current_level.number(),
            target_level,
            is_valid = result.is_valid,
            errors = result.errors.len(),
            "Level progression evaluated"
        );
        Ok(result)
    }

    /// Record `record` for its level and advance the transaction to it.
    ///
    /// The record's `validation_status` is stored as given. A concurrent
    /// writer that saved first makes this call fail with `Conflict`; the
    /// caller re-reads and retries.
    pub async fn process_level_completion(
        &self,
        transaction_id: &TransactionId,
        record: LevelRecord,
    ) -> WorkflowResult<ProcessingResult> {
        let mut transaction = self.get_transaction(transaction_id).await?;
        let level = record.level;

        let mut validation = evaluate_progression(&transaction, level.number());
        if validation.is_valid {
            let fields = self.fields_for_record(&transaction, &record).await?;
            let (errors, warnings) = check_level_record(&record, &fields, &self.config.validation);
            validation.merge(errors, warnings);
        }

        if !validation.is_valid {
            tracing::warn!(
                transaction_id = %transaction_id,
                current_level = transaction.current_level.number(),
                target_level = level.number(),
                errors = ?validation.errors,
                "Level completion rejected"
            );
            return Ok(ProcessingResult::rejected(validation));
        }

        let expected_revision = transaction.revision;
        transaction.apply_level_completion(record);
        let saved = self
            .storage
            .save_transaction(transaction, expected_revision)
            .await?;

        tracing::info!(
            transaction_id = %saved.id,
            level = saved.current_level.number(),
            revision = saved.revision,
            "Level completed"
        );
        Ok(ProcessingResult::accepted(
            saved.current_level,
            validation.warnings,
        ))
    }

    // ── Configuration lookups ────────────────────────────────────────

    /// Tenant-wide fields configured for `level`.
    pub async fn get_configured_fields(
        &self,
        tenant_id: &TenantId,
        level: u8,
    ) -> WorkflowResult<Vec<WorkflowConfiguration>> {
        self.fields
            .get_field_configurations_with_inheritance(tenant_id, None, Some(level))
            .await
    }

    /// Fields configured for `level` as seen from one factory.
    pub async fn get_configured_fields_for_factory(
        &self,
        tenant_id: &TenantId,
        factory_id: &FactoryId,
        level: u8,
    ) -> WorkflowResult<Vec<WorkflowConfiguration>> {
        self.fields
            .get_field_configurations_with_inheritance(tenant_id, Some(factory_id), Some(level))
            .await
    }

    /// Whether `field_name` may be made optional or removed. Evidence
    /// fields never can, whatever the tenant or level.
    pub fn validate_evidence_field_configuration(
        &self,
        _tenant_id: &TenantId,
        _level: u8,
        field_name: &str,
    ) -> bool {
        !is_protected_evidence_field(field_name)
    }

    async fn fields_for_record(
        &self,
        transaction: &Transaction,
        record: &LevelRecord,
    ) -> WorkflowResult<Vec<WorkflowConfiguration>> {
        let level = Some(record.level.number());
        if self.config.resolution.pin_to_transaction_creation {
            self.fields
                .get_field_configurations_as_of(
                    &transaction.tenant_id,
                    Some(&transaction.factory_id),
                    level,
                    transaction.created_at,
                )
                .await
        } else {
            self.fields
                .get_field_configurations_with_inheritance(
                    &transaction.tenant_id,
                    Some(&transaction.factory_id),
                    level,
                )
                .await
        }
    }
}

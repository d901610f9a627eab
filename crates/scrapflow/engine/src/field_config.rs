//! Field configuration manager: versioned, inheriting field definitions
//!
//! Every change is a new version. Updating or moving a field deactivates
//! the active row and inserts its successor in one atomic store call; the
//! old id stays around as a permanent pointer into history. Evidence
//! fields are rejected before anything reaches the store.

use crate::evidence::{is_protected_evidence_field, protected_field_message};
use crate::inheritance::merge_with_inheritance;
use chrono::{DateTime, Utc};
use scrapflow_storage::{ConfigurationFilter, ConfigurationStore, FactoryScope};
use scrapflow_types::{
    ConfigurationId, FactoryId, FieldConfigurationPatch, FieldDefinition, OperationalLevel,
    TenantId, WorkflowConfiguration, WorkflowError, WorkflowResult,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Creates, versions, moves and resolves field configurations
pub struct FieldConfigurationManager<S> {
    store: Arc<S>,
}

impl<S> Clone for FieldConfigurationManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ConfigurationStore> FieldConfigurationManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Create the first version of a field.
    pub async fn create_field_configuration(
        &self,
        definition: FieldDefinition,
    ) -> WorkflowResult<WorkflowConfiguration> {
        if is_protected_evidence_field(&definition.field_name) {
            return Err(WorkflowError::Validation(protected_field_message(
                &definition.field_name,
            )));
        }
        let level = OperationalLevel::try_from(definition.operational_level)?;
        validate_attributes(
            &definition.field_name,
            &definition.field_label,
            definition.min_photo_count,
            definition.max_photo_count,
        )?;

        let row = WorkflowConfiguration::first_version(definition, level, Utc::now());
        let key = row.key();

        let filter = active_filter(&row.tenant_id, row.factory_id.as_ref())
            .at_level(Some(level))
            .named(row.field_name.clone());
        let existing = self.store.find_configurations(&filter).await?;
        if !existing.is_empty() {
            return Err(WorkflowError::Conflict(format!(
                "Field '{}' already exists at level {} in {}",
                key.field_name,
                level.number(),
                scope_label(key.factory_id.as_ref())
            )));
        }

        let stored = self.store.insert_configuration(row).await?;
        tracing::info!(
            configuration_id = %stored.id,
            tenant_id = %stored.tenant_id,
            field = %stored.field_name,
            level = stored.operational_level.number(),
            "Field configuration created"
        );
        Ok(stored)
    }

    /// Supersede the active row `id` with a patched copy.
    pub async fn update_field_configuration(
        &self,
        id: &ConfigurationId,
        patch: FieldConfigurationPatch,
    ) -> WorkflowResult<WorkflowConfiguration> {
        let current = self.load_active(id).await?;
        if is_protected_evidence_field(&current.field_name) {
            return Err(WorkflowError::Validation(protected_field_message(
                &current.field_name,
            )));
        }
        if let Some(name) = patch.field_name.as_deref() {
            if is_protected_evidence_field(name) {
                return Err(WorkflowError::Validation(protected_field_message(name)));
            }
        }
        let level = match patch.operational_level {
            Some(level) => OperationalLevel::try_from(level)?,
            None => current.operational_level,
        };

        self.supersede(&current, &patch, level, "Field configuration updated")
            .await
    }

    /// Move a field to another level as a new version.
    pub async fn move_field_to_level(
        &self,
        id: &ConfigurationId,
        new_level: u8,
    ) -> WorkflowResult<WorkflowConfiguration> {
        let level = OperationalLevel::try_from(new_level)?;
        let current = self.load_active(id).await?;
        if is_protected_evidence_field(&current.field_name) {
            return Err(WorkflowError::Validation(protected_field_message(
                &current.field_name,
            )));
        }
        if current.operational_level == level {
            return Err(WorkflowError::Validation(format!(
                "Field '{}' is already at level {}",
                current.field_name, new_level
            )));
        }

        let patch = FieldConfigurationPatch::new().level(new_level);
        self.supersede(&current, &patch, level, "Field configuration moved")
            .await
    }

    /// End the active row `id` without a successor.
    pub async fn retire_field_configuration(
        &self,
        id: &ConfigurationId,
    ) -> WorkflowResult<WorkflowConfiguration> {
        let current = self.load_active(id).await?;
        if is_protected_evidence_field(&current.field_name) {
            return Err(WorkflowError::Validation(protected_field_message(
                &current.field_name,
            )));
        }
        let retired = self.store.retire_configuration(&current.id, Utc::now()).await?;
        tracing::info!(
            configuration_id = %retired.id,
            field = %retired.field_name,
            version = retired.version,
            "Field configuration retired"
        );
        Ok(retired)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Active fields for a tenant, with factory rows overriding tenant-wide
    /// rows of the same name and level.
    pub async fn get_field_configurations_with_inheritance(
        &self,
        tenant_id: &TenantId,
        factory_id: Option<&FactoryId>,
        operational_level: Option<u8>,
    ) -> WorkflowResult<Vec<WorkflowConfiguration>> {
        let level = operational_level
            .map(OperationalLevel::try_from)
            .transpose()?;

        let tenant_rows = self
            .store
            .find_configurations(
                &ConfigurationFilter::tenant_wide(tenant_id.clone()).at_level(level),
            )
            .await?;
        let factory_rows = match factory_id {
            Some(factory_id) => {
                self.store
                    .find_configurations(
                        &ConfigurationFilter::factory(tenant_id.clone(), factory_id.clone())
                            .at_level(level),
                    )
                    .await?
            }
            None => Vec::new(),
        };

        let merged = merge_with_inheritance(tenant_rows, factory_rows);
        tracing::debug!(
            tenant_id = %tenant_id,
            factory_id = ?factory_id,
            level = ?operational_level,
            fields = merged.len(),
            "Resolved field configurations"
        );
        Ok(merged)
    }

    /// The fields that were in effect at `at`, resolved the same way.
    pub async fn get_field_configurations_as_of(
        &self,
        tenant_id: &TenantId,
        factory_id: Option<&FactoryId>,
        operational_level: Option<u8>,
        at: DateTime<Utc>,
    ) -> WorkflowResult<Vec<WorkflowConfiguration>> {
        let level = operational_level
            .map(OperationalLevel::try_from)
            .transpose()?;

        let effective = |rows: Vec<WorkflowConfiguration>| -> Vec<WorkflowConfiguration> {
            rows.into_iter().filter(|row| row.was_effective_at(at)).collect()
        };

        let tenant_rows = self
            .store
            .find_configurations(
                &ConfigurationFilter::tenant_wide(tenant_id.clone())
                    .at_level(level)
                    .with_history(),
            )
            .await?;
        let factory_rows = match factory_id {
            Some(factory_id) => {
                self.store
                    .find_configurations(
                        &ConfigurationFilter::factory(tenant_id.clone(), factory_id.clone())
                            .at_level(level)
                            .with_history(),
                    )
                    .await?
            }
            None => Vec::new(),
        };

        Ok(merge_with_inheritance(
            effective(tenant_rows),
            effective(factory_rows),
        ))
    }

    /// Every version in the chain `id` belongs to, oldest first.
    ///
    /// The chain follows `supersedes` links, so it spans moves and renames.
    pub async fn get_field_configuration_history(
        &self,
        id: &ConfigurationId,
    ) -> WorkflowResult<Vec<WorkflowConfiguration>> {
        let anchor = self
            .store
            .get_configuration(id)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("Configuration {} not found", id)))?;

        let mut filter = ConfigurationFilter::tenant_wide(anchor.tenant_id.clone()).with_history();
        filter.factory_scope = match &anchor.factory_id {
            Some(factory_id) => FactoryScope::Factory(factory_id.clone()),
            None => FactoryScope::TenantWide,
        };
        let rows = self.store.find_configurations(&filter).await?;

        let by_id: HashMap<&ConfigurationId, &WorkflowConfiguration> =
            rows.iter().map(|row| (&row.id, row)).collect();
        let successor: HashMap<&ConfigurationId, &WorkflowConfiguration> = rows
            .iter()
            .filter_map(|row| row.supersedes.as_ref().map(|prev| (prev, row)))
            .collect();

        let mut root = &anchor;
        while let Some(prev) = root.supersedes.as_ref().and_then(|prev| by_id.get(prev).copied()) {
            root = prev;
        }

        let mut chain = vec![root.clone()];
        let mut cursor = &root.id;
        while let Some(next) = successor.get(cursor) {
            chain.push((*next).clone());
            cursor = &next.id;
        }
        Ok(chain)
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn load_active(&self, id: &ConfigurationId) -> WorkflowResult<WorkflowConfiguration> {
        match self.store.get_configuration(id).await? {
            Some(row) if row.is_active => Ok(row),
            Some(_) => Err(WorkflowError::NotFound(format!(
                "Configuration {} is not the active version (it has been superseded or retired)",
                id
            ))),
            None => Err(WorkflowError::NotFound(format!("Configuration {} not found", id))),
        }
    }

    async fn supersede(
        &self,
        current: &WorkflowConfiguration,
        patch: &FieldConfigurationPatch,
        level: OperationalLevel,
        event: &'static str,
    ) -> WorkflowResult<WorkflowConfiguration> {
        let next = current.next_version(patch, level, Utc::now());
        validate_attributes(
            &next.field_name,
            &next.field_label,
            next.min_photo_count,
            next.max_photo_count,
        )?;

        let stored = self
            .store
            .supersede_configuration(&current.id, next)
            .await
            .map_err(WorkflowError::from)
            .inspect_err(|err| {
                if err.is_conflict() {
                    tracing::warn!(
                        configuration_id = %current.id,
                        error = %err,
                        "Field configuration version rejected"
                    );
                }
            })?;

        tracing::info!(
            previous_id = %current.id,
            configuration_id = %stored.id,
            field = %stored.field_name,
            level = stored.operational_level.number(),
            version = stored.version,
            "{}",
            event
        );
        Ok(stored)
    }
}

fn active_filter(tenant_id: &TenantId, factory_id: Option<&FactoryId>) -> ConfigurationFilter {
    match factory_id {
        Some(factory_id) => ConfigurationFilter::factory(tenant_id.clone(), factory_id.clone()),
        None => ConfigurationFilter::tenant_wide(tenant_id.clone()),
    }
}

fn scope_label(factory_id: Option<&FactoryId>) -> String {
    match factory_id {
        Some(factory_id) => format!("factory '{}'", factory_id),
        None => "the tenant-wide scope".to_string(),
    }
}

fn validate_attributes(
    field_name: &str,
    field_label: &str,
    min_photo_count: Option<u32>,
    max_photo_count: Option<u32>,
) -> WorkflowResult<()> {
    if field_name.trim().is_empty() {
        return Err(WorkflowError::Validation(
            "Field name must not be empty".to_string(),
        ));
    }
    if field_label.trim().is_empty() {
        return Err(WorkflowError::Validation(format!(
            "Field '{}' must have a label",
            field_name
        )));
    }
    if let (Some(min), Some(max)) = (min_photo_count, max_photo_count) {
        if min > max {
            return Err(WorkflowError::Validation(format!(
                "Field '{}' has minPhotoCount {} above maxPhotoCount {}",
                field_name, min, max
            )));
        }
    }
    Ok(())
}

use scrapflow_types::{FactoryId, OperationalLevel, TenantId, WorkflowConfiguration};
use serde::{Deserialize, Serialize};

/// Generic query window for paged reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWindow {
    pub limit: usize,
    pub offset: usize,
}

/// Which factory scope a configuration query covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactoryScope {
    /// Only tenant-wide rows (`factory_id IS NULL`)
    TenantWide,
    /// Only rows scoped to this factory
    Factory(FactoryId),
    /// Both tenant-wide and factory-scoped rows
    Any,
}

/// Find-by-scope-and-activity filter for configuration rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationFilter {
    pub tenant_id: TenantId,
    pub factory_scope: FactoryScope,
    pub operational_level: Option<OperationalLevel>,
    pub field_name: Option<String>,
    pub active_only: bool,
}

impl ConfigurationFilter {
    /// Active tenant-wide rows for a tenant.
    pub fn tenant_wide(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            factory_scope: FactoryScope::TenantWide,
            operational_level: None,
            field_name: None,
            active_only: true,
        }
    }

    /// Active rows scoped to one factory.
    pub fn factory(tenant_id: TenantId, factory_id: FactoryId) -> Self {
        Self {
            factory_scope: FactoryScope::Factory(factory_id),
            ..Self::tenant_wide(tenant_id)
        }
    }

    pub fn at_level(mut self, level: Option<OperationalLevel>) -> Self {
        self.operational_level = level;
        self
    }

    pub fn named(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    /// Include superseded and retired rows.
    pub fn with_history(mut self) -> Self {
        self.active_only = false;
        self
    }

    pub fn matches(&self, row: &WorkflowConfiguration) -> bool {
        if row.tenant_id != self.tenant_id {
            return false;
        }
        if self.active_only && !row.is_active {
            return false;
        }
        let scope_ok = match &self.factory_scope {
            FactoryScope::TenantWide => row.factory_id.is_none(),
            FactoryScope::Factory(factory_id) => row.factory_id.as_ref() == Some(factory_id),
            FactoryScope::Any => true,
        };
        if !scope_ok {
            return false;
        }
        if let Some(level) = self.operational_level {
            if row.operational_level != level {
                return false;
            }
        }
        match &self.field_name {
            Some(name) => &row.field_name == name,
            None => true,
        }
    }
}

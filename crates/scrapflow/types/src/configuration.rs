//! Versioned field configuration
//!
//! One `WorkflowConfiguration` row is one immutable fact: what a field
//! looked like, for which scope, from when. Rows are superseded by a new
//! version, never edited. Within a scope, `(tenant, level, field name,
//! factory)` identifies the logical field; exactly one of its rows is
//! active at a time.

use crate::{ConfigurationId, FactoryId, OperationalLevel, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

// ── Enumerations ─────────────────────────────────────────────────────

/// How a field value is captured
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureType {
    Manual,
    Ocr,
    Camera,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationType {
    Required,
    Optional,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Editability {
    Editable,
    ReadOnly,
}

/// Data type of a captured value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Text,
    Number,
    Decimal,
    Date,
    DateTime,
    Boolean,
    Select,
    MultiSelect,
    File,
    Photo,
    Signature,
    Location,
}

/// Roles allowed to see or change a field
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissions {
    #[serde(default)]
    pub view: BTreeSet<String>,
    #[serde(default)]
    pub edit: BTreeSet<String>,
}

// ── Logical Key ──────────────────────────────────────────────────────

/// Identifies a logical field within its scope; at most one active row
/// exists per key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigurationKey {
    pub tenant_id: TenantId,
    pub operational_level: OperationalLevel,
    pub field_name: String,
    /// `None` for tenant-wide defaults
    pub factory_id: Option<FactoryId>,
}

impl std::fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scope = self
            .factory_id
            .as_ref()
            .map(|id| format!("factory '{}'", id))
            .unwrap_or_else(|| "tenant-wide scope".to_string());
        write!(
            f,
            "field '{}' at level {} ({}) for tenant '{}'",
            self.field_name,
            self.operational_level.number(),
            scope,
            self.tenant_id
        )
    }
}

// ── Configuration Row ────────────────────────────────────────────────

/// One version of a tenant's field definition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfiguration {
    pub id: ConfigurationId,
    pub tenant_id: TenantId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_id: Option<FactoryId>,
    pub operational_level: OperationalLevel,
    pub field_name: String,
    pub field_label: String,
    pub field_type: FieldType,
    pub capture_type: CaptureType,
    pub validation_type: ValidationType,
    pub editability: Editability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_photo_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_photo_count: Option<u32>,
    #[serde(default)]
    pub validation_rules: Value,
    #[serde(default)]
    pub role_permissions: RolePermissions,
    pub display_order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<Value>,
    pub version: u32,
    pub effective_from: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_to: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// The row this version replaced, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<ConfigurationId>,
}

impl WorkflowConfiguration {
    /// First version of a field, active from `now`.
    pub fn first_version(
        definition: FieldDefinition,
        level: OperationalLevel,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ConfigurationId::generate(),
            tenant_id: definition.tenant_id,
            factory_id: definition.factory_id,
            operational_level: level,
            field_name: definition.field_name,
            field_label: definition.field_label,
            field_type: definition.field_type,
            capture_type: definition.capture_type,
            validation_type: definition.validation_type,
            editability: definition.editability,
            min_photo_count: definition.min_photo_count,
            max_photo_count: definition.max_photo_count,
            validation_rules: definition.validation_rules,
            role_permissions: definition.role_permissions,
            display_order: definition.display_order,
            conditional_logic: definition.conditional_logic,
            version: 1,
            effective_from: now,
            effective_to: None,
            is_active: true,
            supersedes: None,
        }
    }

    /// The next version of this row: unspecified fields are copied, the
    /// patch is applied, and the result gets a fresh id.
    pub fn next_version(
        &self,
        patch: &FieldConfigurationPatch,
        level: OperationalLevel,
        now: DateTime<Utc>,
    ) -> Self {
        let mut next = self.clone();
        next.id = ConfigurationId::generate();
        next.operational_level = level;
        if let Some(name) = &patch.field_name {
            next.field_name = name.clone();
        }
        if let Some(label) = &patch.field_label {
            next.field_label = label.clone();
        }
        if let Some(field_type) = patch.field_type {
            next.field_type = field_type;
        }
        if let Some(capture_type) = patch.capture_type {
            next.capture_type = capture_type;
        }
        if let Some(validation_type) = patch.validation_type {
            next.validation_type = validation_type;
        }
        if let Some(editability) = patch.editability {
            next.editability = editability;
        }
        if let Some(min) = patch.min_photo_count {
            next.min_photo_count = min;
        }
        if let Some(max) = patch.max_photo_count {
            next.max_photo_count = max;
        }
        if let Some(rules) = &patch.validation_rules {
            next.validation_rules = rules.clone();
        }
        if let Some(permissions) = &patch.role_permissions {
            next.role_permissions = permissions.clone();
        }
        if let Some(order) = patch.display_order {
            next.display_order = order;
        }
        if let Some(logic) = &patch.conditional_logic {
            next.conditional_logic = logic.clone();
        }
        next.version = self.version + 1;
        next.effective_from = now;
        next.effective_to = None;
        next.is_active = true;
        next.supersedes = Some(self.id.clone());
        next
    }

    pub fn key(&self) -> ConfigurationKey {
        ConfigurationKey {
            tenant_id: self.tenant_id.clone(),
            operational_level: self.operational_level,
            field_name: self.field_name.clone(),
            factory_id: self.factory_id.clone(),
        }
    }

    pub fn is_required(&self) -> bool {
        self.validation_type == ValidationType::Required
    }

    pub fn is_tenant_wide(&self) -> bool {
        self.factory_id.is_none()
    }

    /// Whether this row was the effective version at `at`.
    pub fn was_effective_at(&self, at: DateTime<Utc>) -> bool {
        self.effective_from <= at && self.effective_to.map_or(true, |to| at < to)
    }
}

// ── Inputs ───────────────────────────────────────────────────────────

/// Everything needed to create the first version of a field.
///
/// `operational_level` is the raw number supplied by the caller and is
/// checked against 1..=7 on creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub tenant_id: TenantId,
    #[serde(default)]
    pub factory_id: Option<FactoryId>,
    pub operational_level: u8,
    pub field_name: String,
    pub field_label: String,
    pub field_type: FieldType,
    pub capture_type: CaptureType,
    pub validation_type: ValidationType,
    pub editability: Editability,
    #[serde(default)]
    pub min_photo_count: Option<u32>,
    #[serde(default)]
    pub max_photo_count: Option<u32>,
    #[serde(default)]
    pub validation_rules: Value,
    #[serde(default)]
    pub role_permissions: RolePermissions,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub conditional_logic: Option<Value>,
}

impl FieldDefinition {
    /// A manual, required, editable text field.
    pub fn new(
        tenant_id: TenantId,
        operational_level: u8,
        field_name: impl Into<String>,
        field_label: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id,
            factory_id: None,
            operational_level,
            field_name: field_name.into(),
            field_label: field_label.into(),
            field_type: FieldType::Text,
            capture_type: CaptureType::Manual,
            validation_type: ValidationType::Required,
            editability: Editability::Editable,
            min_photo_count: None,
            max_photo_count: None,
            validation_rules: Value::Null,
            role_permissions: RolePermissions::default(),
            display_order: 0,
            conditional_logic: None,
        }
    }

    pub fn for_factory(mut self, factory_id: FactoryId) -> Self {
        self.factory_id = Some(factory_id);
        self
    }

    pub fn optional(mut self) -> Self {
        self.validation_type = ValidationType::Optional;
        self
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    pub fn with_capture(mut self, capture_type: CaptureType) -> Self {
        self.capture_type = capture_type;
        self
    }

    pub fn with_photo_counts(mut self, min: u32, max: u32) -> Self {
        self.min_photo_count = Some(min);
        self.max_photo_count = Some(max);
        self
    }

    pub fn with_display_order(mut self, order: i32) -> Self {
        self.display_order = order;
        self
    }
}

/// A partial update. `None` leaves the current value in place; for the
/// nullable columns, `Some(None)` clears them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfigurationPatch {
    #[serde(default)]
    pub operational_level: Option<u8>,
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub field_label: Option<String>,
    #[serde(default)]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub capture_type: Option<CaptureType>,
    #[serde(default)]
    pub validation_type: Option<ValidationType>,
    #[serde(default)]
    pub editability: Option<Editability>,
    #[serde(default)]
    pub min_photo_count: Option<Option<u32>>,
    #[serde(default)]
    pub max_photo_count: Option<Option<u32>>,
    #[serde(default)]
    pub validation_rules: Option<Value>,
    #[serde(default)]
    pub role_permissions: Option<RolePermissions>,
    #[serde(default)]
    pub display_order: Option<i32>,
    #[serde(default)]
    pub conditional_logic: Option<Option<Value>>,
}

impl FieldConfigurationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.field_label = Some(label.into());
        self
    }

    pub fn validation(mut self, validation_type: ValidationType) -> Self {
        self.validation_type = Some(validation_type);
        self
    }

    pub fn display_order(mut self, order: i32) -> Self {
        self.display_order = Some(order);
        self
    }

    pub fn rename(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.operational_level = Some(level);
        self
    }
}

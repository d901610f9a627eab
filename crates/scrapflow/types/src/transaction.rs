//! Delivery transactions and the data captured at each level
//!
//! A Transaction owns its `level_data`: at most one LevelRecord per
//! level, the latest write wins. `current_level` only ever increases,
//! one level per accepted progression.

use crate::{FactoryId, OperationalLevel, TenantId, TransactionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ── Status ───────────────────────────────────────────────────────────

/// Lifecycle status of a transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Active,
    Completed,
    Rejected,
    Cancelled,
}

impl TransactionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Outcome of the approval attached to a completed level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

// ── Level Record ─────────────────────────────────────────────────────

/// What was captured when a level was completed.
///
/// `validation_status` is set by whoever completes the level. It is the
/// only thing the guardrails look at; it is never derived from
/// `field_values`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub level: OperationalLevel,
    /// Captured values keyed by configured field name
    #[serde(default)]
    pub field_values: HashMap<String, Value>,
    pub completed_by: String,
    pub completed_at: DateTime<Utc>,
    /// References to captured files (photos, slips, signatures)
    #[serde(default)]
    pub evidence_ids: BTreeSet<String>,
    pub validation_status: ValidationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LevelRecord {
    pub fn new(level: OperationalLevel, completed_by: impl Into<String>) -> Self {
        Self {
            level,
            field_values: HashMap::new(),
            completed_by: completed_by.into(),
            completed_at: Utc::now(),
            evidence_ids: BTreeSet::new(),
            validation_status: ValidationStatus::Pending,
            notes: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.field_values.insert(name.into(), value);
        self
    }

    pub fn with_evidence(mut self, evidence_id: impl Into<String>) -> Self {
        self.evidence_ids.insert(evidence_id.into());
        self
    }

    pub fn with_status(mut self, status: ValidationStatus) -> Self {
        self.validation_status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn approved(self) -> Self {
        self.with_status(ValidationStatus::Approved)
    }

    pub fn is_approved(&self) -> bool {
        self.validation_status == ValidationStatus::Approved
    }
}

// ── Transaction ──────────────────────────────────────────────────────

/// A single scrap delivery moving through the pipeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub tenant_id: TenantId,
    pub factory_id: FactoryId,
    /// Highest level the transaction has validly reached
    pub current_level: OperationalLevel,
    pub status: TransactionStatus,
    /// Once set, no further level data may be written
    pub is_locked: bool,
    #[serde(default)]
    pub level_data: BTreeMap<OperationalLevel, LevelRecord>,
    /// Store-assigned write counter for optimistic concurrency
    #[serde(default)]
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// A fresh transaction at vendor dispatch, active and unlocked.
    pub fn new(tenant_id: TenantId, factory_id: FactoryId) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::generate(),
            tenant_id,
            factory_id,
            current_level: OperationalLevel::VendorDispatch,
            status: TransactionStatus::Active,
            is_locked: false,
            level_data: BTreeMap::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: TransactionId) -> Self {
        self.id = id;
        self
    }

    pub fn level_record(&self, level: OperationalLevel) -> Option<&LevelRecord> {
        self.level_data.get(&level)
    }

    pub fn is_active(&self) -> bool {
        self.status == TransactionStatus::Active
    }

    /// Locked or no longer active: nothing may progress.
    pub fn is_terminal(&self) -> bool {
        self.is_locked || self.status.is_terminal()
    }

    /// Store `record` for its level and move `current_level` to it.
    ///
    /// Callers validate the progression first; this only applies it.
    pub fn apply_level_completion(&mut self, record: LevelRecord) {
        let level = record.level;
        self.level_data.insert(level, record);
        if level > self.current_level {
            self.current_level = level;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_transaction() -> Transaction {
        Transaction::new(TenantId::new("acme"), FactoryId::new("plant-1"))
    }

    #[test]
    fn test_new_transaction_starts_at_dispatch() {
        let tx = make_transaction();
        assert_eq!(tx.current_level, OperationalLevel::VendorDispatch);
        assert!(tx.is_active());
        assert!(!tx.is_locked);
        assert!(!tx.is_terminal());
        assert!(tx.level_data.is_empty());
        assert_eq!(tx.revision, 0);
    }

    #[test]
    fn test_terminal_states() {
        let mut tx = make_transaction();
        tx.status = TransactionStatus::Cancelled;
        assert!(tx.is_terminal());

        let mut tx = make_transaction();
        tx.is_locked = true;
        assert!(tx.is_terminal());
        assert!(tx.is_active());
    }

    #[test]
    fn test_apply_level_completion_replaces_record() {
        let mut tx = make_transaction();
        tx.apply_level_completion(LevelRecord::new(OperationalLevel::GateEntry, "guard-1"));
        assert_eq!(tx.current_level, OperationalLevel::GateEntry);

        tx.apply_level_completion(
            LevelRecord::new(OperationalLevel::GateEntry, "guard-2").approved(),
        );
        assert_eq!(tx.level_data.len(), 1);
        let record = tx.level_record(OperationalLevel::GateEntry).unwrap();
        assert_eq!(record.completed_by, "guard-2");
        assert!(record.is_approved());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&TransactionStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
        assert_eq!(TransactionStatus::Rejected.to_string(), "rejected");
        assert_eq!(ValidationStatus::Approved.to_string(), "APPROVED");
    }

    #[test]
    fn test_level_data_serializes_keyed_by_number() {
        let mut tx = make_transaction();
        tx.apply_level_completion(
            LevelRecord::new(OperationalLevel::GateEntry, "guard-1")
                .with_field("vehicle_number", serde_json::json!("MH12AB1234")),
        );
        let json = serde_json::to_value(&tx).unwrap();
        assert!(json["level_data"]["2"].is_object());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }
}

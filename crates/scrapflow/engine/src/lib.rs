//! Scrapflow Workflow Engine
//!
//! Drives scrap deliveries through the seven operational levels and
//! manages the per-tenant field configuration captured at each level.
//!
//! # Architecture
//!
//! ```text
//!   WorkflowEngine ──► evaluate_progression ──► guardrail_violations
//!        │                                        (fixed, not configurable)
//!        ├──► check_level_record (configured fields, photo counts)
//!        │
//!        └──► FieldConfigurationManager ──► merge_with_inheritance
//!                     │
//!                     ▼
//!              ScrapflowStorage (transactions + configuration versions)
//! ```
//!
//! Progression rules and evidence protection are plain functions over
//! compiled-in tables. Tenant configuration only decides which fields are
//! captured; it never reaches the guardrails.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use scrapflow_engine::WorkflowEngine;
//! use scrapflow_storage::InMemoryScrapflowStorage;
//! use scrapflow_types::{FactoryId, LevelRecord, OperationalLevel, TenantId};
//!
//! # async fn run() -> scrapflow_types::WorkflowResult<()> {
//! let engine = WorkflowEngine::new(Arc::new(InMemoryScrapflowStorage::new()));
//! let tx = engine
//!     .create_transaction(TenantId::new("acme"), FactoryId::new("plant-1"))
//!     .await?;
//!
//! let result = engine
//!     .process_level_completion(&tx.id, LevelRecord::new(OperationalLevel::GateEntry, "guard"))
//!     .await?;
//! assert!(result.success);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod evidence;
pub mod field_config;
pub mod field_validation;
pub mod guardrails;
pub mod inheritance;
pub mod progression;
pub mod telemetry;

pub use config::{ConfigError, EngineConfig, ResolutionConfig, TelemetryConfig, ValidationConfig};
pub use engine::WorkflowEngine;
pub use evidence::{is_protected_evidence_field, PROTECTED_EVIDENCE_FIELDS};
pub use field_config::FieldConfigurationManager;
pub use field_validation::check_level_record;
pub use guardrails::{guardrail_violations, Guardrail, GUARDRAILS};
pub use inheritance::merge_with_inheritance;
pub use progression::{evaluate_progression, TRANSACTION_LOCKED};
pub use telemetry::{init_tracing, TelemetryError};

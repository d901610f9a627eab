//! Domain Types for Scrapflow
//!
//! Scrap deliveries move through a fixed seven-stage pipeline, from
//! vendor dispatch to gate-pass exit. Tenants decide which fields are
//! captured at each stage; they never decide whether the stages or the
//! compliance guardrails apply.
//!
//! # Key Concepts
//!
//! - **OperationalLevel**: One of the seven fixed pipeline stages.
//! - **Transaction**: A single delivery, its current level and the data
//!   captured at every completed level.
//! - **LevelRecord**: What was captured when a level was completed,
//!   including the validation status the guardrails consult.
//! - **WorkflowConfiguration**: One immutable version of a tenant's field
//!   definition. Edits supersede rows, they never mutate them.
//!
//! # Design Principles
//!
//! 1. Levels only move forward, one at a time.
//! 2. Configuration history is append-only.
//! 3. Evidence and guardrails are not data, so tenants cannot edit them.

#![deny(unsafe_code)]

mod configuration;
mod errors;
mod ids;
mod level;
mod outcome;
mod transaction;

pub use configuration::*;
pub use errors::*;
pub use ids::*;
pub use level::*;
pub use outcome::*;
pub use transaction::*;

//! Scrapflow storage abstractions.
//!
//! This crate defines the storage contract the workflow engine relies on:
//! - transaction state with optimistic revision checks
//! - versioned field configuration with at most one active row per
//!   logical field and an atomic deactivate-and-insert
//!
//! Design stance:
//! - The engine is stateless; everything durable lives behind these traits.
//! - Stores enforce the uniqueness and revision invariants themselves, so a
//!   losing concurrent writer always sees `StorageError::Conflict`.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
pub mod memory;
mod model;
mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryScrapflowStorage;
pub use model::{ConfigurationFilter, FactoryScope, QueryWindow};
pub use traits::{ConfigurationStore, ScrapflowStorage, TransactionStore};

//! Structured results of progression checks and level completions.
//!
//! Rejections are returned as values so callers can show every reason at
//! once instead of the first one.

use crate::OperationalLevel;
use serde::{Deserialize, Serialize};

/// Result of validating a level progression
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// A single-error rejection.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self::from_parts(vec![error.into()], Vec::new())
    }

    /// Fold more errors and warnings in, recomputing validity.
    pub fn merge(&mut self, errors: Vec<String>, warnings: Vec<String>) {
        self.errors.extend(errors);
        self.warnings.extend(warnings);
        self.is_valid = self.errors.is_empty();
    }

    pub fn has_error_containing(&self, needle: &str) -> bool {
        self.errors.iter().any(|e| e.contains(needle))
    }
}

/// Result of submitting a level record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_level: Option<OperationalLevel>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ProcessingResult {
    pub fn accepted(new_level: OperationalLevel, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            new_level: Some(new_level),
            errors: Vec::new(),
            warnings,
        }
    }

    pub fn rejected(validation: ValidationResult) -> Self {
        Self {
            success: false,
            new_level: None,
            errors: validation.errors,
            warnings: validation.warnings,
        }
    }
}

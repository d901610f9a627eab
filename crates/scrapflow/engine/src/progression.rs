//! Level progression rules
//!
//! A transaction moves forward exactly one level at a time while it is
//! active and unlocked. Overrides are not a parameter here: anything that
//! needs to bypass sequencing must rewrite `current_level` through its own
//! audited path before calling in.

use crate::guardrails::guardrail_violations;
use scrapflow_types::{OperationalLevel, Transaction, ValidationResult};

pub const TRANSACTION_LOCKED: &str = "Transaction is locked";

/// Check whether `transaction` may move to `target_level`.
///
/// Locked and terminal transactions are rejected outright. Otherwise every
/// applicable rule is evaluated and all failures are reported together,
/// including the guardrails when the progression itself is already invalid.
pub fn evaluate_progression(transaction: &Transaction, target_level: u8) -> ValidationResult {
    if transaction.is_locked {
        return ValidationResult::rejected(TRANSACTION_LOCKED);
    }
    if transaction.status.is_terminal() {
        return ValidationResult::rejected(format!("Transaction is {}", transaction.status));
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let Some(target) = OperationalLevel::from_number(target_level) else {
        errors.push(format!(
            "Invalid operational level: {} (expected 1..=7)",
            target_level
        ));
        return ValidationResult::from_parts(errors, warnings);
    };

    let current = transaction.current_level;
    if current.next() != Some(target) {
        errors.push(format!(
            "Invalid level progression: cannot move from level {} to level {}",
            current.number(),
            target.number()
        ));
    }

    errors.extend(guardrail_violations(transaction, target));

    if errors.is_empty() && transaction.level_record(current).is_none() {
        warnings.push(format!("No data recorded for level {}", current));
    }

    ValidationResult::from_parts(errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guardrails::{GATE_PASS_REQUIRES_APPROVED_GRN, GRN_REQUIRES_APPROVED_INSPECTION};
    use scrapflow_types::{
        FactoryId, LevelRecord, TenantId, TransactionStatus, ValidationStatus,
    };

    fn at_level(level: OperationalLevel) -> Transaction {
        let mut tx = Transaction::new(TenantId::new("acme"), FactoryId::new("plant-1"));
        tx.current_level = level;
        tx
    }

    #[test]
    fn test_next_level_is_valid() {
        let tx = at_level(OperationalLevel::VendorDispatch);
        let result = evaluate_progression(&tx, 2);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_skip_and_backward_are_invalid() {
        let tx = at_level(OperationalLevel::GateEntry);
        for target in [1, 2, 4, 5] {
            let result = evaluate_progression(&tx, target);
            assert!(!result.is_valid);
            assert!(result.has_error_containing("Invalid level progression"));
        }
    }

    #[test]
    fn test_out_of_range_target() {
        let tx = at_level(OperationalLevel::GateEntry);
        for target in [0, 8, 255] {
            let result = evaluate_progression(&tx, target);
            assert!(result.has_error_containing("Invalid operational level"));
        }
    }

    #[test]
    fn test_locked_short_circuits() {
        let mut tx = at_level(OperationalLevel::TareWeigh);
        tx.is_locked = true;
        tx.status = TransactionStatus::Cancelled;
        let result = evaluate_progression(&tx, 42);
        assert_eq!(result.errors, vec![TRANSACTION_LOCKED.to_string()]);
    }

    #[test]
    fn test_terminal_status_cites_status() {
        for (status, word) in [
            (TransactionStatus::Completed, "completed"),
            (TransactionStatus::Cancelled, "cancelled"),
            (TransactionStatus::Rejected, "rejected"),
        ] {
            let mut tx = at_level(OperationalLevel::GateEntry);
            tx.status = status;
            let result = evaluate_progression(&tx, 3);
            assert_eq!(result.errors.len(), 1);
            assert!(result.errors[0].contains(word));
        }
    }

    #[test]
    fn test_level_four_to_five_has_no_guardrail() {
        let tx = at_level(OperationalLevel::MaterialInspection);
        let result = evaluate_progression(&tx, 5);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_skip_to_grn_reports_progression_then_guardrail() {
        let tx = at_level(OperationalLevel::MaterialInspection);
        let result = evaluate_progression(&tx, 6);
        assert!(!result.is_valid);
        assert!(result.errors[0].starts_with("Invalid level progression"));
        assert!(result.has_error_containing(GRN_REQUIRES_APPROVED_INSPECTION));
    }

    #[test]
    fn test_rejected_inspection_blocks_grn() {
        let mut tx = at_level(OperationalLevel::MaterialInspection);
        tx.apply_level_completion(
            LevelRecord::new(OperationalLevel::MaterialInspection, "inspector")
                .with_status(ValidationStatus::Rejected),
        );
        tx.apply_level_completion(LevelRecord::new(OperationalLevel::TareWeigh, "operator"));

        let result = evaluate_progression(&tx, 6);
        assert_eq!(result.errors, vec![GRN_REQUIRES_APPROVED_INSPECTION.to_string()]);
    }

    #[test]
    fn test_gate_pass_requires_grn_approval() {
        let mut tx = at_level(OperationalLevel::GrnGeneration);
        tx.apply_level_completion(LevelRecord::new(OperationalLevel::GrnGeneration, "clerk"));
        let result = evaluate_progression(&tx, 7);
        assert_eq!(result.errors, vec![GATE_PASS_REQUIRES_APPROVED_GRN.to_string()]);

        tx.apply_level_completion(
            LevelRecord::new(OperationalLevel::GrnGeneration, "clerk").approved(),
        );
        assert!(evaluate_progression(&tx, 7).is_valid);
    }

    #[test]
    fn test_final_level_cannot_progress() {
        let tx = at_level(OperationalLevel::GatePassExit);
        let result = evaluate_progression(&tx, 7);
        assert!(result.has_error_containing("Invalid level progression"));
    }
}

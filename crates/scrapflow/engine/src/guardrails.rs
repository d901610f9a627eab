//! Safety guardrails
//!
//! Fixed cross-level preconditions checked on every progression. They read
//! only the transaction's own `level_data` and never consult tenant
//! configuration.

use scrapflow_types::{OperationalLevel, Transaction, ValidationStatus};

/// `target` may only be reached once `requires` holds a record with `status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Guardrail {
    pub target: OperationalLevel,
    pub requires: OperationalLevel,
    pub status: ValidationStatus,
    pub message: &'static str,
}

pub const GRN_REQUIRES_APPROVED_INSPECTION: &str =
    "GRN cannot be generated without approved material inspection";

pub const GATE_PASS_REQUIRES_APPROVED_GRN: &str =
    "Gate pass cannot be generated without approved GRN";

pub const GUARDRAILS: [Guardrail; 2] = [
    Guardrail {
        target: OperationalLevel::GrnGeneration,
        requires: OperationalLevel::MaterialInspection,
        status: ValidationStatus::Approved,
        message: GRN_REQUIRES_APPROVED_INSPECTION,
    },
    Guardrail {
        target: OperationalLevel::GatePassExit,
        requires: OperationalLevel::GrnGeneration,
        status: ValidationStatus::Approved,
        message: GATE_PASS_REQUIRES_APPROVED_GRN,
    },
];

impl Guardrail {
    pub fn is_satisfied_by(&self, transaction: &Transaction) -> bool {
        transaction
            .level_record(self.requires)
            .map_or(false, |record| record.validation_status == self.status)
    }
}

/// Messages of every guardrail on `target` that `transaction` fails.
pub fn guardrail_violations(transaction: &Transaction, target: OperationalLevel) -> Vec<String> {
    GUARDRAILS
        .iter()
        .filter(|guardrail| guardrail.target == target)
        .filter(|guardrail| !guardrail.is_satisfied_by(transaction))
        .map(|guardrail| guardrail.message.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrapflow_types::{FactoryId, LevelRecord, TenantId};

    fn transaction_with(level: OperationalLevel, status: ValidationStatus) -> Transaction {
        let mut tx = Transaction::new(TenantId::new("acme"), FactoryId::new("plant-1"));
        tx.apply_level_completion(LevelRecord::new(level, "inspector").with_status(status));
        tx
    }

    #[test]
    fn test_grn_needs_approved_inspection() {
        let tx = Transaction::new(TenantId::new("acme"), FactoryId::new("plant-1"));
        assert_eq!(
            guardrail_violations(&tx, OperationalLevel::GrnGeneration),
            vec![GRN_REQUIRES_APPROVED_INSPECTION.to_string()]
        );

        let pending =
            transaction_with(OperationalLevel::MaterialInspection, ValidationStatus::Pending);
        assert_eq!(
            guardrail_violations(&pending, OperationalLevel::GrnGeneration).len(),
            1
        );

        let approved =
            transaction_with(OperationalLevel::MaterialInspection, ValidationStatus::Approved);
        assert!(guardrail_violations(&approved, OperationalLevel::GrnGeneration).is_empty());
    }

    #[test]
    fn test_gate_pass_needs_approved_grn() {
        let rejected = transaction_with(OperationalLevel::GrnGeneration, ValidationStatus::Rejected);
        assert_eq!(
            guardrail_violations(&rejected, OperationalLevel::GatePassExit),
            vec![GATE_PASS_REQUIRES_APPROVED_GRN.to_string()]
        );

        let approved = transaction_with(OperationalLevel::GrnGeneration, ValidationStatus::Approved);
        assert!(guardrail_violations(&approved, OperationalLevel::GatePassExit).is_empty());
    }

    #[test]
    fn test_other_levels_have_no_guardrail() {
        let tx = Transaction::new(TenantId::new("acme"), FactoryId::new("plant-1"));
        for level in OperationalLevel::ALL {
            if level == OperationalLevel::GrnGeneration || level == OperationalLevel::GatePassExit {
                continue;
            }
            assert!(guardrail_violations(&tx, level).is_empty());
        }
    }
}

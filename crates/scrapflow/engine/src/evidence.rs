//! Evidence-field protection
//!
//! Evidence fields capture audit-critical proof. They always exist, they
//! are always required, and no configuration path can create, edit, move
//! or retire them. The list is compiled in so that no stored data can
//! weaken it.

/// Field names that tenant configuration can never touch.
pub const PROTECTED_EVIDENCE_FIELDS: [&str; 10] = [
    "photos",
    "documents",
    "timestamp",
    "gps_coordinates",
    "operator_signature",
    "inspector_signature",
    "evidence_photos",
    "inspection_photos",
    "weight_slip_photo",
    "vehicle_photo",
];

/// Whether `field_name` names a protected evidence field (case-insensitive).
pub fn is_protected_evidence_field(field_name: &str) -> bool {
    let name = field_name.trim();
    PROTECTED_EVIDENCE_FIELDS
        .iter()
        .any(|protected| protected.eq_ignore_ascii_case(name))
}

pub(crate) fn protected_field_message(field_name: &str) -> String {
    format!(
        "Field '{}' is a protected evidence field and cannot be created, modified, moved or disabled",
        field_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_name_is_protected() {
        for name in PROTECTED_EVIDENCE_FIELDS {
            assert!(is_protected_evidence_field(name), "{name}");
        }
    }

    #[test]
    fn test_protection_ignores_case_and_padding() {
        assert!(is_protected_evidence_field("Photos"));
        assert!(is_protected_evidence_field("GPS_COORDINATES"));
        assert!(is_protected_evidence_field("  weight_slip_photo "));
    }

    #[test]
    fn test_ordinary_fields_are_not_protected() {
        assert!(!is_protected_evidence_field("vehicle_number"));
        assert!(!is_protected_evidence_field("photo"));
        assert!(!is_protected_evidence_field("photos_extra"));
        assert!(!is_protected_evidence_field(""));
    }
}

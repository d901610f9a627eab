//! Field-level checks of a submitted level record against the fields
//! configured for its level.

use crate::config::ValidationConfig;
use scrapflow_types::{CaptureType, FieldType, LevelRecord, ValidationStatus, WorkflowConfiguration};
use serde_json::Value;

/// Errors and warnings for `record` given the resolved `fields`.
pub fn check_level_record(
    record: &LevelRecord,
    fields: &[WorkflowConfiguration],
    config: &ValidationConfig,
) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let level = record.level.number();

    for field in fields.iter().filter(|f| f.operational_level == record.level) {
        let value = record
            .field_values
            .get(&field.field_name)
            .filter(|value| !is_blank(value));

        let Some(value) = value else {
            if config.enforce_required_fields && field.is_required() {
                errors.push(format!(
                    "Required field '{}' is missing for level {}",
                    field.field_name, level
                ));
            }
            continue;
        };

        if config.enforce_photo_counts && captures_photos(field) {
            let unknown: Vec<&str> = photo_refs(value)
                .filter(|id| !record.evidence_ids.contains(*id))
                .collect();
            if !unknown.is_empty() {
                errors.push(format!(
                    "Field '{}' references photo(s) missing from the record's evidence: {}",
                    field.field_name,
                    unknown.join(", ")
                ));
            }

            let count = photo_count(value);
            if let Some(min) = field.min_photo_count {
                if count < min {
                    errors.push(format!(
                        "Field '{}' needs at least {} photo(s), got {}",
                        field.field_name, min, count
                    ));
                }
            }
            if let Some(max) = field.max_photo_count {
                if count > max {
                    errors.push(format!(
                        "Field '{}' allows at most {} photo(s), got {}",
                        field.field_name, max, count
                    ));
                }
            }
        }
    }

    if config.warn_on_unconfigured_fields {
        let mut unknown: Vec<&String> = record
            .field_values
            .keys()
            .filter(|name| {
                !fields
                    .iter()
                    .any(|f| f.operational_level == record.level && &f.field_name == *name)
            })
            .collect();
        unknown.sort();
        for name in unknown {
            warnings.push(format!(
                "Field '{}' is not configured for level {}",
                name, level
            ));
        }
    }

    if record.validation_status == ValidationStatus::Rejected {
        warnings.push(format!("Level {} is being recorded as REJECTED", level));
    }

    (errors, warnings)
}

fn captures_photos(field: &WorkflowConfiguration) -> bool {
    field.capture_type == CaptureType::Camera || field.field_type == FieldType::Photo
}

fn photo_count(value: &Value) -> u32 {
    match value {
        Value::Array(items) => items.iter().filter(|item| !is_blank(item)).count() as u32,
        Value::Null => 0,
        _ => 1,
    }
}

/// Evidence ids named by a photo field, either one string or an array.
fn photo_refs(value: &Value) -> impl Iterator<Item = &str> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    items
        .into_iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

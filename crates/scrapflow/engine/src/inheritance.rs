//! Tenant/factory inheritance merge.
//!
//! A factory-scoped row replaces the tenant-wide row with the same field
//! name at the same level; tenant-wide rows without an override pass
//! through unchanged.

use scrapflow_types::{OperationalLevel, WorkflowConfiguration};
use std::collections::BTreeMap;

/// Merge already-fetched tenant-wide and factory-scoped rows.
///
/// The result is ordered by level, then `display_order` of the winning
/// row, then field name.
pub fn merge_with_inheritance(
    tenant_rows: Vec<WorkflowConfiguration>,
    factory_rows: Vec<WorkflowConfiguration>,
) -> Vec<WorkflowConfiguration> {
    let mut merged: BTreeMap<(OperationalLevel, String), WorkflowConfiguration> = BTreeMap::new();

    for row in tenant_rows.into_iter().chain(factory_rows) {
        merged.insert((row.operational_level, row.field_name.clone()), row);
    }

    let mut rows: Vec<WorkflowConfiguration> = merged.into_values().collect();
    rows.sort_by(|a, b| {
        a.operational_level
            .cmp(&b.operational_level)
            .then(a.display_order.cmp(&b.display_order))
            .then_with(|| a.field_name.cmp(&b.field_name))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scrapflow_types::{FactoryId, FieldDefinition, TenantId, ValidationType};

    fn row(level: u8, name: &str, factory: Option<&str>, order: i32) -> WorkflowConfiguration {
        let mut def = FieldDefinition::new(TenantId::new("acme"), level, name, name)
            .with_display_order(order);
        def.factory_id = factory.map(FactoryId::new);
        let level = OperationalLevel::from_number(level).unwrap();
        WorkflowConfiguration::first_version(def, level, Utc::now())
    }

    #[test]
    fn test_factory_row_replaces_tenant_row() {
        let tenant = vec![row(2, "vehicle_number", None, 1)];
        let mut factory_row = row(2, "vehicle_number", Some("plant-1"), 5);
        factory_row.validation_type = ValidationType::Optional;

        let merged = merge_with_inheritance(tenant, vec![factory_row.clone()]);
        assert_eq!(merged, vec![factory_row]);
    }

    #[test]
    fn test_unrelated_rows_pass_through() {
        let tenant = vec![row(2, "vehicle_number", None, 1), row(2, "driver_name", None, 2)];
        let factory = vec![row(2, "seal_number", Some("plant-1"), 3)];
        let merged = merge_with_inheritance(tenant, factory);
        let names: Vec<&str> = merged.iter().map(|r| r.field_name.as_str()).collect();
        assert_eq!(names, vec!["vehicle_number", "driver_name", "seal_number"]);
    }

    #[test]
    fn test_same_name_on_other_level_is_not_overridden() {
        let tenant = vec![row(3, "remarks", None, 0)];
        let factory = vec![row(5, "remarks", Some("plant-1"), 0)];
        let merged = merge_with_inheritance(tenant, factory);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].is_tenant_wide());
        assert!(!merged[1].is_tenant_wide());
    }

    #[test]
    fn test_display_order_comes_from_winner() {
        let tenant = vec![row(2, "a", None, 1), row(2, "b", None, 2)];
        let factory = vec![row(2, "a", Some("plant-1"), 9)];
        let merged = merge_with_inheritance(tenant, factory);
        let names: Vec<&str> = merged.iter().map(|r| r.field_name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}

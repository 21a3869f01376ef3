//! VM type resource templates.
//!
//! The ResourceCfg sheet describes each VM type. Three sizing fields
//! ([`SIZING_FIELDS`]) become the VM's resource map; every other non-blank
//! field is passed through as the VM's partition map.

pub mod coerce;

pub use coerce::{coerce, Coercion, FieldValue};

use crate::design::Cell;
use log::warn;
use std::collections::BTreeMap;

/// Fields extracted into the resource map
pub const SIZING_FIELDS: [&str; 3] = ["VCPU", "RAM", "DataDiskSize"];

/// One VM type definition, fields in sheet column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceTemplate {
    pub fields: Vec<(String, Cell)>,
}

/// VM type name -> template. The first definition of a type wins.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    templates: BTreeMap<String, ResourceTemplate>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template; returns `false` when the type was already defined.
    pub fn insert(&mut self, vm_type: &str, template: ResourceTemplate) -> bool {
        if self.templates.contains_key(vm_type) {
            return false;
        }
        self.templates.insert(vm_type.to_string(), template);
        true
    }

    pub fn get(&self, vm_type: &str) -> Option<&ResourceTemplate> {
        self.templates.get(vm_type)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// The two disjoint field groups of a resolved VM type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedResources {
    pub partition: BTreeMap<String, FieldValue>,
    pub resource: BTreeMap<String, FieldValue>,
}

/// Split a VM type's template into resource and partition maps.
///
/// Unknown types resolve to two empty maps. Blank values are dropped, sizing
/// values that are not numeric keep their original text.
pub fn resolve_resources(vm_type: &str, catalog: &ResourceCatalog) -> ResolvedResources {
    let mut resolved = ResolvedResources::default();

    let Some(template) = catalog.get(vm_type) else {
        warn!("No resource template for VM type '{}', using empty template", vm_type);
        return resolved;
    };

    for (field, cell) in &template.fields {
        if SIZING_FIELDS.contains(&field.as_str()) {
            if let Some(value) = coerce(cell, Coercion::Numeric) {
                if !value.is_integer() {
                    warn!("Invalid {} value '{}' for {}", field, value, vm_type);
                }
                resolved.resource.insert(field.clone(), value);
            }
        } else if let Some(value) = coerce(cell, Coercion::PlainDigits) {
            resolved.partition.insert(field.clone(), value);
        }
    }

    resolved
}

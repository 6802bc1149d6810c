//! Property parsing: property records, assigned employees and placed equipment

use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;

use crate::catalog;
use crate::extract::{self, EntryKind};
use crate::models::{ArchiveEntry, Employee, Property, PropertyObject};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PropertyFile {
    property_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EmployeeFile {
    #[serde(rename = "ID")]
    id: String,
    #[serde(default)]
    assigned_property: String,
    #[serde(default)]
    data_type: String,
}

/// A placed object; the interesting part is a JSON document inside a string
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ObjectFile {
    item_string: String,
}

#[derive(Debug, Deserialize)]
struct ItemData {
    #[serde(rename = "ID")]
    id: String,
}

/// Build every property with its employees and equipment counts.
///
/// Equipment belongs to the property named by its folder; each instance
/// file adds one unit to its `(property, object type)` count.
pub fn parse_properties(files: &[&ArchiveEntry]) -> Vec<Property> {
    let mut names: BTreeMap<String, String> = BTreeMap::new();
    let mut employees: BTreeMap<String, Employee> = BTreeMap::new();
    let mut objects: BTreeMap<(String, String), u32> = BTreeMap::new();

    for entry in files {
        match extract::classify(&entry.path) {
            EntryKind::PropertyRecord { property } => {
                if let Some(file) = extract::read_json::<PropertyFile>(entry) {
                    names
                        .entry(file.property_code)
                        .or_insert_with(|| property.to_string());
                }
            }
            EntryKind::PropertyEmployee { property, employee } => {
                let Some(file) = extract::read_json::<EmployeeFile>(entry) else {
                    continue;
                };
                if catalog::property_code(property) != file.assigned_property {
                    debug!(
                        "Employee {} is stored under {} but assigned to '{}'",
                        employee, property, file.assigned_property
                    );
                }
                let kind = catalog::employee_type(&file.data_type);
                employees.entry(employee.to_string()).or_insert_with(|| Employee {
                    name: employee.to_string(),
                    id: file.id,
                    kind,
                    property_id: file.assigned_property,
                    salary: kind.map_or(0, catalog::salary),
                });
            }
            EntryKind::PropertyObject { property } => {
                let Some(file) = extract::read_json::<ObjectFile>(entry) else {
                    continue;
                };
                let item: ItemData = match serde_json::from_str(&file.item_string) {
                    Ok(item) => item,
                    Err(e) => {
                        debug!("No object id in {}: {}", entry.path, e);
                        continue;
                    }
                };
                *objects
                    .entry((catalog::property_code(property), item.id))
                    .or_default() += 1;
            }
            _ => {}
        }
    }

    names
        .into_iter()
        .map(|(id, name)| {
            let property_employees = employees
                .values()
                .filter(|e| e.property_id == id)
                .cloned()
                .collect();
            let property_objects = objects
                .iter()
                .filter(|((property_id, _), _)| *property_id == id)
                .map(|((_, object_id), amount)| PropertyObject {
                    id: object_id.clone(),
                    name: catalog::object_name(object_id).to_string(),
                    amount: *amount,
                })
                .collect();

            Property {
                id,
                name,
                employees: property_employees,
                objects: property_objects,
            }
        })
        .collect()
}

/// The property to show when the caller has not picked one
pub fn default_property(properties: &[Property]) -> Option<&Property> {
    catalog::PREFERRED_PROPERTIES
        .iter()
        .find_map(|code| properties.iter().find(|p| p.id == *code))
        .or_else(|| properties.first())
}

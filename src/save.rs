//! Whole-save parsing

use std::collections::BTreeMap;

use log::info;

use crate::error::SaveError;
use crate::extract::SaveLayout;
use crate::metadata;
use crate::models::{ArchiveEntry, Family, NpcSet, Product, Property, RawProductRecord, SaveMetadata};
use crate::npcs::{self, OrderAverage, OrderExtractor};
use crate::products::{self, ParsedFamily};
use crate::properties;

/// Everything derived from one save archive
#[derive(Debug, Clone)]
pub struct ParsedSave {
    pub root: String,
    pub metadata: SaveMetadata,
    pub families: BTreeMap<Family, ParsedFamily>,
    pub properties: Vec<Property>,
    pub npcs: NpcSet,
}

impl ParsedSave {
    pub fn products(&self, family: Family) -> &[Product] {
        self.families
            .get(&family)
            .map(|parsed| parsed.products.as_slice())
            .unwrap_or_default()
    }

    pub fn raw_records(&self, family: Family) -> &[RawProductRecord] {
        self.families
            .get(&family)
            .map(|parsed| parsed.raw.as_slice())
            .unwrap_or_default()
    }

    pub fn property(&self, id: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn worker_count(&self) -> usize {
        self.properties.iter().map(|p| p.employees.len()).sum()
    }
}

/// Parse a flat list of archive entries.
///
/// Fails only when the archive has no root folder or no products manifest;
/// every other gap is filled with defaults.
pub fn parse_save(entries: &[ArchiveEntry], order_average: OrderAverage) -> Result<ParsedSave, SaveError> {
    let layout = SaveLayout::scan(entries)?;
    let product_files = layout.product_files()?;

    let families = products::parse_products(&product_files)?;

    let orders = OrderExtractor::new(order_average)?;
    let parsed = ParsedSave {
        root: layout.root.to_string(),
        metadata: metadata::parse_metadata(layout.global_files()),
        families,
        properties: properties::parse_properties(layout.property_files()),
        npcs: npcs::parse_npcs(layout.npc_files(), &orders),
    };

    info!(
        "Parsed save '{}': {} plant, {} crystal, {} powder products, {} properties",
        parsed.root,
        parsed.products(Family::Plant).len(),
        parsed.products(Family::Crystal).len(),
        parsed.products(Family::Powder).len(),
        parsed.properties.len()
    );

    Ok(parsed)
}

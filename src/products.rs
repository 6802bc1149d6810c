//! Product parsing
//!
//! Reads per-product instance files and the consolidated products manifest,
//! rebuilds each product's recipe chain and resolves its cost lineage.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

use log::{debug, warn};
use serde::Deserialize;

use crate::catalog;
use crate::chain;
use crate::error::SaveError;
use crate::extract;
use crate::models::{
    ArchiveEntry, ChainEnd, Family, MixRecipeEdge, Product, RawProductRecord, RecipeChain,
    RecipeStep,
};

/// One `Products/**/<id>.json` instance file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProductFile {
    name: String,
    #[serde(rename = "ID")]
    id: String,
    drug_type: u8,
    #[serde(default)]
    properties: Vec<String>,
    #[serde(default)]
    data_type: String,
    #[serde(default)]
    game_version: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProductsManifest {
    #[serde(default)]
    discovered_products: Vec<String>,
    #[serde(default)]
    mix_recipes: Vec<ManifestRecipe>,
    #[serde(default)]
    product_prices: Vec<ManifestPrice>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ManifestRecipe {
    product: String,
    mixer: String,
    output: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ManifestPrice {
    #[serde(rename = "String")]
    id: String,
    #[serde(rename = "Int")]
    price: f64,
}

/// Products of one family, raw and resolved
#[derive(Debug, Clone, Default)]
pub struct ParsedFamily {
    pub raw: Vec<RawProductRecord>,
    pub products: Vec<Product>,
}

/// Parse every product family.
///
/// `files` holds the product instance files followed by the products
/// manifest as the last element. Instance files and recipes are read once
/// and then split by family.
pub fn parse_products(files: &[&ArchiveEntry]) -> Result<BTreeMap<Family, ParsedFamily>, SaveError> {
    let Some((manifest_entry, instances)) = files.split_last() else {
        return Err(SaveError::MissingProductsManifest {
            root: String::new(),
        });
    };

    let manifest: ProductsManifest =
        serde_json::from_str(&manifest_entry.content).map_err(|source| {
            SaveError::InvalidManifest {
                path: manifest_entry.path.clone(),
                source,
            }
        })?;

    let records = instance_records(instances);
    let edges = recipe_edges(&manifest.mix_recipes);

    Ok(Family::ALL
        .into_iter()
        .map(|family| (family, parse_family(&manifest, &records, &edges, family)))
        .collect())
}

fn parse_family(
    manifest: &ProductsManifest,
    records: &HashMap<String, ProductFile>,
    edges: &HashMap<String, MixRecipeEdge>,
    family: Family,
) -> ParsedFamily {
    let records: HashMap<String, &ProductFile> = records
        .iter()
        .filter(|(_, file)| Family::from_tag(file.drug_type) == Some(family))
        .map(|(id, file)| (id.clone(), file))
        .collect();

    let mut prices = HashMap::new();
    let mut seen = HashSet::new();
    let mut raw = Vec::new();

    for entry in &manifest.product_prices {
        prices.insert(entry.id.clone(), entry.price);

        // Base products are listed even when nothing was mixed from them
        if let Some(base) = catalog::base_product(family, &entry.id) {
            if seen.insert(entry.id.clone()) {
                raw.push(RawProductRecord {
                    name: base.name.to_string(),
                    id: entry.id.clone(),
                    family,
                    properties: Vec::new(),
                    data_type: "BaseProduct".to_string(),
                    game_version: "BaseGame".to_string(),
                    sell_price: Some(entry.price),
                    recipe: None,
                });
            }
        }
    }

    for id in &manifest.discovered_products {
        let Some(file) = records.get(id) else {
            continue;
        };
        if !seen.insert(id.clone()) {
            debug!("Product '{}' already listed, skipping duplicate", id);
            continue;
        }
        raw.push(RawProductRecord {
            name: file.name.clone(),
            id: file.id.clone(),
            family,
            properties: file.properties.clone(),
            data_type: file.data_type.clone(),
            game_version: file.game_version.clone(),
            sell_price: prices.get(id).copied(),
            recipe: edges.get(id).cloned(),
        });
    }

    let products: Vec<Product> = raw
        .iter()
        .map(|record| resolve_product(record, edges, &records))
        .collect();

    debug!(
        "Parsed {} {} products ({} instance files, {} recipes)",
        products.len(),
        family,
        records.len(),
        edges.len()
    );

    ParsedFamily { raw, products }
}

/// Instance files of every family keyed by product id. Files that fail to
/// parse are skipped.
fn instance_records(instances: &[&ArchiveEntry]) -> HashMap<String, ProductFile> {
    let mut records = HashMap::new();

    for entry in instances {
        if !entry.path.ends_with(".json") {
            continue;
        }
        if let Some(file) = extract::read_json::<ProductFile>(entry) {
            records.insert(file.id.clone(), file);
        }
    }

    records
}

/// Mix recipe edges keyed by output id.
///
/// The save does not reliably say which operand is the additive: when the
/// `Mixer` field is not a known additive but `Product` is, the two swap
/// roles. Recipes where neither operand is a known additive are unresolved
/// and dropped, as are recipes producing their own input.
fn recipe_edges(recipes: &[ManifestRecipe]) -> HashMap<String, MixRecipeEdge> {
    let mut edges = HashMap::new();
    let mut unresolved = 0usize;

    for recipe in recipes {
        let mixer_is_additive = catalog::additive(&recipe.mixer).is_some();
        let product_is_additive = catalog::additive(&recipe.product).is_some();

        let (input, additive) = match (mixer_is_additive, product_is_additive) {
            (true, _) => (&recipe.product, &recipe.mixer),
            (false, true) => (&recipe.mixer, &recipe.product),
            (false, false) => {
                warn!(
                    "Unresolved recipe {} + {} -> {}: no known additive",
                    recipe.product, recipe.mixer, recipe.output
                );
                unresolved += 1;
                continue;
            }
        };

        if *input == recipe.output {
            continue;
        }

        edges.insert(
            recipe.output.clone(),
            MixRecipeEdge {
                output_id: recipe.output.clone(),
                input_product_id: input.clone(),
                additive_id: additive.clone(),
            },
        );
    }

    if unresolved > 0 {
        debug!("{} recipes left unresolved", unresolved);
    }
    edges
}

/// Build the cost lineage of one raw record
fn resolve_product<R>(
    record: &RawProductRecord,
    edges: &HashMap<String, MixRecipeEdge>,
    records: &HashMap<String, R>,
) -> Product {
    let recipe_chain = chain::build_chain(&record.id, edges, records);
    let ingredient_cost = chain::ingredient_cost(&recipe_chain);

    let lineage_id = recipe_chain
        .terminal()
        .map_or(record.id.as_str(), |step| step.product_id.as_str());
    let base = catalog::base_product(record.family, lineage_id)
        .or_else(|| catalog::base_product(record.family, &record.id));

    let (base_id, base_name, seed_cost) = match base {
        Some(base) => (base.id.to_string(), base.name.to_string(), base.seed_cost),
        None => {
            debug!(
                "No base lineage for '{}' (chain end {:?}), using itself",
                record.id, recipe_chain.end
            );
            (record.id.clone(), record.name.clone(), None)
        }
    };

    let sell_price = record
        .sell_price
        .or_else(|| catalog::base_product(record.family, &record.id).map(|b| b.price))
        .unwrap_or_else(|| {
            warn!("No sell price for '{}', assuming 0", record.id);
            0.0
        });

    Product {
        id: record.id.clone(),
        name: record.name.clone(),
        family: record.family,
        base_id,
        base_name,
        sell_price,
        recipe_chain,
        ingredient_cost,
        seed_cost,
        effects: record.properties.clone(),
    }
}

/// A hypothetical product: a base mixed with additives in order, sold at a
/// chosen price. Written `Name=base+additive+additive@price`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhatIfProduct {
    pub name: String,
    pub base_id: String,
    pub additives: Vec<String>,
    pub sell_price: f64,
}

impl FromStr for WhatIfProduct {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=BASE+ADDITIVE...@PRICE, got '{s}'"))?;
        let (recipe, price) = rest
            .rsplit_once('@')
            .ok_or_else(|| format!("missing @PRICE in '{s}'"))?;
        let sell_price = price
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid price '{price}': {e}"))?;

        let mut parts = recipe.split('+').map(str::trim);
        let base_id = parts.next().unwrap_or_default().to_string();
        let additives: Vec<String> = parts.map(str::to_string).collect();

        if name.trim().is_empty() || base_id.is_empty() {
            return Err(format!("name and base are required in '{s}'"));
        }
        if let Some(unknown) = additives.iter().find(|a| catalog::additive(a).is_none()) {
            return Err(format!("unknown additive '{unknown}'"));
        }

        Ok(WhatIfProduct {
            name: name.trim().to_string(),
            base_id,
            additives,
            sell_price,
        })
    }
}

impl WhatIfProduct {
    /// Resolve against a family's catalog; `None` when the base does not
    /// belong to that family.
    pub fn into_product(self, family: Family) -> Option<Product> {
        let base = catalog::base_product(family, &self.base_id)?;

        // Intermediates are named after the additives applied so far
        let mut steps = Vec::with_capacity(self.additives.len());
        let mut input = base.id.to_string();
        for additive in &self.additives {
            steps.push(RecipeStep {
                product_id: input.clone(),
                additive_id: additive.clone(),
            });
            input = format!("{input}+{additive}");
        }
        steps.reverse();

        let end = if steps.is_empty() {
            ChainEnd::NoRecipe
        } else {
            ChainEnd::BaseProduct
        };
        let recipe_chain = RecipeChain { steps, end };
        let ingredient_cost = chain::ingredient_cost(&recipe_chain);

        Some(Product {
            id: self.name.replace(' ', "").to_lowercase(),
            name: self.name,
            family,
            base_id: base.id.to_string(),
            base_name: base.name.to_string(),
            sell_price: self.sell_price,
            recipe_chain,
            ingredient_cost,
            seed_cost: base.seed_cost,
            effects: Vec::new(),
        })
    }
}

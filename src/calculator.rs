//! Production economics engine
//!
//! One routine serves all product families. Each family is described by a
//! `FamilyProfile`: batch size, fixed batch cost and the ordered production
//! stages with the equipment each stage runs on. Daily output is limited by
//! the slowest stage and capped by customer demand.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;

use clap::ValueEnum;
use log::{debug, info};

use crate::catalog;
use crate::models::{ComputedProduct, Family, Product, Property, PropertyObject};

const HOURS_PER_DAY: f64 = 24.0;

/// Production equipment types the engine counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Equipment {
    GrowingPot,
    MixingStation,
    LabOven,
    ChemistryStation,
    Cauldron,
}

impl Equipment {
    pub const ALL: [Equipment; 5] = [
        Equipment::GrowingPot,
        Equipment::MixingStation,
        Equipment::LabOven,
        Equipment::ChemistryStation,
        Equipment::Cauldron,
    ];

    /// Whether a placed object type counts as this equipment
    pub fn matches(self, object_id: &str) -> bool {
        match self {
            Equipment::GrowingPot => catalog::GROWING_OBJECTS.contains(&object_id),
            Equipment::MixingStation => object_id.contains("mixingstation"),
            Equipment::LabOven => object_id.contains("laboven"),
            Equipment::ChemistryStation => object_id == "chemistrystation",
            Equipment::Cauldron => object_id == "cauldron",
        }
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Equipment::GrowingPot => "pots",
            Equipment::MixingStation => "mixing stations",
            Equipment::LabOven => "lab ovens",
            Equipment::ChemistryStation => "chemistry stations",
            Equipment::Cauldron => "cauldrons",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquipmentCounts {
    pub pots: u32,
    pub mixers: u32,
    pub ovens: u32,
    pub stations: u32,
    pub cauldrons: u32,
}

impl EquipmentCounts {
    pub fn get(&self, equipment: Equipment) -> u32 {
        match equipment {
            Equipment::GrowingPot => self.pots,
            Equipment::MixingStation => self.mixers,
            Equipment::LabOven => self.ovens,
            Equipment::ChemistryStation => self.stations,
            Equipment::Cauldron => self.cauldrons,
        }
    }

    fn slot(&mut self, equipment: Equipment) -> &mut u32 {
        match equipment {
            Equipment::GrowingPot => &mut self.pots,
            Equipment::MixingStation => &mut self.mixers,
            Equipment::LabOven => &mut self.ovens,
            Equipment::ChemistryStation => &mut self.stations,
            Equipment::Cauldron => &mut self.cauldrons,
        }
    }
}

/// Sum a property's object counts per equipment type
pub fn count_equipment(objects: &[PropertyObject]) -> EquipmentCounts {
    let mut counts = EquipmentCounts::default();
    for object in objects {
        for equipment in Equipment::ALL {
            if equipment.matches(&object.id) {
                *counts.slot(equipment) += object.amount;
            }
        }
    }
    counts
}

/// Caller-set equipment counts. A set value wins over the property's count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquipmentOverrides {
    pub pots: Option<u32>,
    pub mixers: Option<u32>,
    pub ovens: Option<u32>,
    pub stations: Option<u32>,
    pub cauldrons: Option<u32>,
}

impl EquipmentOverrides {
    pub fn apply(&self, counts: EquipmentCounts) -> EquipmentCounts {
        EquipmentCounts {
            pots: self.pots.unwrap_or(counts.pots),
            mixers: self.mixers.unwrap_or(counts.mixers),
            ovens: self.ovens.unwrap_or(counts.ovens),
            stations: self.stations.unwrap_or(counts.stations),
            cauldrons: self.cauldrons.unwrap_or(counts.cauldrons),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == EquipmentOverrides::default()
    }
}

/// Parse an equipment count from user input; anything non-numeric is 0
pub fn lenient_count(input: &str) -> Result<u32, Infallible> {
    Ok(input.trim().parse().unwrap_or(0))
}

/// Selected property, equipment overrides and demand for one computation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionContext {
    property_id: Option<String>,
    overrides: EquipmentOverrides,
    customers: usize,
}

impl ProductionContext {
    pub fn new(customers: usize) -> Self {
        Self {
            customers,
            ..Self::default()
        }
    }

    /// Switch property. Overrides belong to the previous selection and are
    /// cleared whenever the selection actually changes.
    pub fn select_property(&mut self, property_id: Option<&str>) {
        if self.property_id.as_deref() != property_id {
            self.property_id = property_id.map(str::to_string);
            self.overrides = EquipmentOverrides::default();
        }
    }

    pub fn set_overrides(&mut self, overrides: EquipmentOverrides) {
        self.overrides = overrides;
    }

    pub fn set_customers(&mut self, customers: usize) {
        self.customers = customers;
    }

    pub fn property_id(&self) -> Option<&str> {
        self.property_id.as_deref()
    }

    pub fn overrides(&self) -> &EquipmentOverrides {
        &self.overrides
    }

    pub fn customers(&self) -> usize {
        self.customers
    }

    /// Equipment of the selected property with overrides applied
    pub fn equipment(&self, properties: &[Property]) -> EquipmentCounts {
        let counted = self
            .property_id
            .as_deref()
            .and_then(|id| properties.iter().find(|p| p.id == id))
            .map(|p| count_equipment(&p.objects))
            .unwrap_or_default();
        self.overrides.apply(counted)
    }
}

/// One production stage: a batch occupies one unit of `equipment` for `hours`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub name: &'static str,
    pub equipment: Equipment,
    pub hours: f64,
    pub is_mixing: bool,
}

impl Stage {
    /// Batches this stage can finish per day
    pub fn throughput(&self, counts: &EquipmentCounts) -> u32 {
        (f64::from(counts.get(self.equipment)) * HOURS_PER_DAY / self.hours).floor() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixedCost {
    Flat(f64),
    /// Soil per batch plus one seed. The whole family is costed with the
    /// seed of its first listed product.
    SoilAndSeed { soil: f64 },
}

impl FixedCost {
    /// Per-batch cost shared by every product in `products`
    pub fn for_family(&self, products: &[Product]) -> f64 {
        match *self {
            FixedCost::Flat(cost) => cost,
            FixedCost::SoilAndSeed { soil } => {
                soil + products.first().and_then(|p| p.seed_cost).unwrap_or(0.0)
            }
        }
    }
}

const PLANT_STAGES: &[Stage] = &[
    Stage { name: "grow", equipment: Equipment::GrowingPot, hours: 10.5, is_mixing: false },
    Stage { name: "mix", equipment: Equipment::MixingStation, hours: 1.0, is_mixing: true },
];

const CRYSTAL_STAGES: &[Stage] = &[
    Stage { name: "gather", equipment: Equipment::ChemistryStation, hours: 8.0, is_mixing: false },
    Stage { name: "transform", equipment: Equipment::LabOven, hours: 5.0, is_mixing: false },
    Stage { name: "mix", equipment: Equipment::MixingStation, hours: 1.0, is_mixing: true },
];

const POWDER_STAGES: &[Stage] = &[
    Stage { name: "grow", equipment: Equipment::GrowingPot, hours: 29.0, is_mixing: false },
    Stage { name: "prepare", equipment: Equipment::Cauldron, hours: 7.0, is_mixing: false },
    Stage { name: "cook", equipment: Equipment::LabOven, hours: 5.0, is_mixing: false },
    Stage { name: "mix", equipment: Equipment::MixingStation, hours: 1.0, is_mixing: true },
];

/// Economics constants and stage topology of one product family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FamilyProfile {
    pub family: Family,
    pub batch_size: u32,
    pub fixed_cost: FixedCost,
    pub stages: &'static [Stage],
    /// Equipment without which nothing in the family can be made
    pub gate: Equipment,
    /// Daily units a single customer buys
    pub units_per_customer: u32,
}

impl FamilyProfile {
    pub fn for_family(family: Family) -> Self {
        match family {
            Family::Plant => FamilyProfile {
                family,
                batch_size: 8,
                // High quality soil lasts 3 batches at 60
                fixed_cost: FixedCost::SoilAndSeed { soil: 20.0 },
                stages: PLANT_STAGES,
                gate: Equipment::GrowingPot,
                units_per_customer: 5,
            },
            Family::Crystal => FamilyProfile {
                family,
                batch_size: 10,
                fixed_cost: FixedCost::Flat(160.0),
                stages: CRYSTAL_STAGES,
                gate: Equipment::ChemistryStation,
                units_per_customer: 5,
            },
            Family::Powder => FamilyProfile {
                family,
                batch_size: 10,
                fixed_cost: FixedCost::Flat(160.0),
                stages: POWDER_STAGES,
                gate: Equipment::Cauldron,
                units_per_customer: 1,
            },
        }
    }

    /// Units all customers buy per day
    pub fn demand(&self, customers: usize) -> u32 {
        u32::try_from(customers)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.units_per_customer)
    }

    /// Stages a product goes through; unmixed products skip mixing
    fn stages_for<'a>(&'a self, product: &Product) -> impl Iterator<Item = &'a Stage> {
        let mixed = !product.recipe_chain.is_empty();
        self.stages.iter().filter(move |s| mixed || !s.is_mixing)
    }

    /// Economics of one product under the given fixed batch cost, equipment
    /// and demand
    pub fn compute(
        &self,
        product: &Product,
        fixed_cost: f64,
        counts: &EquipmentCounts,
        demand: u32,
    ) -> ComputedProduct {
        let batch = f64::from(self.batch_size);
        let steps = product.recipe_chain.len() as f64;

        let total_cost = fixed_cost + product.ingredient_cost;
        let profit_per_batch = product.sell_price * batch - total_cost;
        let profit_per_unit = profit_per_batch / batch;
        let ratio_cost_benefit = if total_cost > 0.0 {
            profit_per_unit / total_cost
        } else {
            0.0
        };

        let max_production_per_day = self
            .stages_for(product)
            .map(|stage| stage.throughput(counts))
            .min()
            .unwrap_or(0);
        let production_per_day = demand.min(max_production_per_day.saturating_mul(self.batch_size));
        let profit_per_day = profit_per_unit * f64::from(production_per_day);

        let mix_time: f64 = self
            .stages
            .iter()
            .filter(|s| s.is_mixing)
            .map(|s| s.hours * steps)
            .sum();
        let time_per_batch = self
            .stages
            .iter()
            .filter(|s| !s.is_mixing)
            .map(|s| s.hours)
            .sum::<f64>()
            + mix_time;

        ComputedProduct {
            product: product.clone(),
            total_cost,
            profit_per_unit,
            profit_per_batch,
            ratio_cost_benefit,
            max_production_per_day,
            production_per_day,
            profit_per_day,
            time_per_batch,
            mix_time,
        }
    }
}

/// Result of one economics computation
#[derive(Debug, Clone, PartialEq)]
pub struct EconomicsReport {
    pub family: Family,
    pub products: Vec<ComputedProduct>,
    /// The gating equipment is missing: `products` holds one suggestion
    pub is_suggested: bool,
    pub equipment_used: EquipmentCounts,
    pub demand: u32,
}

/// Compute every product of a family.
///
/// When the family's gating equipment count is zero only the product with
/// the highest daily profit is returned, flagged as a suggestion.
pub fn compute_economics(
    products: &[Product],
    profile: &FamilyProfile,
    equipment: EquipmentCounts,
    customers: usize,
    margin: u32,
) -> EconomicsReport {
    let demand = profile.demand(customers).saturating_add(margin);
    let fixed_cost = profile.fixed_cost.for_family(products);
    let computed: Vec<ComputedProduct> = products
        .iter()
        .map(|p| profile.compute(p, fixed_cost, &equipment, demand))
        .collect();

    let is_suggested = equipment.get(profile.gate) == 0;
    let products = if is_suggested {
        info!(
            "No {} available for {} products, suggesting one",
            profile.gate, profile.family
        );
        // First product wins ties
        computed
            .into_iter()
            .reduce(|best, p| if p.profit_per_day > best.profit_per_day { p } else { best })
            .into_iter()
            .collect()
    } else {
        computed
    };

    debug!(
        "{} economics: {} products, fixed cost {}, demand {} units/day, equipment {:?}",
        profile.family,
        products.len(),
        fixed_cost,
        demand,
        equipment
    );

    EconomicsReport {
        family: profile.family,
        products,
        is_suggested,
        equipment_used: equipment,
        demand,
    }
}

/// Field to rank computed products by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    ProfitPerUnit,
    ProfitPerBatch,
    #[default]
    ProfitPerDay,
    ProductionPerDay,
    MaxProductionPerDay,
    TotalCost,
    IngredientCost,
    SellPrice,
    RatioCostBenefit,
    TimePerBatch,
    MixSteps,
    Name,
    Base,
}

fn compare(a: &ComputedProduct, b: &ComputedProduct, field: SortField) -> Ordering {
    match field {
        SortField::ProfitPerUnit => a.profit_per_unit.total_cmp(&b.profit_per_unit),
        SortField::ProfitPerBatch => a.profit_per_batch.total_cmp(&b.profit_per_batch),
        SortField::ProfitPerDay => a.profit_per_day.total_cmp(&b.profit_per_day),
        SortField::ProductionPerDay => a.production_per_day.cmp(&b.production_per_day),
        SortField::MaxProductionPerDay => a.max_production_per_day.cmp(&b.max_production_per_day),
        SortField::TotalCost => a.total_cost.total_cmp(&b.total_cost),
        SortField::IngredientCost => a.product.ingredient_cost.total_cmp(&b.product.ingredient_cost),
        SortField::SellPrice => a.product.sell_price.total_cmp(&b.product.sell_price),
        SortField::RatioCostBenefit => a.ratio_cost_benefit.total_cmp(&b.ratio_cost_benefit),
        SortField::TimePerBatch => a.time_per_batch.total_cmp(&b.time_per_batch),
        SortField::MixSteps => a.mix_steps().cmp(&b.mix_steps()),
        SortField::Name => a.product.name.cmp(&b.product.name),
        SortField::Base => a.product.base_name.cmp(&b.product.base_name),
    }
}

/// Stable sort; descending unless `ascending`
pub fn sort_products(products: &mut [ComputedProduct], field: SortField, ascending: bool) {
    products.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        if ascending { ordering } else { ordering.reverse() }
    });
}

impl fmt::Display for EconomicsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} economics ===", self.family)?;
        let profile = FamilyProfile::for_family(self.family);
        let equipment: Vec<String> = profile
            .stages
            .iter()
            .map(|s| {
                format!(
                    "{} {} ({})",
                    self.equipment_used.get(s.equipment),
                    s.equipment,
                    s.name
                )
            })
            .collect();
        writeln!(f, "Equipment: {}", equipment.join(", "))?;
        writeln!(f, "Demand:    {} units/day", self.demand)?;
        if self.is_suggested {
            writeln!(
                f,
                "No {} available. Best product once some are in place:",
                profile.gate
            )?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:<24} {:<18} {:>7} {:>8} {:>9} {:>10} {:>7} {:>9} {:>10}",
            "Product", "Base", "Price", "Cost", "Profit/u", "Profit/b", "Units", "Hours", "Profit/d"
        )?;
        for p in &self.products {
            writeln!(
                f,
                "{:<24} {:<18} {:>7.0} {:>8.0} {:>9.2} {:>10.2} {:>7} {:>9.1} {:>10.2}",
                p.product.name,
                p.product.base_name,
                p.product.sell_price,
                p.total_cost,
                p.profit_per_unit,
                p.profit_per_batch,
                p.production_per_day,
                p.time_per_batch,
                p.profit_per_day
            )?;
        }

        Ok(())
    }
}

//! Data models for save-file records and product economics

use std::fmt;

use chrono::NaiveDateTime;

/// One file of an unpacked save archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String, // Slash-separated, starting with the save root folder
    pub content: String,
}

impl ArchiveEntry {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Product line. The save tags each product with a numeric `DrugType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    Plant,
    Crystal,
    Powder,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Plant, Family::Crystal, Family::Powder];

    pub fn from_tag(tag: u8) -> Option<Family> {
        match tag {
            0 => Some(Family::Plant),
            1 => Some(Family::Crystal),
            2 => Some(Family::Powder),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            Family::Plant => 0,
            Family::Crystal => 1,
            Family::Powder => 2,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Plant => write!(f, "plant"),
            Family::Crystal => write!(f, "crystal"),
            Family::Powder => write!(f, "powder"),
        }
    }
}

/// A discovered product as recorded in the save, before cost derivation
#[derive(Debug, Clone, PartialEq)]
pub struct RawProductRecord {
    pub name: String,
    pub id: String,
    pub family: Family,
    pub properties: Vec<String>, // Effect ids
    pub data_type: String,
    pub game_version: String,
    pub sell_price: Option<f64>,
    pub recipe: Option<MixRecipeEdge>,
}

/// One discovered mixing operation: `input_product_id + additive_id -> output_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixRecipeEdge {
    pub output_id: String,
    pub input_product_id: String,
    pub additive_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeStep {
    pub product_id: String,
    pub additive_id: String,
}

/// Why a recipe chain walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEnd {
    /// The product itself has no recipe edge.
    NoRecipe,
    /// The last step's input is a catalog base product.
    BaseProduct,
    /// The last step's input exists but was never mixed.
    DeadEnd,
    /// The last step's input has no product record.
    MissingInput,
    /// The last step's input is the product being walked.
    SelfReference,
    /// The last step's input was already visited.
    Cycle,
}

/// Mixing steps ordered from the finished product's immediate predecessor
/// down to the step whose input is the base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeChain {
    pub steps: Vec<RecipeStep>,
    pub end: ChainEnd,
}

impl RecipeChain {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn terminal(&self) -> Option<&RecipeStep> {
        self.steps.last()
    }
}

/// A product with its cost lineage resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub family: Family,
    pub base_id: String,
    pub base_name: String,
    pub sell_price: f64,
    pub recipe_chain: RecipeChain,
    pub ingredient_cost: f64,   // Sum of additive prices along the chain
    pub seed_cost: Option<f64>, // Plant line only
    pub effects: Vec<String>,
}

/// Product economics under a given equipment and demand snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedProduct {
    pub product: Product,
    pub total_cost: f64, // Per batch
    pub profit_per_unit: f64,
    pub profit_per_batch: f64,
    pub ratio_cost_benefit: f64,
    pub max_production_per_day: u32, // Batches
    pub production_per_day: u32,     // Units, demand capped
    pub profit_per_day: f64,
    pub time_per_batch: f64, // Hours
    pub mix_time: f64,       // Hours
}

impl ComputedProduct {
    pub fn mix_steps(&self) -> usize {
        self.product.recipe_chain.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeType {
    Chemist,
    Packager,
    Botanist,
    Cleaner,
}

impl fmt::Display for EmployeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmployeeType::Chemist => "Chemist",
            EmployeeType::Packager => "Packager",
            EmployeeType::Botanist => "Botanist",
            EmployeeType::Cleaner => "Cleaner",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub name: String,
    pub id: String,
    pub kind: Option<EmployeeType>,
    pub property_id: String,
    pub salary: u32, // Per day
}

/// Placed equipment of one type on a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyObject {
    pub id: String,
    pub name: String,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub employees: Vec<Employee>,
    pub objects: Vec<PropertyObject>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Westville,
    Northtown,
    Uptown,
    Downtown,
    Docks,
    Suburbia,
}

impl Location {
    pub const ALL: [Location; 6] = [
        Location::Westville,
        Location::Northtown,
        Location::Uptown,
        Location::Downtown,
        Location::Docks,
        Location::Suburbia,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Location::Westville => "Westville",
            Location::Northtown => "Northtown",
            Location::Uptown => "Uptown",
            Location::Downtown => "Downtown",
            Location::Docks => "Docks",
            Location::Suburbia => "Suburbia",
        }
    }
}

/// Average quantity a customer orders of one product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDemand {
    pub id: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub product_affinities: Vec<f64>,
    pub average_order_quantity: f64,
    pub products: Vec<ProductDemand>,
    pub is_client: bool, // Contract, recommendation or deal history
    pub unlocked: bool,  // From the relationship file
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dealer {
    pub id: String,
    pub name: String,
    pub customers: Vec<String>, // Customer ids
    pub recruited: bool,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub debt: f64,
    pub unlocked: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NpcSet {
    pub dealers: Vec<Dealer>,
    pub customers: Vec<Customer>, // Active clients only
    pub suppliers: Vec<Supplier>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameInfo {
    pub elapsed_days: Option<u32>,
    pub creation_date: Option<NaiveDateTime>,
    pub last_played_date: Option<NaiveDateTime>,
    pub seed: Option<i64>,
    pub organisation_name: Option<String>,
    pub playtime: Option<f64>, // Seconds
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerInfo {
    pub rank: Option<u32>,
    pub tier: Option<u32>,
    pub xp: Option<u64>,
    pub total_xp: Option<u64>,
    pub online_balance: Option<f64>,
    pub net_worth: Option<f64>,
    pub lifetime_earnings: Option<f64>,
}

/// Global save state read from the top-level files of the save root
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveMetadata {
    pub game: GameInfo,
    pub player: PlayerInfo,
}

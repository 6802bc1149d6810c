//! Static reference tables: base products, additives, object names,
//! employee salaries, property codes and dealer territories

use crate::models::{EmployeeType, Family, Location};

/// A product that is not made by mixing and anchors every recipe chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseProduct {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub seed_cost: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Additive {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
}

const PLANT_BASES: &[BaseProduct] = &[
    BaseProduct { id: "ogkush", name: "Og Kush", price: 57.0, seed_cost: Some(30.0) },
    BaseProduct { id: "sourdiesel", name: "Sour Diesel", price: 63.0, seed_cost: Some(35.0) },
    BaseProduct { id: "granddaddypurple", name: "Granddaddy Purple", price: 64.0, seed_cost: Some(40.0) },
    BaseProduct { id: "greencrack", name: "Green Crack", price: 64.0, seed_cost: Some(40.0) },
];

const CRYSTAL_BASES: &[BaseProduct] = &[
    BaseProduct { id: "meth", name: "Meth", price: 70.0, seed_cost: None },
];

const POWDER_BASES: &[BaseProduct] = &[
    BaseProduct { id: "cocaine", name: "Cocaine", price: 150.0, seed_cost: None },
];

const ADDITIVES: &[Additive] = &[
    Additive { id: "addy", name: "Addy", price: 9.0 },
    Additive { id: "banana", name: "Banana", price: 2.0 },
    Additive { id: "battery", name: "Battery", price: 8.0 },
    Additive { id: "chili", name: "Chili", price: 4.0 },
    Additive { id: "cuke", name: "Cuke", price: 2.0 },
    Additive { id: "donut", name: "Donut", price: 3.0 },
    Additive { id: "energydrink", name: "Energy Drink", price: 6.0 },
    Additive { id: "flumedicine", name: "Flu Medicine", price: 5.0 },
    Additive { id: "gasoline", name: "Gasoline", price: 5.0 },
    Additive { id: "horsesemen", name: "Horse Semen", price: 8.0 },
    Additive { id: "iodine", name: "Iodine", price: 8.0 },
    Additive { id: "megabean", name: "Mega Bean", price: 7.0 },
    Additive { id: "motoroil", name: "Motor Oil", price: 6.0 },
    Additive { id: "mouthwash", name: "Mouthwash", price: 4.0 },
    Additive { id: "paracetamol", name: "Paracetamol", price: 6.0 },
    Additive { id: "viagra", name: "Viagra", price: 6.0 },
];

const GAME_OBJECTS: &[(&str, &str)] = &[
    ("bed", "Bed"),
    ("chemistrystation", "Chemistry Station"),
    ("displaycabinet", "Display Cabinet"),
    ("dryingrack", "Drying Rack"),
    ("fullspectrumgrowlight", "Full Spectrum Grow Light"),
    ("growtent", "Grow Tent"),
    ("laboven", "Lab Oven"),
    ("largestoragerack", "Large Storage Rack"),
    ("mediumstoragerack", "Medium Storage Rack"),
    ("mixingstation", "Mixing Station"),
    ("moisturepreservingpot", "Moisture Preserving Pot"),
    ("packagingstation", "Packaging Station"),
    ("smallstoragerack", "Small Storage Rack"),
    ("suspensionrack", "Suspension Rack"),
    ("trashcan", "Trash Can"),
    ("TV", "TV"),
    ("cauldron", "Cauldron"),
    ("brickpress", "Brick Press"),
    ("ledgrowlight", "LED Grow Light"),
    ("plasticpot", "Plastic Pot"),
];

/// Object types that count as growing pots
pub const GROWING_OBJECTS: &[&str] = &["growtent", "moisturepreservingpot", "plasticpot"];

const PROPERTY_CODES: &[(&str, &str)] = &[
    ("Barn", "barn"),
    ("Bungalow", "bungalow"),
    ("Motel Room", "motelroom"),
    ("Sweatshop", "sweatshop"),
];

/// Preferred default property selection, most preferred first
pub const PREFERRED_PROPERTIES: &[&str] = &["sweatshop", "motelroom"];

/// Assigned customers a dealer can hold
pub const DEALER_CAPACITY: usize = 8;

pub fn base_products(family: Family) -> &'static [BaseProduct] {
    match family {
        Family::Plant => PLANT_BASES,
        Family::Crystal => CRYSTAL_BASES,
        Family::Powder => POWDER_BASES,
    }
}

pub fn base_product(family: Family, id: &str) -> Option<&'static BaseProduct> {
    base_products(family).iter().find(|b| b.id == id)
}

/// True when `id` is a base product of any family
pub fn is_base_product(id: &str) -> bool {
    Family::ALL.iter().any(|&f| base_product(f, id).is_some())
}

pub fn additive(id: &str) -> Option<&'static Additive> {
    ADDITIVES.iter().find(|a| a.id == id)
}

/// Unit price of an additive, 0 when unknown
pub fn additive_price(id: &str) -> f64 {
    additive(id).map_or(0.0, |a| a.price)
}

/// Display name of a placed object type, the raw id when unknown
pub fn object_name(id: &str) -> &str {
    GAME_OBJECTS
        .iter()
        .find(|(key, _)| *key == id)
        .map_or(id, |(_, name)| *name)
}

pub fn employee_type(data_type: &str) -> Option<EmployeeType> {
    match data_type {
        "ChemistData" => Some(EmployeeType::Chemist),
        "PackagerData" => Some(EmployeeType::Packager),
        "BotanistData" => Some(EmployeeType::Botanist),
        "CleanerData" => Some(EmployeeType::Cleaner),
        _ => None,
    }
}

pub fn salary(kind: EmployeeType) -> u32 {
    match kind {
        EmployeeType::Chemist => 300,
        EmployeeType::Packager => 200,
        EmployeeType::Botanist => 200,
        EmployeeType::Cleaner => 100,
    }
}

/// Property code for a property folder's display name.
///
/// Names outside the table fall back to the lowercased name without spaces,
/// which is how the game derives the codes it ships with.
pub fn property_code(display_name: &str) -> String {
    PROPERTY_CODES
        .iter()
        .find(|(name, _)| *name == display_name)
        .map(|(_, code)| code.to_string())
        .unwrap_or_else(|| display_name.replace(' ', "").to_lowercase())
}

pub fn dealer_location(dealer_id: &str) -> Option<Location> {
    match dealer_id {
        "benji_coleman" => Some(Location::Northtown),
        "molly_presley" => Some(Location::Westville),
        "brad_crosby" => Some(Location::Downtown),
        "jane_lucero" => Some(Location::Docks),
        "wei_long" => Some(Location::Suburbia),
        "leo_rivers" => Some(Location::Uptown),
        _ => None,
    }
}

/// Customers a dealer should ideally serve. Unknown dealers have none.
pub fn ideal_dealer_customers(dealer_id: &str) -> &'static [&'static str] {
    match dealer_id {
        "benji_coleman" => &[
            "austin_steiner",
            "beth_penn",
            "chloe_bowers",
            "donna_martin",
            "kathy_henderson",
            "kyle_cooley",
            "ludwig_meyer",
            "mick_lubbin",
        ],
        "molly_presley" => &[
            "charles_rowland",
            "doris_lubbin",
            "joyce_ball",
            "keith_wagner",
            "kim_delaney",
            "meg_cooley",
            "trent_sherman",
            "jerry_montero",
        ],
        "brad_crosby" => &[
            "ming",
            "peggy_myers",
            "peter_file",
            "sam_thompson",
            "elizabeth_homley",
            "eugene_buckley",
            "greg_figgle",
            "jeff_gilmore",
        ],
        "jane_lucero" => &[
            "jennifer_rivera",
            "kevin_oakley",
            "louis_fourier",
            "lucy_pennington",
            "philip_wentworth",
            "randy_caulfield",
            "anna_chesterfield",
            "billy_kramer",
        ],
        "wei_long" => &[
            "cranky_frank",
            "genghis_barn",
            "javier_perez",
            "lisa_gardener",
            "mac_cooper",
            "marco_baron",
            "melissa_wood",
        ],
        _ => &[],
    }
}

pub fn location_npcs(location: Location) -> &'static [&'static str] {
    match location {
        Location::Westville => &[
            "trent_sherman",
            "meg_cooley",
            "joyce_ball",
            "keith_wagner",
            "doris_lubbin",
            "kim_delaney",
            "charles_rowland",
            "jerry_montero",
            "dean_webster",
            "goerge_greene",
        ],
        Location::Northtown => &[
            "jessi_waters",
            "kathy_henderson",
            "kyle_cooley",
            "austin_steiner",
            "sam_thompson",
            "mick_lubbin",
            "peter_file",
            "chloe_bowers",
            "donna_martin",
            "peggy_myers",
            "mrs_ming",
            "beth_penn",
            "ludwig_meyer",
            "geraldine_poon",
        ],
        Location::Uptown => &[
            "ray_hoffman",
            "lily_hancock",
            "fiona_hancock",
            "jen_heard",
            "walter_cussler",
            "herbert_blueball",
            "micheal_boog",
            "tobias_wentworth",
            "pearl_moore",
        ],
        Location::Downtown => &[
            "jeff_gilmore",
            "elizabeth_homley",
            "lucy_pennington",
            "jennifer_rivera",
            "louis_fourier",
            "kevin_oakley",
            "eugene_buckley",
            "philip_wentworth",
            "randy_caulfield",
        ],
        Location::Docks => &[
            "javier_perez",
            "genghis_barn",
            "anna_chesterfield",
            "lisa_gardener",
            "cranky_frank",
            "marco_baron",
            "mac_cooper",
            "billy_kramer",
            "melissa_wood",
        ],
        Location::Suburbia => &[
            "karen_kennedy",
            "jackie_stevenson",
            "hank_stevenson",
            "dennis_kennedy",
            "jack_knight",
            "carl_bundy",
            "harold_colt",
            "jeremy_wilkinson",
        ],
    }
}

/// Home location of a neighbourhood NPC
pub fn npc_location(npc_id: &str) -> Option<Location> {
    Location::ALL
        .into_iter()
        .find(|&loc| location_npcs(loc).contains(&npc_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_products_are_found_across_families() {
        assert!(is_base_product("ogkush"));
        assert!(is_base_product("meth"));
        assert!(is_base_product("cocaine"));
        assert!(!is_base_product("cuke"));
        assert_eq!(base_product(Family::Plant, "meth"), None);
        assert_eq!(base_product(Family::Plant, "sourdiesel").unwrap().seed_cost, Some(35.0));
    }

    #[test]
    fn unknown_lookups_fall_back() {
        assert_eq!(additive_price("cuke"), 2.0);
        assert_eq!(additive_price("glitter"), 0.0);
        assert_eq!(object_name("laboven"), "Lab Oven");
        assert_eq!(object_name("mystery_crate"), "mystery_crate");
        assert_eq!(property_code("Motel Room"), "motelroom");
        assert_eq!(property_code("Docks Warehouse"), "dockswarehouse");
        assert!(ideal_dealer_customers("leo_rivers").is_empty());
    }

    #[test]
    fn npcs_resolve_to_their_neighbourhood() {
        assert_eq!(npc_location("beth_penn"), Some(Location::Northtown));
        assert_eq!(npc_location("nobody"), None);
        assert_eq!(dealer_location("wei_long"), Some(Location::Suburbia));
        assert_eq!(salary(EmployeeType::Chemist), 300);
        assert_eq!(employee_type("BotanistData"), Some(EmployeeType::Botanist));
    }
}

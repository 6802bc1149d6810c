//! Synthetic save archive builders for parser tests. Every entry lives
//! under the `Save` root folder.

use serde_json::{Value, json};

use crate::models::ArchiveEntry;

fn entry(path: String, content: Value) -> ArchiveEntry {
    ArchiveEntry::new(path, content.to_string())
}

pub fn product_file(id: &str, name: &str, tag: u8) -> ArchiveEntry {
    entry(
        format!("Save/Products/CreatedProducts/{id}.json"),
        json!({
            "DataType": "WeedProductData",
            "DataVersion": 0,
            "GameVersion": "0.3.3f15",
            "Name": name,
            "ID": id,
            "DrugType": tag,
            "Properties": ["calming"],
        }),
    )
}

/// Products manifest. Recipes are `(product, mixer, output)` as written in
/// the save.
pub fn manifest(
    discovered: &[&str],
    recipes: &[(&str, &str, &str)],
    prices: &[(&str, f64)],
) -> ArchiveEntry {
    let recipes: Vec<Value> = recipes
        .iter()
        .map(|(product, mixer, output)| {
            json!({ "Product": product, "Mixer": mixer, "Output": output })
        })
        .collect();
    let prices: Vec<Value> = prices
        .iter()
        .map(|(id, price)| json!({ "String": id, "Int": price }))
        .collect();

    entry(
        "Save/Products/Products.json".to_string(),
        json!({
            "DataType": "ProductManagerData",
            "DiscoveredProducts": discovered,
            "MixRecipes": recipes,
            "ProductPrices": prices,
        }),
    )
}

pub fn property_record(folder: &str, code: &str) -> ArchiveEntry {
    entry(
        format!("Save/Properties/{folder}/Property.json"),
        json!({ "DataType": "PropertyData", "PropertyCode": code, "IsOwned": true }),
    )
}

/// One placed object instance; the object id travels inside `ItemString`
pub fn property_object(folder: &str, instance: &str, object_id: &str) -> ArchiveEntry {
    let item = json!({ "DataType": "ItemData", "ID": object_id, "Quantity": 1 });
    entry(
        format!("Save/Properties/{folder}/Objects/{object_id}_{instance}/Data.json"),
        json!({ "DataType": "BuildableItemData", "ItemString": item.to_string() }),
    )
}

pub fn employee(folder: &str, name: &str, id: &str, data_type: &str, assigned: &str) -> ArchiveEntry {
    entry(
        format!("Save/Properties/{folder}/Employees/{name}/NPC.json"),
        json!({ "DataType": data_type, "ID": id, "AssignedProperty": assigned }),
    )
}

pub fn customer(name: &str, completed_deals: u32) -> ArchiveEntry {
    entry(
        format!("Save/NPCs/{name}/NPC.json"),
        json!({
            "DataType": "NPCData",
            "ID": name,
            "IsContractOffered": false,
            "HasBeenRecommended": false,
            "CompletedDeals": completed_deals,
            "OfferedDeals": 0,
        }),
    )
}

pub fn dealer(name: &str, customers: &[&str], recruited: bool) -> ArchiveEntry {
    entry(
        format!("Save/NPCs/{name}/NPC.json"),
        json!({
            "DataType": "DealerData",
            "ID": name,
            "Recruited": recruited,
            "AssignedCustomerIDs": customers,
        }),
    )
}

pub fn supplier(name: &str, debt: f64) -> ArchiveEntry {
    entry(
        format!("Save/NPCs/{name}/NPC.json"),
        json!({ "DataType": "SupplierData", "ID": name, "debt": debt }),
    )
}

pub fn customer_data(name: &str, affinities: &[f64]) -> ArchiveEntry {
    entry(
        format!("Save/NPCs/{name}/CustomerData.json"),
        json!({ "DataType": "CustomerData", "ProductAffinities": affinities }),
    )
}

/// Message history as `(sender, text)` pairs
pub fn conversation(name: &str, messages: &[(u8, &str)]) -> ArchiveEntry {
    let history: Vec<Value> = messages
        .iter()
        .enumerate()
        .map(|(i, (sender, text))| {
            json!({ "Sender": sender, "MessageID": i, "Text": text, "EndOfChain": false })
        })
        .collect();
    entry(
        format!("Save/NPCs/{name}/MSGConversation/MessageConversation.json"),
        json!({ "DataType": "MSGConversationData", "MessageHistory": history }),
    )
}

pub fn relationship(name: &str, unlocked: bool) -> ArchiveEntry {
    entry(
        format!("Save/NPCs/{name}/Relationship.json"),
        json!({ "DataType": "RelationshipData", "RelationDelta": 2.5, "Unlocked": unlocked }),
    )
}

pub fn global(category: &str, content: Value) -> ArchiveEntry {
    entry(format!("Save/{category}.json"), content)
}

/// A small but complete save: every section present
pub fn sample_save() -> Vec<ArchiveEntry> {
    vec![
        global("Game", json!({ "OrganisationName": "Hyland Point Co", "Seed": 1234 })),
        global(
            "Metadata",
            json!({
                "CreationDate": { "Year": 2025, "Month": 3, "Day": 28, "Hour": 14, "Minute": 5, "Second": 9 },
                "LastPlayedDate": { "Year": 2025, "Month": 4, "Day": 2, "Hour": 22, "Minute": 41, "Second": 0 },
            }),
        ),
        global(
            "Money",
            json!({ "OnlineBalance": 1520.5, "Networth": 48210.0, "LifetimeEarnings": 90500.0 }),
        ),
        global("Rank", json!({ "Rank": 3, "Tier": 2, "XP": 410, "TotalXP": 9810 })),
        global("Time", json!({ "ElapsedDays": 42, "Playtime": 51234.5 })),
        product_file("kushcuke", "Kush Cuke", 0),
        product_file("bananakush", "Banana Kush", 0),
        product_file("methcuke", "Meth Cuke", 1),
        product_file("cokechili", "Coke Chili", 2),
        manifest(
            &["kushcuke", "bananakush", "methcuke", "cokechili"],
            &[
                ("ogkush", "cuke", "kushcuke"),
                ("kushcuke", "banana", "bananakush"),
                ("meth", "cuke", "methcuke"),
                ("cocaine", "chili", "cokechili"),
            ],
            &[
                ("ogkush", 38.0),
                ("kushcuke", 45.0),
                ("bananakush", 52.0),
                ("meth", 70.0),
                ("methcuke", 84.0),
                ("cocaine", 150.0),
                ("cokechili", 180.0),
            ],
        ),
        property_record("Sweatshop", "sweatshop"),
        property_record("Motel Room", "motelroom"),
        property_object("Sweatshop", "1", "plasticpot"),
        property_object("Sweatshop", "2", "plasticpot"),
        property_object("Sweatshop", "3", "mixingstation"),
        property_object("Sweatshop", "4", "chemistrystation"),
        property_object("Sweatshop", "5", "laboven"),
        property_object("Motel Room", "6", "growtent"),
        employee("Sweatshop", "Jim", "jim_1", "BotanistData", "sweatshop"),
        employee("Sweatshop", "Kim", "kim_2", "ChemistData", "sweatshop"),
        customer("beth_penn", 4),
        customer("kyle_cooley", 1),
        customer("chloe_bowers", 0),
        customer_data("beth_penn", &[0.4, -0.2, 0.9]),
        conversation(
            "beth_penn",
            &[
                (0, "Got 3x Og Kush if you want it"),
                (1, "Could I get 2x Green Crack?"),
                (1, "4x Green Crack please"),
                (1, "1x Og Kush"),
            ],
        ),
        relationship("beth_penn", true),
        dealer("benji_coleman", &["beth_penn", "kyle_cooley", "jessi_waters"], true),
        relationship("benji_coleman", true),
        supplier("albert_hoover", 250.0),
        relationship("albert_hoover", false),
    ]
}

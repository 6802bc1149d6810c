//! NPC parsing: dealers, suppliers and customers, plus customer demand
//! extracted from message history

use std::collections::BTreeMap;

use clap::ValueEnum;
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;

use crate::catalog;
use crate::extract::{self, EntryKind};
use crate::models::{ArchiveEntry, Customer, Dealer, NpcSet, ProductDemand, Supplier};

/// Message sender code for the NPC side of a conversation
const NPC_SENDER: i64 = 1;

/// `NPC.json`, discriminated by its `DataType`
#[derive(Debug, Deserialize)]
#[serde(tag = "DataType")]
enum NpcRecord {
    #[serde(rename = "SupplierData", rename_all = "PascalCase")]
    Supplier {
        #[serde(rename = "ID", default)]
        id: String,
        #[serde(alias = "debt", default)]
        debt: f64,
    },
    #[serde(rename = "DealerData", rename_all = "PascalCase")]
    Dealer {
        #[serde(rename = "ID", default)]
        id: String,
        #[serde(default)]
        recruited: bool,
        #[serde(rename = "AssignedCustomerIDs", default)]
        assigned_customer_ids: Vec<String>,
    },
    #[serde(rename = "NPCData", rename_all = "PascalCase")]
    Customer {
        #[serde(rename = "ID", default)]
        id: String,
        #[serde(default)]
        is_contract_offered: bool,
        #[serde(default)]
        has_been_recommended: bool,
        #[serde(default)]
        completed_deals: i64,
        #[serde(default)]
        offered_deals: i64,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Affinity {
    Value(f64),
    Entry {
        #[serde(rename = "Affinity")]
        affinity: f64,
    },
}

impl Affinity {
    fn value(&self) -> f64 {
        match self {
            Affinity::Value(v) | Affinity::Entry { affinity: v } => *v,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CustomerDataFile {
    #[serde(default)]
    product_affinities: Vec<Affinity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConversationFile {
    #[serde(default)]
    message_history: Vec<Message>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Message {
    sender: i64,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RelationshipFile {
    #[serde(default)]
    unlocked: bool,
}

/// How a customer's overall average order quantity is aggregated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OrderAverage {
    /// Sum of each product's own average order quantity
    #[default]
    SumOfProducts,
    /// Total ordered quantity over all order messages
    Overall,
}

/// Demand signals read from one customer's messages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDemand {
    pub products: Vec<ProductDemand>,
    pub average_order_quantity: f64,
}

/// Finds `<quantity>x <Word> <Word>` orders in message text
#[derive(Debug, Clone)]
pub struct OrderExtractor {
    pattern: Regex,
    policy: OrderAverage,
}

impl OrderExtractor {
    pub fn new(policy: OrderAverage) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"(?i)(\d+)x\s([a-z]+)\s([a-z]+)")?,
            policy,
        })
    }

    /// The first order in `text` as `(product key, quantity)`
    pub fn parse_order(&self, text: &str) -> Option<(String, u32)> {
        let caps = self.pattern.captures(text)?;
        let quantity: u32 = caps[1].parse().ok().filter(|&q| q > 0)?;
        let key = format!("{}{}", &caps[2], &caps[3]).to_lowercase();
        Some((key, quantity))
    }

    /// Aggregate `(sender, text)` messages into per-product averages.
    /// Only messages sent by the NPC count.
    pub fn demand<'a>(&self, messages: impl IntoIterator<Item = (i64, &'a str)>) -> CustomerDemand {
        // product -> (total quantity, order messages)
        let mut orders: BTreeMap<String, (u32, u32)> = BTreeMap::new();

        for (sender, text) in messages {
            if sender != NPC_SENDER {
                continue;
            }
            if let Some((key, quantity)) = self.parse_order(text) {
                let totals = orders.entry(key).or_default();
                totals.0 += quantity;
                totals.1 += 1;
            }
        }

        let products: Vec<ProductDemand> = orders
            .iter()
            .map(|(id, (quantity, count))| ProductDemand {
                id: id.clone(),
                amount: f64::from(*quantity) / f64::from(*count),
            })
            .collect();

        let average_order_quantity = match self.policy {
            OrderAverage::SumOfProducts => products.iter().map(|p| p.amount).sum(),
            OrderAverage::Overall => {
                let (quantity, count) = orders
                    .values()
                    .fold((0u32, 0u32), |(q, c), (dq, dc)| (q + dq, c + dc));
                if count == 0 {
                    0.0
                } else {
                    f64::from(quantity) / f64::from(count)
                }
            }
        };

        CustomerDemand {
            products,
            average_order_quantity,
        }
    }
}

/// Classify and enrich every NPC under `NPCs/`.
///
/// The first pass buckets each `NPC.json` by data type, keyed by its folder
/// name. The second pass merges sibling files into NPCs the first pass
/// found; files for unknown NPCs are ignored. Only customers with an
/// established buying relationship are returned: the relationship file's
/// `Unlocked` when one exists, otherwise any deal or contract signal.
pub fn parse_npcs(files: &[&ArchiveEntry], orders: &OrderExtractor) -> NpcSet {
    let mut dealers: BTreeMap<String, Dealer> = BTreeMap::new();
    let mut customers: BTreeMap<String, Customer> = BTreeMap::new();
    let mut suppliers: BTreeMap<String, Supplier> = BTreeMap::new();

    for entry in files {
        let EntryKind::Npc { npc } = extract::classify(&entry.path) else {
            continue;
        };
        let Some(record) = extract::read_json::<NpcRecord>(entry) else {
            continue;
        };
        let name = npc.to_string();

        match record {
            NpcRecord::Supplier { id, debt } => {
                suppliers.insert(
                    name.clone(),
                    Supplier {
                        id,
                        name,
                        debt,
                        unlocked: false,
                    },
                );
            }
            NpcRecord::Dealer {
                id,
                recruited,
                assigned_customer_ids,
            } => {
                let location = catalog::dealer_location(&id);
                dealers.insert(
                    name.clone(),
                    Dealer {
                        id,
                        name,
                        customers: assigned_customer_ids,
                        recruited,
                        location,
                    },
                );
            }
            NpcRecord::Customer {
                id,
                is_contract_offered,
                has_been_recommended,
                completed_deals,
                offered_deals,
            } => {
                let is_client = is_contract_offered
                    || has_been_recommended
                    || completed_deals > 0
                    || offered_deals > 0;
                customers.insert(
                    name.clone(),
                    Customer {
                        id,
                        name,
                        product_affinities: Vec::new(),
                        average_order_quantity: 0.0,
                        products: Vec::new(),
                        is_client,
                        unlocked: false,
                    },
                );
            }
            NpcRecord::Other => debug!("Ignoring NPC '{}' of unhandled type", npc),
        }
    }

    for entry in files {
        match extract::classify(&entry.path) {
            EntryKind::CustomerData { npc } => {
                let Some(customer) = customers.get_mut(npc) else {
                    continue;
                };
                if let Some(file) = extract::read_json::<CustomerDataFile>(entry) {
                    customer.product_affinities =
                        file.product_affinities.iter().map(Affinity::value).collect();
                }
            }
            EntryKind::MessageConversation { npc } => {
                let Some(customer) = customers.get_mut(npc) else {
                    continue;
                };
                if let Some(file) = extract::read_json::<ConversationFile>(entry) {
                    let demand = orders.demand(
                        file.message_history
                            .iter()
                            .map(|m| (m.sender, m.text.as_str())),
                    );
                    customer.products = demand.products;
                    customer.average_order_quantity = demand.average_order_quantity;
                }
            }
            EntryKind::Relationship { npc } => {
                let Some(file) = extract::read_json::<RelationshipFile>(entry) else {
                    continue;
                };
                // An existing relationship decides client status outright
                if let Some(customer) = customers.get_mut(npc) {
                    customer.unlocked = file.unlocked;
                    customer.is_client = file.unlocked;
                } else if let Some(dealer) = dealers.get_mut(npc) {
                    dealer.recruited = file.unlocked;
                } else if let Some(supplier) = suppliers.get_mut(npc) {
                    supplier.unlocked = file.unlocked;
                }
            }
            _ => {}
        }
    }

    let total_customers = customers.len();
    let customers: Vec<Customer> = customers.into_values().filter(|c| c.is_client).collect();
    info!(
        "NPCs: {} dealers, {} suppliers, {} of {} customers are clients",
        dealers.len(),
        suppliers.len(),
        customers.len(),
        total_customers
    );

    NpcSet {
        dealers: dealers.into_values().collect(),
        customers,
        suppliers: suppliers.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use crate::test_fixtures::{
        conversation, customer, customer_data, dealer, relationship, sample_save, supplier,
    };

    fn parse(entries: &[ArchiveEntry]) -> NpcSet {
        let files: Vec<&ArchiveEntry> = entries
            .iter()
            .filter(|e| e.path.starts_with("Save/NPCs/"))
            .collect();
        parse_npcs(&files, &OrderExtractor::new(OrderAverage::SumOfProducts).unwrap())
    }

    #[test]
    fn order_message_from_customer_counts() {
        let orders = OrderExtractor::new(OrderAverage::SumOfProducts).unwrap();
        assert_eq!(orders.parse_order("2x Green Crack"), Some(("greencrack".to_string(), 2)));
        assert_eq!(orders.parse_order("12X og kush pls"), Some(("ogkush".to_string(), 12)));
        assert_eq!(orders.parse_order("0x Green Crack"), None);
        assert_eq!(orders.parse_order("hey, got anything?"), None);

        let demand = orders.demand([(1, "2x Green Crack")]);
        assert_eq!(
            demand.products,
            vec![ProductDemand {
                id: "greencrack".into(),
                amount: 2.0
            }]
        );

        assert!(orders.demand([(0, "2x Green Crack")]).products.is_empty());
    }

    #[test]
    fn average_order_policies() {
        let messages = [
            (1, "Could I get 2x Green Crack?"),
            (1, "4x Green Crack please"),
            (1, "1x Og Kush"),
            (0, "9x Og Kush coming up"),
        ];

        let sum = OrderExtractor::new(OrderAverage::SumOfProducts).unwrap();
        let demand = sum.demand(messages);
        assert_eq!(demand.products.len(), 2);
        assert_eq!(demand.products[0].id, "greencrack");
        assert_eq!(demand.products[0].amount, 3.0);
        assert_eq!(demand.average_order_quantity, 4.0);

        let overall = OrderExtractor::new(OrderAverage::Overall).unwrap();
        assert_eq!(overall.demand(messages).average_order_quantity, 7.0 / 3.0);
        let silent: Vec<(i64, &str)> = Vec::new();
        assert_eq!(overall.demand(silent.clone()).average_order_quantity, 0.0);
        assert_eq!(sum.demand(silent).average_order_quantity, 0.0);
    }

    #[test]
    fn classifies_and_enriches_npcs() {
        let npcs = parse(&sample_save());

        assert_eq!(npcs.dealers.len(), 1);
        let benji = &npcs.dealers[0];
        assert_eq!(benji.customers.len(), 3);
        assert_eq!(benji.location, Some(Location::Northtown));
        assert!(benji.recruited);

        assert_eq!(npcs.suppliers.len(), 1);
        assert_eq!(npcs.suppliers[0].debt, 250.0);
        assert!(!npcs.suppliers[0].unlocked);

        let names: Vec<&str> = npcs.customers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["beth_penn", "kyle_cooley"]);

        let beth = &npcs.customers[0];
        assert_eq!(beth.product_affinities, vec![0.4, -0.2, 0.9]);
        assert_eq!(beth.average_order_quantity, 4.0);
        assert!(beth.unlocked);
        assert!(!npcs.customers[1].unlocked);
    }

    #[test]
    fn sibling_files_need_a_classified_npc() {
        let entries = vec![
            dealer("molly_presley", &[], false),
            // Demand files for a dealer and for an NPC with no record
            conversation("molly_presley", &[(1, "3x Og Kush")]),
            customer_data("ghost", &[1.0]),
            relationship("ghost", true),
            relationship("molly_presley", true),
            supplier("salvador_moreno", 0.0),
            customer("donna_martin", 0),
        ];

        let npcs = parse(&entries);
        assert!(npcs.customers.is_empty());
        assert!(npcs.dealers[0].recruited);
        assert_eq!(npcs.suppliers[0].name, "salvador_moreno");
    }

    #[test]
    fn any_relationship_signal_makes_a_client() {
        let entries = vec![
            ArchiveEntry::new(
                "Save/NPCs/dean_webster/NPC.json",
                r#"{"DataType": "NPCData", "ID": "dean_webster", "IsContractOffered": true}"#,
            ),
            ArchiveEntry::new(
                "Save/NPCs/jessi_waters/NPC.json",
                r#"{"DataType": "NPCData", "ID": "jessi_waters", "HasBeenRecommended": true}"#,
            ),
            ArchiveEntry::new(
                "Save/NPCs/mick_lubbin/NPC.json",
                r#"{"DataType": "NPCData", "ID": "mick_lubbin", "OfferedDeals": 2}"#,
            ),
            ArchiveEntry::new("Save/NPCs/officer/NPC.json", r#"{"DataType": "PoliceData"}"#),
            customer("chloe_bowers", 0),
        ];

        let npcs = parse(&entries);
        assert_eq!(npcs.customers.len(), 3);
        assert!(npcs.customers.iter().all(|c| c.is_client));
    }

    #[test]
    fn relationship_file_overrides_deal_signals() {
        let entries = vec![
            customer("chloe_bowers", 0),
            relationship("chloe_bowers", true),
            customer("beth_penn", 4),
            relationship("beth_penn", false),
            customer("kyle_cooley", 1),
        ];

        let npcs = parse(&entries);
        let names: Vec<&str> = npcs.customers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["chloe_bowers", "kyle_cooley"]);
        assert!(npcs.customers[0].unlocked);
        assert!(!npcs.customers[1].unlocked);
    }

    #[test]
    fn affinities_accept_weighted_entries() {
        let entries = vec![
            customer("beth_penn", 1),
            ArchiveEntry::new(
                "Save/NPCs/beth_penn/CustomerData.json",
                r#"{"ProductAffinities": [{"DrugType": 0, "Affinity": 0.25}, {"DrugType": 1, "Affinity": -0.5}]}"#,
            ),
        ];

        assert_eq!(parse(&entries).customers[0].product_affinities, vec![0.25, -0.5]);
    }
}

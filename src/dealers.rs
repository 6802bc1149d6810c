//! Dealer customer-assignment analysis

use crate::catalog;
use crate::models::{Customer, Dealer};

#[derive(Debug, Clone, PartialEq)]
pub struct AssignedCustomer {
    pub id: String,
    pub name: Option<String>, // None when no client with this id was parsed
    pub correctly_assigned: bool,
}

/// Swap a wrongly assigned customer for one from the dealer's ideal list
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub replace_id: String,
    pub with_id: Option<String>,
    pub with_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DealerReport {
    pub dealer: Dealer,
    pub customers: Vec<AssignedCustomer>,
    pub is_optimized: bool,
    pub suggestions: Vec<Suggestion>,
}

fn customer_name(customers: &[Customer], id: &str) -> Option<String> {
    customers.iter().find(|c| c.id == id).map(|c| c.name.clone())
}

/// Check every dealer's assigned customers against its ideal territory.
///
/// A dealer is optimized when it holds a full roster of correctly assigned
/// customers. Otherwise each wrong customer is paired, in order, with an
/// ideal customer the dealer does not serve yet.
pub fn analyze_dealers(dealers: &[Dealer], customers: &[Customer]) -> Vec<DealerReport> {
    dealers
        .iter()
        .map(|dealer| {
            let ideal = catalog::ideal_dealer_customers(&dealer.id);

            let assigned: Vec<AssignedCustomer> = dealer
                .customers
                .iter()
                .map(|id| AssignedCustomer {
                    id: id.clone(),
                    name: customer_name(customers, id),
                    correctly_assigned: ideal.contains(&id.as_str()),
                })
                .collect();

            let is_optimized = assigned.len() == catalog::DEALER_CAPACITY
                && assigned.iter().all(|c| c.correctly_assigned);

            let suggestions = if is_optimized {
                Vec::new()
            } else {
                let mut missing = ideal
                    .iter()
                    .filter(|id| !dealer.customers.iter().any(|c| c == *id));
                assigned
                    .iter()
                    .filter(|c| !c.correctly_assigned)
                    .map(|wrong| {
                        let with_id = missing.next().map(|id| id.to_string());
                        Suggestion {
                            replace_id: wrong.id.clone(),
                            with_name: with_id
                                .as_deref()
                                .and_then(|id| customer_name(customers, id)),
                            with_id,
                        }
                    })
                    .collect()
            };

            DealerReport {
                dealer: dealer.clone(),
                customers: assigned,
                is_optimized,
                suggestions,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dealer(id: &str, customers: &[&str]) -> Dealer {
        Dealer {
            id: id.into(),
            name: id.into(),
            customers: customers.iter().map(|c| c.to_string()).collect(),
            recruited: true,
            location: catalog::dealer_location(id),
        }
    }

    fn client(id: &str) -> Customer {
        Customer {
            id: id.into(),
            name: id.into(),
            product_affinities: Vec::new(),
            average_order_quantity: 0.0,
            products: Vec::new(),
            is_client: true,
            unlocked: true,
        }
    }

    #[test]
    fn full_ideal_roster_is_optimized() {
        let ideal = catalog::ideal_dealer_customers("benji_coleman");
        let clients: Vec<Customer> = ideal.iter().map(|id| client(id)).collect();

        let reports = analyze_dealers(&[dealer("benji_coleman", ideal)], &clients);
        assert!(reports[0].is_optimized);
        assert!(reports[0].suggestions.is_empty());
        assert!(reports[0].customers.iter().all(|c| c.name.is_some()));
    }

    #[test]
    fn wrong_customers_get_replacements_in_order() {
        let clients = vec![client("beth_penn"), client("austin_steiner"), client("meg_cooley")];
        let reports = analyze_dealers(
            &[dealer("benji_coleman", &["beth_penn", "meg_cooley", "trent_sherman"])],
            &clients,
        );
        let report = &reports[0];

        assert!(!report.is_optimized);
        assert!(report.customers[0].correctly_assigned);
        assert!(!report.customers[1].correctly_assigned);
        // Not a parsed client: shown without a name
        assert_eq!(report.customers[2].name, None);

        assert_eq!(
            report.suggestions,
            vec![
                Suggestion {
                    replace_id: "meg_cooley".into(),
                    with_id: Some("austin_steiner".into()),
                    with_name: Some("austin_steiner".into()),
                },
                Suggestion {
                    replace_id: "trent_sherman".into(),
                    with_id: Some("chloe_bowers".into()),
                    with_name: None,
                },
            ]
        );
    }

    #[test]
    fn short_roster_is_not_optimized() {
        let reports = analyze_dealers(&[dealer("wei_long", &["cranky_frank"])], &[]);
        assert!(!reports[0].is_optimized);
        assert!(reports[0].suggestions.is_empty());

        // Unknown dealers have no ideal customers
        let reports = analyze_dealers(&[dealer("leo_rivers", &["ray_hoffman"])], &[]);
        assert_eq!(reports[0].suggestions[0].with_id, None);
    }
}

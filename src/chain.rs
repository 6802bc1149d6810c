//! Recipe chain reconstruction
//!
//! Walks mix recipe edges backward from a finished product until it reaches a
//! catalog base product, or until the graph runs out or loops.

use std::collections::{HashMap, HashSet};

use crate::catalog;
use crate::models::{ChainEnd, MixRecipeEdge, RecipeChain, RecipeStep};

/// Build the ordered mixing steps that produced `product_id`.
///
/// `edges` is keyed by output product id. `records` is only consulted for
/// membership: a step whose input has no record ends the walk there.
pub fn build_chain<R>(
    product_id: &str,
    edges: &HashMap<String, MixRecipeEdge>,
    records: &HashMap<String, R>,
) -> RecipeChain {
    let mut steps = Vec::new();
    let mut visited = HashSet::from([product_id]);
    let mut current = product_id;

    let end = loop {
        let Some(edge) = edges.get(current) else {
            break if steps.is_empty() {
                ChainEnd::NoRecipe
            } else {
                ChainEnd::DeadEnd
            };
        };

        let input = edge.input_product_id.as_str();
        steps.push(RecipeStep {
            product_id: input.to_string(),
            additive_id: edge.additive_id.clone(),
        });

        if catalog::is_base_product(input) {
            break ChainEnd::BaseProduct;
        }
        if input == current {
            break ChainEnd::SelfReference;
        }
        if !records.contains_key(input) {
            break ChainEnd::MissingInput;
        }
        if !visited.insert(input) {
            break ChainEnd::Cycle;
        }
        current = input;
    };

    RecipeChain { steps, end }
}

/// Total additive cost of a chain; unknown additives cost nothing
pub fn ingredient_cost(chain: &RecipeChain) -> f64 {
    chain
        .steps
        .iter()
        .map(|step| catalog::additive_price(&step.additive_id))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(output: &str, input: &str, additive: &str) -> (String, MixRecipeEdge) {
        (
            output.to_string(),
            MixRecipeEdge {
                output_id: output.to_string(),
                input_product_id: input.to_string(),
                additive_id: additive.to_string(),
            },
        )
    }

    fn records(ids: &[&str]) -> HashMap<String, ()> {
        ids.iter().map(|id| (id.to_string(), ())).collect()
    }

    fn step_ids(chain: &RecipeChain) -> Vec<(&str, &str)> {
        chain
            .steps
            .iter()
            .map(|s| (s.product_id.as_str(), s.additive_id.as_str()))
            .collect()
    }

    #[test]
    fn walks_back_to_base_product() {
        let edges = HashMap::from([
            edge("kushcuke", "ogkush", "cuke"),
            edge("kushcukebanana", "kushcuke", "banana"),
            edge("tripleshot", "kushcukebanana", "addy"),
        ]);
        let known = records(&["kushcuke", "kushcukebanana", "tripleshot"]);

        let chain = build_chain("tripleshot", &edges, &known);

        assert_eq!(
            step_ids(&chain),
            vec![("kushcukebanana", "addy"), ("kushcuke", "banana"), ("ogkush", "cuke")]
        );
        assert_eq!(chain.end, ChainEnd::BaseProduct);
        assert_eq!(ingredient_cost(&chain), 9.0 + 2.0 + 2.0);
    }

    #[test]
    fn base_product_input_stops_even_with_more_edges() {
        let edges = HashMap::from([edge("methcuke", "meth", "cuke"), edge("meth", "oddity", "addy")]);
        let chain = build_chain("methcuke", &edges, &records(&["methcuke", "meth"]));

        assert_eq!(step_ids(&chain), vec![("meth", "cuke")]);
        assert_eq!(chain.end, ChainEnd::BaseProduct);
    }

    #[test]
    fn product_without_edge_has_empty_chain() {
        let chain = build_chain("ogkush", &HashMap::new(), &records(&["ogkush"]));
        assert!(chain.is_empty());
        assert_eq!(chain.end, ChainEnd::NoRecipe);
        assert_eq!(ingredient_cost(&chain), 0.0);
    }

    #[test]
    fn missing_input_record_keeps_current_step() {
        let edges = HashMap::from([edge("mystery", "lostproduct", "donut")]);
        let chain = build_chain("mystery", &edges, &records(&["mystery"]));

        assert_eq!(step_ids(&chain), vec![("lostproduct", "donut")]);
        assert_eq!(chain.end, ChainEnd::MissingInput);
    }

    #[test]
    fn self_reference_and_cycles_terminate() {
        let selfish = HashMap::from([edge("loop", "loop", "chili")]);
        let chain = build_chain("loop", &selfish, &records(&["loop"]));
        assert_eq!(step_ids(&chain), vec![("loop", "chili")]);
        assert_eq!(chain.end, ChainEnd::SelfReference);

        let cyclic = HashMap::from([edge("a", "b", "cuke"), edge("b", "a", "donut")]);
        let chain = build_chain("a", &cyclic, &records(&["a", "b"]));
        assert_eq!(step_ids(&chain), vec![("b", "cuke"), ("a", "donut")]);
        assert_eq!(chain.end, ChainEnd::Cycle);
    }

    #[test]
    fn unmixed_intermediate_is_a_dead_end() {
        let edges = HashMap::from([edge("shiny", "plain", "iodine")]);
        let chain = build_chain("shiny", &edges, &records(&["shiny", "plain"]));

        assert_eq!(step_ids(&chain), vec![("plain", "iodine")]);
        assert_eq!(chain.end, ChainEnd::DeadEnd);
    }

    #[test]
    fn building_is_idempotent() {
        let edges = HashMap::from([
            edge("kushcuke", "ogkush", "cuke"),
            edge("kushcukebanana", "kushcuke", "banana"),
        ]);
        let known = records(&["kushcuke", "kushcukebanana"]);

        assert_eq!(
            build_chain("kushcukebanana", &edges, &known),
            build_chain("kushcukebanana", &edges, &known)
        );
    }
}

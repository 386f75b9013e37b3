//! Chain enumeration
//!
//! Walks successor links from every chain start (no predecessor, has a
//! successor) until a contract without a successor. A visited set shared by
//! the whole enumeration stops the walk if a key comes round again, so
//! malformed links can shorten a chain but never loop.

use std::collections::{BTreeMap, HashSet};

use tracing::{info, warn};

use crate::services::link_graph::LinkGraph;
use crate::types::{Chain, ChainState, ChainSummary, ContractLink};

/// Enumerate every chain, longest first.
///
/// Chains of equal length keep the order their starts appear in the graph.
pub fn enumerate_chains(graph: &LinkGraph) -> Vec<Chain> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut chains = Vec::new();

    for annotated in graph.annotated() {
        if annotated.state() != ChainState::ChainStart {
            continue;
        }

        let chain = walk_chain(&annotated.contract.key, |key| graph.successor(key), &mut visited);
        if !chain.is_empty() {
            chains.push(chain);
        }
    }

    chains.sort_by(|a, b| b.len().cmp(&a.len()));

    info!("Enumerated {} chains", chains.len());
    chains
}

/// Follow successor links from `start`, stopping at any key already in `visited`.
///
/// A hop's savings count only once its target joins the chain, so the total
/// always equals the sum over the links between consecutive keys.
fn walk_chain<'a, F>(start: &'a str, successor: F, visited: &mut HashSet<&'a str>) -> Chain
where
    F: Fn(&str) -> Option<&'a ContractLink>,
{
    let mut keys = Vec::new();
    let mut total_savings_km = 0.0;

    if !visited.insert(start) {
        warn!("Chain start {} already visited, skipping", start);
        return Chain {
            keys,
            total_savings_km,
        };
    }
    keys.push(start.to_string());

    let mut current = start;
    while let Some(link) = successor(current) {
        let next = link.contract_key.as_str();
        if !visited.insert(next) {
            warn!("Chain from {} revisits {}, stopping", start, next);
            break;
        }
        total_savings_km += link.savings_km;
        keys.push(next.to_string());
        current = next;
    }

    Chain {
        keys,
        total_savings_km,
    }
}

/// Length distribution, state counts and savings impact for a set of chains
pub fn summarize(graph: &LinkGraph, chains: &[Chain]) -> ChainSummary {
    let mut length_distribution = BTreeMap::new();
    for chain in chains {
        *length_distribution.entry(chain.len()).or_insert(0) += 1;
    }

    let (contracts_with_predecessor, total_savings_km) = graph
        .annotated()
        .filter_map(|a| a.predecessor)
        .fold((0usize, 0.0f64), |(count, total), link| (count + 1, total + link.savings_km));

    let average_savings_km = if contracts_with_predecessor > 0 {
        total_savings_km / contracts_with_predecessor as f64
    } else {
        0.0
    };

    ChainSummary {
        total_chains: chains.len(),
        longest_chain: chains.iter().map(Chain::len).max().unwrap_or(0),
        length_distribution,
        state_counts: graph.state_counts(),
        contracts_with_predecessor,
        total_savings_km,
        average_savings_km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::matcher::ChainMatcher;
    use crate::services::testing::contract;
    use crate::types::{Contract, Coordinates};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn depot() -> Coordinates {
        Coordinates::new(10.0, 10.0)
    }

    fn build(contracts: Vec<Contract>) -> LinkGraph {
        LinkGraph::build(contracts, &ChainMatcher::new(10))
    }

    #[test]
    fn test_no_links_no_chains() {
        let graph = build(vec![
            contract("A", (0.0, 0.0), 0, 5, depot()),
            contract("B", (1.0, 1.0), 50, 60, depot()),
        ]);

        let chains = enumerate_chains(&graph);
        assert!(chains.is_empty());

        let summary = summarize(&graph, &chains);
        assert_eq!(summary.total_chains, 0);
        assert_eq!(summary.longest_chain, 0);
        assert_eq!(summary.average_savings_km, 0.0);
        assert_eq!(summary.state_counts.get(&ChainState::Isolated), Some(&2));
    }

    #[test]
    fn test_longest_first_with_savings() {
        let graph = build(vec![
            // Three-hop chain near the origin
            contract("A", (0.0, 0.0), -10, 0, depot()),
            contract("B", (0.0, 0.01), 2, 6, depot()),
            contract("C", (0.0, 0.02), 8, 12, depot()),
            // Two-hop chain far away, later in the year
            contract("X", (3.0, 3.0), 100, 110, depot()),
            contract("Y", (3.0, 3.01), 112, 120, depot()),
        ]);

        let chains = enumerate_chains(&graph);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].keys, vec!["A", "B", "C"]);
        assert_eq!(chains[1].keys, vec!["X", "Y"]);

        let expected = graph.predecessor("B").unwrap().savings_km
            + graph.predecessor("C").unwrap().savings_km;
        assert!((chains[0].total_savings_km - expected).abs() < 1e-9);

        let summary = summarize(&graph, &chains);
        assert_eq!(summary.longest_chain, 3);
        assert_eq!(summary.length_distribution.get(&3), Some(&1));
        assert_eq!(summary.length_distribution.get(&2), Some(&1));
        assert_eq!(summary.contracts_with_predecessor, 3);
    }

    #[test]
    fn test_equal_length_keeps_start_order() {
        let graph = build(vec![
            contract("A", (0.0, 0.0), -10, 0, depot()),
            contract("B", (0.0, 0.01), 2, 6, depot()),
            contract("X", (3.0, 3.0), 100, 110, depot()),
            contract("Y", (3.0, 3.01), 112, 120, depot()),
        ]);

        let starts: Vec<_> = enumerate_chains(&graph)
            .iter()
            .filter_map(|c| c.start().map(str::to_string))
            .collect();
        assert_eq!(starts, vec!["A", "X"]);
    }

    #[test]
    fn test_losing_successor_is_not_walked() {
        // C1 and C2 both pick P; only C1 hangs off P
        let graph = build(vec![
            contract("P", (0.0, 0.0), -10, 0, depot()),
            contract("C1", (0.0, 0.01), 2, 5, depot()),
            contract("C2", (-0.01, 0.0), 3, 6, depot()),
        ]);

        let chains = enumerate_chains(&graph);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].keys, vec!["P", "C1"]);
    }

    fn link(to: &str, savings_km: f64) -> ContractLink {
        ContractLink {
            contract_key: to.to_string(),
            site_name: String::new(),
            date: chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            days_gap: 1,
            site_to_site_km: 1.0,
            savings_km,
            savings_percentage: 50.0,
        }
    }

    #[test]
    fn test_walk_stops_on_revisit_without_counting_hop() {
        // S -> X -> Y -> X
        let links: HashMap<&str, ContractLink> = [
            ("S", link("X", 10.0)),
            ("X", link("Y", 20.0)),
            ("Y", link("X", 40.0)),
        ]
        .into_iter()
        .collect();

        let mut visited = HashSet::new();
        let chain = walk_chain("S", |key| links.get(key), &mut visited);
        assert_eq!(chain.keys, vec!["S", "X", "Y"]);
        assert_eq!(chain.total_savings_km, 30.0);
    }

    #[test]
    fn test_walk_skips_visited_start() {
        let links: HashMap<&str, ContractLink> = [("A", link("B", 5.0))].into_iter().collect();

        let mut visited = HashSet::new();
        let first = walk_chain("A", |key| links.get(key), &mut visited);
        assert_eq!(first.keys, vec!["A", "B"]);

        // Second walk runs into B straight away
        let second = walk_chain("B", |key| links.get(key), &mut visited);
        assert!(second.is_empty());
        assert_eq!(second.total_savings_km, 0.0);
    }

    #[test]
    fn test_duplicate_keys_cannot_form_cycle() {
        let graph = build(vec![
            contract("S", (0.0, 0.0), -10, 0, depot()),
            contract("X", (0.0, 0.01), 2, 6, depot()),
            contract("Y", (0.0, 0.02), 8, 12, depot()),
            contract("X", (0.0, 0.03), 14, 18, depot()),
        ]);
        assert_eq!(graph.len(), 3);

        let chains = enumerate_chains(&graph);
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].keys, vec!["S", "X", "Y"]);
        let hop_sum = graph.successor("S").unwrap().savings_km + graph.successor("X").unwrap().savings_km;
        assert!((chains[0].total_savings_km - hop_sum).abs() < 1e-9);
    }

    fn arb_contracts() -> impl Strategy<Value = Vec<Contract>> {
        prop::collection::vec((0u8..20, 0u8..20, 0i64..60, 0i64..8), 0..25).prop_map(|specs| {
            let mut contracts: Vec<Contract> = specs
                .into_iter()
                .enumerate()
                .map(|(i, (lat, lng, start, len))| {
                    contract(
                        &format!("K{i}"),
                        (f64::from(lat) * 0.01, f64::from(lng) * 0.01),
                        start,
                        start + len,
                        depot(),
                    )
                })
                .collect();
            contracts.sort_by_key(|c| c.start_date);
            contracts
        })
    }

    proptest! {
        #[test]
        fn prop_each_contract_visited_at_most_once(contracts in arb_contracts()) {
            let graph = build(contracts);
            let chains = enumerate_chains(&graph);

            let mut seen = HashSet::new();
            for chain in &chains {
                for key in &chain.keys {
                    prop_assert!(seen.insert(key.clone()), "{} visited twice", key);
                }
            }
        }

        #[test]
        fn prop_one_chain_per_start(contracts in arb_contracts()) {
            let graph = build(contracts);
            let chains = enumerate_chains(&graph);
            let starts = graph.state_counts().get(&ChainState::ChainStart).copied().unwrap_or(0);
            prop_assert_eq!(chains.len(), starts);
        }

        #[test]
        fn prop_chains_sorted_longest_first(contracts in arb_contracts()) {
            let chains = enumerate_chains(&build(contracts));
            for pair in chains.windows(2) {
                prop_assert!(pair[0].len() >= pair[1].len());
            }
        }
    }
}

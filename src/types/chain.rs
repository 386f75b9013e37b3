//! Chain types

use std::collections::BTreeMap;

use serde::Serialize;

/// Position of a contract within the redeployment graph.
///
/// Derived from the presence of links, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainState {
    Isolated,
    ChainStart,
    ChainMiddle,
    ChainEnd,
}

impl ChainState {
    pub const fn from_links(has_predecessor: bool, has_successor: bool) -> Self {
        match (has_predecessor, has_successor) {
            (false, false) => ChainState::Isolated,
            (false, true) => ChainState::ChainStart,
            (true, true) => ChainState::ChainMiddle,
            (true, false) => ChainState::ChainEnd,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ChainState::Isolated => "ISOLATED",
            ChainState::ChainStart => "CHAIN_START",
            ChainState::ChainMiddle => "CHAIN_MIDDLE",
            ChainState::ChainEnd => "CHAIN_END",
        }
    }
}

/// A maximal sequence of contracts linked by successor relations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub keys: Vec<String>,
    /// Sum of the savings of every hop along the chain
    pub total_savings_km: f64,
}

impl Chain {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn start(&self) -> Option<&str> {
        self.keys.first().map(String::as_str)
    }
}

/// Aggregate view over an enumeration and the link graph it came from
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSummary {
    pub total_chains: usize,
    pub longest_chain: usize,
    /// Chain length -> number of chains of that length
    pub length_distribution: BTreeMap<usize, usize>,
    pub state_counts: BTreeMap<ChainState, usize>,
    /// Contracts that receive equipment from another site
    pub contracts_with_predecessor: usize,
    pub total_savings_km: f64,
    pub average_savings_km: f64,
}

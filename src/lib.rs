//! Redeploy - site-to-site equipment redeployment analysis
//!
//! Finds hire contracts that can take equipment straight from a recently
//! finished nearby contract instead of from the depot, and strings those
//! hand-overs into chains.
//!
//! Pipeline: [`ContractIndex`] → [`ChainMatcher`] → [`LinkGraph`] →
//! [`enumerate_chains`], with [`OptionsAnalyzer`] working off the ingested
//! contracts directly.

pub mod services;
pub mod types;

pub use services::chains::enumerate_chains;
pub use services::ingest::{ContractIndex, IngestError, IngestReport};
pub use services::link_graph::LinkGraph;
pub use services::matcher::ChainMatcher;
pub use services::options::OptionsAnalyzer;

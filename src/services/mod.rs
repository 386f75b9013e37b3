//! Business logic services

pub mod chains;
pub mod geo;
pub mod ingest;
pub mod link_graph;
pub mod matcher;
pub mod options;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;

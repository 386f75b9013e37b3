//! Type definitions

pub mod chain;
pub mod contract;
pub mod options;

pub use chain::*;
pub use contract::*;
pub use options::*;

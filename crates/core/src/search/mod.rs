//! Bounded, weighted search for call chains producing a target type.

mod cache;
mod engine;
mod initializer;
mod top_k;

pub use cache::CachedIndex;
pub use engine::ChainSearcher;
pub use initializer::SearchInitializer;
pub use top_k::TopKSet;

use crate::chain::Chain;
use serde::Serialize;

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub iterations: usize,
    pub frontier_size: usize,
    pub stale_discarded: usize,
    pub index_queries: usize,
    pub rejected_by_probability: usize,
    pub dead_ends: usize,
    pub early_stop: bool,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub chains: Vec<Chain>,
    pub stats: SearchStats,
}

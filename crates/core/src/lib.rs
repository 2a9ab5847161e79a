pub mod chain;
pub mod config;
pub mod error;
pub mod logging;
pub mod ranking;
pub mod search;
pub mod snapshot;

pub use chain::{Chain, ChainLink, ChainRelation};
pub use config::SearchConfig;
pub use error::{ChainscopeError, Result, SearchError};
pub use ranking::{RankedChain, RelevanceScore, rank_chains};
pub use search::{ChainSearcher, SearchOutcome, SearchStats};
pub use snapshot::{Snapshot, SnapshotContext, SnapshotIndex};

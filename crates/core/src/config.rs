use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial frontier stops once the best count exceeds a candidate's count by this factor.
pub const DEFAULT_FILTER_RATIO: f64 = 10.0;

/// Minimum may-happen-before confidence for an edge to be explored.
pub const DEFAULT_PROBABILITY_THRESHOLD: f64 = 0.3;

pub const DEFAULT_MAX_CHAIN_LENGTH: usize = 4;

pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Tunables of one chain search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_chain_length: usize,
    pub max_results: usize,
    pub probability_threshold: f64,
    pub filter_ratio: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_chain_length: DEFAULT_MAX_CHAIN_LENGTH,
            max_results: DEFAULT_MAX_RESULTS,
            probability_threshold: DEFAULT_PROBABILITY_THRESHOLD,
            filter_ratio: DEFAULT_FILTER_RATIO,
        }
    }
}

impl SearchConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn with_max_chain_length(mut self, max_chain_length: usize) -> Self {
        self.max_chain_length = max_chain_length;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_probability_threshold(mut self, threshold: f64) -> Self {
        self.probability_threshold = threshold;
        self
    }

    pub fn with_filter_ratio(mut self, ratio: f64) -> Self {
        self.filter_ratio = ratio;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), SearchError> {
        if self.max_chain_length == 0 {
            return Err(SearchError::InvalidConfig(
                "max_chain_length must be at least 1".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(SearchError::InvalidConfig(
                "max_results must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.probability_threshold) {
            return Err(SearchError::InvalidConfig(format!(
                "probability_threshold must be within [0, 1], got {}",
                self.probability_threshold
            )));
        }
        if !self.filter_ratio.is_finite() || self.filter_ratio < 1.0 {
            return Err(SearchError::InvalidConfig(format!(
                "filter_ratio must be a finite number >= 1, got {}",
                self.filter_ratio
            )));
        }
        Ok(())
    }
}

use super::cache::CachedIndex;
use super::initializer::SearchInitializer;
use super::top_k::TopKSet;
use super::{SearchOutcome, SearchStats};
use crate::chain::{Chain, insert_deduplicated};
use crate::config::SearchConfig;
use crate::error::SearchError;
use chainscope_api::{
    ChainOperation, Occurrences, ReferenceIndex, ReferenceKind, ResolutionContext, SearchTarget,
};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Finds chains of calls that produce a value of the search target.
///
/// The search is a widest-path relaxation over the implicit call graph: every
/// operation remembers the heaviest chain reaching it, and chains are only
/// extended while they keep improving on that.
#[derive(Debug, Clone, Default)]
pub struct ChainSearcher {
    config: SearchConfig,
}

impl ChainSearcher {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs one search and returns the deduplicated chains in discovery order.
    pub fn search(
        &self,
        target: &SearchTarget,
        context: &dyn ResolutionContext,
        index: &dyn ReferenceIndex,
        cancel: &CancellationToken,
    ) -> Result<Vec<Chain>, SearchError> {
        self.search_with_stats(target, context, index, cancel)
            .map(|outcome| outcome.chains)
    }

    pub fn search_with_stats(
        &self,
        target: &SearchTarget,
        context: &dyn ResolutionContext,
        index: &dyn ReferenceIndex,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, SearchError> {
        self.config.validate()?;

        let mut index = CachedIndex::new(index);
        let (mut queue, mut known) =
            SearchInitializer::new(target, context, &mut index, self.config.filter_ratio)
                .into_parts();

        let mut stats = SearchStats {
            frontier_size: queue.len(),
            ..SearchStats::default()
        };
        let mut results: Vec<Chain> = Vec::new();

        debug!(
            "Searching chains for {} from {} seed(s)",
            target,
            queue.len()
        );

        loop {
            if cancel.is_cancelled() {
                debug!("Chain search for {} cancelled", target);
                return Err(SearchError::Cancelled);
            }
            let Some(chain) = queue.pop_front() else {
                break;
            };
            stats.iterations += 1;

            // A heavier route to the same head has been found since this one was queued.
            if known.get(chain.head()).map(Chain::weight) != Some(chain.weight()) {
                stats.stale_discarded += 1;
                continue;
            }

            if chain.is_anchored(context) {
                insert_deduplicated(&mut results, chain);
                if self.is_full(&results) {
                    stats.early_stop = true;
                    break;
                }
                continue;
            }

            let continuations =
                self.expand(&chain, target, context, &mut index, &mut known, &mut stats);

            if continuations.is_empty() {
                if chain.qualifier_type() != &target.class_name {
                    stats.dead_ends += 1;
                    insert_deduplicated(&mut results, chain);
                }
            } else {
                let mut pending = Vec::new();
                for next in continuations {
                    if next.is_anchored(context) {
                        insert_deduplicated(&mut results, next);
                        if self.is_full(&results) {
                            break;
                        }
                    } else {
                        pending.push(next);
                    }
                }
                // Heaviest continuation ends up at the front.
                for next in pending.into_iter().rev() {
                    queue.push_front(next);
                }
            }

            if self.is_full(&results) {
                stats.early_stop = true;
                break;
            }
        }

        stats.index_queries = index.queries();
        debug!(
            "Chain search for {} finished: {} chain(s), {:?}",
            target,
            results.len(),
            stats
        );

        Ok(SearchOutcome {
            chains: results,
            stats,
        })
    }

    fn is_full(&self, results: &[Chain]) -> bool {
        results.len() >= self.config.max_results
    }

    /// Continuations of `chain` that survive dominance, top-K and probability pruning.
    fn expand(
        &self,
        chain: &Chain,
        target: &SearchTarget,
        context: &dyn ResolutionContext,
        index: &mut CachedIndex<'_>,
        known: &mut HashMap<ChainOperation, Chain>,
        stats: &mut SearchStats,
    ) -> Vec<Chain> {
        if chain.len() >= self.config.max_chain_length {
            return Vec::new();
        }

        let producers = index.occurrences_of(chain.qualifier_type(), ReferenceKind::ZeroDim);
        let mut best = TopKSet::new(self.config.max_results);

        for occ in producers.iter() {
            let signature = &occ.value;
            if signature.is_static || signature.owner == target.class_name {
                continue;
            }

            let weight = chain.weight().min(occ.count);
            let operation = ChainOperation::Call(signature.clone());
            if known
                .get(&operation)
                .is_some_and(|existing| existing.weight() >= weight)
            {
                continue;
            }
            best.insert(operation, weight);
        }

        let mut continuations = Vec::new();
        for Occurrences {
            value: operation,
            count: weight,
        } in best.into_sorted_vec()
        {
            let Some(next) = chain.continue_with(&operation, weight, target, context) else {
                continue;
            };
            // Recorded even if the call order rejects it below, so other parents
            // need a strictly heavier route to reach the same operation.
            known.insert(operation.clone(), next.clone());

            if !index.may_happen_before(
                &operation,
                chain.head(),
                self.config.probability_threshold,
            ) {
                trace!("{} is unlikely before {}", operation, chain.head());
                stats.rejected_by_probability += 1;
                continue;
            }

            trace!("Extended {} to {} (weight {})", chain, next, next.weight());
            continuations.push(next);
        }

        continuations
    }
}

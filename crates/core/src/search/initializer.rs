use super::cache::CachedIndex;
use crate::chain::Chain;
use chainscope_api::{ChainOperation, Occurrences, ResolutionContext, SearchTarget};
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::trace;

/// The starting state of a search: single-link chains producing the target.
pub struct SearchInitializer {
    frontier: VecDeque<Chain>,
    known_distance: HashMap<ChainOperation, Chain>,
}

impl SearchInitializer {
    /// Seeds the frontier from every reference kind of `target` plus the casts
    /// producing it.
    ///
    /// Occurrence counts are long-tailed: once the best seeded count exceeds a
    /// candidate's count by more than `filter_ratio`, the remaining candidates are
    /// not resolved at all.
    pub fn new(
        target: &SearchTarget,
        context: &dyn ResolutionContext,
        index: &mut CachedIndex<'_>,
        filter_ratio: f64,
    ) -> Self {
        let mut merged: BTreeMap<ChainOperation, u64> = BTreeMap::new();
        for &kind in &target.kinds {
            for occ in index.occurrences_of(&target.class_name, kind).iter() {
                let count = merged
                    .entry(ChainOperation::Call(occ.value.clone()))
                    .or_insert(0);
                *count = (*count).max(occ.count);
            }
        }
        for occ in index.cast_occurrences_of(&target.class_name).iter() {
            let count = merged
                .entry(ChainOperation::Cast(occ.value.clone()))
                .or_insert(0);
            *count = (*count).max(occ.count);
        }

        let mut operations: Vec<Occurrences<ChainOperation>> = merged
            .into_iter()
            .map(|(op, count)| Occurrences::new(op, count))
            .collect();
        operations.sort();

        let mut frontier = VecDeque::new();
        let mut known_distance = HashMap::new();
        let mut best: Option<u64> = None;

        for occ in operations {
            if let Some(best) = best {
                if best as f64 > occ.count as f64 * filter_ratio {
                    trace!(
                        "stop seeding at {} ({} vs best {})",
                        occ.value, occ.count, best
                    );
                    break;
                }
            }

            let Some(chain) = Chain::build(&occ.value, occ.count, target, context) else {
                trace!("cannot start a chain with {}", occ.value);
                continue;
            };

            best = Some(best.map_or(occ.count, |b| b.max(occ.count)));
            known_distance.insert(occ.value, chain.clone());
            frontier.push_back(chain);
        }

        Self {
            frontier,
            known_distance,
        }
    }

    pub fn frontier(&self) -> &VecDeque<Chain> {
        &self.frontier
    }

    pub fn known_distance(&self) -> &HashMap<ChainOperation, Chain> {
        &self.known_distance
    }

    pub fn into_parts(self) -> (VecDeque<Chain>, HashMap<ChainOperation, Chain>) {
        (self.frontier, self.known_distance)
    }
}

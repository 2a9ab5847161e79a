//! Relevance ordering of completed chains.

use crate::chain::{Chain, ChainLink};
use chainscope_api::{Overload, ResolutionContext, SearchTarget};
use serde::Serialize;
use std::cmp::Ordering;

/// How convenient a chain is to insert: shorter, fully satisfiable, context-aware
/// chains sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelevanceScore {
    pub length: usize,
    pub weight: u64,
    /// Non-nullable parameters nothing in scope can supply.
    pub unreachable_parameters: usize,
    /// Parameters a value already in scope can supply.
    pub parameters_in_context: usize,
    /// String parameters nothing in scope can supply; already counted as
    /// unreachable unless nullable, this only breaks ties.
    pub unmatched_string_parameters: usize,
}

impl RelevanceScore {
    pub fn compute(chain: &Chain, target: &SearchTarget, context: &dyn ResolutionContext) -> Self {
        let mut score = RelevanceScore {
            length: chain.len(),
            weight: chain.weight(),
            unreachable_parameters: 0,
            parameters_in_context: 0,
            unmatched_string_parameters: 0,
        };

        for link in chain.links() {
            let ChainLink::Call { candidates } = link else {
                continue;
            };
            let Some(overload) = pick_overload(candidates, target) else {
                continue;
            };

            for param in overload.parameters.iter().filter(|p| !p.primitive) {
                if context.is_reachable(&param.ty) {
                    score.parameters_in_context += 1;
                    continue;
                }
                if !param.nullable {
                    score.unreachable_parameters += 1;
                }
                if param.ty.is_string_like() {
                    score.unmatched_string_parameters += 1;
                }
            }
        }

        score
    }
}

/// The overload with the fewest non-primitive parameters that does not take the
/// target itself; falls back to the representative.
fn pick_overload<'a>(candidates: &'a [Overload], target: &SearchTarget) -> Option<&'a Overload> {
    candidates
        .iter()
        .filter(|o| !o.takes_parameter_of(&target.target_type))
        .min_by_key(|o| o.non_primitive_parameters())
        .or_else(|| candidates.first())
}

impl Ord for RelevanceScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.length
            .cmp(&other.length)
            .then_with(|| self.unreachable_parameters.cmp(&other.unreachable_parameters))
            .then_with(|| other.parameters_in_context.cmp(&self.parameters_in_context))
            .then_with(|| {
                self.unmatched_string_parameters
                    .cmp(&other.unmatched_string_parameters)
            })
            .then_with(|| other.weight.cmp(&self.weight))
    }
}

impl PartialOrd for RelevanceScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedChain {
    pub chain: Chain,
    pub score: RelevanceScore,
}

/// Scores every chain and sorts best first; ties keep search order.
pub fn rank_chains(
    chains: Vec<Chain>,
    target: &SearchTarget,
    context: &dyn ResolutionContext,
) -> Vec<RankedChain> {
    let mut ranked: Vec<RankedChain> = chains
        .into_iter()
        .map(|chain| RankedChain {
            score: RelevanceScore::compute(&chain, target, context),
            chain,
        })
        .collect();
    ranked.sort_by(|a, b| a.score.cmp(&b.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{MethodEntry, OverloadEntry, Snapshot};
    use chainscope_api::{ChainOperation, MethodSignature, Parameter};

    fn build(snapshot: &Snapshot, ops: &[(&str, &str)], weight: u64) -> Chain {
        let context = snapshot.context();
        let target = SearchTarget::value("T");
        let mut iter = ops.iter().rev();
        let (owner, name) = iter.next().unwrap();
        let mut chain = Chain::build(
            &ChainOperation::Call(MethodSignature::new(*owner, *name)),
            weight,
            &target,
            &context,
        )
        .unwrap();
        for (owner, name) in iter {
            chain = chain
                .continue_with(
                    &ChainOperation::Call(MethodSignature::new(*owner, *name)),
                    weight,
                    &target,
                    &context,
                )
                .unwrap();
        }
        chain
    }

    #[test]
    fn test_shorter_chains_rank_first() {
        let snapshot = Snapshot::builder()
            .method(MethodEntry::new("A", "toT", "T", 10))
            .method(MethodEntry::new("B", "toA", "A", 10))
            .method(MethodEntry::new("C", "direct", "T", 1))
            .build();
        let context = snapshot.context();
        let target = SearchTarget::value("T");

        let long = build(&snapshot, &[("B", "toA"), ("A", "toT")], 10);
        let short = build(&snapshot, &[("C", "direct")], 1);

        let ranked = rank_chains(vec![long, short], &target, &context);
        assert_eq!(ranked[0].chain.len(), 1);
        assert_eq!(ranked[1].chain.len(), 2);
    }

    #[test]
    fn test_parameter_accounting() {
        let snapshot = Snapshot::builder()
            .method(MethodEntry::new("A", "find", "T", 10).with_parameters(vec![
                Parameter::new("Session"),
                Parameter::new("String"),
                Parameter::new("Options").nullable(),
                Parameter::new("Key"),
                Parameter::new("int"),
            ]))
            .reachable("Session")
            .build();
        let context = snapshot.context();
        let target = SearchTarget::value("T");

        let chain = build(&snapshot, &[("A", "find")], 10);
        let score = RelevanceScore::compute(&chain, &target, &context);
        assert_eq!(score.parameters_in_context, 1);
        assert_eq!(score.unmatched_string_parameters, 1);
        // The String and the Key.
        assert_eq!(score.unreachable_parameters, 2);
    }

    #[test]
    fn test_call_needing_a_string_literal_ranks_after_call_needing_nothing() {
        let snapshot = Snapshot::builder()
            .method(
                MethodEntry::new("A", "withStr", "T", 10)
                    .with_parameters(vec![Parameter::new("String"), Parameter::new("Session")]),
            )
            .method(MethodEntry::new("A", "plain", "T", 10))
            .reachable("Session")
            .build();
        let context = snapshot.context();
        let target = SearchTarget::value("T");

        let with_str = RelevanceScore::compute(
            &build(&snapshot, &[("A", "withStr")], 10),
            &target,
            &context,
        );
        let plain =
            RelevanceScore::compute(&build(&snapshot, &[("A", "plain")], 10), &target, &context);

        assert_eq!(with_str.unreachable_parameters, 1);
        assert_eq!(with_str.parameters_in_context, 1);
        assert!(plain < with_str);

        let ranked = rank_chains(
            vec![
                build(&snapshot, &[("A", "withStr")], 10),
                build(&snapshot, &[("A", "plain")], 10),
            ],
            &target,
            &context,
        );
        assert_eq!(ranked[0].chain.to_string(), "A.plain()");
    }

    #[test]
    fn test_nullable_string_only_breaks_ties() {
        let snapshot = Snapshot::builder()
            .method(
                MethodEntry::new("A", "named", "T", 10)
                    .with_parameters(vec![Parameter::new("String").nullable()]),
            )
            .build();
        let context = snapshot.context();
        let target = SearchTarget::value("T");

        let score =
            RelevanceScore::compute(&build(&snapshot, &[("A", "named")], 10), &target, &context);
        assert_eq!(score.unreachable_parameters, 0);
        assert_eq!(score.unmatched_string_parameters, 1);
    }

    #[test]
    fn test_picks_overload_with_fewest_object_parameters() {
        let snapshot = Snapshot::builder()
            .method(
                MethodEntry::new("A", "get", "T", 10)
                    .with_parameters(vec![Parameter::new("Key"), Parameter::new("Key")])
                    .with_overload(OverloadEntry::new(vec![Parameter::new("long")])),
            )
            .build();
        let context = snapshot.context();
        let target = SearchTarget::value("T");

        let chain = build(&snapshot, &[("A", "get")], 10);
        let score = RelevanceScore::compute(&chain, &target, &context);
        assert_eq!(score.unreachable_parameters, 0);
    }

    #[test]
    fn test_score_ordering() {
        let base = RelevanceScore {
            length: 2,
            weight: 10,
            unreachable_parameters: 1,
            parameters_in_context: 1,
            unmatched_string_parameters: 0,
        };
        let fewer_unreachable = RelevanceScore {
            unreachable_parameters: 0,
            ..base
        };
        let more_context = RelevanceScore {
            parameters_in_context: 2,
            ..base
        };
        let heavier = RelevanceScore {
            weight: 99,
            ..base
        };

        assert!(fewer_unreachable < base);
        assert!(more_context < base);
        assert!(heavier < base);
        assert!(RelevanceScore { length: 1, ..base } < fewer_unreachable);
    }
}

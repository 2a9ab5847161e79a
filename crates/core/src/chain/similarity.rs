use super::{Chain, ChainLink};
use std::collections::HashSet;

/// How two chains relate when deduplicating suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainRelation {
    Equal,
    /// The left chain does everything the right one does, plus more steps.
    LeftContainsRight,
    RightContainsLeft,
    NotEqual,
}

/// Two links are the same logical call: same name and arity, non-static, and bound to a
/// shared overload or to overloads with a shared root declaration.
pub fn links_similar(left: &ChainLink, right: &ChainLink) -> bool {
    let (
        ChainLink::Call {
            candidates: left_candidates,
        },
        ChainLink::Call {
            candidates: right_candidates,
        },
    ) = (left, right)
    else {
        return false;
    };

    let (Some(l), Some(r)) = (left_candidates.first(), right_candidates.first()) else {
        return false;
    };
    if l.is_static || r.is_static {
        return false;
    }
    if l.name != r.name || l.arity() != r.arity() {
        return false;
    }

    let left_ids: HashSet<_> = left_candidates.iter().map(|o| &o.id).collect();
    if right_candidates.iter().any(|o| left_ids.contains(&o.id)) {
        return true;
    }

    let left_roots: HashSet<_> = left_candidates.iter().map(|o| o.root()).collect();
    right_candidates.iter().any(|o| left_roots.contains(o.root()))
}

/// Compares two link sequences given target end first.
pub(crate) fn compare_links(left: &[ChainLink], right: &[ChainLink]) -> ChainRelation {
    for (l, r) in left.iter().zip(right.iter()) {
        if !links_similar(l, r) {
            return ChainRelation::NotEqual;
        }
    }

    match left.len().cmp(&right.len()) {
        std::cmp::Ordering::Equal => ChainRelation::Equal,
        std::cmp::Ordering::Greater => ChainRelation::LeftContainsRight,
        std::cmp::Ordering::Less => ChainRelation::RightContainsLeft,
    }
}

/// Adds `chain` to `results` unless an existing entry already covers it; entries the
/// new chain covers are removed. Returns whether `chain` was added.
pub fn insert_deduplicated(results: &mut Vec<Chain>, chain: Chain) -> bool {
    let mut covered = false;
    let mut dominated = Vec::new();

    for (i, existing) in results.iter().enumerate() {
        match chain.compare(existing) {
            ChainRelation::Equal | ChainRelation::RightContainsLeft => covered = true,
            ChainRelation::LeftContainsRight => dominated.push(i),
            ChainRelation::NotEqual => {}
        }
    }

    for i in dominated.into_iter().rev() {
        results.remove(i);
    }

    if covered {
        return false;
    }
    results.push(chain);
    true
}

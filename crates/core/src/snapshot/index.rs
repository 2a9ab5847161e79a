use super::Snapshot;
use chainscope_api::{
    CastSignature, ChainOperation, MethodSignature, Occurrences, ReferenceIndex, ReferenceKind,
    TypeName,
};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Occurrence and call-order statistics of a [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotIndex {
    producers: HashMap<(TypeName, ReferenceKind), Vec<Occurrences<MethodSignature>>>,
    casts: HashMap<TypeName, Vec<Occurrences<CastSignature>>>,
    totals: HashMap<ChainOperation, u64>,
    /// For each operation, how often each other operation was seen before it.
    predecessors: HashMap<ChainOperation, HashMap<ChainOperation, u64>>,
}

impl SnapshotIndex {
    pub fn new(snapshot: &Snapshot) -> Self {
        let mut producers: BTreeMap<(TypeName, ReferenceKind), BTreeMap<MethodSignature, u64>> =
            BTreeMap::new();
        let mut casts: BTreeMap<TypeName, BTreeMap<CastSignature, u64>> = BTreeMap::new();
        let mut totals: HashMap<ChainOperation, u64> = HashMap::new();

        for method in &snapshot.methods {
            let signature = method.signature();
            *producers
                .entry((method.returns.clone(), method.kind))
                .or_default()
                .entry(signature.clone())
                .or_insert(0) += method.occurrences;
            *totals.entry(ChainOperation::Call(signature)).or_insert(0) += method.occurrences;
        }

        for cast in &snapshot.casts {
            let signature = CastSignature::new(cast.operand.clone(), cast.target.clone());
            *casts
                .entry(cast.target.clone())
                .or_default()
                .entry(signature.clone())
                .or_insert(0) += cast.occurrences;
            *totals.entry(ChainOperation::Cast(signature)).or_insert(0) += cast.occurrences;
        }

        let mut predecessors: HashMap<ChainOperation, HashMap<ChainOperation, u64>> =
            HashMap::new();
        for entry in &snapshot.call_order {
            let total = totals.get(&entry.after).copied().unwrap_or(0);
            if entry.count > total {
                warn!(
                    "{} seen {} time(s) before {}, which only occurs {} time(s)",
                    entry.before, entry.count, entry.after, total
                );
            }
            *predecessors
                .entry(entry.after.clone())
                .or_default()
                .entry(entry.before.clone())
                .or_insert(0) += entry.count;
        }

        Self {
            producers: producers
                .into_iter()
                .map(|(key, counts)| (key, sorted(counts)))
                .collect(),
            casts: casts
                .into_iter()
                .map(|(key, counts)| (key, sorted(counts)))
                .collect(),
            totals,
            predecessors,
        }
    }

    /// How often `op` occurs across the snapshot.
    pub fn total_of(&self, op: &ChainOperation) -> u64 {
        self.totals.get(op).copied().unwrap_or(0)
    }
}

fn sorted<T: Ord>(counts: BTreeMap<T, u64>) -> Vec<Occurrences<T>> {
    let mut out: Vec<_> = counts
        .into_iter()
        .map(|(value, count)| Occurrences::new(value, count))
        .collect();
    out.sort();
    out
}

impl ReferenceIndex for SnapshotIndex {
    fn occurrences_of(
        &self,
        ty: &TypeName,
        kind: ReferenceKind,
    ) -> Vec<Occurrences<MethodSignature>> {
        self.producers
            .get(&(ty.clone(), kind))
            .cloned()
            .unwrap_or_default()
    }

    fn cast_occurrences_of(&self, ty: &TypeName) -> Vec<Occurrences<CastSignature>> {
        self.casts.get(ty).cloned().unwrap_or_default()
    }

    /// Share of the occurrences of `after` that were preceded by `before`.
    /// Operations with no recorded predecessors are unconstrained.
    fn may_happen_before(
        &self,
        before: &ChainOperation,
        after: &ChainOperation,
        threshold: f64,
    ) -> bool {
        let Some(seen_before) = self.predecessors.get(after) else {
            return true;
        };
        let total = self.total_of(after);
        if total == 0 {
            return true;
        }
        let together = seen_before.get(before).copied().unwrap_or(0);
        together as f64 / total as f64 >= threshold
    }
}

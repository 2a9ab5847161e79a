use crate::models::{
    CastSignature, ChainOperation, MethodSignature, Occurrences, ReferenceKind, TypeName,
};

/// Statistical index of how often operations produce values of a type.
///
/// Implementations are shared read-only across searches.
pub trait ReferenceIndex: Send + Sync {
    /// Methods producing a value of `ty` under `kind`, most frequent first.
    fn occurrences_of(
        &self,
        ty: &TypeName,
        kind: ReferenceKind,
    ) -> Vec<Occurrences<MethodSignature>>;

    /// Casts whose target is `ty`, most frequent first.
    fn cast_occurrences_of(&self, _ty: &TypeName) -> Vec<Occurrences<CastSignature>> {
        Vec::new()
    }

    /// Whether `before` precedes `after` with probability at least `threshold`.
    ///
    /// Only used to prune the search; a wrong answer costs quality, not correctness.
    fn may_happen_before(
        &self,
        before: &ChainOperation,
        after: &ChainOperation,
        threshold: f64,
    ) -> bool;
}

use chainscope_api::{
    CastSignature, ChainOperation, MethodSignature, Occurrences, ReferenceIndex, ReferenceKind,
    TypeName,
};
use std::collections::HashMap;
use std::rc::Rc;

/// Memoizes index lookups for the lifetime of one search, so every distinct
/// (type, kind) pair reaches the underlying index at most once.
pub struct CachedIndex<'a> {
    inner: &'a dyn ReferenceIndex,
    methods: HashMap<(TypeName, ReferenceKind), Rc<[Occurrences<MethodSignature>]>>,
    casts: HashMap<TypeName, Rc<[Occurrences<CastSignature>]>>,
    queries: usize,
}

impl<'a> CachedIndex<'a> {
    pub fn new(inner: &'a dyn ReferenceIndex) -> Self {
        Self {
            inner,
            methods: HashMap::new(),
            casts: HashMap::new(),
            queries: 0,
        }
    }

    pub fn occurrences_of(
        &mut self,
        ty: &TypeName,
        kind: ReferenceKind,
    ) -> Rc<[Occurrences<MethodSignature>]> {
        if let Some(hit) = self.methods.get(&(ty.clone(), kind)) {
            return Rc::clone(hit);
        }
        self.queries += 1;
        let fetched: Rc<[_]> = self.inner.occurrences_of(ty, kind).into();
        self.methods.insert((ty.clone(), kind), Rc::clone(&fetched));
        fetched
    }

    pub fn cast_occurrences_of(&mut self, ty: &TypeName) -> Rc<[Occurrences<CastSignature>]> {
        if let Some(hit) = self.casts.get(ty) {
            return Rc::clone(hit);
        }
        self.queries += 1;
        let fetched: Rc<[_]> = self.inner.cast_occurrences_of(ty).into();
        self.casts.insert(ty.clone(), Rc::clone(&fetched));
        fetched
    }

    pub fn may_happen_before(
        &self,
        before: &ChainOperation,
        after: &ChainOperation,
        threshold: f64,
    ) -> bool {
        self.inner.may_happen_before(before, after, threshold)
    }

    /// Number of lookups that reached the underlying index.
    pub fn queries(&self) -> usize {
        self.queries
    }
}

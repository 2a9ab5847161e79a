//! Chains of calls and casts leading from an available value to the target.
//!
//! A [`Chain`] is built from the target end: the search starts with the operations
//! producing the target and keeps prepending operations that produce the qualifier of
//! the current head. Links are therefore stored target-first and exposed
//! qualifier-first.

mod similarity;

pub use similarity::{ChainRelation, insert_deduplicated, links_similar};

use chainscope_api::{ChainOperation, Overload, ResolutionContext, SearchTarget, TypeName};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::fmt;

/// One step of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainLink {
    /// A call that binds to one of `candidates`. [`ChainLink::call`] keeps it
    /// non-empty; a hand-built empty group renders as nothing.
    Call { candidates: Vec<Overload> },
    /// An explicit narrowing of the qualifier.
    Cast { target_type: TypeName },
}

impl ChainLink {
    /// Panics when `candidates` is empty.
    pub fn call(candidates: Vec<Overload>) -> Self {
        assert!(
            !candidates.is_empty(),
            "a call link needs at least one candidate overload"
        );
        ChainLink::Call { candidates }
    }

    pub fn cast(target_type: impl Into<TypeName>) -> Self {
        ChainLink::Cast {
            target_type: target_type.into(),
        }
    }

    /// The overload that stands for the whole candidate group.
    pub fn representative(&self) -> Option<&Overload> {
        match self {
            ChainLink::Call { candidates } => candidates.first(),
            ChainLink::Cast { .. } => None,
        }
    }

    pub fn is_cast(&self) -> bool {
        matches!(self, ChainLink::Cast { .. })
    }
}

/// An immutable, non-empty sequence of links with its bottleneck weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    // Target end first; the last element is the head link.
    reversed: Vec<ChainLink>,
    head: ChainOperation,
    qualifier_type: TypeName,
    weight: u64,
}

impl Chain {
    /// Builds a chain from links in qualifier-to-target order.
    ///
    /// Panics when `links` is empty.
    pub fn from_links(
        links: Vec<ChainLink>,
        head: ChainOperation,
        qualifier_type: TypeName,
        weight: u64,
    ) -> Self {
        assert!(!links.is_empty(), "a chain needs at least one link");
        let mut reversed = links;
        reversed.reverse();
        Self {
            reversed,
            head,
            qualifier_type,
            weight,
        }
    }

    /// Applies the construction rule to `operation`; `None` when it cannot start a chain.
    pub fn build(
        operation: &ChainOperation,
        weight: u64,
        target: &SearchTarget,
        context: &dyn ResolutionContext,
    ) -> Option<Self> {
        let (link, qualifier_type) = resolve_link(operation, target, context)?;
        Some(Self {
            reversed: vec![link],
            head: operation.clone(),
            qualifier_type,
            weight,
        })
    }

    /// A new chain that first applies `operation` and then this chain.
    ///
    /// The continuation's weight is the minimum of both weights.
    pub fn continue_with(
        &self,
        operation: &ChainOperation,
        weight: u64,
        target: &SearchTarget,
        context: &dyn ResolutionContext,
    ) -> Option<Self> {
        let (link, qualifier_type) = resolve_link(operation, target, context)?;
        let mut reversed = Vec::with_capacity(self.reversed.len() + 1);
        reversed.extend(self.reversed.iter().cloned());
        reversed.push(link);
        Some(Self {
            reversed,
            head: operation.clone(),
            qualifier_type,
            weight: self.weight.min(weight),
        })
    }

    pub fn len(&self) -> usize {
        self.reversed.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// The operation applied first, i.e. the one further links attach to.
    pub fn head(&self) -> &ChainOperation {
        &self.head
    }

    pub fn qualifier_type(&self) -> &TypeName {
        &self.qualifier_type
    }

    /// Links in application order, qualifier first.
    pub fn links(&self) -> impl DoubleEndedIterator<Item = &ChainLink> + ExactSizeIterator {
        self.reversed.iter().rev()
    }

    /// Links starting at the target end.
    pub fn links_from_target(&self) -> &[ChainLink] {
        &self.reversed
    }

    /// The link applied to the qualifier.
    pub fn first_link(&self) -> &ChainLink {
        &self.reversed[self.reversed.len() - 1]
    }

    /// The link yielding the target value.
    pub fn last_link(&self) -> &ChainLink {
        &self.reversed[0]
    }

    /// A chain is anchored when its start is directly available: a static head or a
    /// qualifier already in scope.
    pub fn is_anchored(&self, context: &dyn ResolutionContext) -> bool {
        self.head.is_static() || context.is_reachable(&self.qualifier_type)
    }

    pub fn compare(&self, other: &Chain) -> ChainRelation {
        similarity::compare_links(&self.reversed, &other.reversed)
    }
}

fn resolve_link(
    operation: &ChainOperation,
    target: &SearchTarget,
    context: &dyn ResolutionContext,
) -> Option<(ChainLink, TypeName)> {
    match operation {
        ChainOperation::Call(signature) => {
            let qualifier_type = context.resolve_qualifier_type(signature)?;
            // Members of the searched type itself are not useful steps.
            if !signature.is_static && context.is_subtype(&target.class_name, &qualifier_type) {
                return None;
            }

            let mut overloads = context.resolve_overloads(signature);
            if overloads.is_empty() {
                return None;
            }
            if overloads
                .iter()
                .any(|o| o.takes_parameter_of(&target.target_type))
            {
                return None;
            }

            // Fewest parameters first so the representative is stable.
            overloads.sort_by(|a, b| a.arity().cmp(&b.arity()).then_with(|| a.id.cmp(&b.id)));
            overloads.dedup_by(|a, b| a.id == b.id);
            Some((ChainLink::call(overloads), qualifier_type))
        }
        ChainOperation::Cast(cast) => {
            if context.is_subtype(&cast.operand, &cast.target) {
                return None;
            }
            Some((ChainLink::cast(cast.target.clone()), cast.operand.clone()))
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut expr = self.qualifier_type.simple_name().to_string();
        for link in self.links() {
            match link {
                ChainLink::Call { candidates } => {
                    let Some(rep) = candidates.first() else {
                        continue;
                    };
                    let args = if rep.arity() == 0 { "" } else { ".." };
                    expr = format!("{}.{}({})", expr, rep.name, args);
                }
                ChainLink::Cast { target_type } => {
                    expr = format!("(({}) {})", target_type.simple_name(), expr);
                }
            }
        }
        f.write_str(&expr)
    }
}

impl Serialize for Chain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let links: Vec<&ChainLink> = self.links().collect();
        let mut state = serializer.serialize_struct("Chain", 5)?;
        state.serialize_field("text", &self.to_string())?;
        state.serialize_field("qualifier_type", &self.qualifier_type)?;
        state.serialize_field("head", &self.head)?;
        state.serialize_field("weight", &self.weight)?;
        state.serialize_field("links", &links)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{MethodEntry, Snapshot};
    use chainscope_api::{MethodSignature, Parameter};

    fn call(owner: &str, name: &str) -> ChainOperation {
        ChainOperation::Call(MethodSignature::new(owner, name))
    }

    fn snapshot() -> Snapshot {
        Snapshot::builder()
            .method(MethodEntry::new("A", "toT", "T", 100))
            .method(MethodEntry::new("B", "toA", "A", 50))
            .method(MethodEntry::new("T", "copy", "T", 500))
            .method(
                MethodEntry::new("C", "wrap", "T", 70).with_parameters(vec![Parameter::new("T")]),
            )
            .method(MethodEntry::new("Base", "self", "T", 20))
            .subtype("T", "Base")
            .build()
    }

    #[test]
    #[should_panic(expected = "at least one link")]
    fn test_empty_chain_panics() {
        Chain::from_links(vec![], call("A", "toT"), TypeName::new("A"), 1);
    }

    #[test]
    fn test_hand_built_empty_call_renders_without_panicking() {
        let chain = Chain::from_links(
            vec![
                ChainLink::Call { candidates: vec![] },
                ChainLink::cast("Dog"),
            ],
            call("Zoo", "pick"),
            TypeName::new("Zoo"),
            1,
        );
        assert_eq!(chain.to_string(), "((Dog) Zoo)");
        assert!(chain.first_link().representative().is_none());
    }

    #[test]
    fn test_build_and_continue() {
        let snapshot = snapshot();
        let context = snapshot.context();
        let target = SearchTarget::value("T");

        let chain = Chain::build(&call("A", "toT"), 100, &target, &context).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.qualifier_type().as_str(), "A");

        let longer = chain
            .continue_with(&call("B", "toA"), 50, &target, &context)
            .unwrap();
        assert_eq!(longer.len(), 2);
        assert_eq!(longer.weight(), 50);
        assert_eq!(longer.qualifier_type().as_str(), "B");
        assert_eq!(longer.head(), &call("B", "toA"));
        assert_eq!(longer.to_string(), "B.toA().toT()");

        let names: Vec<_> = longer
            .links()
            .map(|l| l.representative().unwrap().name.to_string())
            .collect();
        assert_eq!(names, vec!["toA", "toT"]);
        assert_eq!(longer.first_link().representative().unwrap().name, "toA");
        assert_eq!(longer.last_link().representative().unwrap().name, "toT");
    }

    #[test]
    fn test_continuation_never_raises_weight() {
        let snapshot = snapshot();
        let context = snapshot.context();
        let target = SearchTarget::value("T");

        let chain = Chain::build(&call("A", "toT"), 10, &target, &context).unwrap();
        let longer = chain
            .continue_with(&call("B", "toA"), 1000, &target, &context)
            .unwrap();
        assert_eq!(longer.weight(), 10);
    }

    #[test]
    fn test_construction_rejects_members_of_target_and_its_supertypes() {
        let snapshot = snapshot();
        let context = snapshot.context();
        let target = SearchTarget::value("T");

        assert!(Chain::build(&call("T", "copy"), 500, &target, &context).is_none());
        assert!(Chain::build(&call("Base", "self"), 20, &target, &context).is_none());
    }

    #[test]
    fn test_construction_rejects_target_typed_parameters() {
        let snapshot = snapshot();
        let context = snapshot.context();
        let target = SearchTarget::value("T");

        assert!(Chain::build(&call("C", "wrap"), 70, &target, &context).is_none());
    }

    #[test]
    fn test_construction_rejects_unknown_signatures() {
        let snapshot = snapshot();
        let context = snapshot.context();
        let target = SearchTarget::value("T");

        assert!(Chain::build(&call("Nowhere", "toT"), 1, &target, &context).is_none());
    }

    #[test]
    fn test_cast_link_rendering() {
        let snapshot = Snapshot::builder().subtype("Dog", "Animal").build();
        let context = snapshot.context();
        let target = SearchTarget::value("Dog");

        let cast: ChainOperation = "(Dog)Animal".parse().unwrap();
        let chain = Chain::build(&cast, 3, &target, &context).unwrap();
        assert!(chain.first_link().is_cast());
        assert_eq!(chain.qualifier_type().as_str(), "Animal");
        assert_eq!(chain.to_string(), "((Dog) Animal)");

        let upcast: ChainOperation = "(Animal)Dog".parse().unwrap();
        assert!(Chain::build(&upcast, 3, &target, &context).is_none());
    }
}

use super::Snapshot;
use chainscope_api::{MethodSignature, Overload, ResolutionContext, TypeName};
use std::collections::{HashMap, HashSet, VecDeque};

/// Declarations, the type hierarchy and the values in scope of a [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotContext {
    overloads: HashMap<MethodSignature, Vec<Overload>>,
    supertypes: HashMap<TypeName, Vec<TypeName>>,
    /// Scope types and everything they can be assigned to.
    reachable: HashSet<TypeName>,
}

impl SnapshotContext {
    pub fn new(snapshot: &Snapshot) -> Self {
        let mut overloads: HashMap<MethodSignature, Vec<Overload>> = HashMap::new();
        for method in &snapshot.methods {
            let declared = overloads.entry(method.signature()).or_default();
            for overload in method.resolve_overloads() {
                if !declared.iter().any(|o| o.id == overload.id) {
                    declared.push(overload);
                }
            }
        }

        let supertypes: HashMap<TypeName, Vec<TypeName>> = snapshot
            .supertypes
            .iter()
            .map(|(ty, sups)| (ty.clone(), sups.clone()))
            .collect();

        let mut context = Self {
            overloads,
            supertypes,
            reachable: HashSet::new(),
        };
        context.reachable = snapshot
            .scope
            .iter()
            .flat_map(|ty| context.supertypes_of(ty))
            .collect();
        context
    }

    /// `ty` followed by all of its transitive supertypes, breadth first.
    pub fn supertypes_of(&self, ty: &TypeName) -> Vec<TypeName> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(ty.clone());

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if let Some(sups) = self.supertypes.get(&current) {
                queue.extend(sups.iter().cloned());
            }
            order.push(current);
        }
        order
    }
}

impl ResolutionContext for SnapshotContext {
    fn resolve_qualifier_type(&self, signature: &MethodSignature) -> Option<TypeName> {
        self.overloads
            .contains_key(signature)
            .then(|| signature.owner.clone())
    }

    fn resolve_overloads(&self, signature: &MethodSignature) -> Vec<Overload> {
        self.overloads.get(signature).cloned().unwrap_or_default()
    }

    fn is_reachable(&self, ty: &TypeName) -> bool {
        self.reachable.contains(ty)
    }

    fn is_subtype(&self, sub: &TypeName, sup: &TypeName) -> bool {
        if sub == sup {
            return true;
        }
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([sub]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for parent in self.supertypes.get(current).into_iter().flatten() {
                if parent == sup {
                    return true;
                }
                queue.push_back(parent);
            }
        }
        false
    }
}

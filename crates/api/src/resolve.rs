use crate::models::{MethodSignature, Overload, TypeName};

/// Semantic queries answered by the host about the code being completed.
pub trait ResolutionContext: Send + Sync {
    /// The type a value must have to invoke `signature`.
    fn resolve_qualifier_type(&self, signature: &MethodSignature) -> Option<TypeName>;

    /// Concrete overloads `signature` can bind to; empty when none are applicable.
    fn resolve_overloads(&self, signature: &MethodSignature) -> Vec<Overload>;

    /// Whether a value of `ty` is obtainable in the current scope without chaining.
    fn is_reachable(&self, ty: &TypeName) -> bool;

    /// Reflexive subtype test.
    fn is_subtype(&self, sub: &TypeName, sup: &TypeName) -> bool {
        sub == sup
    }
}

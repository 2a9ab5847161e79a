use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Name of a type as the index and the resolution context know it.
///
/// Types are compared by name only; subtype relations are answered by the
/// [`ResolutionContext`](crate::ResolutionContext).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TypeName(SmolStr);

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

const STRING_LIKE: &[&str] = &[
    "String",
    "java.lang.String",
    "CharSequence",
    "java.lang.CharSequence",
];

impl TypeName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.contains(&self.as_str())
    }

    /// Types a completion can satisfy by typing a literal.
    pub fn is_string_like(&self) -> bool {
        STRING_LIKE.contains(&self.as_str())
    }

    /// The array type `self[]`.
    pub fn array(&self) -> TypeName {
        TypeName::new(format!("{}[]", self.0))
    }

    /// Last segment of a dotted name, e.g. `List` for `java.util.List`.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(self.as_str())
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        TypeName::new(s)
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        TypeName(SmolStr::from(s))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a value of a type is produced: directly, or as an element of an
/// array or an iterable.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    #[default]
    ZeroDim,
    ArrayOneDim,
    IteratorOneDim,
}

/// The goal of one chain search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    /// The full type the completed expression must have.
    pub target_type: TypeName,
    /// The class the index is queried with (the element class for arrays and iterables).
    pub class_name: TypeName,
    /// Reference kinds to query the index with.
    pub kinds: Vec<ReferenceKind>,
}

impl SearchTarget {
    /// A plain value of `ty`.
    pub fn value(ty: impl Into<TypeName>) -> Self {
        let ty = ty.into();
        Self {
            target_type: ty.clone(),
            class_name: ty,
            kinds: vec![ReferenceKind::ZeroDim],
        }
    }

    /// An array whose elements are `element`.
    pub fn array_of(element: impl Into<TypeName>) -> Self {
        let element = element.into();
        Self {
            target_type: element.array(),
            class_name: element,
            kinds: vec![ReferenceKind::ArrayOneDim],
        }
    }

    /// An iterable `container` whose elements are `element`.
    pub fn iterable_of(container: impl Into<TypeName>, element: impl Into<TypeName>) -> Self {
        Self {
            target_type: container.into(),
            class_name: element.into(),
            kinds: vec![ReferenceKind::IteratorOneDim],
        }
    }

    pub fn with_kind(mut self, kind: ReferenceKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_classification() {
        assert!(TypeName::new("int").is_primitive());
        assert!(!TypeName::new("Integer").is_primitive());
        assert!(TypeName::new("java.lang.String").is_string_like());
        assert_eq!(TypeName::new("java.util.List").simple_name(), "List");
        assert_eq!(TypeName::new("Foo").array().as_str(), "Foo[]");
    }

    #[test]
    fn test_search_target_constructors() {
        let array = SearchTarget::array_of("Foo");
        assert_eq!(array.target_type.as_str(), "Foo[]");
        assert_eq!(array.class_name.as_str(), "Foo");
        assert_eq!(array.kinds, vec![ReferenceKind::ArrayOneDim]);

        let value = SearchTarget::value("Foo").with_kind(ReferenceKind::ZeroDim);
        assert_eq!(value.kinds.len(), 1);
    }

    #[test]
    fn test_reference_kind_serde() {
        let kind: ReferenceKind = serde_json::from_str("\"array_one_dim\"").unwrap();
        assert_eq!(kind, ReferenceKind::ArrayOneDim);
    }
}

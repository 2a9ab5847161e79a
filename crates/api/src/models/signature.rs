use super::types::TypeName;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Incomplete identity of a method: it names the member but not the overload.
///
/// Rendered as `Owner#name` for instance members and `Owner::name` for static ones.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodSignature {
    pub owner: TypeName,
    pub name: SmolStr,
    #[serde(rename = "static", default)]
    pub is_static: bool,
}

impl MethodSignature {
    pub fn new(owner: impl Into<TypeName>, name: impl AsRef<str>) -> Self {
        Self {
            owner: owner.into(),
            name: SmolStr::new(name.as_ref()),
            is_static: false,
        }
    }

    pub fn new_static(owner: impl Into<TypeName>, name: impl AsRef<str>) -> Self {
        Self {
            is_static: true,
            ..Self::new(owner, name)
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_static { "::" } else { "#" };
        write!(f, "{}{}{}", self.owner, sep, self.name)
    }
}

/// An explicit narrowing `(target) operand` seen in the indexed code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CastSignature {
    pub operand: TypeName,
    pub target: TypeName,
}

impl CastSignature {
    pub fn new(operand: impl Into<TypeName>, target: impl Into<TypeName>) -> Self {
        Self {
            operand: operand.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for CastSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.target, self.operand)
    }
}

/// A single step the reference index counts: a call or a cast.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChainOperation {
    Call(MethodSignature),
    Cast(CastSignature),
}

impl ChainOperation {
    pub fn is_static(&self) -> bool {
        match self {
            ChainOperation::Call(sig) => sig.is_static,
            ChainOperation::Cast(_) => false,
        }
    }

    pub fn as_call(&self) -> Option<&MethodSignature> {
        match self {
            ChainOperation::Call(sig) => Some(sig),
            ChainOperation::Cast(_) => None,
        }
    }
}

impl From<MethodSignature> for ChainOperation {
    fn from(sig: MethodSignature) -> Self {
        ChainOperation::Call(sig)
    }
}

impl From<CastSignature> for ChainOperation {
    fn from(cast: CastSignature) -> Self {
        ChainOperation::Cast(cast)
    }
}

impl fmt::Display for ChainOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainOperation::Call(sig) => fmt::Display::fmt(sig, f),
            ChainOperation::Cast(cast) => fmt::Display::fmt(cast, f),
        }
    }
}

impl FromStr for ChainOperation {
    type Err = ApiError;

    /// Parses `Owner#name`, `Owner::name` or `(Target)Operand`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ApiError::InvalidArgument(format!("malformed operation: '{s}'"));

        if let Some(rest) = s.strip_prefix('(') {
            let (target, operand) = rest.split_once(')').ok_or_else(invalid)?;
            if target.is_empty() || operand.is_empty() {
                return Err(invalid());
            }
            return Ok(ChainOperation::Cast(CastSignature::new(
                operand.trim(),
                target.trim(),
            )));
        }

        let (owner, name, is_static) = if let Some((owner, name)) = s.rsplit_once("::") {
            (owner, name, true)
        } else if let Some((owner, name)) = s.rsplit_once('#') {
            (owner, name, false)
        } else {
            return Err(invalid());
        };

        if owner.is_empty() || name.is_empty() {
            return Err(invalid());
        }

        let mut sig = MethodSignature::new(owner, name);
        sig.is_static = is_static;
        Ok(ChainOperation::Call(sig))
    }
}

/// A value paired with how often the index has seen it.
///
/// Ordered by descending count, then ascending value, so sorted collections
/// of occurrences iterate the most frequent first with a stable tiebreak.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Occurrences<T> {
    pub value: T,
    pub count: u64,
}

impl<T> Occurrences<T> {
    pub fn new(value: T, count: u64) -> Self {
        Self { value, count }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Occurrences<U> {
        Occurrences {
            value: f(self.value),
            count: self.count,
        }
    }
}

impl<T: Ord> Ord for Occurrences<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.value.cmp(&other.value))
    }
}

impl<T: Ord> PartialOrd for Occurrences<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

use super::types::TypeName;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Unique identity of a concrete declaration, e.g. `java.util.Map#get(Object)`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct MethodId(pub SmolStr);

impl MethodId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id.as_ref()))
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub ty: TypeName,
    #[serde(default)]
    pub primitive: bool,
    #[serde(default)]
    pub nullable: bool,
}

impl Parameter {
    pub fn new(ty: impl Into<TypeName>) -> Self {
        let ty = ty.into();
        Self {
            primitive: ty.is_primitive(),
            nullable: false,
            ty,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A concrete declaration the resolution context bound a signature to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Overload {
    pub id: MethodId,
    pub name: SmolStr,
    pub owner: TypeName,
    #[serde(rename = "static", default)]
    pub is_static: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: TypeName,
    /// The deepest declaration this one overrides, if any.
    #[serde(default)]
    pub overrides: Option<MethodId>,
}

impl Overload {
    /// The deepest declaration in the override hierarchy, this one included.
    pub fn root(&self) -> &MethodId {
        self.overrides.as_ref().unwrap_or(&self.id)
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn non_primitive_parameters(&self) -> usize {
        self.parameters.iter().filter(|p| !p.primitive).count()
    }

    pub fn takes_parameter_of(&self, ty: &TypeName) -> bool {
        self.parameters.iter().any(|p| &p.ty == ty)
    }
}

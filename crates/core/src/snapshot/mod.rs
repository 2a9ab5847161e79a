//! A serializable picture of an indexed codebase and a completion scope.
//!
//! Snapshots back the in-memory [`ReferenceIndex`](chainscope_api::ReferenceIndex) and
//! [`ResolutionContext`](chainscope_api::ResolutionContext) implementations used by
//! the CLI and the tests.

mod context;
mod index;

pub use context::SnapshotContext;
pub use index::SnapshotIndex;

use crate::error::Result;
use chainscope_api::{
    ApiError, ApiResult, ChainOperation, MethodId, MethodSignature, Overload, Parameter,
    ReferenceKind, TypeName,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub methods: Vec<MethodEntry>,
    pub casts: Vec<CastEntry>,
    pub call_order: Vec<CallOrderEntry>,
    /// Direct supertypes per type.
    pub supertypes: BTreeMap<TypeName, Vec<TypeName>>,
    /// Types of the values available where completion happens.
    pub scope: Vec<TypeName>,
}

impl Snapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects entries that cannot name a real operation.
    pub fn validate(&self) -> ApiResult<()> {
        for method in &self.methods {
            if method.owner.as_str().is_empty() || method.name.is_empty() {
                return Err(ApiError::InvalidArgument(format!(
                    "method entry needs an owner and a name: '{}#{}'",
                    method.owner, method.name
                )));
            }
        }
        for cast in &self.casts {
            if cast.operand == cast.target {
                return Err(ApiError::InvalidArgument(format!(
                    "cast from {} to itself",
                    cast.operand
                )));
            }
        }
        Ok(())
    }

    pub fn index(&self) -> SnapshotIndex {
        SnapshotIndex::new(self)
    }

    pub fn context(&self) -> SnapshotContext {
        SnapshotContext::new(self)
    }
}

/// A method as seen by the index: what it produces and how often it is called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodEntry {
    pub owner: TypeName,
    pub name: String,
    #[serde(rename = "static", default)]
    pub is_static: bool,
    /// Class the produced value is indexed under; the element class for array and
    /// iterator kinds.
    pub returns: TypeName,
    #[serde(default)]
    pub kind: ReferenceKind,
    pub occurrences: u64,
    /// Declarations the signature resolves to. Defaults to one parameterless
    /// overload; an explicit empty list makes the signature unresolvable.
    #[serde(default = "default_overloads")]
    pub overloads: Vec<OverloadEntry>,
}

fn default_overloads() -> Vec<OverloadEntry> {
    vec![OverloadEntry::default()]
}

impl MethodEntry {
    pub fn new(
        owner: impl Into<TypeName>,
        name: impl Into<String>,
        returns: impl Into<TypeName>,
        occurrences: u64,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            is_static: false,
            returns: returns.into(),
            kind: ReferenceKind::ZeroDim,
            occurrences,
            overloads: default_overloads(),
        }
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn kind(mut self, kind: ReferenceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Replaces the parameters of the first overload.
    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        match self.overloads.first_mut() {
            Some(first) => first.parameters = parameters,
            None => self.overloads.push(OverloadEntry::new(parameters)),
        }
        self
    }

    pub fn with_overload(mut self, overload: OverloadEntry) -> Self {
        self.overloads.push(overload);
        self
    }

    pub fn without_overloads(mut self) -> Self {
        self.overloads.clear();
        self
    }

    pub fn signature(&self) -> MethodSignature {
        let mut sig = MethodSignature::new(self.owner.clone(), &self.name);
        sig.is_static = self.is_static;
        sig
    }

    fn produced_type(&self) -> TypeName {
        match self.kind {
            ReferenceKind::ArrayOneDim => self.returns.array(),
            ReferenceKind::ZeroDim | ReferenceKind::IteratorOneDim => self.returns.clone(),
        }
    }

    pub(crate) fn resolve_overloads(&self) -> Vec<Overload> {
        self.overloads
            .iter()
            .map(|entry| {
                let id = entry.id.clone().unwrap_or_else(|| {
                    let params: Vec<&str> =
                        entry.parameters.iter().map(|p| p.ty.as_str()).collect();
                    format!("{}#{}({})", self.owner, self.name, params.join(","))
                });
                Overload {
                    id: MethodId::new(id),
                    name: self.name.as_str().into(),
                    owner: self.owner.clone(),
                    is_static: self.is_static,
                    parameters: entry.parameters.clone(),
                    return_type: self.produced_type(),
                    overrides: entry.overrides.as_deref().map(MethodId::new),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverloadEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Id of the deepest declaration this overload overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<String>,
}

impl OverloadEntry {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn overriding(mut self, root: impl Into<String>) -> Self {
        self.overrides = Some(root.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastEntry {
    pub operand: TypeName,
    pub target: TypeName,
    pub occurrences: u64,
}

impl CastEntry {
    pub fn new(operand: impl Into<TypeName>, target: impl Into<TypeName>, occurrences: u64) -> Self {
        Self {
            operand: operand.into(),
            target: target.into(),
            occurrences,
        }
    }
}

/// How often `before` was observed ahead of `after` in the same code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallOrderEntry {
    #[serde(with = "operation_text")]
    pub before: ChainOperation,
    #[serde(with = "operation_text")]
    pub after: ChainOperation,
    pub count: u64,
}

/// Operations are written as `Owner#name`, `Owner::name` or `(Target)Operand`.
mod operation_text {
    use chainscope_api::ChainOperation;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(op: &ChainOperation, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(op)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ChainOperation, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn method(mut self, entry: MethodEntry) -> Self {
        self.snapshot.methods.push(entry);
        self
    }

    pub fn cast(mut self, entry: CastEntry) -> Self {
        self.snapshot.casts.push(entry);
        self
    }

    pub fn call_order(
        mut self,
        before: impl Into<ChainOperation>,
        after: impl Into<ChainOperation>,
        count: u64,
    ) -> Self {
        self.snapshot.call_order.push(CallOrderEntry {
            before: before.into(),
            after: after.into(),
            count,
        });
        self
    }

    pub fn subtype(mut self, sub: impl Into<TypeName>, sup: impl Into<TypeName>) -> Self {
        self.snapshot
            .supertypes
            .entry(sub.into())
            .or_default()
            .push(sup.into());
        self
    }

    pub fn reachable(mut self, ty: impl Into<TypeName>) -> Self {
        self.snapshot.scope.push(ty.into());
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "methods": [
            { "owner": "Session", "name": "getUser", "returns": "User", "occurrences": 120 },
            { "owner": "Users", "name": "all", "static": true, "returns": "User",
              "kind": "array_one_dim", "occurrences": 7,
              "overloads": [ { "parameters": [ { "type": "int", "primitive": true } ] } ] },
            { "owner": "Broken", "name": "user", "returns": "User", "occurrences": 3, "overloads": [] }
        ],
        "casts": [ { "operand": "Principal", "target": "User", "occurrences": 4 } ],
        "call_order": [ { "before": "Context#session", "after": "Session#getUser", "count": 80 } ],
        "supertypes": { "Admin": ["User"] },
        "scope": ["Context"]
    }"#;

    #[test]
    fn test_parse_snapshot_json() {
        let snapshot = Snapshot::from_json_str(JSON).unwrap();
        assert_eq!(snapshot.methods.len(), 3);
        assert_eq!(snapshot.methods[0].overloads.len(), 1);
        assert!(snapshot.methods[1].is_static);
        assert_eq!(snapshot.methods[1].kind, ReferenceKind::ArrayOneDim);
        assert!(snapshot.methods[2].overloads.is_empty());
        assert_eq!(
            snapshot.call_order[0].after,
            ChainOperation::Call(MethodSignature::new("Session", "getUser"))
        );
    }

    #[test]
    fn test_snapshot_json_roundtrip_keeps_operations_readable() {
        let snapshot = Snapshot::from_json_str(JSON).unwrap();
        let json = snapshot.to_json_string().unwrap();
        assert!(json.contains("\"Context#session\""));
        assert_eq!(Snapshot::from_json_str(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_malformed_operation_is_rejected() {
        let json = r#"{ "call_order": [ { "before": "nonsense", "after": "A#b", "count": 1 } ] }"#;
        assert!(Snapshot::from_json_str(json).is_err());
    }

    #[test]
    fn test_self_cast_is_rejected() {
        let json = r#"{ "casts": [ { "operand": "A", "target": "A", "occurrences": 1 } ] }"#;
        let err = Snapshot::from_json_str(json).unwrap_err();
        assert!(matches!(err, crate::ChainscopeError::Snapshot(_)));
    }

    #[test]
    fn test_overload_ids_and_types() {
        let entry = MethodEntry::new("Repo", "find", "Item", 1)
            .kind(ReferenceKind::ArrayOneDim)
            .with_parameters(vec![Parameter::new("Query")])
            .with_overload(OverloadEntry::new(vec![]).overriding("Base#find()"));
        let overloads = entry.resolve_overloads();
        assert_eq!(overloads[0].id, MethodId::new("Repo#find(Query)"));
        assert_eq!(overloads[0].return_type.as_str(), "Item[]");
        assert_eq!(overloads[1].root(), &MethodId::new("Base#find()"));
    }
}

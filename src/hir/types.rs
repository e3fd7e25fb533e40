//! The YANG type system: built-in types, derived-type references, and
//! the restriction sets a `typedef`/`type` statement may carry.

use crate::base::Name;
use crate::hir::arena::{NodeId, Resolvable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinType {
    Binary,
    Bits,
    Boolean,
    Decimal64,
    Empty,
    Enumeration,
    Identityref,
    InstanceIdentifier,
    Int8,
    Int16,
    Int32,
    Int64,
    Leafref,
    String,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Union,
}

impl BuiltinType {
    pub fn from_name(name: &str) -> Option<Self> {
        use BuiltinType::*;
        Some(match name {
            "binary" => Binary,
            "bits" => Bits,
            "boolean" => Boolean,
            "decimal64" => Decimal64,
            "empty" => Empty,
            "enumeration" => Enumeration,
            "identityref" => Identityref,
            "instance-identifier" => InstanceIdentifier,
            "int8" => Int8,
            "int16" => Int16,
            "int32" => Int32,
            "int64" => Int64,
            "leafref" => Leafref,
            "string" => String,
            "uint8" => Uint8,
            "uint16" => Uint16,
            "uint32" => Uint32,
            "uint64" => Uint64,
            "union" => Union,
            _ => return None,
        })
    }
}

/// A named enum value (`enum` substatement of an `enumeration` type).
#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: Name,
    pub value: Option<i64>,
}

/// A named bit position (`bit` substatement of a `bits` type).
#[derive(Debug, Clone)]
pub struct BitValue {
    pub name: Name,
    pub position: Option<u32>,
}

/// Restriction substatements that may appear under a `type` statement,
/// independent of which built-in or derived type they restrict.
#[derive(Debug, Clone, Default)]
pub struct Restrictions {
    pub range: Option<String>,
    pub length: Option<String>,
    pub patterns: Vec<String>,
    pub fraction_digits: Option<u8>,
    pub path: Option<String>,
    pub require_instance: Option<bool>,
    pub enum_values: Vec<EnumValue>,
    pub bits: Vec<BitValue>,
    pub union_members: Vec<TypeRef>,
    pub base_identities: Vec<IdentityRefTarget>,
}

/// An unresolved `identityref`'s `base` substatement target, resolved
/// during typedef/identity/feature resolution.
#[derive(Debug, Clone)]
pub struct IdentityRefTarget {
    pub prefix: Option<Name>,
    pub local_name: Name,
    pub resolved: Resolvable<NodeId>,
}

/// A `type` statement's reference, either to a built-in type or to a
/// named `typedef` that must be looked up via prefix + local name.
#[derive(Debug, Clone)]
pub enum TypeRef {
    Builtin(BuiltinType, Restrictions),
    Derived {
        prefix: Option<Name>,
        local_name: Name,
        resolved: Resolvable<NodeId>,
        restrictions: Restrictions,
    },
}

impl TypeRef {
    pub fn is_resolved(&self) -> bool {
        match self {
            TypeRef::Builtin(..) => true,
            TypeRef::Derived { resolved, .. } => resolved.is_resolved(),
        }
    }

    pub fn restrictions(&self) -> &Restrictions {
        match self {
            TypeRef::Builtin(_, r) => r,
            TypeRef::Derived { restrictions, .. } => restrictions,
        }
    }

    /// The built-in type this ultimately derives from, if already known
    /// (true immediately for `Builtin`; for `Derived` only once resolved
    /// and the typedef chain has been walked — see `Resolver::base_type_of`).
    pub fn builtin(&self) -> Option<BuiltinType> {
        match self {
            TypeRef::Builtin(b, _) => Some(*b),
            TypeRef::Derived { .. } => None,
        }
    }
}

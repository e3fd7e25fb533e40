//! The typed schema data model: the arena-of-indices tree produced by
//! [`lower`] from parsed source, and resolved in place by the resolver.

pub mod arena;
pub mod diagnostics;
pub mod lower;
pub mod types;

pub use arena::{
    AugmentData, AugmentTargetSegment, ChoiceData, CommonMeta, ContainerData, FeatureData,
    FeatureRefTarget, IdentityData, IfFeature, Include, Import, LeafData, LeafListData, ListData,
    ModuleData, MustConstraint, NodeId, NodeKind, OrderedBy, Refine, Resolvable, ResolveStatus,
    Revision, SchemaArena, SchemaNode, Status, TypedefData, UsesData,
};
pub use diagnostics::{CompileError, Diagnostic, Severity};
pub use lower::{is_valid_date, lower_file, ModuleRoot};
pub use types::{BitValue, BuiltinType, EnumValue, IdentityRefTarget, Restrictions, TypeRef};

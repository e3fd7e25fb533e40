//! Read-only view over a resolved schema tree for downstream consumers
//! that need to address a schema node by a stable, serializable path
//! rather than a [`NodeId`] (which is only valid within one arena).

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::base::Name;
use crate::hir::{NodeId, SchemaArena};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaId {
    pub name: Name,
    pub namespace: Name,
}

/// One path segment of a [`ResourceId`]. `List`/`LeafList` carry the
/// instance-addressing data a plain schema id cannot: which key-leaf
/// values (or which leaf-list value) pick out one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKey {
    Plain(SchemaId),
    List(SchemaId, IndexMap<Name, String>),
    LeafList(SchemaId, String),
}

impl NodeKey {
    pub fn schema_id(&self) -> &SchemaId {
        match self {
            NodeKey::Plain(id) | NodeKey::List(id, _) | NodeKey::LeafList(id, _) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceId(Vec<NodeKey>);

impl ResourceId {
    pub fn segments(&self) -> &[NodeKey] {
        &self.0
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    #[error("cannot extend a resource id past a leaf-list key")]
    PastTerminal,
    #[error("no current key to add a key-leaf to")]
    NoCurrentKey,
    #[error("cannot add a key-leaf to a key that is not a list key")]
    NotAListKey,
    #[error("cannot build a resource id with no segments")]
    Empty,
}

/// Builds a [`ResourceId`] one branch point at a time, enforcing the
/// shape rules a hand-assembled path could otherwise violate silently.
#[derive(Debug, Default)]
pub struct ResourceIdBuilder {
    segments: Vec<NodeKey>,
}

impl ResourceIdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_branch_point_schema(&mut self, name: Name, namespace: Name) -> Result<&mut Self, BuilderError> {
        self.check_not_terminal()?;
        self.segments.push(NodeKey::Plain(SchemaId { name, namespace }));
        Ok(self)
    }

    /// Adds (or, for the first key leaf, promotes the current plain key
    /// into) a list key-leaf value.
    pub fn add_key_leaf(&mut self, name: Name, value: String) -> Result<&mut Self, BuilderError> {
        match self.segments.last_mut() {
            None => Err(BuilderError::NoCurrentKey),
            Some(NodeKey::List(_, keys)) => {
                keys.insert(name, value);
                Ok(self)
            }
            Some(slot @ NodeKey::Plain(_)) => {
                let schema_id = slot.schema_id().clone();
                let mut keys = IndexMap::new();
                keys.insert(name, value);
                *slot = NodeKey::List(schema_id, keys);
                Ok(self)
            }
            Some(NodeKey::LeafList(..)) => Err(BuilderError::NotAListKey),
        }
    }

    pub fn add_leaf_list_branch_point(&mut self, name: Name, namespace: Name, value: String) -> Result<&mut Self, BuilderError> {
        self.check_not_terminal()?;
        self.segments.push(NodeKey::LeafList(SchemaId { name, namespace }, value));
        Ok(self)
    }

    pub fn build(self) -> Result<ResourceId, BuilderError> {
        if self.segments.is_empty() {
            Err(BuilderError::Empty)
        } else {
            Ok(ResourceId(self.segments))
        }
    }

    fn check_not_terminal(&self) -> Result<(), BuilderError> {
        match self.segments.last() {
            Some(NodeKey::LeafList(..)) => Err(BuilderError::PastTerminal),
            _ => Ok(()),
        }
    }
}

/// The module-level schema context handed to a downstream protocol
/// encoder: a resolved tree's root plus externally registered
/// per-(name, namespace) annotations, with no mutation and no global
/// state — the resolved `SchemaArena` is borrowed, not owned.
pub struct SerializerContext<'a> {
    arena: &'a SchemaArena,
    root: NodeId,
    annotations: FxHashMap<(Name, Name), String>,
}

impl<'a> SerializerContext<'a> {
    pub fn root_context(arena: &'a SchemaArena, root: NodeId) -> Self {
        Self {
            arena,
            root,
            annotations: FxHashMap::default(),
        }
    }

    pub fn with_annotations(arena: &'a SchemaArena, root: NodeId, annotations: FxHashMap<(Name, Name), String>) -> Self {
        Self { arena, root, annotations }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn protocol_annotations(&self) -> &FxHashMap<(Name, Name), String> {
        &self.annotations
    }

    /// Walks a [`ResourceId`] from the root, returning the schema node
    /// it addresses, if any. Only the `(name, namespace)` schema id of
    /// each segment participates in the walk — key-leaf/leaf-list
    /// values address a data *instance*, which this schema-level view
    /// does not hold.
    pub fn resolve(&self, id: &ResourceId) -> Option<NodeId> {
        let mut cur = self.root;
        for segment in id.segments() {
            let schema_id = segment.schema_id();
            cur = *self
                .arena
                .get(cur)
                .child_ids
                .get(&(schema_id.name.clone(), schema_id.namespace.clone()))?;
        }
        Some(cur)
    }

    /// Builds the schema-level [`ResourceId`] that [`resolve`] would
    /// map back to `target`, by walking up its parent chain.
    pub fn path_to(&self, target: NodeId) -> Option<ResourceId> {
        let mut segments = Vec::new();
        let mut cur = target;
        while cur != self.root {
            let node = self.arena.get(cur);
            let name = node.name.clone()?;
            let namespace = node.namespace.clone()?;
            segments.push(NodeKey::Plain(SchemaId { name, namespace }));
            cur = node.parent?;
        }
        segments.reverse();
        if segments.is_empty() {
            None
        } else {
            Some(ResourceId(segments))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{FileId, Span};
    use crate::hir::NodeKind;
    use text_size::TextRange;

    fn span() -> Span {
        Span::new(FileId::new(0), TextRange::empty(0.into()))
    }

    #[test]
    fn builder_rejects_branch_point_after_leaf_list() {
        let mut b = ResourceIdBuilder::new();
        b.add_leaf_list_branch_point(Name::new("entries"), Name::new("urn:m"), "x".into()).unwrap();
        assert_eq!(
            b.add_branch_point_schema(Name::new("next"), Name::new("urn:m")).unwrap_err(),
            BuilderError::PastTerminal
        );
    }

    #[test]
    fn builder_promotes_plain_to_list_on_first_key_leaf() {
        let mut b = ResourceIdBuilder::new();
        b.add_branch_point_schema(Name::new("entry"), Name::new("urn:m")).unwrap();
        b.add_key_leaf(Name::new("id"), "7".into()).unwrap();
        let id = b.build().unwrap();
        match &id.segments()[0] {
            NodeKey::List(_, keys) => assert_eq!(keys.get(&Name::new("id")).unwrap(), "7"),
            other => panic!("expected a promoted list key, got {other:?}"),
        }
    }

    #[test]
    fn build_fails_with_no_segments() {
        assert_eq!(ResourceIdBuilder::new().build().unwrap_err(), BuilderError::Empty);
    }

    #[test]
    fn resolve_round_trips_path_to() {
        let mut arena = SchemaArena::new();
        let root = arena.alloc(NodeKind::Container(Default::default()), Some(Name::new("top")), span());
        arena.get_mut(root).namespace = Some(Name::new("urn:m"));
        let child = arena.alloc(NodeKind::Leaf(crate::hir::LeafData {
            type_ref: crate::hir::TypeRef::Builtin(crate::hir::BuiltinType::String, Default::default()),
            default: None,
            units: None,
            mandatory: false,
            config: None,
        }), Some(Name::new("leaf1")), span());
        arena.append_child(root, child);
        arena.get_mut(child).namespace = Some(Name::new("urn:m"));
        arena.get_mut(root).child_ids.insert((Name::new("leaf1"), Name::new("urn:m")), child);

        let ctx = SerializerContext::root_context(&arena, root);
        let id = ctx.path_to(child).unwrap();
        assert_eq!(ctx.resolve(&id), Some(child));
    }
}

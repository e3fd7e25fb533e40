//! The schema tree: an arena of [`SchemaNode`]s addressed by stable
//! [`NodeId`] indices. Parent/child/sibling links and the `grouping`
//! <-> `uses` relationship form cycles in the source model;
//! representing them as indices into one `Vec` rather than as owning
//! references sidesteps that without `Rc`/`RefCell` bookkeeping. Only
//! [`SchemaArena`] owns nodes — every other link (augment back-links,
//! a `uses`'s resolved target) is a plain `NodeId`.

use crate::base::{Name, Span};
use crate::hir::types::TypeRef;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Resolution state of a cross-statement reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStatus {
    Unresolved,
    IntraFileResolved,
    Linked,
    Resolved,
}

/// A reference that starts `Unresolved` and is filled in by the
/// resolver; `T` is typically a [`NodeId`].
#[derive(Debug, Clone)]
pub struct Resolvable<T> {
    pub status: ResolveStatus,
    value: Option<T>,
}

impl<T> Resolvable<T> {
    pub fn unresolved() -> Self {
        Self {
            status: ResolveStatus::Unresolved,
            value: None,
        }
    }

    pub fn set(&mut self, status: ResolveStatus, value: T) {
        self.status = status;
        self.value = Some(value);
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.status, ResolveStatus::Resolved | ResolveStatus::Linked)
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl<T> Default for Resolvable<T> {
    fn default() -> Self {
        Self::unresolved()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Current,
    Deprecated,
    Obsolete,
}

impl Default for Status {
    fn default() -> Self {
        Status::Current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderedBy {
    System,
    User,
}

impl Default for OrderedBy {
    fn default() -> Self {
        OrderedBy::System
    }
}

/// Attributes common to every node kind.
#[derive(Debug, Clone, Default)]
pub struct CommonMeta {
    pub description: Option<String>,
    pub reference: Option<String>,
    pub status: Status,
    pub when: Option<String>,
    pub if_features: Vec<IfFeature>,
    pub musts: Vec<MustConstraint>,
}

#[derive(Debug, Clone)]
pub struct MustConstraint {
    pub xpath: String,
    pub error_message: Option<String>,
    pub error_app_tag: Option<String>,
}

/// An `if-feature` expression. Boolean operators are kept as opaque text
/// per-term resolution only needs the referenced feature names; full
/// boolean evaluation is a runtime, not a compile-time, concern.
#[derive(Debug, Clone)]
pub struct IfFeature {
    pub expr_text: String,
    pub referenced: Vec<FeatureRefTarget>,
}

#[derive(Debug, Clone)]
pub struct FeatureRefTarget {
    pub prefix: Option<Name>,
    pub local_name: Name,
    pub resolved: Resolvable<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct ModuleData {
    pub namespace_uri: Option<Name>,
    pub prefix: Option<Name>,
    pub yang_version: Option<String>,
    pub revisions: Vec<Revision>,
    pub imports: Vec<Import>,
    pub includes: Vec<Include>,
    /// `submodule` only: the module it belongs to.
    pub belongs_to: Option<Name>,
}

#[derive(Debug, Clone)]
pub struct Revision {
    pub date: String,
    pub description: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Import {
    pub module: Name,
    pub prefix: Name,
    pub revision_date: Option<String>,
    pub resolved_module: Resolvable<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Include {
    pub submodule: Name,
    pub revision_date: Option<String>,
    pub resolved: Resolvable<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct ContainerData {
    pub presence: Option<String>,
    pub config: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ListData {
    pub key: Vec<Name>,
    pub unique: Vec<Vec<Name>>,
    pub min_elements: Option<u32>,
    pub max_elements: Option<u32>,
    pub config: Option<bool>,
    pub ordered_by: OrderedBy,
}

#[derive(Debug, Clone, Default)]
pub struct ChoiceData {
    pub default_case: Option<Name>,
    pub mandatory: bool,
}

#[derive(Debug, Clone)]
pub struct LeafData {
    pub type_ref: TypeRef,
    pub default: Option<String>,
    pub units: Option<String>,
    pub mandatory: bool,
    pub config: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct LeafListData {
    pub type_ref: TypeRef,
    pub default: Vec<String>,
    pub units: Option<String>,
    pub min_elements: Option<u32>,
    pub max_elements: Option<u32>,
    pub config: Option<bool>,
    pub ordered_by: OrderedBy,
}

#[derive(Debug, Clone)]
pub struct TypedefData {
    pub type_ref: TypeRef,
    pub default: Option<String>,
    pub units: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IdentityData {
    pub bases: Vec<crate::hir::types::IdentityRefTarget>,
}

#[derive(Debug, Clone, Default)]
pub struct FeatureData {}

/// A `refine` directive captured verbatim inside a `uses` statement,
/// applied to the cloned grouping subtree at the addressed relative path.
#[derive(Debug, Clone)]
pub struct Refine {
    pub path: Vec<Name>,
    pub default: Option<Vec<String>>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub config: Option<bool>,
    pub mandatory: Option<bool>,
    pub min_elements: Option<u32>,
    pub max_elements: Option<u32>,
    pub presence: Option<String>,
    pub musts: Vec<MustConstraint>,
}

#[derive(Debug, Clone)]
pub struct UsesData {
    pub grouping_prefix: Option<Name>,
    pub grouping_name: Name,
    pub resolved_grouping: Resolvable<NodeId>,
    pub refines: Vec<Refine>,
    /// Raw statement subtrees of inline `augment`s under this `uses`,
    /// spliced into the clone as the final step of expansion.
    pub inline_augments: Vec<crate::parser::Statement>,
}

#[derive(Debug, Clone)]
pub enum AugmentTargetSegment {
    Child { prefix: Option<Name>, name: Name },
}

#[derive(Debug, Clone)]
pub struct AugmentData {
    pub absolute: bool,
    pub target_path: Vec<AugmentTargetSegment>,
    pub resolved_target: Resolvable<NodeId>,
    /// Recorded on the *target* node after splicing, so later collision
    /// checks can attribute a conflict back to the augmenting module.
    pub augmenting_module: Option<Name>,
}

/// The tagged node-kind variant plus its capability record: one enum
/// discriminant per YANG construct, carrying only the fields that
/// construct actually has, instead of a deep trait-object hierarchy.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Module(ModuleData),
    Submodule(ModuleData),
    Container(ContainerData),
    List(ListData),
    Choice(ChoiceData),
    Case,
    Grouping,
    Augment(AugmentData),
    Input,
    Output,
    Notification,
    Rpc,
    Action,
    Leaf(LeafData),
    LeafList(LeafListData),
    Anyxml,
    Anydata,
    Typedef(TypedefData),
    Identity(IdentityData),
    Feature(FeatureData),
    Uses(UsesData),
    /// Unrecognized (extension) statement, kept verbatim so it round-trips
    /// but plays no role in resolution.
    Unknown,
}

impl NodeKind {
    pub fn is_data_tree_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Module(_)
                | NodeKind::Submodule(_)
                | NodeKind::Container(_)
                | NodeKind::List(_)
                | NodeKind::Choice(_)
                | NodeKind::Case
                | NodeKind::Grouping
                | NodeKind::Augment(_)
                | NodeKind::Input
                | NodeKind::Output
                | NodeKind::Notification
                | NodeKind::Rpc
                | NodeKind::Action
        )
    }

    pub fn is_terminal_data(&self) -> bool {
        matches!(
            self,
            NodeKind::Leaf(_) | NodeKind::LeafList(_) | NodeKind::Anyxml | NodeKind::Anydata
        )
    }

    pub fn name_tag(&self) -> &'static str {
        match self {
            NodeKind::Module(_) => "module",
            NodeKind::Submodule(_) => "submodule",
            NodeKind::Container(_) => "container",
            NodeKind::List(_) => "list",
            NodeKind::Choice(_) => "choice",
            NodeKind::Case => "case",
            NodeKind::Grouping => "grouping",
            NodeKind::Augment(_) => "augment",
            NodeKind::Input => "input",
            NodeKind::Output => "output",
            NodeKind::Notification => "notification",
            NodeKind::Rpc => "rpc",
            NodeKind::Action => "action",
            NodeKind::Leaf(_) => "leaf",
            NodeKind::LeafList(_) => "leaf-list",
            NodeKind::Anyxml => "anyxml",
            NodeKind::Anydata => "anydata",
            NodeKind::Typedef(_) => "typedef",
            NodeKind::Identity(_) => "identity",
            NodeKind::Feature(_) => "feature",
            NodeKind::Uses(_) => "uses",
            NodeKind::Unknown => "unknown-statement",
        }
    }
}

/// A schema node: an entry in the arena plus its tree links.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub kind: NodeKind,
    pub name: Option<Name>,
    pub namespace: Option<Name>,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub common: CommonMeta,
    pub span: Span,
    /// Populated during namespace finalization: the child-schema-id map
    /// for nodes that are data-tree containers.
    pub child_ids: IndexMap<(Name, Name), NodeId>,
    /// `choice` only, resolved default case id.
    pub default_child: Option<NodeId>,
    /// Back-link set when this node received children via `augment`.
    pub augmented_by: Vec<Name>,
    /// Set only on a node spliced directly into a tree by `augment`: the
    /// name of the module that contributed it. Namespace assignment reads
    /// this to override inheritance for exactly that node, never for its
    /// parent or its pre-existing siblings.
    pub augment_source: Option<Name>,
}

impl SchemaNode {
    fn new(kind: NodeKind, name: Option<Name>, span: Span) -> Self {
        Self {
            kind,
            name,
            namespace: None,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            common: CommonMeta::default(),
            span,
            child_ids: IndexMap::new(),
            default_child: None,
            augmented_by: Vec::new(),
            augment_source: None,
        }
    }
}

/// Owns every [`SchemaNode`] in one compilation unit.
#[derive(Debug, Default)]
pub struct SchemaArena {
    nodes: Vec<SchemaNode>,
}

impl SchemaArena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, kind: NodeKind, name: Option<Name>, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SchemaNode::new(kind, name, span));
        id
    }

    pub fn get(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SchemaNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append `child` as the last sibling under `parent`, preserving
    /// insertion order: sibling order is semantically meaningful
    /// (data-tree child order, case ordering, and so on).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        let prev_last = self.nodes[parent.index()].last_child;
        match prev_last {
            Some(last) => {
                self.nodes[last.index()].next_sibling = Some(child);
                self.nodes[child.index()].prev_sibling = Some(last);
            }
            None => {
                self.nodes[parent.index()].first_child = Some(child);
            }
        }
        self.nodes[parent.index()].last_child = Some(child);
    }

    /// Splice `child` into `parent`'s children right after `after`
    /// (`None` means "as the first child"), preserving the rest of the
    /// sibling chain — used to replace a `uses` placeholder in place.
    pub fn insert_after(&mut self, parent: NodeId, after: Option<NodeId>, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        let next = match after {
            Some(after) => self.nodes[after.index()].next_sibling,
            None => self.nodes[parent.index()].first_child,
        };
        self.nodes[child.index()].prev_sibling = after;
        self.nodes[child.index()].next_sibling = next;
        match after {
            Some(after) => self.nodes[after.index()].next_sibling = Some(child),
            None => self.nodes[parent.index()].first_child = Some(child),
        }
        match next {
            Some(next) => self.nodes[next.index()].prev_sibling = Some(child),
            None => self.nodes[parent.index()].last_child = Some(child),
        }
    }

    /// Detach `node` from its parent's sibling chain without freeing the
    /// arena slot (used to remove a resolved `uses` placeholder).
    pub fn unlink(&mut self, node: NodeId) {
        let n = &self.nodes[node.index()];
        let (parent, prev, next) = (n.parent, n.prev_sibling, n.next_sibling);
        match prev {
            Some(prev) => self.nodes[prev.index()].next_sibling = next,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.index()].first_child = next;
                }
            }
        }
        match next {
            Some(next) => self.nodes[next.index()].prev_sibling = prev,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent.index()].last_child = prev;
                }
            }
        }
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut cur = self.nodes[parent.index()].first_child;
        std::iter::from_fn(move || {
            let id = cur?;
            cur = self.nodes[id.index()].next_sibling;
            Some(id)
        })
    }

    /// Deep-clone a `grouping`'s subtree. The clone does not share
    /// mutable state with the template: every node's metadata is
    /// duplicated so a `refine` may mutate the copy safely, and the
    /// clone's namespace is left `None` so finalization assigns the
    /// *enclosing* (using) module's namespace, not the grouping's.
    pub fn clone_subtree(&mut self, root: NodeId) -> NodeId {
        let clone_root = self.clone_node_shallow(root);
        let mut stack = vec![(root, clone_root)];
        while let Some((src_parent, dst_parent)) = stack.pop() {
            for src_child in self.children(src_parent).collect::<Vec<_>>() {
                let dst_child = self.clone_node_shallow(src_child);
                self.append_child(dst_parent, dst_child);
                stack.push((src_child, dst_child));
            }
        }
        clone_root
    }

    fn clone_node_shallow(&mut self, src: NodeId) -> NodeId {
        let mut node = self.nodes[src.index()].clone();
        node.parent = None;
        node.first_child = None;
        node.last_child = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        node.namespace = None;
        node.child_ids = IndexMap::new();
        node.default_child = None;
        node.augmented_by = Vec::new();
        node.augment_source = None;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Walk up from a `case`/`augment` node to find the node whose
    /// collision scope authoritatively governs `name`/`ns`: a `case`
    /// delegates to its parent `choice`; a `choice` that is itself the
    /// root of an `augment`'s spliced children delegates to the
    /// augment's target.
    pub fn collision_scope(&self, node: NodeId) -> NodeId {
        let mut cur = node;
        loop {
            match &self.nodes[cur.index()].kind {
                NodeKind::Case => match self.nodes[cur.index()].parent {
                    Some(parent) => cur = parent,
                    None => return cur,
                },
                _ => return cur,
            }
        }
    }

    /// Is `name`/`ns` already used by a data-tree child of `parent`
    /// (and, if `parent` is a `choice`, by any of its cases)?
    pub fn detect_colliding_child(&self, parent: NodeId, name: &Name, ns: &Name) -> Option<NodeId> {
        let scope = self.collision_scope(parent);
        if matches!(self.nodes[scope.index()].kind, NodeKind::Choice(_)) {
            for case in self.children(scope) {
                if let Some(&hit) = self.nodes[case.index()]
                    .child_ids
                    .get(&(name.clone(), ns.clone()))
                {
                    return Some(hit);
                }
            }
            return None;
        }
        self.nodes[scope.index()]
            .child_ids
            .get(&(name.clone(), ns.clone()))
            .copied()
    }
}

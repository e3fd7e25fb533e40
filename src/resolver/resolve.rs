//! Phases 2 onward, run after [`super::module_loader::ModuleLoader`] has
//! produced a [`LoadedUnit`] with every import/include already bound:
//! typedef/identity/feature lookup, `uses` expansion, `augment`
//! application, namespace assignment, collision detection, and a
//! lightweight `leafref` path check.

use crate::base::{Name, Span};
use crate::config::CompileConfig;
use crate::hir::{
    lower::lower_statement_as_augment, AugmentTargetSegment, BuiltinType, CompileError, NodeId,
    NodeKind, Refine, ResolveStatus, SchemaArena, TypeRef,
};
use crate::resolver::module_loader::LoadedUnit;
use crate::resolver::worklist::Worklist;

pub struct Resolver<'a> {
    config: &'a CompileConfig,
}

enum UsesOutcome {
    Expanded,
    Deferred,
    Failed,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a CompileConfig) -> Self {
        Self { config }
    }

    pub fn resolve(&self, unit: &mut LoadedUnit) -> Result<(), Vec<CompileError>> {
        let _ = self.config;
        let modules: Vec<NodeId> = unit.modules_in_dependency_order();
        let mut errors = Vec::new();

        self.resolve_type_and_ref_targets(unit, &modules, &mut errors);
        self.expand_uses(unit, &modules, &mut errors);
        self.apply_augments(unit, &modules, &mut errors);
        self.finalize_namespaces_and_collisions(unit, &modules, &mut errors);
        self.validate_paths(unit, &modules, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    // ---- typedef / identity / feature resolution -----------------------

    fn resolve_type_and_ref_targets(&self, unit: &mut LoadedUnit, modules: &[NodeId], errors: &mut Vec<CompileError>) {
        for &module_id in modules {
            for node_id in subtree_nodes(&unit.arena, module_id) {
                self.resolve_node_type(unit, module_id, node_id, errors);
                self.resolve_node_identity_bases(unit, module_id, node_id, errors);
                self.resolve_node_if_features(unit, module_id, node_id, errors);
            }
        }
    }

    fn resolve_node_type(&self, unit: &mut LoadedUnit, module_id: NodeId, node_id: NodeId, errors: &mut Vec<CompileError>) {
        let span = unit.arena.get(node_id).span;
        let placeholder = || TypeRef::Builtin(BuiltinType::String, Default::default());
        let mut type_ref = match &mut unit.arena.get_mut(node_id).kind {
            NodeKind::Leaf(d) => std::mem::replace(&mut d.type_ref, placeholder()),
            NodeKind::LeafList(d) => std::mem::replace(&mut d.type_ref, placeholder()),
            NodeKind::Typedef(d) => std::mem::replace(&mut d.type_ref, placeholder()),
            _ => return,
        };
        self.resolve_type_ref_in_place(unit, module_id, span, &mut type_ref, errors);
        match &mut unit.arena.get_mut(node_id).kind {
            NodeKind::Leaf(d) => d.type_ref = type_ref,
            NodeKind::LeafList(d) => d.type_ref = type_ref,
            NodeKind::Typedef(d) => d.type_ref = type_ref,
            _ => {}
        }
    }

    fn resolve_type_ref_in_place(
        &self,
        unit: &mut LoadedUnit,
        module_id: NodeId,
        span: Span,
        type_ref: &mut TypeRef,
        errors: &mut Vec<CompileError>,
    ) {
        match type_ref {
            TypeRef::Derived {
                prefix,
                local_name,
                resolved,
                ..
            } => {
                if resolved.is_resolved() {
                    return;
                }
                match target_module(&unit.arena, module_id, prefix.as_ref(), span)
                    .and_then(|m| {
                        find_named(&unit.arena, m, local_name, |k| matches!(k, NodeKind::Typedef(_)))
                            .ok_or_else(|| CompileError::UnresolvedReference {
                                span,
                                name: local_name.to_string(),
                            })
                    }) {
                    Ok(target) => resolved.set(ResolveStatus::Resolved, target),
                    Err(e) => errors.push(e),
                }
            }
            TypeRef::Builtin(_, restrictions) => {
                for base in &mut restrictions.base_identities {
                    if base.resolved.is_resolved() {
                        continue;
                    }
                    match target_module(&unit.arena, module_id, base.prefix.as_ref(), span)
                        .and_then(|m| {
                            find_named(&unit.arena, m, &base.local_name, |k| matches!(k, NodeKind::Identity(_)))
                                .ok_or_else(|| CompileError::UnresolvedReference {
                                    span,
                                    name: base.local_name.to_string(),
                                })
                        }) {
                        Ok(target) => base.resolved.set(ResolveStatus::Resolved, target),
                        Err(e) => errors.push(e),
                    }
                }
                for member in &mut restrictions.union_members {
                    self.resolve_type_ref_in_place(unit, module_id, span, member, errors);
                }
            }
        }
    }

    fn resolve_node_identity_bases(&self, unit: &mut LoadedUnit, module_id: NodeId, node_id: NodeId, errors: &mut Vec<CompileError>) {
        let span = unit.arena.get(node_id).span;
        let mut bases = match &mut unit.arena.get_mut(node_id).kind {
            NodeKind::Identity(d) => std::mem::take(&mut d.bases),
            _ => return,
        };
        for base in &mut bases {
            if base.resolved.is_resolved() {
                continue;
            }
            match target_module(&unit.arena, module_id, base.prefix.as_ref(), span).and_then(|m| {
                find_named(&unit.arena, m, &base.local_name, |k| matches!(k, NodeKind::Identity(_)))
                    .ok_or_else(|| CompileError::UnresolvedReference {
                        span,
                        name: base.local_name.to_string(),
                    })
            }) {
                Ok(target) => base.resolved.set(ResolveStatus::Resolved, target),
                Err(e) => errors.push(e),
            }
        }
        if let NodeKind::Identity(d) = &mut unit.arena.get_mut(node_id).kind {
            d.bases = bases;
        }
    }

    fn resolve_node_if_features(&self, unit: &mut LoadedUnit, module_id: NodeId, node_id: NodeId, errors: &mut Vec<CompileError>) {
        let span = unit.arena.get(node_id).span;
        let mut if_features = std::mem::take(&mut unit.arena.get_mut(node_id).common.if_features);
        for iff in &mut if_features {
            for target in &mut iff.referenced {
                if target.resolved.is_resolved() {
                    continue;
                }
                match target_module(&unit.arena, module_id, target.prefix.as_ref(), span).and_then(|m| {
                    find_named(&unit.arena, m, &target.local_name, |k| matches!(k, NodeKind::Feature(_)))
                        .ok_or_else(|| CompileError::UnresolvedReference {
                            span,
                            name: target.local_name.to_string(),
                        })
                }) {
                    Ok(id) => target.resolved.set(ResolveStatus::Resolved, id),
                    Err(e) => errors.push(e),
                }
            }
        }
        unit.arena.get_mut(node_id).common.if_features = if_features;
    }

    // ---- `uses` expansion -----------------------------------------------

    fn expand_uses(&self, unit: &mut LoadedUnit, modules: &[NodeId], errors: &mut Vec<CompileError>) {
        let pending: Vec<NodeId> = modules
            .iter()
            .flat_map(|&m| subtree_nodes(&unit.arena, m))
            .filter(|&id| matches!(&unit.arena.get(id).kind, NodeKind::Uses(_)))
            .collect();

        let stuck = Worklist::new(pending).drain_to_fixed_point(|&uses_id| {
            let still_pending = matches!(&unit.arena.get(uses_id).kind, NodeKind::Uses(d) if !d.resolved_grouping.is_resolved());
            if !still_pending {
                return true;
            }
            match self.try_expand_uses(unit, uses_id, errors) {
                UsesOutcome::Expanded | UsesOutcome::Failed => true,
                UsesOutcome::Deferred => false,
            }
        });

        for uses_id in stuck {
            errors.push(CompileError::CyclicReference {
                span: unit.arena.get(uses_id).span,
                cycle: "uses expansion did not terminate (cyclic grouping reference)".into(),
            });
        }
    }

    fn try_expand_uses(&self, unit: &mut LoadedUnit, uses_id: NodeId, errors: &mut Vec<CompileError>) -> UsesOutcome {
        let span = unit.arena.get(uses_id).span;
        let use_site_module = owning_module(&unit.arena, uses_id);
        let (grouping_prefix, grouping_name, refines, inline_augments) = match &unit.arena.get(uses_id).kind {
            NodeKind::Uses(d) => (
                d.grouping_prefix.clone(),
                d.grouping_name.clone(),
                d.refines.clone(),
                d.inline_augments.clone(),
            ),
            _ => return UsesOutcome::Failed,
        };

        let grouping_id = match target_module_opt(&unit.arena, use_site_module, grouping_prefix.as_ref())
            .and_then(|m| find_named(&unit.arena, m, &grouping_name, |k| matches!(k, NodeKind::Grouping)))
        {
            Some(id) => id,
            None => {
                errors.push(CompileError::UnresolvedReference {
                    span,
                    name: grouping_name.to_string(),
                });
                return UsesOutcome::Failed;
            }
        };

        let has_pending_nested_uses = subtree_nodes(&unit.arena, grouping_id)
            .iter()
            .any(|&id| matches!(&unit.arena.get(id).kind, NodeKind::Uses(d) if !d.resolved_grouping.is_resolved()));
        if has_pending_nested_uses {
            return UsesOutcome::Deferred;
        }

        let clone_root = unit.arena.clone_subtree(grouping_id);
        let parent = match unit.arena.get(uses_id).parent {
            Some(p) => p,
            None => return UsesOutcome::Failed,
        };
        let prev = unit.arena.get(uses_id).prev_sibling;

        let clone_children: Vec<NodeId> = unit.arena.children(clone_root).collect();
        let mut after = prev;
        for child in &clone_children {
            unit.arena.unlink(*child);
            unit.arena.insert_after(parent, after, *child);
            after = Some(*child);
        }

        for refine in &refines {
            self.apply_refine_at_path(unit, clone_root, refine, span, errors);
        }

        for augment_stmt in &inline_augments {
            let file = unit.arena.get(uses_id).span.file;
            let (augment_id, mut augment_errors) = lower_statement_as_augment(file, augment_stmt, &mut unit.arena);
            errors.append(&mut augment_errors);
            let target_path = match &unit.arena.get(augment_id).kind {
                NodeKind::Augment(d) => d.target_path.clone(),
                _ => continue,
            };
            match resolve_relative_path(&unit.arena, clone_root, &target_path) {
                Some(target) => {
                    let children: Vec<NodeId> = unit.arena.children(augment_id).collect();
                    for child in children {
                        unit.arena.unlink(child);
                        unit.arena.append_child(target, child);
                    }
                }
                None => errors.push(CompileError::IllegalAugmentTarget {
                    span,
                    target_kind: "unresolved relative augment target inside 'uses'".into(),
                }),
            }
        }

        if let NodeKind::Uses(d) = &mut unit.arena.get_mut(uses_id).kind {
            d.resolved_grouping.set(ResolveStatus::Resolved, grouping_id);
        }
        unit.arena.unlink(uses_id);
        UsesOutcome::Expanded
    }

    fn apply_refine_at_path(&self, unit: &mut LoadedUnit, clone_root: NodeId, refine: &Refine, span: Span, errors: &mut Vec<CompileError>) {
        let mut cur = clone_root;
        let mut ok = true;
        for segment in &refine.path {
            match find_child_by_name(&unit.arena, cur, segment) {
                Some(next) => cur = next,
                None => {
                    ok = false;
                    break;
                }
            }
        }
        if ok && cur != clone_root {
            apply_refine(&mut unit.arena, cur, refine);
        } else {
            errors.push(CompileError::UnresolvedReference {
                span,
                name: refine.path.iter().map(|n| n.as_str()).collect::<Vec<_>>().join("/"),
            });
        }
    }

    // ---- `augment` application -------------------------------------------

    fn apply_augments(&self, unit: &mut LoadedUnit, modules: &[NodeId], errors: &mut Vec<CompileError>) {
        for &module_id in modules {
            let augment_ids: Vec<NodeId> = subtree_nodes(&unit.arena, module_id)
                .into_iter()
                .filter(|&id| matches!(unit.arena.get(id).kind, NodeKind::Augment(_)))
                .collect();
            for augment_id in augment_ids {
                self.apply_one_augment(unit, module_id, augment_id, errors);
            }
        }
    }

    fn apply_one_augment(&self, unit: &mut LoadedUnit, use_site_module: NodeId, augment_id: NodeId, errors: &mut Vec<CompileError>) {
        let span = unit.arena.get(augment_id).span;
        let (target_path, absolute) = match &unit.arena.get(augment_id).kind {
            NodeKind::Augment(d) => (d.target_path.clone(), d.absolute),
            _ => return,
        };
        if !absolute {
            errors.push(CompileError::IllegalAugmentTarget {
                span,
                target_kind: "relative augment path outside 'uses'".into(),
            });
            return;
        }
        let target = match self.resolve_absolute_path(unit, use_site_module, &target_path) {
            Some(t) => t,
            None => {
                errors.push(CompileError::UnresolvedReference {
                    span,
                    name: describe_path(&target_path),
                });
                return;
            }
        };
        if unit.arena.get(target).kind.is_terminal_data() {
            errors.push(CompileError::IllegalAugmentTarget {
                span,
                target_kind: unit.arena.get(target).kind.name_tag().into(),
            });
            return;
        }
        let module_name = match &unit.arena.get(use_site_module).kind {
            NodeKind::Module(d) | NodeKind::Submodule(d) => d.prefix.clone(),
            _ => None,
        };
        let children: Vec<NodeId> = unit.arena.children(augment_id).collect();
        for child in children {
            unit.arena.unlink(child);
            unit.arena.append_child(target, child);
            if let Some(name) = &module_name {
                unit.arena.get_mut(child).augment_source = Some(name.clone());
            }
        }
        if let Some(name) = module_name {
            unit.arena.get_mut(target).augmented_by.push(name);
        }
    }

    fn resolve_absolute_path(&self, unit: &LoadedUnit, use_site_module: NodeId, segments: &[AugmentTargetSegment]) -> Option<NodeId> {
        let (first, rest) = segments.split_first()?;
        let AugmentTargetSegment::Child { prefix, name } = first;
        let root_module = target_module_opt(&unit.arena, use_site_module, prefix.as_ref())?;
        let mut cur = find_child_by_name(&unit.arena, root_module, name)?;
        for segment in rest {
            let AugmentTargetSegment::Child { name, .. } = segment;
            cur = find_child_by_name(&unit.arena, cur, name)?;
        }
        Some(cur)
    }

    // ---- namespace assignment + collision detection ----------------------

    fn finalize_namespaces_and_collisions(&self, unit: &mut LoadedUnit, modules: &[NodeId], errors: &mut Vec<CompileError>) {
        for &module_id in modules {
            if !matches!(unit.arena.get(module_id).kind, NodeKind::Module(_)) {
                continue; // submodules were merged into their owning module already
            }
            let namespace = match &unit.arena.get(module_id).kind {
                NodeKind::Module(d) => d.namespace_uri.clone(),
                _ => None,
            };
            self.assign_namespace_and_register(unit, module_id, namespace, errors);
        }
    }

    fn assign_namespace_and_register(&self, unit: &mut LoadedUnit, node_id: NodeId, inherited_ns: Option<Name>, errors: &mut Vec<CompileError>) {
        let effective_ns = self.effective_namespace(unit, node_id, inherited_ns);
        unit.arena.get_mut(node_id).namespace = effective_ns.clone();

        let children: Vec<NodeId> = unit.arena.children(node_id).collect();
        for child in children {
            // Settle `child`'s own namespace first: an augment-spliced
            // child overrides `effective_ns` with its contributing
            // module's namespace, and that override must never leak back
            // onto `node_id` or onto `child`'s pre-existing siblings.
            self.assign_namespace_and_register(unit, child, effective_ns.clone(), errors);

            let name = unit.arena.get(child).name.clone();
            let ns = unit.arena.get(child).namespace.clone();
            let registrable = matches!(
                unit.arena.get(child).kind,
                NodeKind::Container(_)
                    | NodeKind::List(_)
                    | NodeKind::Choice(_)
                    | NodeKind::Case
                    | NodeKind::Leaf(_)
                    | NodeKind::LeafList(_)
                    | NodeKind::Anyxml
                    | NodeKind::Anydata
            );
            if registrable {
                if let (Some(name), Some(ns)) = (&name, &ns) {
                    if unit.arena.detect_colliding_child(node_id, name, ns).is_some() {
                        // Report the collision against the logical scope a
                        // child's name is checked within, not the immediate
                        // parent: a `case`'s children collide across the
                        // whole owning `choice`, so a reader expects the
                        // choice's name, not the one specific case.
                        let scope = unit.arena.collision_scope(node_id);
                        errors.push(CompileError::Collision {
                            span: unit.arena.get(child).span,
                            name: name.to_string(),
                            parent: unit
                                .arena
                                .get(scope)
                                .name
                                .clone()
                                .map(|n| n.to_string())
                                .unwrap_or_else(|| "module".into()),
                        });
                    } else {
                        unit.arena.get_mut(node_id).child_ids.insert((name.clone(), ns.clone()), child);
                    }
                }
            }
        }
    }

    /// A node's own namespace: the module that contributed it via
    /// `augment`, if any, else whatever its parent passed down.
    fn effective_namespace(&self, unit: &LoadedUnit, node_id: NodeId, inherited_ns: Option<Name>) -> Option<Name> {
        unit.arena
            .get(node_id)
            .augment_source
            .clone()
            .and_then(|name| self.namespace_of_module_named(unit, &name))
            .or(inherited_ns)
    }

    fn namespace_of_module_named(&self, unit: &LoadedUnit, name: &Name) -> Option<Name> {
        let id = *unit.by_name.get(name)?.first()?;
        match &unit.arena.get(id).kind {
            NodeKind::Module(d) => d.namespace_uri.clone(),
            _ => None,
        }
    }

    // ---- leafref path presence check --------------------------------------

    fn validate_paths(&self, unit: &mut LoadedUnit, modules: &[NodeId], errors: &mut Vec<CompileError>) {
        for &module_id in modules {
            for node_id in subtree_nodes(&unit.arena, module_id) {
                let type_ref = match &unit.arena.get(node_id).kind {
                    NodeKind::Leaf(d) => &d.type_ref,
                    NodeKind::LeafList(d) => &d.type_ref,
                    NodeKind::Typedef(d) => &d.type_ref,
                    _ => continue,
                };
                if let TypeRef::Builtin(BuiltinType::Leafref, restrictions) = type_ref {
                    if restrictions.path.is_none() {
                        errors.push(CompileError::MissingHolder {
                            span: unit.arena.get(node_id).span,
                            message: "'leafref' type requires a 'path' substatement".into(),
                        });
                    }
                }
            }
        }
    }
}

fn subtree_nodes(arena: &SchemaArena, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        out.push(id);
        stack.extend(arena.children(id));
    }
    out
}

fn owning_module(arena: &SchemaArena, mut node: NodeId) -> NodeId {
    loop {
        if matches!(arena.get(node).kind, NodeKind::Module(_) | NodeKind::Submodule(_)) {
            return node;
        }
        match arena.get(node).parent {
            Some(parent) => node = parent,
            None => return node,
        }
    }
}

fn find_named(arena: &SchemaArena, root: NodeId, name: &Name, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
    subtree_nodes(arena, root)
        .into_iter()
        .find(|&id| pred(&arena.get(id).kind) && arena.get(id).name.as_ref() == Some(name))
}

fn find_child_by_name(arena: &SchemaArena, parent: NodeId, name: &Name) -> Option<NodeId> {
    for child in arena.children(parent) {
        if arena.get(child).name.as_ref() == Some(name) {
            return Some(child);
        }
        if matches!(arena.get(child).kind, NodeKind::Case) {
            if let Some(found) = find_child_by_name(arena, child, name) {
                return Some(found);
            }
        }
    }
    None
}

fn resolve_relative_path(arena: &SchemaArena, root: NodeId, segments: &[AugmentTargetSegment]) -> Option<NodeId> {
    let mut cur = root;
    for segment in segments {
        let AugmentTargetSegment::Child { name, .. } = segment;
        cur = find_child_by_name(arena, cur, name)?;
    }
    Some(cur)
}

fn describe_path(segments: &[AugmentTargetSegment]) -> String {
    segments
        .iter()
        .map(|AugmentTargetSegment::Child { name, .. }| name.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Which module's identifier space a `prefix`-qualified reference from
/// `local_module` should be looked up in: `local_module` itself for no
/// prefix or the module's own prefix, the imported module otherwise.
fn target_module_opt(arena: &SchemaArena, local_module: NodeId, prefix: Option<&Name>) -> Option<NodeId> {
    let own_prefix = match &arena.get(local_module).kind {
        NodeKind::Module(d) | NodeKind::Submodule(d) => d.prefix.as_ref(),
        _ => None,
    };
    match prefix {
        None => Some(local_module),
        Some(p) if Some(p) == own_prefix => Some(local_module),
        Some(p) => {
            let imports = match &arena.get(local_module).kind {
                NodeKind::Module(d) | NodeKind::Submodule(d) => &d.imports,
                _ => return None,
            };
            imports.iter().find(|i| &i.prefix == p).and_then(|i| i.resolved_module.value().copied())
        }
    }
}

fn target_module(arena: &SchemaArena, local_module: NodeId, prefix: Option<&Name>, span: Span) -> Result<NodeId, CompileError> {
    target_module_opt(arena, local_module, prefix).ok_or_else(|| CompileError::MissingImport {
        span,
        prefix: prefix.map(|p| p.to_string()).unwrap_or_default(),
    })
}

fn apply_refine(arena: &mut SchemaArena, node_id: NodeId, refine: &Refine) {
    if let Some(d) = &refine.description {
        arena.get_mut(node_id).common.description = Some(d.clone());
    }
    if let Some(r) = &refine.reference {
        arena.get_mut(node_id).common.reference = Some(r.clone());
    }
    match &mut arena.get_mut(node_id).kind {
        NodeKind::Leaf(data) => {
            if let Some(def) = refine.default.as_ref().and_then(|d| d.first()) {
                data.default = Some(def.clone());
            }
            if let Some(m) = refine.mandatory {
                data.mandatory = m;
            }
            if let Some(c) = refine.config {
                data.config = Some(c);
            }
        }
        NodeKind::LeafList(data) => {
            if let Some(def) = &refine.default {
                data.default = def.clone();
            }
            if let Some(c) = refine.config {
                data.config = Some(c);
            }
            if let Some(mn) = refine.min_elements {
                data.min_elements = Some(mn);
            }
            if let Some(mx) = refine.max_elements {
                data.max_elements = Some(mx);
            }
        }
        NodeKind::Container(data) => {
            if let Some(p) = &refine.presence {
                data.presence = Some(p.clone());
            }
            if let Some(c) = refine.config {
                data.config = Some(c);
            }
        }
        NodeKind::List(data) => {
            if let Some(c) = refine.config {
                data.config = Some(c);
            }
            if let Some(mn) = refine.min_elements {
                data.min_elements = Some(mn);
            }
            if let Some(mx) = refine.max_elements {
                data.max_elements = Some(mx);
            }
        }
        NodeKind::Choice(data) => {
            if let Some(m) = refine.mandatory {
                data.mandatory = m;
            }
        }
        _ => {}
    }
    if !refine.musts.is_empty() {
        arena.get_mut(node_id).common.musts.extend(refine.musts.iter().cloned());
    }
}

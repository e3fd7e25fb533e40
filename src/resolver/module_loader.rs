//! Turns a set of entry-point file paths into one [`LoadedUnit`]: every
//! transitively `import`ed module and `include`d submodule parsed and
//! lowered, imports bound to the module they resolved to, and submodule
//! bodies merged into their owning module.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::base::{FileId, Name};
use crate::config::{CompileConfig, RevisionPolicy};
use crate::hir::{lower_file, CompileError, NodeId, NodeKind, ResolveStatus, SchemaArena};

pub struct LoadedUnit {
    pub arena: SchemaArena,
    /// The module/submodule node for each entry-point file, in the
    /// order the paths were given to [`ModuleLoader::load`].
    pub modules: Vec<NodeId>,
    pub file_paths: Vec<PathBuf>,
    /// Every module/submodule loaded (entry points, imports, includes),
    /// keyed by name, in case more than one revision was visible.
    pub by_name: FxHashMap<Name, Vec<NodeId>>,
}

impl LoadedUnit {
    /// Every loaded module/submodule, ordered so a module's imports
    /// always precede it (a dependency-first, i.e. reverse-topological,
    /// walk of the import graph). Resolution phases that look things up
    /// across an import boundary — type/grouping lookup, augment target
    /// resolution, namespace finalization — rely on the imported module
    /// already being settled, so they drive themselves from this order
    /// instead of `by_name`'s arbitrary hash order.
    pub fn modules_in_dependency_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.by_name.len());
        let mut visited = FxHashSet::default();
        let mut on_stack = FxHashSet::default();

        let mut roots: Vec<NodeId> = self.by_name.values().flatten().copied().collect();
        roots.sort();
        for id in roots {
            visit_module(id, &self.arena, &mut visited, &mut on_stack, &mut order);
        }
        order
    }
}

fn visit_module(
    id: NodeId,
    arena: &SchemaArena,
    visited: &mut FxHashSet<NodeId>,
    on_stack: &mut FxHashSet<NodeId>,
    order: &mut Vec<NodeId>,
) {
    if visited.contains(&id) || on_stack.contains(&id) {
        return;
    }
    on_stack.insert(id);
    let imports: Vec<NodeId> = match &arena.get(id).kind {
        NodeKind::Module(d) | NodeKind::Submodule(d) => {
            d.imports.iter().filter_map(|i| i.resolved_module.value().copied()).collect()
        }
        _ => Vec::new(),
    };
    for dep in imports {
        visit_module(dep, arena, visited, on_stack, order);
    }
    on_stack.remove(&id);
    visited.insert(id);
    order.push(id);
}

pub struct ModuleLoader<'a> {
    config: &'a CompileConfig,
    arena: SchemaArena,
    file_paths: Vec<PathBuf>,
    by_name: FxHashMap<Name, Vec<NodeId>>,
    loading: Vec<Name>,
}

impl<'a> ModuleLoader<'a> {
    pub fn new(config: &'a CompileConfig) -> Self {
        Self {
            config,
            arena: SchemaArena::new(),
            file_paths: Vec::new(),
            by_name: FxHashMap::default(),
            loading: Vec::new(),
        }
    }

    pub fn load(mut self, entry_paths: &[PathBuf]) -> Result<LoadedUnit, Vec<CompileError>> {
        // Entry paths are known up front and share no mutable state until
        // lowered, so reading them off disk is one independent task per
        // path; only the subsequent lowering into the shared arena is
        // sequential.
        let entry_texts: Vec<(PathBuf, String)> = entry_paths
            .par_iter()
            .map(|path| read_module_text(path).map(|text| (path.clone(), text)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut modules = Vec::with_capacity(entry_texts.len());
        for (path, text) in entry_texts {
            let id = self.load_path_with_text(&path, text)?;
            modules.push(id);
        }
        Ok(LoadedUnit {
            arena: self.arena,
            modules,
            file_paths: self.file_paths,
            by_name: self.by_name,
        })
    }

    fn load_path(&mut self, path: &Path) -> Result<NodeId, Vec<CompileError>> {
        let text = read_module_text(path)?;
        self.load_path_with_text(path, text)
    }

    fn load_path_with_text(&mut self, path: &Path, text: String) -> Result<NodeId, Vec<CompileError>> {
        let file = FileId::new(self.file_paths.len() as u32);
        self.file_paths.push(path.to_path_buf());

        let root = lower_file(file, &text, &mut self.arena)?;
        let id = root.root;

        let name = self.arena.get(id).name.clone().unwrap_or_else(|| Name::new(""));
        if self.loading.contains(&name) {
            return Err(vec![CompileError::CyclicReference {
                span: self.arena.get(id).span,
                cycle: self
                    .loading
                    .iter()
                    .map(|n| n.as_str())
                    .chain(std::iter::once(name.as_str()))
                    .collect::<Vec<_>>()
                    .join(" -> "),
            }]);
        }
        self.loading.push(name.clone());

        self.process_includes(path, id)?;
        self.process_imports(path, id)?;

        self.loading.pop();
        self.by_name.entry(name).or_default().push(id);
        Ok(id)
    }

    fn process_includes(&mut self, base_path: &Path, module_id: NodeId) -> Result<(), Vec<CompileError>> {
        let includes = match &self.arena.get(module_id).kind {
            NodeKind::Module(data) | NodeKind::Submodule(data) => data.includes.clone(),
            _ => return Ok(()),
        };
        for include in includes {
            let sub_path = self.resolve_file(base_path, include.submodule.as_str(), include.revision_date.as_deref())?;
            debug!(submodule = %include.submodule, path = %sub_path.display(), "loading included submodule");
            let sub_id = self.load_path(&sub_path)?;

            let children: Vec<NodeId> = self.arena.children(sub_id).collect();
            for child in children {
                self.arena.unlink(child);
                self.arena.append_child(module_id, child);
            }

            let sub_data = match &self.arena.get(sub_id).kind {
                NodeKind::Submodule(data) => data.clone(),
                _ => continue,
            };
            if let NodeKind::Module(data) | NodeKind::Submodule(data) = &mut self.arena.get_mut(module_id).kind {
                for rev in sub_data.revisions {
                    if !data.revisions.iter().any(|r| r.date == rev.date) {
                        data.revisions.push(rev);
                    }
                }
            }

            let inc = match &mut self.arena.get_mut(module_id).kind {
                NodeKind::Module(data) | NodeKind::Submodule(data) => {
                    data.includes.iter_mut().find(|i| i.submodule == include.submodule)
                }
                _ => None,
            };
            if let Some(inc) = inc {
                inc.resolved.set(ResolveStatus::Linked, sub_id);
            }
        }
        Ok(())
    }

    fn process_imports(&mut self, base_path: &Path, module_id: NodeId) -> Result<(), Vec<CompileError>> {
        let imports = match &self.arena.get(module_id).kind {
            NodeKind::Module(data) | NodeKind::Submodule(data) => data.imports.clone(),
            _ => return Ok(()),
        };
        for import in imports {
            let existing = self
                .by_name
                .get(&import.module)
                .and_then(|candidates| self.pick_revision(candidates, import.revision_date.as_deref()));

            let target = match existing {
                Some(id) => id,
                None => {
                    let path = self.resolve_file(base_path, import.module.as_str(), import.revision_date.as_deref())?;
                    debug!(module = %import.module, path = %path.display(), "loading imported module");
                    self.load_path(&path)?
                }
            };

            if let NodeKind::Module(data) | NodeKind::Submodule(data) = &mut self.arena.get_mut(module_id).kind {
                if let Some(imp) = data.imports.iter_mut().find(|i| i.module == import.module && i.prefix == import.prefix) {
                    imp.resolved_module.set(ResolveStatus::Linked, target);
                }
            }
        }
        Ok(())
    }

    fn pick_revision(&self, candidates: &[NodeId], wanted: Option<&str>) -> Option<NodeId> {
        if let Some(wanted) = wanted {
            return candidates
                .iter()
                .copied()
                .find(|&id| self.revision_of(id).as_deref() == Some(wanted));
        }
        match self.config.revision_policy {
            RevisionPolicy::Strict if candidates.len() == 1 => Some(candidates[0]),
            RevisionPolicy::Strict => None,
            RevisionPolicy::Latest => candidates
                .iter()
                .copied()
                .max_by_key(|&id| self.revision_of(id).unwrap_or_default()),
        }
    }

    fn revision_of(&self, id: NodeId) -> Option<String> {
        match &self.arena.get(id).kind {
            NodeKind::Module(data) | NodeKind::Submodule(data) => data.revisions.first().map(|r| r.date.clone()),
            _ => None,
        }
    }

    /// Search `config.search_dirs` for `<name>.yang` or, if a revision
    /// was requested, `<name>@<revision>.yang`.
    fn resolve_file(&self, base_path: &Path, name: &str, revision: Option<&str>) -> Result<PathBuf, Vec<CompileError>> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        if let Some(parent) = base_path.parent() {
            dirs.push(parent.to_path_buf());
        }
        dirs.extend(self.config.search_dirs.iter().cloned());

        let mut best: Option<(Option<String>, PathBuf)> = None;
        for dir in &dirs {
            let Ok(entries) = fs::read_dir(dir) else { continue };
            for entry in entries.flatten() {
                let file_name = entry.file_name();
                let Some(file_name) = file_name.to_str() else { continue };
                let Some(stem) = file_name.strip_suffix(".yang") else { continue };
                let (stem_name, stem_rev) = match stem.split_once('@') {
                    Some((n, r)) => (n, Some(r.to_string())),
                    None => (stem, None),
                };
                if stem_name != name {
                    continue;
                }
                if let Some(wanted) = revision {
                    if stem_rev.as_deref() == Some(wanted) {
                        return Ok(entry.path());
                    }
                    continue;
                }
                match (&best, &stem_rev) {
                    (None, _) => best = Some((stem_rev, entry.path())),
                    (Some((cur, _)), new) if new > cur => best = Some((stem_rev, entry.path())),
                    _ => {}
                }
            }
        }
        best.map(|(_, path)| path).ok_or_else(|| {
            vec![CompileError::Internal {
                span: None,
                message: format!("no file for module or submodule '{name}' found on the search path"),
            }]
        })
    }
}

fn read_module_text(path: &Path) -> Result<String, Vec<CompileError>> {
    fs::read_to_string(path).map_err(|e| {
        vec![CompileError::Internal {
            span: None,
            message: format!("cannot read '{}': {e}", path.display()),
        }]
    })
}

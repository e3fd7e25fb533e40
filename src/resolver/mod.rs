//! Turns entry-point YANG files into a fully resolved [`LoadedUnit`]:
//! load + bind imports/includes ([`module_loader`]), then expand
//! `uses`, apply `augment`, assign namespaces, and check collisions
//! ([`resolve`]).

mod module_loader;
mod resolve;
mod worklist;

use std::path::PathBuf;

pub use module_loader::{LoadedUnit, ModuleLoader};
pub use resolve::Resolver;

use crate::config::CompileConfig;
use crate::hir::CompileError;

/// Loads and resolves `entry_paths` under `config` in one call.
pub fn compile(config: &CompileConfig, entry_paths: &[PathBuf]) -> Result<LoadedUnit, Vec<CompileError>> {
    let mut unit = ModuleLoader::new(config).load(entry_paths)?;
    Resolver::new(config).resolve(&mut unit)?;
    Ok(unit)
}

//! Compile-time configuration, threaded explicitly through the loader
//! and resolver rather than held in any global/thread-local state.

use std::path::PathBuf;

/// How an `import`'s optional `revision-date` is honored when more than
/// one revision of a module is visible on the search path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevisionPolicy {
    /// An import without a `revision-date` picks the lexicographically
    /// latest revision visible. The default: a plain `import m;` binds
    /// to the newest `m` found on the search path.
    #[default]
    Latest,
    /// An import without a `revision-date` fails unless exactly one
    /// revision of the module is visible.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    Verbose,
    Debug,
}

#[derive(Debug, Clone)]
pub struct CompileConfig {
    pub search_dirs: Vec<PathBuf>,
    pub revision_policy: RevisionPolicy,
    pub verbosity: Verbosity,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            search_dirs: Vec::new(),
            revision_policy: RevisionPolicy::default(),
            verbosity: Verbosity::default(),
        }
    }
}

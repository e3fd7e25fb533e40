//! End-to-end loader/resolver tests: `uses`/`refine` expansion,
//! cross-module `augment`, choice/case collision detection, and
//! revision-based import resolution, each against modules written to a
//! temporary directory and compiled with [`yangc::resolver::compile`].

pub mod tests_augment;
pub mod tests_collision;
pub mod tests_revision_resolution;
pub mod tests_uses_refine;

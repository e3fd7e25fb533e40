//! YANG (RFC 6020/7950) schema compiler front end: lexer/parser, schema
//! tree, linker/resolver, and a serializer-facing path addressing
//! scheme, with no IDE-incremental-recomputation layer — each
//! invocation compiles one set of entry modules start to finish.

pub mod base;
pub mod config;
pub mod hir;
pub mod parser;
pub mod resolver;
pub mod serializer;

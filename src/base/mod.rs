//! Foundation types shared across the whole compiler.
//!
//! - [`FileId`] — interned file identifiers
//! - [`TextRange`], [`TextSize`] — byte-offset source positions
//! - [`LineCol`], [`LineIndex`] — line/column conversion for diagnostics
//! - [`Position`], [`Span`] — positions attached to schema nodes and errors
//! - [`Name`], [`Interner`] — string interning for identifiers/namespaces
//!
//! This module has no dependencies on any other module in the crate.

mod file_id;
mod intern;
mod position;
mod span;

pub use file_id::FileId;
pub use intern::{Interner, Name};
pub use position::{Position, Span};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

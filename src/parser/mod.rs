//! Lexer/parser front end: source text → lossless CST → typed AST.
//!
//! ```text
//! Source text
//!     |
//!     v
//! Lexer (logos) -> token stream
//!     |
//!     v
//! Parser -> rowan GreenNode (CST, one STATEMENT kind for every construct)
//!     |
//!     v
//! ast::Statement / ast::Root -> typed view used by hir::lower
//! ```

pub mod ast;
pub mod keywords;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;
mod syntax_kind;

pub use ast::{AstNode, Root, Statement};
pub use lexer::{tokenize, Lexer, Token};
pub use parser::{kind_to_name, parse_module, Parse, SyntaxError};
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, YangLanguage};

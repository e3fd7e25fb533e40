//! Typed AST layer — thin wrappers over the rowan `SyntaxNode` CST.
//!
//! Mirrors the rust-analyzer-style split between a lossless CST and a
//! typed view over it: the CST has exactly one node kind (`STATEMENT`),
//! so the single [`Statement`] wrapper stands in for what in other
//! grammars would be dozens of per-construct AST types.

use super::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};
use rowan::TextRange;

/// Common trait for typed wrappers over a `SyntaxNode`.
pub trait AstNode {
    fn cast(syntax: SyntaxNode) -> Option<Self>
    where
        Self: Sized;
    fn syntax(&self) -> &SyntaxNode;
}

/// A parsed `keyword [argument] (';' | '{' statement* '}')` construct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    syntax: SyntaxNode,
}

impl AstNode for Statement {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::STATEMENT {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Statement {
    pub fn range(&self) -> TextRange {
        self.syntax.text_range()
    }

    /// The statement's keyword tokens: `(prefix, local)` — `prefix` is
    /// `Some` only for an extension statement (`acme:my-ext`).
    fn keyword_tokens(&self) -> (Option<SyntaxToken>, SyntaxToken) {
        let mut idents = self
            .syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::COLON));
        let first = idents.next().expect("statement always has a keyword");
        match idents.next() {
            Some(colon) if colon.kind() == SyntaxKind::COLON => {
                let local = idents.next().expect("prefixed keyword needs a local part");
                (Some(first), local)
            }
            _ => (None, first),
        }
    }

    /// The local (unprefixed) keyword text, e.g. `"leaf"`, `"my-ext"`.
    pub fn keyword(&self) -> String {
        self.keyword_tokens().1.text().to_string()
    }

    /// The extension prefix, if this is a `prefix:keyword` statement.
    pub fn keyword_prefix(&self) -> Option<String> {
        self.keyword_tokens().0.map(|t| t.text().to_string())
    }

    /// The decoded argument string: quotes stripped, escapes resolved,
    /// `+`-concatenated parts joined, per RFC 7950 §6.1.3.
    pub fn argument(&self) -> Option<String> {
        let arg_node = self
            .syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::ARGUMENT)?;
        let parts: Vec<String> = arg_node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| matches!(t.kind(), SyntaxKind::STRING | SyntaxKind::IDENT))
            .map(|t| decode_argument_part(t.text()))
            .collect();
        Some(parts.join(""))
    }

    pub fn argument_range(&self) -> Option<TextRange> {
        self.syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::ARGUMENT)
            .map(|n| n.text_range())
    }

    /// Nested statements (the body, if this statement has a `{ }` block).
    pub fn children(&self) -> impl Iterator<Item = Statement> + '_ {
        self.syntax.children().filter_map(Statement::cast)
    }

    /// First nested statement whose keyword matches.
    pub fn child(&self, keyword: &str) -> Option<Statement> {
        self.children().find(|s| s.keyword_prefix().is_none() && s.keyword() == keyword)
    }

    pub fn children_matching<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = Statement> + 'a {
        self.children()
            .filter(move |s| s.keyword_prefix().is_none() && s.keyword() == keyword)
    }
}

/// Decode one quoted/unquoted argument fragment.
fn decode_argument_part(raw: &str) -> String {
    let inner = if (raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2)
        || (raw.starts_with('\'') && raw.ends_with('\'') && raw.len() >= 2)
    {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };
    if !raw.starts_with('"') {
        // Single-quoted and unquoted strings have no escape processing.
        return strip_continuation_indent(inner);
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    strip_continuation_indent(&out)
}

/// Per RFC 7950 §6.1.3: when a double-quoted string spans multiple
/// lines, leading whitespace on continuation lines up to the indentation
/// of the line containing the opening quote is trimmed.
fn strip_continuation_indent(s: &str) -> String {
    if !s.contains('\n') {
        return s.to_string();
    }
    let mut lines = s.split('\n');
    let first = lines.next().unwrap_or("");
    let rest: Vec<&str> = lines.collect();
    let common_indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min();
    let mut out = String::from(first);
    for line in rest {
        out.push('\n');
        match common_indent {
            Some(indent) if line.len() >= indent => out.push_str(&line[indent..]),
            _ => out.push_str(line.trim_start_matches([' ', '\t'])),
        }
    }
    out
}

/// The root node: a sequence of top-level statements (ordinarily one
/// `module` or `submodule`).
#[derive(Debug, Clone)]
pub struct Root {
    syntax: SyntaxNode,
}

impl AstNode for Root {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::ROOT {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Root {
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        self.syntax.children().filter_map(Statement::cast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_module;

    #[test]
    fn decodes_quoted_argument_with_escapes() {
        let parse = parse_module(r#"description "line one\nline two";"#);
        let root = Root::cast(parse.syntax()).unwrap();
        let stmt = root.statements().next().unwrap();
        assert_eq!(stmt.argument().unwrap(), "line one\nline two");
    }

    #[test]
    fn joins_plus_concatenated_strings() {
        let parse = parse_module(r#"description "a" + "b";"#);
        let root = Root::cast(parse.syntax()).unwrap();
        let stmt = root.statements().next().unwrap();
        assert_eq!(stmt.argument().unwrap(), "ab");
    }

    #[test]
    fn extension_statement_has_prefix() {
        let parse = parse_module("acme:my-ext foo;");
        let root = Root::cast(parse.syntax()).unwrap();
        let stmt = root.statements().next().unwrap();
        assert_eq!(stmt.keyword_prefix().as_deref(), Some("acme"));
        assert_eq!(stmt.keyword(), "my-ext");
    }
}

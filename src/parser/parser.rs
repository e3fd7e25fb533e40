//! Recursive-descent parser for YANG source text.
//!
//! Builds a rowan `GreenNode` tree directly from the token stream. The
//! grammar is uniform (RFC 7950 §6.3): a `statement` is a keyword, an
//! optional argument, and either `;` or a `{ statement* }` block. All
//! nesting/kind-specific meaning (is this a `leaf`, a `container`, an
//! extension statement?) is decided later, by `hir::lower`.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result: the lossless green tree plus any syntax errors found.
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with its byte range in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse a YANG module/submodule source file into a CST.
pub fn parse_module(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, input);
    parser.parse_root();
    parser.finish()
}

struct Parser<'a, 'b> {
    tokens: &'b [Token<'a>],
    pos: usize,
    text_len: u32,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a, 'b> Parser<'a, 'b> {
    fn new(tokens: &'b [Token<'a>], source: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            text_len: source.len() as u32,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn current(&self) -> Option<SyntaxKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn current_non_trivia(&self) -> Option<SyntaxKind> {
        let mut i = self.pos;
        while let Some(t) = self.tokens.get(i) {
            if !t.kind.is_trivia() {
                return Some(t.kind);
            }
            i += 1;
        }
        None
    }

    fn current_range(&self) -> TextRange {
        match self.tokens.get(self.pos) {
            Some(t) => TextRange::new(t.offset, t.offset + TextSize::of(t.text)),
            None => TextRange::empty(TextSize::from(self.text_len)),
        }
    }

    /// Consume the raw next token (including trivia) into the tree.
    fn bump_raw(&mut self) {
        let t = &self.tokens[self.pos];
        self.builder.token(rowan::SyntaxKind(t.kind as u16), t.text);
        self.pos += 1;
    }

    /// Skip and attach leading trivia (whitespace/comments) to the tree.
    fn skip_trivia(&mut self) {
        while let Some(k) = self.current() {
            if k.is_trivia() {
                self.bump_raw();
            } else {
                break;
            }
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(SyntaxError::new(message, self.current_range()));
    }

    fn parse_root(&mut self) {
        self.builder.start_node(rowan::SyntaxKind(SyntaxKind::ROOT as u16));
        self.skip_trivia();
        while self.current_non_trivia().is_some() {
            let before = self.pos;
            self.parse_statement();
            self.skip_trivia();
            if self.pos == before {
                // `recover()` deliberately leaves a stray '}' unconsumed so a
                // nested block can close around it; at the root there is no
                // enclosing block, so force progress instead of looping.
                self.error("unexpected token, expected a statement keyword");
                self.bump_raw();
                self.skip_trivia();
            }
        }
        self.builder.finish_node();
    }

    /// `statement := [prefix ':'] keyword [argument] (';' | '{' statement* '}')`
    fn parse_statement(&mut self) {
        self.builder.start_node(rowan::SyntaxKind(SyntaxKind::STATEMENT as u16));
        self.skip_trivia();

        match self.current() {
            Some(SyntaxKind::IDENT) => self.bump_raw(),
            _ => {
                self.error("expected a statement keyword");
                self.recover();
                self.builder.finish_node();
                return;
            }
        }

        self.skip_trivia();
        if self.current() == Some(SyntaxKind::COLON) {
            self.bump_raw();
            self.skip_trivia();
            if self.current() == Some(SyntaxKind::IDENT) {
                self.bump_raw();
            } else {
                self.error("expected an identifier after ':' in extension keyword");
            }
            self.skip_trivia();
        }

        if matches!(self.current(), Some(SyntaxKind::IDENT) | Some(SyntaxKind::STRING)) {
            self.parse_argument();
            self.skip_trivia();
        }

        match self.current() {
            Some(SyntaxKind::SEMICOLON) => self.bump_raw(),
            Some(SyntaxKind::L_BRACE) => {
                self.bump_raw();
                self.skip_trivia();
                while !matches!(self.current(), Some(SyntaxKind::R_BRACE) | None) {
                    self.parse_statement();
                    self.skip_trivia();
                }
                if self.current() == Some(SyntaxKind::R_BRACE) {
                    self.bump_raw();
                } else {
                    self.error("unterminated statement block, expected '}'");
                }
            }
            Some(other) => {
                self.error(format!("unexpected token {other:?}, expected ';' or '{{'"));
                self.recover();
            }
            None => self.error("unexpected end of file, expected ';' or '{'"),
        }

        self.builder.finish_node();
    }

    /// `argument := string ('+' string)*` (also accepts a bare unquoted word)
    fn parse_argument(&mut self) {
        self.builder.start_node(rowan::SyntaxKind(SyntaxKind::ARGUMENT as u16));
        self.bump_raw();
        loop {
            self.skip_trivia();
            if self.current() == Some(SyntaxKind::PLUS) {
                self.bump_raw();
                self.skip_trivia();
                if matches!(self.current(), Some(SyntaxKind::STRING) | Some(SyntaxKind::IDENT)) {
                    self.bump_raw();
                } else {
                    self.error("expected a string after '+'");
                    break;
                }
            } else {
                break;
            }
        }
        self.builder.finish_node();
    }

    /// Error recovery: skip tokens until we find a likely resynchronization
    /// point (the statement terminator or a brace), matching the "never
    /// silently swallowed" policy — every skipped token already produced
    /// an error above.
    fn recover(&mut self) {
        loop {
            match self.current() {
                Some(SyntaxKind::SEMICOLON) => {
                    self.bump_raw();
                    break;
                }
                Some(SyntaxKind::R_BRACE) | None => break,
                Some(SyntaxKind::L_BRACE) => {
                    self.bump_raw();
                    let mut depth = 1;
                    while depth > 0 {
                        match self.current() {
                            Some(SyntaxKind::L_BRACE) => depth += 1,
                            Some(SyntaxKind::R_BRACE) => depth -= 1,
                            None => break,
                            _ => {}
                        }
                        self.bump_raw();
                    }
                    break;
                }
                _ => self.bump_raw(),
            }
        }
    }
}

/// Human-readable name for a syntax kind, for error messages.
pub fn kind_to_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::IDENT => "identifier",
        SyntaxKind::STRING => "string",
        SyntaxKind::PLUS => "'+'",
        SyntaxKind::COLON => "':'",
        SyntaxKind::L_BRACE => "'{'",
        SyntaxKind::R_BRACE => "'}'",
        SyntaxKind::SEMICOLON => "';'",
        SyntaxKind::ERROR => "invalid token",
        other => unreachable!("not a terminal kind: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_statements_without_errors() {
        let parse = parse_module(
            r#"module example {
                namespace "urn:example";
                prefix ex;
                leaf foo { type string; }
            }"#,
        );
        assert!(parse.ok(), "unexpected errors: {:?}", parse.errors);
    }

    #[test]
    fn mismatched_trailing_brace_is_a_syntax_error() {
        let parse = parse_module("module m { namespace \"urn:m\"; prefix m; } }");
        assert!(!parse.ok());
    }
}

//! Logos-based lexer for YANG source text.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use text_size::TextSize;

/// A token with its kind, raw (unescaped) text, and start offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum — maps 1:1 onto `SyntaxKind` token variants.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*?\*/")]
    BlockComment,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token("+")]
    Plus,
    #[token(":")]
    Colon,

    /// Double- or single-quoted string (escapes resolved during AST
    /// construction, not here — the lexer only needs to find the end).
    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r#"'[^']*'"#)]
    QuotedString,

    /// An unquoted string / bareword. RFC 7950 leaves the unquoted
    /// charset open; we accept anything but whitespace and the
    /// characters that are always syntactically significant.
    #[regex(r#"[^\s{};"'+:/][^\s{};"']*"#, priority = 1)]
    Unquoted,
}

impl From<LogosToken> for SyntaxKind {
    fn from(t: LogosToken) -> Self {
        match t {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::BlockComment => SyntaxKind::BLOCK_COMMENT,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::QuotedString => SyntaxKind::STRING,
            LogosToken::Unquoted => SyntaxKind::IDENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_statement() {
        let toks: Vec<_> = tokenize("leaf foo { type string; }")
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            toks,
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::IDENT,
                SyntaxKind::L_BRACE,
                SyntaxKind::IDENT,
                SyntaxKind::IDENT,
                SyntaxKind::SEMICOLON,
                SyntaxKind::R_BRACE,
            ]
        );
    }

    #[test]
    fn tokenizes_prefixed_keyword() {
        let toks: Vec<_> = tokenize("acme:log-level debug;")
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            toks,
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::COLON,
                SyntaxKind::IDENT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::IDENT,
                SyntaxKind::SEMICOLON,
            ]
        );
    }
}

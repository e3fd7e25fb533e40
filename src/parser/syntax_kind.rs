//! Syntax kinds for the rowan-based CST.
//!
//! YANG's statement grammar (RFC 7950 §6.3) is uniform: every construct
//! is `keyword [argument] (';' | '{' statement* '}')`. Unlike a grammar
//! with one production per construct (`container`, `leaf`, `list`, ...),
//! the CST only needs one node kind, `STATEMENT`; which construct a
//! statement represents is a property of its keyword token, decided by
//! the tree-walk listener (`hir::lower`), not by the grammar.

/// All syntax kinds (tokens and nodes) in a YANG source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // Trivia
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // Tokens
    IDENT,     // unquoted string / bare keyword / identifier
    STRING,    // double- or single-quoted string
    PLUS,      // '+' string concatenation operator
    COLON,     // ':' in a prefixed keyword, e.g. `acme:my-extension`
    L_BRACE,   // '{'
    R_BRACE,   // '}'
    SEMICOLON, // ';'
    ERROR,     // unrecognized byte sequence

    // Nodes
    /// One `keyword [argument] (';' | '{' ... '}')` construct.
    STATEMENT,
    /// The (possibly `+`-concatenated) argument of a statement.
    ARGUMENT,
    /// The whole file: a sequence of top-level statements (normally one).
    ROOT,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT
        )
    }
}

/// rowan's language marker type for YANG syntax trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YangLanguage {}

impl rowan::Language for YangLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<YangLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<YangLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<YangLanguage>;

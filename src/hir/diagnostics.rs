//! Error taxonomy and diagnostic rendering.

use crate::base::Span;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// All compile errors, grouped by cause. Every variant that can be
/// attributed to source carries a [`Span`].
#[derive(Debug, Error, Clone)]
pub enum CompileError {
    #[error("{message}")]
    Syntax { span: Span, message: String },

    #[error("statement not valid here: {message}")]
    MissingHolder { span: Span, message: String },
    #[error("statement not valid here: {message}")]
    InvalidHolder { span: Span, message: String },
    #[error("'{keyword}' may appear at most once here")]
    DuplicateStatement { span: Span, keyword: String },

    #[error("no import binds prefix '{prefix}'")]
    MissingImport { span: Span, prefix: String },
    #[error("unresolved reference to '{name}'")]
    UnresolvedReference { span: Span, name: String },
    #[error("cyclic reference detected: {cycle}")]
    CyclicReference { span: Span, cycle: String },

    #[error("'{name}' collides with an existing child of '{parent}'")]
    Collision {
        span: Span,
        name: String,
        parent: String,
    },
    #[error("list '{name}' with config true must declare a non-empty key")]
    InvalidKey { span: Span, name: String },
    #[error("choice default '{case}' does not name a declared case")]
    InvalidDefaultCase { span: Span, case: String },
    #[error("cannot augment into a {target_kind}")]
    IllegalAugmentTarget { span: Span, target_kind: String },

    #[error("invalid revision date '{text}': {reason}")]
    InvalidDate {
        span: Span,
        text: String,
        reason: String,
    },

    #[error("internal compiler error: {message}")]
    Internal { span: Option<Span>, message: String },
}

impl CompileError {
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Syntax { span, .. }
            | CompileError::MissingHolder { span, .. }
            | CompileError::InvalidHolder { span, .. }
            | CompileError::DuplicateStatement { span, .. }
            | CompileError::MissingImport { span, .. }
            | CompileError::UnresolvedReference { span, .. }
            | CompileError::CyclicReference { span, .. }
            | CompileError::Collision { span, .. }
            | CompileError::InvalidKey { span, .. }
            | CompileError::InvalidDefaultCase { span, .. }
            | CompileError::IllegalAugmentTarget { span, .. }
            | CompileError::InvalidDate { span, .. } => Some(*span),
            CompileError::Internal { span, .. } => *span,
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

/// A rendered diagnostic: a [`CompileError`] plus its human-readable
/// position, produced at the CLI boundary as `file:line:col: message`.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub file_path: String,
    pub line: u32,
    pub col: u32,
    pub severity: Severity,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file_path,
            self.line + 1,
            self.col + 1,
            self.message
        )
    }
}

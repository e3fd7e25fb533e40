//! Lexer/parser and lowering-boundary tests: does source text produce
//! the expected CST/HIR shape, and does malformed text fail with a
//! recognizable message.

pub mod tests_ordered_by;
pub mod tests_syntax_errors;
pub mod tests_holder_rules;

use yangc::base::FileId;
use yangc::hir::{lower_file, CompileError, SchemaArena};

#[test]
fn trailing_brace_after_module_close_is_reported() {
    let text = r#"module m { namespace "urn:m"; prefix m; } }"#;
    let mut arena = SchemaArena::new();
    let errors = lower_file(FileId::new(0), text, &mut arena).unwrap_err();

    assert!(
        errors.iter().any(|e| matches!(e, CompileError::Syntax { .. })),
        "expected a Syntax error for the stray '}}', got {errors:?}"
    );
}

#[test]
fn unterminated_block_is_reported() {
    let text = r#"module m { namespace "urn:m"; prefix m;"#;
    let mut arena = SchemaArena::new();
    let errors = lower_file(FileId::new(0), text, &mut arena).unwrap_err();

    assert!(errors.iter().any(|e| matches!(e, CompileError::Syntax { .. })));
}

use yangc::base::FileId;
use yangc::hir::{lower_file, CompileError, SchemaArena};

#[test]
fn choice_default_naming_an_undeclared_case_is_rejected() {
    let text = r#"
        module m {
            namespace "urn:m";
            prefix m;
            container c {
                choice transport {
                    default "fiber";
                    case wire {
                        leaf speed { type string; }
                    }
                }
            }
        }
    "#;
    let mut arena = SchemaArena::new();
    let errors = lower_file(FileId::new(0), text, &mut arena).unwrap_err();
    assert!(
        errors.iter().any(|e| matches!(e, CompileError::InvalidDefaultCase { case, .. } if case == "fiber")),
        "expected an InvalidDefaultCase naming 'fiber', got {errors:?}"
    );
}

#[test]
fn choice_default_naming_a_declared_case_is_accepted() {
    let text = r#"
        module m {
            namespace "urn:m";
            prefix m;
            container c {
                choice transport {
                    default "wire";
                    case wire {
                        leaf speed { type string; }
                    }
                }
            }
        }
    "#;
    let mut arena = SchemaArena::new();
    lower_file(FileId::new(0), text, &mut arena).expect("lowers without errors");
}

#[test]
fn list_key_naming_a_non_leaf_child_is_rejected() {
    let text = r#"
        module m {
            namespace "urn:m";
            prefix m;
            list entries {
                key "id";
                container id { leaf inner { type string; } }
            }
        }
    "#;
    let mut arena = SchemaArena::new();
    let errors = lower_file(FileId::new(0), text, &mut arena).unwrap_err();
    assert!(
        errors.iter().any(|e| matches!(e, CompileError::InvalidKey { .. })),
        "expected an InvalidKey error, got {errors:?}"
    );
}

#[test]
fn list_key_of_type_empty_is_rejected() {
    let text = r#"
        module m {
            namespace "urn:m";
            prefix m;
            list entries {
                key "id";
                leaf id { type empty; }
            }
        }
    "#;
    let mut arena = SchemaArena::new();
    let errors = lower_file(FileId::new(0), text, &mut arena).unwrap_err();
    assert!(
        errors.iter().any(|e| matches!(e, CompileError::InvalidKey { .. })),
        "expected an InvalidKey error, got {errors:?}"
    );
}

#[test]
fn list_key_with_mismatched_config_flag_is_rejected() {
    let text = r#"
        module m {
            namespace "urn:m";
            prefix m;
            list entries {
                key "id";
                config true;
                leaf id { type string; config false; }
            }
        }
    "#;
    let mut arena = SchemaArena::new();
    let errors = lower_file(FileId::new(0), text, &mut arena).unwrap_err();
    assert!(
        errors.iter().any(|e| matches!(e, CompileError::InvalidKey { .. })),
        "expected an InvalidKey error, got {errors:?}"
    );
}

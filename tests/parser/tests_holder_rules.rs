use yangc::base::FileId;
use yangc::hir::{lower_file, CompileError, SchemaArena};

#[test]
fn case_outside_choice_is_invalid_holder() {
    let text = r#"
        module m {
            namespace "urn:m";
            prefix m;
            container c {
                case oops {
                    leaf x { type string; }
                }
            }
        }
    "#;
    let mut arena = SchemaArena::new();
    let errors = lower_file(FileId::new(0), text, &mut arena).unwrap_err();
    assert!(errors.iter().any(|e| matches!(e, CompileError::InvalidHolder { .. })));
}

#[test]
fn key_outside_list_is_invalid_holder() {
    let text = r#"
        module m {
            namespace "urn:m";
            prefix m;
            container c {
                key "x";
                leaf x { type string; }
            }
        }
    "#;
    let mut arena = SchemaArena::new();
    let errors = lower_file(FileId::new(0), text, &mut arena).unwrap_err();
    assert!(errors.iter().any(|e| matches!(e, CompileError::InvalidHolder { .. })));
}

#[test]
fn revision_date_outside_import_or_include_is_invalid_holder() {
    let text = r#"
        module m {
            namespace "urn:m";
            prefix m;
            revision-date 2020-01-01;
        }
    "#;
    let mut arena = SchemaArena::new();
    let errors = lower_file(FileId::new(0), text, &mut arena).unwrap_err();
    assert!(errors.iter().any(|e| matches!(e, CompileError::InvalidHolder { .. })));
}

use std::fs;

use tempfile::TempDir;
use yangc::config::CompileConfig;
use yangc::hir::CompileError;
use yangc::resolver;

#[test]
fn two_cases_declaring_the_same_child_name_is_a_collision() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.yang");
    fs::write(
        &path,
        r#"
        module m {
            namespace "urn:m";
            prefix m;

            container c {
                choice transport {
                    case wire {
                        leaf ethernet { type string; }
                    }
                    case fabric {
                        container ethernet {
                            leaf speed { type string; }
                        }
                    }
                }
            }
        }
        "#,
    )
    .unwrap();

    let config = CompileConfig::default();
    let errors = resolver::compile(&config, &[path]).expect_err("cases share a child name");

    assert!(
        errors.iter().any(|e| matches!(
            e,
            CompileError::Collision { name, parent, .. }
                if name == "ethernet" && parent == "transport"
        )),
        "expected a Collision naming 'ethernet' under choice 'transport', got {errors:?}"
    );
}

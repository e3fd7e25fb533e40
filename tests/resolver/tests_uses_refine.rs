use std::fs;

use tempfile::TempDir;
use yangc::base::Name;
use yangc::config::CompileConfig;
use yangc::hir::{NodeId, NodeKind, SchemaArena};
use yangc::resolver;

fn child_named(arena: &SchemaArena, parent: NodeId, name: &str) -> NodeId {
    arena
        .children(parent)
        .find(|&id| arena.get(id).name.as_ref() == Some(&Name::new(name)))
        .unwrap_or_else(|| panic!("no child named '{name}' under {parent:?}"))
}

#[test]
fn refine_overrides_the_clone_without_touching_the_template() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.yang");
    fs::write(
        &path,
        r#"
        module m {
            namespace "urn:m";
            prefix m;

            grouping g {
                leaf x {
                    type string;
                    default "a";
                }
            }

            container c {
                uses g {
                    refine x {
                        default "b";
                    }
                }
            }
        }
        "#,
    )
    .unwrap();

    let config = CompileConfig::default();
    let unit = resolver::compile(&config, &[path]).expect("compiles without errors");
    let module = unit.modules[0];

    let grouping = child_named(&unit.arena, module, "g");
    let template_x = child_named(&unit.arena, grouping, "x");
    match &unit.arena.get(template_x).kind {
        NodeKind::Leaf(data) => assert_eq!(data.default.as_deref(), Some("a")),
        other => panic!("expected a leaf, got {other:?}"),
    }

    let container = child_named(&unit.arena, module, "c");
    // `uses` is gone; its clone's `x` leaf is spliced directly under `c`.
    let resolved_x = child_named(&unit.arena, container, "x");
    match &unit.arena.get(resolved_x).kind {
        NodeKind::Leaf(data) => assert_eq!(data.default.as_deref(), Some("b")),
        other => panic!("expected a leaf, got {other:?}"),
    }
    assert!(
        unit.arena.children(container).all(|id| !matches!(unit.arena.get(id).kind, NodeKind::Uses(_))),
        "the uses placeholder should have been unlinked after expansion"
    );
}

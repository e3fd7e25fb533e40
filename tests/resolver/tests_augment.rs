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
fn cross_module_augment_splices_children_under_the_augmenting_modules_namespace() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("a.yang"),
        r#"
        module a {
            namespace "urn:a";
            prefix a;

            container ifs {
                container if {
                    leaf name { type string; }
                }
            }
        }
        "#,
    )
    .unwrap();
    let b_path = dir.path().join("b.yang");
    fs::write(
        &b_path,
        r#"
        module b {
            namespace "urn:b";
            prefix b;

            import a { prefix a; }

            grouping vlan-routed-top {
                container routed-vlan {
                    leaf vlan-id { type string; }
                }
            }

            augment "/a:ifs/a:if" {
                uses vlan-routed-top;
            }
        }
        "#,
    )
    .unwrap();

    let config = CompileConfig::default();
    let unit = resolver::compile(&config, &[b_path]).expect("compiles without errors");

    let module_a = *unit.by_name.get(&Name::new("a")).unwrap().first().unwrap();
    let ifs = child_named(&unit.arena, module_a, "ifs");
    let iface = child_named(&unit.arena, ifs, "if");
    let routed_vlan = child_named(&unit.arena, iface, "routed-vlan");
    let iface_name_leaf = child_named(&unit.arena, iface, "name");

    assert!(matches!(unit.arena.get(routed_vlan).kind, NodeKind::Container(_)));
    assert_eq!(unit.arena.get(routed_vlan).namespace, Some(Name::new("urn:b")));
    assert_eq!(unit.arena.get(iface).augmented_by, vec![Name::new("b")]);

    // The augment target and its pre-existing children keep the
    // namespace of their own module, never the augmenting one.
    assert_eq!(unit.arena.get(iface).namespace, Some(Name::new("urn:a")));
    assert_eq!(unit.arena.get(iface_name_leaf).namespace, Some(Name::new("urn:a")));
}

use std::fs;

use tempfile::TempDir;
use yangc::base::Name;
use yangc::config::CompileConfig;
use yangc::hir::NodeId;
use yangc::resolver;
use yangc::serializer::{ResourceIdBuilder, SerializerContext};

fn child_named(arena: &yangc::hir::SchemaArena, parent: NodeId, name: &str) -> NodeId {
    arena
        .children(parent)
        .find(|&id| arena.get(id).name.as_ref() == Some(&Name::new(name)))
        .unwrap_or_else(|| panic!("no child named '{name}' under {parent:?}"))
}

#[test]
fn builder_path_resolves_through_a_compiled_list_and_leaf_list() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("m.yang");
    fs::write(
        &path,
        r#"
        module m {
            namespace "urn:m";
            prefix m;

            container top {
                list entries {
                    key "id";
                    leaf id { type string; }
                    leaf-list tags { type string; }
                }
            }
        }
        "#,
    )
    .unwrap();

    let config = CompileConfig::default();
    let unit = resolver::compile(&config, &[path]).expect("compiles without errors");
    let module = unit.modules[0];

    let top = child_named(&unit.arena, module, "top");
    let entries = child_named(&unit.arena, top, "entries");
    let tags = child_named(&unit.arena, entries, "tags");

    let ns = Name::new("urn:m");
    let id = ResourceIdBuilder::new()
        .add_branch_point_schema(Name::new("top"), ns.clone())
        .unwrap()
        .add_branch_point_schema(Name::new("entries"), ns.clone())
        .unwrap()
        .add_key_leaf(Name::new("id"), "7".into())
        .unwrap()
        .add_leaf_list_branch_point(Name::new("tags"), ns, "prod".into())
        .unwrap()
        .build()
        .unwrap();

    let ctx = SerializerContext::root_context(&unit.arena, module);
    assert_eq!(ctx.resolve(&id), Some(tags));

    // A path recovered from the node itself resolves back to the same node,
    // even though it only carries plain schema ids (no instance key data).
    let recovered = ctx.path_to(tags).unwrap();
    assert_eq!(ctx.resolve(&recovered), Some(tags));
}

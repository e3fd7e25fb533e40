use yangc::base::FileId;
use yangc::hir::{lower_file, NodeKind, OrderedBy, SchemaArena};

#[test]
fn leaf_list_ordered_by_user_round_trips() {
    let text = r#"
        module m {
            namespace "urn:m";
            prefix m;
            leaf-list foo {
                type string;
                ordered-by user;
            }
        }
    "#;
    let mut arena = SchemaArena::new();
    let root = lower_file(FileId::new(0), text, &mut arena).expect("no lowering errors");

    let leaf_list = arena
        .children(root.root)
        .find(|&id| matches!(arena.get(id).kind, NodeKind::LeafList(_)))
        .expect("leaf-list foo");

    match &arena.get(leaf_list).kind {
        NodeKind::LeafList(data) => assert_eq!(data.ordered_by, OrderedBy::User),
        other => panic!("expected a leaf-list, got {other:?}"),
    }
}

#[test]
fn leaf_list_defaults_to_system_order() {
    let text = r#"
        module m {
            namespace "urn:m";
            prefix m;
            leaf-list foo {
                type string;
            }
        }
    "#;
    let mut arena = SchemaArena::new();
    let root = lower_file(FileId::new(0), text, &mut arena).expect("no lowering errors");

    let leaf_list = arena.children(root.root).next().expect("leaf-list foo");
    match &arena.get(leaf_list).kind {
        NodeKind::LeafList(data) => assert_eq!(data.ordered_by, OrderedBy::System),
        other => panic!("expected a leaf-list, got {other:?}"),
    }
}

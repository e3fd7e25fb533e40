use std::fs;

use tempfile::TempDir;
use yangc::config::CompileConfig;
use yangc::hir::NodeKind;
use yangc::resolver;

fn write_revisioned_module(dir: &std::path::Path, revision: &str) {
    fs::write(
        dir.join(format!("m@{revision}.yang")),
        format!(
            r#"
            module m {{
                namespace "urn:m";
                prefix m;
                revision {revision};
            }}
            "#
        ),
    )
    .unwrap();
}

#[test]
fn import_without_a_revision_binds_to_the_newest_one_on_the_search_path() {
    let dir = TempDir::new().unwrap();
    write_revisioned_module(dir.path(), "2016-05-26");
    write_revisioned_module(dir.path(), "2017-03-10");

    let importer_path = dir.path().join("importer.yang");
    fs::write(
        &importer_path,
        r#"
        module importer {
            namespace "urn:importer";
            prefix i;
            import m { prefix m; }
        }
        "#,
    )
    .unwrap();

    let config = CompileConfig::default();
    let unit = resolver::compile(&config, &[importer_path]).expect("compiles without errors");

    let module_m = *unit.by_name.get(&yangc::base::Name::new("m")).unwrap().first().unwrap();
    match &unit.arena.get(module_m).kind {
        NodeKind::Module(data) => {
            assert_eq!(data.revisions.first().map(|r| r.date.as_str()), Some("2017-03-10"));
        }
        other => panic!("expected a module, got {other:?}"),
    }
}

#[test]
fn import_with_an_explicit_revision_date_binds_to_that_revision() {
    let dir = TempDir::new().unwrap();
    write_revisioned_module(dir.path(), "2016-05-26");
    write_revisioned_module(dir.path(), "2017-03-10");

    let importer_path = dir.path().join("importer.yang");
    fs::write(
        &importer_path,
        r#"
        module importer {
            namespace "urn:importer";
            prefix i;
            import m {
                prefix m;
                revision-date 2016-05-26;
            }
        }
        "#,
    )
    .unwrap();

    let config = CompileConfig::default();
    let unit = resolver::compile(&config, &[importer_path]).expect("compiles without errors");

    let module_m = *unit.by_name.get(&yangc::base::Name::new("m")).unwrap().first().unwrap();
    match &unit.arena.get(module_m).kind {
        NodeKind::Module(data) => {
            assert_eq!(data.revisions.first().map(|r| r.date.as_str()), Some("2016-05-26"));
        }
        other => panic!("expected a module, got {other:?}"),
    }
}

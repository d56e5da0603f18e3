use std::fs;

use assert_matches::assert_matches;
use arctic_tern_codegen::manifest::{generate_from_manifest, parse_manifest_str};
use arctic_tern_codegen::model::{ClassKind, Modifier};
use arctic_tern_codegen::{CodegenError, Processor};

const MANIFEST: &str = r#"
[[unit]]
name = "Settings"
preference_file = "settings"
version = 2
constructor = [{ name = "owner", type = "String" }]
source = "src/settings.rs"

[[unit.property]]
name = "volume"
type = "i32"
with_flow = true

[[unit.property]]
name = "birthday"
type = "Option<Date>"
serializer = "DateSerializer"
with_delete = true

[[serializer]]
name = "DateSerializer"
kind = "object"
implements = ["NullableSerializer<Option<Date>>"]

[[migration]]
name = "ResetVolume"
unit = "Settings"
version = 1
kind = "object"
implements = ["Migration"]

[app]
name = "App"
"#;

#[test_log::test]
fn manifest_builds_the_declaration_graph() {
    let manifest = parse_manifest_str(MANIFEST).unwrap();
    let graph = manifest.to_graph().unwrap();
    assert_eq!(graph.len(), 4);

    let settings = graph.get(graph.find("Settings").unwrap());
    assert_eq!(settings.kind, ClassKind::Class);
    assert!(settings.has_modifier(Modifier::Abstract));
    assert_eq!(settings.constructor.len(), 1);
    assert_eq!(settings.properties.len(), 2);
    assert_eq!(settings.unit_annotation().unwrap().version, 2);

    let migration = graph.get(graph.find("ResetVolume").unwrap());
    assert_eq!(migration.parent, graph.find("Settings"));
    assert_eq!(migration.migration_annotation().unwrap().version, 1);

    let output = Processor::new(manifest.generator_options().unwrap()).process(&graph);
    assert!(output.is_success(), "{:?}", output.errors);
    let names: Vec<&str> = output.files.iter().map(|file| file.file_name.as_str()).collect();
    assert_eq!(names, vec!["ArcticTernSettings", "ArcticTernFactory"]);
    assert_eq!(
        output.files[0].rerun_directives(),
        vec!["cargo:rerun-if-changed=src/settings.rs".to_string()]
    );
}

#[test]
fn unknown_migration_unit_is_rejected() {
    let manifest = parse_manifest_str(
        r#"
[[migration]]
name = "Lost"
unit = "Nowhere"
version = 1
kind = "object"
implements = ["Migration"]
"#,
    )
    .unwrap();
    assert_matches!(manifest.to_graph(), Err(CodegenError::Configuration(message)) if message.contains("Nowhere"));
}

#[test]
fn bad_type_text_is_a_syntax_error() {
    let manifest = parse_manifest_str(
        r#"
[[unit]]
name = "Broken"
preference_file = "broken"
version = 0

[[unit.property]]
name = "value"
type = "Vec<"
"#,
    )
    .unwrap();
    assert_matches!(manifest.to_graph(), Err(CodegenError::Syntax { what: "type", .. }));
}

#[test]
fn malformed_toml_is_reported() {
    assert_matches!(parse_manifest_str("[[unit]\nname ="), Err(CodegenError::Manifest(_)));
}

#[test_log::test]
fn generate_from_manifest_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("preferences.toml");
    fs::write(&manifest_path, MANIFEST).unwrap();

    let written = generate_from_manifest(&manifest_path, dir.path()).unwrap();
    assert_eq!(written.len(), 2);
    let contents = fs::read_to_string(&written[0]).unwrap();
    assert!(contents.contains("ArcticTernSettings"));
    assert!(contents.contains("volume_flow"));
    assert!(contents.contains("delete_birthday"));
}

#[test]
fn generate_from_manifest_fails_on_invalid_unit() {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("preferences.toml");
    fs::write(
        &manifest_path,
        r#"
[[unit]]
name = "Wide"
preference_file = "wide"
version = 0

[[unit.property]]
name = "value"
type = "u128"
"#,
    )
    .unwrap();

    let error = generate_from_manifest(&manifest_path, dir.path()).unwrap_err();
    assert_matches!(&error, CodegenError::Configuration(message) if message.starts_with("Wide: "));
}

#[test]
fn missing_manifest_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = generate_from_manifest(dir.path().join("absent.toml"), dir.path()).unwrap_err();
    assert_matches!(error, CodegenError::Read { .. });
}

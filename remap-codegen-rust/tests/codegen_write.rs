//! Writing generated files to disk.

use remap_codegen::testing;
use remap_codegen_rust::{Generator, LanguageCodegen};
use tempfile::TempDir;

const MANIFEST: &str = r#"
    [project]
    name = "sample"

    [types.NestedDto]
    kind = "data"
    fields = { id = "Long" }

    [types.NestedModel]
    kind = "data"
    fields = { id = "Long" }

    [[mappers.NestedMapper.functions]]
    name = "map"
    params = { dto = "NestedDto" }
    returns = "NestedModel"

    [factories.Mappers]
    mappers = ["NestedMapper"]
"#;

#[test]
fn test_regenerating_leaves_files_unchanged() {
    let ctx = testing::run(MANIFEST).unwrap();
    let output = ctx.output.unwrap();
    let generator = Generator::new(&output);
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("generated");

    let first = generator.generate(&dir).unwrap();
    assert_eq!(
        first.written,
        vec!["nested_mapper_impl.rs", "mappers.rs", "mod.rs"]
    );
    assert!(first.unchanged.is_empty());

    let second = generator.generate(&dir).unwrap();
    assert!(second.written.is_empty());
    assert_eq!(second.unchanged.len(), 3);

    let written = std::fs::read_to_string(dir.join("nested_mapper_impl.rs")).unwrap();
    assert!(written.starts_with("// Code generated by remap. Do not edit.\n\n"));
}

#[test]
fn test_preview_matches_written_files() {
    let ctx = testing::run(MANIFEST).unwrap();
    let output = ctx.output.unwrap();
    let generator = Generator::new(&output);
    let temp = TempDir::new().unwrap();

    generator.generate(temp.path()).unwrap();
    for file in generator.preview() {
        let on_disk = std::fs::read_to_string(temp.path().join(&file.path)).unwrap();
        assert_eq!(on_disk, file.content, "{}", file.path);
    }
    assert_eq!(generator.language(), "rust");
    assert_eq!(generator.file_extension(), "rs");
}

//! Snapshot tests for Rust code generation.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use remap_codegen::testing;
use remap_codegen_rust::{Generator, LanguageCodegen};

const TYPES: &str = r#"
    [project]
    name = "sample"

    [types.Dto]
    kind = "data"
    fields = { id = "Long", name = "String?", nested = "NestedDto", items = "List<NestedDto>" }

    [types.NestedDto]
    kind = "data"
    fields = { id = "Long" }

    [types.Model]
    kind = "data"
    fields = { id = "Long", name = "String", nested = "NestedModel", items = "List<NestedModel>" }

    [types.NestedModel]
    kind = "data"
    fields = { id = "Long" }

    [types.Status]
    kind = "enum"
    entries = ["OneSample", "SecondSample", "Unknown"]
"#;

/// Run the pipeline and return the rendered files sorted by path.
fn generate_files(mappers: &str) -> Vec<(String, String)> {
    let ctx = testing::run(&format!("{TYPES}\n{mappers}")).expect("pipeline should succeed");
    assert!(!ctx.has_errors(), "{:?}", ctx.diagnostics);
    let output = ctx.output.expect("output should be set");

    let mut files: Vec<(String, String)> = Generator::new(&output)
        .preview()
        .into_iter()
        .map(|f| (f.path, f.content))
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}

fn get_file<'a>(files: &'a [(String, String)], path: &str) -> &'a str {
    files
        .iter()
        .find(|(p, _)| p == path)
        .map(|(_, c)| c.as_str())
        .unwrap_or_else(|| panic!("{path} not generated"))
}

#[test]
fn test_identical_types() {
    let files = generate_files(
        r#"
        [[mappers.NestedMapper.functions]]
        name = "map"
        params = { dto = "NestedDto" }
        returns = "NestedModel"
        "#,
    );

    insta::assert_snapshot!(get_file(&files, "nested_mapper_impl.rs"), @r###"
    // Code generated by remap. Do not edit.

    use super::*;

    /// Generated implementation of [`NestedMapper`].
    #[derive(Debug, Default, Clone, Copy)]
    pub struct NestedMapperImpl;

    impl NestedMapperImpl {
        pub fn new() -> Self {
            Self
        }
    }

    impl NestedMapper for NestedMapperImpl {
        fn map(&self, dto: NestedDto) -> NestedModel {
            NestedModel {
                id: dto.id,
            }
        }
    }
    "###);
}

#[test]
fn test_string_to_enum() {
    let files = generate_files(
        r#"
        [mappers.StatusMapper]
        enum-source-naming = "upper-snake"
        enum-target-naming = "upper-camel"

        [[mappers.StatusMapper.functions]]
        name = "parse"
        params = { value = "String" }
        returns = "Status"
        enum-mappings = [{ target = "Unknown" }]
        "#,
    );

    insta::assert_snapshot!(get_file(&files, "status_mapper_impl.rs"), @r###"
    // Code generated by remap. Do not edit.

    use super::*;

    /// Generated implementation of [`StatusMapper`].
    #[derive(Debug, Default, Clone, Copy)]
    pub struct StatusMapperImpl;

    impl StatusMapperImpl {
        pub fn new() -> Self {
            Self
        }
    }

    impl StatusMapper for StatusMapperImpl {
        fn parse(&self, value: String) -> Status {
            match value.as_str() {
                "ONE_SAMPLE" => Status::OneSample,
                "SECOND_SAMPLE" => Status::SecondSample,
                "UNKNOWN" => Status::Unknown,
                _ => Status::Unknown,
            }
        }
    }
    "###);
}

#[test]
fn test_collections_and_forced_unwrap() {
    let files = generate_files(
        r#"
        [mappers.SampleMapper]
        nullability = "unwrap"

        [[mappers.SampleMapper.functions]]
        name = "map"
        params = { dto = "Dto" }
        returns = "Model"
        "#,
    );
    let content = get_file(&files, "sample_mapper_impl.rs");

    assert!(content.contains("name: dto.name.unwrap(),"));
    assert!(content.contains("nested: self.map_nested_dto(dto.nested),"));
    assert!(content.contains("items: self.map_nested_dto_list(dto.items),"));
    assert!(content.contains(
        "    /// Maps `List<NestedDto>` to `List<NestedModel>`.\n    fn map_nested_dto_list(&self, items: Vec<NestedDto>) -> Vec<NestedModel> {"
    ));
    assert!(content.contains("let mut result = Vec::with_capacity(items.len());"));
    assert!(content.contains("result.push(self.map_nested_dto(item));"));

    // Synthesized functions live in the inherent impl, declared ones in the trait impl.
    let inherent = content.find("impl SampleMapperImpl {").unwrap();
    let trait_impl = content.find("impl SampleMapper for SampleMapperImpl {").unwrap();
    let synthesized = content.find("fn map_nested_dto(").unwrap();
    let declared = content.find("fn map(&self, dto: Dto) -> Model {").unwrap();
    assert!(inherent < synthesized && synthesized < trait_impl && trait_impl < declared);
}

#[test]
fn test_raise_policy() {
    let files = generate_files(
        r#"
        [mappers.SampleMapper]
        nullability = "raise"

        [[mappers.SampleMapper.functions]]
        name = "map"
        params = { dto = "Dto" }
        returns = "Model"
        "#,
    );
    let content = get_file(&files, "sample_mapper_impl.rs");

    assert!(content.contains(
        "name: dto.name.expect(\"cannot assign null source `dto.name` to non-null target `name`\"),"
    ));
}

const FACTORY: &str = r#"
    [mappers.OuterMapper]
    includes = ["InnerMapper", "DateUtils"]

    [mappers.InnerMapper]

    [helpers.DateUtils]
"#;

#[test]
fn test_mapper_with_includes() {
    let files = generate_files(&format!(
        "{FACTORY}\n[factories.Mappers]\nmappers = [\"OuterMapper\"]\n"
    ));

    insta::assert_snapshot!(get_file(&files, "outer_mapper_impl.rs"), @r###"
    // Code generated by remap. Do not edit.

    use std::sync::Arc;

    use super::*;

    /// Generated implementation of [`OuterMapper`].
    #[derive(Clone)]
    pub struct OuterMapperImpl {
        inner_mapper: Arc<dyn InnerMapper>,
        date_utils: Arc<dyn DateUtils>,
    }

    impl OuterMapperImpl {
        pub fn new(inner_mapper: Arc<dyn InnerMapper>, date_utils: Arc<dyn DateUtils>) -> Self {
            Self {
                inner_mapper,
                date_utils,
            }
        }
    }

    impl OuterMapper for OuterMapperImpl {}
    "###);
}

#[test]
fn test_simple_factory() {
    let files = generate_files(&format!(
        "{FACTORY}\n[factories.Mappers]\nmappers = [\"OuterMapper\"]\n"
    ));

    insta::assert_snapshot!(get_file(&files, "mappers.rs"), @r###"
    // Code generated by remap. Do not edit.

    use std::sync::Arc;

    use super::*;

    /// Hands out the generated mappers.
    #[derive(Clone)]
    pub struct Mappers {
        date_utils: Arc<dyn DateUtils>,
    }

    impl Mappers {
        pub fn new(date_utils: Arc<dyn DateUtils>) -> Self {
            Self { date_utils }
        }

        pub fn inner_mapper(&self) -> Arc<dyn InnerMapper> {
            Arc::new(InnerMapperImpl::new())
        }

        pub fn outer_mapper(&self) -> Arc<dyn OuterMapper> {
            Arc::new(OuterMapperImpl::new(self.inner_mapper(), self.date_utils.clone()))
        }
    }
    "###);

    insta::assert_snapshot!(get_file(&files, "mod.rs"), @r###"
    // Code generated by remap. Do not edit.

    use super::*;

    mod inner_mapper_impl;
    mod outer_mapper_impl;
    mod mappers;

    pub use inner_mapper_impl::InnerMapperImpl;
    pub use outer_mapper_impl::OuterMapperImpl;
    pub use mappers::Mappers;
    "###);
}

#[test]
fn test_module_factory() {
    let files = generate_files(&format!(
        "{FACTORY}\n[factories.Providers]\nmappers = [\"OuterMapper\"]\nstyle = \"module\"\n"
    ));

    insta::assert_snapshot!(get_file(&files, "providers.rs"), @r###"
    // Code generated by remap. Do not edit.

    use std::sync::Arc;

    use super::*;

    pub fn provide_inner_mapper() -> InnerMapperImpl {
        InnerMapperImpl::new()
    }

    pub fn provide_outer_mapper(inner_mapper: Arc<dyn InnerMapper>, date_utils: Arc<dyn DateUtils>) -> OuterMapperImpl {
        OuterMapperImpl::new(inner_mapper, date_utils)
    }
    "###);
    assert!(get_file(&files, "mod.rs").contains("pub mod providers;"));
}

#[test]
fn test_generation_is_byte_identical() {
    let mappers = r#"
        [mappers.SampleMapper]
        nullability = "unwrap"

        [[mappers.SampleMapper.functions]]
        name = "map"
        params = { dto = "Dto" }
        returns = "Model"
    "#;
    assert_eq!(generate_files(mappers), generate_files(mappers));
}

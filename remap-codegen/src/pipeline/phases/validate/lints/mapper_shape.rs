//! Lint for mappers that cannot be implemented.

use remap_manifest::Manifest;

use super::super::Lint;
use crate::pipeline::Diagnostic;

pub struct MapperShapeLint;

impl Lint for MapperShapeLint {
    fn name(&self) -> &'static str {
        "mapper-shape"
    }

    fn description(&self) -> &'static str {
        "Reject mappers declared with a final shape"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for (name, mapper) in &manifest.mappers {
            if !mapper.shape.is_extensible() {
                diagnostics.push(
                    Diagnostic::error(
                        "validate",
                        format!(
                            "mapper '{name}' is {} and cannot be implemented",
                            mapper.shape.as_str()
                        ),
                    )
                    .at(format!("mappers.{name}")),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_mapper() {
        let manifest: Manifest = toml::from_str(
            r#"
            [project]
            name = "test"

            [mappers.SampleMapper]
            shape = "final"

            [mappers.OtherMapper]
            shape = "abstract"
        "#,
        )
        .unwrap();

        let mut diagnostics = Vec::new();
        MapperShapeLint.check(&manifest, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "mapper 'SampleMapper' is final and cannot be implemented"
        );
    }
}

//! Lint for generated functions that return nothing.

use remap_manifest::Manifest;

use super::super::Lint;
use crate::pipeline::Diagnostic;

pub struct FunctionReturnLint;

impl Lint for FunctionReturnLint {
    fn name(&self) -> &'static str {
        "function-return"
    }

    fn description(&self) -> &'static str {
        "Require a return type on every function that is generated"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for (name, mapper) in &manifest.mappers {
            for function in mapper.functions.iter().filter(|f| !f.implemented) {
                let returns_unit = function
                    .returns
                    .as_ref()
                    .is_none_or(|ty| ty.type_ref().name == "Unit");
                if returns_unit {
                    diagnostics.push(
                        Diagnostic::error(
                            "validate",
                            format!(
                                "function '{}' must return a value to be generated",
                                function.name
                            ),
                        )
                        .at(format!("mappers.{name}.{}", function.name)),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_manifest(content: &str) -> Manifest {
        toml::from_str(content).expect("Failed to parse test manifest")
    }

    #[test]
    fn test_missing_and_unit_returns() {
        let manifest = parse_manifest(
            r#"
            [project]
            name = "test"

            [[mappers.SampleMapper.functions]]
            name = "log"
            params = { dto = "Dto" }

            [[mappers.SampleMapper.functions]]
            name = "touch"
            params = { dto = "Dto" }
            returns = "Unit"

            [[mappers.SampleMapper.functions]]
            name = "audit"
            params = { dto = "Dto" }
            implemented = true
        "#,
        );

        let mut diagnostics = Vec::new();
        FunctionReturnLint.check(&manifest, &mut diagnostics);

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.severity.is_error()));
    }
}

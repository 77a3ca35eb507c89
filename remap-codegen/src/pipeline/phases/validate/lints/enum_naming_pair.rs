//! Lint for enum naming policies set on one side only.

use remap_ir::EnumNaming;
use remap_manifest::Manifest;

use super::super::Lint;
use crate::pipeline::Diagnostic;

/// A naming policy only converts entries when both sides are set.
pub struct EnumNamingPairLint;

impl Lint for EnumNamingPairLint {
    fn name(&self) -> &'static str {
        "enum-naming-pair"
    }

    fn description(&self) -> &'static str {
        "Warn about enum naming policies that have no counterpart"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for (name, mapper) in &manifest.mappers {
            if one_sided(
                Some(mapper.enum_source_naming),
                Some(mapper.enum_target_naming),
            ) {
                diagnostics.push(warning(format!("mappers.{name}")));
            }
            for function in &mapper.functions {
                for directive in &function.enum_mappings {
                    if one_sided(directive.source_naming, directive.target_naming) {
                        diagnostics.push(warning(format!("mappers.{name}.{}", function.name)));
                    }
                }
            }
        }
    }
}

fn one_sided(source: Option<EnumNaming>, target: Option<EnumNaming>) -> bool {
    let set = |naming: Option<EnumNaming>| naming.is_some_and(|n| n != EnumNaming::None);
    set(source) != set(target)
}

fn warning(location: String) -> Diagnostic {
    Diagnostic::warning(
        "validate",
        "enum naming is set on one side only; entries are compared unconverted unless a broader default supplies the other side",
    )
    .at(location)
}

//! Lint for mappers that include themselves.

use remap_manifest::Manifest;

use super::super::Lint;
use crate::pipeline::Diagnostic;

pub struct SelfIncludeLint;

impl Lint for SelfIncludeLint {
    fn name(&self) -> &'static str {
        "self-include"
    }

    fn description(&self) -> &'static str {
        "Reject mappers listing themselves in includes"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        for (name, mapper) in &manifest.mappers {
            if mapper.includes.iter().any(|included| included == name) {
                diagnostics.push(
                    Diagnostic::error("validate", format!("mapper '{name}' includes itself"))
                        .at(format!("mappers.{name}.includes")),
                );
            }
        }
    }
}

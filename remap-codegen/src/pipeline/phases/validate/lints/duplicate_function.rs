//! Lint for functions sharing a name within a mapper.

use std::collections::HashSet;

use remap_manifest::Manifest;

use super::super::Lint;
use crate::pipeline::Diagnostic;

/// Generated code cannot overload, so function names must be unique per mapper.
pub struct DuplicateFunctionLint;

impl Lint for DuplicateFunctionLint {
    fn name(&self) -> &'static str {
        "duplicate-function"
    }

    fn description(&self) -> &'static str {
        "Detect functions declared twice on one mapper"
    }

    fn check(&self, manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) {
        let owners = manifest
            .mappers
            .iter()
            .map(|(name, mapper)| ("mappers", name, &mapper.functions))
            .chain(
                manifest
                    .helpers
                    .iter()
                    .map(|(name, helper)| ("helpers", name, &helper.functions)),
            );

        for (table, owner, functions) in owners {
            let mut seen = HashSet::new();
            for function in functions {
                if !seen.insert(function.name.as_str()) {
                    diagnostics.push(
                        Diagnostic::error(
                            "validate",
                            format!("function '{}' is declared more than once on '{owner}'", function.name),
                        )
                        .at(format!("{table}.{owner}.{}", function.name)),
                    );
                }
            }
        }
    }
}

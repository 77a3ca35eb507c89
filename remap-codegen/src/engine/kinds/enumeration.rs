//! Exhaustive enum dispatch.

use remap_core::CaseConvention;
use remap_ir::{CheckSeverity, EnumDirective};
use tracing::debug;

use super::present_if;
use crate::{
    builder::{Expr, MatchArm, Pattern, Statement},
    engine::{Engine, Mapping, MappingError, MappingId, PHASE},
    pipeline::Diagnostic,
};

impl Engine<'_> {
    pub(super) fn write_enum(&mut self, id: MappingId) -> Result<Vec<Statement>, MappingError> {
        let mapping = self.mappings[id.0].clone();
        let requester = self.qualified_name(id);
        let source = mapping.sources.first().cloned().ok_or_else(|| {
            MappingError::Internal(format!("{requester} has no source"))
        })?;
        let target = mapping.target.non_null();

        if source.ty.nullable && !mapping.target.nullable {
            return Err(MappingError::NullabilityCompliance {
                source_path: source.name.clone(),
                target: mapping.target.to_string(),
                requester,
            });
        }
        let mut body = Self::null_guards(&mapping);

        let directives: Vec<&EnumDirective> = mapping.enum_directives().collect();
        let fallback = directives
            .iter()
            .find(|d| d.is_fallback())
            .and_then(|d| d.target.clone());
        let target_entries = self.model.enum_entries(&target);
        let mut reached: Vec<String> = Vec::new();
        let mut arms = Vec::new();

        if self.model.is_enum(&source.ty) {
            for entry in self.model.enum_entries(&source.ty) {
                let explicit = directives
                    .iter()
                    .find(|d| d.source.as_deref() == Some(entry.as_str()))
                    .copied();
                let resolved = match explicit.and_then(|d| d.target.clone()) {
                    Some(resolved) => resolved,
                    None => {
                        let candidate = match self.conventions(&mapping, explicit) {
                            (Some(from), Some(to)) => from.convert(to, &entry),
                            _ => entry.clone(),
                        };
                        match &fallback {
                            _ if target_entries.contains(&candidate) => candidate,
                            _ if target_entries.contains(&entry) => entry.clone(),
                            Some(fallback) => fallback.clone(),
                            None => {
                                return Err(MappingError::MappingNotFound {
                                    path: format!("{}.{entry}", source.ty.simple_name()),
                                    requester,
                                    reason: format!(
                                        "{} has no entry `{candidate}` and no fallback is given",
                                        target.simple_name()
                                    ),
                                });
                            }
                        }
                    }
                };
                if !target_entries.contains(&resolved) {
                    return Err(MappingError::MappingNotFound {
                        path: format!("{}.{entry}", source.ty.simple_name()),
                        requester,
                        reason: format!("{} has no entry `{resolved}`", target.simple_name()),
                    });
                }
                arms.push(MatchArm::new(
                    Pattern::EnumEntry {
                        ty: source.ty.non_null(),
                        entry,
                    },
                    Expr::enum_entry(target.clone(), &resolved),
                ));
                reached.push(resolved);
            }
        } else if self.model.is_string(&source.ty) {
            let Some(fallback) = fallback else {
                return Err(MappingError::MappingNotFound {
                    path: source.name.clone(),
                    requester,
                    reason: format!(
                        "mapping a string to {} needs a fallback entry",
                        target.simple_name()
                    ),
                });
            };
            let (from, to) = self.conventions(&mapping, None);
            for entry in &target_entries {
                let explicit = directives
                    .iter()
                    .find(|d| d.target.as_deref() == Some(entry.as_str()))
                    .and_then(|d| d.source.clone());
                let expected = match (explicit, from, to) {
                    (Some(text), _, _) => text,
                    (None, Some(from), Some(to)) => to.convert(from, entry),
                    _ => entry.clone(),
                };
                arms.push(MatchArm::new(
                    Pattern::Literal(expected),
                    Expr::enum_entry(target.clone(), entry),
                ));
                reached.push(entry.clone());
            }
            arms.push(MatchArm::new(
                Pattern::Wildcard,
                Expr::enum_entry(target.clone(), fallback),
            ));
        } else {
            return Err(MappingError::MappingNotFound {
                path: source.name.clone(),
                requester,
                reason: format!("cannot map {} into enum {}", source.ty, target),
            });
        }

        self.check_compliance(id, &mapping, &directives, &target_entries, &reached)?;

        let dispatch = Expr::match_(Expr::ident(&source.name), arms);
        body.push(Statement::return_(present_if(mapping.target.nullable, dispatch)));
        Ok(body)
    }

    /// Naming conventions for one entry: entry directive, then the
    /// function-level directive, then the mapper defaults, per side.
    fn conventions(
        &self,
        mapping: &Mapping,
        entry: Option<&EnumDirective>,
    ) -> (Option<CaseConvention>, Option<CaseConvention>) {
        let function = mapping.enum_directives().find(|d| d.is_function_level());
        let defaults = self.mappers[mapping.owner.0].defaults;
        let source = entry
            .and_then(|d| d.source_naming)
            .or_else(|| function.and_then(|d| d.source_naming))
            .unwrap_or(defaults.enum_source_naming);
        let target = entry
            .and_then(|d| d.target_naming)
            .or_else(|| function.and_then(|d| d.target_naming))
            .unwrap_or(defaults.enum_target_naming);
        (source.convention(), target.convention())
    }

    /// Every target entry should be produced by some source entry.
    fn check_compliance(
        &mut self,
        id: MappingId,
        mapping: &Mapping,
        directives: &[&EnumDirective],
        target_entries: &[String],
        reached: &[String],
    ) -> Result<(), MappingError> {
        let function = directives
            .iter()
            .find(|d| d.is_function_level())
            .and_then(|d| d.compliance);
        let default = self.mappers[mapping.owner.0].defaults.enum_compliance;

        for entry in target_entries.iter().filter(|e| !reached.contains(e)) {
            let severity = directives
                .iter()
                .find(|d| d.target.as_deref() == Some(entry.as_str()))
                .and_then(|d| d.compliance)
                .or(function)
                .unwrap_or(default);
            match severity {
                CheckSeverity::Error => {
                    return Err(MappingError::EnumCompliance {
                        entry: format!("{}.{entry}", mapping.target.simple_name()),
                        requester: self.qualified_name(id),
                    });
                }
                CheckSeverity::Warning => {
                    let message = MappingError::EnumCompliance {
                        entry: format!("{}.{entry}", mapping.target.simple_name()),
                        requester: self.qualified_name(id),
                    }
                    .to_string();
                    debug!(%message, "enum compliance warning");
                    let location = self.mappers[mapping.owner.0].name.clone();
                    self.warnings
                        .push(Diagnostic::warning(PHASE, message).at(location));
                }
                CheckSeverity::Ignore => {}
            }
        }
        Ok(())
    }
}

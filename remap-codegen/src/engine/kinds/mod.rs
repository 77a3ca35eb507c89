//! Body writers, one per mapping kind.

mod enumeration;
mod iterable;
mod simple;

use remap_ir::{FieldDirective, MappingOption, NullabilityPolicy, TypeRef};

use super::{Engine, Mapping, MappingError, MappingId, MappingKind};
use crate::builder::{Expr, NullFallback, Statement};

impl Engine<'_> {
    /// Build the body of an unimplemented mapping.
    pub(crate) fn write_body(&mut self, id: MappingId) -> Result<Vec<Statement>, MappingError> {
        match self.mappings[id.0].kind {
            MappingKind::Simple => self.write_simple(id),
            MappingKind::Iterable => self.write_iterable(id),
            MappingKind::Enum => self.write_enum(id),
            MappingKind::Passthrough => Err(MappingError::Internal(format!(
                "{} is hand-written",
                self.qualified_name(id)
            ))),
        }
    }

    /// A nullable target returns null as soon as a nullable parameter is.
    fn null_guards(mapping: &Mapping) -> Vec<Statement> {
        if !mapping.target.nullable {
            return Vec::new();
        }
        mapping
            .sources
            .iter()
            .filter(|s| s.ty.nullable)
            .map(|s| Statement::null_guard(&s.name, Expr::Null))
            .collect()
    }

    /// Member directive, then catch-all directive, then the mapper default.
    fn nullability_policy(
        &self,
        mapping: &Mapping,
        directive: Option<&FieldDirective>,
    ) -> NullabilityPolicy {
        directive
            .and_then(|d| d.nullability)
            .or_else(|| mapping.catch_all().and_then(|d| d.nullability))
            .unwrap_or(self.mappers[mapping.owner.0].defaults.nullability)
    }

    /// How a nullable `source_path` becomes a non-null `target`. Options win
    /// over the policy.
    fn null_fallback(
        &self,
        id: MappingId,
        target: &TypeRef,
        options: &[MappingOption],
        policy: NullabilityPolicy,
        source_path: &str,
        target_name: &str,
    ) -> Result<NullFallback, MappingError> {
        if self.model.is_boolean(target) && options.contains(&MappingOption::NullBooleanToFalse) {
            return Ok(NullFallback::False);
        }
        if self.model.is_string(target) && options.contains(&MappingOption::NullStringToEmpty) {
            return Ok(NullFallback::EmptyString);
        }
        match policy {
            NullabilityPolicy::Unwrap => Ok(NullFallback::ForceUnwrap),
            NullabilityPolicy::Raise => Ok(NullFallback::Raise {
                source: source_path.to_string(),
                target: target_name.to_string(),
            }),
            NullabilityPolicy::Fail => Err(MappingError::NullabilityCompliance {
                source_path: source_path.to_string(),
                target: target_name.to_string(),
                requester: self.qualified_name(id),
            }),
        }
    }
}

/// Wrap `value` for a nullable result.
fn present_if(nullable: bool, value: Expr) -> Expr {
    if nullable { Expr::present(value) } else { value }
}

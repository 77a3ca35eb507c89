//! Member-wise construction.

use remap_ir::{FieldDirective, FieldRule, Member};
use tracing::trace;

use super::present_if;
use crate::{
    builder::{Expr, FieldInit, Statement},
    engine::{Engine, Mapping, MappingError, MappingId},
};

impl Engine<'_> {
    pub(super) fn write_simple(&mut self, id: MappingId) -> Result<Vec<Statement>, MappingError> {
        let mapping = self.mappings[id.0].clone();
        let mut body = Self::null_guards(&mapping);

        let target = mapping.target.non_null();
        let mut fields = Vec::new();
        let mut fill_defaults = false;
        for member in self.model.members(&target) {
            match self.write_member(id, &mapping, &member)? {
                Some(value) => fields.push(FieldInit::new(&member.name, value)),
                None => fill_defaults = true,
            }
        }

        let construct = Expr::Construct {
            ty: target,
            fields,
            fill_defaults,
        };
        body.push(Statement::return_(present_if(
            mapping.target.nullable,
            construct,
        )));
        Ok(body)
    }

    /// The value for one target member, or `None` to leave it defaulted.
    fn write_member(
        &mut self,
        id: MappingId,
        mapping: &Mapping,
        member: &Member,
    ) -> Result<Option<Expr>, MappingError> {
        let directive = mapping.field_directive(&member.name).cloned();
        let path = match directive.as_ref().map(|d| &d.rule) {
            Some(FieldRule::Expression(text)) => return Ok(Some(Expr::raw(text))),
            Some(FieldRule::Source(path)) => self.find_source(id, path)?,
            _ => self.source_for(mapping, &member.name),
        };

        let Some(last) = path.last() else {
            if member.has_default {
                trace!(member = %member.name, "no source, keeping default");
                return Ok(None);
            }
            return Err(MappingError::MappingNotFound {
                path: member.name.clone(),
                requester: self.qualified_name(id),
                reason: format!("no source for target member `{}`", member.name),
            });
        };

        let path_text = path
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(".");

        // Parameters of a nullable target are null-guarded.
        let guarded = mapping.target.nullable;
        for (i, element) in path[..path.len() - 1].iter().enumerate() {
            if element.ty.nullable && !(i == 0 && guarded) {
                return Err(MappingError::InvalidSourcePath {
                    path: path_text,
                    requester: self.qualified_name(id),
                    reason: format!("`{}` is nullable", element.name),
                });
            }
        }
        let property = if path.len() == 1 && guarded {
            last.non_null()
        } else {
            last.clone()
        };

        let read = Expr::path(path.iter().map(|m| m.name.clone()));
        self.write_assignment(id, member, &property, read, &path_text, directive.as_ref())
            .map(Some)
    }

    fn write_assignment(
        &mut self,
        id: MappingId,
        member: &Member,
        property: &Member,
        read: Expr,
        path_text: &str,
        directive: Option<&FieldDirective>,
    ) -> Result<Expr, MappingError> {
        let null_to_non_null = property.ty.nullable && !member.ty.nullable;
        let iterable_target = self.model.is_iterable(&member.ty);

        let fallback = if null_to_non_null && !iterable_target {
            let mapping = &self.mappings[id.0];
            let policy = self.nullability_policy(mapping, directive);
            let options = directive.map(|d| d.options.as_slice()).unwrap_or_default();
            Some(self.null_fallback(id, &member.ty, options, policy, path_text, &member.name)?)
        } else {
            None
        };

        let (value, nullable) = if null_to_non_null && iterable_target {
            // The collection function maps null to an empty collection.
            let found = self.require_mapping(&member.ty, property, id, path_text)?;
            (
                self.call(id, found, &property.ty, read)?,
                self.mappings[found.0].target.nullable,
            )
        } else if self.model.is_assignable(&member.ty, &property.ty, true) {
            (read, property.ty.nullable)
        } else if property.ty.nullable {
            let owner = self.mappings[id.0].owner;
            match self.find_mapping(&member.ty, property, id, owner, false)? {
                Some(found) => (
                    self.call(id, found, &property.ty, read)?,
                    self.mappings[found.0].target.nullable,
                ),
                None => {
                    let found = self.require_mapping(
                        &member.ty.non_null(),
                        &property.non_null(),
                        id,
                        path_text,
                    )?;
                    let flatten = self.mappings[found.0].target.nullable;
                    let element = property.ty.non_null();
                    let body = self.call(id, found, &element, Expr::ident("it"))?;
                    (Expr::null_safe(read, "it", body, flatten), true)
                }
            }
        } else {
            let found = self.require_mapping(&member.ty, property, id, path_text)?;
            (
                self.call(id, found, &property.ty, read)?,
                self.mappings[found.0].target.nullable,
            )
        };

        if nullable && !member.ty.nullable {
            let fallback = fallback.ok_or_else(|| {
                MappingError::Internal(format!("`{path_text}` is nullable without a fallback"))
            })?;
            return Ok(Expr::fallback(value, fallback));
        }
        Ok(present_if(!nullable && member.ty.nullable, value))
    }
}

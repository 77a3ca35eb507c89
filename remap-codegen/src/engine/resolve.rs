//! Mapping lookup, synthesis and source-path resolution.

use remap_core::to_snake_case;
use remap_ir::{Member, TypeRef};
use tracing::{debug, trace};

use super::{
    Engine, MapperId, MapperOrigin, Mapping, MappingError, MappingId, MappingKind, MappingState,
    Origin,
};
use crate::builder::Expr;

impl Engine<'_> {
    /// Find a function producing `target` from `source`.
    ///
    /// Looks in `owner` first, then in the declared functions of its
    /// includes. When nothing matches and `create` is set, a function is
    /// synthesized on `owner` and queued for emission.
    pub fn find_mapping(
        &mut self,
        target: &TypeRef,
        source: &Member,
        requester: MappingId,
        owner: MapperId,
        create: bool,
    ) -> Result<Option<MappingId>, MappingError> {
        let context = &self.mappings[requester.0].sources;

        let own = &self.mappers[owner.0].mappings;
        if let Some(found) = self.search(own, target, source, context, false) {
            trace!(function = %self.mappings[found.0].name, "found mapping on owner");
            return Ok(Some(found));
        }

        for included in self.mappers[owner.0].includes.keys() {
            let candidates = &self.mappers[included.0].mappings;
            if let Some(found) = self.search(candidates, target, source, context, true) {
                trace!(
                    mapper = %self.mappers[included.0].name,
                    function = %self.mappings[found.0].name,
                    "found mapping on include"
                );
                return Ok(Some(found));
            }
        }

        if !create {
            return Ok(None);
        }
        self.synthesize(target, source, requester, owner).map(Some)
    }

    fn search(
        &self,
        candidates: &[MappingId],
        target: &TypeRef,
        source: &Member,
        context: &[Member],
        declared_only: bool,
    ) -> Option<MappingId> {
        candidates.iter().copied().find(|id| {
            let candidate = &self.mappings[id.0];
            (!declared_only || candidate.is_declared())
                && self.model.is_assignable(target, &candidate.target, false)
                && self.sources_compatible(&candidate.sources, source, context)
        })
    }

    /// A candidate accepts `source` in some parameter, and every other
    /// parameter is either fed by `source` too or by a same-named parameter
    /// of the requesting function.
    fn sources_compatible(&self, params: &[Member], source: &Member, context: &[Member]) -> bool {
        let accepts = |param: &Member| self.model.is_assignable(&param.ty, &source.ty, false);
        params.iter().any(accepts)
            && params.iter().all(|param| {
                accepts(param)
                    || context.iter().any(|available| {
                        available.name == param.name
                            && self.model.is_assignable(&param.ty, &available.ty, false)
                    })
            })
    }

    fn synthesize(
        &mut self,
        target: &TypeRef,
        source: &Member,
        requester: MappingId,
        owner: MapperId,
    ) -> Result<MappingId, MappingError> {
        let not_found = |engine: &Self, reason: String| MappingError::MappingNotFound {
            path: source.name.clone(),
            requester: engine.qualified_name(requester),
            reason,
        };

        if self.mappers[owner.0].origin == MapperOrigin::Declared {
            let reason = format!(
                "{} is hand-written and has no function from {} to {}",
                self.mappers[owner.0].name, source.ty, target
            );
            return Err(not_found(self, reason));
        }

        let source_iterable = self.model.is_iterable(&source.ty);
        let kind = if self.model.is_iterable(target) {
            if !source_iterable {
                let reason = format!("cannot map {} into collection {}", source.ty, target);
                return Err(not_found(self, reason));
            }
            MappingKind::Iterable
        } else if source_iterable {
            let reason = format!("cannot map collection {} into {}", source.ty, target);
            return Err(not_found(self, reason));
        } else if self.model.is_enum(target) {
            MappingKind::Enum
        } else if self
            .model
            .declaration(&target.name)
            .is_some_and(|decl| decl.is_constructible())
        {
            MappingKind::Simple
        } else {
            let reason = format!("no conversion from {} to {}", source.ty, target);
            return Err(not_found(self, reason));
        };

        let name = self.synthesized_name(owner, &source.ty, kind);
        let directives = match kind {
            MappingKind::Enum => Vec::new(),
            _ => self.mappings[requester.0].inherited_directives(),
        };

        let id = MappingId(self.mappings.len());
        self.mappings.push(Mapping {
            name,
            owner,
            target: target.clone(),
            sources: vec![Member::new(source.name.clone(), source.ty.clone())],
            kind,
            origin: Origin::Synthesized { parent: requester },
            state: MappingState::Unimplemented,
            directives,
        });
        let mapper = &mut self.mappers[owner.0];
        mapper.mappings.push(id);
        mapper.queue.push_back(id);

        debug!(
            mapper = %self.mappers[owner.0].name,
            function = %self.mappings[id.0].name,
            %target,
            source = %source.ty,
            "synthesized mapping"
        );
        Ok(id)
    }

    /// `map_{source}`, or `map_{element}_{collection}` for collections, made
    /// unique within the mapper with a numeric suffix.
    fn synthesized_name(&self, owner: MapperId, source: &TypeRef, kind: MappingKind) -> String {
        let base = match (kind, source.element()) {
            (MappingKind::Iterable, Some(element)) => format!(
                "map_{}_{}",
                to_snake_case(element.simple_name()),
                to_snake_case(source.simple_name())
            ),
            _ => format!("map_{}", to_snake_case(source.simple_name())),
        };
        let taken = |name: &str| {
            self.mappers[owner.0]
                .mappings
                .iter()
                .any(|id| self.mappings[id.0].name == name)
        };
        if !taken(&base) {
            return base;
        }
        (1..)
            .map(|n| format!("{base}{n}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or(base)
    }

    /// Resolve a dotted source path against the parameters of `id`.
    ///
    /// The first segment names a parameter, or else a member of the first
    /// parameter; each further segment is a member of the previous element.
    pub fn find_source(&self, id: MappingId, path: &str) -> Result<Vec<Member>, MappingError> {
        let mapping = &self.mappings[id.0];
        let invalid = |reason: String| MappingError::InvalidSourcePath {
            path: path.to_string(),
            requester: self.qualified_name(id),
            reason,
        };

        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid("empty path segment".into()));
        }
        if segments.len() > 2 {
            return Err(invalid("paths may be at most two segments deep".into()));
        }

        let (head, rest) = segments
            .split_first()
            .ok_or_else(|| invalid("empty path".into()))?;
        let mut resolved = match mapping.sources.iter().find(|p| p.name == *head) {
            Some(param) => vec![param.clone()],
            None => {
                let first = mapping
                    .sources
                    .first()
                    .ok_or_else(|| invalid("the function has no parameters".into()))?;
                let member = self.member(&first.ty, head).ok_or_else(|| {
                    invalid(format!("`{head}` is neither a parameter nor a member of `{}`", first.name))
                })?;
                vec![first.clone(), member]
            }
        };

        for segment in rest {
            let parent = resolved
                .last()
                .cloned()
                .ok_or_else(|| MappingError::Internal("unresolved path head".into()))?;
            let member = self.member(&parent.ty, segment).ok_or_else(|| {
                invalid(format!("`{}` has no member `{segment}`", parent.ty))
            })?;
            resolved.push(member);
        }
        Ok(resolved)
    }

    /// The source for a target member with no directive: a same-named member
    /// of a parameter, else a same-named parameter.
    pub fn source_for(&self, mapping: &Mapping, name: &str) -> Vec<Member> {
        for param in &mapping.sources {
            if let Some(member) = self.member(&param.ty, name) {
                return vec![param.clone(), member];
            }
            if param.name == name {
                return vec![param.clone()];
            }
        }
        Vec::new()
    }

    fn member(&self, ty: &TypeRef, name: &str) -> Option<Member> {
        self.model
            .members(&ty.non_null())
            .into_iter()
            .find(|m| m.name == name)
    }

    /// Call `callee` from `caller`, through the include field when it lives
    /// on another mapper. `argument` of type `source` goes to the first
    /// parameter accepting it; the others are forwarded by name.
    pub(crate) fn call(
        &self,
        caller: MappingId,
        callee: MappingId,
        source: &TypeRef,
        argument: Expr,
    ) -> Result<Expr, MappingError> {
        let caller_owner = self.mappings[caller.0].owner;
        let callee = &self.mappings[callee.0];
        let receiver = if callee.owner == caller_owner {
            None
        } else {
            let field = self.mappers[caller_owner.0]
                .includes
                .get(&callee.owner)
                .ok_or_else(|| {
                    MappingError::Internal(format!(
                        "{} calls {} without including it",
                        self.mappers[caller_owner.0].name, self.mappers[callee.owner.0].name
                    ))
                })?;
            Some(field.clone())
        };

        let context = &self.mappings[caller.0].sources;
        let accepts = |param: &Member| self.model.is_assignable(&param.ty, source, false);
        let slot = callee.sources.iter().position(accepts).unwrap_or(0);
        let args = callee
            .sources
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let named = context.iter().any(|available| {
                    available.name == param.name
                        && self.model.is_assignable(&param.ty, &available.ty, false)
                });
                if i == slot || (!named && accepts(param)) {
                    argument.clone()
                } else {
                    Expr::ident(&param.name)
                }
            })
            .collect();
        Ok(Expr::Call {
            receiver,
            function: callee.name.clone(),
            args,
        })
    }

    /// Like [`find_mapping`](Self::find_mapping) with creation, reporting
    /// failures against the full source path.
    pub(crate) fn require_mapping(
        &mut self,
        target: &TypeRef,
        source: &Member,
        requester: MappingId,
        path: &str,
    ) -> Result<MappingId, MappingError> {
        let owner = self.mappings[requester.0].owner;
        self.find_mapping(target, source, requester, owner, true)
            .map_err(|e| e.at_path(path))?
            .ok_or_else(|| MappingError::Internal(format!("no mapping created for `{path}`")))
    }
}

//! The mapper registry.

use std::collections::VecDeque;

use indexmap::IndexMap;
use remap_core::to_snake_case;
use remap_ir::{
    FunctionDecl, InjectionStyle, MapperDecl, MapperDefaults, MapperShape, TypeRef,
};
use tracing::debug;

use super::{Engine, Mapping, MappingError, MappingId, MappingKind, MappingState, Origin};

/// Index of a mapper in the engine's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapperId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperOrigin {
    /// Gets a generated implementation.
    Annotated,
    /// Hand-written; only its declared functions may be called.
    Declared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Pending,
    Linking,
    Linked,
}

#[derive(Debug, Clone)]
pub struct Mapper {
    pub name: String,
    pub origin: MapperOrigin,
    pub shape: MapperShape,
    pub imports: Vec<String>,
    pub injection: InjectionStyle,
    pub scope: Option<String>,
    pub defaults: MapperDefaults,
    /// Transitively included mappers, each once, mapped to the field that holds it.
    pub includes: IndexMap<MapperId, String>,
    pub mappings: Vec<MappingId>,
    /// Set when the mapper was rejected; it is never written.
    pub failed: bool,
    declared_includes: Vec<String>,
    link: Link,
    pub(crate) queue: VecDeque<MappingId>,
}

impl Mapper {
    fn new(decl: &MapperDecl, origin: MapperOrigin) -> Self {
        Self {
            name: decl.name.clone(),
            origin,
            shape: decl.shape,
            imports: decl.imports.clone(),
            injection: decl.injection,
            scope: decl.scope.clone(),
            defaults: decl.defaults,
            includes: IndexMap::new(),
            mappings: Vec::new(),
            failed: false,
            declared_includes: decl.includes.clone(),
            link: Link::Pending,
            queue: VecDeque::new(),
        }
    }

    pub fn is_annotated(&self) -> bool {
        self.origin == MapperOrigin::Annotated
    }

    /// The generated implementation type.
    pub fn implementation(&self) -> String {
        format!("{}Impl", self.name)
    }
}

impl Engine<'_> {
    /// Register a mapper that gets a generated implementation.
    ///
    /// The mapper is registered even when it is rejected, so includes of it
    /// resolve; it is then marked failed.
    pub fn register(&mut self, decl: &MapperDecl) -> Result<MapperId, MappingError> {
        if let Some(id) = self.mapper_id(&decl.name) {
            return Ok(id);
        }
        let id = self.insert_mapper(Mapper::new(decl, MapperOrigin::Annotated));
        debug!(mapper = %decl.name, "registered mapper");

        let result = self.declare_all(id, decl, false);
        if result.is_err() {
            self.mappers[id.0].failed = true;
        }
        result.map(|()| id)
    }

    fn declare_all(
        &mut self,
        id: MapperId,
        decl: &MapperDecl,
        hand_written: bool,
    ) -> Result<(), MappingError> {
        if !decl.shape.is_extensible() {
            return Err(MappingError::AnnotationShape {
                declaration: decl.name.clone(),
                reason: format!(
                    "a {} declaration cannot be implemented; use an interface, an abstract or an open class",
                    decl.shape.as_str()
                ),
            });
        }
        for function in &decl.functions {
            self.declare(id, function, hand_written)?;
        }
        Ok(())
    }

    fn declare(
        &mut self,
        owner: MapperId,
        function: &FunctionDecl,
        hand_written: bool,
    ) -> Result<(), MappingError> {
        let implemented = hand_written || function.implemented;
        let target = function
            .returns
            .as_ref()
            .filter(|ty| !self.model.is_unit(ty));
        let Some(target) = target.cloned() else {
            if implemented {
                // Not a mapping function; nothing can call it.
                return Ok(());
            }
            return Err(MappingError::AmbiguousTargetReturn {
                function: format!("{}.{}", self.mappers[owner.0].name, function.name),
            });
        };

        let kind = if implemented {
            MappingKind::Passthrough
        } else {
            self.classify(&target)
        };
        let id = MappingId(self.mappings.len());
        self.mappings.push(Mapping {
            name: function.name.clone(),
            owner,
            target,
            sources: function.params.clone(),
            kind,
            origin: Origin::Declared,
            state: if implemented {
                MappingState::Implemented
            } else {
                MappingState::Unimplemented
            },
            directives: function.directives.clone(),
        });
        self.mappers[owner.0].mappings.push(id);
        Ok(())
    }

    pub(crate) fn classify(&self, target: &TypeRef) -> MappingKind {
        if self.model.is_iterable(target) {
            MappingKind::Iterable
        } else if self.model.is_enum(target) {
            MappingKind::Enum
        } else {
            MappingKind::Simple
        }
    }

    /// Resolve a mapper by name.
    ///
    /// Registered mappers win; otherwise a helper or a declared type is
    /// promoted to a declared mapper on first use.
    pub fn find_mapper(&mut self, name: &str) -> Result<MapperId, MappingError> {
        if let Some(id) = self.mapper_id(name) {
            return Ok(id);
        }
        let helpers = self.helpers;
        if let Some(decl) = helpers.get(name) {
            let id = self.insert_mapper(Mapper::new(decl, MapperOrigin::Declared));
            debug!(mapper = name, "promoted helper to declared mapper");
            self.declare_all(id, decl, true)?;
            return Ok(id);
        }
        if self.model.declaration(name).is_some() {
            let decl = MapperDecl::new(name);
            let id = self.insert_mapper(Mapper::new(&decl, MapperOrigin::Declared));
            debug!(mapper = name, "promoted type to declared mapper");
            return Ok(id);
        }
        Err(MappingError::UnresolvedMapper {
            name: name.to_string(),
        })
    }

    fn insert_mapper(&mut self, mapper: Mapper) -> MapperId {
        let id = MapperId(self.mappers.len());
        self.index.insert(mapper.name.clone(), id);
        self.mappers.push(mapper);
        id
    }

    /// Resolve and flatten the includes of `id`: nested includes come before
    /// the mapper that brought them, and each mapper appears once.
    pub fn link_includes(&mut self, id: MapperId) -> Result<(), MappingError> {
        match self.mappers[id.0].link {
            Link::Linked => return Ok(()),
            Link::Linking => {
                return Err(MappingError::AnnotationShape {
                    declaration: self.mappers[id.0].name.clone(),
                    reason: "mapper includes form a cycle".into(),
                });
            }
            Link::Pending => {}
        }
        self.mappers[id.0].link = Link::Linking;
        let result = self.flatten_includes(id);
        self.mappers[id.0].link = Link::Linked;
        let includes = result?;
        self.mappers[id.0].includes = includes;
        Ok(())
    }

    fn flatten_includes(&mut self, id: MapperId) -> Result<IndexMap<MapperId, String>, MappingError> {
        let names = self.mappers[id.0].declared_includes.clone();
        let mut flat = IndexMap::new();
        for name in &names {
            let included = self.find_mapper(name)?;
            if included == id {
                return Err(MappingError::AnnotationShape {
                    declaration: name.clone(),
                    reason: "a mapper cannot include itself".into(),
                });
            }
            self.link_includes(included)?;
            let nested: Vec<MapperId> = self.mappers[included.0].includes.keys().copied().collect();
            for mapper in nested.into_iter().chain([included]) {
                if mapper != id && !flat.contains_key(&mapper) {
                    flat.insert(mapper, self.include_field(mapper));
                }
            }
        }
        Ok(flat)
    }

    fn include_field(&self, id: MapperId) -> String {
        let name = &self.mappers[id.0].name;
        to_snake_case(name.rsplit('.').next().unwrap_or(name))
    }
}

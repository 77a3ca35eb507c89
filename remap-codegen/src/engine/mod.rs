//! The mapping resolution engine.
//!
//! Mappers and mapping functions live in two arenas indexed by [`MapperId`]
//! and [`MappingId`]. Writing a declared function may synthesize helper
//! functions on the same mapper; those are queued and written by the
//! emission driver until the queue drains, so recursive type graphs
//! terminate once every needed function exists.

mod emit;
mod error;
mod kinds;
mod mapping;
mod registry;
mod resolve;

use indexmap::IndexMap;
use remap_ir::{MapperDecl, TypeModel};

pub use emit::{Emission, emit};
pub use error::MappingError;
pub use mapping::{Mapping, MappingId, MappingKind, MappingState, Origin};
pub use registry::{Mapper, MapperId, MapperOrigin};

use crate::pipeline::Diagnostic;

/// Phase name used on diagnostics the engine produces.
pub(crate) const PHASE: &str = "generate";

/// Resolution state for one generation pass.
pub struct Engine<'a> {
    model: &'a dyn TypeModel,
    helpers: &'a IndexMap<String, MapperDecl>,
    mappers: Vec<Mapper>,
    index: IndexMap<String, MapperId>,
    mappings: Vec<Mapping>,
    warnings: Vec<Diagnostic>,
}

impl<'a> Engine<'a> {
    pub fn new(model: &'a dyn TypeModel, helpers: &'a IndexMap<String, MapperDecl>) -> Self {
        Self {
            model,
            helpers,
            mappers: Vec::new(),
            index: IndexMap::new(),
            mappings: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn mapper(&self, id: MapperId) -> &Mapper {
        &self.mappers[id.0]
    }

    pub fn mapper_id(&self, name: &str) -> Option<MapperId> {
        self.index.get(name).copied()
    }

    pub fn mapping(&self, id: MappingId) -> &Mapping {
        &self.mappings[id.0]
    }

    /// Mappings of `mapper`, declared ones first, then in creation order.
    pub fn mappings_of(&self, mapper: MapperId) -> impl Iterator<Item = &Mapping> {
        self.mappers[mapper.0]
            .mappings
            .iter()
            .map(|id| &self.mappings[id.0])
    }

    /// Warnings produced since the last call.
    pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }

    /// `Mapper.function(param, ...)`, as shown in error messages.
    pub fn qualified_name(&self, id: MappingId) -> String {
        let mapping = &self.mappings[id.0];
        let params: Vec<&str> = mapping.sources.iter().map(|s| s.name.as_str()).collect();
        format!(
            "{}.{}({})",
            self.mappers[mapping.owner.0].name,
            mapping.name,
            params.join(", ")
        )
    }
}

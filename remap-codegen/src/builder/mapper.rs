//! Generated mappers and factories.

use remap_ir::{FactoryStyle, InjectionStyle, MapperShape};

use super::FunctionSpec;

/// Everything one generation pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedOutput {
    pub mappers: Vec<MapperSpec>,
    pub factories: Vec<FactorySpec>,
}

impl GeneratedOutput {
    pub fn function_count(&self) -> usize {
        self.mappers.iter().map(|m| m.functions.len()).sum()
    }

    pub fn mapper(&self, name: &str) -> Option<&MapperSpec> {
        self.mappers.iter().find(|m| m.name == name)
    }
}

/// The implementation of one annotated mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperSpec {
    /// The declared mapper.
    pub name: String,
    /// The generated implementation type.
    pub implementation: String,
    pub shape: MapperShape,
    pub imports: Vec<String>,
    pub injection: InjectionStyle,
    pub scope: Option<String>,
    /// Included mappers, held as fields.
    pub includes: Vec<IncludeSpec>,
    /// Declared functions first, then synthesized ones in creation order.
    pub functions: Vec<FunctionSpec>,
}

impl MapperSpec {
    pub fn function(&self, name: &str) -> Option<&FunctionSpec> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// A dependency on another mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeSpec {
    pub field: String,
    pub mapper: String,
    /// Whether an implementation is generated for it.
    pub generated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorySpec {
    pub name: String,
    pub style: FactoryStyle,
    pub entries: Vec<FactoryEntry>,
}

impl FactorySpec {
    /// Dependencies that are not generated, so the factory must be given them.
    pub fn external_dependencies(&self) -> Vec<&IncludeSpec> {
        let mut external: Vec<&IncludeSpec> = Vec::new();
        for dep in self.entries.iter().flat_map(|e| &e.dependencies) {
            if !dep.generated && !external.iter().any(|d| d.mapper == dep.mapper) {
                external.push(dep);
            }
        }
        external
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryEntry {
    pub mapper: String,
    pub implementation: String,
    pub dependencies: Vec<IncludeSpec>,
}

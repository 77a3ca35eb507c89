//! Mapping functions and their lifecycle.

use remap_ir::{Directive, EnumDirective, FieldDirective, Member, TypeRef};

use super::MapperId;

/// Index of a mapping in the engine's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MappingId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    /// Member-wise construction of the target.
    Simple,
    /// Element-wise collection conversion.
    Iterable,
    /// Exhaustive entry dispatch.
    Enum,
    /// Written by hand: callable, never emitted.
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Declared,
    /// Created on demand while writing `parent`.
    Synthesized { parent: MappingId },
}

/// One-way: `Unimplemented` becomes `Implemented` once the body is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingState {
    Unimplemented,
    Implemented,
}

/// A mapping function, declared or synthesized.
#[derive(Debug, Clone)]
pub struct Mapping {
    pub name: String,
    pub owner: MapperId,
    pub target: TypeRef,
    /// Parameters, in order.
    pub sources: Vec<Member>,
    pub kind: MappingKind,
    pub origin: Origin,
    pub state: MappingState,
    pub directives: Vec<Directive>,
}

impl Mapping {
    pub fn is_declared(&self) -> bool {
        self.origin == Origin::Declared
    }

    pub fn is_implemented(&self) -> bool {
        self.state == MappingState::Implemented
    }

    /// The directive for a target member: its own, else the catch-all.
    pub fn field_directive(&self, member: &str) -> Option<&FieldDirective> {
        self.field_directives()
            .find(|d| d.target.as_deref() == Some(member))
            .or_else(|| self.catch_all())
    }

    /// The field directive without a target.
    pub fn catch_all(&self) -> Option<&FieldDirective> {
        self.field_directives().find(|d| d.target.is_none())
    }

    pub fn enum_directives(&self) -> impl Iterator<Item = &EnumDirective> {
        self.directives.iter().filter_map(|d| match d {
            Directive::Enum(directive) => Some(directive),
            Directive::Field(_) => None,
        })
    }

    /// Field directives passed down to functions synthesized for this one.
    pub fn inherited_directives(&self) -> Vec<Directive> {
        self.directives
            .iter()
            .filter(|d| matches!(d, Directive::Field(field) if field.inherit))
            .cloned()
            .collect()
    }

    fn field_directives(&self) -> impl Iterator<Item = &FieldDirective> {
        self.directives.iter().filter_map(|d| match d {
            Directive::Field(directive) => Some(directive),
            Directive::Enum(_) => None,
        })
    }
}

//! Output model for generated mappers.
//!
//! The engine produces [`MapperSpec`]s made of [`FunctionSpec`]s whose bodies
//! are [`Statement`]s over [`Expr`]essions. Renderers turn them into source
//! text with a [`CodeBuilder`].

mod code_builder;
mod expr;
mod function;
mod indent;
mod mapper;

pub use code_builder::CodeBuilder;
pub use expr::{Expr, FieldInit, MatchArm, NullFallback, Pattern};
pub use function::{FunctionSpec, ParamSpec, Statement, Visibility};
pub use indent::Indent;
pub use mapper::{FactoryEntry, FactorySpec, GeneratedOutput, IncludeSpec, MapperSpec};

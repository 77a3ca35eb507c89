//! Built-in pipeline phases.
//!
//! - [`ValidatePhase`] - runs lints on the manifest
//! - [`LowerPhase`] - turns the manifest into IR declarations
//! - [`GeneratePhase`] - resolves and emits every mapper

mod generate;
mod lower;
mod validate;

pub use generate::GeneratePhase;
pub use lower::{LowerPhase, lower_manifest};
pub use validate::{
    DuplicateFunctionLint, EnumNamingPairLint, FunctionReturnLint, Lint, LintInfo, MapperShapeLint,
    SelfIncludeLint, ValidatePhase,
};

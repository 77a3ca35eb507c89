//! Core utilities shared across the remap crates.
//!
//! Case conversion for generated identifiers and enum naming policies, and
//! writing rendered files to disk.

mod file;
mod naming;
mod utils;

pub use file::{OutputFile, WriteResult};
pub use naming::CaseConvention;
pub use utils::to_snake_case;

//! Generation pipeline.
//!
//! A [`Pipeline`] takes a parsed manifest through explicit phases
//! (validate → lower → generate), calling [`Plugin`] hooks around each one
//! and collecting [`Diagnostic`]s in a shared [`CompilationContext`].
//!
//! ```ignore
//! use remap_codegen::pipeline::Pipeline;
//!
//! let ctx = Pipeline::new().run(manifest)?;
//! for diag in ctx.warnings() {
//!     eprintln!("{diag}");
//! }
//! let output = ctx.output.as_ref();
//! ```

mod context;
mod diagnostic;
mod phase;
pub mod phases;
mod plugin;
mod runner;

pub use context::CompilationContext;
pub use diagnostic::{Diagnostic, Severity};
pub use phase::{Phase, PhaseInfo};
pub use plugin::Plugin;
pub use runner::Pipeline;

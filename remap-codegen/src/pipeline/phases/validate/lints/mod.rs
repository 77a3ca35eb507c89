//! Built-in lints.

mod duplicate_function;
mod enum_naming_pair;
mod function_return;
mod mapper_shape;
mod self_include;

pub use duplicate_function::DuplicateFunctionLint;
pub use enum_naming_pair::EnumNamingPairLint;
pub use function_return::FunctionReturnLint;
pub use mapper_shape::MapperShapeLint;
pub use self_include::SelfIncludeLint;

pub mod decl;
pub mod func;
pub mod index;
pub mod registry;
pub mod scan;
pub mod span;
pub mod text;
pub mod vars;

pub use decl::{ImportRef, TypeAlias};
pub use func::FunctionDef;
pub use index::{DocumentIndex, Edit, SignatureRepr};
pub use registry::{DocumentRegistry, ModuleLoader};
pub use span::{Position, Span};
pub use vars::{Variable, VariableBlock};

#[cfg(test)]
mod decl_test;
#[cfg(test)]
mod registry_test;
#[cfg(test)]
mod scan_test;

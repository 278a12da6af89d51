//! Structural analysis
//!
//! Stage-one parsing turns a token list into a [`ContextDescriptor`]; the
//! optional function-grammar helper then reads a descriptor's narrowed data.

mod descriptor;
mod function;
mod parser;

pub use descriptor::{ContextAction, ContextDescriptor, ContextTarget};
pub use function::{parse_function, Function, Parameter};
pub use parser::classify;

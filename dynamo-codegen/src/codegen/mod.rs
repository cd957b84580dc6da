//! Code generation module

mod code_generator;
mod context;
mod crud_generator;
mod model_generator;
mod naming;
mod templates;
mod type_resolver;
mod writer;

pub use code_generator::*;
pub use context::*;
pub use naming::*;
pub use templates::*;
pub use type_resolver::*;
pub use writer::*;

//! Input JSON parsing and validation

mod input_parser;
mod metadata;

pub use input_parser::*;
pub use metadata::*;

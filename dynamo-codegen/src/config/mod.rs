//! Configuration loading and defaults

pub mod defaults;
mod settings;

pub use settings::*;

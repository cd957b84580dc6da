//! Table metadata resolution against the live store

mod dynamo;
mod reconcile;
mod source;
mod table_resolver;

pub use dynamo::*;
pub use reconcile::*;
pub use source::*;
pub use table_resolver::*;

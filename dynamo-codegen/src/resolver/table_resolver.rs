//! Partition tables into resolved and unprocessed

use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use tracing::{info, warn};

use super::reconcile::reconcile;
use super::source::{MetadataSource, ResolveError};
use crate::parser::{InputSchema, TableMetadata};

/// Outcome of resolving every requested table.
///
/// A table name is in exactly one of the two maps. Both keep request order.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub resolved: IndexMap<String, TableMetadata>,
    pub unprocessed: IndexMap<String, ResolveError>,
}

impl Resolution {
    /// Check if a table resolved
    pub fn is_resolved(&self, table_name: &str) -> bool {
        self.resolved.contains_key(table_name)
    }

    /// Check if any table failed
    pub fn has_unprocessed(&self) -> bool {
        !self.unprocessed.is_empty()
    }

    /// Resolved tables in request order
    pub fn resolved_tables(&self) -> Vec<&TableMetadata> {
        self.resolved.values().collect()
    }

    /// Human-readable list of unprocessed tables, one per line
    pub fn unprocessed_summary(&self) -> String {
        unprocessed_summary(&self.unprocessed)
    }

    fn record(&mut self, table_name: String, outcome: Result<TableMetadata, ResolveError>) {
        match outcome {
            Ok(table) => {
                info!(
                    "Resolved table {} ({} attributes, {} indexes)",
                    table_name,
                    table.attributes.len(),
                    table.indexes.len()
                );
                self.unprocessed.shift_remove(&table_name);
                self.resolved.insert(table_name, table);
            }
            Err(reason) => {
                warn!("Table {} not processed: {}", table_name, reason);
                self.resolved.shift_remove(&table_name);
                self.unprocessed.insert(table_name, reason);
            }
        }
    }
}

/// End-of-run warning listing each unprocessed table and its reason
pub fn unprocessed_summary(unprocessed: &IndexMap<String, ResolveError>) -> String {
    let mut summary = String::from("The following tables are not processed:\n");
    for (name, reason) in unprocessed {
        summary.push_str(&format!("  {}: {}\n", name, reason));
    }
    summary
}

/// Look up and reconcile every named table.
///
/// Failures are recorded per table and never abort the run. At most
/// `concurrency` lookups are in flight; results are recorded in request order
/// so the partition does not depend on completion order.
pub async fn resolve_tables<S>(
    source: &S,
    table_names: &[String],
    schema: &InputSchema,
    concurrency: usize,
) -> Resolution
where
    S: MetadataSource + ?Sized,
{
    info!(
        "Resolving {} tables (concurrency {})",
        table_names.len(),
        concurrency.max(1)
    );

    let outcomes: Vec<(String, Result<TableMetadata, ResolveError>)> =
        stream::iter(table_names)
            .map(|name| async move {
                let outcome = match schema.get(name) {
                    Some(spec) => match source.describe_table(name).await {
                        Ok(live) => reconcile(spec, &live),
                        Err(e) => Err(e),
                    },
                    None => Err(ResolveError::Reconcile(format!(
                        "table {} is not declared in the input",
                        name
                    ))),
                };
                (name.clone(), outcome)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

    let mut resolution = Resolution::default();
    for (name, outcome) in outcomes {
        resolution.record(name, outcome);
    }
    resolution
}

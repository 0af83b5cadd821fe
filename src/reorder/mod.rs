// Reorder - computes a creation order for a set of models

pub mod graph;
pub mod sorter;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::Config;
use crate::core::schema::{ModelDescriptor, ModelSchema, SchemaRef};
use crate::ent_framework::MetadataProvider;
use crate::error::ReorderResult;

pub use graph::{DependencyGraph, DependencyRecord};
pub use sorter::{CycleEdge, Linearized, Sorter};

/// Collects model descriptors and orders them in one run.
///
/// ```ignore
/// let ordering = Reorder::new(&registry, &config)
///     .add_models(["Order", "Customer"])
///     .parse()?;
/// for table in ordering.ordered_tables() { /* create table */ }
/// ```
pub struct Reorder<'a, P: MetadataProvider + ?Sized> {
    provider: &'a P,
    auto_add: bool,
    models: Vec<ModelDescriptor>,
}

impl<'a, P: MetadataProvider + ?Sized> Reorder<'a, P> {
    pub fn new(provider: &'a P, config: &Config) -> Self {
        Self {
            provider,
            auto_add: config.auto_add,
            models: Vec::new(),
        }
    }

    pub fn add_model(mut self, model: impl Into<ModelDescriptor>) -> Self {
        self.models.push(model.into());
        self
    }

    pub fn add_models<I, D>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ModelDescriptor>,
    {
        self.models.extend(models.into_iter().map(Into::into));
        self
    }

    /// Builds the dependency graph and linearizes it.
    pub fn parse(self) -> ReorderResult<Ordering> {
        let mut graph = DependencyGraph::new(self.provider, self.auto_add);
        let mut unresolved = Vec::new();

        for model in &self.models {
            match model {
                ModelDescriptor::Raw(value) => {
                    warn!(value = %value, "raw model descriptor is not resolved and will not be ordered");
                    unresolved.push(value.clone());
                }
                ModelDescriptor::Model(_) => graph.parse(model, true)?,
            }
        }

        let linearized = Sorter::new().linearize(&mut graph)?;
        let (records, parse_order) = graph.into_parts();

        info!(
            requested = self.models.len(),
            parsed = records.len(),
            ordered = linearized.tables.len(),
            cycles = linearized.cycles.len(),
            "computed model order"
        );

        Ok(Ordering {
            tables: linearized.tables,
            records,
            parse_order,
            unresolved,
            cycles: linearized.cycles,
        })
    }
}

/// Result of a reorder run
#[derive(Debug, Clone)]
pub struct Ordering {
    tables: Vec<String>,
    records: HashMap<String, DependencyRecord>,
    parse_order: Vec<String>,
    unresolved: Vec<String>,
    cycles: Vec<CycleEdge>,
}

impl Ordering {
    /// Tables in creation order
    pub fn ordered_tables(&self) -> &[String] {
        &self.tables
    }

    pub fn ordered_schemas(&self) -> Vec<&ModelSchema> {
        self.tables
            .iter()
            .filter_map(|table| self.records.get(table))
            .map(|record| &record.schema)
            .collect()
    }

    /// Descriptors of the ordered models, ready to hand to a migrator
    pub fn ordered_models(&self) -> Vec<ModelDescriptor> {
        self.ordered_schemas()
            .into_iter()
            .map(|schema| ModelDescriptor::model(&schema.name))
            .collect()
    }

    /// Every schema parsed during the run, ordered or not, in parse order
    pub fn schemas(&self) -> Vec<&ModelSchema> {
        self.parse_order
            .iter()
            .filter_map(|table| self.records.get(table))
            .map(|record| &record.schema)
            .collect()
    }

    pub fn schema(&self, table: &str) -> Option<&ModelSchema> {
        self.records.get(table).map(|record| &record.schema)
    }

    pub fn dependencies(&self, table: &str) -> Option<&[SchemaRef]> {
        self.records.get(table).map(|record| record.depends.as_slice())
    }

    pub fn position(&self, table: &str) -> Option<usize> {
        self.tables.iter().position(|t| t == table)
    }

    /// Raw string descriptors that were passed in but never resolved.
    ///
    /// Raw strings are not looked up against table names, so they never appear
    /// in the ordering.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Dependency edges dropped to break cycles
    pub fn cycles(&self) -> &[CycleEdge] {
        &self.cycles
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

//! Dependency graph construction.
//!
//! Each model is resolved once per run into a [`DependencyRecord`]: its schema
//! plus the schemas whose tables have to exist first. Relationship kinds only
//! say which side holds the key column, so the builder maps them onto creation
//! order:
//!
//! - belongs-to: the target must exist first
//! - has-one / has-many: the target depends on us, never the reverse
//! - many-to-many: the join table and (unless the target already depends on
//!   us) the target must exist first; both get parsed as discovered models

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::core::schema::{ModelDescriptor, ModelSchema, RelationKind, SchemaRef};
use crate::ent_framework::MetadataProvider;
use crate::error::ReorderResult;

/// A parsed schema and the schemas it directly depends on
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyRecord {
    pub schema: ModelSchema,
    pub depends: Vec<SchemaRef>,
}

impl DependencyRecord {
    fn new(schema: ModelSchema) -> Self {
        Self {
            schema,
            depends: Vec::new(),
        }
    }

    /// Adds a dependency unless it is already present or points at ourselves
    fn depend_on(&mut self, target: &SchemaRef) {
        if target.table == self.schema.table || self.depends.iter().any(|d| d.table == target.table)
        {
            return;
        }
        self.depends.push(target.clone());
    }
}

pub struct DependencyGraph<'a, P: MetadataProvider + ?Sized> {
    provider: &'a P,
    auto_add: bool,
    parsed: HashSet<String>,
    parsed_models: HashMap<String, String>,
    records: HashMap<String, DependencyRecord>,
    parse_order: Vec<String>,
    explicit: Vec<String>,
    explicit_set: HashSet<String>,
}

impl<'a, P: MetadataProvider + ?Sized> DependencyGraph<'a, P> {
    pub fn new(provider: &'a P, auto_add: bool) -> Self {
        Self {
            provider,
            auto_add,
            parsed: HashSet::new(),
            parsed_models: HashMap::new(),
            records: HashMap::new(),
            parse_order: Vec::new(),
            explicit: Vec::new(),
            explicit_set: HashSet::new(),
        }
    }

    pub fn auto_add(&self) -> bool {
        self.auto_add
    }

    /// Resolves `descriptor` and records its dependencies.
    ///
    /// A model or table already parsed in this run is not parsed again; this
    /// guard is what stops self- and mutually-referencing schemas from recursing forever.
    /// A later request with `add_to_list` still lists a model first reached as a
    /// discovered one.
    pub fn parse(&mut self, descriptor: &ModelDescriptor, add_to_list: bool) -> ReorderResult<()> {
        if let Some(table) = self.parsed_models.get(descriptor.as_str()).cloned() {
            if add_to_list {
                self.push_explicit(&table);
            }
            return Ok(());
        }
        let schema = self.provider.resolve(descriptor)?;
        self.parsed_models
            .insert(schema.name.clone(), schema.table.clone());
        if !self.parsed.insert(schema.table.clone()) {
            if add_to_list {
                self.push_explicit(&schema.table);
            }
            return Ok(());
        }
        debug!(model = %schema.name, table = %schema.table, "parsing dependencies");

        let mut owned = Vec::new();
        let mut depended_on = HashSet::new();
        let mut pending = VecDeque::new();
        for rel in &schema.relationships {
            if rel.kind == RelationKind::BelongsTo && !schema.is_self_reference(rel) {
                owned.push(rel.target.clone());
            }
            if rel.kind.is_depended_upon() {
                depended_on.insert(rel.target.table.clone());
            }
            if let Some(join) = &rel.join {
                pending.push_back((rel.target.clone(), join.clone()));
            }
        }

        let mut record = DependencyRecord::new(schema);
        for target in &owned {
            record.depend_on(target);
        }

        // Join expansion runs after the scan so `depended_on` is complete
        let mut discovered = Vec::new();
        while let Some((target, join)) = pending.pop_front() {
            if depended_on.contains(&target.table) {
                discovered.push(target);
            } else {
                record.depend_on(&target);
            }
            record.depend_on(&join);
            discovered.push(join);
        }

        let table = record.schema.table.clone();
        self.records.insert(table.clone(), record);
        self.parse_order.push(table.clone());
        if add_to_list {
            self.push_explicit(&table);
        }

        for schema_ref in discovered {
            debug!(from = %table, model = %schema_ref.model, "discovered related model");
            self.parse(&schema_ref.descriptor(), self.auto_add)?;
        }

        Ok(())
    }

    fn push_explicit(&mut self, table: &str) {
        if self.explicit_set.insert(table.to_string()) {
            self.explicit.push(table.to_string());
        }
    }

    pub fn contains(&self, table: &str) -> bool {
        self.records.contains_key(table)
    }

    pub fn record(&self, table: &str) -> Option<&DependencyRecord> {
        self.records.get(table)
    }

    /// Tables to start the traversal from, in the order they were requested
    pub fn explicit(&self) -> &[String] {
        &self.explicit
    }

    pub fn is_explicit(&self, table: &str) -> bool {
        self.explicit_set.contains(table)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn into_parts(self) -> (HashMap<String, DependencyRecord>, Vec<String>) {
        (self.records, self.parse_order)
    }
}

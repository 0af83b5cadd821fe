// Hand-built schemas for exercising the builder and sorter without a registry

use std::cell::RefCell;
use std::collections::HashMap;

use crate::core::schema::{ModelDescriptor, ModelSchema, RelationKind, Relationship, SchemaRef};
use crate::ent_framework::MetadataProvider;
use crate::error::{ReorderError, ReorderResult};

pub struct MapProvider {
    schemas: HashMap<String, ModelSchema>,
    resolved: RefCell<HashMap<String, usize>>,
}

impl MapProvider {
    pub fn new(schemas: Vec<ModelSchema>) -> Self {
        Self {
            schemas: schemas.into_iter().map(|s| (s.name.clone(), s)).collect(),
            resolved: RefCell::new(HashMap::new()),
        }
    }

    pub fn resolve_count(&self, model: &str) -> usize {
        self.resolved.borrow().get(model).copied().unwrap_or(0)
    }
}

impl MetadataProvider for MapProvider {
    fn resolve(&self, descriptor: &ModelDescriptor) -> ReorderResult<ModelSchema> {
        *self
            .resolved
            .borrow_mut()
            .entry(descriptor.as_str().to_string())
            .or_default() += 1;
        self.schemas
            .get(descriptor.as_str())
            .cloned()
            .ok_or_else(|| ReorderError::metadata_parse(descriptor.to_string(), "unknown model"))
    }
}

pub fn model(name: &str, table: &str, relationships: Vec<Relationship>) -> ModelSchema {
    let mut schema = ModelSchema::new(name, table);
    schema.relationships = relationships;
    schema
}

fn relation(name: &str, kind: RelationKind, model: &str, table: &str) -> Relationship {
    Relationship {
        name: name.to_string(),
        kind,
        target: SchemaRef::new(model, table),
        join: None,
    }
}

pub fn belongs_to(name: &str, model: &str, table: &str) -> Relationship {
    relation(name, RelationKind::BelongsTo, model, table)
}

pub fn has_many(name: &str, model: &str, table: &str) -> Relationship {
    relation(name, RelationKind::HasMany, model, table)
}

pub fn many_to_many(
    name: &str,
    model: &str,
    table: &str,
    join_model: &str,
    join_table: &str,
) -> Relationship {
    Relationship {
        join: Some(SchemaRef::new(join_model, join_table)),
        ..relation(name, RelationKind::ManyToMany, model, table)
    }
}

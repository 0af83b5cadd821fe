// Ent Schema Framework - declarative model definitions
// Schemas are declared as code and resolved into table metadata by the registry

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::naming::NamingStrategy;
use crate::core::schema::{
    DataType, Field, ModelDescriptor, ModelSchema, RelationKind, Relationship, SchemaRef,
};
use crate::ent_framework::provider::MetadataProvider;
use crate::error::{ReorderError, ReorderResult};

/// Annotation that overrides the derived table name.
pub const TABLE_NAME_ANNOTATION: &str = "table_name";

/// Schema definition trait - one implementation per model
pub trait EntSchema {
    /// Declaring type name, e.g. `Customer`
    fn name() -> &'static str
    where
        Self: Sized;

    /// Define fields for this model
    fn fields() -> Vec<FieldDefinition>
    where
        Self: Sized;

    /// Define edges (relationships) for this model
    fn edges() -> Vec<EdgeDefinition>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Define annotations for this model
    fn annotations() -> Vec<AnnotationDefinition>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

/// Field definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: FieldType,
    pub optional: bool,
    pub default: Option<FieldDefault>,
    pub unique: bool,
    pub comment: Option<String>,
    pub size: u32,
    pub storage_key: Option<String>,
    pub skip_migration: bool,
    pub annotations: Vec<AnnotationDefinition>,
}

impl FieldDefinition {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            optional: false,
            default: None,
            unique: false,
            comment: None,
            size: 0,
            storage_key: None,
            skip_migration: false,
            annotations: Vec::new(),
        }
    }

    /// Mark field as optional (nullable column)
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark field as unique
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Add default value
    pub fn default_value(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Store the field under an explicit column name
    pub fn storage_key(mut self, column: &str) -> Self {
        self.storage_key = Some(column.to_string());
        self
    }

    /// Keep the field on the model but out of migrations
    pub fn skip_migration(mut self) -> Self {
        self.skip_migration = true;
        self
    }

    pub fn annotate(mut self, name: &str, value: &str) -> Self {
        self.annotations.push(AnnotationDefinition {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }
}

/// Field types supported by the schema layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Int,
    Int64,
    Uint,
    Float,
    Bool,
    Time,
    UUID,
    Bytes,
    JSON,
    Enum(Vec<String>),
    /// A type the schema layer has no column mapping for
    Custom(String),
}

impl FieldType {
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            FieldType::String | FieldType::Enum(_) => Some(DataType::String),
            FieldType::Int | FieldType::Int64 => Some(DataType::Int),
            FieldType::Uint => Some(DataType::Uint),
            FieldType::Float => Some(DataType::Float),
            FieldType::Bool => Some(DataType::Bool),
            FieldType::Time => Some(DataType::Time),
            FieldType::UUID => Some(DataType::Uuid),
            FieldType::Bytes => Some(DataType::Bytes),
            FieldType::JSON => Some(DataType::Json),
            FieldType::Custom(_) => None,
        }
    }

    pub fn rust_type(&self) -> String {
        match self {
            FieldType::String | FieldType::Enum(_) => "String".to_string(),
            FieldType::Int => "i32".to_string(),
            FieldType::Int64 => "i64".to_string(),
            FieldType::Uint => "u64".to_string(),
            FieldType::Float => "f64".to_string(),
            FieldType::Bool => "bool".to_string(),
            FieldType::Time => "std::time::SystemTime".to_string(),
            FieldType::UUID => "uuid::Uuid".to_string(),
            FieldType::Bytes => "Vec<u8>".to_string(),
            FieldType::JSON => "serde_json::Value".to_string(),
            FieldType::Custom(name) => name.clone(),
        }
    }
}

/// Field default values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldDefault {
    String(String),
    Int(i32),
    Int64(i64),
    Float(f64),
    Bool(bool),
    Function(String), // Evaluated by the database, e.g. `now()`
}

impl FieldDefault {
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            FieldDefault::String(s) => serde_json::Value::String(s.clone()),
            FieldDefault::Int(i) => serde_json::json!(i),
            FieldDefault::Int64(i) => serde_json::json!(i),
            FieldDefault::Float(f) => serde_json::json!(f),
            FieldDefault::Bool(b) => serde_json::Value::Bool(*b),
            FieldDefault::Function(name) => serde_json::Value::String(format!("{}()", name)),
        }
    }
}

/// Edge definition - a relationship to another model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDefinition {
    pub name: String,
    pub target_entity: String,
    pub edge_type: EdgeType,
    pub cardinality: EdgeCardinality,
    pub required: bool,
    pub inverse_name: Option<String>,
    /// Join model for many-to-many edges
    pub storage_key: Option<String>,
}

impl EdgeDefinition {
    /// Create an edge to another model (owner side, key lives on the target)
    pub fn to(name: &str, target: &str) -> Self {
        Self {
            name: name.to_string(),
            target_entity: target.to_string(),
            edge_type: EdgeType::To,
            cardinality: EdgeCardinality::OneToMany,
            required: false,
            inverse_name: None,
            storage_key: None,
        }
    }

    /// Create an edge from another model (back-reference, key lives here)
    pub fn from(name: &str, target: &str, inverse_edge: &str) -> Self {
        Self {
            name: name.to_string(),
            target_entity: target.to_string(),
            edge_type: EdgeType::From,
            cardinality: EdgeCardinality::ManyToOne,
            required: false,
            inverse_name: Some(inverse_edge.to_string()),
            storage_key: None,
        }
    }

    /// Mark edge as unique (O2O)
    pub fn unique(mut self) -> Self {
        if self.cardinality == EdgeCardinality::OneToMany {
            self.cardinality = EdgeCardinality::OneToOne;
        }
        self
    }

    /// Mark edge as required (NOT NULL foreign key)
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set inverse edge name on the target
    pub fn inverse(mut self, name: &str) -> Self {
        self.inverse_name = Some(name.to_string());
        self
    }

    /// Link both sides through a join model (M2M)
    pub fn through(mut self, join: &str) -> Self {
        self.cardinality = EdgeCardinality::ManyToMany;
        self.storage_key = Some(join.to_string());
        self
    }

    pub fn relation_kind(&self) -> RelationKind {
        match (&self.edge_type, &self.cardinality) {
            (_, EdgeCardinality::ManyToMany) => RelationKind::ManyToMany,
            (EdgeType::From, _) => RelationKind::BelongsTo,
            (EdgeType::To, EdgeCardinality::OneToOne) => RelationKind::HasOne,
            (EdgeType::To, _) => RelationKind::HasMany,
        }
    }

    pub fn join_model(&self) -> Option<&str> {
        match self.cardinality {
            EdgeCardinality::ManyToMany => self.storage_key.as_deref(),
            _ => None,
        }
    }
}

/// Edge types - direction of relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EdgeType {
    To,   // This model owns the relationship
    From, // This model is referenced by the relationship
}

/// Edge cardinality - relationship multiplicity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EdgeCardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

/// Annotation definition for metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDefinition {
    pub name: String,
    pub value: String,
}

impl AnnotationDefinition {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct ModelDefinition {
    name: String,
    table_name: Option<String>,
    fields: Vec<FieldDefinition>,
    edges: Vec<EdgeDefinition>,
}

/// Join model synthesized from a many-to-many edge
#[derive(Debug, Clone)]
struct JoinDefinition {
    name: String,
    owner: String,
    target: String,
    edge: String,
}

/// Schema registry - holds all defined schemas and resolves them into tables
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    naming: NamingStrategy,
    models: HashMap<String, ModelDefinition>,
    joins: HashMap<String, JoinDefinition>,
    registration_order: Vec<String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_naming(naming: NamingStrategy) -> Self {
        Self {
            naming,
            ..Self::default()
        }
    }

    /// Register a schema
    pub fn register<T: EntSchema>(&mut self) {
        let name = T::name().to_string();
        let edges = T::edges();
        let table_name = T::annotations()
            .into_iter()
            .find(|a| a.name == TABLE_NAME_ANNOTATION)
            .map(|a| a.value);

        for edge in &edges {
            if let Some(join) = edge.join_model() {
                self.joins
                    .entry(join.to_string())
                    .or_insert_with(|| JoinDefinition {
                        name: join.to_string(),
                        owner: name.clone(),
                        target: edge.target_entity.clone(),
                        edge: edge.name.clone(),
                    });
            }
        }

        if !self.models.contains_key(&name) {
            self.registration_order.push(name.clone());
        }
        debug!(model = %name, "registered schema");
        self.models.insert(
            name.clone(),
            ModelDefinition {
                name,
                table_name,
                fields: T::fields(),
                edges,
            },
        );
    }

    /// Registered model names, in registration order
    pub fn model_names(&self) -> &[String] {
        &self.registration_order
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains_key(model) || self.joins.contains_key(model)
    }

    /// Table a model maps to, whether or not it is registered
    pub fn table_for(&self, model: &str) -> String {
        if let Some(def) = self.models.get(model) {
            return def
                .table_name
                .clone()
                .unwrap_or_else(|| self.naming.table_name(model));
        }
        if self.joins.contains_key(model) {
            return self.naming.join_table_name(model);
        }
        self.naming.table_name(model)
    }

    fn schema_ref(&self, model: &str) -> SchemaRef {
        SchemaRef::new(model, &self.table_for(model))
    }

    /// Validate schema consistency
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for name in &self.registration_order {
            let Some(def) = self.models.get(name) else {
                continue;
            };
            for edge in &def.edges {
                // Check if target model exists
                let Some(target) = self.models.get(&edge.target_entity) else {
                    errors.push(format!(
                        "Model {} has edge '{}' pointing to undefined model {}",
                        name, edge.name, edge.target_entity
                    ));
                    continue;
                };

                if let Some(inverse) = &edge.inverse_name {
                    if !target.edges.iter().any(|e| &e.name == inverse) {
                        errors.push(format!(
                            "Edge '{}' on {} has no corresponding inverse '{}' on {}",
                            edge.name, name, inverse, edge.target_entity
                        ));
                    }
                }

                if edge.cardinality == EdgeCardinality::ManyToMany && edge.storage_key.is_none() {
                    errors.push(format!(
                        "Many-to-many edge '{}' on {} has no join model",
                        edge.name, name
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn build_model(&self, def: &ModelDefinition) -> ModelSchema {
        let table = self.table_for(&def.name);
        let mut schema = ModelSchema::new(&def.name, &table);

        if !def.fields.iter().any(|f| f.name == "id") {
            let mut id = Field::new("id", "id", DataType::Int, "i64");
            id.primary_key = true;
            id.auto_increment = true;
            id.not_null = true;
            schema.fields.push(id);
        }

        for field in &def.fields {
            schema.fields.push(self.build_field(field));
        }

        for edge in &def.edges {
            let kind = edge.relation_kind();
            if kind == RelationKind::BelongsTo {
                let column = self.naming.foreign_key(&edge.name);
                let mut key = Field::new(
                    &format!("{}_id", edge.name),
                    &column,
                    DataType::Int,
                    if edge.required { "i64" } else { "Option<i64>" },
                );
                key.not_null = edge.required;
                key.is_ptr = !edge.required;
                key.tags.insert("foreignKey".to_string(), column.clone());
                schema.fields.push(key);
            }

            schema.relationships.push(Relationship {
                name: edge.name.clone(),
                kind,
                target: self.schema_ref(&edge.target_entity),
                join: edge.join_model().map(|join| self.schema_ref(join)),
            });
        }

        schema
    }

    fn build_field(&self, def: &FieldDefinition) -> Field {
        let db_name = def
            .storage_key
            .clone()
            .unwrap_or_else(|| self.naming.column_name(&def.name));
        let rust_type = def.field_type.rust_type();
        let full_type_name = if def.optional {
            format!("Option<{}>", rust_type)
        } else {
            rust_type
        };

        let mut field = Field::new(&def.name, &db_name, DataType::String, &full_type_name);
        field.data_type = def.field_type.data_type();
        field.size = def.size;
        field.unique = def.unique;
        field.comment = def.comment.clone().unwrap_or_default();
        field.not_null = !def.optional;
        field.is_ptr = def.optional;
        field.ignore_migration = def.skip_migration;
        if let Some(default) = &def.default {
            field.has_default_value = true;
            field.default_value = default.to_value();
        }
        field.tags = def
            .annotations
            .iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect::<BTreeMap<_, _>>();
        if let FieldType::Enum(values) = &def.field_type {
            field.tags.insert("enum".to_string(), values.join(","));
        }
        field
    }

    fn build_join(&self, join: &JoinDefinition) -> ModelSchema {
        let table = self.naming.join_table_name(&join.name);
        let mut schema = ModelSchema::new(&join.name, &table);

        let owner_key = self.naming.foreign_key(&join.owner);
        let target_key = if join.owner == join.target {
            self.naming.foreign_key(&join.edge)
        } else {
            self.naming.foreign_key(&join.target)
        };

        for key in [owner_key, target_key] {
            let mut field = Field::new(&key, &key, DataType::Int, "i64");
            field.primary_key = true;
            field.not_null = true;
            schema.fields.push(field);
        }

        schema
    }
}

impl MetadataProvider for SchemaRegistry {
    fn resolve(&self, descriptor: &ModelDescriptor) -> ReorderResult<ModelSchema> {
        let name = match descriptor {
            ModelDescriptor::Model(name) => name,
            ModelDescriptor::Raw(_) => {
                return Err(ReorderError::metadata_parse(
                    descriptor.to_string(),
                    "raw strings carry no schema",
                ))
            }
        };

        if let Some(def) = self.models.get(name) {
            return Ok(self.build_model(def));
        }
        if let Some(join) = self.joins.get(name) {
            return Ok(self.build_join(join));
        }

        Err(ReorderError::metadata_parse(
            name.as_str(),
            "model is not registered",
        ))
    }
}

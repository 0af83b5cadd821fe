// Resolved schema model - what a metadata provider hands to the graph builder

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-supplied handle for a model to schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelDescriptor {
    /// A model known to the metadata provider, by declaring type name.
    Model(String),
    /// A raw string. Collected but never resolved into a schema.
    Raw(String),
}

impl ModelDescriptor {
    pub fn model(name: &str) -> Self {
        ModelDescriptor::Model(name.to_string())
    }

    pub fn raw(value: &str) -> Self {
        ModelDescriptor::Raw(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            ModelDescriptor::Model(name) | ModelDescriptor::Raw(name) => name,
        }
    }
}

impl fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelDescriptor::Model(name) => write!(f, "{}", name),
            ModelDescriptor::Raw(value) => write!(f, "raw({:?})", value),
        }
    }
}

impl From<&str> for ModelDescriptor {
    fn from(name: &str) -> Self {
        ModelDescriptor::model(name)
    }
}

/// Logical column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Time,
    Bytes,
    Json,
    Uuid,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::Uint => "uint",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Time => "time",
            DataType::Bytes => "bytes",
            DataType::Json => "json",
            DataType::Uuid => "uuid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub db_name: String,
    /// `None` when the provider could not map the field to a column type.
    pub data_type: Option<DataType>,
    pub full_type_name: String,
    pub size: u32,
    pub unique: bool,
    pub comment: String,
    pub not_null: bool,
    pub is_ptr: bool,
    pub has_default_value: bool,
    pub default_value: serde_json::Value,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub ignore_migration: bool,
    pub tags: BTreeMap<String, String>,
}

impl Field {
    pub fn new(name: &str, db_name: &str, data_type: DataType, full_type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            db_name: db_name.to_string(),
            data_type: Some(data_type),
            full_type_name: full_type_name.to_string(),
            size: 0,
            unique: false,
            comment: String::new(),
            not_null: false,
            is_ptr: false,
            has_default_value: false,
            default_value: serde_json::Value::Null,
            primary_key: false,
            auto_increment: false,
            ignore_migration: false,
            tags: BTreeMap::new(),
        }
    }

    /// A field that takes part in migrations and therefore in exports.
    pub fn is_migratable(&self) -> bool {
        !self.ignore_migration && self.data_type.is_some()
    }
}

/// Reference to another schema: the model to resolve and the table it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaRef {
    pub model: String,
    pub table: String,
}

impl SchemaRef {
    pub fn new(model: &str, table: &str) -> Self {
        Self {
            model: model.to_string(),
            table: table.to_string(),
        }
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor::model(&self.model)
    }
}

/// Which side of a relationship holds the key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// This schema holds the key pointing at the target.
    BelongsTo,
    /// The target holds a key pointing back at this schema.
    HasOne,
    HasMany,
    /// Both sides are linked through a join schema.
    ManyToMany,
}

impl RelationKind {
    /// The target depends on the owner, not the other way round.
    pub fn is_depended_upon(&self) -> bool {
        matches!(self, RelationKind::HasOne | RelationKind::HasMany)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    pub kind: RelationKind,
    pub target: SchemaRef,
    pub join: Option<SchemaRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    pub table: String,
    pub fields: Vec<Field>,
    pub relationships: Vec<Relationship>,
}

impl ModelSchema {
    pub fn new(name: &str, table: &str) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            fields: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn schema_ref(&self) -> SchemaRef {
        SchemaRef::new(&self.name, &self.table)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_self_reference(&self, relationship: &Relationship) -> bool {
        relationship.target.table == self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_display() {
        assert_eq!(ModelDescriptor::model("User").to_string(), "User");
        assert_eq!(ModelDescriptor::raw("users").to_string(), "raw(\"users\")");
        assert_eq!(ModelDescriptor::from("Order"), ModelDescriptor::Model("Order".into()));
    }

    #[test]
    fn test_migratable_fields() {
        let mut field = Field::new("name", "name", DataType::String, "String");
        assert!(field.is_migratable());

        field.ignore_migration = true;
        assert!(!field.is_migratable());

        let mut untyped = Field::new("blob", "blob", DataType::Bytes, "Vec<u8>");
        untyped.data_type = None;
        assert!(!untyped.is_migratable());
    }

    #[test]
    fn test_relation_direction() {
        assert!(RelationKind::HasMany.is_depended_upon());
        assert!(RelationKind::HasOne.is_depended_upon());
        assert!(!RelationKind::BelongsTo.is_depended_upon());
        assert!(!RelationKind::ManyToMany.is_depended_upon());
    }

    #[test]
    fn test_self_reference() {
        let schema = ModelSchema::new("Category", "categories");
        let parent = Relationship {
            name: "parent".to_string(),
            kind: RelationKind::BelongsTo,
            target: SchemaRef::new("Category", "categories"),
            join: None,
        };
        let shop = Relationship {
            target: SchemaRef::new("Shop", "shops"),
            ..parent.clone()
        };

        assert!(schema.is_self_reference(&parent));
        assert!(!schema.is_self_reference(&shop));
    }
}

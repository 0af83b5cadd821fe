// Core types and primitives

pub mod naming;
pub mod schema;

pub use naming::NamingStrategy;
pub use schema::{
    DataType, Field, ModelDescriptor, ModelSchema, RelationKind, Relationship, SchemaRef,
};

// Ent Reorder - dependency-ordered table creation for ent schemas

// Ent Framework - schema definitions and the metadata provider seam
pub mod ent_framework;

// Core types and primitives
pub mod core;

// Dependency graph and topological ordering
pub mod reorder;

// Interchange export and snapshots
pub mod export;

// Schema Definitions - bundled demo models
pub mod schemas;

// Common utilities
pub mod config;
pub mod error;

// Re-exports for convenience
pub use config::Config;
pub use crate::core::{ModelDescriptor, ModelSchema, NamingStrategy};
pub use ent_framework::{MetadataProvider, SchemaRegistry};
pub use error::{ReorderError, ReorderResult};
pub use reorder::{Ordering, Reorder};

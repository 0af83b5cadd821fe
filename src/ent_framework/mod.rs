// Ent Framework - schema definitions and the metadata provider seam

pub mod ent_schema;
pub mod provider;

// Re-export all ent framework types for convenience
pub use ent_schema::*;
pub use provider::MetadataProvider;

// Schema definitions module - bundled demo models and their registry

pub mod org_schema;
pub mod school_schema;
pub mod shop_schema;

use crate::core::naming::NamingStrategy;
use crate::ent_framework::SchemaRegistry;

pub use org_schema::{DepartmentSchema, EmployeeSchema};
pub use school_schema::{CourseSchema, StudentSchema};
pub use shop_schema::{CategorySchema, CustomerSchema, OrderItemSchema, OrderSchema, ProductSchema};

/// Initialize and register all schemas
pub fn create_schema_registry(naming: NamingStrategy) -> SchemaRegistry {
    let mut registry = SchemaRegistry::with_naming(naming);

    // Shop
    registry.register::<CustomerSchema>();
    registry.register::<OrderSchema>();
    registry.register::<OrderItemSchema>();
    registry.register::<ProductSchema>();
    registry.register::<CategorySchema>();

    // School
    registry.register::<StudentSchema>();
    registry.register::<CourseSchema>();

    // Organisation
    registry.register::<DepartmentSchema>();
    registry.register::<EmployeeSchema>();

    registry
}

/// Validate all registered schemas
pub fn validate_schemas() -> Result<(), Vec<String>> {
    let registry = create_schema_registry(NamingStrategy::default());
    registry.validate()
}

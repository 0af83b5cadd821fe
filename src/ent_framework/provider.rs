use crate::core::schema::{ModelDescriptor, ModelSchema};
use crate::error::ReorderResult;

/// Turns a model descriptor into its resolved schema.
///
/// The graph builder only relies on this contract; how the schema is
/// discovered (registered definitions, generated code, a snapshot) is up to
/// the implementation. Failing to resolve must return
/// [`ReorderError::MetadataParse`](crate::error::ReorderError::MetadataParse).
pub trait MetadataProvider {
    fn resolve(&self, descriptor: &ModelDescriptor) -> ReorderResult<ModelSchema>;
}


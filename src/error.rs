use std::fmt;

#[derive(Debug)]
pub enum ReorderError {
    /// The metadata provider could not turn a descriptor into a schema.
    MetadataParse { descriptor: String, reason: String },
    SchemaFormat(String),
    Io(String),
    Validation(Vec<String>),
}

impl ReorderError {
    pub fn metadata_parse(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        ReorderError::MetadataParse {
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ReorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReorderError::MetadataParse { descriptor, reason } => {
                write!(f, "Failed to parse model {}: {}", descriptor, reason)
            }
            ReorderError::SchemaFormat(msg) => write!(f, "Schema format error: {}", msg),
            ReorderError::Io(msg) => write!(f, "IO error: {}", msg),
            ReorderError::Validation(errors) => {
                write!(f, "Schema validation failed: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ReorderError {}

impl From<serde_json::Error> for ReorderError {
    fn from(err: serde_json::Error) -> Self {
        ReorderError::SchemaFormat(err.to_string())
    }
}

pub type ReorderResult<T> = Result<T, ReorderError>;

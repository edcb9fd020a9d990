use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("type '{0}' not found")]
    TypeNotFound(String),

    #[error("field '{field}' not found on type '{type_name}'")]
    FieldNotFound { type_name: String, field: String },

    #[error("unable to expand types from an empty schema")]
    EmptySchema,

    #[error("root type '{0}' was requested more than once")]
    DuplicateRoot(String),

    #[error("unable to save schema, no file specified")]
    NoSchemaFile,

    #[error("failed to access schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

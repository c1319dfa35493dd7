use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{parameter} '{value}' is not supported. Use: '{allowed}'")]
    InvalidValue {
        parameter: String,
        value: String,
        allowed: String,
    },

    #[error("structural constraint violated: {message}")]
    StructuralConstraint { message: String },

    #[error("custom property '{name}' is not defined in the graph schema")]
    UnknownProperty { name: String },

    #[error("scope '{scope}' is not supported. Use: 'node, edge'")]
    InvalidScope { scope: String },

    #[error("property type '{property_type}' is not supported. Use: 'string, int, double, boolean'")]
    InvalidType { property_type: String },

    #[error("file already exists: {path} (pass overwrite to replace it)")]
    FileExists { path: PathBuf },

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("entity not found: {entity}")]
    EntityNotFound { entity: String },

    #[error("{feature} is not implemented")]
    Unsupported { feature: String },

    #[error("malformed document: {message}")]
    MalformedDocument { message: String },

    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        Error::StructuralConstraint {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedDocument {
            message: message.into(),
        }
    }
}

//! Error types for the schema metadata library.

use thiserror::Error;

/// Main error type for catalog introspection and DDL operations.
#[derive(Error, Debug)]
pub enum MetaError {
    /// Table identifier rejected before it reached the catalog.
    #[error("'{0}' is not a valid table name")]
    InvalidTableName(String),

    /// Identifier rejected by validation (empty, null byte, too long).
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Engine type code with no portable mapping.
    #[error("Unsupported field type {type_code} (sub type {sub_type:?})")]
    UnsupportedType {
        type_code: i16,
        sub_type: Option<i16>,
    },

    /// Constraint kind other than PRIMARY KEY or FOREIGN KEY.
    #[error("Unsupported constraint type: {0}")]
    UnsupportedConstraint(String),

    /// Default value that cannot be represented for the column.
    #[error("'{value}' is not a valid default for column {column}: {message}")]
    InvalidDefault {
        column: String,
        value: String,
        message: String,
    },

    /// A catalog row did not have the expected shape.
    #[error("Unexpected value in result column {index}: expected {expected}")]
    RowDecode { index: usize, expected: &'static str },

    /// Failure reported by the database engine while executing a statement.
    #[error("Engine error (SQL code {sql_code}, engine code {db_code}): {message}")]
    Engine {
        sql_code: i32,
        db_code: i32,
        message: String,
    },

    /// Configuration error (invalid YAML, out-of-range values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Fieldless discriminant of [`MetaError`] for branching without matching messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidTableName,
    InvalidIdentifier,
    UnsupportedType,
    UnsupportedConstraint,
    InvalidDefault,
    RowDecode,
    Engine,
    Config,
    Io,
}

impl MetaError {
    /// Create an Engine error as raised by the execution collaborator.
    pub fn engine(sql_code: i32, db_code: i32, message: impl Into<String>) -> Self {
        MetaError::Engine {
            sql_code,
            db_code,
            message: message.into(),
        }
    }

    /// Create an InvalidDefault error.
    pub fn invalid_default(
        column: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        MetaError::InvalidDefault {
            column: column.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MetaError::InvalidTableName(_) => ErrorKind::InvalidTableName,
            MetaError::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            MetaError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            MetaError::UnsupportedConstraint(_) => ErrorKind::UnsupportedConstraint,
            MetaError::InvalidDefault { .. } => ErrorKind::InvalidDefault,
            MetaError::RowDecode { .. } => ErrorKind::RowDecode,
            MetaError::Engine { .. } => ErrorKind::Engine,
            MetaError::Config(_) | MetaError::Yaml(_) => ErrorKind::Config,
            MetaError::Io(_) => ErrorKind::Io,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, MetaError>;

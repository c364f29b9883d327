//! Error taxonomy shared by every tessera stage
//!
//! Three families abort the running command: schema problems (the declarative
//! field list does not fit the input), parse problems (a raw value cannot be
//! coerced to its declared kind) and I/O problems. Graph syntax and query
//! failures come from the external RDF collaborators and are just as fatal.
//!
//! Informational skips (a candidate resource without the identifying property,
//! a missing enrichment file) are never represented here: stages count them in
//! their reports and keep going.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Schema problems, detected at registration time or when a column is resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A CSV column has no matching field descriptor
    #[error("unknown column '{column}' for type {type_name}")]
    UnknownColumn { type_name: String, column: String },

    /// Two descriptors in one schema share a field name
    #[error("duplicate field '{field}' in type {type_name}")]
    DuplicateField { type_name: String, field: String },

    /// Two descriptors in one schema read the same CSV column
    #[error("duplicate column '{column}' in type {type_name}")]
    DuplicateColumn { type_name: String, column: String },

    /// The registry already holds a schema with this name
    #[error("type {0} is already registered")]
    DuplicateType(String),

    /// No schema with this name has been registered
    #[error("type {0} is not registered")]
    UnknownType(String),

    /// A field kind that cannot be represented (unknown name, nested list, ...)
    #[error("unsupported kind '{kind}' for field '{field}': {reason}")]
    UnsupportedKind {
        field: String,
        kind: String,
        reason: String,
    },

    /// The designated identifying field is not part of the schema
    #[error("identifier field '{field}' is not declared in type {type_name}")]
    UnknownIdentifier { type_name: String, field: String },

    /// A CURIE used in a range override or prefix map cannot be resolved
    #[error("cannot resolve '{0}': unknown prefix")]
    UnknownPrefix(String),

    /// Two datasets in one integration run share a name
    #[error("dataset '{0}' is listed more than once")]
    DuplicateDataset(String),

    /// A declarative file (schema descriptor, prefix map) is malformed
    #[error("invalid descriptor {origin}: {message}")]
    InvalidDescriptor { origin: String, message: String },
}

/// A raw CSV value that could not be coerced to its declared kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read '{value}' as {expected} in column '{column}' at row {row}")]
pub struct ParseError {
    /// Column header as it appears in the source
    pub column: String,
    /// 1-based data row number
    pub row: usize,
    /// The offending raw value (after substring removal)
    pub value: String,
    /// Human readable name of the expected kind
    pub expected: String,
}

/// Top-level error for all tessera operations
#[derive(Debug, Error)]
pub enum TesseraError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Missing input or unwritable target
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The RDF parser rejected a graph document
    #[error("syntax error in {origin}: {message}")]
    Syntax { origin: String, message: String },

    /// The query executor rejected or failed to evaluate a query
    #[error("query failed: {0}")]
    Query(String),

    /// A remote SPARQL endpoint was unreachable or answered with an error
    #[error("request to {endpoint} failed: {message}")]
    Remote { endpoint: String, message: String },
}

/// Specialized Result type for tessera operations
pub type TesseraResult<T> = Result<T, TesseraError>;

impl TesseraError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a graph syntax error
    pub fn syntax(origin: impl Into<String>, message: impl ToString) -> Self {
        Self::Syntax {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    /// Create a query error
    pub fn query(message: impl ToString) -> Self {
        Self::Query(message.to_string())
    }

    /// Create a remote endpoint error
    pub fn remote(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Remote {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Short category name, used as a structured logging field
    pub fn category(&self) -> &'static str {
        match self {
            Self::Schema(_) => "schema",
            Self::Parse(_) => "parse",
            Self::Io { .. } => "io",
            Self::Syntax { .. } => "syntax",
            Self::Query(_) => "query",
            Self::Remote { .. } => "remote",
        }
    }
}

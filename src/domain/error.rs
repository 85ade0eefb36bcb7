//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent structural or data-quality violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error("invalid value {value:?} in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("missing column: '{0}'")]
    MissingColumn(String),

    #[error("duplicate construct in table: '{0}'")]
    DuplicateConstruct(String),

    #[error("cannot take the maximum of an empty score set (level {level})")]
    EmptyInput { level: u32 },

    #[error("no aggregation rule for level {0}")]
    UnsupportedLevel(u32),

    #[error("cycle detected in construct hierarchy at: {0}")]
    CyclicStructure(String),

    #[error("node not found: '{0}'")]
    NotFound(String),

    #[error("node '{id}' is missing required field '{field}'")]
    MalformedNode { id: String, field: String },

    #[error("invalid selection '{0}': expected '<application> - <scenario>'")]
    InvalidSelection(String),

    #[error("invalid taxonomy: {0}")]
    InvalidTaxonomy(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

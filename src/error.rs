/// Error types for table operations.
use thiserror::Error;

/// Errors raised by table mutations and schema checks.
///
/// Decoding URL state and evaluating filters never produce these; they are
/// reserved for caller mistakes such as naming a column that does not exist.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not numeric and cannot carry a range filter")]
    NotNumeric(String),

    #[error("filter value must be a finite number, got {0}")]
    NonFiniteValue(f64),

    #[error("no advanced filter with id '{0}'")]
    UnknownFilter(String),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("unknown column group '{0}'")]
    UnknownGroup(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

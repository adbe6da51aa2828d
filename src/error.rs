//! Error types surfaced to host pages
use thiserror::Error;

use crate::core::types::FieldType;

/// Rejected user input that the host page renders inline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("scheme name must not be blank")]
    BlankSchemeName,
}

/// A condition value that does not fit its field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("field '{key}' expects a {expected} value, got {found}")]
    TypeMismatch {
        key: String,
        expected: FieldType,
        found: FieldType,
    },
    #[error("'{value}' is not an option of field '{key}'")]
    UnknownOption { key: String, value: String },
    #[error("date range of field '{key}' starts after it ends")]
    InvertedRange { key: String },
    #[error("cannot read '{raw}' as a {expected} value for field '{key}'")]
    Unparsable {
        key: String,
        raw: String,
        expected: FieldType,
    },
}

/// Malformed view catalog, detected while building the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("view '{view}' declares field '{key}' more than once")]
    DuplicateField { view: String, key: String },
    #[error("select field '{key}' in view '{view}' has no options")]
    MissingOptions { view: String, key: String },
    #[error("field '{key}' in view '{view}' has options but is not a select field")]
    UnexpectedOptions { view: String, key: String },
    #[error("view '{view}' marks unknown field '{key}' as visible by default")]
    UnknownDefaultField { view: String, key: String },
    #[error("view '{view}' declares column '{key}' more than once")]
    DuplicateColumn { view: String, key: String },
    #[error("view '{view}' marks unknown column '{key}' as visible by default")]
    UnknownDefaultColumn { view: String, key: String },
    #[error("failed to parse catalog: {0}")]
    Parse(String),
}

//! # Error Types
//!
//! Structured error types for estimate_core. These errors are designed to be
//! informative for both humans and calling applications, providing enough
//! context to understand and fix issues programmatically.
//!
//! Invalid or incomplete measurement input is an ordinary `Err` from a
//! calculator's validity gate, never a panic: the UI renders it as a disabled
//! "Calculate" button, tests assert on the specific missing field.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::errors::{EstimateError, EstimateResult};
//!
//! fn validate_length(length_ft: Option<f64>) -> EstimateResult<f64> {
//!     match length_ft {
//!         Some(l) if l > 0.0 => Ok(l),
//!         Some(l) => Err(EstimateError::invalid_input(
//!             "length_ft",
//!             l.to_string(),
//!             "Length must be positive",
//!         )),
//!         None => Err(EstimateError::missing_field("length_ft")),
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for estimate_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for estimating operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic handling by UIs and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// An input value is invalid (out of range, wrong branch, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is unset for the selected option branch
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material not found in any catalog
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Override catalog could not be fetched
    ///
    /// Calculations degrade to default pricing when this occurs; the error
    /// is surfaced out-of-band, not thrown mid-calculation.
    #[error("Catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Estimate file is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Snapshot schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EstimateError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        EstimateError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        EstimateError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a CatalogUnavailable error
    pub fn catalog_unavailable(reason: impl Into<String>) -> Self {
        EstimateError::CatalogUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        EstimateError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EstimateError::FileLocked { .. } | EstimateError::CatalogUnavailable { .. }
        )
    }

    /// Check if this error represents incomplete input (the "calculate
    /// disabled" state) rather than a hard failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EstimateError::MissingField { .. } | EstimateError::InvalidInput { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::MissingField { .. } => "MISSING_FIELD",
            EstimateError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            EstimateError::CatalogUnavailable { .. } => "CATALOG_UNAVAILABLE",
            EstimateError::FileError { .. } => "FILE_ERROR",
            EstimateError::FileLocked { .. } => "FILE_LOCKED",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::VersionMismatch { .. } => "VERSION_MISMATCH",
            EstimateError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

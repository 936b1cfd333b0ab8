//! ## Custom Errors for Feature Encoding
//!
//! This module defines custom error types for the Feature Encoding library.
//! It uses the `thiserror` crate to derive the `Error` trait for custom error types.
//! The `FeatureEncodingError` enum includes variants representing the error scenarios
//! encountered throughout the library: configuration errors (unknown encoder method,
//! accessor called on the wrong method, missing target for supervised methods),
//! not-fitted errors, and data errors (missing columns), plus wrappers for errors
//! bubbling up from DataFusion and Arrow.
//!
//! The `FeatureEncodingResult` type alias simplifies error handling by providing a
//! convenient alias for results returned by the library.
//!
//! ### Example
//!
//! ```rust
//! use feature_encoding::exceptions::{FeatureEncodingError, FeatureEncodingResult};
//!
//! fn pick_method(name: &str) -> FeatureEncodingResult<()> {
//!     Err(FeatureEncodingError::UnknownMethod {
//!         name: name.to_string(),
//!         valid: "ordinal, one_hot".to_string(),
//!     })
//! }
//! ```

use thiserror::Error;

/// Errors specific to the Feature Encoding library.
#[derive(Debug, Error)]
pub enum FeatureEncodingError {
    /// Wraps underlying I/O errors.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Wraps errors from DataFusion.
    #[error("DataFusion error: {0}")]
    DataFusionError(#[from] datafusion::error::DataFusionError),

    /// Wraps errors from Arrow.
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Indicates that the requested encoder method name is not in the registry.
    #[error("'{name}' is not a supported encoder method. Supported methods are: {valid}")]
    UnknownMethod { name: String, valid: String },

    /// Indicates that a strategy-specific accessor was called on an encoder
    /// configured for a different strategy.
    #[error("Method mismatch: {0}")]
    MethodMismatch(String),

    /// Indicates that a supervised encoder was fit without a target column.
    #[error("Missing target: the '{0}' encoder requires a target column at fit time")]
    MissingTarget(String),

    /// Indicates that an invalid parameter was provided (e.g., unsupported value or incorrect data type).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Indicates that the specified column does not exist in the DataFrame.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Indicates the transform method was called before calling fit.
    #[error("Transform called before fit")]
    FitNotCalled,
}

/// A convenient result type for Feature Encoding operations.
pub type FeatureEncodingResult<T> = std::result::Result<T, FeatureEncodingError>;

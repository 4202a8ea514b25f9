//! Error types for the voucher operations system.

use thiserror::Error;

/// Main error type shared by the core engines and the API client.
#[derive(Error, Debug)]
pub enum VoucherError {
    /// A draft failed pre-submit validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A field edit carried a value that cannot be coerced to the field's type
    #[error("Invalid value {value:?} for field {field}")]
    InvalidFieldValue { field: &'static str, value: String },

    /// An enum field held a code outside its known set
    #[error("Unknown {kind} value: {value}")]
    UnknownEnumValue { kind: &'static str, value: String },

    /// A mutation referenced a collection index that does not exist
    #[error("Index {index} out of range for collection of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A mutation was attempted after the form left its editing state
    #[error("Operation not allowed: form is {0}")]
    InvalidState(&'static str),

    /// The credential is missing or expired, even after a refresh attempt
    #[error("Unauthorized: credential missing or expired")]
    Unauthorized,

    /// The requested entity does not exist on the server
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request never produced a server response
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Serialization or deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for voucher operations
pub type Result<T> = std::result::Result<T, VoucherError>;

// cachepool error handling framework
// Central location for error types, codes and the shared error trait

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

// Re-export for crates that derive their own errors
pub use thiserror;

pub mod types;
pub mod xml;

pub use types::{PoolError, PoolResult};
pub use xml::{XmlConfigurationError, XmlResult};

/// Error domains representing the different layers of the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorDomain {
    Types,
    Xml,
    External,
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDomain::Types => write!(f, "types"),
            ErrorDomain::Xml => write!(f, "xml"),
            ErrorDomain::External => write!(f, "external"),
        }
    }
}

/// Error code structure for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ErrorCode(pub u32);

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Standard error message format for serialization
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorMessage {
    pub code: ErrorCode,
    pub domain: ErrorDomain,
    pub message: String,
    pub defect: bool,
}

impl ErrorMessage {
    /// Capture the serializable view of any error of the workspace
    pub fn from_error<E: CachePoolError + ?Sized>(err: &E) -> Self {
        Self {
            code: err.code(),
            domain: err.domain(),
            message: err.to_string(),
            defect: err.is_defect(),
        }
    }
}

/// Base trait for all errors raised by the cachepool crates.
pub trait CachePoolError: StdError + Send + Sync + Any + 'static {
    /// Numeric code, unique per variant.
    fn code(&self) -> ErrorCode;

    /// Layer that raised the error.
    fn domain(&self) -> ErrorDomain;

    /// True when the error signals a programming defect (model and code out
    /// of sync) rather than a problem with the user's configuration.
    fn is_defect(&self) -> bool {
        false
    }

    /// Returns this error as a `&dyn Any` to allow downcasting.
    fn as_any(&self) -> &dyn Any;
}

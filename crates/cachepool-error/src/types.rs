// Resource model error types
// Raised by cachepool-types while building pools and pool collections

use std::any::Any;
use thiserror::Error;
use crate::{CachePoolError, ErrorCode, ErrorDomain};

/// Pool error codes
pub mod codes {
    use crate::ErrorCode;

    // Types error codes start with 2000
    pub const DUPLICATE_POOL: ErrorCode = ErrorCode(2001);
    pub const INCOMPATIBLE_UNIT: ErrorCode = ErrorCode(2002);
    pub const NOT_PERSISTABLE: ErrorCode = ErrorCode(2003);
    pub const UNKNOWN_UNIT: ErrorCode = ErrorCode(2004);
}

/// Errors raised while describing resource pools
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A pool for this resource type is already part of the collection
    #[error("Can not add '{attempted}'; configuration already contains '{existing}'")]
    DuplicatePool { existing: String, attempted: String },

    /// The unit cannot size this resource type
    #[error("Resource type {resource} cannot be sized in '{unit}'")]
    IncompatibleUnit { resource: String, unit: String },

    /// Persistence requested on a type that cannot persist
    #[error("Resource type {resource} cannot be persistent")]
    NotPersistable { resource: String },

    /// Unit name matches neither the count unit nor a memory unit
    #[error("Unrecognized resource unit: {0}")]
    UnknownUnit(String),
}

impl CachePoolError for PoolError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            PoolError::DuplicatePool { .. } => DUPLICATE_POOL,
            PoolError::IncompatibleUnit { .. } => INCOMPATIBLE_UNIT,
            PoolError::NotPersistable { .. } => NOT_PERSISTABLE,
            PoolError::UnknownUnit(_) => UNKNOWN_UNIT,
        }
    }

    fn domain(&self) -> ErrorDomain {
        ErrorDomain::Types
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Convenient Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

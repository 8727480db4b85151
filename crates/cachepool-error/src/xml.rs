// XML configuration error types
// Raised by cachepool-xml while reading, writing and translating resources

use std::any::Any;
use thiserror::Error;
use crate::{CachePoolError, ErrorCode, ErrorDomain, PoolError};

/// XML error codes
pub mod codes {
    use crate::ErrorCode;

    // XML error codes start with 3000
    pub const NO_RESOURCES: ErrorCode = ErrorCode(3001);
    pub const UNKNOWN_NAMESPACE: ErrorCode = ErrorCode(3002);
    pub const UNMARSHAL: ErrorCode = ErrorCode(3003);
    pub const MARSHAL: ErrorCode = ErrorCode(3004);
    pub const DOCUMENT: ErrorCode = ErrorCode(3005);
    pub const POOL: ErrorCode = ErrorCode(3006);
    pub const DUPLICATE_REGISTRATION: ErrorCode = ErrorCode(3007);
    pub const EXTENSION: ErrorCode = ErrorCode(3008);
    pub const SETTINGS: ErrorCode = ErrorCode(3009);
    pub const IO: ErrorCode = ErrorCode(3010);
    pub const INTERNAL_CONSISTENCY: ErrorCode = ErrorCode(3999);
}

/// Errors raised by the XML configuration layer
#[derive(Error, Debug)]
pub enum XmlConfigurationError {
    /// A cache declared neither a heap shorthand nor any resource
    #[error("No resources defined for the cache: {cache_id}")]
    NoResources { cache_id: String },

    /// No extension parser owns the element's namespace
    #[error("Can't find parser for namespace: {namespace}")]
    UnknownNamespace { namespace: String },

    /// A core element could not be decoded into its value object
    #[error("Can't decode resource {element}: {reason}")]
    Unmarshal { element: String, reason: String },

    /// A value object could not be encoded into an element
    #[error("Can't encode resource {resource}: {reason}")]
    Marshal { resource: String, reason: String },

    /// The XML text itself is malformed
    #[error("Malformed XML document: {0}")]
    Document(String),

    /// The decoded pool was rejected by the resource model
    #[error("Invalid resource pool: {0}")]
    Pool(#[from] PoolError),

    /// Two extension parsers claimed the same namespace or pool type
    #[error("Duplicate extension {kind} registration: {key}")]
    DuplicateRegistration { kind: &'static str, key: String },

    /// An extension parser rejected its element or pool
    #[error("Extension {namespace} failed: {reason}")]
    Extension { namespace: String, reason: String },

    /// Parser settings could not be loaded or stored
    #[error("Invalid parser settings: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The resource model and the translation code disagree
    #[error("Internal consistency failure: {0}")]
    InternalConsistency(String),
}

impl CachePoolError for XmlConfigurationError {
    fn code(&self) -> ErrorCode {
        use codes::*;
        match self {
            XmlConfigurationError::NoResources { .. } => NO_RESOURCES,
            XmlConfigurationError::UnknownNamespace { .. } => UNKNOWN_NAMESPACE,
            XmlConfigurationError::Unmarshal { .. } => UNMARSHAL,
            XmlConfigurationError::Marshal { .. } => MARSHAL,
            XmlConfigurationError::Document(_) => DOCUMENT,
            XmlConfigurationError::Pool(_) => POOL,
            XmlConfigurationError::DuplicateRegistration { .. } => DUPLICATE_REGISTRATION,
            XmlConfigurationError::Extension { .. } => EXTENSION,
            XmlConfigurationError::Settings(_) => SETTINGS,
            XmlConfigurationError::Io(_) => IO,
            XmlConfigurationError::InternalConsistency(_) => INTERNAL_CONSISTENCY,
        }
    }

    fn domain(&self) -> ErrorDomain {
        match self {
            XmlConfigurationError::Io(_) => ErrorDomain::External,
            _ => ErrorDomain::Xml,
        }
    }

    fn is_defect(&self) -> bool {
        matches!(self, XmlConfigurationError::InternalConsistency(_))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Convenient Result type for XML configuration operations
pub type XmlResult<T> = Result<T, XmlConfigurationError>;

// Helper methods for creating XML errors
impl XmlConfigurationError {
    pub fn no_resources(cache_id: impl Into<String>) -> Self {
        XmlConfigurationError::NoResources { cache_id: cache_id.into() }
    }

    pub fn unknown_namespace(namespace: impl Into<String>) -> Self {
        XmlConfigurationError::UnknownNamespace { namespace: namespace.into() }
    }

    pub fn unmarshal(element: impl Into<String>, reason: impl Into<String>) -> Self {
        XmlConfigurationError::Unmarshal {
            element: element.into(),
            reason: reason.into(),
        }
    }

    pub fn marshal(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        XmlConfigurationError::Marshal {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn extension(namespace: impl Into<String>, reason: impl Into<String>) -> Self {
        XmlConfigurationError::Extension {
            namespace: namespace.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        XmlConfigurationError::InternalConsistency(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_consistency_is_defect() {
        let err = XmlConfigurationError::internal("core pool without size");
        assert!(err.is_defect());
        assert_eq!(err.code(), codes::INTERNAL_CONSISTENCY);
    }

    #[test]
    fn test_user_errors_are_not_defects() {
        let errors = vec![
            XmlConfigurationError::no_resources("foo"),
            XmlConfigurationError::unknown_namespace("urn:example:unknown"),
            XmlConfigurationError::unmarshal("<heap>", "not a number"),
            XmlConfigurationError::from(PoolError::UnknownUnit("XB".to_string())),
        ];
        for err in errors {
            assert!(!err.is_defect(), "{} should not be a defect", err);
        }
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = XmlConfigurationError::unknown_namespace("urn:example:unknown");
        assert!(err.to_string().contains("urn:example:unknown"));

        let err = XmlConfigurationError::no_resources("foo");
        assert_eq!(err.to_string(), "No resources defined for the cache: foo");
    }

    #[test]
    fn test_io_errors_are_external() {
        let err = XmlConfigurationError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.domain(), ErrorDomain::External);
    }
}

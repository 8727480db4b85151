//! Extension parsers and their registry.
//!
//! Resource elements outside the core namespace belong to extensions. An
//! extension parser owns one namespace and one or more extension pool types;
//! the registry routes elements to it by namespace when reading and routes
//! pools to it by type tag when writing.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use cachepool_error::{XmlConfigurationError, XmlResult};
use cachepool_types::{ExtensionResourceType, ResourcePool};

use crate::dom::XmlElement;

/// Capability of an extension that contributes resource pool elements.
pub trait CacheResourceConfigurationParser: Send + Sync {
    /// Namespace URI of the elements this parser reads
    fn namespace(&self) -> &str;

    /// Prefix to use for this namespace when writing
    fn preferred_prefix(&self) -> Option<&str> {
        None
    }

    /// Pool types this parser can write back out
    fn resource_types(&self) -> Vec<ExtensionResourceType>;

    fn parse_resource_configuration(&self, element: &XmlElement) -> XmlResult<Arc<dyn ResourcePool>>;

    fn unparse_resource_pool(&self, pool: &dyn ResourcePool) -> XmlResult<XmlElement>;
}

/// Read-only lookup tables over a fixed set of extension parsers.
///
/// Both tables are built once; a namespace or type tag claimed by two
/// parsers is rejected when the registry is built.
#[derive(Default)]
pub struct ExtensionParserRegistry {
    parsers: Vec<Arc<dyn CacheResourceConfigurationParser>>,
    by_namespace: HashMap<String, Arc<dyn CacheResourceConfigurationParser>>,
    by_type: HashMap<String, Arc<dyn CacheResourceConfigurationParser>>,
}

impl ExtensionParserRegistry {
    /// A registry without any extension
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> ExtensionParserRegistryBuilder {
        ExtensionParserRegistryBuilder::default()
    }

    pub fn new(parsers: Vec<Arc<dyn CacheResourceConfigurationParser>>) -> XmlResult<Self> {
        let mut by_namespace = HashMap::new();
        let mut by_type = HashMap::new();

        for parser in &parsers {
            let namespace = parser.namespace().to_string();
            if by_namespace.insert(namespace.clone(), parser.clone()).is_some() {
                return Err(XmlConfigurationError::DuplicateRegistration {
                    kind: "namespace",
                    key: namespace,
                });
            }
            for resource_type in parser.resource_types() {
                let tag = resource_type.tag().to_string();
                if by_type.insert(tag.clone(), parser.clone()).is_some() {
                    return Err(XmlConfigurationError::DuplicateRegistration {
                        kind: "resource type",
                        key: tag,
                    });
                }
            }
            debug!(namespace = %namespace, "registered resource extension parser");
        }

        Ok(Self {
            parsers,
            by_namespace,
            by_type,
        })
    }

    pub fn parser_for_namespace(&self, namespace: &str) -> Option<&Arc<dyn CacheResourceConfigurationParser>> {
        self.by_namespace.get(namespace)
    }

    pub fn parser_for_type(&self, resource_type: &ExtensionResourceType) -> Option<&Arc<dyn CacheResourceConfigurationParser>> {
        self.by_type.get(resource_type.tag())
    }

    /// Registered namespaces, in registration order
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.parsers.iter().map(|parser| parser.namespace())
    }

    /// Preferred prefixes of the registered namespaces
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parsers
            .iter()
            .filter_map(|parser| parser.preferred_prefix().map(|prefix| (parser.namespace(), prefix)))
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for ExtensionParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionParserRegistry")
            .field("namespaces", &self.namespaces().collect::<Vec<_>>())
            .field("resource_types", &self.by_type.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects parsers before the registry tables are built
#[derive(Default)]
pub struct ExtensionParserRegistryBuilder {
    parsers: Vec<Arc<dyn CacheResourceConfigurationParser>>,
}

impl ExtensionParserRegistryBuilder {
    pub fn register<P: CacheResourceConfigurationParser + 'static>(mut self, parser: P) -> Self {
        self.parsers.push(Arc::new(parser));
        self
    }

    pub fn register_arc(mut self, parser: Arc<dyn CacheResourceConfigurationParser>) -> Self {
        self.parsers.push(parser);
        self
    }

    pub fn build(self) -> XmlResult<ExtensionParserRegistry> {
        ExtensionParserRegistry::new(self.parsers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    #[derive(Debug)]
    struct NullPool;

    impl ResourcePool for NullPool {
        fn resource_type(&self) -> cachepool_types::ResourceType {
            ExtensionResourceType::new_static("null", false).into()
        }

        fn is_persistent(&self) -> bool {
            false
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct NullParser {
        namespace: &'static str,
        tag: &'static str,
    }

    impl CacheResourceConfigurationParser for NullParser {
        fn namespace(&self) -> &str {
            self.namespace
        }

        fn preferred_prefix(&self) -> Option<&str> {
            Some("null")
        }

        fn resource_types(&self) -> Vec<ExtensionResourceType> {
            vec![ExtensionResourceType::new_static(self.tag, false)]
        }

        fn parse_resource_configuration(&self, _element: &XmlElement) -> XmlResult<Arc<dyn ResourcePool>> {
            Ok(Arc::new(NullPool))
        }

        fn unparse_resource_pool(&self, _pool: &dyn ResourcePool) -> XmlResult<XmlElement> {
            Ok(XmlElement::namespaced(self.namespace, "null"))
        }
    }

    #[test]
    fn test_lookup_by_namespace_and_tag() {
        let registry = ExtensionParserRegistry::builder()
            .register(NullParser { namespace: "urn:null", tag: "null" })
            .build()
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.parser_for_namespace("urn:null").is_some());
        assert!(registry.parser_for_namespace("urn:other").is_none());
        assert!(registry
            .parser_for_type(&ExtensionResourceType::new_static("null", false))
            .is_some());
        assert_eq!(registry.prefixes().collect::<Vec<_>>(), vec![("urn:null", "null")]);
    }

    #[test]
    fn test_duplicate_namespace_is_rejected() {
        let err = ExtensionParserRegistry::builder()
            .register(NullParser { namespace: "urn:null", tag: "a" })
            .register(NullParser { namespace: "urn:null", tag: "b" })
            .build()
            .unwrap_err();

        match err {
            XmlConfigurationError::DuplicateRegistration { kind, key } => {
                assert_eq!(kind, "namespace");
                assert_eq!(key, "urn:null");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_type_tag_is_rejected() {
        let err = ExtensionParserRegistry::builder()
            .register(NullParser { namespace: "urn:a", tag: "null" })
            .register(NullParser { namespace: "urn:b", tag: "null" })
            .build()
            .unwrap_err();

        assert!(matches!(err, XmlConfigurationError::DuplicateRegistration { kind: "resource type", .. }));
    }

    #[test]
    fn test_empty_registry() {
        let registry = ExtensionParserRegistry::empty();
        assert!(registry.is_empty());
        assert_eq!(registry.namespaces().count(), 0);
    }
}

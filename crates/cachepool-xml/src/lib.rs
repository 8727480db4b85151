//! XML translation of cache resource pool configuration.
//!
//! Reads the `<heap>`, `<resources>` and extension tier elements of a cache
//! into [`ResourcePools`](cachepool_types::ResourcePools) and writes pool
//! collections back out as elements. Extension namespaces are handled by
//! [`CacheResourceConfigurationParser`] implementations collected in an
//! [`ExtensionParserRegistry`].

pub mod clustered;
pub mod codec;
pub mod document;
pub mod dom;
pub mod extension;
pub mod model;
pub mod parser;
pub mod schema;
pub mod settings;
pub mod template;

pub use clustered::{
    ClusteredDedicatedPool, ClusteredPool, ClusteredResourceConfigurationParser, ClusteredSharedPool,
};
pub use codec::CoreSchemaCodec;
pub use document::{normalize_resources, read_cache_templates};
pub use dom::{XmlAttribute, XmlElement};
pub use extension::{CacheResourceConfigurationParser, ExtensionParserRegistry, ExtensionParserRegistryBuilder};
pub use model::{CoreResource, DiskResource, HeapResource, MemoryResource};
pub use parser::ResourceConfigurationParser;
pub use settings::{ParserSettings, WriterSettings};
pub use template::{CacheTemplate, CacheType};

pub use cachepool_error::{XmlConfigurationError, XmlResult};

//! Names and defaults of the core configuration schema.

/// Namespace owning the built-in resource elements
pub const CORE_SCHEMA_NAMESPACE: &str = "http://www.ehcache.org/v3";

/// Prefix used for the core namespace when writing
pub const CORE_SCHEMA_PREFIX: &str = "ehcache";

pub const CONFIG: &str = "config";
pub const CACHE: &str = "cache";
pub const CACHE_TEMPLATE: &str = "cache-template";
pub const RESOURCES: &str = "resources";
pub const HEAP: &str = "heap";
pub const OFFHEAP: &str = "offheap";
pub const DISK: &str = "disk";

pub const ALIAS_ATTRIBUTE: &str = "alias";
pub const NAME_ATTRIBUTE: &str = "name";
pub const UNIT_ATTRIBUTE: &str = "unit";
pub const PERSISTENT_ATTRIBUTE: &str = "persistent";

/// Unit of a heap element that omits one
pub const DEFAULT_HEAP_UNIT: &str = "entries";

/// Unit of an offheap or disk element that omits one
pub const DEFAULT_MEMORY_UNIT: &str = "MB";

/// Unit tokens the schema allows on heap elements
pub const RESOURCE_UNITS: [&str; 7] = ["entries", "B", "kB", "MB", "GB", "TB", "PB"];

/// Unit tokens the schema allows on offheap and disk elements
pub const MEMORY_UNITS: [&str; 6] = ["B", "kB", "MB", "GB", "TB", "PB"];

//! Resource types: the kinds of tier a pool can describe.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::unit::ResourceUnit;

/// Tiers every cache implementation understands, in tier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoreResourceType {
    Heap,
    Offheap,
    Disk,
}

impl CoreResourceType {
    pub const ALL: [CoreResourceType; 3] = [
        CoreResourceType::Heap,
        CoreResourceType::Offheap,
        CoreResourceType::Disk,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CoreResourceType::Heap => "heap",
            CoreResourceType::Offheap => "offheap",
            CoreResourceType::Disk => "disk",
        }
    }

    pub fn is_persistable(&self) -> bool {
        matches!(self, CoreResourceType::Disk)
    }

    pub fn requires_serialization(&self) -> bool {
        !matches!(self, CoreResourceType::Heap)
    }

    /// Heap accepts entry counts and memory sizes, the other tiers memory only
    pub fn accepts(&self, unit: &ResourceUnit) -> bool {
        match self {
            CoreResourceType::Heap => true,
            CoreResourceType::Offheap | CoreResourceType::Disk => unit.is_memory(),
        }
    }
}

/// A tier contributed by an extension, identified by its type tag.
///
/// The tag is what extension parsers register against so that pools can be
/// routed back to their owner when they are written out again. Two types
/// with the same tag are the same kind of tier.
#[derive(Debug, Clone)]
pub struct ExtensionResourceType {
    tag: Cow<'static, str>,
    persistable: bool,
}

impl ExtensionResourceType {
    pub const fn new_static(tag: &'static str, persistable: bool) -> Self {
        Self {
            tag: Cow::Borrowed(tag),
            persistable,
        }
    }

    pub fn new(tag: impl Into<Cow<'static, str>>, persistable: bool) -> Self {
        Self {
            tag: tag.into(),
            persistable,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_persistable(&self) -> bool {
        self.persistable
    }
}

impl PartialEq for ExtensionResourceType {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for ExtensionResourceType {}

impl Hash for ExtensionResourceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
    }
}

impl PartialOrd for ExtensionResourceType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExtensionResourceType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag.cmp(&other.tag)
    }
}

/// Kind of a resource pool. Core tiers sort before extension tiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    Core(CoreResourceType),
    Extension(ExtensionResourceType),
}

impl ResourceType {
    pub const HEAP: ResourceType = ResourceType::Core(CoreResourceType::Heap);
    pub const OFFHEAP: ResourceType = ResourceType::Core(CoreResourceType::Offheap);
    pub const DISK: ResourceType = ResourceType::Core(CoreResourceType::Disk);

    pub fn name(&self) -> &str {
        match self {
            ResourceType::Core(core) => core.name(),
            ResourceType::Extension(ext) => ext.tag(),
        }
    }

    pub fn as_core(&self) -> Option<CoreResourceType> {
        match self {
            ResourceType::Core(core) => Some(*core),
            ResourceType::Extension(_) => None,
        }
    }

    pub fn is_persistable(&self) -> bool {
        match self {
            ResourceType::Core(core) => core.is_persistable(),
            ResourceType::Extension(ext) => ext.is_persistable(),
        }
    }

    pub fn requires_serialization(&self) -> bool {
        match self {
            ResourceType::Core(core) => core.requires_serialization(),
            ResourceType::Extension(_) => true,
        }
    }
}

impl From<CoreResourceType> for ResourceType {
    fn from(core: CoreResourceType) -> Self {
        ResourceType::Core(core)
    }
}

impl From<ExtensionResourceType> for ResourceType {
    fn from(ext: ExtensionResourceType) -> Self {
        ResourceType::Extension(ext)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

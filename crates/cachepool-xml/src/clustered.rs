//! Clustered tiers.
//!
//! A clustered cache keeps a tier on a cluster server. The tier is either
//! dedicated to the cache (with its own size, optionally carved out of a
//! named server resource), shared with other caches through a named pool,
//! or inherited from the cluster as is.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use dashu::integer::UBig;
use tracing::trace;

use cachepool_error::{XmlConfigurationError, XmlResult};
use cachepool_types::{
    ExtensionResourceType, MemoryUnit, ResourcePool, ResourceType, SizedResourcePool,
};

use crate::codec::decode_size;
use crate::dom::XmlElement;
use crate::extension::CacheResourceConfigurationParser;
use crate::schema;

pub const CLUSTERED_NAMESPACE: &str = "http://www.ehcache.org/v3/clustered";
pub const CLUSTERED_PREFIX: &str = "tc";

pub const CLUSTERED: &str = "clustered";
pub const CLUSTERED_DEDICATED: &str = "clustered-dedicated";
pub const CLUSTERED_SHARED: &str = "clustered-shared";

pub const FROM_ATTRIBUTE: &str = "from";
pub const SHARING_ATTRIBUTE: &str = "sharing";

/// Tier inherited from the cluster
pub const CLUSTERED_TYPE: ExtensionResourceType = ExtensionResourceType::new_static(CLUSTERED, true);
/// Tier with its own size on the server
pub const DEDICATED_TYPE: ExtensionResourceType = ExtensionResourceType::new_static(CLUSTERED_DEDICATED, true);
/// Tier drawn from a shared server pool
pub const SHARED_TYPE: ExtensionResourceType = ExtensionResourceType::new_static(CLUSTERED_SHARED, true);

/// `<tc:clustered/>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusteredPool;

impl ResourcePool for ClusteredPool {
    fn resource_type(&self) -> ResourceType {
        CLUSTERED_TYPE.into()
    }

    fn is_persistent(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `<tc:clustered-dedicated from="…" unit="…">size</tc:clustered-dedicated>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteredDedicatedPool {
    from: Option<String>,
    unit: MemoryUnit,
    sized: SizedResourcePool,
}

impl ClusteredDedicatedPool {
    pub fn new(from: Option<String>, size: impl Into<UBig>, unit: MemoryUnit) -> XmlResult<Self> {
        let sized = SizedResourcePool::new(DEDICATED_TYPE.into(), size, unit.into(), true)?;
        Ok(Self { from, unit, sized })
    }

    /// Server resource the tier is carved from
    pub fn from_resource(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn size(&self) -> &UBig {
        self.sized.size()
    }

    pub fn unit(&self) -> MemoryUnit {
        self.unit
    }
}

impl ResourcePool for ClusteredDedicatedPool {
    fn resource_type(&self) -> ResourceType {
        DEDICATED_TYPE.into()
    }

    fn is_persistent(&self) -> bool {
        true
    }

    fn as_sized(&self) -> Option<&SizedResourcePool> {
        Some(&self.sized)
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for ClusteredDedicatedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pool {{{} {} {}", self.sized.size(), self.sized.unit(), CLUSTERED_DEDICATED)?;
        if let Some(from) = &self.from {
            write!(f, " from {}", from)?;
        }
        write!(f, "}}")
    }
}

/// `<tc:clustered-shared sharing="…"/>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteredSharedPool {
    sharing: String,
}

impl ClusteredSharedPool {
    pub fn new(sharing: impl Into<String>) -> Self {
        Self { sharing: sharing.into() }
    }

    /// Name of the shared server pool
    pub fn sharing(&self) -> &str {
        &self.sharing
    }
}

impl ResourcePool for ClusteredSharedPool {
    fn resource_type(&self) -> ResourceType {
        SHARED_TYPE.into()
    }

    fn is_persistent(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        format!("Pool {{{} sharing {}}}", CLUSTERED_SHARED, self.sharing)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Reads and writes the clustered tiers
#[derive(Debug, Clone, Default)]
pub struct ClusteredResourceConfigurationParser;

impl ClusteredResourceConfigurationParser {
    pub fn new() -> Self {
        Self
    }

    fn error(&self, reason: impl Into<String>) -> XmlConfigurationError {
        XmlConfigurationError::extension(CLUSTERED_NAMESPACE, reason)
    }

    fn parse_dedicated(&self, element: &XmlElement) -> XmlResult<ClusteredDedicatedPool> {
        let size = decode_size(element)?;
        let unit = element
            .attribute(schema::UNIT_ATTRIBUTE)
            .unwrap_or(schema::DEFAULT_MEMORY_UNIT)
            .trim()
            .parse::<MemoryUnit>()?;
        let from = element.attribute(FROM_ATTRIBUTE).map(str::to_string);
        ClusteredDedicatedPool::new(from, size, unit)
    }

    fn parse_shared(&self, element: &XmlElement) -> XmlResult<ClusteredSharedPool> {
        match element.attribute(SHARING_ATTRIBUTE) {
            Some(sharing) if !sharing.trim().is_empty() => Ok(ClusteredSharedPool::new(sharing.trim())),
            _ => Err(self.error(format!("{} requires a '{}' attribute", element, SHARING_ATTRIBUTE))),
        }
    }
}

impl CacheResourceConfigurationParser for ClusteredResourceConfigurationParser {
    fn namespace(&self) -> &str {
        CLUSTERED_NAMESPACE
    }

    fn preferred_prefix(&self) -> Option<&str> {
        Some(CLUSTERED_PREFIX)
    }

    fn resource_types(&self) -> Vec<ExtensionResourceType> {
        vec![CLUSTERED_TYPE, DEDICATED_TYPE, SHARED_TYPE]
    }

    fn parse_resource_configuration(&self, element: &XmlElement) -> XmlResult<Arc<dyn ResourcePool>> {
        let pool: Arc<dyn ResourcePool> = match element.name() {
            CLUSTERED => Arc::new(ClusteredPool),
            CLUSTERED_DEDICATED => Arc::new(self.parse_dedicated(element)?),
            CLUSTERED_SHARED => Arc::new(self.parse_shared(element)?),
            _ => return Err(self.error(format!("unsupported element {}", element))),
        };
        trace!(pool = %pool.describe(), "parsed clustered resource");
        Ok(pool)
    }

    fn unparse_resource_pool(&self, pool: &dyn ResourcePool) -> XmlResult<XmlElement> {
        let any = pool.as_any();

        if let Some(dedicated) = any.downcast_ref::<ClusteredDedicatedPool>() {
            let mut element = XmlElement::namespaced(CLUSTERED_NAMESPACE, CLUSTERED_DEDICATED)
                .with_prefix(CLUSTERED_PREFIX);
            if let Some(from) = dedicated.from_resource() {
                element.set_attribute(FROM_ATTRIBUTE, from);
            }
            return Ok(element
                .with_attribute(schema::UNIT_ATTRIBUTE, dedicated.unit().name())
                .with_text(dedicated.size().to_string()));
        }

        if let Some(shared) = any.downcast_ref::<ClusteredSharedPool>() {
            return Ok(XmlElement::namespaced(CLUSTERED_NAMESPACE, CLUSTERED_SHARED)
                .with_prefix(CLUSTERED_PREFIX)
                .with_attribute(SHARING_ATTRIBUTE, shared.sharing()));
        }

        if any.is::<ClusteredPool>() {
            return Ok(XmlElement::namespaced(CLUSTERED_NAMESPACE, CLUSTERED).with_prefix(CLUSTERED_PREFIX));
        }

        Err(self.error(format!("cannot write {}", pool.describe())))
    }
}

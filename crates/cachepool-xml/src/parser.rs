//! Translation between cache resource elements and resource pools.

use std::sync::Arc;

use tracing::{debug, error, trace};

use cachepool_error::{XmlConfigurationError, XmlResult};
use cachepool_types::{
    CoreResourceType, MemoryUnit, ResourcePool, ResourcePools, ResourcePoolsBuilder, ResourceType,
    ResourceUnit, SizedResourcePool,
};

use crate::codec::CoreSchemaCodec;
use crate::dom::XmlElement;
use crate::extension::ExtensionParserRegistry;
use crate::model::{CoreResource, DiskResource, HeapResource, MemoryResource};
use crate::settings::{ParserSettings, WriterSettings};
use crate::template::{CacheTemplate, CacheType};

/// Reads the resources of a cache into [`ResourcePools`] and writes them back.
///
/// Core tiers go through the [`CoreSchemaCodec`]; every other namespace is
/// handed to the extension parser registered for it. The parser holds no
/// mutable state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct ResourceConfigurationParser {
    codec: CoreSchemaCodec,
    extensions: Arc<ExtensionParserRegistry>,
    settings: ParserSettings,
}

impl ResourceConfigurationParser {
    pub fn new(settings: &ParserSettings, extensions: Arc<ExtensionParserRegistry>) -> Self {
        Self {
            codec: CoreSchemaCodec::new(settings),
            extensions,
            settings: settings.clone(),
        }
    }

    /// Default settings, no extension
    pub fn with_defaults() -> Self {
        Self::new(&ParserSettings::default(), Arc::new(ExtensionParserRegistry::empty()))
    }

    pub fn codec(&self) -> &CoreSchemaCodec {
        &self.codec
    }

    pub fn extensions(&self) -> &ExtensionParserRegistry {
        &self.extensions
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Writer settings with the extension prefixes filled in.
    ///
    /// Prefixes from the settings win over the ones extensions prefer.
    pub fn writer_settings(&self) -> WriterSettings {
        let mut writer = self.settings.writer.clone();
        for (namespace, prefix) in self.extensions.prefixes() {
            writer
                .prefixes
                .entry(namespace.to_string())
                .or_insert_with(|| prefix.to_string());
        }
        writer
    }

    /// Build the resource pools declared by a cache.
    ///
    /// A heap shorthand takes precedence over the resource list.
    pub fn parse_resource_configuration(
        &self,
        template: &CacheTemplate,
        builder: ResourcePoolsBuilder,
    ) -> XmlResult<ResourcePools> {
        let mut builder = builder;

        if let Some(heap) = template.heap() {
            debug!(cache = %template.id(), "using heap shorthand");
            builder = builder.with_pool(self.parse_heap(heap)?)?;
        } else if !template.resources().is_empty() {
            for element in template.resources() {
                let pool = if self.codec.is_core(element) {
                    self.parse_core(element)?
                } else {
                    self.resolve_extension(element)?
                };
                trace!(cache = %template.id(), pool = %pool.describe(), "parsed resource");
                builder = builder.with(pool)?;
            }
        } else {
            return Err(XmlConfigurationError::no_resources(template.id()));
        }

        let pools = builder.build();
        debug!(cache = %template.id(), tiers = pools.len(), "parsed resource configuration");
        Ok(pools)
    }

    /// Parse an element with the extension parser owning its namespace
    pub fn resolve_extension(&self, element: &XmlElement) -> XmlResult<Arc<dyn ResourcePool>> {
        let namespace = element.namespace().unwrap_or("");
        let parser = self
            .extensions
            .parser_for_namespace(namespace)
            .ok_or_else(|| XmlConfigurationError::unknown_namespace(namespace))?;
        parser.parse_resource_configuration(element)
    }

    /// Write the pools into the `<resources>` of a cache element.
    ///
    /// Pools are written in tier order; the first failure aborts the call.
    pub fn unparse_resource_configuration(
        &self,
        pools: &ResourcePools,
        cache: CacheType,
    ) -> XmlResult<CacheType> {
        let mut resources = Vec::with_capacity(pools.len());

        for (resource_type, pool) in pools.iter() {
            let element = match resource_type {
                ResourceType::Core(core) => self.unparse_core(*core, pool.as_ref())?,
                ResourceType::Extension(extension) => {
                    let parser = self.extensions.parser_for_type(extension).ok_or_else(|| {
                        defect(format!("no parser registered for resource type {}", resource_type))
                    })?;
                    parser.unparse_resource_pool(pool.as_ref())?
                }
            };
            trace!(cache = %cache.id(), element = %element, "unparsed resource");
            resources.push(element);
        }

        debug!(cache = %cache.id(), tiers = resources.len(), "unparsed resource configuration");
        Ok(cache.with_resources(resources))
    }

    fn parse_heap(&self, heap: &HeapResource) -> XmlResult<SizedResourcePool> {
        let unit = parse_unit(&heap.unit)?;
        Ok(SizedResourcePool::new(ResourceType::HEAP, heap.value.clone(), unit, false)?)
    }

    fn parse_core(&self, element: &XmlElement) -> XmlResult<Arc<dyn ResourcePool>> {
        let pool = match self.codec.decode(element)? {
            CoreResource::Heap(heap) => self.parse_heap(&heap)?,
            CoreResource::Offheap(offheap) => SizedResourcePool::new(
                ResourceType::OFFHEAP,
                offheap.value,
                parse_memory(&offheap.unit)?.into(),
                false,
            )?,
            CoreResource::Disk(disk) => SizedResourcePool::new(
                ResourceType::DISK,
                disk.value,
                parse_memory(&disk.unit)?.into(),
                disk.persistent,
            )?,
        };
        Ok(Arc::new(pool))
    }

    fn unparse_core(&self, core: CoreResourceType, pool: &dyn ResourcePool) -> XmlResult<XmlElement> {
        let sized = pool
            .as_sized()
            .ok_or_else(|| defect(format!("core pool {} has no size", pool.describe())))?;
        let value = sized.size().clone();

        let resource = match core {
            CoreResourceType::Heap => CoreResource::Heap(HeapResource::new(value, unparse_unit(sized.unit()))),
            CoreResourceType::Offheap => {
                CoreResource::Offheap(MemoryResource::new(value, unparse_memory(sized)?.name()))
            }
            CoreResourceType::Disk => CoreResource::Disk(DiskResource::new(
                value,
                unparse_memory(sized)?.name(),
                sized.is_persistent(),
            )),
        };

        self.codec.encode(&resource)
    }
}

impl Default for ResourceConfigurationParser {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// `entries` in any case, otherwise a memory unit name
fn parse_unit(unit: &str) -> XmlResult<ResourceUnit> {
    Ok(unit.parse::<ResourceUnit>()?)
}

fn parse_memory(unit: &str) -> XmlResult<MemoryUnit> {
    Ok(unit.parse::<MemoryUnit>()?)
}

fn unparse_unit(unit: ResourceUnit) -> &'static str {
    unit.name()
}

fn unparse_memory(pool: &SizedResourcePool) -> XmlResult<MemoryUnit> {
    pool.unit()
        .as_memory()
        .ok_or_else(|| defect(format!("{} is not sized in memory", pool)))
}

fn defect(reason: String) -> XmlConfigurationError {
    error!(reason = %reason, "resource configuration is internally inconsistent");
    XmlConfigurationError::internal(reason)
}

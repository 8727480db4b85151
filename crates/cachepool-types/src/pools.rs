//! Immutable pool collections and their builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashu::integer::UBig;
use tracing::trace;

use cachepool_error::{PoolError, PoolResult};

use crate::pool::{ResourcePool, SizedResourcePool};
use crate::resource_type::ResourceType;
use crate::unit::{MemoryUnit, ResourceUnit};

/// The tiers of one cache, at most one pool per resource type.
///
/// Iteration follows tier order: heap, offheap, disk, then extension tiers
/// by type tag.
#[derive(Debug, Clone, Default)]
pub struct ResourcePools {
    pools: BTreeMap<ResourceType, Arc<dyn ResourcePool>>,
}

impl ResourcePools {
    pub fn pool_for_resource(&self, resource_type: &ResourceType) -> Option<&Arc<dyn ResourcePool>> {
        self.pools.get(resource_type)
    }

    pub fn sized_pool_for_resource(&self, resource_type: &ResourceType) -> Option<&SizedResourcePool> {
        self.pools.get(resource_type).and_then(|pool| pool.as_sized())
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &ResourceType> {
        self.pools.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceType, &Arc<dyn ResourcePool>)> {
        self.pools.iter()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Accumulates pools and produces an immutable [`ResourcePools`].
#[derive(Debug, Clone, Default)]
pub struct ResourcePoolsBuilder {
    pools: BTreeMap<ResourceType, Arc<dyn ResourcePool>>,
}

impl ResourcePoolsBuilder {
    pub fn new_resource_pools_builder() -> Self {
        Self::default()
    }

    /// Start from the pools of an existing collection
    pub fn from_pools(pools: &ResourcePools) -> Self {
        Self {
            pools: pools.pools.clone(),
        }
    }

    /// Add a pool; fails if a pool of the same type is already present
    pub fn with(mut self, pool: Arc<dyn ResourcePool>) -> PoolResult<Self> {
        let resource_type = pool.resource_type();
        if let Some(existing) = self.pools.get(&resource_type) {
            return Err(PoolError::DuplicatePool {
                existing: existing.describe(),
                attempted: pool.describe(),
            });
        }
        trace!(resource = %resource_type, "adding resource pool");
        self.pools.insert(resource_type, pool);
        Ok(self)
    }

    pub fn with_pool<P: ResourcePool>(self, pool: P) -> PoolResult<Self> {
        self.with(Arc::new(pool))
    }

    /// Add a pool, replacing any pool of the same type
    pub fn with_replacing(mut self, pool: Arc<dyn ResourcePool>) -> Self {
        let resource_type = pool.resource_type();
        if self.pools.insert(resource_type.clone(), pool).is_some() {
            trace!(resource = %resource_type, "replaced resource pool");
        }
        self
    }

    pub fn heap(self, size: impl Into<UBig>, unit: impl Into<ResourceUnit>) -> PoolResult<Self> {
        let pool = SizedResourcePool::new(ResourceType::HEAP, size, unit.into(), false)?;
        self.with_pool(pool)
    }

    pub fn offheap(self, size: impl Into<UBig>, unit: MemoryUnit) -> PoolResult<Self> {
        let pool = SizedResourcePool::new(ResourceType::OFFHEAP, size, unit.into(), false)?;
        self.with_pool(pool)
    }

    pub fn disk(self, size: impl Into<UBig>, unit: MemoryUnit, persistent: bool) -> PoolResult<Self> {
        let pool = SizedResourcePool::new(ResourceType::DISK, size, unit.into(), persistent)?;
        self.with_pool(pool)
    }

    pub fn build(self) -> ResourcePools {
        ResourcePools { pools: self.pools }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use crate::resource_type::ExtensionResourceType;

    #[derive(Debug)]
    struct SharedPool;

    impl ResourcePool for SharedPool {
        fn resource_type(&self) -> ResourceType {
            ResourceType::Extension(ExtensionResourceType::new_static("shared", true))
        }

        fn is_persistent(&self) -> bool {
            true
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_builds_in_tier_order() {
        let pools = ResourcePoolsBuilder::new_resource_pools_builder()
            .disk(1u32, MemoryUnit::GB, true).unwrap()
            .with_pool(SharedPool).unwrap()
            .heap(100u32, ResourceUnit::Entries).unwrap()
            .offheap(10u32, MemoryUnit::MB).unwrap()
            .build();

        let names: Vec<_> = pools.resource_types().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["heap", "offheap", "disk", "shared"]);
        assert_eq!(pools.len(), 4);
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let err = ResourcePoolsBuilder::new_resource_pools_builder()
            .heap(10u32, ResourceUnit::Entries).unwrap()
            .heap(20u32, MemoryUnit::MB)
            .unwrap_err();

        match err {
            PoolError::DuplicatePool { existing, attempted } => {
                assert_eq!(existing, "Pool {10 entries heap}");
                assert_eq!(attempted, "Pool {20 MB heap}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[derive(Debug)]
    struct VolatileSharedPool;

    impl ResourcePool for VolatileSharedPool {
        fn resource_type(&self) -> ResourceType {
            ResourceType::Extension(ExtensionResourceType::new_static("shared", false))
        }

        fn is_persistent(&self) -> bool {
            false
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_extension_kind_is_its_tag() {
        let err = ResourcePoolsBuilder::new_resource_pools_builder()
            .with_pool(SharedPool).unwrap()
            .with_pool(VolatileSharedPool)
            .unwrap_err();
        assert!(matches!(err, PoolError::DuplicatePool { .. }));

        let pools = ResourcePoolsBuilder::new_resource_pools_builder()
            .with_pool(SharedPool).unwrap()
            .with_replacing(Arc::new(VolatileSharedPool))
            .build();
        assert_eq!(pools.len(), 1);
    }

    #[test]
    fn test_replacing_overwrites() {
        let replacement = SizedResourcePool::new(ResourceType::HEAP, 5u32, MemoryUnit::MB.into(), false).unwrap();
        let pools = ResourcePoolsBuilder::new_resource_pools_builder()
            .heap(10u32, ResourceUnit::Entries).unwrap()
            .with_replacing(Arc::new(replacement.clone()))
            .build();

        assert_eq!(pools.sized_pool_for_resource(&ResourceType::HEAP), Some(&replacement));
    }

    #[test]
    fn test_from_pools_extends_existing_collection() {
        let base = ResourcePoolsBuilder::new_resource_pools_builder()
            .heap(10u32, ResourceUnit::Entries).unwrap()
            .build();
        let extended = ResourcePoolsBuilder::from_pools(&base)
            .offheap(1u32, MemoryUnit::GB).unwrap()
            .build();

        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(extended.pool_for_resource(&ResourceType::OFFHEAP).is_some());
        assert!(extended.sized_pool_for_resource(&ResourceType::DISK).is_none());
    }

    #[test]
    fn test_unsized_extension_has_no_sized_view() {
        let pools = ResourcePoolsBuilder::new_resource_pools_builder()
            .with_pool(SharedPool).unwrap()
            .build();
        let shared = ResourceType::Extension(ExtensionResourceType::new_static("shared", true));

        assert!(pools.pool_for_resource(&shared).is_some());
        assert!(pools.sized_pool_for_resource(&shared).is_none());
    }
}

//! Resource pools: one configured tier of a cache.

use std::any::Any;
use std::fmt;

use dashu::integer::UBig;

use cachepool_error::{PoolError, PoolResult};

use crate::resource_type::ResourceType;
use crate::unit::ResourceUnit;

/// A configured capacity tier.
///
/// Core tiers are always [`SizedResourcePool`]s. Extensions may contribute
/// their own pool types; they are told apart by [`ResourceType`] and
/// recovered through [`ResourcePool::as_any`].
pub trait ResourcePool: fmt::Debug + Send + Sync + 'static {
    fn resource_type(&self) -> ResourceType;

    fn is_persistent(&self) -> bool;

    /// The sized view of this pool, if it has a size and a unit.
    fn as_sized(&self) -> Option<&SizedResourcePool> {
        None
    }

    /// Human readable summary, used in error messages.
    fn describe(&self) -> String {
        format!("Pool {{{}}}", self.resource_type())
    }

    fn as_any(&self) -> &dyn Any;
}

/// A pool with a size expressed in a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizedResourcePool {
    resource_type: ResourceType,
    size: UBig,
    unit: ResourceUnit,
    persistent: bool,
}

impl SizedResourcePool {
    /// Create a pool, checking the unit and persistence against the type
    pub fn new(
        resource_type: ResourceType,
        size: impl Into<UBig>,
        unit: ResourceUnit,
        persistent: bool,
    ) -> PoolResult<Self> {
        if let Some(core) = resource_type.as_core() {
            if !core.accepts(&unit) {
                return Err(PoolError::IncompatibleUnit {
                    resource: resource_type.to_string(),
                    unit: unit.to_string(),
                });
            }
        }
        if persistent && !resource_type.is_persistable() {
            return Err(PoolError::NotPersistable {
                resource: resource_type.to_string(),
            });
        }

        Ok(Self {
            resource_type,
            size: size.into(),
            unit,
            persistent,
        })
    }

    pub fn size(&self) -> &UBig {
        &self.size
    }

    /// The size as a machine integer, if it fits
    pub fn size_u64(&self) -> Option<u64> {
        u64::try_from(&self.size).ok()
    }

    pub fn unit(&self) -> ResourceUnit {
        self.unit
    }

    /// The size in bytes, for memory-sized pools
    pub fn size_in_bytes(&self) -> Option<UBig> {
        self.unit.as_memory().map(|unit| unit.to_bytes(&self.size))
    }
}

impl ResourcePool for SizedResourcePool {
    fn resource_type(&self) -> ResourceType {
        self.resource_type.clone()
    }

    fn is_persistent(&self) -> bool {
        self.persistent
    }

    fn as_sized(&self) -> Option<&SizedResourcePool> {
        Some(self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for SizedResourcePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pool {{{} {} {}", self.size, self.unit, self.resource_type)?;
        if self.persistent {
            write!(f, "(persistent)")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_type::ExtensionResourceType;
    use crate::unit::MemoryUnit;

    #[test]
    fn test_heap_in_entries() {
        let pool = SizedResourcePool::new(ResourceType::HEAP, 2000u32, ResourceUnit::Entries, false).unwrap();
        assert_eq!(pool.size_u64(), Some(2000));
        assert_eq!(pool.unit(), ResourceUnit::Entries);
        assert!(pool.size_in_bytes().is_none());
        assert_eq!(pool.to_string(), "Pool {2000 entries heap}");
    }

    #[test]
    fn test_offheap_rejects_entries() {
        let err = SizedResourcePool::new(ResourceType::OFFHEAP, 10u32, ResourceUnit::Entries, false).unwrap_err();
        assert!(matches!(err, PoolError::IncompatibleUnit { .. }));
    }

    #[test]
    fn test_only_persistable_types_persist() {
        let err = SizedResourcePool::new(ResourceType::HEAP, 1u32, MemoryUnit::MB.into(), true).unwrap_err();
        assert_eq!(err, PoolError::NotPersistable { resource: "heap".to_string() });

        let disk = SizedResourcePool::new(ResourceType::DISK, 1u32, MemoryUnit::GB.into(), true).unwrap();
        assert!(disk.is_persistent());
        assert_eq!(disk.to_string(), "Pool {1 GB disk(persistent)}");
    }

    #[test]
    fn test_extension_pools_accept_any_unit() {
        let ext = ResourceType::Extension(ExtensionResourceType::new_static("custom", false));
        let pool = SizedResourcePool::new(ext, 5u32, ResourceUnit::Entries, false).unwrap();
        assert!(pool.as_sized().is_some());
    }

    #[test]
    fn test_large_sizes_are_kept() {
        let huge: UBig = "123456789012345678901234567890".parse().unwrap();
        let pool = SizedResourcePool::new(ResourceType::DISK, huge.clone(), MemoryUnit::B.into(), false).unwrap();
        assert_eq!(pool.size(), &huge);
        assert_eq!(pool.size_u64(), None);
    }
}

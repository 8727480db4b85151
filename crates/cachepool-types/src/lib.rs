//! Resource pool model for cache tier configuration.
//!
//! A cache is backed by one or more capacity tiers (heap, off-heap, disk, or
//! a tier contributed by an extension). Each tier is described by a
//! [`ResourcePool`]; the tiers of one cache are collected into an immutable
//! [`ResourcePools`] through a [`ResourcePoolsBuilder`].

pub mod pool;
pub mod pools;
pub mod resource_type;
pub mod unit;

pub use pool::{ResourcePool, SizedResourcePool};
pub use pools::{ResourcePools, ResourcePoolsBuilder};
pub use resource_type::{CoreResourceType, ExtensionResourceType, ResourceType};
pub use unit::{MemoryUnit, ResourceUnit, ENTRIES};

// Sizes are carried as arbitrary precision naturals end-to-end
pub use dashu::integer::UBig;

pub use cachepool_error::{PoolError, PoolResult};

//! Value objects of the core resource elements.
//!
//! These mirror the elements one to one: the size is the element text, the
//! unit is the raw `unit` attribute token. Turning the token into a
//! [`ResourceUnit`](cachepool_types::ResourceUnit) is left to the parser so
//! that unit names can be matched leniently.

use dashu::integer::UBig;

use crate::schema;

/// `<heap unit="…">size</heap>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapResource {
    pub value: UBig,
    pub unit: String,
}

impl HeapResource {
    pub fn new(value: impl Into<UBig>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
        }
    }
}

/// `<offheap unit="…">size</offheap>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryResource {
    pub value: UBig,
    pub unit: String,
}

impl MemoryResource {
    pub fn new(value: impl Into<UBig>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
        }
    }
}

/// `<disk unit="…" persistent="…">size</disk>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskResource {
    pub value: UBig,
    pub unit: String,
    pub persistent: bool,
}

impl DiskResource {
    pub fn new(value: impl Into<UBig>, unit: impl Into<String>, persistent: bool) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
            persistent,
        }
    }
}

/// Any element of the core schema that describes a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreResource {
    Heap(HeapResource),
    Offheap(MemoryResource),
    Disk(DiskResource),
}

impl CoreResource {
    pub fn element_name(&self) -> &'static str {
        match self {
            CoreResource::Heap(_) => schema::HEAP,
            CoreResource::Offheap(_) => schema::OFFHEAP,
            CoreResource::Disk(_) => schema::DISK,
        }
    }
}

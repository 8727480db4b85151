//! Units that size a resource pool.
//!
//! A pool is sized either by a number of entries or by an amount of memory.
//! Unit names are matched case-insensitively, so `"kb"`, `"KB"` and `"kB"`
//! all name [`MemoryUnit::KB`].

use std::fmt;
use std::str::FromStr;

use dashu::integer::UBig;
use serde::{Deserialize, Serialize};

use cachepool_error::PoolError;

/// Name of the count unit.
pub const ENTRIES: &str = "entries";

/// Byte-scaled memory units, each 1024 times the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryUnit {
    B,
    KB,
    MB,
    GB,
    TB,
    PB,
}

impl MemoryUnit {
    pub const ALL: [MemoryUnit; 6] = [
        MemoryUnit::B,
        MemoryUnit::KB,
        MemoryUnit::MB,
        MemoryUnit::GB,
        MemoryUnit::TB,
        MemoryUnit::PB,
    ];

    /// Canonical name, as written in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            MemoryUnit::B => "B",
            MemoryUnit::KB => "kB",
            MemoryUnit::MB => "MB",
            MemoryUnit::GB => "GB",
            MemoryUnit::TB => "TB",
            MemoryUnit::PB => "PB",
        }
    }

    fn shift(&self) -> usize {
        match self {
            MemoryUnit::B => 0,
            MemoryUnit::KB => 10,
            MemoryUnit::MB => 20,
            MemoryUnit::GB => 30,
            MemoryUnit::TB => 40,
            MemoryUnit::PB => 50,
        }
    }

    /// Look up a unit by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|unit| unit.name().eq_ignore_ascii_case(name))
    }

    /// Number of bytes in `size` of this unit
    pub fn to_bytes(&self, size: &UBig) -> UBig {
        size << self.shift()
    }

    /// Express `size` of this unit in `target`, rounding down
    pub fn convert(&self, size: &UBig, target: MemoryUnit) -> UBig {
        let (from, to) = (self.shift(), target.shift());
        if from >= to {
            size << (from - to)
        } else {
            size >> (to - from)
        }
    }
}

impl fmt::Display for MemoryUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MemoryUnit {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemoryUnit::from_name(s).ok_or_else(|| PoolError::UnknownUnit(s.to_string()))
    }
}

/// Unit of a sized resource pool: a count of entries or an amount of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceUnit {
    Entries,
    Memory(MemoryUnit),
}

impl ResourceUnit {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceUnit::Entries => ENTRIES,
            ResourceUnit::Memory(unit) => unit.name(),
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, ResourceUnit::Memory(_))
    }

    pub fn as_memory(&self) -> Option<MemoryUnit> {
        match self {
            ResourceUnit::Memory(unit) => Some(*unit),
            ResourceUnit::Entries => None,
        }
    }

    /// Whether sizes in the two units can be compared
    pub fn is_compatible(&self, other: &ResourceUnit) -> bool {
        self.is_memory() == other.is_memory()
    }
}

impl From<MemoryUnit> for ResourceUnit {
    fn from(unit: MemoryUnit) -> Self {
        ResourceUnit::Memory(unit)
    }
}

impl fmt::Display for ResourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceUnit {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ENTRIES) {
            Ok(ResourceUnit::Entries)
        } else {
            s.parse::<MemoryUnit>().map(ResourceUnit::Memory)
        }
    }
}

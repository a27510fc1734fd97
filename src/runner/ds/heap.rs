//! Heap accounting for binding structures.
//!
//! Every prototype slot, template descriptor, external object header and
//! promoted descriptor is charged here before it is created. A charge that
//! would exceed the configured budget fails with `OutOfMemory` and nothing
//! is allocated.

use serde::Deserialize;
use std::mem;

use crate::runner::ds::error::JErrorType;

/// Configuration for the heap manager.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeapConfig {
    /// Maximum heap size in bytes. None means unlimited.
    pub max_bytes: Option<usize>,
}

impl HeapConfig {
    /// Create a new heap configuration with no memory limit.
    pub fn unlimited() -> Self {
        HeapConfig { max_bytes: None }
    }

    /// Create a new heap configuration with a memory limit.
    pub fn with_limit(max_bytes: usize) -> Self {
        HeapConfig {
            max_bytes: Some(max_bytes),
        }
    }
}

#[derive(Debug)]
pub struct Heap {
    config: HeapConfig,
    allocated_bytes: usize,
}

impl Heap {
    pub fn new(config: HeapConfig) -> Self {
        Heap {
            config,
            allocated_bytes: 0,
        }
    }

    /// Charge `bytes` against the budget.
    pub fn allocate(&mut self, bytes: usize) -> Result<(), JErrorType> {
        if !self.can_allocate(bytes) {
            return Err(JErrorType::OutOfMemory);
        }
        self.allocated_bytes += bytes;
        Ok(())
    }

    /// Charge the size of `count` values of `T`.
    pub fn allocate_for<T>(&mut self, count: usize) -> Result<(), JErrorType> {
        self.allocate(mem::size_of::<T>().saturating_mul(count))
    }

    pub fn deallocate(&mut self, bytes: usize) {
        self.allocated_bytes = self.allocated_bytes.saturating_sub(bytes);
    }

    pub fn get_allocated(&self) -> usize {
        self.allocated_bytes
    }

    pub fn get_max_bytes(&self) -> Option<usize> {
        self.config.max_bytes
    }

    pub fn can_allocate(&self, bytes: usize) -> bool {
        match self.config.max_bytes {
            Some(max_bytes) => self
                .allocated_bytes
                .checked_add(bytes)
                .map_or(false, |total| total <= max_bytes),
            None => true,
        }
    }

    /// Remaining bytes, if limited.
    pub fn available_bytes(&self) -> Option<usize> {
        self.config
            .max_bytes
            .map(|max| max.saturating_sub(self.allocated_bytes))
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(HeapConfig::default())
    }
}

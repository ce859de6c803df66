//! The threshold allocator: routes requests to one of two peer allocators
//! by request size.
//!
//! ```text
//!   allocate(size)
//!        │
//!        ▼
//!   size > size_threshold? ──yes──► above.allocate(size), remember it
//!        │no
//!        ▼
//!   below.allocate(size)
//! ```

use std::collections::HashSet;

use crate::contract::{Address, Allocator};
use crate::error::{fatal, AllocError};

/// Splits traffic between two peer allocators by request size.
///
/// The "above" set uses a `HashSet` purely to disambiguate `release` in
/// O(1), unlike the arena's `Vec`-backed, explicitly O(n) outstanding set.
pub struct ThresholdAllocator {
    size_threshold: usize,
    above: Box<dyn Allocator>,
    below: Box<dyn Allocator>,
    above_addresses: HashSet<Address>,
}

impl ThresholdAllocator {
    pub fn new(size_threshold: usize, above: Box<dyn Allocator>, below: Box<dyn Allocator>) -> Self {
        Self { size_threshold, above, below, above_addresses: HashSet::new() }
    }
}

impl Allocator for ThresholdAllocator {
    fn allocate(&mut self, size: usize) -> Address {
        if size > self.size_threshold {
            let address = self.above.allocate(size);
            self.above_addresses.insert(address);
            address
        } else {
            self.below.allocate(size)
        }
    }

    fn release(&mut self, address: Address) {
        if self.above_addresses.remove(&address) {
            self.above.release(address);
        } else {
            self.below.release(address);
        }
    }

    fn teardown(&mut self) -> Result<(), AllocError> {
        if !self.above_addresses.is_empty() {
            fatal(
                "threshold::teardown",
                format_args!("{} outstanding allocation(s) routed above the threshold", self.above_addresses.len()),
            );
        }
        self.above.teardown()?;
        self.below.teardown()?;
        Ok(())
    }
}

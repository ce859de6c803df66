//! The default allocator: a direct adapter to the platform heap.
//!
//! ```text
//!   DefaultAllocator
//!
//!   allocate(size) ──► libc::malloc(size) ──► Address
//!   release(addr)  ──► libc::free(addr)
//! ```
//!
//! This is the leaf every composed allocator in this crate eventually
//! bottoms out at. It is stateless in the sense that matters to composition:
//! it may be referenced by many composites without any shared mutable state
//! between them. It still tracks outstanding addresses on its own, though,
//! so its own `teardown` can report a leak rather than silently doing
//! nothing. Every other allocator in this crate keeps that bookkeeping, and
//! the default allocator is the one place a caller can plug in raw heap
//! traffic directly, so it should not be the one place leaks go unnoticed.

use std::collections::HashSet;

use crate::contract::{Address, Allocator};
use crate::error::{fatal, AllocError};

/// A direct adapter to the platform heap's `malloc`/`free` pair.
///
/// Alignment matches whatever `malloc` guarantees on the host platform; this
/// layer enforces nothing stronger.
#[derive(Default)]
pub struct DefaultAllocator {
    outstanding: HashSet<Address>,
}

impl DefaultAllocator {
    /// Creates a new default allocator with no outstanding allocations.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Allocator for DefaultAllocator {
    fn allocate(&mut self, size: usize) -> Address {
        // SAFETY: `size` is a plain byte count; malloc(0) is permitted by
        // POSIX to return either NULL or a unique freeable pointer, and
        // either is handled as an ordinary opaque address.
        let raw = unsafe { libc::malloc(size) };
        if raw.is_null() && size > 0 {
            fatal("default::allocate", format_args!("libc::malloc({size}) returned NULL"));
        }
        let address = Address::from_ptr(raw);
        tracing::trace!(size, ?address, "default allocator: allocate");
        self.outstanding.insert(address);
        address
    }

    fn release(&mut self, address: Address) {
        if !self.outstanding.remove(&address) {
            fatal(
                "default::release",
                format_args!("{address:?} was not returned by this allocator, or was already released"),
            );
        }
        tracing::trace!(?address, "default allocator: release");
        // SAFETY: `address` was produced by a prior `libc::malloc` call on
        // this allocator and has not been released since, per the check
        // above.
        unsafe { libc::free(address.as_ptr()) };
    }

    fn teardown(&mut self) -> Result<(), AllocError> {
        if !self.outstanding.is_empty() {
            return Err(AllocError::Leak { count: self.outstanding.len() });
        }
        Ok(())
    }
}

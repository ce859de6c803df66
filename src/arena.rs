//! The arena allocator: tracks every allocation it hands out so they can all
//! be released in one bulk pass.
//!
//! ```text
//!   allocate(size) ──► inner.allocate(size) ──► record address ──► return
//!
//!   release(addr)   ──► forget the address (fatal if unknown) ──► inner.release(addr)
//!   release_all()   ──► inner.release every recorded address, then forget all
//! ```

use crate::contract::{Address, Allocator};
use crate::error::{fatal, AllocError};

/// Wraps any allocator and remembers every address it has handed out that
/// has not yet been released, so the whole batch can be released at once.
///
/// Outstanding addresses are kept in a `Vec` rather than a hash set: direct
/// `release` is O(n) in the number of outstanding addresses (a linear scan
/// plus `swap_remove`), while `allocate` is O(1) amortized and
/// `release_all` is O(n).
pub struct ArenaAllocator {
    inner: Box<dyn Allocator>,
    outstanding: Vec<Address>,
}

impl ArenaAllocator {
    pub fn new(inner: Box<dyn Allocator>) -> Self {
        Self { inner, outstanding: Vec::new() }
    }

    /// Releases every outstanding address through the inner allocator, then
    /// empties the tracking list. Prefer this over repeated direct
    /// `release` calls.
    pub fn release_all(&mut self) {
        for address in self.outstanding.drain(..) {
            self.inner.release(address);
        }
    }

    pub fn outstanding_count(&self) -> usize {
        self.outstanding.len()
    }
}

impl Allocator for ArenaAllocator {
    fn allocate(&mut self, size: usize) -> Address {
        let address = self.inner.allocate(size);
        self.outstanding.push(address);
        address
    }

    fn release(&mut self, address: Address) {
        match self.outstanding.iter().position(|&a| a == address) {
            Some(index) => {
                self.outstanding.swap_remove(index);
                self.inner.release(address);
            }
            None => fatal("arena::release", format_args!("{address:?} is not outstanding on this arena")),
        }
    }

    fn teardown(&mut self) -> Result<(), AllocError> {
        if !self.outstanding.is_empty() {
            return Err(AllocError::Leak { count: self.outstanding.len() });
        }
        self.inner.teardown()
    }
}

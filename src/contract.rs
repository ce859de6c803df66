//! The allocator contract: [`Address`] and the [`Allocator`] trait.
//!
//! ```text
//!   Allocate(size) ──► Address ──► held exclusively by the caller ──► Release(Address)
//!
//!   Teardown() releases everything the allocator itself still owns and
//!   reports (does not repair) any Address the caller never released.
//! ```
//!
//! No layer in this crate ever dereferences an `Address` it hands out.
//! Addresses only flow downward through `Allocate`/`Release` delegation and
//! are meaningful only to foreign code on the other side of an FFI
//! boundary. That is why `Address` is a bare machine word rather than a
//! typed pointer: there is no aliasing or provenance for this crate to
//! respect, only bookkeeping.

use std::fmt;

use crate::error::AllocError;

/// An opaque, machine-word-sized handle to a raw memory location.
///
/// Produced by [`Allocator::allocate`] and consumed by [`Allocator::release`].
/// Comparable and hashable so the pool/arena/threshold layers can index and
/// deduplicate them; never dereferenced by this crate.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub usize);

impl Address {
    /// The null address: the zero machine word. `libc::malloc` returning
    /// null is represented this way rather than as an `Option`, matching
    /// the C convention the default allocator sits on top of.
    pub const NULL: Address = Address(0);

    /// Reinterprets this address as a raw pointer, for handing off to
    /// foreign code or for the default allocator's own bookkeeping.
    pub fn as_ptr(self) -> *mut libc::c_void {
        self.0 as *mut libc::c_void
    }

    /// Wraps a raw pointer as an opaque address.
    pub fn from_ptr(ptr: *mut libc::c_void) -> Self {
        Address(ptr as usize)
    }

    /// `true` if this address is a multiple of `alignment`.
    pub fn is_aligned_to(self, alignment: usize) -> bool {
        self.0 % alignment == 0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#x})", self.0)
    }
}

/// The uniform capability every allocator strategy in this crate satisfies.
///
/// Implementations never promise thread safety, zeroing, alignment greater
/// than whatever the underlying allocator already provides, or
/// reallocation. `teardown` takes `&mut self` rather than consuming `self`
/// by value so the trait stays object-safe and composes through
/// `Box<dyn Allocator>`; callers must still treat the allocator as unusable
/// once `teardown` returns `Ok`.
pub trait Allocator {
    /// Returns a fresh address good for `size` bytes. `size` may be zero;
    /// a zero-size request is not special-cased and is handled like any
    /// other. Fatal if the underlying platform allocation fails.
    fn allocate(&mut self, size: usize) -> Address;

    /// Releases an address previously returned by `allocate` on this same
    /// allocator. Fatal if `address` was not produced by this allocator or
    /// has already been released.
    fn release(&mut self, address: Address);

    /// Releases this allocator's own resources and detects, but does not
    /// repair, any outstanding (unreleased) address. Returns
    /// [`AllocError::Leak`] if any are found; the allocator's bookkeeping is
    /// left untouched in that case so the caller can still inspect it.
    fn teardown(&mut self) -> Result<(), AllocError>;
}

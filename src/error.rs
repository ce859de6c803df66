//! Error type and the fatal-error helper.
//!
//! The allocator contract (see [`crate::contract`]) distinguishes two very
//! different failure classes:
//!
//! - a **leak**, detected at [`Allocator::teardown`](crate::contract::Allocator::teardown),
//!   is recoverable: the caller gets an [`AllocError`] back and can log it,
//!   retry, or exit deliberately.
//! - a **programmer error**, such as releasing a pointer this allocator
//!   never produced, releasing it twice, or asking a fixed-block pool for
//!   more than one block's worth of bytes, is not recoverable. The page
//!   index and free lists have no way to repair themselves once those
//!   invariants are violated, so these go through [`fatal`] and abort the
//!   process via a panic.

use std::fmt;

/// Errors a composed allocator can hand back to its caller.
///
/// This is the only error variant in the crate: every other failure mode
/// (double release, foreign-pointer release, oversized allocation, use
/// after teardown) is a programmer error and goes through [`fatal`] instead
/// of this type.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// `teardown` was called while allocations obtained from this allocator
    /// are still outstanding. The allocator's resources are left intact;
    /// `teardown` detects leaks, it does not repair them.
    #[error("teardown found {count} outstanding allocation(s) still live")]
    Leak {
        /// Number of addresses that were never released.
        count: usize,
    },
}

/// Aborts the process for an unrecoverable programmer error.
///
/// Per the contract, releasing an address this allocator did not produce,
/// releasing the same address twice, or requesting more than a fixed-block
/// allocator's block size are bugs in the caller, not conditions the
/// allocator can negotiate. Continuing would corrupt the page index or free
/// lists, so this logs the failure at `error` level and panics.
#[track_caller]
pub(crate) fn fatal(site: &'static str, detail: impl fmt::Display) -> ! {
    tracing::error!(site, %detail, "rallocator: fatal programmer error");
    panic!("rallocator: fatal ({site}): {detail}");
}

//! The fallback allocator: routes oversized requests past a fixed-block
//! pool to a peer allocator.
//!
//! ```text
//!   allocate(size)
//!        │
//!        ▼
//!   size > pool.block_size()? ──yes──► fallback.allocate(size)
//!        │no
//!        ▼
//!   pool.allocate(size)
//!
//!   release(addr) ──► pool.try_release(addr) == true? ──yes──► done
//!        │no
//!        ▼
//!   fallback.release(addr)
//! ```

use crate::contract::{Address, Allocator};
use crate::error::AllocError;
use crate::fixed_block::FixedBlockAllocator;

/// Routes allocations at most `pool.block_size()` bytes through a
/// fixed-block pool, and everything larger through a peer allocator.
///
/// `pool` is held as a concrete [`FixedBlockAllocator`] rather than
/// `Box<dyn Allocator>`: `release` depends on `try_release`, a capability
/// the generic [`Allocator`] contract does not expose.
pub struct FallbackAllocator {
    pool: FixedBlockAllocator,
    fallback: Box<dyn Allocator>,
}

impl FallbackAllocator {
    pub fn new(pool: FixedBlockAllocator, fallback: Box<dyn Allocator>) -> Self {
        Self { pool, fallback }
    }
}

impl Allocator for FallbackAllocator {
    fn allocate(&mut self, size: usize) -> Address {
        if size > self.pool.block_size() {
            self.fallback.allocate(size)
        } else {
            self.pool.allocate(size)
        }
    }

    fn release(&mut self, address: Address) {
        if self.pool.try_release(address) {
            return;
        }
        self.fallback.release(address);
    }

    fn teardown(&mut self) -> Result<(), AllocError> {
        self.pool.teardown()?;
        self.fallback.teardown()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default::recording::RecordingAllocator;
    use crate::fixed_block::FixedBlockConfig;

    fn fallback() -> (FallbackAllocator, crate::default::recording::Recorder, crate::default::recording::Recorder) {
        let pool_src = RecordingAllocator::new();
        let pool_recorder = pool_src.recorder.clone();
        let pool = FixedBlockAllocator::new(Box::new(pool_src), FixedBlockConfig::new(64, 64, 8));

        let peer = RecordingAllocator::new();
        let peer_recorder = peer.recorder.clone();

        (FallbackAllocator::new(pool, Box::new(peer)), pool_recorder, peer_recorder)
    }

    // Scenario 5: fallback routing by size.
    #[test]
    fn routes_by_size_relative_to_block_size() {
        let (mut f, pool_recorder, peer_recorder) = fallback();

        let sizes = [8, 20, 68, 64, 80, 100];
        let addrs: Vec<_> = sizes.iter().map(|&s| f.allocate(s)).collect();

        let release_order = [0usize, 4, 1, 2, 3, 5];
        for &i in &release_order {
            f.release(addrs[i]);
        }

        // Pool (block size 64) sees the underlying page allocation (64 +
        // alignment) once, for the {8, 20, 64} requests it served; the
        // peer allocator sees {68, 80, 100} directly.
        assert_eq!(*peer_recorder.allocations.borrow(), vec![68, 80, 100]);
        let mut peer_releases = peer_recorder.releases.borrow().clone();
        peer_releases.sort_unstable();
        assert_eq!(peer_releases, vec![68, 80, 100]);

        // The pool itself only ever asks its inner allocator for
        // page-sized buffers (64 + 8 alignment = 72), never the raw
        // request sizes.
        assert!(pool_recorder.allocations.borrow().iter().all(|&s| s == 72));

        assert!(f.teardown().is_ok());
    }

    #[test]
    fn try_release_then_fallback_both_succeed() {
        let (mut f, _pool_recorder, peer_recorder) = fallback();
        let small = f.allocate(8);
        let big = f.allocate(100);

        f.release(big);
        f.release(small);

        assert_eq!(*peer_recorder.releases.borrow(), vec![100]);
        assert!(f.teardown().is_ok());
    }
}

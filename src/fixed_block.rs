//! The fixed-block pool allocator: the core of this crate.
//!
//! ```text
//!   allocate(size <= block_size)
//!        │
//!        ▼
//!   all_free_blocks == 0? ──yes──► create_page() (asks `inner` for one
//!        │no                        page_size + alignment buffer, carves
//!        ▼                          it into blocks_per_page free blocks)
//!   pop a free block from the page at the head of avail_pages
//!   (largest ticket = most recently created page with free capacity)
//!        │
//!        ▼
//!   return the block's address
//!
//!   release(address)
//!        │
//!        ▼
//!   find the page whose extent contains address (BTreeMap range query)
//!        │
//!        ▼
//!   push address back onto that page's free list, re-enqueue if it was
//!   empty, then evaluate the shrink policy (reclaim a fully-free page
//!   back to `inner` once the pool is >= 75% free and more than one page
//!   remains)
//! ```
//!
//! Amortizes inner-allocator traffic for workloads that repeatedly request
//! equal-sized buffers, and keeps pages indexed well enough
//! (`page_index.range`) to support the fallback allocator's `try_release`
//! probing in O(log n).

use std::collections::BTreeMap;

use crate::contract::{Address, Allocator};
use crate::error::{fatal, AllocError};
use crate::page::{Page, PagePriorityQueue, NOT_ENQUEUED};

/// The three size parameters that define a fixed-block pool's layout.
///
/// Invariants, enforced (fatally) by [`FixedBlockConfig::new`]:
/// `block_size % alignment == 0` and `page_size % block_size == 0`.
#[derive(Clone, Copy, Debug)]
pub struct FixedBlockConfig {
    pub page_size: usize,
    pub block_size: usize,
    pub alignment: usize,
}

impl FixedBlockConfig {
    /// Builds a config, panicking if any of the three size invariants do
    /// not hold: a malformed config is a programmer error, not a
    /// recoverable condition.
    pub fn new(page_size: usize, block_size: usize, alignment: usize) -> Self {
        if page_size == 0 || block_size == 0 || alignment == 0 {
            fatal("FixedBlockConfig::new", "page_size, block_size and alignment must all be strictly positive");
        }
        if block_size % alignment != 0 {
            fatal("FixedBlockConfig::new", format_args!("block_size ({block_size}) must be a multiple of alignment ({alignment})"));
        }
        if page_size % block_size != 0 {
            fatal("FixedBlockConfig::new", format_args!("page_size ({page_size}) must be a multiple of block_size ({block_size})"));
        }
        Self { page_size, block_size, alignment }
    }

    pub fn blocks_per_page(&self) -> usize {
        self.page_size / self.block_size
    }
}

/// A page-backed pool that serves allocations of at most `config.block_size`
/// bytes from multi-block pages, reclaiming whole pages once the pool is
/// mostly idle.
pub struct FixedBlockAllocator {
    inner: Box<dyn Allocator>,
    config: FixedBlockConfig,
    next_ticket: u64,
    all_free_blocks: usize,
    page_index: BTreeMap<Address, Page>,
    avail_pages: PagePriorityQueue,
}

impl FixedBlockAllocator {
    /// Creates a pool over `inner`, with no pages yet. The first page is
    /// created lazily on the first `allocate` call.
    pub fn new(inner: Box<dyn Allocator>, config: FixedBlockConfig) -> Self {
        Self {
            inner,
            config,
            next_ticket: 0,
            all_free_blocks: 0,
            page_index: BTreeMap::new(),
            avail_pages: PagePriorityQueue::new(),
        }
    }

    /// The configured block size, used by the fallback allocator to route
    /// requests.
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    pub fn page_count(&self) -> usize {
        self.page_index.len()
    }

    fn total_capacity(&self) -> usize {
        self.config.blocks_per_page() * self.page_index.len()
    }

    fn create_page(&mut self) {
        let raw = self.inner.allocate(self.config.page_size + self.config.alignment);
        let offset = self.config.alignment - (raw.0 % self.config.alignment);
        let first_block = raw.0 + offset;

        let blocks_per_page = self.config.blocks_per_page();
        let mut free_blocks = Vec::with_capacity(blocks_per_page);
        for i in 0..blocks_per_page {
            free_blocks.push(Address(first_block + i * self.config.block_size));
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        tracing::trace!(?raw, ticket, blocks = blocks_per_page, "fixed_block: new page");

        self.page_index.insert(raw, Page { page_start: raw, ticket, free_blocks, queue_index: NOT_ENQUEUED });
        self.avail_pages.push(raw, &mut self.page_index);
        self.all_free_blocks += blocks_per_page;
    }

    /// Returns the page whose raw extent contains `address`, if any. Pages
    /// are disjoint and `page_index`'s keys are sorted ascending (a
    /// `BTreeMap` invariant), so the unique candidate is the page with the
    /// greatest `page_start <= address`.
    fn locate_page(&self, address: Address) -> Option<Address> {
        let (&start, page) = self.page_index.range(..=address).next_back()?;
        let end = Address(page.page_start.0 + self.config.page_size + self.config.alignment);
        if address.0 < end.0 {
            Some(start)
        } else {
            None
        }
    }

    /// Shared tail of `release`/`try_release`: records the block as free on
    /// `page_start`'s page, re-enqueues the page if needed, and evaluates
    /// the shrink policy. Caller has already verified `page_start` is a
    /// valid key in `page_index`.
    fn release_onto(&mut self, page_start: Address, address: Address) {
        let page = self.page_index.get_mut(&page_start).expect("page must exist");
        let was_empty = page.free_blocks.is_empty();
        page.free_blocks.push(address);

        if was_empty {
            self.avail_pages.push(page_start, &mut self.page_index);
        }
        self.all_free_blocks += 1;

        self.maybe_shrink(page_start);
    }

    /// Reclaims `just_modified` back to `inner` if all three shrink
    /// conditions hold: more than one page exists, the pool is at least
    /// three quarters free, and the page just touched is itself fully
    /// free. The literal `(3 * total) / 4` integer-division comparison is
    /// intentional and must not be smoothed or rounded.
    fn maybe_shrink(&mut self, just_modified: Address) {
        if self.page_index.len() <= 1 {
            return;
        }
        let total = self.total_capacity();
        if self.all_free_blocks < (3 * total) / 4 {
            return;
        }
        let blocks_per_page = self.config.blocks_per_page();
        let fully_free = self
            .page_index
            .get(&just_modified)
            .map(|p| p.free_blocks.len() == blocks_per_page)
            .unwrap_or(false);
        if !fully_free {
            return;
        }

        self.avail_pages.remove(just_modified, &mut self.page_index);
        self.page_index.remove(&just_modified);
        self.all_free_blocks -= blocks_per_page;

        tracing::trace!(page = ?just_modified, "fixed_block: reclaiming page");
        self.inner.release(just_modified);
    }

    /// Used by the fallback allocator: attempts to release `address` as one
    /// of this pool's blocks. Returns `false` without side effects if
    /// `address` does not belong to this pool, instead of the fatal abort
    /// that the plain `Allocator::release` path takes.
    pub fn try_release(&mut self, address: Address) -> bool {
        match self.locate_page(address) {
            Some(page_start) => {
                self.release_onto(page_start, address);
                true
            }
            None => false,
        }
    }
}

impl Allocator for FixedBlockAllocator {
    fn allocate(&mut self, size: usize) -> Address {
        if size > self.config.block_size {
            fatal(
                "fixed_block::allocate",
                format_args!("requested size {size} exceeds block size {}", self.config.block_size),
            );
        }
        if self.all_free_blocks == 0 {
            self.create_page();
        }

        let page_start = self.avail_pages.peek().expect("a page with free capacity must exist");
        let page = self.page_index.get_mut(&page_start).expect("page must exist");
        let block = page.free_blocks.pop().expect("head of avail_pages must have a free block");
        if page.free_blocks.is_empty() {
            self.avail_pages.remove(page_start, &mut self.page_index);
        }
        self.all_free_blocks -= 1;

        block
    }

    fn release(&mut self, address: Address) {
        match self.locate_page(address) {
            Some(page_start) => self.release_onto(page_start, address),
            None => fatal("fixed_block::release", format_args!("{address:?} does not belong to this pool")),
        }
    }

    fn teardown(&mut self) -> Result<(), AllocError> {
        let total = self.total_capacity();
        if self.all_free_blocks < total {
            return Err(AllocError::Leak { count: total - self.all_free_blocks });
        }
        // `inner.teardown` is deliberately not chained: ownership of `inner`
        // remains with whoever constructed this composition.
        for (&page_start, _) in std::mem::take(&mut self.page_index).iter() {
            self.inner.release(page_start);
        }
        self.avail_pages = PagePriorityQueue::new();
        self.all_free_blocks = 0;
        Ok(())
    }
}

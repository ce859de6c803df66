//! # rallocator: a composable allocator library
//!
//! This crate provides a uniform [`Allocator`] interface over raw
//! native-heap memory and several layered strategies for workloads that
//! repeatedly hand owned buffers to foreign-function code: a fixed-block
//! pool, an arena, a threshold router, and a fallback router.
//!
//! ## Overview
//!
//! Allocators compose into a tree. A request enters the outermost
//! allocator and is delegated downward until a leaf, the
//! [`DefaultAllocator`], performs the actual platform heap call. Release
//! calls walk the same composition; each layer decides, from its own
//! bookkeeping, whether the address is its responsibility.
//!
//! ```text
//!   FallbackAllocator
//!   ├── pool: FixedBlockAllocator ──► inner: DefaultAllocator
//!   └── fallback: ThresholdAllocator
//!       ├── above: ArenaAllocator ──► inner: DefaultAllocator
//!       └── below: DefaultAllocator
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rallocator
//!   ├── align        - The align! alignment macro
//!   ├── contract     - Address and the Allocator trait
//!   ├── error        - AllocError and the fatal() abort helper
//!   ├── default      - DefaultAllocator (malloc/free)
//!   ├── page         - Page metadata and the ticket-ordered priority queue
//!   ├── fixed_block  - FixedBlockAllocator (the pool)
//!   ├── arena        - ArenaAllocator
//!   ├── threshold    - ThresholdAllocator
//!   ├── fallback     - FallbackAllocator
//!   └── adapters     - copy_c_string, copy_bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rallocator::{Allocator, DefaultAllocator, FixedBlockAllocator, FixedBlockConfig};
//!
//! let mut pool = FixedBlockAllocator::new(
//!     Box::new(DefaultAllocator::new()),
//!     FixedBlockConfig::new(4096, 64, 8),
//! );
//!
//! let block = pool.allocate(40);
//! pool.release(block);
//! pool.teardown().expect("no leaks");
//! ```
//!
//! ## Safety
//!
//! Only [`default`] and [`adapters`] touch raw memory directly; every other
//! layer deals exclusively in opaque [`Address`] values and never
//! dereferences them, per the contract in [`contract`].
//!
//! ## Concurrency
//!
//! None of these allocators are thread-safe. Each instance must be
//! confined to one logical owner; callers sharing an instance across
//! parallel actors are responsible for external synchronization.

pub mod align;
mod contract;
mod error;

mod adapters;
mod arena;
mod default;
mod fallback;
mod fixed_block;
mod page;
mod threshold;

pub use adapters::{copy_bytes, copy_c_string};
pub use arena::ArenaAllocator;
pub use contract::{Address, Allocator};
pub use default::DefaultAllocator;
pub use error::AllocError;
pub use fallback::FallbackAllocator;
pub use fixed_block::{FixedBlockAllocator, FixedBlockConfig};
pub use threshold::ThresholdAllocator;

//! Shared test doubles for the integration tests in this directory.
//!
//! Each integration test file in `tests/` is compiled as its own crate that
//! only sees `rallocator`'s public API, so this recording allocator is a
//! second definition of the same idea that lives inline (behind
//! `#[cfg(test)]`) in `src/default.rs` for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rallocator::{Address, Allocator, DefaultAllocator, AllocError};

#[derive(Default, Clone)]
pub struct Recorder {
    pub allocations: Rc<RefCell<Vec<usize>>>,
    pub releases: Rc<RefCell<Vec<usize>>>,
}

/// Delegates to [`DefaultAllocator`] while recording the size passed to
/// every `allocate` call and the size (looked up by address) passed to
/// every `release` call.
pub struct RecordingAllocator {
    inner: DefaultAllocator,
    sizes: HashMap<Address, usize>,
    pub recorder: Recorder,
}

impl RecordingAllocator {
    pub fn new() -> Self {
        Self { inner: DefaultAllocator::new(), sizes: HashMap::new(), recorder: Recorder::default() }
    }
}

impl Allocator for RecordingAllocator {
    fn allocate(&mut self, size: usize) -> Address {
        let address = self.inner.allocate(size);
        self.sizes.insert(address, size);
        self.recorder.allocations.borrow_mut().push(size);
        address
    }

    fn release(&mut self, address: Address) {
        let size = *self.sizes.get(&address).expect("release of address this double never allocated");
        self.sizes.remove(&address);
        self.recorder.releases.borrow_mut().push(size);
        self.inner.release(address);
    }

    fn teardown(&mut self) -> Result<(), AllocError> {
        self.inner.teardown()
    }
}

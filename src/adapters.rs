//! Thin convenience helpers that copy input data into a freshly allocated
//! buffer. These hold no state of their own.

use crate::contract::{Address, Allocator};

/// Allocates `text.len() + 1` bytes from `allocator`, copies `text`'s bytes
/// into it, and writes a terminating zero byte, producing a C string ready
/// to cross an FFI boundary.
pub fn copy_c_string(allocator: &mut dyn Allocator, text: &str) -> Address {
    let bytes = text.as_bytes();
    let address = allocator.allocate(bytes.len() + 1);
    // SAFETY: `address` was just returned by `allocate` for exactly
    // `bytes.len() + 1` bytes, and nothing else has a reference to it yet.
    unsafe {
        let dst = address.as_ptr() as *mut u8;
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), dst, bytes.len());
        dst.add(bytes.len()).write(0);
    }
    address
}

/// Allocates `bytes.len()` bytes from `allocator` and copies `bytes` into
/// it.
pub fn copy_bytes(allocator: &mut dyn Allocator, bytes: &[u8]) -> Address {
    let address = allocator.allocate(bytes.len());
    // SAFETY: `address` was just returned by `allocate` for exactly
    // `bytes.len()` bytes, and nothing else has a reference to it yet.
    unsafe {
        let dst = address.as_ptr() as *mut u8;
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), dst, bytes.len());
    }
    address
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default::DefaultAllocator;

    #[test]
    fn copy_c_string_is_nul_terminated() {
        let mut a = DefaultAllocator::new();
        let addr = copy_c_string(&mut a, "hello");
        unsafe {
            let ptr = addr.as_ptr() as *const u8;
            let slice = std::slice::from_raw_parts(ptr, 6);
            assert_eq!(slice, b"hello\0");
        }
        a.release(addr);
        assert!(a.teardown().is_ok());
    }

    #[test]
    fn copy_bytes_copies_without_terminator() {
        let mut a = DefaultAllocator::new();
        let addr = copy_bytes(&mut a, &[1, 2, 3, 4]);
        unsafe {
            let ptr = addr.as_ptr() as *const u8;
            let slice = std::slice::from_raw_parts(ptr, 4);
            assert_eq!(slice, &[1, 2, 3, 4]);
        }
        a.release(addr);
        assert!(a.teardown().is_ok());
    }

    #[test]
    fn copy_c_string_handles_empty_string() {
        let mut a = DefaultAllocator::new();
        let addr = copy_c_string(&mut a, "");
        unsafe {
            assert_eq!(*(addr.as_ptr() as *const u8), 0);
        }
        a.release(addr);
        assert!(a.teardown().is_ok());
    }
}

use std::io::Read;

use rallocator::{Allocator, ArenaAllocator, DefaultAllocator, FallbackAllocator, FixedBlockAllocator, FixedBlockConfig, ThresholdAllocator};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`,
/// `htop`, or `gdb` between steps.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn main() {
  tracing_subscriber::fmt::init();

  // --------------------------------------------------------------------
  // 1) A bare fixed-block pool over the platform heap.
  //    Small, same-sized requests are carved out of a handful of pages
  //    instead of one `malloc` call per request.
  // --------------------------------------------------------------------
  println!("[1] Fixed-block pool: 16 pages worth of 64-byte blocks");
  let mut pool = FixedBlockAllocator::new(Box::new(DefaultAllocator::new()), FixedBlockConfig::new(1024, 64, 16));

  let blocks: Vec<_> = (0..20).map(|_| pool.allocate(48)).collect();
  println!("[1] Pool grew to {} page(s) for 20 outstanding blocks", pool.page_count());
  for b in &blocks {
    pool.release(*b);
  }
  println!("[1] Released all 20 blocks; pool shrinks back toward one page");
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) An arena that forgets everything it owns in one call.
  // --------------------------------------------------------------------
  println!("\n[2] Arena over the platform heap: batch-scoped allocations");
  let mut arena = ArenaAllocator::new(Box::new(DefaultAllocator::new()));
  arena.allocate(32);
  arena.allocate(128);
  arena.allocate(4096);
  println!("[2] {} outstanding allocation(s) before release_all", arena.outstanding_count());
  arena.release_all();
  println!("[2] {} outstanding allocation(s) after release_all", arena.outstanding_count());
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) A threshold router splitting small requests from large ones.
  // --------------------------------------------------------------------
  println!("\n[3] Threshold router: requests over 256 bytes go to an arena, the rest to the platform heap directly");
  let mut router = ThresholdAllocator::new(
    256,
    Box::new(ArenaAllocator::new(Box::new(DefaultAllocator::new()))),
    Box::new(DefaultAllocator::new()),
  );
  let small = router.allocate(40);
  let big = router.allocate(8192);
  router.release(small);
  router.release(big);
  println!("[3] Both requests released through their respective peer");
  router.teardown().expect("router must tear down clean after releasing both requests");
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Putting it together: a fixed-block pool in front, a fallback
  //    allocator for anything the pool's block size can't serve.
  // --------------------------------------------------------------------
  println!("\n[4] Fallback allocator: pool serves up to 128 bytes, a plain heap allocator serves the rest");
  let pool = FixedBlockAllocator::new(Box::new(DefaultAllocator::new()), FixedBlockConfig::new(2048, 128, 16));
  let mut fallback = FallbackAllocator::new(pool, Box::new(DefaultAllocator::new()));

  let small = fallback.allocate(64);
  let large = fallback.allocate(4096);
  println!("[4] Allocated a 64-byte block (pool) and a 4096-byte block (fallback peer)");
  fallback.release(small);
  fallback.release(large);
  fallback.teardown().expect("fallback composition must tear down clean");
  println!("[4] Both requests released and torn down with no leaks reported");

  println!("\n[5] End of demo.");
}

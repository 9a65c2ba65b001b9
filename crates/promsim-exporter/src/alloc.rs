//! Heap accounting through a tracking global allocator.
//!
//! The binary installs [`TrackingAllocator`] as `#[global_allocator]`; every
//! allocation then updates a pair of process-wide atomics that the runtime
//! collector reads at scrape time. Without the allocator installed (for
//! example in library consumers that keep the system allocator) all readings
//! stay at zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

static LIVE_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_BYTES: AtomicUsize = AtomicUsize::new(0);

/// System allocator wrapper that tracks live and peak heap bytes.
pub struct TrackingAllocator;

impl TrackingAllocator {
    fn on_alloc(size: usize) {
        let live = LIVE_BYTES.fetch_add(size, Ordering::Relaxed) + size;
        PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
    }

    fn on_dealloc(size: usize) {
        LIVE_BYTES.fetch_sub(size, Ordering::Relaxed);
    }
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ret = System.alloc(layout);
        if !ret.is_null() {
            Self::on_alloc(layout.size());
        }
        ret
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ret = System.alloc_zeroed(layout);
        if !ret.is_null() {
            Self::on_alloc(layout.size());
        }
        ret
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        Self::on_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let ret = System.realloc(ptr, layout, new_size);
        if !ret.is_null() {
            Self::on_dealloc(layout.size());
            Self::on_alloc(new_size);
        }
        ret
    }
}

/// Heap figures at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Bytes currently allocated.
    pub alloc: usize,
    /// High-water mark of allocated bytes: what the process has had to obtain.
    pub reserved: usize,
    /// Reserved but not currently allocated.
    pub idle: usize,
}

/// Read the counters. Two relaxed loads, no locks.
pub fn heap_stats() -> HeapStats {
    let alloc = LIVE_BYTES.load(Ordering::Relaxed);
    // A concurrent allocation can push `alloc` past the peak we read next.
    let reserved = PEAK_BYTES.load(Ordering::Relaxed).max(alloc);
    HeapStats {
        alloc,
        reserved,
        idle: reserved - alloc,
    }
}

// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::alloc::GlobalAlloc;
use std::alloc::Layout;
use std::alloc::System;
use std::cell::Cell;

thread_local! {
  static THREAD_HEAP: Cell<i64> = const { Cell::new(0) };
}

/// Global allocator that keeps a signed per-thread count of live heap bytes.
///
/// Install it in a binary with:
///
/// ```ignore
/// #[global_allocator]
/// static ALLOCATOR: mazebench::memory::TrackingAllocator = mazebench::memory::TrackingAllocator;
/// ```
///
/// Memory freed on a different thread than it was allocated on shows up as a
/// negative delta, so readings are advisory.
pub struct TrackingAllocator;

fn record(delta: i64) {
  // Fails only while the thread is being torn down.
  let _ = THREAD_HEAP.try_with(|bytes| bytes.set(bytes.get() + delta));
}

unsafe impl GlobalAlloc for TrackingAllocator {
  unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
    let ptr = unsafe { System.alloc(layout) };
    if !ptr.is_null() {
      record(layout.size() as i64);
    }
    ptr
  }

  unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
    let ptr = unsafe { System.alloc_zeroed(layout) };
    if !ptr.is_null() {
      record(layout.size() as i64);
    }
    ptr
  }

  unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
    unsafe { System.dealloc(ptr, layout) };
    record(-(layout.size() as i64));
  }

  unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
    let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
    if !new_ptr.is_null() {
      record(new_size as i64 - layout.size() as i64);
    }
    new_ptr
  }
}

/// Live heap bytes attributed to the calling thread. Always 0 when
/// [`TrackingAllocator`] is not the global allocator.
pub fn thread_heap_bytes() -> i64 {
  THREAD_HEAP.try_with(Cell::get).unwrap_or(0)
}

/// Measures the calling thread's heap growth between two points.
#[derive(Debug, Clone, Copy)]
pub struct HeapProbe {
  baseline: i64,
}

impl HeapProbe {
  pub fn start() -> Self {
    HeapProbe {
      baseline: thread_heap_bytes(),
    }
  }

  pub fn delta(&self) -> i64 {
    thread_heap_bytes() - self.baseline
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_probe_is_zero_without_tracking_allocator() {
    let probe = HeapProbe::start();
    let data = vec![0u8; 4096];
    assert_eq!(data.len(), 4096);
    assert_eq!(probe.delta(), 0);
  }
}

use std::alloc::{Layout, alloc, dealloc};

use core::ptr::NonNull;

use crate::errors::CapacityError::{self, AllocFailed, CapacityOverflow};

/// The process-wide heap, reached through [`std::alloc`].
///
/// Requests that need no bytes (zero slots or zero-sized `T`) never reach the
/// allocator and yield a dangling pointer instead.
pub struct GlobalAlloc;

pub static GLOBAL_ALLOC: GlobalAlloc = GlobalAlloc;

impl GlobalAlloc {

    #[inline(always)]
    fn layout<T>(count: usize) -> Result<Layout, CapacityError> {
        Layout::array::<T>(count).map_err(|_| CapacityOverflow { requested: count })
    }

    /// Allocates uninitialized storage for `count` values of `T`.
    ///
    /// # Safety
    /// The returned pointer must be released with [`GlobalAlloc::free_uninit`] using the
    /// same `count`.
    pub unsafe fn allocate_uninit<T>(&self, count: usize) -> Result<NonNull<T>, CapacityError> {
        let layout = Self::layout::<T>(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling())
        }
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr)
            .map(|ptr| ptr.cast::<T>())
            .ok_or(AllocFailed { new_capacity: count })
    }

    /// Releases storage obtained from [`GlobalAlloc::allocate_uninit`].
    ///
    /// # Safety
    /// `ptr` and `count` must match a previous allocation, and the storage must not hold
    /// live values that still need dropping.
    pub unsafe fn free_uninit<T>(&self, ptr: NonNull<T>, count: usize) {
        let layout = match Self::layout::<T>(count) {
            Ok(l) => l,
            Err(_) => return,
        };
        if layout.size() == 0 {
            return
        }
        unsafe { dealloc(ptr.cast::<u8>().as_ptr(), layout) }
    }
}

//! Owned, fixed-capacity storage for uninitialized slots.
//!
//! A [`RawBlock`] only ever allocates and releases memory. It never constructs or drops
//! the values living in its slots; that is the job of whoever owns the block.

use core::{
    mem,
    ptr::NonNull,
};

use crate::{
    errors::CapacityError,
    global_alloc::GLOBAL_ALLOC,
    slot_ptr::SlotPtr,
};

pub struct RawBlock<T> {
    data: NonNull<T>,
    capacity: usize,
}

unsafe impl<T: Send> Send for RawBlock<T> {}

unsafe impl<T: Sync> Sync for RawBlock<T> {}

impl<T> RawBlock<T> {

    /// Creates an empty block without touching the allocator.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            data: NonNull::dangling(),
            capacity: 0,
        }
    }

    /// Creates a block with room for exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            data: Self::allocate(capacity)?,
            capacity,
        })
    }

    /// Requests storage for `count` slots.
    ///
    /// Zero slots (or a zero-sized `T`) yield a dangling pointer without calling the
    /// allocator.
    #[inline(always)]
    pub fn allocate(count: usize) -> Result<NonNull<T>, CapacityError> {
        if count == 0 {
            return Ok(NonNull::dangling())
        }
        unsafe { GLOBAL_ALLOC.allocate_uninit(count) }
    }

    /// Releases storage obtained from [`RawBlock::allocate`]. A no-op for zero slots.
    ///
    /// # Safety
    /// `ptr` must come from `allocate(count)` and hold no live values.
    #[inline(always)]
    pub unsafe fn deallocate(ptr: NonNull<T>, count: usize) {
        if count == 0 {
            return
        }
        unsafe { GLOBAL_ALLOC.free_uninit(ptr, count) }
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn as_non_null(&self) -> NonNull<T> {
        self.data
    }

    /// Address `offset` slots past the start. `offset == capacity` gives the one-past-end
    /// sentinel.
    ///
    /// # Safety
    /// `offset` must not exceed the capacity.
    #[inline(always)]
    pub unsafe fn offset(&self, offset: usize) -> SlotPtr<T> {
        debug_assert!(
            offset <= self.capacity,
            "offset {} past the end of a block with capacity {}", offset, self.capacity,
        );
        unsafe { SlotPtr::from(self.data).add(offset) }
    }

    /// Address of slot `index`.
    ///
    /// # Safety
    /// `index` must be below the capacity.
    #[inline(always)]
    pub unsafe fn slot(&self, index: usize) -> SlotPtr<T> {
        debug_assert!(
            index < self.capacity,
            "slot {} out of bounds for a block with capacity {}", index, self.capacity,
        );
        unsafe { SlotPtr::from(self.data).add(index) }
    }

    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.data, &mut other.data);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Takes ownership of the storage, leaving `self` empty.
    #[inline(always)]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Releases the storage owned by `self` and takes over `source`'s, leaving `source`
    /// empty.
    ///
    /// Live values in `self` must have been dropped by the caller beforehand.
    pub fn replace_with(&mut self, source: &mut Self) {
        let mut taken = source.take();
        self.swap(&mut taken);
    }
}

impl<T> Default for RawBlock<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBlock<T> {

    #[inline(always)]
    fn drop(&mut self) {
        unsafe { Self::deallocate(self.data, self.capacity) }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn empty_block_is_dangling() {
        let block = RawBlock::<u64>::new();
        assert_eq!(block.capacity(), 0);
        assert!(block.is_empty());
        assert_eq!(block.as_non_null(), NonNull::dangling());
        let block = RawBlock::<u64>::with_capacity(0).unwrap();
        assert_eq!(block.as_non_null(), NonNull::dangling());
    }

    #[test]
    fn slots_are_writable_up_to_capacity() {
        let block = RawBlock::<u32>::with_capacity(4).unwrap();
        assert_eq!(block.capacity(), 4);
        unsafe {
            for i in 0..4 {
                block.slot(i).write(i as u32 * 3);
            }
            assert_eq!(block.slot(3).read(), 9);
            assert_eq!(
                block.offset(4).as_ptr().offset_from(block.as_ptr()),
                4,
            );
        }
    }

    #[test]
    fn swap_exchanges_storage() {
        let mut a = RawBlock::<u8>::with_capacity(8).unwrap();
        let mut b = RawBlock::<u8>::new();
        let a_ptr = a.as_ptr();
        a.swap(&mut b);
        assert_eq!(a.capacity(), 0);
        assert_eq!(b.capacity(), 8);
        assert_eq!(b.as_ptr(), a_ptr);
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut a = RawBlock::<u16>::with_capacity(3).unwrap();
        let ptr = a.as_ptr();
        let b = a.take();
        assert!(a.is_empty());
        assert_eq!(b.capacity(), 3);
        assert_eq!(b.as_ptr(), ptr);
    }

    #[test]
    fn replace_with_adopts_source() {
        let mut a = RawBlock::<u16>::with_capacity(2).unwrap();
        let mut b = RawBlock::<u16>::with_capacity(5).unwrap();
        let b_ptr = b.as_ptr();
        a.replace_with(&mut b);
        assert_eq!(a.capacity(), 5);
        assert_eq!(a.as_ptr(), b_ptr);
        assert!(b.is_empty());
    }

    #[test]
    fn oversized_request_fails() {
        let err = RawBlock::<u64>::with_capacity(usize::MAX).err();
        assert_eq!(err, Some(CapacityError::CapacityOverflow { requested: usize::MAX }));
    }

    #[test]
    fn zero_sized_slots_need_no_storage() {
        let block = RawBlock::<()>::with_capacity(1000).unwrap();
        assert_eq!(block.capacity(), 1000);
        assert_eq!(block.as_non_null(), NonNull::dangling());
    }
}

use core::{
    mem::{self, needs_drop},
    ops::{Deref, DerefMut},
    ptr::{self, NonNull},
};

/// Typed pointer to a slot of a [`RawBlock`](crate::RawBlock).
///
/// Carries the bulk slot algorithms used by the array: relocation, gap shifting and
/// guarded construction. None of the methods track which slots are live; callers do.
#[derive(Eq)]
pub struct SlotPtr<T: Sized>(NonNull<T>);

impl<T: Sized> Copy for SlotPtr<T> {}

impl<T: Sized> Clone for SlotPtr<T> {

    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for SlotPtr<T> {

    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> core::fmt::Debug for SlotPtr<T> {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SlotPtr({:p})", self.0)
    }
}

impl<T: Sized> SlotPtr<T> {

    #[inline(always)]
    pub fn new(ptr: *mut T) -> Option<Self> {
        Some(Self(NonNull::new(ptr)?))
    }

    /// # Safety
    /// The result must stay within (or one past) the allocation `self` points into.
    #[inline(always)]
    pub unsafe fn add(&self, count: usize) -> Self {
        unsafe {
            self.0.add(count).into()
        }
    }

    /// Relocates `len` values from `self` into `to`.
    ///
    /// Afterwards the source slots are logically uninitialized and must not be dropped.
    ///
    /// # Safety
    /// Both runs must be valid for `len` slots and must not overlap; `[to, to + len)`
    /// must be uninitialized.
    #[inline(always)]
    pub unsafe fn transfer_to(&self, to: Self, len: usize) {
        unsafe {
            self.0.copy_to_nonoverlapping(to.0, len);
        }
    }

    /// Moves the `len` values starting at `self` one slot to the right, leaving `self`
    /// logically uninitialized.
    ///
    /// # Safety
    /// `[self, self + len]` must be inside the block.
    #[inline(always)]
    pub unsafe fn open_gap(&self, len: usize) {
        unsafe {
            self.0.copy_to(self.0.add(1), len);
        }
    }

    /// Moves the `len` values following `self` one slot to the left, overwriting `self`
    /// without dropping it.
    ///
    /// # Safety
    /// `[self, self + len]` must be inside the block and `self` must not hold a value
    /// that still needs dropping.
    #[inline(always)]
    pub unsafe fn close_gap(&self, len: usize) {
        unsafe {
            self.0.add(1).copy_to(self.0, len);
        }
    }

    /// Drops `len` live values starting at `self`.
    ///
    /// # Safety
    /// Every slot in `[self, self + len)` must hold a live value.
    #[inline(always)]
    pub unsafe fn drop_in_place(&self, len: usize) {
        if needs_drop::<T>() {
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.0.as_ptr(), len));
            }
        }
    }

    /// Writes `len` values produced by `f` into the slots starting at `self`.
    ///
    /// If `f` panics, the values written so far are dropped before unwinding continues.
    ///
    /// # Safety
    /// `[self, self + len)` must be inside the block and uninitialized.
    pub unsafe fn construct_with<F>(&self, len: usize, mut f: F)
        where
            F: FnMut() -> T,
    {
        let mut guard = PartialInit::new(*self);
        for i in 0..len {
            unsafe { self.add(i).write(f()) };
            guard.initialized += 1;
        }
        mem::forget(guard);
    }

    /// Clones `len` values from `self` into the uninitialized slots at `to`.
    ///
    /// If a clone panics, the clones written so far are dropped; the source is untouched.
    ///
    /// # Safety
    /// `[self, self + len)` must be live, `[to, to + len)` uninitialized, and the runs
    /// must not overlap.
    pub unsafe fn clone_to(&self, to: Self, len: usize)
        where
            T: Clone
    {
        let mut guard = PartialInit::new(to);
        for i in 0..len {
            unsafe { to.add(i).write(self.add(i).as_ref().clone()) };
            guard.initialized += 1;
        }
        mem::forget(guard);
    }
}

impl<T> Deref for SlotPtr<T> {

    type Target = NonNull<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for SlotPtr<T> {

    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> From<NonNull<T>> for SlotPtr<T> {

    fn from(value: NonNull<T>) -> Self {
        Self(value)
    }
}

/// Rolls back a run of slots that is being initialized front to back.
struct PartialInit<T> {
    start: SlotPtr<T>,
    initialized: usize,
}

impl<T> PartialInit<T> {

    #[inline(always)]
    fn new(start: SlotPtr<T>) -> Self {
        Self {
            start,
            initialized: 0,
        }
    }
}

impl<T> Drop for PartialInit<T> {

    fn drop(&mut self) {
        unsafe {
            self.start.drop_in_place(self.initialized);
        }
    }
}

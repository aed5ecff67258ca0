use crate::{
    capacity_policy::CapacityPolicy,
    errors::CapacityError,
    raw_block::RawBlock,
};

use super::DynArray;

impl<T, Growth> DynArray<T, Growth>
    where
        Growth: CapacityPolicy,
{

    /// Constructs a value from `f` at `index`, shifting later elements right.
    ///
    /// Returns the index of the new element. Inserting at `len()` is the same as
    /// [`emplace_back_with`](Self::emplace_back_with).
    ///
    /// # Panics
    /// Panics if `index > len()`.
    #[track_caller]
    pub fn emplace<F>(&mut self, index: usize, f: F) -> Result<usize, CapacityError>
        where
            F: FnOnce() -> T,
    {
        assert!(
            index <= self.len,
            "insertion index {} out of bounds for len {}", index, self.len,
        );
        if index == self.len {
            self.emplace_back_with(f)?;
            return Ok(index)
        }
        if self.len == self.capacity() {
            self.emplace_with_reallocate(index, f)
        }
        else {
            self.emplace_without_reallocate(index, f)
        }
    }

    #[inline(always)]
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize, CapacityError> {
        self.emplace(index, || value)
    }

    /// The new element is built at `index` of a fresh block first. Only after that
    /// succeeds are the prefix and suffix relocated around it and the block adopted.
    fn emplace_with_reallocate<F>(&mut self, index: usize, f: F) -> Result<usize, CapacityError>
        where
            F: FnOnce() -> T,
    {
        let mut staged = RawBlock::with_capacity(self.next_capacity()?)?;
        unsafe {
            staged.slot(index).write(f());
            let old = self.data.offset(0);
            old.transfer_to(staged.offset(0), index);
            old.add(index).transfer_to(staged.offset(index + 1), self.len - index);
        }
        self.data.swap(&mut staged);
        self.len += 1;
        Ok(index)
    }

    fn emplace_without_reallocate<F>(&mut self, index: usize, f: F) -> Result<usize, CapacityError>
        where
            F: FnOnce() -> T,
    {
        let value = f();
        unsafe {
            let at = self.data.slot(index);
            at.open_gap(self.len - index);
            at.write(value);
        }
        self.len += 1;
        Ok(index)
    }

    /// Drops the element at `index` and shifts later elements left.
    ///
    /// Returns `index`, which now holds the element that followed the erased one (or
    /// equals `len()` if the last element was erased).
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Removes the element at `index`, shifts later elements left and returns it.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index {} out of bounds for len {}", index, self.len,
        );
        unsafe {
            let at = self.data.slot(index);
            let removed = at.read();
            at.close_gap(self.len - index - 1);
            self.len -= 1;
            removed
        }
    }
}

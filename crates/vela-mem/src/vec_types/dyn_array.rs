mod positional;

use core::{
    fmt::{self, Debug, Display, Formatter},
    marker::PhantomData,
    mem,
    ops::{Deref, DerefMut, Index, IndexMut},
    slice::{self, SliceIndex},
};

use crate::{
    capacity_policy::{CapacityPolicy, Doubling, Fixed},
    errors::CapacityError::{self, FixedCapacity, IndexOutOfBounds},
    raw_block::RawBlock,
    const_assert,
    size_of,
};

use super::{Iter, IterMut};

/// A growable, contiguous array of `T` backed by a single [`RawBlock`].
///
/// Slots `[0, len)` hold live values and `[len, capacity)` are uninitialized. Every
/// operation that allocates either succeeds or leaves the array exactly as it was; a
/// panicking element constructor is rolled back the same way.
pub struct DynArray<T, Growth = Doubling>
    where
        Growth: CapacityPolicy,
{
    data: RawBlock<T>,
    len: usize,
    _markers: PhantomData<(T, Growth)>,
}

pub type FixedArray<T> = DynArray<T, Fixed>;

const_assert!(size_of!(DynArray<u32>) == size_of!(Option<DynArray<u32>>));

impl<T, Growth> DynArray<T, Growth>
    where
        Growth: CapacityPolicy,
{

    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            data: RawBlock::new(),
            len: 0,
            _markers: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Ok(Self {
            data: RawBlock::with_capacity(capacity)?,
            len: 0,
            _markers: PhantomData,
        })
    }

    /// Creates an array of `len` default values with capacity exactly `len`.
    pub fn with_len(len: usize) -> Result<Self, CapacityError>
        where
            T: Default
    {
        Self::with_len_with(len, T::default)
    }

    /// Creates an array of `len` values produced by `f`, with capacity exactly `len`.
    ///
    /// If `f` panics, the values built so far are dropped and the storage is released.
    pub fn with_len_with<F>(len: usize, f: F) -> Result<Self, CapacityError>
        where
            F: FnMut() -> T,
    {
        let data = RawBlock::with_capacity(len)?;
        unsafe { data.offset(0).construct_with(len, f) };
        Ok(Self {
            data,
            len,
            _markers: PhantomData,
        })
    }

    /// Clones the array into fresh storage sized to its length.
    pub fn try_clone(&self) -> Result<Self, CapacityError>
        where
            T: Clone
    {
        let data = RawBlock::with_capacity(self.len)?;
        unsafe { self.data.offset(0).clone_to(data.offset(0), self.len) };
        Ok(Self {
            data,
            len: self.len,
            _markers: PhantomData,
        })
    }

    /// Moves the contents out in constant time, leaving `self` empty with no storage.
    #[inline(always)]
    pub fn take(&mut self) -> Self {
        Self {
            data: self.data.take(),
            len: mem::replace(&mut self.len, 0),
            _markers: PhantomData,
        }
    }

    /// Makes `self` an element-wise copy of `source`.
    ///
    /// When `source` does not fit in the current capacity a full copy is built first and
    /// swapped in, so a failure leaves `self` untouched. Otherwise the existing storage
    /// is reused.
    pub fn assign_from(&mut self, source: &Self) -> Result<(), CapacityError>
        where
            T: Clone
    {
        if source.len > self.capacity() {
            if !Growth::can_grow() {
                return Err(FixedCapacity { capacity: self.capacity() })
            }
            let mut copy = source.try_clone()?;
            self.swap_with(&mut copy);
            return Ok(())
        }
        let common = self.len.min(source.len);
        self.as_mut_slice()[..common].clone_from_slice(&source.as_slice()[..common]);
        if source.len < self.len {
            self.truncate(source.len);
        }
        else if source.len > self.len {
            unsafe {
                source.data
                    .offset(self.len)
                    .clone_to(self.data.offset(self.len), source.len - self.len);
            }
            self.len = source.len;
        }
        Ok(())
    }

    /// Drops the current elements and takes over `source`'s storage in constant time,
    /// leaving `source` empty.
    pub fn move_from(&mut self, source: &mut Self) {
        self.clear();
        self.data.replace_with(&mut source.data);
        self.len = mem::replace(&mut source.len, 0);
    }

    /// Exchanges contents with `other`. No element is touched and nothing allocates.
    #[inline(always)]
    pub fn swap_with(&mut self, other: &mut Self) {
        self.data.swap(&mut other.data);
        mem::swap(&mut self.len, &mut other.len);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }

    /// Address of the first live element.
    #[inline(always)]
    pub fn begin(&self) -> *const T {
        self.data.as_ptr()
    }

    /// One-past-the-end address of the live range.
    #[inline(always)]
    pub fn end(&self) -> *const T {
        unsafe { self.data.offset(self.len).as_ptr() }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.data.as_mut_ptr(), self.len) }
    }

    pub fn try_get(&self, index: usize) -> Result<&T, CapacityError> {
        if index >= self.len {
            return Err(IndexOutOfBounds { index, len: self.len })
        }
        Ok(unsafe { self.data.slot(index).as_ref() })
    }

    pub fn try_get_mut(&mut self, index: usize) -> Result<&mut T, CapacityError> {
        if index >= self.len {
            return Err(IndexOutOfBounds { index, len: self.len })
        }
        Ok(unsafe { self.data.slot(index).as_mut() })
    }

    #[inline(always)]
    pub fn back(&self) -> Option<&T> {
        if self.len == 0 {
            return None
        }
        Some(unsafe { self.data.slot(self.len - 1).as_ref() })
    }

    #[inline(always)]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            return None
        }
        Some(unsafe { self.data.slot(self.len - 1).as_mut() })
    }

    #[inline(always)]
    pub fn iter(&self) -> Iter<'_, T> {
        unsafe { Iter::new(self.data.as_non_null(), self.len) }
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        unsafe { IterMut::new(self.data.as_non_null(), self.len) }
    }

    /// Grows the storage to exactly `new_capacity` slots. Does nothing if the array can
    /// already hold that many.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<(), CapacityError> {
        if new_capacity <= self.capacity() {
            return Ok(())
        }
        if !Growth::can_grow() {
            return Err(FixedCapacity { capacity: self.capacity() })
        }
        let mut staged = RawBlock::with_capacity(new_capacity)?;
        unsafe { self.data.offset(0).transfer_to(staged.offset(0), self.len) };
        self.data.swap(&mut staged);
        Ok(())
    }

    /// Capacity a full array moves to before taking one more element.
    ///
    /// A policy answer that leaves no room for that element is treated as a refusal.
    fn next_capacity(&self) -> Result<usize, CapacityError> {
        let new_capacity = Growth::grow(self.len)?;
        if new_capacity <= self.len {
            return Err(FixedCapacity { capacity: self.capacity() })
        }
        Ok(new_capacity)
    }

    /// Resizes to `new_len`, filling new slots with default values.
    pub fn resize(&mut self, new_len: usize) -> Result<(), CapacityError>
        where
            T: Default
    {
        self.resize_with(new_len, T::default)
    }

    /// Resizes to `new_len`, filling new slots with values produced by `f`.
    ///
    /// Shrinking never releases storage. Growing reserves exactly `new_len` slots when
    /// needed; if `f` panics the new tail is dropped and the length is unchanged.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F) -> Result<(), CapacityError>
        where
            F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(())
        }
        self.reserve(new_len)?;
        unsafe { self.data.offset(self.len).construct_with(new_len - self.len, f) };
        self.len = new_len;
        Ok(())
    }

    /// Drops every element past `new_len`. Capacity is kept.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return
        }
        let tail = self.len - new_len;
        self.len = new_len;
        unsafe { self.data.offset(new_len).drop_in_place(tail) };
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    /// Constructs a value from `f` at the end of the array.
    ///
    /// A full array moves to a block chosen by the growth policy. The new value is built
    /// in its final slot of that block before any existing element is relocated, so a
    /// failing allocation or a panicking `f` leaves the array untouched.
    pub fn emplace_back_with<F>(&mut self, f: F) -> Result<&mut T, CapacityError>
        where
            F: FnOnce() -> T,
    {
        if self.len == self.capacity() {
            let mut staged = RawBlock::with_capacity(self.next_capacity()?)?;
            unsafe {
                staged.slot(self.len).write(f());
                self.data.offset(0).transfer_to(staged.offset(0), self.len);
            }
            self.data.swap(&mut staged);
        }
        else {
            unsafe { self.data.slot(self.len).write(f()) };
        }
        self.len += 1;
        Ok(unsafe { self.data.slot(self.len - 1).as_mut() })
    }

    #[inline(always)]
    pub fn push_back(&mut self, value: T) -> Result<&mut T, CapacityError> {
        self.emplace_back_with(|| value)
    }

    /// Drops the last element.
    ///
    /// # Panics
    /// Panics if the array is empty.
    #[track_caller]
    pub fn pop_back(&mut self) {
        assert!(self.len > 0, "pop_back on an empty array");
        self.len -= 1;
        unsafe { self.data.slot(self.len).drop_in_place(1) };
    }

    /// Removes the last element and hands it back.
    #[inline(always)]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None
        }
        self.len -= 1;
        Some(unsafe { self.data.slot(self.len).read() })
    }
}

impl<T, Growth> Drop for DynArray<T, Growth>
    where
        Growth: CapacityPolicy,
{

    #[inline(always)]
    fn drop(&mut self) {
        unsafe { self.data.offset(0).drop_in_place(self.len) }
    }
}

impl<T, Growth> Default for DynArray<T, Growth>
    where
        Growth: CapacityPolicy,
{

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Growth> Clone for DynArray<T, Growth>
    where
        T: Clone,
        Growth: CapacityPolicy,
{

    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| err.raise())
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.assign_from(source) {
            err.raise()
        }
    }
}

impl<T, Growth, I> Index<I> for DynArray<T, Growth>
    where
        Growth: CapacityPolicy,
        I: SliceIndex<[T]>,
{

    type Output = I::Output;

    #[inline(always)]
    #[track_caller]
    fn index(&self, index: I) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T, Growth, I> IndexMut<I> for DynArray<T, Growth>
    where
        Growth: CapacityPolicy,
        I: SliceIndex<[T]>,
{

    #[inline(always)]
    #[track_caller]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.as_mut_slice()[index]
    }
}

impl<T, Growth: CapacityPolicy> Deref for DynArray<T, Growth> {

    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, Growth: CapacityPolicy> DerefMut for DynArray<T, Growth> {

    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, Growth: CapacityPolicy> AsRef<[T]> for DynArray<T, Growth> {

    #[inline(always)]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, Growth: CapacityPolicy> AsMut<[T]> for DynArray<T, Growth> {

    #[inline(always)]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'vec, T, Growth: CapacityPolicy> IntoIterator for &'vec DynArray<T, Growth> {

    type Item = &'vec T;
    type IntoIter = Iter<'vec, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'vec, T, Growth: CapacityPolicy> IntoIterator for &'vec mut DynArray<T, Growth> {

    type Item = &'vec mut T;
    type IntoIter = IterMut<'vec, T>;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, Growth: CapacityPolicy> Extend<T> for DynArray<T, Growth> {

    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        if Growth::can_grow() {
            let (lower, _) = iter.size_hint();
            if let Err(err) = self.reserve(self.len.saturating_add(lower)) {
                err.raise()
            }
        }
        for value in iter {
            if let Err(err) = self.push_back(value) {
                err.raise()
            }
        }
    }
}

impl<T> FromIterator<T> for DynArray<T> {

    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {

    fn from(values: [T; N]) -> Self {
        let mut array = Self::with_capacity(N).unwrap_or_else(|err| err.raise());
        array.extend(values);
        array
    }
}

impl<T, U, Growth, OtherGrowth> PartialEq<DynArray<U, OtherGrowth>> for DynArray<T, Growth>
    where
        T: PartialEq<U>,
        Growth: CapacityPolicy,
        OtherGrowth: CapacityPolicy,
{

    fn eq(&self, other: &DynArray<U, OtherGrowth>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, Growth: CapacityPolicy> Eq for DynArray<T, Growth> {}

impl<T, U, Growth, const N: usize> PartialEq<[U; N]> for DynArray<T, Growth>
    where
        T: PartialEq<U>,
        Growth: CapacityPolicy,
{

    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, Growth> PartialEq<[U]> for DynArray<T, Growth>
    where
        T: PartialEq<U>,
        Growth: CapacityPolicy,
{

    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Debug, Growth: CapacityPolicy> Debug for DynArray<T, Growth> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Diagnostic rendering: `[ a b c ]`. Not a stable serialization format.
impl<T: Display, Growth: CapacityPolicy> Display for DynArray<T, Growth> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for value in self {
            write!(f, "{} ", value)?;
        }
        write!(f, "]")
    }
}

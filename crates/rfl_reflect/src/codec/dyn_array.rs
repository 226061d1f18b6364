use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::ptr;
use core::slice;

use rfl_ptr::{Ptr, PtrMut};

use crate::codec::array::array_layout;
use crate::codec::{ArrayStorage, RawArray};

/// A growable array with the memory shape the dynamic-array hook expects.
///
/// `DynArray<T>` is a [`RawArray`] holding `T`s, so a graph template instance
/// such as `DynArray<int>` can describe a Rust field of type `DynArray<i32>`
/// and be rebuilt by the codec without knowing `T`.
///
/// # Examples
///
/// ```
/// use rfl_reflect::codec::DynArray;
///
/// let mut nums = DynArray::new();
/// nums.push(3);
/// nums.push(4);
/// assert_eq!(nums.as_slice(), &[3, 4]);
///
/// let names: DynArray<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(names.len(), 2);
/// ```
#[repr(transparent)]
pub struct DynArray<T> {
    raw: RawArray,
    _marker: PhantomData<T>,
}

impl<T> DynArray<T> {
    const IS_ZST: bool = size_of::<T>() == 0;

    #[inline]
    pub const fn new() -> Self {
        Self {
            raw: RawArray::new(),
            _marker: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut array = Self::new();
        if capacity > 0 {
            array.reserve_exact(capacity);
        }
        array
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    pub fn push(&mut self, value: T) {
        if self.len() == self.capacity() {
            let wanted = if Self::IS_ZST {
                usize::MAX
            } else {
                self.capacity().saturating_mul(2).max(4)
            };
            self.reserve_exact(wanted);
        }
        let len = self.len();
        unsafe {
            self.raw.as_ptr().cast::<T>().add(len).write(value);
            self.raw.set_len(len + 1);
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        let len = self.len().checked_sub(1)?;
        unsafe {
            self.raw.set_len(len);
            Some(self.raw.as_ptr().cast::<T>().add(len).read())
        }
    }

    /// Drops every item and keeps the buffer.
    pub fn clear(&mut self) {
        let items: *mut [T] = self.as_mut_slice();
        unsafe {
            self.raw.set_len(0);
            ptr::drop_in_place(items);
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        if self.raw.capacity() == 0 {
            return &[];
        }
        unsafe { slice::from_raw_parts(self.raw.as_ptr().cast::<T>(), self.raw.len()) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.raw.capacity() == 0 {
            return &mut [];
        }
        unsafe { slice::from_raw_parts_mut(self.raw.as_ptr().cast::<T>(), self.raw.len()) }
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Moves the items into a buffer with room for `capacity` of them.
    fn reserve_exact(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len());
        let Some(buffer) = array_layout(Layout::new::<T>(), capacity) else {
            capacity_overflow();
        };

        let mut grown = RawArray::new();
        let len = self.len();
        unsafe {
            grown.allocate(buffer, capacity);
            if len > 0 {
                ptr::copy_nonoverlapping(
                    self.raw.as_ptr().cast::<T>(),
                    grown.as_ptr().cast::<T>(),
                    len,
                );
            }
            grown.set_len(len);
            self.raw.set_len(0);
        }
        // The old buffer is freed here; its items now live in `grown`.
        self.raw = grown;
    }
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("DynArray capacity overflow")
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // `raw` releases the buffer afterwards.
        self.clear();
    }
}

impl<T> Default for DynArray<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone> Clone for DynArray<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for DynArray<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynArray<T> {}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut array = Self::with_capacity(iter.size_hint().0);
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, const N: usize> From<[T; N]> for DynArray<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

unsafe impl<T> ArrayStorage for DynArray<T> {
    #[inline]
    fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    #[inline]
    fn data(&self) -> Ptr<'_> {
        self.raw.data()
    }

    #[inline]
    fn data_mut(&mut self) -> PtrMut<'_> {
        self.raw.data_mut()
    }

    #[inline]
    unsafe fn release(&mut self) {
        unsafe { self.raw.release() }
    }

    #[inline]
    unsafe fn allocate(&mut self, buffer: Layout, capacity: usize) {
        unsafe { self.raw.allocate(buffer, capacity) }
    }

    #[inline]
    unsafe fn set_len(&mut self, len: usize) {
        unsafe { self.raw.set_len(len) }
    }
}

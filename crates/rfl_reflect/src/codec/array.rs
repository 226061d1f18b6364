use alloc::alloc as malloc;
use alloc::string::ToString;
use core::alloc::Layout;
use core::num::NonZeroUsize;
use core::ptr::NonNull;
use std::io::{Read, Write};

use rfl_ptr::{Ptr, PtrMut};

use crate::codec::{CodecError, Deserializer, Serializer, stream};
use crate::graph::TypeHandle;
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// ArrayStorage

/// A growable array the codec can rebuild from a stream.
///
/// # Safety
///
/// The hooked graph type must describe `Self`. `data` and `data_mut` must
/// point to `capacity` item slots, the first `len` of them live.
pub unsafe trait ArrayStorage {
    /// Number of live items.
    fn len(&self) -> usize;

    /// Number of item slots in the buffer.
    fn capacity(&self) -> usize;

    fn data(&self) -> Ptr<'_>;

    fn data_mut(&mut self) -> PtrMut<'_>;

    /// Frees the buffer, leaving an empty array.
    ///
    /// # Safety
    ///
    /// Every item must already be destroyed and the length set to zero.
    unsafe fn release(&mut self);

    /// Installs a zeroed buffer described by `buffer` with room for
    /// `capacity` items. The length stays zero.
    ///
    /// # Safety
    ///
    /// The array must be released, and `buffer` must be the array layout of
    /// `capacity` items of the element type.
    unsafe fn allocate(&mut self, buffer: Layout, capacity: usize);

    /// # Safety
    ///
    /// The first `len` items must be live and `len <= capacity`.
    unsafe fn set_len(&mut self, len: usize);
}

// -----------------------------------------------------------------------------
// RawArray

/// Untyped array storage: a buffer, a length and a capacity.
///
/// The buffer layout is recorded at allocation so it can be released without
/// knowing the element type. A `RawArray` never drops items, only its buffer.
#[derive(Debug)]
pub struct RawArray {
    data: NonNull<u8>,
    len: usize,
    capacity: usize,
    buffer: Option<Layout>,
}

// SAFETY: `RawArray` exclusively owns its buffer.
unsafe impl Send for RawArray {}
// SAFETY: shared access only reads.
unsafe impl Sync for RawArray {}

impl RawArray {
    /// An empty array without a buffer.
    #[inline]
    pub const fn new() -> Self {
        Self {
            data: NonNull::dangling(),
            len: 0,
            capacity: 0,
            buffer: None,
        }
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.data.as_ptr()
    }

    /// Frees the buffer; items are not dropped.
    ///
    /// # Safety
    ///
    /// Live items must already be destroyed or moved out.
    pub unsafe fn release(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            unsafe { malloc::dealloc(self.data.as_ptr(), buffer) };
        }
        self.data = NonNull::dangling();
        self.len = 0;
        self.capacity = 0;
    }

    /// Installs a zeroed buffer; zero-sized buffers are never allocated.
    ///
    /// # Safety
    ///
    /// The current buffer must already be released.
    pub unsafe fn allocate(&mut self, buffer: Layout, capacity: usize) {
        debug_assert!(self.buffer.is_none());
        if buffer.size() == 0 {
            // SAFETY: a layout alignment is never zero.
            let align = unsafe { NonZeroUsize::new_unchecked(buffer.align()) };
            self.data = NonNull::without_provenance(align);
            self.buffer = None;
        } else {
            self.data = NonNull::new(unsafe { malloc::alloc_zeroed(buffer) })
                .unwrap_or_else(|| malloc::handle_alloc_error(buffer));
            self.buffer = Some(buffer);
        }
        self.len = 0;
        self.capacity = capacity;
    }

    /// # Safety
    ///
    /// The first `len` items must be live and `len <= capacity`.
    #[inline(always)]
    pub unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity);
        self.len = len;
    }
}

impl Default for RawArray {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RawArray {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer {
            unsafe { malloc::dealloc(self.data.as_ptr(), buffer) };
        }
    }
}

unsafe impl ArrayStorage for RawArray {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn data(&self) -> Ptr<'_> {
        // SAFETY: `data` is non-null and owned by `self`.
        unsafe { Ptr::new(self.data) }
    }

    #[inline]
    fn data_mut(&mut self) -> PtrMut<'_> {
        // SAFETY: as above, and `self` is borrowed mutably.
        unsafe { PtrMut::new(self.data) }
    }

    #[inline]
    unsafe fn release(&mut self) {
        unsafe { RawArray::release(self) }
    }

    #[inline]
    unsafe fn allocate(&mut self, buffer: Layout, capacity: usize) {
        unsafe { RawArray::allocate(self, buffer, capacity) }
    }

    #[inline]
    unsafe fn set_len(&mut self, len: usize) {
        unsafe { RawArray::set_len(self, len) }
    }
}

/// Layout of `count` items, or `None` on overflow.
#[inline]
pub(crate) fn array_layout(item: Layout, count: usize) -> Option<Layout> {
    let size = item.size().checked_mul(count)?;
    Layout::from_size_align(size, item.align()).ok()
}

// -----------------------------------------------------------------------------
// Hooks

fn element_type(registry: &TypeRegistry, ty: TypeHandle) -> Result<TypeHandle, CodecError> {
    let module = registry.module();
    module
        .ty(ty)
        .as_instance()
        .and_then(|instance| instance.args[0].handle())
        .ok_or_else(|| CodecError::MissingElementType(module.ty(ty).full_name().text().to_string()))
}

/// # Safety
/// - `value` points to a live `S` whose items are of the instance's element type.
pub(super) unsafe fn serialize<S: ArrayStorage>(
    ser: &Serializer<'_>,
    ty: TypeHandle,
    value: Ptr<'_>,
    out: &mut dyn Write,
) -> Result<(), CodecError> {
    let elem = element_type(ser.registry(), ty)?;
    let array = unsafe { value.as_ref::<S>() };

    let count = array.len();
    stream::write_len(out, count)?;
    if count == 0 {
        return Ok(());
    }
    unsafe { ser.write_elements(elem, array.data(), count, out) }
}

/// Rebuilds the array: destroy, release, allocate, construct, then read.
///
/// # Safety
/// - `value` points to a live `S` whose items are of the instance's element type.
pub(super) unsafe fn deserialize<S: ArrayStorage>(
    de: &Deserializer<'_>,
    ty: TypeHandle,
    value: PtrMut<'_>,
    input: &mut dyn Read,
) -> Result<(), CodecError> {
    let registry = de.registry();
    let elem = element_type(registry, ty)?;
    let item = registry.module().ty(elem).layout;
    let construct = registry.constructor(elem)?;
    let destruct = registry.destructor(elem)?;

    let count = stream::read_len(input)?;
    let buffer = array_layout(item, count).ok_or(CodecError::LengthOverflow(count))?;
    let array = unsafe { value.consume::<S>() };

    if let Some(destruct) = destruct {
        for index in 0..array.len() {
            unsafe {
                let slot = array.data_mut().byte_add(index * item.size());
                destruct(slot.promote());
            }
        }
    }
    unsafe {
        array.set_len(0);
        array.release();
        array.allocate(buffer, count);
    }

    match construct {
        Some(construct) => {
            for index in 0..count {
                unsafe {
                    construct(array.data_mut().byte_add(index * item.size()));
                    array.set_len(index + 1);
                }
            }
        }
        // Zeroed items need no construction.
        None => unsafe { array.set_len(count) },
    }

    if count == 0 {
        return Ok(());
    }
    unsafe { de.read_elements(elem, array.data_mut(), count, input) }
}

#[cfg(test)]
mod tests {
    use core::alloc::Layout;

    use super::{RawArray, array_layout};

    #[test]
    fn allocate_and_release() {
        let mut raw = RawArray::new();
        unsafe {
            raw.allocate(array_layout(Layout::new::<u64>(), 3).unwrap(), 3);
            raw.set_len(3);
        }
        assert_eq!(raw.capacity(), 3);
        assert_eq!(raw.as_ptr() as usize % 8, 0);
        let bytes = unsafe { core::slice::from_raw_parts(raw.as_ptr(), 24) };
        assert!(bytes.iter().all(|b| *b == 0));

        unsafe {
            raw.set_len(0);
            raw.release();
            raw.allocate(array_layout(Layout::new::<u64>(), 0).unwrap(), 0);
        }
        assert_eq!(raw.len(), 0);
        assert_eq!(raw.as_ptr() as usize, 8);
    }

    #[test]
    fn layout_overflow() {
        assert!(array_layout(Layout::new::<u32>(), usize::MAX).is_none());
        assert_eq!(array_layout(Layout::new::<u16>(), 5).map(|l| l.size()), Some(10));
    }
}

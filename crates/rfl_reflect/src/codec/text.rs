use alloc::string::{String, ToString};
use std::io::{Read, Write};

use rfl_ptr::{Ptr, PtrMut};

use crate::codec::{CodecError, Deserializer, Serializer, stream};
use crate::graph::TypeHandle;

/// A growable text buffer the codec can overwrite in place.
///
/// # Safety
///
/// The hooked graph type must describe `Self`. `overwrite` must return
/// exactly `len` writable bytes owned by `self`.
pub unsafe trait TextStorage {
    /// The current content.
    fn text_bytes(&self) -> &[u8];

    /// Resizes the buffer to exactly `len` bytes and exposes them.
    ///
    /// # Safety
    ///
    /// Until [`TextStorage::finish_overwrite`] is called the buffer may hold
    /// bytes that are not valid text, and must not be used as text.
    unsafe fn overwrite(&mut self, len: usize) -> &mut [u8];

    /// Validates the overwritten bytes.
    ///
    /// Returns `false` and leaves the buffer empty when they are not valid.
    fn finish_overwrite(&mut self) -> bool;
}

unsafe impl TextStorage for String {
    #[inline]
    fn text_bytes(&self) -> &[u8] {
        self.as_bytes()
    }

    unsafe fn overwrite(&mut self, len: usize) -> &mut [u8] {
        // SAFETY: the caller restores valid UTF-8 via `finish_overwrite`.
        let bytes = unsafe { self.as_mut_vec() };
        bytes.clear();
        bytes.resize(len, 0);
        bytes.as_mut_slice()
    }

    fn finish_overwrite(&mut self) -> bool {
        // SAFETY: invalid content is cleared before returning.
        let bytes = unsafe { self.as_mut_vec() };
        if core::str::from_utf8(bytes).is_ok() {
            true
        } else {
            bytes.clear();
            false
        }
    }
}

/// # Safety
/// - `value` points to a live `S`.
pub(super) unsafe fn serialize<S: TextStorage>(
    _: &Serializer<'_>,
    _: TypeHandle,
    value: Ptr<'_>,
    out: &mut dyn Write,
) -> Result<(), CodecError> {
    let bytes = unsafe { value.as_ref::<S>() }.text_bytes();
    stream::write_len(out, bytes.len())?;
    out.write_all(bytes)?;
    Ok(())
}

/// # Safety
/// - `value` points to a live `S`.
pub(super) unsafe fn deserialize<S: TextStorage>(
    de: &Deserializer<'_>,
    ty: TypeHandle,
    value: PtrMut<'_>,
    input: &mut dyn Read,
) -> Result<(), CodecError> {
    let len = stream::read_len(input)?;
    let text = unsafe { value.consume::<S>() };

    let read = input.read_exact(unsafe { text.overwrite(len) });
    let valid = text.finish_overwrite();
    read?;

    if valid {
        Ok(())
    } else {
        Err(CodecError::InvalidText {
            ty: de.registry().module().ty(ty).full_name().text().to_string(),
        })
    }
}

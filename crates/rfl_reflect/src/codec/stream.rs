//! Length prefixes shared by the container hooks.
//!
//! Lengths are 32-bit unsigned integers in host byte order.

use std::io::{Read, Write};

use crate::codec::CodecError;

/// Writes a length prefix.
///
/// # Examples
///
/// ```
/// use rfl_reflect::codec::stream;
///
/// let mut out = Vec::new();
/// stream::write_len(&mut out, 3).unwrap();
/// assert_eq!(out, 3_u32.to_ne_bytes());
/// assert_eq!(stream::read_len(&mut out.as_slice()).unwrap(), 3);
/// ```
pub fn write_len(out: &mut dyn Write, len: usize) -> Result<(), CodecError> {
    let prefix = u32::try_from(len).map_err(|_| CodecError::LengthOverflow(len))?;
    out.write_all(&prefix.to_ne_bytes())?;
    Ok(())
}

/// Reads a length prefix.
pub fn read_len(input: &mut dyn Read) -> Result<usize, CodecError> {
    let mut prefix = [0_u8; 4];
    input.read_exact(&mut prefix)?;
    let len = u32::from_ne_bytes(prefix);
    usize::try_from(len).map_err(|_| CodecError::LengthOverflow(len as usize))
}

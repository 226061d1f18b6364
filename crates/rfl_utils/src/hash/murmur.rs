//! MurmurHash2, 32-bit, as used for name identities.

/// Seed shared with the metadata exporter. Changing it invalidates every
/// hash stored in existing documents.
pub const NAME_HASH_SEED: u32 = 0xFEED_B00D;

const M: u32 = 0x5bd1_e995;
const R: u32 = 24;

/// Hashes `key` with MurmurHash2 (Austin Appleby, 32-bit variant).
///
/// Bytes are consumed as little-endian words regardless of the host, so the
/// result is the same on every machine.
///
/// # Examples
///
/// ```
/// use rfl_utils::hash::{NAME_HASH_SEED, murmur_hash2};
///
/// assert_eq!(murmur_hash2(b"", 0), 0);
/// assert_eq!(murmur_hash2(b"int", NAME_HASH_SEED), 0x981a_0134);
/// ```
pub const fn murmur_hash2(key: &[u8], seed: u32) -> u32 {
    let len = key.len();
    let mut h = seed ^ (len as u32);

    let mut pos = 0;
    while len - pos >= 4 {
        let mut k = u32::from_le_bytes([key[pos], key[pos + 1], key[pos + 2], key[pos + 3]]);

        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h = h.wrapping_mul(M);
        h ^= k;

        pos += 4;
    }

    let rest = len - pos;
    if rest == 3 {
        h ^= (key[pos + 2] as u32) << 16;
    }
    if rest >= 2 {
        h ^= (key[pos + 1] as u32) << 8;
    }
    if rest >= 1 {
        h ^= key[pos] as u32;
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;
    h
}

#[cfg(test)]
mod tests {
    use super::{NAME_HASH_SEED, murmur_hash2};

    #[test]
    fn known_vectors() {
        assert_eq!(murmur_hash2(b"", NAME_HASH_SEED), 0xfeb0_1783);
        assert_eq!(murmur_hash2(b"int", NAME_HASH_SEED), 0x981a_0134);
        assert_eq!(murmur_hash2(b"Config", NAME_HASH_SEED), 0xdb0b_ed8b);
        assert_eq!(murmur_hash2(b"std::vector", NAME_HASH_SEED), 0x45fb_4bf8);
        assert_eq!(murmur_hash2(b"hello world", 0), 0x44a8_1419);
    }

    #[test]
    fn const_evaluable() {
        const INT: u32 = murmur_hash2(b"int", NAME_HASH_SEED);
        assert_eq!(INT, murmur_hash2(b"int", NAME_HASH_SEED));
    }
}

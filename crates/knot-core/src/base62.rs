//! Base62 encoding of allocated ids into short codes.

/// The fixed 62-character alphabet: lowercase, uppercase, then digits.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Encodes a non-negative integer as a base62 string, most-significant
/// digit first.
///
/// The encoding is a deterministic, length-minimal bijection: distinct
/// ids always produce distinct strings, and the same id produces the
/// same string on every call. There is no decoder; nothing in the
/// system maps codes back to ids.
///
/// Id 0 encodes to `"a"`, but the first id ever handed out by an
/// allocator is 1 (which encodes to `"b"`), so `"a"` never names a
/// stored record.
pub fn encode(mut id: u64) -> String {
    if id == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut digits = Vec::new();
    while id > 0 {
        digits.push(ALPHABET[(id % 62) as usize] as char);
        id /= 62;
    }
    digits.iter().rev().collect()
}

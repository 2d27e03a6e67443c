//! Content fingerprinting for cache and dedupe keys

/// Derive a stable identifier from raw content
///
/// A 32-bit rolling hash over the UTF-16 code units of the input, rendered in
/// base-36. Not cryptographic: a collision only causes an unwanted cache hit.
/// The same content always yields the same fingerprint across process
/// restarts, which is what makes it usable as a persistent storage key.
pub fn fingerprint(content: &str) -> String {
    let mut hash: i32 = 0;
    for unit in content.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    to_base36(u64::from(hash.unsigned_abs()))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.iter().rev().map(|&digit| digit as char).collect()
}

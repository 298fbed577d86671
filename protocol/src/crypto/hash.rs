//! # Hashing Utilities
//!
//! BLAKE3 helpers used by the ledger:
//!
//! - [`blake3_hash_multi`] for plain digests over several parts.
//! - [`domain_separated_hash`] when the same bytes must never collide across
//!   contexts (address derivation vs. state leaves).
//! - [`merkle_root`] to fold a sorted list of state leaves into one digest.

/// Compute a domain-separated hash using BLAKE3 with a context string.
///
/// Uses BLAKE3's `derive_key` mode, so `domain_separated_hash("a", x)` and
/// `domain_separated_hash("b", x)` never collide.
pub fn domain_separated_hash(context: &str, data: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(data);
    *hasher.finalize().as_bytes()
}

/// Hash multiple byte slices together without concatenating them first.
///
/// # Example
///
/// ```
/// use ledger_protocol::crypto::blake3_hash_multi;
///
/// let hash = blake3_hash_multi(&[b"led", b"ger"]);
/// assert_eq!(hash, blake3_hash_multi(&[b"ledger"]));
/// ```
pub fn blake3_hash_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

/// Compute a binary Merkle root from a list of leaf hashes using BLAKE3.
///
/// An odd trailing leaf is paired with itself. A single leaf is also paired
/// with itself so the root is always the output of a hash, never a raw leaf.
/// An empty input yields all zeros.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    if leaves.is_empty() {
        return [0u8; 32];
    }

    let mut current_level: Vec<[u8; 32]> = leaves.to_vec();

    if current_level.len() == 1 {
        return blake3_hash_multi(&[current_level[0].as_slice(), current_level[0].as_slice()]);
    }

    while current_level.len() > 1 {
        let mut next_level = Vec::with_capacity((current_level.len() + 1) / 2);

        for chunk in current_level.chunks(2) {
            let left = &chunk[0];
            let right = if chunk.len() == 2 { &chunk[1] } else { &chunk[0] };
            next_level.push(blake3_hash_multi(&[left.as_slice(), right.as_slice()]));
        }

        current_level = next_level;
    }

    current_level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blake3_hash(data: &[u8]) -> [u8; 32] {
        *blake3::hash(data).as_bytes()
    }

    #[test]
    fn blake3_multi_deterministic() {
        let a = blake3_hash_multi(&[b"ledger"]);
        let b = blake3_hash_multi(&[b"ledger"]);
        assert_eq!(a, b);
        assert_ne!(a, blake3_hash_multi(&[b"Ledger"]));
    }

    #[test]
    fn test_domain_separation() {
        let data = b"same data";
        assert_ne!(
            domain_separated_hash("context-a", data),
            domain_separated_hash("context-b", data)
        );
        assert_ne!(domain_separated_hash("context-a", data), blake3_hash(data));
    }

    #[test]
    fn test_blake3_hash_multi_matches_concatenation() {
        let multi = blake3_hash_multi(&[b"hello", b" world"]);
        assert_eq!(multi, blake3_hash(b"hello world"));
    }

    #[test]
    fn test_merkle_root_empty() {
        assert_eq!(merkle_root(&[]), [0u8; 32]);
    }

    #[test]
    fn test_merkle_root_single_leaf() {
        let leaf = blake3_hash(b"only child");
        let expected = blake3_hash_multi(&[leaf.as_slice(), leaf.as_slice()]);
        assert_eq!(merkle_root(&[leaf]), expected);
    }

    #[test]
    fn test_merkle_root_odd_leaf_is_duplicated() {
        let a = blake3_hash(b"a");
        let b = blake3_hash(b"b");
        let c = blake3_hash(b"c");
        let left = blake3_hash_multi(&[a.as_slice(), b.as_slice()]);
        let right = blake3_hash_multi(&[c.as_slice(), c.as_slice()]);
        let expected = blake3_hash_multi(&[left.as_slice(), right.as_slice()]);
        assert_eq!(merkle_root(&[a, b, c]), expected);
    }

    #[test]
    fn test_merkle_root_order_matters() {
        let first = blake3_hash(b"first");
        let second = blake3_hash(b"second");
        assert_ne!(merkle_root(&[first, second]), merkle_root(&[second, first]));
    }
}

//! Binary Merkle tree over byte slices, as used to derive the data root of a square.

use crate::hasher::{RecordingHasher, HASH_SIZE};

const LEAF_PREFIX: u8 = 0;
const INNER_PREFIX: u8 = 1;

/// Computes the Merkle root of `items`.
///
/// Leaves are hashed as `sha256(0x00 ‖ item)`, inner nodes as `sha256(0x01 ‖ left ‖ right)`, and
/// the root of an empty list is `sha256("")`. A list of `n > 1` items is split at the largest power
/// of 2 strictly less than `n`. Item order is significant.
pub fn hash_from_byte_slices<T: AsRef<[u8]>>(
    hasher: &mut RecordingHasher<'_>,
    items: &[T],
) -> [u8; HASH_SIZE] {
    match items {
        [] => hasher.hash(&[]),
        [item] => hasher.hash_prefixed(LEAF_PREFIX, &[item.as_ref()]),
        _ => {
            let (left, right) = items.split_at(split_point(items.len()));
            let left = hash_from_byte_slices(hasher, left);
            let right = hash_from_byte_slices(hasher, right);
            hasher.hash_prefixed(INNER_PREFIX, &[&left, &right])
        }
    }
}

/// Largest power of 2 strictly less than `len`. `len` must be greater than 1.
pub(crate) fn split_point(len: usize) -> usize {
    debug_assert!(len > 1);
    len.next_power_of_two() / 2
}

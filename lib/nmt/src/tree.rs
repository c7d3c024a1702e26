//! Namespaced Merkle trees.

use std::fmt;

use crate::{
    hasher::{RecordingHasher, HASH_SIZE},
    merkle::split_point,
    namespace::{Namespace, NAMESPACE_SIZE},
};

const LEAF_PREFIX: u8 = 0;
const NODE_PREFIX: u8 = 1;

/// Serialized size of an [`NmtNode`]: `min_ns ‖ max_ns ‖ digest`.
pub const NMT_NODE_SIZE: usize = 2 * NAMESPACE_SIZE + HASH_SIZE;

/// Errors building or hashing a namespaced Merkle tree.
#[derive(Debug, thiserror::Error)]
pub enum NmtError {
    /// Leaves (or sibling subtrees) are not sorted by namespace.
    #[error("namespace {next} follows namespace {prev}; leaves must be ordered by namespace")]
    UnorderedNamespace {
        /// Greater namespace coming first.
        prev: Namespace,
        /// Lesser namespace coming second.
        next: Namespace,
    },
    /// Share is too short to carry a namespace prefix.
    #[error("share #{index} is {len} bytes long, shorter than a namespace")]
    ShareTooShort {
        /// Position of the share in its row.
        index: u64,
        /// Share length.
        len: usize,
    },
    /// More shares were pushed into a row than the extended square width allows.
    #[error("row #{row} already holds {width} shares")]
    RowOverflow {
        /// Absolute row index.
        row: u64,
        /// Extended square width.
        width: u64,
    },
}

/// Node of a namespaced Merkle tree: a digest annotated with the namespace range it covers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NmtNode {
    min_namespace: Namespace,
    max_namespace: Namespace,
    digest: [u8; HASH_SIZE],
}

impl fmt::Debug for NmtNode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NmtNode")
            .field("min_namespace", &self.min_namespace)
            .field("max_namespace", &self.max_namespace)
            .field("digest", &hex::encode(self.digest))
            .finish()
    }
}

impl NmtNode {
    /// Returns the minimum namespace covered by this node.
    pub fn min_namespace(&self) -> Namespace {
        self.min_namespace
    }

    /// Returns the maximum namespace covered by this node.
    pub fn max_namespace(&self) -> Namespace {
        self.max_namespace
    }

    /// Returns the SHA-256 digest of this node.
    pub fn digest(&self) -> [u8; HASH_SIZE] {
        self.digest
    }

    /// Serializes this node as `min_ns ‖ max_ns ‖ digest`.
    pub fn to_bytes(&self) -> [u8; NMT_NODE_SIZE] {
        let mut bytes = [0_u8; NMT_NODE_SIZE];
        bytes[..NAMESPACE_SIZE].copy_from_slice(self.min_namespace.as_bytes());
        bytes[NAMESPACE_SIZE..2 * NAMESPACE_SIZE].copy_from_slice(self.max_namespace.as_bytes());
        bytes[2 * NAMESPACE_SIZE..].copy_from_slice(&self.digest);
        bytes
    }

    /// Parses a node serialized with [`Self::to_bytes()`]. Returns `None` on a length mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != NMT_NODE_SIZE {
            return None;
        }
        let (min_namespace, rest) = bytes.split_at(NAMESPACE_SIZE);
        let (max_namespace, digest) = rest.split_at(NAMESPACE_SIZE);
        Some(Self {
            min_namespace: Namespace::try_from(min_namespace).ok()?,
            max_namespace: Namespace::try_from(max_namespace).ok()?,
            digest: digest.try_into().ok()?,
        })
    }
}

/// In-memory namespaced Merkle tree.
///
/// Leaves are namespaced data (`namespace ‖ data`) and must be pushed in non-decreasing namespace
/// order. The tree shape is the same as in [`hash_from_byte_slices()`](crate::hash_from_byte_slices);
/// each node additionally commits to the namespace range of its subtree.
///
/// If `ignore_max_namespace` is set, the [parity namespace](Namespace::PARITY) does not extend
/// the maximum namespace of a node: a parent whose right child starts at the parity namespace
/// inherits the maximum namespace of its left child.
#[derive(Debug, Clone)]
pub struct NamespacedMerkleTree {
    ignore_max_namespace: bool,
    leaves: Vec<(Namespace, Vec<u8>)>,
}

impl NamespacedMerkleTree {
    /// Creates an empty tree.
    pub fn new(ignore_max_namespace: bool) -> Self {
        Self {
            ignore_max_namespace,
            leaves: Vec::new(),
        }
    }

    /// Returns the number of pushed leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Checks whether the tree has no leaves.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Appends a leaf.
    ///
    /// # Errors
    ///
    /// Fails if `namespace` is less than the namespace of the previous leaf.
    pub fn push(&mut self, namespace: Namespace, data: &[u8]) -> Result<(), NmtError> {
        if let Some((prev, _)) = self.leaves.last() {
            if namespace < *prev {
                return Err(NmtError::UnorderedNamespace {
                    prev: *prev,
                    next: namespace,
                });
            }
        }
        self.leaves.push((namespace, data.to_vec()));
        Ok(())
    }

    /// Computes the root of this tree.
    ///
    /// # Errors
    ///
    /// Propagates namespace ordering violations between sibling subtrees.
    pub fn root(&self, hasher: &mut RecordingHasher<'_>) -> Result<NmtNode, NmtError> {
        self.compute_root(hasher, &self.leaves)
    }

    fn compute_root(
        &self,
        hasher: &mut RecordingHasher<'_>,
        leaves: &[(Namespace, Vec<u8>)],
    ) -> Result<NmtNode, NmtError> {
        match leaves {
            [] => Ok(NmtNode {
                min_namespace: Namespace::from_raw([0; NAMESPACE_SIZE]),
                max_namespace: Namespace::from_raw([0; NAMESPACE_SIZE]),
                digest: hasher.hash(&[]),
            }),
            [(namespace, data)] => Ok(Self::hash_leaf(hasher, *namespace, data)),
            _ => {
                let (left, right) = leaves.split_at(split_point(leaves.len()));
                let left = self.compute_root(hasher, left)?;
                let right = self.compute_root(hasher, right)?;
                self.hash_node(hasher, &left, &right)
            }
        }
    }

    fn hash_leaf(hasher: &mut RecordingHasher<'_>, namespace: Namespace, data: &[u8]) -> NmtNode {
        let digest = hasher.hash_prefixed(LEAF_PREFIX, &[namespace.as_bytes(), data]);
        NmtNode {
            min_namespace: namespace,
            max_namespace: namespace,
            digest,
        }
    }

    fn hash_node(
        &self,
        hasher: &mut RecordingHasher<'_>,
        left: &NmtNode,
        right: &NmtNode,
    ) -> Result<NmtNode, NmtError> {
        if left.max_namespace > right.min_namespace {
            return Err(NmtError::UnorderedNamespace {
                prev: left.max_namespace,
                next: right.min_namespace,
            });
        }

        let max_namespace = if self.ignore_max_namespace && right.min_namespace.is_parity() {
            left.max_namespace
        } else {
            right.max_namespace
        };
        let digest = hasher.hash_prefixed(NODE_PREFIX, &[&left.to_bytes(), &right.to_bytes()]);
        Ok(NmtNode {
            min_namespace: left.min_namespace,
            max_namespace,
            digest,
        })
    }
}

/// Namespaced Merkle tree over one row of an extended data square.
///
/// Shares in the original data square (both the row and the position in the row are less than
/// `ods_size`) are tagged with their own namespace prefix; all other shares are erasure-coded
/// and tagged with the [parity namespace](Namespace::PARITY).
#[derive(Debug, Clone)]
pub struct ErasuredRowTree {
    ods_size: u64,
    row_index: u64,
    tree: NamespacedMerkleTree,
}

impl ErasuredRowTree {
    /// Creates a tree for the row with the specified absolute index in a square whose original
    /// part has `ods_size` rows and columns.
    pub fn new(ods_size: u64, row_index: u64) -> Self {
        Self {
            ods_size,
            row_index,
            tree: NamespacedMerkleTree::new(true),
        }
    }

    /// Appends the next share of the row.
    ///
    /// # Errors
    ///
    /// Fails if the share is shorter than a namespace, if the row is already full, or if shares
    /// are not ordered by namespace.
    pub fn push(&mut self, share: &[u8]) -> Result<(), NmtError> {
        let position = self.tree.len() as u64;
        let width = 2 * self.ods_size;
        if position >= width {
            return Err(NmtError::RowOverflow {
                row: self.row_index,
                width,
            });
        }

        let namespace = if self.row_index < self.ods_size && position < self.ods_size {
            share
                .get(..NAMESPACE_SIZE)
                .and_then(|prefix| Namespace::try_from(prefix).ok())
                .ok_or(NmtError::ShareTooShort {
                    index: position,
                    len: share.len(),
                })?
        } else if share.len() < NAMESPACE_SIZE {
            return Err(NmtError::ShareTooShort {
                index: position,
                len: share.len(),
            });
        } else {
            Namespace::PARITY
        };
        self.tree.push(namespace, share)
    }

    /// Computes the row root.
    ///
    /// # Errors
    ///
    /// Propagates namespace ordering violations.
    pub fn root(&self, hasher: &mut RecordingHasher<'_>) -> Result<NmtNode, NmtError> {
        self.tree.root(hasher)
    }
}

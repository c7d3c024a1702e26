//! Namespaced Merkle trees used to authenticate data fetched from Nubit DA.
//!
//! The crate covers three things:
//!
//! - [`Namespace`] encoding, i.e. turning a human-readable tenant name into the fixed-width
//!   identifier that tags every blob of this rollup on the shared DA network;
//! - [`NamespacedMerkleTree`] and [`ErasuredRowTree`], which recompute row roots of an extended
//!   data square;
//! - [`hash_from_byte_slices()`], the binary Merkle tree that rolls row and column roots into
//!   the data root.
//!
//! All hashing goes through a [`RecordingHasher`], so callers can capture every hash preimage
//! produced during verification (e.g., to replay the computation in a fraud proof).

// Linter settings.
#![warn(missing_debug_implementations, missing_docs, bare_trait_objects)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

pub use crate::{
    hasher::{PreimageRecorder, RecordingHasher, HASH_SIZE},
    merkle::hash_from_byte_slices,
    namespace::{
        Namespace, NamespaceError, NAMESPACE_ID_SIZE, NAMESPACE_SIZE, NAMESPACE_VERSION_MAX,
    },
    tree::{ErasuredRowTree, NamespacedMerkleTree, NmtError, NmtNode, NMT_NODE_SIZE},
};

mod hasher;
mod merkle;
mod namespace;
#[cfg(test)]
mod tests;
mod tree;

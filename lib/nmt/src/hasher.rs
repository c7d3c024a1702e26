use std::{collections::HashMap, fmt};

use sha2::{Digest, Sha256};

/// Size of a SHA-256 digest.
pub const HASH_SIZE: usize = 32;

/// Append-only sink for `(hash, preimage)` pairs produced while hashing.
///
/// The recorder never influences hashing results; it only makes the computation replayable.
pub trait PreimageRecorder: Send {
    /// Records that `hash` is the SHA-256 digest of `preimage`.
    fn record(&mut self, hash: [u8; HASH_SIZE], preimage: &[u8]);
}

impl PreimageRecorder for HashMap<[u8; HASH_SIZE], Vec<u8>> {
    fn record(&mut self, hash: [u8; HASH_SIZE], preimage: &[u8]) {
        self.entry(hash).or_insert_with(|| preimage.to_vec());
    }
}

/// SHA-256 hasher reporting every hashed preimage to an optional [`PreimageRecorder`].
pub struct RecordingHasher<'a> {
    recorder: Option<&'a mut dyn PreimageRecorder>,
}

impl fmt::Debug for RecordingHasher<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RecordingHasher")
            .field("records_preimages", &self.recorder.is_some())
            .finish()
    }
}

impl<'a> RecordingHasher<'a> {
    /// Creates a hasher. If `recorder` is `None`, preimages are not recorded.
    pub fn new(recorder: Option<&'a mut dyn PreimageRecorder>) -> Self {
        Self { recorder }
    }

    /// Hashes `preimage`, recording it if there's a recorder.
    pub fn hash(&mut self, preimage: &[u8]) -> [u8; HASH_SIZE] {
        let digest: [u8; HASH_SIZE] = Sha256::digest(preimage).into();
        if let Some(recorder) = self.recorder.as_deref_mut() {
            recorder.record(digest, preimage);
        }
        digest
    }

    /// Hashes `prefix ‖ parts[0] ‖ parts[1] ‖ ...`.
    pub(crate) fn hash_prefixed(&mut self, prefix: u8, parts: &[&[u8]]) -> [u8; HASH_SIZE] {
        let len = 1 + parts.iter().map(|part| part.len()).sum::<usize>();
        let mut preimage = Vec::with_capacity(len);
        preimage.push(prefix);
        for part in parts {
            preimage.extend_from_slice(part);
        }
        self.hash(&preimage)
    }
}

use std::fmt;

/// Width of a namespace in bytes. Changing it breaks the wire protocol.
pub const NAMESPACE_SIZE: usize = 29;
/// Width of the namespace ID part in versioned namespace schemes.
pub const NAMESPACE_ID_SIZE: usize = 28;
/// Maximum namespace version in versioned namespace schemes.
pub const NAMESPACE_VERSION_MAX: u8 = u8::MAX;

/// Errors produced when constructing a [`Namespace`].
#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    /// Name doesn't fit into [`NAMESPACE_SIZE`] bytes.
    #[error("namespace `{name}` is {len} bytes long, at most {NAMESPACE_SIZE} bytes are allowed")]
    TooLong {
        /// Offending name.
        name: String,
        /// Length of the name in bytes.
        len: usize,
    },
    /// Raw namespace has an unexpected length.
    #[error("expected {NAMESPACE_SIZE} namespace bytes, got {0}")]
    InvalidLength(usize),
    /// Padded name is not valid hex. Cannot happen for names produced by `hex::encode`.
    #[error("failed decoding padded namespace")]
    Hex(#[from] hex::FromHexError),
}

/// Fixed-width identifier tagging all blobs of a single tenant on the DA network.
///
/// Namespaces are ordered byte-wise; namespaced Merkle trees rely on this ordering.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace([u8; NAMESPACE_SIZE]);

impl Namespace {
    /// Namespace assigned to erasure-coded (parity) shares of an extended data square.
    pub const PARITY: Self = Self([0xff; NAMESPACE_SIZE]);

    /// Wraps raw namespace bytes.
    pub const fn from_raw(bytes: [u8; NAMESPACE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Encodes a human-readable name: the name's UTF-8 bytes are hex-encoded, left-padded with `'0'`
    /// to `2 * NAMESPACE_SIZE` hex chars and decoded back.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceError::TooLong`] if the name is longer than [`NAMESPACE_SIZE`] bytes.
    pub fn from_name(name: &str) -> Result<Self, NamespaceError> {
        let hex_name = hex::encode(name.as_bytes());
        let padding = (NAMESPACE_SIZE * 2)
            .checked_sub(hex_name.len())
            .ok_or_else(|| NamespaceError::TooLong {
                name: name.to_owned(),
                len: name.len(),
            })?;
        let padded = format!("{}{hex_name}", "0".repeat(padding));

        let mut bytes = [0_u8; NAMESPACE_SIZE];
        hex::decode_to_slice(padded, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Returns the raw bytes of this namespace.
    pub fn as_bytes(&self) -> &[u8; NAMESPACE_SIZE] {
        &self.0
    }

    /// Checks whether this is the [parity namespace](Self::PARITY).
    pub fn is_parity(&self) -> bool {
        *self == Self::PARITY
    }
}

impl TryFrom<&[u8]> for Namespace {
    type Error = NamespaceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes = bytes
            .try_into()
            .map_err(|_| NamespaceError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Namespace {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Namespace({self})")
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&hex::encode(self.0))
    }
}

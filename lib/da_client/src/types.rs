use std::{error, fmt};

use nubit_nmt::NmtError;

use crate::pointer::{BlobPointer, PointerError};

/// `DAError` is the error type returned by the DA transports.
#[derive(Debug)]
pub struct DAError {
    pub error: anyhow::Error,
    pub is_retriable: bool,
}

impl DAError {
    pub fn is_retriable(&self) -> bool {
        self.is_retriable
    }
}

impl fmt::Display for DAError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_retriable {
            "retriable"
        } else {
            "fatal"
        };
        write!(f, "{kind} data availability client error: {}", self.error)
    }
}

impl error::Error for DAError {}

/// Payload fetched from the DA network along with the data needed to authenticate it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedBlob {
    pub payload: Vec<u8>,
    /// May be omitted by the transport if the payload is empty.
    pub square: Option<SquareData>,
}

/// Rows of an extended data square returned by the DA network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SquareData {
    /// Row roots of the whole extended square, in the canonical order. Indexed by absolute row index.
    pub row_roots: Vec<Vec<u8>>,
    /// Column roots of the whole extended square, in the canonical order.
    pub column_roots: Vec<Vec<u8>>,
    /// Fetched rows `start_row..=end_row`; each row is a sequence of shares.
    pub rows: Vec<Vec<Vec<u8>>>,
    /// Width of the extended square; the original data square is half as wide.
    pub square_size: u64,
    pub start_row: u64,
    pub end_row: u64,
}

/// Reasons why a batch message doesn't yield a blob pointer.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("sequencer message is too short to contain a header byte")]
    TruncatedMessage,
    #[error("header byte {0:#04x} does not mark a Nubit blob pointer")]
    NotAPointerMessage(u8),
    #[error("malformed blob pointer: {0}")]
    MalformedPointer(#[from] PointerError),
}

/// Fetched data is inconsistent with the commitment in the blob pointer.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("DA transport returned a non-empty payload without square data")]
    MissingSquareData,
    #[error("invalid square geometry: {0}")]
    InvalidSquareGeometry(String),
    #[error("failed computing root of row #{row}: {source}")]
    Nmt {
        row: u64,
        #[source]
        source: NmtError,
    },
    #[error("root of row #{row} doesn't match: expected {expected}, computed {actual}")]
    RowRootMismatch {
        row: u64,
        expected: String,
        actual: String,
    },
    #[error("data root doesn't match: expected {expected}, computed {actual}")]
    DataRootMismatch { expected: String, actual: String },
}

/// Hard errors of payload recovery. Malformed messages are not errors (they yield an empty payload).
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    /// Data couldn't be fetched. The caller should retry or halt, but must not proceed.
    #[error("failed fetching blob for {pointer:?}: {source}")]
    Fetch {
        pointer: BlobPointer,
        #[source]
        source: DAError,
    },
    /// Fetched data doesn't match the commitment. Retrying won't help.
    #[error("blob failed verification: {0}")]
    Verification(#[from] VerificationError),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unable to store batch on Nubit DA and storing data on chain as a fallback is disabled")]
    NoFallbackAvailable,
    #[error(transparent)]
    Transport(#[from] DAError),
}

//! Header protocol marking batch messages that carry a blob pointer.
//!
//! A sequencer message starts with a fixed metadata prefix owned by the batch protocol. A message
//! referencing a Nubit blob continues with a header byte having all [`NUBIT_MESSAGE_HEADER_FLAG`]
//! bits set, followed by the serialized [`BlobPointer`].

use crate::{pointer::BlobPointer, types::MessageError};

/// Header flag indicating that the rest of the message is a Nubit blob pointer.
pub const NUBIT_MESSAGE_HEADER_FLAG: u8 = 0xda;
/// Length of the sequencer message metadata preceding the header byte.
pub const SEQUENCER_MESSAGE_HEADER_LEN: usize = 40;

fn has_bits(checking: u8, bits: u8) -> bool {
    checking & bits == bits
}

/// Checks whether `header` marks a Nubit blob pointer. Bits outside the flag are reserved
/// and ignored.
pub fn is_nubit_message_header_byte(header: u8) -> bool {
    has_bits(header, NUBIT_MESSAGE_HEADER_FLAG)
}

/// Serializes the part of a batch message following the metadata prefix: the header byte
/// and the pointer.
pub fn encode_pointer_message(pointer: &BlobPointer) -> Vec<u8> {
    let mut message = vec![NUBIT_MESSAGE_HEADER_FLAG];
    message.extend_from_slice(&pointer.to_bytes());
    message
}

/// Extracts a blob pointer from a full sequencer message (including the metadata prefix).
pub fn parse_pointer_message(sequencer_msg: &[u8]) -> Result<BlobPointer, MessageError> {
    let (&header, pointer_bytes) = sequencer_msg
        .get(SEQUENCER_MESSAGE_HEADER_LEN..)
        .and_then(<[u8]>::split_first)
        .ok_or(MessageError::TruncatedMessage)?;
    if !is_nubit_message_header_byte(header) {
        return Err(MessageError::NotAPointerMessage(header));
    }
    Ok(BlobPointer::from_bytes(pointer_bytes)?)
}

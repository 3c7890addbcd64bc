#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wire protocol spoken between the placement subsystem and the server.
//!
//! Inbound placement messages arrive after the network layer has consumed
//! the channel byte, so [`decode_inbound`] starts at the placement sub-kind.
//! Outbound messages are complete and begin with their [`NetMessage`] kind.
//! Decoding is strictly positional; anything truncated or out of range is a
//! [`DecodeError`] for the connection layer to handle.

use thiserror::Error;

mod message;
mod wire;

pub use message::{
    decode_inbound, decode_outbound, write_cancel_placement, write_entity_deletion,
    write_placement_failed, write_start_placement, DeliveryMethod, InboundPlacement, NetMessage,
    OutboundPlacement, PlacementManagerMessage, PlacementRequest, Transport,
};
pub use wire::{IncomingMessage, OutgoingMessage};

/// Errors raised while reading a message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload ended before a field could be read.
    #[error("message ended early: needed {needed} bytes but {remaining} remain")]
    UnexpectedEnd {
        /// Bytes the field required.
        needed: usize,
        /// Bytes left in the payload.
        remaining: usize,
    },
    /// A boolean field held something other than 0 or 1.
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),
    /// A string length prefix was malformed.
    #[error("malformed string length prefix")]
    InvalidLength,
    /// A string field was not valid UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,
    /// The channel byte is not a known [`NetMessage`].
    #[error("unknown net message kind {0:#04x}")]
    UnknownNetMessage(u8),
    /// The sub-kind byte is not a known [`PlacementManagerMessage`].
    #[error("unknown placement message kind {0:#04x}")]
    UnknownPlacementMessage(u8),
    /// A known sub-kind arrived in the wrong direction.
    #[error("placement message {0:?} is not valid here")]
    UnexpectedPlacementMessage(PlacementManagerMessage),
    /// The tile id has no registered tile type.
    #[error("tile id {0} is not registered")]
    UnknownTileId(u8),
    /// The direction byte is out of range.
    #[error("invalid direction byte {0}")]
    InvalidDirection(u8),
}

/// Errors raised while writing a message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The tile type name has no registered wire id.
    #[error("tile type '{0}' has no wire id")]
    UnknownTileType(String),
}

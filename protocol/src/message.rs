use glam::Vec2;
use placement_core::{
    Direction, EntityId, PlacementPermission, PlacementTarget, TileCatalog, TilePosition,
};
use serde::{Deserialize, Serialize};

use crate::{DecodeError, EncodeError, IncomingMessage, OutgoingMessage};

/// Top-level message kinds routed by the network layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NetMessage {
    /// Message addressed to the placement subsystem.
    PlacementManagerMessage = 0x20,
    /// Request that the server delete an entity.
    RequestEntityDeletion = 0x21,
}

impl TryFrom<u8> for NetMessage {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x20 => Ok(Self::PlacementManagerMessage),
            0x21 => Ok(Self::RequestEntityDeletion),
            other => Err(DecodeError::UnknownNetMessage(other)),
        }
    }
}

/// Sub-kinds carried on the placement channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PlacementManagerMessage {
    /// Server grants a placement permission.
    StartPlacement = 0,
    /// Server revokes the current permission.
    CancelPlacement = 1,
    /// Server rejected the last placement request.
    PlacementFailed = 2,
    /// Client asks the server to place an object.
    RequestPlacement = 3,
}

impl TryFrom<u8> for PlacementManagerMessage {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::StartPlacement),
            1 => Ok(Self::CancelPlacement),
            2 => Ok(Self::PlacementFailed),
            3 => Ok(Self::RequestPlacement),
            other => Err(DecodeError::UnknownPlacementMessage(other)),
        }
    }
}

/// Delivery guarantee requested from the transport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryMethod {
    /// Fire and forget.
    Unreliable,
    /// Unreliable, dropping anything older than the newest received.
    UnreliableSequenced,
    /// Guaranteed delivery in any order.
    #[default]
    ReliableUnordered,
    /// Guaranteed delivery, dropping anything older than the newest received.
    ReliableSequenced,
    /// Guaranteed delivery in send order.
    ReliableOrdered,
}

/// Outbound half of the network connection.
pub trait Transport {
    /// Creates an empty message ready to be filled.
    fn create_message(&self) -> OutgoingMessage {
        OutgoingMessage::new()
    }

    /// Hands a message to the connection with the requested guarantee.
    fn send(&mut self, message: OutgoingMessage, delivery: DeliveryMethod);
}

/// Server-to-client placement message after decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundPlacement {
    /// A new permission was granted.
    Start(PlacementPermission),
    /// The current permission was revoked.
    Cancel,
    /// The last placement request was rejected.
    Failed,
}

/// Decodes a placement channel message, starting at its sub-kind byte.
///
/// Tile grants carry a wire id which is translated back to a tile type name
/// through `tiles`.
pub fn decode_inbound(
    message: &mut IncomingMessage,
    tiles: &dyn TileCatalog,
) -> Result<InboundPlacement, DecodeError> {
    match PlacementManagerMessage::try_from(message.read_u8()?)? {
        PlacementManagerMessage::StartPlacement => {
            decode_permission(message, tiles).map(InboundPlacement::Start)
        }
        PlacementManagerMessage::CancelPlacement => Ok(InboundPlacement::Cancel),
        PlacementManagerMessage::PlacementFailed => Ok(InboundPlacement::Failed),
        kind @ PlacementManagerMessage::RequestPlacement => {
            Err(DecodeError::UnexpectedPlacementMessage(kind))
        }
    }
}

fn decode_permission(
    message: &mut IncomingMessage,
    tiles: &dyn TileCatalog,
) -> Result<PlacementPermission, DecodeError> {
    let range = message.read_u16()?;
    let target = if message.read_bool()? {
        let id = message.read_u8()?;
        let name = tiles.tile_name(id).ok_or(DecodeError::UnknownTileId(id))?;
        PlacementTarget::Tile(name)
    } else {
        PlacementTarget::Entity(message.read_string()?)
    };
    let placement_option = message.read_string()?;

    Ok(PlacementPermission {
        range,
        target,
        placement_option,
    })
}

/// Writes a StartPlacement grant, sub-kind byte first.
pub fn write_start_placement(
    message: &mut OutgoingMessage,
    permission: &PlacementPermission,
    tiles: &dyn TileCatalog,
) -> Result<(), EncodeError> {
    message.write_u8(PlacementManagerMessage::StartPlacement as u8);
    message.write_u16(permission.range);
    write_target(message, &permission.target, tiles)?;
    message.write_str(&permission.placement_option);
    Ok(())
}

/// Writes a CancelPlacement notice.
pub fn write_cancel_placement(message: &mut OutgoingMessage) {
    message.write_u8(PlacementManagerMessage::CancelPlacement as u8);
}

/// Writes a PlacementFailed notice.
pub fn write_placement_failed(message: &mut OutgoingMessage) {
    message.write_u8(PlacementManagerMessage::PlacementFailed as u8);
}

fn write_target(
    message: &mut OutgoingMessage,
    target: &PlacementTarget,
    tiles: &dyn TileCatalog,
) -> Result<(), EncodeError> {
    match target {
        PlacementTarget::Tile(name) => {
            let id = tiles
                .tile_index(name)
                .ok_or_else(|| EncodeError::UnknownTileType(name.clone()))?;
            message.write_bool(true);
            message.write_u8(id);
        }
        PlacementTarget::Entity(name) => {
            message.write_bool(false);
            message.write_str(name);
        }
    }
    Ok(())
}

/// Snapshot of a committed placement, detached from live session state.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementRequest {
    /// Alignment literal written ahead of the payload.
    pub alignment: String,
    /// Object being placed.
    pub target: PlacementTarget,
    /// Candidate position in world units.
    pub mouse_world: Vec2,
    /// Facing of the placed object.
    pub direction: Direction,
    /// Tile containing the candidate.
    pub tile: TilePosition,
}

impl PlacementRequest {
    /// Writes the complete request, channel byte first.
    pub fn write(
        &self,
        message: &mut OutgoingMessage,
        tiles: &dyn TileCatalog,
    ) -> Result<(), EncodeError> {
        message.write_u8(NetMessage::PlacementManagerMessage as u8);
        message.write_u8(PlacementManagerMessage::RequestPlacement as u8);
        message.write_str(&self.alignment);
        write_target(message, &self.target, tiles)?;
        message.write_f32(self.mouse_world.x);
        message.write_f32(self.mouse_world.y);
        message.write_u8(self.direction.to_byte());
        message.write_i32(self.tile.x());
        message.write_i32(self.tile.y());
        Ok(())
    }

    fn read_payload(
        message: &mut IncomingMessage,
        tiles: &dyn TileCatalog,
    ) -> Result<Self, DecodeError> {
        let alignment = message.read_string()?;
        let target = if message.read_bool()? {
            let id = message.read_u8()?;
            PlacementTarget::Tile(tiles.tile_name(id).ok_or(DecodeError::UnknownTileId(id))?)
        } else {
            PlacementTarget::Entity(message.read_string()?)
        };
        let mouse_world = Vec2::new(message.read_f32()?, message.read_f32()?);
        let direction_byte = message.read_u8()?;
        let direction =
            Direction::from_byte(direction_byte).ok_or(DecodeError::InvalidDirection(direction_byte))?;
        let tile = TilePosition::new(message.read_i32()?, message.read_i32()?);

        Ok(Self {
            alignment,
            target,
            mouse_world,
            direction,
            tile,
        })
    }
}

/// Writes an entity deletion request.
pub fn write_entity_deletion(message: &mut OutgoingMessage, entity: EntityId) {
    message.write_u8(NetMessage::RequestEntityDeletion as u8);
    message.write_u32(entity.get());
}

/// Client-to-server message as seen by the server after decoding.
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundPlacement {
    /// Placement commit.
    Placement(PlacementRequest),
    /// Eraser deletion.
    Deletion(EntityId),
}

/// Decodes a message produced by [`PlacementRequest::write`] or
/// [`write_entity_deletion`], channel byte first.
pub fn decode_outbound(
    message: &mut IncomingMessage,
    tiles: &dyn TileCatalog,
) -> Result<OutboundPlacement, DecodeError> {
    match NetMessage::try_from(message.read_u8()?)? {
        NetMessage::RequestEntityDeletion => Ok(OutboundPlacement::Deletion(EntityId::new(
            message.read_u32()?,
        ))),
        NetMessage::PlacementManagerMessage => {
            match PlacementManagerMessage::try_from(message.read_u8()?)? {
                PlacementManagerMessage::RequestPlacement => {
                    PlacementRequest::read_payload(message, tiles).map(OutboundPlacement::Placement)
                }
                other => Err(DecodeError::UnexpectedPlacementMessage(other)),
            }
        }
    }
}

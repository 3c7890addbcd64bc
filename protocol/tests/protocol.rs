use glam::Vec2;
use placement_core::{
    Direction, EntityId, PlacementPermission, PlacementTarget, TileCatalog, TilePosition,
};
use placement_protocol::{
    decode_inbound, decode_outbound, write_cancel_placement, write_entity_deletion,
    write_placement_failed, write_start_placement, DecodeError, EncodeError, InboundPlacement,
    IncomingMessage, NetMessage, OutboundPlacement, OutgoingMessage, PlacementManagerMessage,
    PlacementRequest,
};

struct Tiles;

impl TileCatalog for Tiles {
    fn tile_name(&self, id: u8) -> Option<String> {
        match id {
            0 => Some("space".to_owned()),
            1 => Some("floor".to_owned()),
            2 => Some("wall".to_owned()),
            _ => None,
        }
    }

    fn tile_index(&self, name: &str) -> Option<u8> {
        match name {
            "space" => Some(0),
            "floor" => Some(1),
            "wall" => Some(2),
            _ => None,
        }
    }
}

fn loopback(permission: &PlacementPermission) -> Result<InboundPlacement, DecodeError> {
    let mut message = OutgoingMessage::new();
    write_start_placement(&mut message, permission, &Tiles).expect("grant encodes");
    decode_inbound(&mut IncomingMessage::from(message), &Tiles)
}

#[test]
fn tile_grant_round_trips() {
    let permission = PlacementPermission::tile(5, "floor", "SnapgridMode");

    assert_eq!(loopback(&permission), Ok(InboundPlacement::Start(permission)));
}

#[test]
fn entity_grant_round_trips() {
    let permission = PlacementPermission::entity(0, "crate_wood", "AlignFree");

    assert_eq!(loopback(&permission), Ok(InboundPlacement::Start(permission)));
}

#[test]
fn tile_grant_layout_matches_field_order() {
    let mut message = OutgoingMessage::new();
    write_start_placement(
        &mut message,
        &PlacementPermission::tile(0x0105, "wall", "AB"),
        &Tiles,
    )
    .expect("grant encodes");

    assert_eq!(
        message.as_bytes(),
        &[
            PlacementManagerMessage::StartPlacement as u8,
            0x05,
            0x01,
            1,
            2,
            2,
            b'A',
            b'B',
        ]
    );
}

#[test]
fn grant_for_unregistered_tile_does_not_encode() {
    let mut message = OutgoingMessage::new();
    let result = write_start_placement(
        &mut message,
        &PlacementPermission::tile(1, "lava", "AlignTileAny"),
        &Tiles,
    );

    assert_eq!(result, Err(EncodeError::UnknownTileType("lava".to_owned())));
}

#[test]
fn grant_with_unknown_tile_id_fails_to_decode() {
    let mut incoming = IncomingMessage::new(vec![
        PlacementManagerMessage::StartPlacement as u8,
        0,
        0,
        1,
        9,
        0,
    ]);

    assert_eq!(
        decode_inbound(&mut incoming, &Tiles),
        Err(DecodeError::UnknownTileId(9))
    );
}

#[test]
fn cancel_and_failed_carry_no_payload() {
    let mut cancel = OutgoingMessage::new();
    write_cancel_placement(&mut cancel);
    let mut failed = OutgoingMessage::new();
    write_placement_failed(&mut failed);

    assert_eq!(cancel.len(), 1);
    assert_eq!(failed.len(), 1);
    assert_eq!(
        decode_inbound(&mut IncomingMessage::from(cancel), &Tiles),
        Ok(InboundPlacement::Cancel)
    );
    assert_eq!(
        decode_inbound(&mut IncomingMessage::from(failed), &Tiles),
        Ok(InboundPlacement::Failed)
    );
}

#[test]
fn unknown_sub_kind_is_rejected() {
    let mut incoming = IncomingMessage::new(vec![0x7f]);

    assert_eq!(
        decode_inbound(&mut incoming, &Tiles),
        Err(DecodeError::UnknownPlacementMessage(0x7f))
    );
}

#[test]
fn request_placement_is_not_accepted_inbound() {
    let mut incoming = IncomingMessage::new(vec![PlacementManagerMessage::RequestPlacement as u8]);

    assert_eq!(
        decode_inbound(&mut incoming, &Tiles),
        Err(DecodeError::UnexpectedPlacementMessage(
            PlacementManagerMessage::RequestPlacement
        ))
    );
}

#[test]
fn truncated_grant_is_rejected() {
    let mut message = OutgoingMessage::new();
    write_start_placement(
        &mut message,
        &PlacementPermission::entity(3, "crate_wood", "AlignNone"),
        &Tiles,
    )
    .expect("grant encodes");
    let mut bytes = message.into_bytes();
    let _ = bytes.pop();

    assert!(matches!(
        decode_inbound(&mut IncomingMessage::new(bytes), &Tiles),
        Err(DecodeError::UnexpectedEnd { .. })
    ));
}

#[test]
fn placement_request_layout_matches_field_order() {
    let request = PlacementRequest {
        alignment: "AlignNone".to_owned(),
        target: PlacementTarget::Tile("floor".to_owned()),
        mouse_world: Vec2::new(48.0, -16.0),
        direction: Direction::West,
        tile: TilePosition::new(1, -1),
    };
    let mut message = OutgoingMessage::new();
    request.write(&mut message, &Tiles).expect("request encodes");

    let mut expected = vec![
        NetMessage::PlacementManagerMessage as u8,
        PlacementManagerMessage::RequestPlacement as u8,
        9,
    ];
    expected.extend_from_slice(b"AlignNone");
    expected.extend_from_slice(&[1, 1]);
    expected.extend_from_slice(&48.0_f32.to_le_bytes());
    expected.extend_from_slice(&(-16.0_f32).to_le_bytes());
    expected.push(3);
    expected.extend_from_slice(&1_i32.to_le_bytes());
    expected.extend_from_slice(&(-1_i32).to_le_bytes());

    assert_eq!(message.as_bytes(), expected.as_slice());
    assert_eq!(
        decode_outbound(&mut IncomingMessage::from(message), &Tiles),
        Ok(OutboundPlacement::Placement(request))
    );
}

#[test]
fn entity_placement_request_is_readable_by_server() {
    let request = PlacementRequest {
        alignment: "AlignNone".to_owned(),
        target: PlacementTarget::Entity("crate_wood".to_owned()),
        mouse_world: Vec2::new(10.5, 20.25),
        direction: Direction::South,
        tile: TilePosition::new(0, 0),
    };
    let mut message = OutgoingMessage::new();
    request.write(&mut message, &Tiles).expect("request encodes");

    assert_eq!(
        decode_outbound(&mut IncomingMessage::from(message), &Tiles),
        Ok(OutboundPlacement::Placement(request))
    );
}

#[test]
fn deletion_request_carries_entity_id() {
    let mut message = OutgoingMessage::new();
    write_entity_deletion(&mut message, EntityId::new(42));

    assert_eq!(
        message.as_bytes(),
        &[NetMessage::RequestEntityDeletion as u8, 42, 0, 0, 0]
    );
    assert_eq!(
        decode_outbound(&mut IncomingMessage::from(message), &Tiles),
        Ok(OutboundPlacement::Deletion(EntityId::new(42)))
    );
}

#[test]
fn unknown_channel_byte_is_rejected() {
    let mut incoming = IncomingMessage::new(vec![0x01, 0x02]);

    assert_eq!(
        decode_outbound(&mut incoming, &Tiles),
        Err(DecodeError::UnknownNetMessage(0x01))
    );
}

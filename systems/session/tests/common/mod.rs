#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use glam::Vec2;
use placement_core::{
    Canvas, CollisionQuery, Color, EntityTemplate, InterfaceHooks, MapView, PlacementPermission,
    PlayerView, ResourceProvider, SpriteHandle, TemplateDatabase, TileCatalog, TilePosition,
    TileRef, WorldRect,
};
use placement_protocol::{
    decode_outbound, write_cancel_placement, write_placement_failed, write_start_placement,
    DeliveryMethod, IncomingMessage, OutboundPlacement, OutgoingMessage, Transport,
};
use placement_system_modes::ModeRegistry;
use placement_system_session::{Collaborators, PlacementConfig, PlacementManager};

pub const TILE_SIZE: f32 = 32.0;

pub struct Sprites {
    sizes: HashMap<String, Vec2>,
}

impl Sprites {
    fn standard() -> Self {
        let sizes = [
            ("crate", Vec2::splat(32.0)),
            ("crate_north", Vec2::splat(32.0)),
            ("lamp", Vec2::new(16.0, 16.0)),
            ("tilebuildoverlay", Vec2::splat(TILE_SIZE)),
        ]
        .into_iter()
        .map(|(name, size)| (name.to_owned(), size))
        .collect();
        Self { sizes }
    }
}

impl ResourceProvider for Sprites {
    fn sprite(&self, name: &str) -> SpriteHandle {
        let size = self.sizes.get(name).copied().unwrap_or(Vec2::ZERO);
        SpriteHandle::new(name, size)
    }

    fn sprite_exists(&self, name: &str) -> bool {
        self.sizes.contains_key(name)
    }
}

pub struct Templates(HashMap<String, EntityTemplate>);

impl Templates {
    fn standard() -> Self {
        let templates = [
            EntityTemplate::new("crate_wood", vec!["crate".to_owned(), "crate_open".to_owned()]),
            EntityTemplate::new("wall_lamp", vec!["lamp".to_owned()]),
            EntityTemplate::new("ghost", Vec::new()),
        ]
        .into_iter()
        .map(|template| (template.name.clone(), template))
        .collect();
        Self(templates)
    }
}

impl TemplateDatabase for Templates {
    fn template(&self, name: &str) -> Option<EntityTemplate> {
        self.0.get(name).cloned()
    }
}

pub struct Tiles;

impl TileCatalog for Tiles {
    fn tile_name(&self, id: u8) -> Option<String> {
        match id {
            1 => Some("floor".to_owned()),
            2 => Some("wall".to_owned()),
            _ => None,
        }
    }

    fn tile_index(&self, name: &str) -> Option<u8> {
        match name {
            "floor" => Some(1),
            "wall" => Some(2),
            _ => None,
        }
    }
}

pub struct Blockers(pub Vec<WorldRect>);

impl CollisionQuery for Blockers {
    fn is_colliding(&self, area: WorldRect) -> bool {
        self.0.iter().any(|blocker| blocker.intersects(&area))
    }
}

pub struct Actor(pub Option<Vec2>);

impl PlayerView for Actor {
    fn controlled_position(&self) -> Option<Vec2> {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterfaceLog {
    pub targeting_cancelled: u32,
    pub drags_reset: u32,
}

pub struct Interface(Rc<RefCell<InterfaceLog>>);

impl InterfaceHooks for Interface {
    fn cancel_targeting(&mut self) {
        self.0.borrow_mut().targeting_cancelled += 1;
    }

    fn reset_drag(&mut self) {
        self.0.borrow_mut().drags_reset += 1;
    }
}

pub type SentLog = Rc<RefCell<Vec<(Vec<u8>, DeliveryMethod)>>>;

pub struct RecordingTransport(SentLog);

impl Transport for RecordingTransport {
    fn send(&mut self, message: OutgoingMessage, delivery: DeliveryMethod) {
        self.0.borrow_mut().push((message.into_bytes(), delivery));
    }
}

/// `#` is a wall, `.` is floor, anything else is empty space.
pub struct GridMap {
    tiles: HashMap<TilePosition, TileRef>,
}

impl GridMap {
    pub fn parse(rows: &[&str]) -> Self {
        let mut tiles = HashMap::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                let (kind, dense) = match glyph {
                    '#' => ("wall", true),
                    '.' => ("floor", false),
                    _ => continue,
                };
                let position = TilePosition::new(x as i32, y as i32);
                let _ = tiles.insert(
                    position,
                    TileRef {
                        position,
                        kind: kind.to_owned(),
                        dense,
                    },
                );
            }
        }
        Self { tiles }
    }

    pub fn station() -> Self {
        Self::parse(&["......", "..#...", "......", "......"])
    }
}

impl MapView for GridMap {
    fn tile_size(&self) -> f32 {
        TILE_SIZE
    }

    fn tile_at(&self, world: Vec2) -> Option<TileRef> {
        self.tiles
            .get(&TilePosition::from_world(world, TILE_SIZE))
            .cloned()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Draw {
    Sprite {
        name: String,
        center: Vec2,
        tint: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        thickness: f32,
    },
}

#[derive(Default)]
pub struct RecordingCanvas {
    pub draws: Vec<Draw>,
}

impl Canvas for RecordingCanvas {
    fn draw_sprite(&mut self, sprite: &SpriteHandle, center: Vec2, tint: Color) {
        self.draws.push(Draw::Sprite {
            name: sprite.name().to_owned(),
            center,
            tint,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32) {
        self.draws.push(Draw::Circle {
            center,
            radius,
            color,
            thickness,
        });
    }
}

pub struct Harness {
    pub manager: PlacementManager,
    pub sent: SentLog,
    pub interface: Rc<RefCell<InterfaceLog>>,
    pub cancellations: Rc<Cell<u32>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(PlacementConfig::default(), Some(Vec2::new(48.0, 48.0)), Vec::new())
    }

    pub fn build(config: PlacementConfig, actor: Option<Vec2>, blockers: Vec<WorldRect>) -> Self {
        let sent = SentLog::default();
        let interface = Rc::new(RefCell::new(InterfaceLog::default()));
        let collaborators = Collaborators {
            resources: Box::new(Sprites::standard()),
            templates: Box::new(Templates::standard()),
            tiles: Box::new(Tiles),
            collision: Box::new(Blockers(blockers)),
            player: Box::new(Actor(actor)),
            interface: Box::new(Interface(Rc::clone(&interface))),
            transport: Box::new(RecordingTransport(Rc::clone(&sent))),
        };
        let mut manager =
            PlacementManager::new(ModeRegistry::with_builtin_modes(), config, collaborators);

        let cancellations = Rc::new(Cell::new(0));
        let counter = Rc::clone(&cancellations);
        manager.on_placement_cancelled(move || counter.set(counter.get() + 1));

        Self {
            manager,
            sent,
            interface,
            cancellations,
        }
    }

    pub fn grant(&mut self, permission: &PlacementPermission) {
        let mut message = OutgoingMessage::new();
        write_start_placement(&mut message, permission, &Tiles).expect("grant encodes");
        self.manager
            .handle_net_message(&mut IncomingMessage::from(message))
            .expect("grant decodes");
    }

    pub fn server_cancel(&mut self) {
        let mut message = OutgoingMessage::new();
        write_cancel_placement(&mut message);
        self.manager
            .handle_net_message(&mut IncomingMessage::from(message))
            .expect("cancel decodes");
    }

    pub fn server_reject(&mut self) {
        let mut message = OutgoingMessage::new();
        write_placement_failed(&mut message);
        self.manager
            .handle_net_message(&mut IncomingMessage::from(message))
            .expect("failure notice decodes");
    }

    pub fn hover(&mut self, world: Vec2) {
        let map = GridMap::station();
        let screen = world - self.manager.screen_origin();
        self.manager.update(screen, Some(&map));
    }

    pub fn sent_messages(&self) -> Vec<OutboundPlacement> {
        self.sent
            .borrow()
            .iter()
            .map(|(bytes, _)| {
                decode_outbound(&mut IncomingMessage::new(bytes.clone()), &Tiles)
                    .expect("outbound message decodes")
            })
            .collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }
}

pub fn crate_grant() -> PlacementPermission {
    PlacementPermission::entity(0, "crate_wood", "AlignFree")
}

//! Scripted placement sessions replayed against in-memory collaborators.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use glam::Vec2;
use placement_core::{
    Canvas, CollisionQuery, Color, EntityId, EntityTemplate, InterfaceHooks, MapView,
    PlacementPermission, PlayerView, ResourceProvider, SpriteHandle, TemplateDatabase,
    TileCatalog, TilePosition, TileRef, WorldRect,
};
use placement_protocol::{
    decode_outbound, write_cancel_placement, write_placement_failed, write_start_placement,
    DeliveryMethod, IncomingMessage, OutboundPlacement, OutgoingMessage, Transport,
};
use placement_system_modes::ModeRegistry;
use placement_system_session::{Collaborators, PlacementConfig, PlacementManager};
use serde::Deserialize;
use tracing::{event, Level};

/// Size reported for sprites the scenario does not declare.
const PLACEHOLDER_SPRITE_SIZE: f32 = 32.0;

/// Complete scenario file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default)]
    config: PlacementConfig,
    map: MapLayout,
    #[serde(default)]
    tiles: HashMap<String, u8>,
    #[serde(default)]
    actor: Option<[f32; 2]>,
    #[serde(default)]
    sprites: Vec<SpriteEntry>,
    #[serde(default)]
    templates: Vec<EntityTemplate>,
    #[serde(default)]
    blockers: Vec<BlockerEntry>,
    steps: Vec<Step>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapLayout {
    tile_size: f32,
    /// `#` is a wall, `.` is floor, anything else is empty space.
    rows: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpriteEntry {
    name: String,
    size: [f32; 2],
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BlockerEntry {
    origin: [f32; 2],
    size: [f32; 2],
}

/// Single scripted event. Server events travel through the wire codec.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Step {
    Grant {
        #[serde(default)]
        range: u16,
        #[serde(default)]
        tile: Option<String>,
        #[serde(default)]
        entity: Option<String>,
        mode: String,
    },
    Cancel,
    Fail,
    Pan {
        origin: [f32; 2],
    },
    Hover {
        world: [f32; 2],
    },
    Commit,
    Rotate,
    ToggleEraser,
    Delete {
        entity: u32,
    },
    Render,
}

impl Scenario {
    /// Parses a scenario from TOML.
    pub(crate) fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("could not parse scenario")
    }

    /// Runs every step and returns the replay transcript.
    pub(crate) fn replay(&self) -> Result<Vec<String>> {
        let tiles = ScenarioTiles::new(&self.tiles)?;
        let map = GridMap::new(&self.map);
        let sent = SentLog::default();
        let collaborators = Collaborators {
            resources: Box::new(SpriteBook::new(&self.sprites)),
            templates: Box::new(TemplateBook::new(&self.templates)),
            tiles: Box::new(tiles.clone()),
            collision: Box::new(Blockers::new(&self.blockers)),
            player: Box::new(Actor(self.actor.map(Vec2::from))),
            interface: Box::new(HeadlessInterface),
            transport: Box::new(RecordingTransport(Rc::clone(&sent))),
        };
        let mut manager = PlacementManager::new(
            ModeRegistry::with_builtin_modes(),
            self.config.clone(),
            collaborators,
        );

        let cancellations = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&cancellations);
        manager.on_placement_cancelled(move || counter.set(counter.get() + 1));

        let mut transcript = Vec::new();
        let mut reported = 0;
        for (index, step) in self.steps.iter().enumerate() {
            let cancelled_before = cancellations.get();
            step.apply(&mut manager, &map, &tiles, &mut transcript)
                .with_context(|| format!("step {} ({step:?}) failed", index + 1))?;

            if cancellations.get() != cancelled_before {
                transcript.push("event placement-cancelled".to_owned());
            }

            let log = sent.borrow();
            for (bytes, delivery) in &log[reported..] {
                transcript.push(describe_outbound(bytes, *delivery, &tiles)?);
            }
            reported = log.len();

            event!(
                Level::INFO,
                step = index + 1,
                state = ?manager.state(),
                valid = manager.session().is_valid_position(),
                "step applied"
            );
        }

        Ok(transcript)
    }
}

impl Step {
    fn apply(
        &self,
        manager: &mut PlacementManager,
        map: &GridMap,
        tiles: &ScenarioTiles,
        transcript: &mut Vec<String>,
    ) -> Result<()> {
        match self {
            Step::Grant {
                range,
                tile,
                entity,
                mode,
            } => {
                let permission = match (tile, entity) {
                    (Some(tile), None) => PlacementPermission::tile(*range, tile, mode),
                    (None, Some(entity)) => PlacementPermission::entity(*range, entity, mode),
                    _ => bail!("grant needs exactly one of `tile` or `entity`"),
                };
                let mut message = OutgoingMessage::new();
                write_start_placement(&mut message, &permission, tiles)?;
                manager.handle_net_message(&mut IncomingMessage::from(message))?;
            }
            Step::Cancel => {
                let mut message = OutgoingMessage::new();
                write_cancel_placement(&mut message);
                manager.handle_net_message(&mut IncomingMessage::from(message))?;
            }
            Step::Fail => {
                let mut message = OutgoingMessage::new();
                write_placement_failed(&mut message);
                manager.handle_net_message(&mut IncomingMessage::from(message))?;
            }
            Step::Pan { origin } => manager.set_screen_origin(Vec2::from(*origin)),
            Step::Hover { world } => {
                let screen = Vec2::from(*world) - manager.screen_origin();
                manager.update(screen, Some(map));
            }
            Step::Commit => manager.handle_placement(),
            Step::Rotate => manager.rotate(),
            Step::ToggleEraser => manager.toggle_eraser(),
            Step::Delete { entity } => manager.handle_deletion(EntityId::new(*entity)),
            Step::Render => {
                let mut canvas = TranscriptCanvas(transcript);
                manager.render(&mut canvas);
            }
        }
        Ok(())
    }
}

fn describe_outbound(
    bytes: &[u8],
    delivery: DeliveryMethod,
    tiles: &ScenarioTiles,
) -> Result<String> {
    let payload = STANDARD_NO_PAD.encode(bytes);
    let decoded = decode_outbound(&mut IncomingMessage::new(bytes), tiles)
        .context("outbound message does not decode")?;
    let line = match decoded {
        OutboundPlacement::Placement(request) => format!(
            "send placement {delivery:?} {payload} target={:?} at=({}, {}) tile=({}, {}) facing={}",
            request.target,
            request.mouse_world.x,
            request.mouse_world.y,
            request.tile.x(),
            request.tile.y(),
            request.direction.name(),
        ),
        OutboundPlacement::Deletion(entity) => {
            format!("send deletion {delivery:?} {payload} entity={}", entity.get())
        }
    };
    Ok(line)
}

type SentLog = Rc<RefCell<Vec<(Vec<u8>, DeliveryMethod)>>>;

struct RecordingTransport(SentLog);

impl Transport for RecordingTransport {
    fn send(&mut self, message: OutgoingMessage, delivery: DeliveryMethod) {
        self.0.borrow_mut().push((message.into_bytes(), delivery));
    }
}

struct TranscriptCanvas<'a>(&'a mut Vec<String>);

impl Canvas for TranscriptCanvas<'_> {
    fn draw_sprite(&mut self, sprite: &SpriteHandle, center: Vec2, tint: Color) {
        self.0.push(format!(
            "draw sprite {} at ({}, {}) tint=({:.2}, {:.2}, {:.2}, {:.2})",
            sprite.name(),
            center.x,
            center.y,
            tint.red,
            tint.green,
            tint.blue,
            tint.alpha,
        ));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, _color: Color, _thickness: f32) {
        self.0.push(format!(
            "draw circle at ({}, {}) radius={radius}",
            center.x, center.y
        ));
    }
}

#[derive(Clone)]
struct ScenarioTiles {
    by_name: HashMap<String, u8>,
    by_id: HashMap<u8, String>,
}

impl ScenarioTiles {
    fn new(tiles: &HashMap<String, u8>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(tiles.len());
        for (name, id) in tiles {
            if let Some(existing) = by_id.insert(*id, name.clone()) {
                let (first, second) = if existing < *name {
                    (existing.as_str(), name.as_str())
                } else {
                    (name.as_str(), existing.as_str())
                };
                bail!("tile id {id} is assigned to both `{first}` and `{second}`");
            }
        }

        Ok(Self {
            by_name: tiles.clone(),
            by_id,
        })
    }
}

impl TileCatalog for ScenarioTiles {
    fn tile_name(&self, id: u8) -> Option<String> {
        self.by_id.get(&id).cloned()
    }

    fn tile_index(&self, name: &str) -> Option<u8> {
        self.by_name.get(name).copied()
    }
}

struct GridMap {
    tile_size: f32,
    tiles: HashMap<TilePosition, TileRef>,
}

impl GridMap {
    fn new(layout: &MapLayout) -> Self {
        let mut tiles = HashMap::new();
        for (y, row) in layout.rows.iter().enumerate() {
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
        Self {
            tile_size: layout.tile_size,
            tiles,
        }
    }
}

impl MapView for GridMap {
    fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn tile_at(&self, world: Vec2) -> Option<TileRef> {
        self.tiles
            .get(&TilePosition::from_world(world, self.tile_size))
            .cloned()
    }
}

struct SpriteBook(HashMap<String, Vec2>);

impl SpriteBook {
    fn new(sprites: &[SpriteEntry]) -> Self {
        Self(
            sprites
                .iter()
                .map(|sprite| (sprite.name.clone(), Vec2::from(sprite.size)))
                .collect(),
        )
    }
}

impl ResourceProvider for SpriteBook {
    fn sprite(&self, name: &str) -> SpriteHandle {
        let size = self
            .0
            .get(name)
            .copied()
            .unwrap_or(Vec2::splat(PLACEHOLDER_SPRITE_SIZE));
        SpriteHandle::new(name, size)
    }

    fn sprite_exists(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

struct TemplateBook(HashMap<String, EntityTemplate>);

impl TemplateBook {
    fn new(templates: &[EntityTemplate]) -> Self {
        Self(
            templates
                .iter()
                .map(|template| (template.name.clone(), template.clone()))
                .collect(),
        )
    }
}

impl TemplateDatabase for TemplateBook {
    fn template(&self, name: &str) -> Option<EntityTemplate> {
        self.0.get(name).cloned()
    }
}

struct Blockers(Vec<WorldRect>);

impl Blockers {
    fn new(entries: &[BlockerEntry]) -> Self {
        Self(
            entries
                .iter()
                .map(|entry| {
                    WorldRect::from_origin_size(Vec2::from(entry.origin), Vec2::from(entry.size))
                })
                .collect(),
        )
    }
}

impl CollisionQuery for Blockers {
    fn is_colliding(&self, area: WorldRect) -> bool {
        self.0.iter().any(|blocker| blocker.intersects(&area))
    }
}

struct Actor(Option<Vec2>);

impl PlayerView for Actor {
    fn controlled_position(&self) -> Option<Vec2> {
        self.0
    }
}

struct HeadlessInterface;

impl InterfaceHooks for HeadlessInterface {
    fn cancel_targeting(&mut self) {
        event!(Level::DEBUG, "targeting cancelled");
    }

    fn reset_drag(&mut self) {
        event!(Level::DEBUG, "drag reset");
    }
}

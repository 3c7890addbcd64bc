#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the placement subsystem.
//!
//! This crate defines the value types exchanged between the wire protocol,
//! the placement mode strategies, and the session state machine, together
//! with the narrow collaborator interfaces the subsystem consumes. Rendering
//! backends, map storage, collision queries, and the entity template database
//! live outside the subsystem and are reached exclusively through the traits
//! declared here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sprite looked up whenever a tile permission is granted.
pub const DEFAULT_TILE_OVERLAY_SPRITE: &str = "tilebuildoverlay";

/// Facing applied to the object being placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Facing toward decreasing world y.
    North,
    /// Facing toward increasing world x.
    East,
    /// Facing toward increasing world y.
    #[default]
    South,
    /// Facing toward decreasing world x.
    West,
}

impl Direction {
    /// Every direction in rotation order.
    pub const ALL: [Direction; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Returns the next direction in the North→East→South→West cycle.
    #[must_use]
    pub const fn rotated(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Human readable name of the direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::East => "East",
            Self::South => "South",
            Self::West => "West",
        }
    }

    /// Wire representation of the direction.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Parses a direction from its wire representation.
    #[must_use]
    pub const fn from_byte(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::North),
            1 => Some(Self::East),
            2 => Some(Self::South),
            3 => Some(Self::West),
            _ => None,
        }
    }
}

/// Unique identifier assigned to an entity by the authoritative server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a map tile expressed in whole tile units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TilePosition {
    x: i32,
    y: i32,
}

impl TilePosition {
    /// Creates a new tile position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Resolves the tile containing the provided world point.
    ///
    /// A non-positive `tile_size` maps every point onto the origin tile.
    #[must_use]
    pub fn from_world(world: Vec2, tile_size: f32) -> Self {
        if tile_size <= f32::EPSILON {
            return Self::default();
        }

        Self {
            x: (world.x / tile_size).floor() as i32,
            y: (world.y / tile_size).floor() as i32,
        }
    }

    /// Column of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// World-space point of the tile's upper-left corner.
    #[must_use]
    pub fn world_origin(&self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32) * tile_size
    }

    /// World-space point at the centre of the tile.
    #[must_use]
    pub fn world_center(&self, tile_size: f32) -> Vec2 {
        self.world_origin(tile_size) + Vec2::splat(tile_size * 0.5)
    }
}

/// Snapshot of a single map tile reported by a [`MapView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRef {
    /// Position of the tile within the map.
    pub position: TilePosition,
    /// Tile type name, e.g. `"floor"` or `"wall"`.
    pub kind: String,
    /// Whether the tile blocks movement (walls and other solid tiles).
    pub dense: bool,
}

/// What a placement permission allows the player to place.
///
/// Tile grants carry a tile type name and entity grants carry an entity
/// template name; exactly one of the two is ever present.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementTarget {
    /// Placement of a map tile of the named type.
    Tile(String),
    /// Placement of an entity built from the named template.
    Entity(String),
}

/// Server-granted right to place one category of object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacementPermission {
    /// Maximum distance from the controlling actor, zero meaning unlimited.
    pub range: u16,
    /// Object category and identifier covered by the grant.
    pub target: PlacementTarget,
    /// Identifier of the placement mode used to position the candidate.
    pub placement_option: String,
}

impl PlacementPermission {
    /// Creates a permission granting tile placement.
    #[must_use]
    pub fn tile(range: u16, tile_type: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            range,
            target: PlacementTarget::Tile(tile_type.into()),
            placement_option: option.into(),
        }
    }

    /// Creates a permission granting entity placement.
    #[must_use]
    pub fn entity(range: u16, entity_type: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            range,
            target: PlacementTarget::Entity(entity_type.into()),
            placement_option: option.into(),
        }
    }

    /// Reports whether the grant covers a tile rather than an entity.
    #[must_use]
    pub const fn is_tile(&self) -> bool {
        matches!(self.target, PlacementTarget::Tile(_))
    }

    /// Tile type name when the grant covers a tile.
    #[must_use]
    pub fn tile_type(&self) -> Option<&str> {
        match &self.target {
            PlacementTarget::Tile(name) => Some(name),
            PlacementTarget::Entity(_) => None,
        }
    }

    /// Entity template name when the grant covers an entity.
    #[must_use]
    pub fn entity_type(&self) -> Option<&str> {
        match &self.target {
            PlacementTarget::Tile(_) => None,
            PlacementTarget::Entity(name) => Some(name),
        }
    }
}

/// Handle to a sprite owned by the resource provider.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteHandle {
    name: String,
    size: Vec2,
}

impl SpriteHandle {
    /// Creates a new sprite handle.
    #[must_use]
    pub fn new(name: impl Into<String>, size: Vec2) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Name the sprite was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the sprite in world units.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }
}

/// Entity template resolved from the template database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTemplate {
    /// Template name as referenced by placement permissions.
    pub name: String,
    /// Sprite parameters declared by the template, in declaration order.
    #[serde(default)]
    pub sprite_parameters: Vec<String>,
}

impl EntityTemplate {
    /// Creates a new template descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, sprite_parameters: Vec<String>) -> Self {
        Self {
            name: name.into(),
            sprite_parameters,
        }
    }

    /// Value of the first declared sprite parameter, if any.
    ///
    /// Empty values count as missing.
    #[must_use]
    pub fn first_sprite_parameter(&self) -> Option<&str> {
        self.sprite_parameters
            .first()
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// RGBA color used when drawing previews.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldRect {
    min: Vec2,
    max: Vec2,
}

impl WorldRect {
    /// Builds a rectangle centred on `center` with the provided size.
    #[must_use]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Builds a rectangle anchored at its upper-left corner.
    #[must_use]
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::from_center_size(origin + size * 0.5, size)
    }

    /// Upper-left corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Lower-right corner.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Reports whether the two rectangles overlap with non-zero area.
    #[must_use]
    pub fn intersects(&self, other: &WorldRect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Sprite lookup service.
pub trait ResourceProvider {
    /// Returns the sprite registered under `name`.
    ///
    /// Providers substitute their own placeholder when the name is unknown.
    fn sprite(&self, name: &str) -> SpriteHandle;

    /// Reports whether a sprite is registered under `name`.
    fn sprite_exists(&self, name: &str) -> bool;
}

/// Bidirectional mapping between tile type names and their wire ids.
pub trait TileCatalog {
    /// Tile type name registered under the wire id.
    fn tile_name(&self, id: u8) -> Option<String>;

    /// Wire id registered for the tile type name.
    fn tile_index(&self, name: &str) -> Option<u8>;
}

/// Read access to the currently loaded map.
pub trait MapView {
    /// Side length of a square tile in world units.
    fn tile_size(&self) -> f32;

    /// Tile covering the world point, if the map has one there.
    fn tile_at(&self, world: Vec2) -> Option<TileRef>;
}

/// Collision query service.
pub trait CollisionQuery {
    /// Reports whether anything collidable overlaps the rectangle.
    fn is_colliding(&self, area: WorldRect) -> bool;
}

/// Entity template database.
pub trait TemplateDatabase {
    /// Template registered under `name`.
    fn template(&self, name: &str) -> Option<EntityTemplate>;
}

/// Access to the locally controlled actor.
pub trait PlayerView {
    /// World position of the controlled actor, if one exists.
    fn controlled_position(&self) -> Option<Vec2>;
}

/// User interface state that placement must reset when it starts.
pub trait InterfaceHooks {
    /// Abandons any in-progress targeting interaction.
    fn cancel_targeting(&mut self);

    /// Drops whatever the cursor is currently dragging.
    fn reset_drag(&mut self);
}

/// Drawing surface used for previews. Coordinates are in screen space.
pub trait Canvas {
    /// Draws a sprite centred on `center`.
    fn draw_sprite(&mut self, sprite: &SpriteHandle, center: Vec2, tint: Color);

    /// Draws a circle outline.
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32);
}

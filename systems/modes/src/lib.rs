#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement mode strategies and the registry that resolves them by name.
//!
//! A strategy turns the pointer position into a candidate world position and
//! a validity verdict once per frame, and draws the preview at that
//! candidate. Strategies never reach collaborators on their own: everything
//! they may consult is handed to them through [`ModeContext`].

use glam::Vec2;
use placement_core::{
    Canvas, Color, CollisionQuery, MapView, SpriteHandle, TilePosition, WorldRect,
};

mod free;
mod registry;
mod snapgrid;
mod tile;
mod wall;

pub use free::{AlignFree, AlignNone};
pub use registry::{ModeFactory, ModeRegistry};
pub use snapgrid::{AlignSnapgridBorder, AlignSnapgridCenter};
pub use tile::{TileMode, TileRule};
pub use wall::AlignWall;

/// Per-frame inputs a strategy may consult while updating.
#[derive(Clone, Copy)]
pub struct ModeContext<'a> {
    /// World position of the screen's upper-left corner.
    pub screen_origin: Vec2,
    /// World position of the controlled actor, if any.
    pub actor_position: Option<Vec2>,
    /// Placement range granted by the server, zero meaning unlimited.
    pub range: u16,
    /// Footprint of the object being placed in world units.
    pub footprint: Vec2,
    /// Collision query service.
    pub collision: &'a dyn CollisionQuery,
}

impl ModeContext<'_> {
    /// Converts a screen-space point into world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.screen_origin
    }

    /// Reports whether `point` lies within the granted range of the actor.
    ///
    /// An unlimited range accepts every point; a limited range with no
    /// controlled actor accepts none.
    #[must_use]
    pub fn in_range(&self, point: Vec2) -> bool {
        if self.range == 0 {
            return true;
        }

        self.actor_position
            .is_some_and(|actor| actor.distance(point) <= f32::from(self.range))
    }

    /// Reports whether the footprint centred on `center` is free of collisions.
    #[must_use]
    pub fn footprint_clear(&self, center: Vec2) -> bool {
        !self
            .collision
            .is_colliding(WorldRect::from_center_size(center, self.footprint))
    }
}

/// Per-draw inputs for rendering a preview.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderContext {
    /// Sprite to draw, already resolved for the current facing.
    pub sprite: Option<SpriteHandle>,
    /// World position of the screen's upper-left corner.
    pub screen_origin: Vec2,
    /// Validity reported by the last update.
    pub valid: bool,
    /// Tint applied to valid previews.
    pub valid_tint: Color,
    /// Tint applied to invalid previews.
    pub invalid_tint: Color,
}

impl RenderContext {
    fn tint(&self) -> Color {
        if self.valid {
            self.valid_tint
        } else {
            self.invalid_tint
        }
    }
}

/// Pluggable algorithm positioning a placement candidate.
pub trait PlacementMode {
    /// Identifier the strategy is registered under.
    fn name(&self) -> &'static str;

    /// Recomputes the candidate for the pointer position and reports whether
    /// it is a legal placement.
    fn update(&mut self, mouse_screen: Vec2, map: &dyn MapView, context: &ModeContext<'_>) -> bool;

    /// Draws the preview at the cached candidate.
    fn render(&self, context: &RenderContext, canvas: &mut dyn Canvas);

    /// Candidate world position computed by the last update.
    fn mouse_world(&self) -> Vec2;

    /// Tile containing the candidate computed by the last update.
    fn current_tile(&self) -> TilePosition;
}

/// Cached output of a strategy update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Candidate {
    mouse_world: Vec2,
    tile: TilePosition,
    preview_center: Vec2,
}

impl Candidate {
    fn draw(&self, context: &RenderContext, canvas: &mut dyn Canvas) {
        if let Some(sprite) = &context.sprite {
            canvas.draw_sprite(
                sprite,
                self.preview_center - context.screen_origin,
                context.tint(),
            );
        }
    }
}

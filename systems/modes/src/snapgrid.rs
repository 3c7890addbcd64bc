use glam::Vec2;
use placement_core::{Canvas, MapView, TilePosition};

use crate::{Candidate, ModeContext, PlacementMode, RenderContext};

/// Snaps the object to the centre of the hovered tile.
///
/// Dense tiles are rejected along with colliding footprints and candidates
/// outside the granted range.
#[derive(Clone, Debug, Default)]
pub struct AlignSnapgridCenter {
    candidate: Candidate,
}

impl AlignSnapgridCenter {
    /// Registry identifier.
    pub const NAME: &'static str = "AlignSnapgridCenter";
}

impl PlacementMode for AlignSnapgridCenter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, mouse_screen: Vec2, map: &dyn MapView, context: &ModeContext<'_>) -> bool {
        let world = context.screen_to_world(mouse_screen);
        let tile_size = map.tile_size();
        let tile = TilePosition::from_world(world, tile_size);
        let center = tile.world_center(tile_size);
        self.candidate = Candidate {
            mouse_world: center,
            tile,
            preview_center: center,
        };

        map.tile_at(world).is_some_and(|hovered| !hovered.dense)
            && context.footprint_clear(center)
            && context.in_range(center)
    }

    fn render(&self, context: &RenderContext, canvas: &mut dyn Canvas) {
        self.candidate.draw(context, canvas);
    }

    fn mouse_world(&self) -> Vec2 {
        self.candidate.mouse_world
    }

    fn current_tile(&self) -> TilePosition {
        self.candidate.tile
    }
}

/// Snaps the object to the tile corner nearest the pointer.
#[derive(Clone, Debug, Default)]
pub struct AlignSnapgridBorder {
    candidate: Candidate,
}

impl AlignSnapgridBorder {
    /// Registry identifier.
    pub const NAME: &'static str = "AlignSnapgridBorder";
}

impl PlacementMode for AlignSnapgridBorder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, mouse_screen: Vec2, map: &dyn MapView, context: &ModeContext<'_>) -> bool {
        let world = context.screen_to_world(mouse_screen);
        let tile_size = map.tile_size();
        let corner = if tile_size <= f32::EPSILON {
            world
        } else {
            (world / tile_size).round() * tile_size
        };
        self.candidate = Candidate {
            mouse_world: corner,
            tile: TilePosition::from_world(world, tile_size),
            preview_center: corner,
        };

        map.tile_at(world).is_some() && context.footprint_clear(corner) && context.in_range(corner)
    }

    fn render(&self, context: &RenderContext, canvas: &mut dyn Canvas) {
        self.candidate.draw(context, canvas);
    }

    fn mouse_world(&self) -> Vec2 {
        self.candidate.mouse_world
    }

    fn current_tile(&self) -> TilePosition {
        self.candidate.tile
    }
}

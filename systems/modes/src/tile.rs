use glam::Vec2;
use placement_core::{Canvas, MapView, TilePosition, TileRef, WorldRect};

use crate::{Candidate, ModeContext, PlacementMode, RenderContext};

/// Which hovered tiles a [`TileMode`] accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileRule {
    /// Any existing tile.
    Any,
    /// Non-dense tiles with nothing standing on them.
    Empty,
    /// Dense tiles only.
    Dense,
    /// Non-dense tiles only.
    NonDense,
}

impl TileRule {
    /// Registry identifier of the mode enforcing this rule.
    #[must_use]
    pub const fn mode_name(self) -> &'static str {
        match self {
            Self::Any => "AlignTileAny",
            Self::Empty => "AlignTileEmpty",
            Self::Dense => "AlignTileDense",
            Self::NonDense => "AlignTileNonDense",
        }
    }

    fn accepts(self, tile: &TileRef, context: &ModeContext<'_>, tile_size: f32) -> bool {
        match self {
            Self::Any => true,
            Self::Dense => tile.dense,
            Self::NonDense => !tile.dense,
            Self::Empty => {
                let area = WorldRect::from_origin_size(
                    tile.position.world_origin(tile_size),
                    Vec2::splat(tile_size),
                );
                !tile.dense && !context.collision.is_colliding(area)
            }
        }
    }
}

/// Aligns the candidate to the origin of the hovered tile.
#[derive(Clone, Debug)]
pub struct TileMode {
    rule: TileRule,
    candidate: Candidate,
}

impl TileMode {
    /// Creates a tile-aligned mode enforcing `rule`.
    #[must_use]
    pub fn new(rule: TileRule) -> Self {
        Self {
            rule,
            candidate: Candidate::default(),
        }
    }
}

impl PlacementMode for TileMode {
    fn name(&self) -> &'static str {
        self.rule.mode_name()
    }

    fn update(&mut self, mouse_screen: Vec2, map: &dyn MapView, context: &ModeContext<'_>) -> bool {
        let world = context.screen_to_world(mouse_screen);
        let tile_size = map.tile_size();
        let tile = TilePosition::from_world(world, tile_size);
        self.candidate = Candidate {
            mouse_world: tile.world_origin(tile_size),
            tile,
            preview_center: tile.world_center(tile_size),
        };

        let Some(hovered) = map.tile_at(world) else {
            return false;
        };

        self.rule.accepts(&hovered, context, tile_size)
            && context.in_range(self.candidate.preview_center)
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

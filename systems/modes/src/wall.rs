use glam::Vec2;
use placement_core::{Canvas, MapView, TilePosition};

use crate::{Candidate, ModeContext, PlacementMode, RenderContext};

/// Mounts the object on the wall tile under the pointer.
#[derive(Clone, Debug, Default)]
pub struct AlignWall {
    candidate: Candidate,
}

impl AlignWall {
    /// Registry identifier.
    pub const NAME: &'static str = "AlignWall";
}

impl PlacementMode for AlignWall {
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

        map.tile_at(world).is_some_and(|hovered| hovered.dense) && context.in_range(center)
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

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::AlignWall;
    use crate::test_support::{context, Blockers, GridMap};
    use crate::PlacementMode;

    #[test]
    fn only_wall_tiles_are_valid() {
        let map = GridMap::parse(&["#."]);
        let blockers = Blockers(Vec::new());
        let mut mode = AlignWall::default();

        assert!(mode.update(Vec2::new(3.0, 3.0), &map, &context(&blockers)));
        assert_eq!(mode.mouse_world(), Vec2::new(16.0, 16.0));
        assert!(!mode.update(Vec2::new(35.0, 3.0), &map, &context(&blockers)));
    }

    #[test]
    fn walls_out_of_range_are_rejected() {
        let map = GridMap::parse(&["#######"]);
        let blockers = Blockers(Vec::new());
        let mut context = context(&blockers);
        context.range = 48;
        context.actor_position = Some(Vec2::new(16.0, 16.0));
        let mut mode = AlignWall::default();

        assert!(mode.update(Vec2::new(40.0, 3.0), &map, &context));
        assert!(!mode.update(Vec2::new(200.0, 3.0), &map, &context));
    }
}

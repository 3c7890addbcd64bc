use glam::Vec2;
use placement_core::{Canvas, MapView, TilePosition};

use crate::{Candidate, ModeContext, PlacementMode, RenderContext};

/// Places the object exactly under the pointer.
///
/// The candidate must sit over a map tile, keep its footprint clear of
/// collisions and stay within range.
#[derive(Clone, Debug, Default)]
pub struct AlignNone {
    candidate: Candidate,
}

impl AlignNone {
    /// Registry identifier.
    pub const NAME: &'static str = "AlignNone";
}

impl PlacementMode for AlignNone {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, mouse_screen: Vec2, map: &dyn MapView, context: &ModeContext<'_>) -> bool {
        let world = context.screen_to_world(mouse_screen);
        self.candidate = Candidate {
            mouse_world: world,
            tile: TilePosition::from_world(world, map.tile_size()),
            preview_center: world,
        };

        map.tile_at(world).is_some() && context.footprint_clear(world) && context.in_range(world)
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

/// Places the object under the pointer anywhere within range.
#[derive(Clone, Debug, Default)]
pub struct AlignFree {
    candidate: Candidate,
}

impl AlignFree {
    /// Registry identifier.
    pub const NAME: &'static str = "AlignFree";
}

impl PlacementMode for AlignFree {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(&mut self, mouse_screen: Vec2, map: &dyn MapView, context: &ModeContext<'_>) -> bool {
        let world = context.screen_to_world(mouse_screen);
        self.candidate = Candidate {
            mouse_world: world,
            tile: TilePosition::from_world(world, map.tile_size()),
            preview_center: world,
        };

        context.in_range(world)
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
    use placement_core::{TilePosition, WorldRect};

    use super::{AlignFree, AlignNone};
    use crate::test_support::{context, Blockers, GridMap};
    use crate::PlacementMode;

    #[test]
    fn align_none_requires_a_tile_under_the_pointer() {
        let map = GridMap::parse(&["..", "  "]);
        let blockers = Blockers(Vec::new());
        let mut mode = AlignNone::default();

        assert!(mode.update(Vec2::new(40.0, 10.0), &map, &context(&blockers)));
        assert_eq!(mode.mouse_world(), Vec2::new(40.0, 10.0));
        assert_eq!(mode.current_tile(), TilePosition::new(1, 0));

        assert!(!mode.update(Vec2::new(40.0, 40.0), &map, &context(&blockers)));
        assert_eq!(mode.current_tile(), TilePosition::new(1, 1));
    }

    #[test]
    fn align_none_rejects_colliding_footprint() {
        let map = GridMap::parse(&["...."]);
        let blockers = Blockers(vec![WorldRect::from_origin_size(
            Vec2::new(64.0, 0.0),
            Vec2::splat(32.0),
        )]);
        let mut mode = AlignNone::default();

        assert!(!mode.update(Vec2::new(60.0, 16.0), &map, &context(&blockers)));
        assert!(mode.update(Vec2::new(16.0, 16.0), &map, &context(&blockers)));
    }

    #[test]
    fn align_none_translates_screen_to_world() {
        let map = GridMap::parse(&["....", "...."]);
        let blockers = Blockers(Vec::new());
        let mut context = context(&blockers);
        context.screen_origin = Vec2::new(32.0, 32.0);
        let mut mode = AlignNone::default();

        assert!(mode.update(Vec2::new(8.0, 8.0), &map, &context));
        assert_eq!(mode.mouse_world(), Vec2::new(40.0, 40.0));
        assert_eq!(mode.current_tile(), TilePosition::new(1, 1));
    }

    #[test]
    fn align_free_ignores_map_and_collisions() {
        let map = GridMap::parse(&[]);
        let blockers = Blockers(vec![WorldRect::from_center_size(
            Vec2::splat(100.0),
            Vec2::splat(500.0),
        )]);
        let mut mode = AlignFree::default();

        assert!(mode.update(Vec2::splat(100.0), &map, &context(&blockers)));
        assert_eq!(mode.current_tile(), TilePosition::new(3, 3));
    }

    #[test]
    fn align_free_honours_range() {
        let map = GridMap::parse(&[]);
        let blockers = Blockers(Vec::new());
        let mut context = context(&blockers);
        context.range = 10;
        context.actor_position = Some(Vec2::ZERO);
        let mut mode = AlignFree::default();

        assert!(mode.update(Vec2::new(6.0, 8.0), &map, &context));
        assert!(!mode.update(Vec2::new(9.0, 8.0), &map, &context));
    }
}

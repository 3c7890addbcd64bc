use glam::Vec2;
use placement_core::{Canvas, MapView, SpriteHandle};
use placement_system_modes::{ModeContext, RenderContext};

use crate::PlacementManager;

impl PlacementManager {
    /// Moves the viewport; `origin` is the world position of the screen's
    /// upper-left corner.
    pub fn set_screen_origin(&mut self, origin: Vec2) {
        self.screen_origin = origin;
    }

    /// World position of the screen's upper-left corner.
    #[must_use]
    pub const fn screen_origin(&self) -> Vec2 {
        self.screen_origin
    }

    /// Runs the active strategy for this frame and records its verdict.
    ///
    /// Does nothing until a map is loaded and a permission with a resolved
    /// strategy is held.
    pub fn update(&mut self, mouse_screen: Vec2, map: Option<&dyn MapView>) {
        let Some(map) = map else {
            return;
        };
        let (Some(permission), Some(mode)) =
            (self.session.permission.as_ref(), self.session.mode.as_mut())
        else {
            return;
        };

        let context = ModeContext {
            screen_origin: self.screen_origin,
            actor_position: self.collaborators.player.controlled_position(),
            range: permission.range,
            footprint: self
                .session
                .base_sprite
                .as_ref()
                .map_or(Vec2::ZERO, SpriteHandle::size),
            collision: self.collaborators.collision.as_ref(),
        };
        self.session.is_valid_position = mode.update(mouse_screen, map, &context);
    }

    /// Draws the preview and, for limited permissions, the range indicator
    /// around the controlled actor.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        if let Some(mode) = self.session.mode.as_deref() {
            let context = RenderContext {
                sprite: self.directional_sprite(),
                screen_origin: self.screen_origin,
                valid: self.session.is_valid_position,
                valid_tint: self.config.valid_tint,
                invalid_tint: self.config.invalid_tint,
            };
            mode.render(&context, canvas);
        }

        let Some(permission) = self.session.permission.as_ref() else {
            return;
        };
        if permission.range == 0 {
            return;
        }
        if let Some(actor) = self.collaborators.player.controlled_position() {
            canvas.draw_circle(
                actor - self.screen_origin,
                f32::from(permission.range),
                self.config.range_ring_color,
                self.config.range_ring_thickness,
            );
        }
    }

    /// Sprite for the current facing, falling back to the base sprite.
    ///
    /// Resolved on every call so rotation takes effect on the next draw.
    #[must_use]
    pub fn directional_sprite(&self) -> Option<SpriteHandle> {
        let base = self.session.base_sprite.as_ref()?;
        let resources = &self.collaborators.resources;
        let name = format!("{}_{}", base.name(), self.session.direction.name()).to_lowercase();

        if resources.sprite_exists(&name) {
            Some(resources.sprite(&name))
        } else {
            Some(base.clone())
        }
    }
}

use glam::Vec2;
use placement_core::{
    CollisionQuery, Direction, EntityId, EntityTemplate, InterfaceHooks, PlacementPermission,
    PlacementTarget, PlayerView, ResourceProvider, SpriteHandle, TemplateDatabase, TileCatalog,
};
use placement_protocol::{
    decode_inbound, write_entity_deletion, DecodeError, InboundPlacement, IncomingMessage,
    PlacementRequest, Transport,
};
use placement_system_modes::{ModeRegistry, PlacementMode};
use tracing::{event, Level};

use crate::PlacementConfig;

/// External services the manager consumes.
pub struct Collaborators {
    /// Sprite lookup.
    pub resources: Box<dyn ResourceProvider>,
    /// Entity template lookup.
    pub templates: Box<dyn TemplateDatabase>,
    /// Tile name to wire id mapping.
    pub tiles: Box<dyn TileCatalog>,
    /// Collision queries forwarded to the active strategy.
    pub collision: Box<dyn CollisionQuery>,
    /// Position of the controlled actor.
    pub player: Box<dyn PlayerView>,
    /// User interface state reset when placement begins.
    pub interface: Box<dyn InterfaceHooks>,
    /// Outbound connection to the server.
    pub transport: Box<dyn Transport>,
}

/// Lifecycle state derived from the session flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Nothing granted, nothing active.
    Idle,
    /// A permission is granted and its strategy is driving the preview.
    Armed,
    /// The eraser is active.
    EraserArmed,
}

/// Mutable state of the in-progress placement workflow.
#[derive(Default)]
pub struct PlacementSession {
    pub(crate) base_sprite: Option<SpriteHandle>,
    pub(crate) template: Option<EntityTemplate>,
    pub(crate) permission: Option<PlacementPermission>,
    pub(crate) mode: Option<Box<dyn PlacementMode>>,
    pub(crate) direction: Direction,
    pub(crate) is_active: bool,
    pub(crate) is_eraser: bool,
    pub(crate) is_valid_position: bool,
}

impl PlacementSession {
    /// Sprite previewed for the current permission.
    #[must_use]
    pub fn base_sprite(&self) -> Option<&SpriteHandle> {
        self.base_sprite.as_ref()
    }

    /// Template resolved for an entity permission.
    #[must_use]
    pub fn template(&self) -> Option<&EntityTemplate> {
        self.template.as_ref()
    }

    /// Permission currently granted by the server.
    #[must_use]
    pub fn permission(&self) -> Option<&PlacementPermission> {
        self.permission.as_ref()
    }

    /// Strategy positioning the candidate.
    #[must_use]
    pub fn mode(&self) -> Option<&dyn PlacementMode> {
        self.mode.as_deref()
    }

    /// Facing applied to placed objects.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether placement or erasing is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Whether the eraser is active.
    #[must_use]
    pub const fn is_eraser(&self) -> bool {
        self.is_eraser
    }

    /// Validity reported by the last strategy update.
    #[must_use]
    pub const fn is_valid_position(&self) -> bool {
        self.is_valid_position
    }

    /// Lifecycle state derived from the flags.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        match (self.is_active, self.is_eraser) {
            (true, true) => SessionState::EraserArmed,
            (true, false) => SessionState::Armed,
            (false, _) => SessionState::Idle,
        }
    }
}

/// Drives the placement workflow: permission handshake, mode dispatch,
/// per-frame preview updates and outbound requests.
pub struct PlacementManager {
    pub(crate) registry: ModeRegistry,
    pub(crate) config: PlacementConfig,
    pub(crate) collaborators: Collaborators,
    pub(crate) session: PlacementSession,
    pub(crate) screen_origin: Vec2,
    cancel_listeners: Vec<Box<dyn FnMut()>>,
}

impl PlacementManager {
    /// Creates an idle manager.
    #[must_use]
    pub fn new(
        registry: ModeRegistry,
        config: PlacementConfig,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            registry,
            config,
            collaborators,
            session: PlacementSession::default(),
            screen_origin: Vec2::ZERO,
            cancel_listeners: Vec::new(),
        }
    }

    /// Registers a listener invoked whenever an armed placement is cleared.
    pub fn on_placement_cancelled<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static,
    {
        self.cancel_listeners.push(Box::new(listener));
    }

    /// Current session state.
    #[must_use]
    pub fn session(&self) -> &PlacementSession {
        &self.session
    }

    /// Lifecycle state derived from the session flags.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Registry used to resolve placement options.
    #[must_use]
    pub fn registry(&self) -> &ModeRegistry {
        &self.registry
    }

    /// Decodes and applies a message received on the placement channel.
    ///
    /// The message is decoded completely before anything changes, so a
    /// malformed payload leaves the session untouched.
    pub fn handle_net_message(&mut self, message: &mut IncomingMessage) -> Result<(), DecodeError> {
        match decode_inbound(message, self.collaborators.tiles.as_ref())? {
            InboundPlacement::Start(permission) => self.begin_placing(permission),
            InboundPlacement::Cancel => self.clear(),
            InboundPlacement::Failed => {
                event!(target: "placement", Level::DEBUG, "server rejected placement request");
            }
        }
        Ok(())
    }

    /// Returns to idle, notifying listeners if an armed placement ends.
    ///
    /// Facing survives the reset.
    pub fn clear(&mut self) {
        let was_armed = self.session.state() == SessionState::Armed;
        self.session = PlacementSession {
            direction: self.session.direction,
            ..PlacementSession::default()
        };

        if was_armed {
            event!(target: "placement", Level::DEBUG, "placement cancelled");
            for listener in &mut self.cancel_listeners {
                listener();
            }
        }
    }

    /// Starts placing under `permission`.
    ///
    /// Unknown placement options, tile types without a wire id, missing
    /// templates and templates without a sprite parameter leave the session
    /// idle.
    pub fn begin_placing(&mut self, permission: PlacementPermission) {
        self.clear();
        self.collaborators.interface.cancel_targeting();
        self.collaborators.interface.reset_drag();

        let Some(mode) = self.registry.resolve(&permission.placement_option) else {
            event!(
                target: "placement",
                Level::DEBUG,
                option = %permission.placement_option,
                "no placement mode registered for option"
            );
            return;
        };

        let prepared = match &permission.target {
            PlacementTarget::Tile(name) => self.prepare_tile(name).map(|sprite| (sprite, None)),
            PlacementTarget::Entity(name) => self
                .prepare_entity(name)
                .map(|(sprite, template)| (sprite, Some(template))),
        };
        let Some((sprite, template)) = prepared else {
            return;
        };

        event!(
            target: "placement",
            Level::DEBUG,
            mode = mode.name(),
            sprite = sprite.name(),
            "placement armed"
        );
        self.session.base_sprite = Some(sprite);
        self.session.template = template;
        self.session.permission = Some(permission);
        self.session.mode = Some(mode);
        self.session.is_active = true;
    }

    fn prepare_tile(&self, name: &str) -> Option<SpriteHandle> {
        if self.collaborators.tiles.tile_index(name).is_none() {
            event!(target: "placement", Level::DEBUG, tile = name, "tile type has no wire id");
            return None;
        }

        Some(
            self.collaborators
                .resources
                .sprite(&self.config.tile_overlay_sprite),
        )
    }

    fn prepare_entity(&self, name: &str) -> Option<(SpriteHandle, EntityTemplate)> {
        let Some(template) = self.collaborators.templates.template(name) else {
            event!(target: "placement", Level::DEBUG, template = name, "unknown entity template");
            return None;
        };
        let Some(sprite_name) = template.first_sprite_parameter() else {
            event!(target: "placement", Level::DEBUG, template = name, "template declares no sprite");
            return None;
        };

        let sprite = self.collaborators.resources.sprite(sprite_name);
        Some((sprite, template))
    }

    /// Enters the eraser from idle; clears any active session instead.
    pub fn toggle_eraser(&mut self) {
        if self.session.state() == SessionState::Idle {
            self.session.is_active = true;
            self.session.is_eraser = true;
        } else {
            self.clear();
        }
    }

    /// Advances the facing one step clockwise.
    pub fn rotate(&mut self) {
        self.session.direction = self.session.direction.rotated();
    }

    /// Commits the current candidate.
    ///
    /// The session stays armed so the same permission can be used again.
    pub fn handle_placement(&mut self) {
        if self.session.state() == SessionState::Armed {
            self.request_placement();
        }
    }

    /// Asks the server to delete `entity` while the eraser is active.
    pub fn handle_deletion(&mut self, entity: EntityId) {
        if self.session.state() != SessionState::EraserArmed {
            return;
        }

        let transport = &mut self.collaborators.transport;
        let mut message = transport.create_message();
        write_entity_deletion(&mut message, entity);
        event!(target: "placement", Level::TRACE, entity = entity.get(), "sending deletion request");
        transport.send(message, self.config.delivery);
    }

    fn request_placement(&mut self) {
        let Some(request) = self.placement_request() else {
            event!(target: "placement", Level::DEBUG, "dropping placement without a valid candidate");
            return;
        };

        let mut message = self.collaborators.transport.create_message();
        if let Err(error) = request.write(&mut message, self.collaborators.tiles.as_ref()) {
            event!(target: "placement", Level::WARN, %error, "could not encode placement request");
            return;
        }

        event!(
            target: "placement",
            Level::TRACE,
            x = request.mouse_world.x,
            y = request.mouse_world.y,
            "sending placement request"
        );
        self.collaborators
            .transport
            .send(message, self.config.delivery);
    }

    /// Snapshot of the session as it would be sent on commit.
    fn placement_request(&self) -> Option<PlacementRequest> {
        if !self.session.is_valid_position {
            return None;
        }
        let permission = self.session.permission.as_ref()?;
        let mode = self.session.mode.as_deref()?;

        Some(PlacementRequest {
            alignment: self.config.alignment.clone(),
            target: permission.target.clone(),
            mouse_world: mode.mouse_world(),
            direction: self.session.direction,
            tile: mode.current_tile(),
        })
    }
}

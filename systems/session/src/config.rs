use placement_core::{Color, DEFAULT_TILE_OVERLAY_SPRITE};
use placement_protocol::DeliveryMethod;
use serde::Deserialize;
use thiserror::Error;

/// Tunables for the placement subsystem.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConfig {
    /// Literal written into the alignment slot of every placement request.
    ///
    /// `"AlignNone"` tells the server to skip its alignment sanity check.
    pub alignment: String,
    /// Sprite previewed for tile permissions.
    pub tile_overlay_sprite: String,
    /// Color of the range indicator.
    pub range_ring_color: Color,
    /// Line thickness of the range indicator.
    pub range_ring_thickness: f32,
    /// Tint applied to a preview at a valid position.
    pub valid_tint: Color,
    /// Tint applied to a preview at an invalid position.
    pub invalid_tint: Color,
    /// Delivery guarantee for every outbound request.
    pub delivery: DeliveryMethod,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            alignment: "AlignNone".to_owned(),
            tile_overlay_sprite: DEFAULT_TILE_OVERLAY_SPRITE.to_owned(),
            range_ring_color: Color::WHITE,
            range_ring_thickness: 2.0,
            valid_tint: Color::new(0.5, 1.0, 0.5, 0.8),
            invalid_tint: Color::new(1.0, 0.4, 0.4, 0.8),
            delivery: DeliveryMethod::ReliableUnordered,
        }
    }
}

impl PlacementConfig {
    /// Parses a configuration from TOML, filling omitted keys with defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

/// Errors that can occur when loading a [`PlacementConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid placement configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

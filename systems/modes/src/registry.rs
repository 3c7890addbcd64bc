use crate::{
    AlignFree, AlignNone, AlignSnapgridBorder, AlignSnapgridCenter, AlignWall, PlacementMode,
    TileMode, TileRule,
};

/// Constructor for a registered strategy.
pub type ModeFactory = fn() -> Box<dyn PlacementMode>;

const BUILTIN_MODES: [(&str, ModeFactory); 9] = [
    (AlignNone::NAME, boxed::<AlignNone>),
    (AlignFree::NAME, boxed::<AlignFree>),
    (AlignSnapgridCenter::NAME, boxed::<AlignSnapgridCenter>),
    (AlignSnapgridBorder::NAME, boxed::<AlignSnapgridBorder>),
    (AlignWall::NAME, boxed::<AlignWall>),
    (TileRule::Any.mode_name(), tile_any),
    (TileRule::Empty.mode_name(), tile_empty),
    (TileRule::Dense.mode_name(), tile_dense),
    (TileRule::NonDense.mode_name(), tile_non_dense),
];

fn boxed<M>() -> Box<dyn PlacementMode>
where
    M: PlacementMode + Default + 'static,
{
    Box::<M>::default()
}

fn tile_any() -> Box<dyn PlacementMode> {
    Box::new(TileMode::new(TileRule::Any))
}

fn tile_empty() -> Box<dyn PlacementMode> {
    Box::new(TileMode::new(TileRule::Empty))
}

fn tile_dense() -> Box<dyn PlacementMode> {
    Box::new(TileMode::new(TileRule::Dense))
}

fn tile_non_dense() -> Box<dyn PlacementMode> {
    Box::new(TileMode::new(TileRule::NonDense))
}

/// Maps mode identifiers to strategy constructors.
///
/// Lookups are exact and case-sensitive. Registering a name twice is allowed;
/// the earliest registration wins.
#[derive(Clone, Debug, Default)]
pub struct ModeRegistry {
    entries: Vec<(String, ModeFactory)>,
}

impl ModeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in strategy.
    #[must_use]
    pub fn with_builtin_modes() -> Self {
        let mut registry = Self::new();
        for (name, factory) in BUILTIN_MODES {
            registry.register(name, factory);
        }
        registry
    }

    /// Adds a strategy under `name`.
    pub fn register(&mut self, name: impl Into<String>, factory: ModeFactory) {
        self.entries.push((name.into(), factory));
    }

    /// Constructs a fresh instance of the strategy registered under `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Box<dyn PlacementMode>> {
        self.entries
            .iter()
            .find(|(registered, _)| registered == name)
            .map(|(_, factory)| factory())
    }

    /// Reports whether a strategy is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(registered, _)| registered == name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

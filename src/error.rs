//! Error types for location generation.

use crate::locations::LocationType;

/// Result type alias using [`GenerationError`].
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors that can occur while generating a region's locations.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The free surface cannot hold the planned number of locations of a type.
    #[error("placement capacity exceeded for {location_type:?}: placed {placed} of {requested}")]
    CapacityExceeded {
        location_type: LocationType,
        requested: u32,
        placed: u32,
    },

    /// A block template name could not be resolved against the catalog.
    #[error("block template {name} is missing from the catalog")]
    CatalogMiss { name: String },

    /// Every candidate name collided with an existing one.
    #[error("no unique name for {location_type:?} after {attempts} attempts")]
    NameExhausted {
        location_type: LocationType,
        attempts: u32,
    },

    /// Dungeon growth found no free neighbour around any placed block.
    #[error("dungeon diagram stalled at {placed} of {planned} blocks")]
    DiagramDeadlock { planned: usize, placed: usize },

    /// No even id pair is left in the 16-bit location id space.
    #[error("location id space exhausted")]
    IdSpaceExhausted,

    /// Invalid configuration or input tables.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parse errors.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Preview image encoding errors.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        GenerationError::Config(msg.into())
    }

    /// Create a catalog miss for a template name.
    pub fn catalog_miss(name: impl Into<String>) -> Self {
        GenerationError::CatalogMiss { name: name.into() }
    }

    /// Failures confined to a single location instance. Under the
    /// skip-and-report policy these drop the location and the run continues.
    pub fn is_location_local(&self) -> bool {
        matches!(
            self,
            GenerationError::CapacityExceeded { .. }
                | GenerationError::CatalogMiss { .. }
                | GenerationError::NameExhausted { .. }
                | GenerationError::DiagramDeadlock { .. }
        )
    }
}

//! Region location generation library
//!
//! Populates the regions of a world map with settlements, dwellings, temples
//! and dungeons: how many of each, where they go, what they are called, which
//! exterior blocks make them up and how their dungeons are laid out.
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod assembly;
pub mod catalog;
pub mod config;
pub mod context;
pub mod data;
pub mod density;
pub mod dungeon;
pub mod error;
pub mod export;
pub mod locations;
pub mod naming;
pub mod pipeline;
pub mod placement;
pub mod region;
pub mod seeds;
pub mod settlement;
pub mod synthetic;
pub mod tilemap;

pub use error::{GenerationError, Result};
pub use pipeline::{RegionGenerator, RegionRequest};

//! Procedural planet generation library
//!
//! Builds co-registered height, water, temperature, moisture and biome grids
//! from a seed. Start with [`world::Generator`].

pub mod biomes;
pub mod climate;
pub mod erosion;
pub mod error;
pub mod export;
pub mod heightmap;
pub mod noise_source;
pub mod settings;
pub mod tilemap;
pub mod water_bodies;
pub mod world;

pub use error::{Result, WorldGenError};

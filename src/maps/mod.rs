// Módulo de mapas: traits de plataforma + implementación web (Google Maps)

pub mod traits;
pub mod geometry;
pub mod markers;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use traits::*;
pub use geometry::LatLngBounds;
pub use markers::MarkerSpec;

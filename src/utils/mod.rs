// Utils compartidos

pub mod constants;
pub mod google_maps_ffi;
pub mod download;

pub use constants::*;

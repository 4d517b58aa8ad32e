pub mod maps_loader;
pub mod vendor_catalog;

pub use maps_loader::{init_maps_loader, maps_loader, teardown_maps_loader, LoaderSettings, MapsLoader};
pub use vendor_catalog::{load_catalog, load_favorites, CatalogError};

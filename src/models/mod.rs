pub mod vendor;
pub mod favorite;
pub mod filters;

pub use vendor::{Category, Coordinates, PriceTier, Vendor, parse_distance, MAX_RATING};
pub use favorite::{FavoriteExport, FavoriteVendor, FavoritesStats};
pub use filters::{CategoryFilter, FavoriteSortKey, ListControls, SortKey, VendorFilter};

pub mod map_viewmodel;
pub mod vendor_list_viewmodel;
pub mod favorites_viewmodel;

pub use map_viewmodel::{MapPlatform, MapViewModel, SelectCallback, StatusCallback};
pub use vendor_list_viewmodel::VendorListViewModel;
pub use favorites_viewmodel::FavoritesViewModel;

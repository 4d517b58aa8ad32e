pub mod app;
pub mod filter_bar;
pub mod vendor_list;
pub mod map_page;
pub mod favorites;

pub use app::render_app;
pub use filter_bar::render_filter_bar;
pub use vendor_list::render_vendor_list;
pub use map_page::{render_map_page, sync_map};
pub use favorites::render_favorites_page;

// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::Element;

use crate::config::CONFIG;
use crate::maps::web::GoogleMapsBackend;
use crate::models::{FavoriteVendor, ListControls, Vendor};
use crate::viewmodels::{FavoritesViewModel, MapViewModel, VendorListViewModel};

/// Páginas de la app (selector mínimo, sin router)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Discover,
    Vendors,
    Map,
    Favorites,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Discover, Page::Vendors, Page::Map, Page::Favorites];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Discover => "Discover",
            Page::Vendors => "Vendors",
            Page::Map => "Map",
            Page::Favorites => "Favorites",
        }
    }
}

type ListState = Rc<RefCell<VendorListViewModel>>;

/// Estado global de la aplicación
#[derive(Clone)]
pub struct AppState {
    pub page: Rc<RefCell<Page>>,

    // Una lista por página, cada una con sus filtros y orden
    pub discover: ListState,
    pub directory: ListState,
    pub map_page: ListState,
    pub favorites: Rc<RefCell<FavoritesViewModel>>,

    // Mapa
    pub selected_vendor: Rc<RefCell<Option<Vendor>>>,
    pub map: Rc<RefCell<Option<MapViewModel<GoogleMapsBackend>>>>,
    /// Contenedor del mapa, creado una vez y re-adjuntado en cada render
    pub map_container: Rc<RefCell<Option<Element>>>,

    /// Error al cargar los datos empaquetados
    pub load_error: Rc<RefCell<Option<String>>>,

    pub change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new(vendors: Vec<Vendor>, favorites: Vec<FavoriteVendor>) -> Self {
        let max_distance = CONFIG.list_config.discover_max_distance;
        Self {
            page: Rc::new(RefCell::new(Page::default())),
            discover: Rc::new(RefCell::new(VendorListViewModel::new(
                vendors.clone(),
                ListControls::discover(max_distance),
            ))),
            directory: Rc::new(RefCell::new(VendorListViewModel::new(
                vendors.clone(),
                ListControls::directory(),
            ))),
            map_page: Rc::new(RefCell::new(VendorListViewModel::new(vendors, ListControls::map()))),
            favorites: Rc::new(RefCell::new(FavoritesViewModel::new(favorites))),
            selected_vendor: Rc::new(RefCell::new(None)),
            map: Rc::new(RefCell::new(None)),
            map_container: Rc::new(RefCell::new(None)),
            load_error: Rc::new(RefCell::new(None)),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Estado vacío con un error de carga visible
    pub fn failed(message: String) -> Self {
        let state = Self::new(Vec::new(), Vec::new());
        *state.load_error.borrow_mut() = Some(message);
        state
    }

    /// Suscribirse a cambios de estado
    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify_subscribers(&self) {
        let subscribers: Vec<Rc<dyn Fn()>> = self.change_subscribers.borrow().clone();
        for callback in subscribers {
            callback();
        }
    }

    pub fn current_page(&self) -> Page {
        *self.page.borrow()
    }

    pub fn set_page(&self, page: Page) {
        if self.current_page() == page {
            return;
        }
        log::info!("🧭 [APP] Página: {}", page.label());
        *self.page.borrow_mut() = page;
        self.notify_subscribers();
    }

    /// Lista asociada a una página (Favorites tiene su propio modelo)
    pub fn list_for(&self, page: Page) -> Option<ListState> {
        match page {
            Page::Discover => Some(self.discover.clone()),
            Page::Vendors => Some(self.directory.clone()),
            Page::Map => Some(self.map_page.clone()),
            Page::Favorites => None,
        }
    }

    /// Modificar los controles de una lista y re-renderizar
    pub fn update_list<F>(&self, page: Page, update: F)
    where
        F: FnOnce(&mut VendorListViewModel),
    {
        if let Some(list) = self.list_for(page) {
            update(&mut list.borrow_mut());
            self.notify_subscribers();
        }
    }

    pub fn update_favorites<F>(&self, update: F)
    where
        F: FnOnce(&mut FavoritesViewModel),
    {
        update(&mut self.favorites.borrow_mut());
        self.notify_subscribers();
    }

    /// El flag de favorito se refleja en todas las listas
    pub fn toggle_favorite(&self, vendor_id: &str) {
        let mut toggled = false;
        for list in [&self.discover, &self.directory, &self.map_page] {
            toggled |= list.borrow_mut().toggle_favorite(vendor_id);
        }
        if toggled {
            self.notify_subscribers();
        }
    }

    pub fn selected_vendor(&self) -> Option<Vendor> {
        self.selected_vendor.borrow().clone()
    }

    pub fn select_vendor(&self, vendor: Option<Vendor>) {
        let changed = {
            let current = self.selected_vendor.borrow();
            current.as_ref().map(|v| &v.id) != vendor.as_ref().map(|v| &v.id)
        };
        if changed {
            *self.selected_vendor.borrow_mut() = vendor;
            self.notify_subscribers();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::testing::vendor;
    use crate::models::Category;
    use std::cell::Cell;

    fn state() -> AppState {
        AppState::new(
            vec![vendor("1", Category::Food, true), vendor("2", Category::Retail, false)],
            Vec::new(),
        )
    }

    fn counting(state: &AppState) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        state.subscribe_to_changes(move || counter.set(counter.get() + 1));
        count
    }

    #[test]
    fn pages_use_their_presets() {
        let state = state();
        assert_eq!(state.current_page(), Page::Discover);
        assert_eq!(state.discover.borrow().controls, ListControls::discover(5.0));
        assert_eq!(state.directory.borrow().controls, ListControls::directory());
        assert_eq!(state.map_page.borrow().controls, ListControls::map());
        assert!(state.list_for(Page::Favorites).is_none());
    }

    #[test]
    fn set_page_notifies_only_on_change() {
        let state = state();
        let count = counting(&state);

        state.set_page(Page::Discover);
        state.set_page(Page::Map);

        assert_eq!(count.get(), 1);
        assert_eq!(state.current_page(), Page::Map);
    }

    #[test]
    fn favorite_toggle_is_reflected_in_every_list() {
        let state = state();
        state.toggle_favorite("2");

        for page in [Page::Discover, Page::Vendors, Page::Map] {
            let list = state.list_for(page).unwrap();
            let list = list.borrow();
            assert!(list.find("2").unwrap().is_favorite);
            assert!(!list.find("1").unwrap().is_favorite);
        }
    }

    #[test]
    fn list_updates_are_page_local() {
        let state = state();
        state.update_list(Page::Vendors, |list| list.set_open_only(true));

        assert_eq!(state.directory.borrow().visible().len(), 1);
        assert_eq!(state.map_page.borrow().visible().len(), 2);
    }

    #[test]
    fn selecting_same_vendor_twice_notifies_once() {
        let state = state();
        let count = counting(&state);
        let target = vendor("1", Category::Food, true);

        state.select_vendor(Some(target.clone()));
        state.select_vendor(Some(target));

        assert_eq!(count.get(), 1);
        assert_eq!(state.selected_vendor().map(|v| v.id), Some("1".to_string()));
    }
}

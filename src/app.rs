// ============================================================================
// APP - Aplicación principal
// ============================================================================

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{append_child, clear_children, get_element_by_id};
use crate::maps::web::{BrowserGeolocator, GlooScheduler, GoogleMapsBackend};
use crate::maps::MapOptions;
use crate::services::{load_catalog, load_favorites, maps_loader};
use crate::state::{AppState, Page};
use crate::utils::constants::MAP_CONTAINER_ID;
use crate::viewmodels::{MapPlatform, MapViewModel, SelectCallback, StatusCallback};
use crate::views::{render_app, sync_map};

/// Aplicación principal
pub struct App {
    state: AppState,
    root: Element,
}

impl App {
    /// Crear nueva aplicación
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = match (load_catalog(), load_favorites()) {
            (Ok(vendors), Ok(favorites)) => AppState::new(vendors, favorites),
            (Err(e), _) | (_, Err(e)) => {
                log::error!("❌ [APP] Error cargando datos: {}", e);
                AppState::failed(format!("Could not load vendors: {}", e))
            }
        };

        // Re-render en la siguiente vuelta del event loop (agrupa cambios)
        state.subscribe_to_changes(move || {
            Timeout::new(0, move || {
                crate::rerender_app();
            })
            .forget();
        });

        Ok(Self { state, root })
    }

    /// Renderizar aplicación
    pub fn render(&mut self) -> Result<(), JsValue> {
        let on_map_page = self.state.current_page() == Page::Map;
        if on_map_page {
            self.ensure_map();
        }

        clear_children(&self.root);
        let view = render_app(&self.state)?;
        append_child(&self.root, &view)?;

        // El contenedor ya está en el documento
        if on_map_page {
            sync_map(&self.state);
        }
        Ok(())
    }

    /// Crear el ViewModel del mapa la primera vez que se visita la página
    fn ensure_map(&self) {
        if self.state.map.borrow().is_some() {
            return;
        }
        let Some(loader) = maps_loader() else {
            log::warn!("⚠️ [APP] Loader de mapas no inicializado");
            return;
        };

        let on_select: SelectCallback = {
            let state = self.state.clone();
            Rc::new(move |vendor| state.select_vendor(Some(vendor)))
        };
        let on_status: StatusCallback = {
            let state = self.state.clone();
            Rc::new(move |status| {
                log::debug!("🗺️ [APP] Estado del mapa: {:?}", status);
                state.notify_subscribers();
            })
        };

        let vm = MapViewModel::new(
            MapPlatform {
                backend: Rc::new(GoogleMapsBackend),
                scheduler: Rc::new(GlooScheduler::default()),
                geolocator: Rc::new(BrowserGeolocator),
            },
            MAP_CONTAINER_ID,
            CONFIG.map_config.clone(),
            MapOptions::default(),
            on_select,
            on_status,
        );
        *self.state.map.borrow_mut() = Some(vm.clone());
        vm.attach(&loader);
    }

    /// Soltar el mapa y sus temporizadores
    pub fn teardown(&self) {
        let vm = self.state.map.borrow_mut().take();
        if let Some(vm) = vm {
            vm.teardown();
        }
        *self.state.map_container.borrow_mut() = None;
    }
}

// ============================================================================
// LOCAL VENDORS APP - FRONTEND MVVM (RUST PURO)
// ============================================================================
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado + Lógica UI (filtros, orden, mapa)
// - Services: Carga del script de mapas + catálogo empaquetado
// - State: State Management con Rc<RefCell>
// - Maps: Traits de plataforma + backend Google Maps
// ============================================================================

pub mod config;
pub mod models;
pub mod maps;
pub mod services;
pub mod viewmodels;
pub mod state;
pub mod utils;
mod dom;
mod views;
mod app;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::CONFIG;
use crate::maps::web::{GlooScheduler, WebScriptHost};
use crate::services::{init_maps_loader, teardown_maps_loader, LoaderSettings, MapsLoader};

// Variable estática global para mantener la instancia de App
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(CONFIG.log_level()));
    log::info!("🚀 Local Vendors - Rust + WASM");

    if !CONFIG.has_maps_api_key() {
        log::warn!("⚠️ [APP] GOOGLE_MAPS_API_KEY vacío, el mapa no podrá cargar");
    }

    // Loader único del script de Google Maps
    init_maps_loader(MapsLoader::new(
        Rc::new(WebScriptHost),
        Rc::new(GlooScheduler::default()),
        LoaderSettings::from_config(&CONFIG),
    ));

    let mut app = App::new()?;
    app.render()?;

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Re-render completo de la app
pub fn rerender_app() {
    APP.with(|app_cell| {
        if let Some(app) = app_cell.borrow_mut().as_mut() {
            if let Err(e) = app.render() {
                log::error!("❌ [RERENDER] Error re-renderizando: {:?}", e);
            }
        } else {
            log::warn!("⚠️ [RERENDER] App no está inicializada");
        }
    });
}

/// Re-render llamable desde JavaScript
#[wasm_bindgen]
pub fn rerender_app_wasm() {
    rerender_app();
}

/// Desmontar la app: cancela temporizadores y libera el loader global
#[wasm_bindgen]
pub fn teardown_app() {
    let app = APP.with(|app_cell| app_cell.borrow_mut().take());
    if let Some(app) = app {
        app.teardown();
    }
    teardown_maps_loader();
    log::info!("🔌 [APP] App desmontada");
}

use std::rc::Rc;

use crate::models::Coordinates;
use super::geometry::LatLngBounds;
use super::markers::MarkerSpec;

/// Identificador de un temporizador programado
pub type TimerId = u64;

/// Trait común para el backend del mapa (Google Maps en web, fakes en tests).
///
/// Es el único camino para mutar la instancia del mapa.
pub trait MapBackend {
    /// Handle de la instancia del mapa
    type Map: Clone + 'static;
    /// Handle de un marcador
    type Marker: 'static;

    /// ¿Está montado el contenedor DOM?
    fn container_ready(&self, container_id: &str) -> bool;

    /// Crear la instancia del mapa dentro del contenedor
    fn create_map(&self, container_id: &str, options: &MapOptions) -> Result<Self::Map, MapError>;

    fn set_center(&self, map: &Self::Map, center: Coordinates);

    fn set_zoom(&self, map: &Self::Map, zoom: f64);

    /// Zoom actual, si el backend lo conoce
    fn zoom(&self, map: &Self::Map) -> Option<f64>;

    /// Ajustar la vista para cubrir los límites
    fn fit_bounds(&self, map: &Self::Map, bounds: &LatLngBounds);

    /// Ejecutar `callback` una sola vez cuando la vista se estabilice ("idle")
    fn on_idle_once(&self, map: &Self::Map, callback: Box<dyn FnOnce()>);

    /// Crear un marcador; `on_click` es opcional (el marcador del usuario no lo tiene)
    fn add_marker(
        &self,
        map: &Self::Map,
        spec: &MarkerSpec,
        on_click: Option<Rc<dyn Fn()>>,
    ) -> Result<Self::Marker, MapError>;

    /// Quitar el marcador del mapa
    fn remove_marker(&self, marker: &Self::Marker);

    /// Activar/desactivar la animación de rebote
    fn set_bouncing(&self, marker: &Self::Marker, bouncing: bool);
}

/// Entorno donde se carga el script de la librería de mapas
pub trait ScriptHost {
    /// ¿Existe ya el namespace global de la librería?
    fn namespace_ready(&self) -> bool;

    /// ¿Hay ya un tag de carga en el documento (p.ej. de un montaje anterior)?
    fn loader_tag_present(&self) -> bool;

    /// Inyectar el tag de carga con un callback global de nombre único
    fn inject_loader(
        &self,
        src: &str,
        callback_name: &str,
        on_load: Box<dyn FnOnce()>,
        on_error: Box<dyn FnOnce(String)>,
    ) -> Result<(), MapError>;

    /// Eliminar el callback global
    fn release_callback(&self, callback_name: &str);

    /// Quitar del documento un tag de carga que falló
    fn remove_loader_tag(&self);
}

/// Temporizadores cancelables
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId;

    /// Cancelar un temporizador pendiente (no-op si ya se ejecutó)
    fn cancel(&self, id: TimerId);
}

/// Capacidad de geolocalización del dispositivo
pub trait Geolocator {
    fn is_available(&self) -> bool;

    fn current_position(&self, on_result: Box<dyn FnOnce(Result<Coordinates, String>)>);
}

/// Configuración de creación del mapa
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: Coordinates,
    pub zoom: f64,
    pub hide_poi_labels: bool,
    pub hide_transit_labels: bool,
    /// Controles por defecto (tipo de mapa, street view, pantalla completa)
    pub default_ui: bool,
}

impl MapOptions {
    pub fn new(center: Coordinates, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            hide_poi_labels: true,
            hide_transit_labels: true,
            default_ui: false,
        }
    }
}

impl Default for MapOptions {
    fn default() -> Self {
        let config = &crate::config::CONFIG.map_config;
        Self::new(config.default_center(), config.default_zoom)
    }
}

/// Error del mapa
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    #[error("map script failed to load: {0}")]
    ScriptLoad(String),

    #[error("map library did not become available after {waited_ms} ms")]
    ScriptTimeout { waited_ms: u32 },

    #[error("map library is not ready")]
    NotReady,

    #[error("map container `{0}` is not available")]
    ContainerMissing(String),

    #[error("failed to create map instance: {0}")]
    CreateFailed(String),

    #[error("invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { lat: f64, lng: f64 },

    #[error("failed to create marker: {0}")]
    Marker(String),

    #[error("map loader was dropped before finishing")]
    LoaderGone,
}

impl MapError {
    /// Mensaje para la pantalla de error
    pub fn user_message(&self) -> String {
        match self {
            MapError::ScriptLoad(_) | MapError::ScriptTimeout { .. } => {
                "Failed to load Google Maps API. Please check your internet connection and API key.".to_string()
            }
            MapError::CreateFailed(_) => "Failed to create map instance".to_string(),
            MapError::ContainerMissing(_) => "Map container is not available".to_string(),
            other => other.to_string(),
        }
    }
}

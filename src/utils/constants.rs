// ============================================================================
// CONSTANTES - Paleta de marcadores y URLs de Google Maps
// ============================================================================

use crate::models::Category;

/// Script de la API de Google Maps
pub const MAPS_SCRIPT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/js";

/// Selector del tag de carga ya presente en el documento
pub const MAPS_SCRIPT_SELECTOR: &str = "script[src*=\"maps.googleapis.com\"]";

/// Prefijo del callback global único de carga
pub const MAPS_CALLBACK_PREFIX: &str = "initGoogleMap_";

/// ID del contenedor DOM del mapa
pub const MAP_CONTAINER_ID: &str = "vendor-map";

/// Nombre del archivo exportado de favoritos
pub const FAVORITES_EXPORT_FILENAME: &str = "favorite-vendors.json";

// Marcadores de vendedores
pub const MARKER_SCALE: f64 = 12.0;
pub const MARKER_STROKE_COLOR: &str = "#ffffff";
pub const MARKER_STROKE_WEIGHT: f64 = 3.0;
pub const MARKER_OPACITY_OPEN: f64 = 1.0;
pub const MARKER_OPACITY_CLOSED: f64 = 0.6;

// Marcador de ubicación del usuario
pub const USER_MARKER_SCALE: f64 = 8.0;
pub const USER_MARKER_COLOR: &str = "#22c55e";
pub const USER_MARKER_STROKE_WEIGHT: f64 = 2.0;
pub const USER_MARKER_TITLE: &str = "Your location";

/// Color de relleno por categoría
pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::Food => "#ef4444",
        Category::Drinks => "#f59e0b",
        Category::Retail => "#8b5cf6",
        Category::Services => "#3b82f6",
    }
}

// Control de distancia máxima (millas)
pub const DISTANCE_MIN_MILES: f64 = 0.1;
pub const DISTANCE_MAX_MILES: f64 = 10.0;
pub const DISTANCE_STEP_MILES: f64 = 0.1;

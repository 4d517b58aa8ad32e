use serde::{Deserialize, Serialize};

use crate::models::Coordinates;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub google_maps_api_key: String,
    pub log_level: String,
    pub map_config: MapConfig,
    pub loader_config: LoaderConfig,
    pub list_config: ListConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            google_maps_api_key: String::new(),
            log_level: "info".to_string(),
            map_config: MapConfig::default(),
            loader_config: LoaderConfig::default(),
            list_config: ListConfig::default(),
        }
    }
}

/// Vista del mapa y tiempos del inicializador / marcadores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub default_center_lat: f64,
    pub default_center_lng: f64,
    pub default_zoom: f64,
    pub container_retry_ms: u32,
    pub init_delay_ms: u32,
    pub marker_bounce_ms: u32,
    pub max_fit_zoom: f64,
    pub selected_vendor_zoom: f64,
    pub user_location_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        // Nueva York (Midtown)
        Self {
            default_center_lat: 40.7589,
            default_center_lng: -73.9851,
            default_zoom: 13.0,
            container_retry_ms: 100,
            init_delay_ms: 50,
            marker_bounce_ms: 1500,
            max_fit_zoom: 15.0,
            selected_vendor_zoom: 16.0,
            user_location_zoom: 15.0,
        }
    }
}

impl MapConfig {
    pub fn default_center(&self) -> Coordinates {
        Coordinates::new(self.default_center_lat, self.default_center_lng)
    }
}

/// Carga del script de Google Maps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub script_poll_interval_ms: u32,
    pub script_timeout_ms: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            script_poll_interval_ms: 100,
            script_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Distancia máxima inicial de la página Discover (millas)
    pub discover_max_distance: f64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            discover_max_distance: 5.0,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            google_maps_api_key: option_env!("GOOGLE_MAPS_API_KEY")
                .unwrap_or("").to_string(),
            log_level: option_env!("LOG_LEVEL")
                .unwrap_or("info").to_string(),
            map_config: MapConfig {
                default_center_lat: parse_or(option_env!("DEFAULT_MAP_CENTER_LAT"), defaults.map_config.default_center_lat),
                default_center_lng: parse_or(option_env!("DEFAULT_MAP_CENTER_LNG"), defaults.map_config.default_center_lng),
                default_zoom: parse_or(option_env!("DEFAULT_MAP_ZOOM"), defaults.map_config.default_zoom),
                container_retry_ms: parse_or(option_env!("CONTAINER_RETRY_MS"), defaults.map_config.container_retry_ms),
                init_delay_ms: parse_or(option_env!("MAP_INIT_DELAY_MS"), defaults.map_config.init_delay_ms),
                marker_bounce_ms: parse_or(option_env!("MARKER_BOUNCE_MS"), defaults.map_config.marker_bounce_ms),
                max_fit_zoom: parse_or(option_env!("MAX_FIT_ZOOM"), defaults.map_config.max_fit_zoom),
                selected_vendor_zoom: parse_or(option_env!("SELECTED_VENDOR_ZOOM"), defaults.map_config.selected_vendor_zoom),
                user_location_zoom: parse_or(option_env!("USER_LOCATION_ZOOM"), defaults.map_config.user_location_zoom),
            },
            loader_config: LoaderConfig {
                script_poll_interval_ms: parse_or(option_env!("SCRIPT_POLL_INTERVAL_MS"), defaults.loader_config.script_poll_interval_ms),
                script_timeout_ms: parse_or(option_env!("SCRIPT_TIMEOUT_MS"), defaults.loader_config.script_timeout_ms),
            },
            list_config: ListConfig {
                discover_max_distance: parse_or(option_env!("DISCOVER_MAX_DISTANCE"), defaults.list_config.discover_max_distance),
            },
        }
    }

    /// Nivel de log para wasm-logger (info si el valor no es válido)
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    pub fn has_maps_api_key(&self) -> bool {
        !self.google_maps_api_key.trim().is_empty()
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<&str>, default: T) -> T {
    value
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or(Some("250"), 100u32), 250);
        assert_eq!(parse_or(Some(" 16.5 "), 13.0f64), 16.5);
        assert_eq!(parse_or(Some("abc"), 100u32), 100);
        assert_eq!(parse_or::<u32>(None, 7), 7);
    }

    #[test]
    fn default_map_config_matches_midtown_view() {
        let config = MapConfig::default();
        let center = config.default_center();
        assert_eq!(center.lat, 40.7589);
        assert_eq!(center.lng, -73.9851);
        assert_eq!(config.default_zoom, 13.0);
        assert_eq!(config.max_fit_zoom, 15.0);
        assert_eq!(config.selected_vendor_zoom, 16.0);
    }

    #[test]
    fn invalid_log_level_defaults_to_info() {
        let config = AppConfig {
            log_level: "verbose".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.log_level(), log::Level::Info);

        let config = AppConfig {
            log_level: "debug".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.log_level(), log::Level::Debug);
    }
}

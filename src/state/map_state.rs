// ============================================================================
// MAP STATE - Estado derivado del mapa (script, instancia, marcadores)
// ============================================================================

use std::collections::HashSet;

use crate::maps::{MapBackend, MapError, MapOptions, TimerId};
use crate::models::{Coordinates, Vendor};

/// Estado de carga del script de la librería de mapas
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScriptStatus {
    #[default]
    NotStarted,
    Loading,
    Ready,
    Failed(MapError),
}

impl ScriptStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScriptStatus::Ready | ScriptStatus::Failed(_))
    }
}

/// Lo que la vista necesita saber para decidir qué pintar
#[derive(Debug, Clone, PartialEq)]
pub enum MapViewStatus {
    /// `api_loaded` distingue "Loading API..." de "Initializing map..."
    Loading { api_loaded: bool },
    Ready,
    Failed(String),
}

/// Marcador vivo asociado a un vendedor
pub struct MarkerEntry<M> {
    pub vendor_id: String,
    pub position: Coordinates,
    pub marker: M,
}

/// Estado del mapa (propiedad exclusiva de MapViewModel)
pub struct MapSyncState<B: MapBackend> {
    pub script: ScriptStatus,
    pub map: Option<B::Map>,
    pub options: MapOptions,
    pub markers: Vec<MarkerEntry<B::Marker>>,
    pub user_marker: Option<B::Marker>,
    /// Lista actual de vendedores (entrada del sincronizador)
    pub vendors: Vec<Vendor>,
    pub selected: Option<Vendor>,
    pub error: Option<String>,
    pub container_retry_used: bool,
    /// Temporizadores pendientes, se cancelan en teardown
    pub timers: HashSet<TimerId>,
}

impl<B: MapBackend> MapSyncState<B> {
    pub fn new(options: MapOptions) -> Self {
        Self {
            script: ScriptStatus::NotStarted,
            map: None,
            options,
            markers: Vec::new(),
            user_marker: None,
            vendors: Vec::new(),
            selected: None,
            error: None,
            container_retry_used: false,
            timers: HashSet::new(),
        }
    }

    pub fn view_status(&self) -> MapViewStatus {
        if let Some(error) = &self.error {
            return MapViewStatus::Failed(error.clone());
        }
        if self.map.is_some() {
            return MapViewStatus::Ready;
        }
        MapViewStatus::Loading {
            api_loaded: self.script == ScriptStatus::Ready,
        }
    }

    pub fn marker_for(&self, vendor_id: &str) -> Option<&MarkerEntry<B::Marker>> {
        self.markers.iter().find(|entry| entry.vendor_id == vendor_id)
    }
}

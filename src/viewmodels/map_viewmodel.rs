// ============================================================================
// MAP VIEWMODEL - Inicialización del mapa y sincronización de marcadores
// ============================================================================
// Dueño exclusivo del MapSyncState. Las closures registradas en la
// plataforma guardan un Weak y nunca retienen un borrow al invocar callbacks.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::config::MapConfig;
use crate::maps::{
    Geolocator, LatLngBounds, MapBackend, MapError, MapOptions, MarkerSpec, Scheduler, TimerId,
};
use crate::models::{Coordinates, Vendor};
use crate::services::MapsLoader;
use crate::state::{MapSyncState, MapViewStatus, MarkerEntry, ScriptStatus};

/// Capacidades de plataforma que usa el mapa
pub struct MapPlatform<B: MapBackend> {
    pub backend: Rc<B>,
    pub scheduler: Rc<dyn Scheduler>,
    pub geolocator: Rc<dyn Geolocator>,
}

impl<B: MapBackend> Clone for MapPlatform<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            scheduler: self.scheduler.clone(),
            geolocator: self.geolocator.clone(),
        }
    }
}

pub type SelectCallback = Rc<dyn Fn(Vendor)>;
pub type StatusCallback = Rc<dyn Fn(MapViewStatus)>;

struct Inner<B: MapBackend> {
    platform: MapPlatform<B>,
    container_id: String,
    config: MapConfig,
    state: RefCell<MapSyncState<B>>,
    on_select: SelectCallback,
    on_status: StatusCallback,
    active: Cell<bool>,
}

/// ViewModel del mapa de vendedores
pub struct MapViewModel<B: MapBackend> {
    inner: Rc<Inner<B>>,
}

impl<B: MapBackend> Clone for MapViewModel<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: MapBackend + 'static> MapViewModel<B> {
    pub fn new(
        platform: MapPlatform<B>,
        container_id: &str,
        config: MapConfig,
        options: MapOptions,
        on_select: SelectCallback,
        on_status: StatusCallback,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                platform,
                container_id: container_id.to_string(),
                config,
                state: RefCell::new(MapSyncState::new(options)),
                on_select,
                on_status,
                active: Cell::new(true),
            }),
        }
    }

    fn downgrade(&self) -> Weak<Inner<B>> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<Inner<B>>) -> Option<Self> {
        weak.upgrade()
            .filter(|inner| inner.active.get())
            .map(|inner| MapViewModel { inner })
    }

    fn backend(&self) -> &B {
        &self.inner.platform.backend
    }

    // ========================================================================
    // Estado
    // ========================================================================

    pub fn view_status(&self) -> MapViewStatus {
        self.inner.state.borrow().view_status()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.state.borrow().map.is_some()
    }

    pub fn marker_count(&self) -> usize {
        self.inner.state.borrow().markers.len()
    }

    pub fn has_user_marker(&self) -> bool {
        self.inner.state.borrow().user_marker.is_some()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.inner.state.borrow().selected.as_ref().map(|v| v.id.clone())
    }

    fn notify(&self) {
        let status = self.view_status();
        (self.inner.on_status)(status);
    }

    fn fail(&self, message: String) {
        log::error!("❌ [MAP] {}", message);
        self.inner.state.borrow_mut().error = Some(message);
        self.notify();
    }

    /// Programar una tarea cancelable en teardown
    fn schedule<F>(&self, delay_ms: u32, task: F)
    where
        F: FnOnce(&MapViewModel<B>) + 'static,
    {
        let weak = self.downgrade();
        let slot: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
        let own_id = slot.clone();

        let id = self.inner.platform.scheduler.schedule(
            delay_ms,
            Box::new(move || {
                if let Some(vm) = Self::upgrade(&weak) {
                    if let Some(id) = own_id.get() {
                        vm.inner.state.borrow_mut().timers.remove(&id);
                    }
                    task(&vm);
                }
            }),
        );
        slot.set(Some(id));
        self.inner.state.borrow_mut().timers.insert(id);
    }

    // ========================================================================
    // Carga e inicialización
    // ========================================================================

    /// Conectar con el loader del script y esperar a que esté listo
    pub fn attach(&self, loader: &MapsLoader) {
        self.inner.state.borrow_mut().script = ScriptStatus::Loading;
        self.notify();

        let weak = self.downgrade();
        loader.subscribe(move |result| {
            if let Some(vm) = Self::upgrade(&weak) {
                vm.handle_script_result(result);
            }
        });
        loader.ensure_loaded();
    }

    pub fn handle_script_result(&self, result: Result<(), MapError>) {
        match result {
            Ok(()) => {
                log::info!("🗺️ [MAP] API lista, inicializando mapa...");
                self.inner.state.borrow_mut().script = ScriptStatus::Ready;
                self.notify();
                self.schedule(self.inner.config.init_delay_ms, |vm| vm.initialize());
            }
            Err(e) => {
                self.inner.state.borrow_mut().script = ScriptStatus::Failed(e.clone());
                self.fail(e.user_message());
            }
        }
    }

    /// Crear la instancia del mapa (un reintento si falta el contenedor)
    pub fn initialize(&self) {
        if self.is_ready() {
            return;
        }

        let container_id = self.inner.container_id.clone();
        if !self.backend().container_ready(&container_id) {
            let retry_used = self.inner.state.borrow().container_retry_used;
            if retry_used {
                self.fail(MapError::ContainerMissing(container_id).user_message());
            } else {
                log::warn!("⏳ [MAP] Contenedor '{}' no montado, reintentando...", container_id);
                self.inner.state.borrow_mut().container_retry_used = true;
                self.schedule(self.inner.config.container_retry_ms, |vm| vm.initialize());
            }
            return;
        }

        let options = self.inner.state.borrow().options.clone();
        match self.backend().create_map(&container_id, &options) {
            Ok(map) => {
                {
                    let mut state = self.inner.state.borrow_mut();
                    state.map = Some(map);
                    state.error = None;
                }
                log::info!("✅ [MAP] Mapa creado en '{}'", container_id);
                self.notify();
                self.sync_markers();
                self.focus_selected();
            }
            Err(e) => self.fail(e.user_message()),
        }
    }

    // ========================================================================
    // Marcadores
    // ========================================================================

    /// Reemplazar la lista de vendedores; resincroniza solo si cambió
    pub fn set_vendors(&self, vendors: Vec<Vendor>) -> bool {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.vendors == vendors {
                return false;
            }
            state.vendors = vendors;
        }
        if self.is_ready() {
            self.sync_markers();
        }
        true
    }

    /// Quitar todos los marcadores y crear uno por vendedor válido
    pub fn sync_markers(&self) {
        let (map, old_markers, vendors) = {
            let mut state = self.inner.state.borrow_mut();
            let Some(map) = state.map.clone() else {
                return;
            };
            (map, std::mem::take(&mut state.markers), state.vendors.clone())
        };

        for entry in &old_markers {
            self.backend().remove_marker(&entry.marker);
        }

        let mut entries = Vec::with_capacity(vendors.len());
        for vendor in &vendors {
            let spec = match MarkerSpec::for_vendor(vendor) {
                Ok(spec) => spec,
                Err(e) => {
                    log::warn!("⚠️ [MAP] Vendedor {} sin marcador: {}", vendor.id, e);
                    continue;
                }
            };

            let weak = self.downgrade();
            let vendor_id = vendor.id.clone();
            let on_click: Rc<dyn Fn()> = Rc::new(move || {
                if let Some(vm) = Self::upgrade(&weak) {
                    vm.handle_marker_click(&vendor_id);
                }
            });

            match self.backend().add_marker(&map, &spec, Some(on_click)) {
                Ok(marker) => entries.push(MarkerEntry {
                    vendor_id: vendor.id.clone(),
                    position: spec.position,
                    marker,
                }),
                Err(e) => log::warn!("⚠️ [MAP] Marcador de {} descartado: {}", vendor.id, e),
            }
        }

        log::info!(
            "📍 [MAP] {} marcadores sincronizados ({} vendedores)",
            entries.len(),
            vendors.len()
        );

        let bounds = LatLngBounds::from_points(entries.iter().map(|e| e.position));
        self.inner.state.borrow_mut().markers = entries;

        if let Some(bounds) = bounds {
            self.backend().fit_bounds(&map, &bounds);

            let weak = self.downgrade();
            let max_zoom = self.inner.config.max_fit_zoom;
            self.backend().on_idle_once(
                &map,
                Box::new(move || {
                    if let Some(vm) = Self::upgrade(&weak) {
                        vm.clamp_zoom(max_zoom);
                    }
                }),
            );
        }
    }

    fn clamp_zoom(&self, max_zoom: f64) {
        let Some(map) = self.inner.state.borrow().map.clone() else {
            return;
        };
        if let Some(zoom) = self.backend().zoom(&map) {
            if zoom > max_zoom {
                self.backend().set_zoom(&map, max_zoom);
            }
        }
    }

    /// Click en un marcador: notificar selección y rebotar un rato
    pub fn handle_marker_click(&self, vendor_id: &str) {
        let vendor = self
            .inner
            .state
            .borrow()
            .vendors
            .iter()
            .find(|v| v.id == vendor_id)
            .cloned();
        let Some(vendor) = vendor else {
            return;
        };

        log::info!("👆 [MAP] Marcador seleccionado: {}", vendor.name);
        (self.inner.on_select)(vendor);

        self.set_marker_bouncing(vendor_id, true);
        let vendor_id = vendor_id.to_string();
        self.schedule(self.inner.config.marker_bounce_ms, move |vm| {
            vm.set_marker_bouncing(&vendor_id, false);
        });
    }

    fn set_marker_bouncing(&self, vendor_id: &str, bouncing: bool) {
        let state = self.inner.state.borrow();
        if let Some(entry) = state.marker_for(vendor_id) {
            self.backend().set_bouncing(&entry.marker, bouncing);
        }
    }

    // ========================================================================
    // Selección y ubicación
    // ========================================================================

    /// Actualizar el vendedor seleccionado; centra el mapa solo si cambió
    pub fn set_selected(&self, vendor: Option<Vendor>) -> bool {
        {
            let mut state = self.inner.state.borrow_mut();
            let previous = state.selected.as_ref().map(|v| v.id.as_str());
            let next = vendor.as_ref().map(|v| v.id.as_str());
            if previous == next {
                return false;
            }
            state.selected = vendor;
        }
        self.focus_selected();
        true
    }

    fn focus_selected(&self) {
        let (map, position) = {
            let state = self.inner.state.borrow();
            match (state.map.clone(), state.selected.as_ref()) {
                (Some(map), Some(vendor)) => (map, vendor.coordinates),
                _ => return,
            }
        };
        if !position.is_valid() {
            log::warn!("⚠️ [MAP] Vendedor seleccionado con coordenadas inválidas");
            return;
        }
        self.backend().set_center(&map, position);
        self.backend().set_zoom(&map, self.inner.config.selected_vendor_zoom);
    }

    /// Centrar en la ubicación del usuario y mostrar su marcador
    pub fn locate_user(&self) {
        let geolocator = self.inner.platform.geolocator.clone();
        if !geolocator.is_available() {
            log::warn!("⚠️ [MAP] Geolocalización no disponible");
            return;
        }

        let weak = self.downgrade();
        geolocator.current_position(Box::new(move |result| {
            let Some(vm) = Self::upgrade(&weak) else {
                return;
            };
            match result {
                Ok(position) => vm.show_user_location(position),
                Err(message) => log::error!("❌ [MAP] Error obteniendo ubicación: {}", message),
            }
        }));
    }

    fn show_user_location(&self, position: Coordinates) {
        let Some(map) = self.inner.state.borrow().map.clone() else {
            return;
        };
        log::info!("📍 [MAP] Ubicación del usuario: ({}, {})", position.lat, position.lng);

        self.backend().set_center(&map, position);
        self.backend().set_zoom(&map, self.inner.config.user_location_zoom);

        let previous = self.inner.state.borrow_mut().user_marker.take();
        if let Some(marker) = previous {
            self.backend().remove_marker(&marker);
        }
        match self
            .backend()
            .add_marker(&map, &MarkerSpec::user_location(position), None)
        {
            Ok(marker) => self.inner.state.borrow_mut().user_marker = Some(marker),
            Err(e) => log::warn!("⚠️ [MAP] Marcador de usuario descartado: {}", e),
        }
    }

    // ========================================================================
    // Reintento y teardown
    // ========================================================================

    /// Reintento manual desde la pantalla de error
    pub fn retry(&self, loader: &MapsLoader) {
        log::info!("🔄 [MAP] Reintentando...");
        {
            let mut state = self.inner.state.borrow_mut();
            state.error = None;
            state.container_retry_used = false;
        }
        loader.retry();
        self.attach(loader);
    }

    /// Cancelar temporizadores y soltar marcadores e instancia
    pub fn teardown(&self) {
        self.inner.active.set(false);

        let (timers, markers, user_marker) = {
            let mut state = self.inner.state.borrow_mut();
            state.map = None;
            (
                std::mem::take(&mut state.timers),
                std::mem::take(&mut state.markers),
                state.user_marker.take(),
            )
        };

        for id in timers {
            self.inner.platform.scheduler.cancel(id);
        }
        for entry in &markers {
            self.backend().remove_marker(&entry.marker);
        }
        if let Some(marker) = user_marker {
            self.backend().remove_marker(&marker);
        }
        log::info!("🔌 [MAP] Teardown ({} marcadores)", markers.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::testing::{capture_logs, vendor, FakeBackend, FakeGeolocator, FakeScheduler, FakeScriptHost};
    use crate::models::Category;
    use crate::services::LoaderSettings;

    struct Harness {
        vm: MapViewModel<FakeBackend>,
        backend: Rc<FakeBackend>,
        scheduler: Rc<FakeScheduler>,
        host: Rc<FakeScriptHost>,
        loader: MapsLoader,
        selected: Rc<RefCell<Vec<String>>>,
        statuses: Rc<RefCell<Vec<MapViewStatus>>>,
    }

    fn harness_with(backend: FakeBackend, geolocator: FakeGeolocator) -> Harness {
        let backend = Rc::new(backend);
        let scheduler = Rc::new(FakeScheduler::default());
        let host = Rc::new(FakeScriptHost::default());
        let loader = MapsLoader::new(
            host.clone(),
            scheduler.clone(),
            LoaderSettings {
                api_key: "k".to_string(),
                poll_interval_ms: 100,
                timeout_ms: 1000,
            },
        );

        let selected = Rc::new(RefCell::new(Vec::new()));
        let statuses = Rc::new(RefCell::new(Vec::new()));
        let on_select: SelectCallback = {
            let selected = selected.clone();
            Rc::new(move |v: Vendor| selected.borrow_mut().push(v.id))
        };
        let on_status: StatusCallback = {
            let statuses = statuses.clone();
            Rc::new(move |s| statuses.borrow_mut().push(s))
        };

        let config = MapConfig::default();
        let options = MapOptions::new(config.default_center(), config.default_zoom);
        let vm = MapViewModel::new(
            MapPlatform {
                backend: backend.clone(),
                scheduler: scheduler.clone(),
                geolocator: Rc::new(geolocator),
            },
            "vendor-map",
            config,
            options,
            on_select,
            on_status,
        );

        Harness {
            vm,
            backend,
            scheduler,
            host,
            loader,
            selected,
            statuses,
        }
    }

    fn harness() -> Harness {
        harness_with(FakeBackend::with_container(), FakeGeolocator::default())
    }

    /// Mapa listo: script cargado y temporizador de init ejecutado
    fn ready_harness(vendors: Vec<Vendor>) -> Harness {
        let h = harness();
        h.vm.set_vendors(vendors);
        h.host.namespace.set(true);
        h.vm.attach(&h.loader);
        h.scheduler.run_next();
        assert!(h.vm.is_ready());
        h
    }

    fn three_vendors() -> Vec<Vendor> {
        vec![
            vendor("1", Category::Food, true),
            vendor("2", Category::Drinks, false),
            vendor("3", Category::Retail, true),
        ]
    }

    #[test]
    fn loading_states_before_map_exists() {
        let h = harness();
        assert_eq!(h.vm.view_status(), MapViewStatus::Loading { api_loaded: false });

        h.vm.attach(&h.loader);
        h.host.fire_load();

        assert_eq!(h.vm.view_status(), MapViewStatus::Loading { api_loaded: true });
        assert_eq!(h.scheduler.pending_delays(), vec![50]);

        h.scheduler.run_next();
        assert_eq!(h.vm.view_status(), MapViewStatus::Ready);
        assert_eq!(h.statuses.borrow().last(), Some(&MapViewStatus::Ready));
    }

    #[test]
    fn one_marker_per_vendor_after_init() {
        let h = ready_harness(three_vendors());

        assert_eq!(h.vm.marker_count(), 3);
        assert_eq!(h.backend.markers.borrow().len(), 3);
        assert_eq!(h.backend.fitted.borrow().len(), 1);
    }

    #[test]
    fn resync_replaces_all_markers() {
        let h = ready_harness(three_vendors());

        let changed = h.vm.set_vendors(vec![vendor("4", Category::Services, true)]);

        assert!(changed);
        assert_eq!(h.backend.live_titles(), vec!["Vendor 4".to_string()]);
        assert_eq!(h.backend.removed.borrow().len(), 3);
    }

    #[test]
    fn identical_vendor_list_does_not_resync() {
        let h = ready_harness(three_vendors());

        assert!(!h.vm.set_vendors(three_vendors()));
        assert!(h.backend.removed.borrow().is_empty());
        assert_eq!(h.backend.fitted.borrow().len(), 1);
    }

    #[test]
    fn empty_vendor_list_clears_markers() {
        let h = ready_harness(three_vendors());

        h.vm.set_vendors(Vec::new());

        assert_eq!(h.vm.marker_count(), 0);
        assert!(h.backend.markers.borrow().is_empty());
        assert_eq!(h.backend.fitted.borrow().len(), 1);
    }

    #[test]
    fn invalid_vendor_is_skipped_without_aborting() {
        let mut vendors = three_vendors();
        vendors[1].coordinates = Coordinates::new(f64::NAN, 10.0);
        let h = harness();
        h.backend.failing_titles.borrow_mut().insert("Vendor 3".to_string());
        h.vm.set_vendors(vendors);
        h.host.namespace.set(true);
        h.vm.attach(&h.loader);
        h.scheduler.run_next();

        assert_eq!(h.backend.live_titles(), vec!["Vendor 1".to_string()]);
    }

    #[test]
    fn fit_zoom_is_clamped_on_idle() {
        let h = ready_harness(vec![vendor("1", Category::Food, true)]);
        assert_eq!(h.backend.zoom.get(), Some(18.0));

        h.backend.fire_idle();

        assert_eq!(h.backend.zoom.get(), Some(15.0));
    }

    #[test]
    fn moderate_fit_zoom_is_left_alone() {
        let h = harness();
        h.backend.fit_zoom.set(12.0);
        h.vm.set_vendors(three_vendors());
        h.host.namespace.set(true);
        h.vm.attach(&h.loader);
        h.scheduler.run_next();

        h.backend.fire_idle();

        assert_eq!(h.backend.zoom.get(), Some(12.0));
    }

    #[test]
    fn marker_click_selects_and_bounces_temporarily() {
        let h = ready_harness(three_vendors());
        let id = h.backend.marker_id("Vendor 2").unwrap();

        h.backend.click("Vendor 2");

        assert_eq!(*h.selected.borrow(), vec!["2".to_string()]);
        assert!(h.backend.bouncing.borrow().contains(&id));
        assert_eq!(h.scheduler.pending_delays(), vec![1500]);

        h.scheduler.run_next();
        assert!(h.backend.bouncing.borrow().is_empty());
    }

    #[test]
    fn selected_vendor_centers_and_zooms() {
        let h = ready_harness(three_vendors());
        let mut target = vendor("9", Category::Food, true);
        target.coordinates = Coordinates::new(40.7, -73.9);

        assert!(h.vm.set_selected(Some(target.clone())));

        assert_eq!(h.backend.center.get(), Some(Coordinates::new(40.7, -73.9)));
        assert_eq!(h.backend.zoom.get(), Some(16.0));
        assert!(!h.vm.set_selected(Some(target)));
    }

    #[test]
    fn selection_before_init_is_applied_once_map_exists() {
        let h = harness();
        let mut target = vendor("9", Category::Food, true);
        target.coordinates = Coordinates::new(40.72, -73.95);
        h.vm.set_selected(Some(target));
        h.host.namespace.set(true);
        h.vm.attach(&h.loader);
        h.scheduler.run_next();

        assert_eq!(h.backend.center.get(), Some(Coordinates::new(40.72, -73.95)));
        assert_eq!(h.backend.zoom.get(), Some(16.0));
    }

    #[test]
    fn missing_container_is_retried_once_then_fails() {
        let h = harness_with(FakeBackend::default(), FakeGeolocator::default());
        h.host.namespace.set(true);
        h.vm.attach(&h.loader);

        h.scheduler.run_next();
        assert_eq!(h.scheduler.pending_delays(), vec![100]);
        h.scheduler.run_next();

        assert_eq!(
            h.vm.view_status(),
            MapViewStatus::Failed("Map container is not available".to_string())
        );
        assert_eq!(h.backend.maps_created.get(), 0);
    }

    #[test]
    fn container_appearing_on_retry_creates_map() {
        let h = harness_with(FakeBackend::default(), FakeGeolocator::default());
        h.host.namespace.set(true);
        h.vm.attach(&h.loader);
        h.scheduler.run_next();

        h.backend.container.set(true);
        h.scheduler.run_next();

        assert!(h.vm.is_ready());
    }

    #[test]
    fn script_failure_shows_load_message_and_retry_recovers() {
        let h = ready_harness_failed();
        assert_eq!(
            h.vm.view_status(),
            MapViewStatus::Failed(
                "Failed to load Google Maps API. Please check your internet connection and API key."
                    .to_string()
            )
        );

        h.vm.retry(&h.loader);
        assert_eq!(h.vm.view_status(), MapViewStatus::Loading { api_loaded: false });
        h.host.fire_load();
        h.scheduler.run_next();

        assert!(h.vm.is_ready());
        assert_eq!(h.host.injected_count(), 2);
    }

    fn ready_harness_failed() -> Harness {
        let h = harness();
        h.vm.attach(&h.loader);
        h.host.fire_error("blocked");
        h
    }

    #[test]
    fn create_failure_is_reported() {
        let h = harness();
        h.backend.fail_create.set(true);
        h.host.namespace.set(true);
        h.vm.attach(&h.loader);
        h.scheduler.run_next();

        assert_eq!(
            h.vm.view_status(),
            MapViewStatus::Failed("Failed to create map instance".to_string())
        );
    }

    #[test]
    fn locate_user_centers_and_replaces_user_marker() {
        let h = harness_with(
            FakeBackend::with_container(),
            FakeGeolocator::answering(Ok(Coordinates::new(40.75, -73.98))),
        );
        h.host.namespace.set(true);
        h.vm.attach(&h.loader);
        h.scheduler.run_next();

        h.vm.locate_user();

        assert_eq!(h.backend.center.get(), Some(Coordinates::new(40.75, -73.98)));
        assert_eq!(h.backend.zoom.get(), Some(15.0));
        assert!(h.vm.has_user_marker());
        assert_eq!(h.backend.live_titles(), vec!["Your location".to_string()]);
    }

    #[test]
    fn geolocation_error_leaves_map_unchanged() {
        let h = harness_with(
            FakeBackend::with_container(),
            FakeGeolocator::answering(Err("denied".to_string())),
        );
        h.host.namespace.set(true);
        h.vm.attach(&h.loader);
        h.scheduler.run_next();
        let center = h.backend.center.get();

        let logs = capture_logs(|| h.vm.locate_user());

        assert_eq!(h.backend.center.get(), center);
        assert!(!h.vm.has_user_marker());
        assert!(logs
            .iter()
            .any(|(level, msg)| *level == log::Level::Error && msg.contains("denied")));
    }

    #[test]
    fn teardown_cancels_timers_and_removes_markers() {
        let h = ready_harness(three_vendors());
        h.backend.click("Vendor 1");
        assert_eq!(h.scheduler.pending_count(), 1);

        h.vm.teardown();

        assert_eq!(h.scheduler.pending_count(), 0);
        assert!(h.backend.markers.borrow().is_empty());
        assert!(!h.vm.is_ready());

        // Un idle tardío no toca nada
        h.backend.fire_idle();
        assert_eq!(h.backend.zoom.get(), Some(18.0));
    }

    #[test]
    fn teardown_before_script_load_ignores_late_callback() {
        let h = harness();
        h.vm.attach(&h.loader);
        h.vm.teardown();

        h.host.fire_load();

        assert_eq!(h.scheduler.pending_count(), 0);
        assert_eq!(h.backend.maps_created.get(), 0);
    }
}

//! Fakes de plataforma para los tests del mapa (sin navegador).

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::models::{Category, Coordinates, PriceTier, Vendor};
use super::geometry::LatLngBounds;
use super::markers::MarkerSpec;
use super::traits::*;

/// Vendedor mínimo para tests; las coordenadas dependen del id
pub fn vendor(id: &str, category: Category, is_open: bool) -> Vendor {
    let offset = id.bytes().map(u32::from).sum::<u32>() % 50;
    Vendor {
        id: id.to_string(),
        name: format!("Vendor {}", id),
        description: String::new(),
        image: String::new(),
        category,
        rating: 4.0,
        review_count: 10,
        price_range: PriceTier::Medium,
        distance: "1.0 mi".to_string(),
        is_open,
        open_until: None,
        location: String::new(),
        coordinates: Coordinates::new(40.70 + f64::from(offset) * 0.001, -73.99),
        phone: None,
        is_favorite: false,
        specialties: Vec::new(),
        verified: false,
        joined_date: None,
        website: None,
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeScheduler {
    next_id: Cell<TimerId>,
    pending: RefCell<Vec<(TimerId, u32, Box<dyn FnOnce()>)>>,
    pub cancelled: RefCell<Vec<TimerId>>,
}

impl FakeScheduler {
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn pending_delays(&self) -> Vec<u32> {
        self.pending.borrow().iter().map(|(_, delay, _)| *delay).collect()
    }

    /// Ejecutar el temporizador más antiguo
    pub fn run_next(&self) -> bool {
        let entry = {
            let mut pending = self.pending.borrow_mut();
            if pending.is_empty() {
                return false;
            }
            pending.remove(0)
        };
        (entry.2)();
        true
    }

    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
            assert!(ran < 10_000, "scheduler keeps rescheduling");
        }
        ran
    }
}

impl Scheduler for FakeScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.pending.borrow_mut().push((id, delay_ms, task));
        id
    }

    fn cancel(&self, id: TimerId) {
        self.pending.borrow_mut().retain(|(pending_id, _, _)| *pending_id != id);
        self.cancelled.borrow_mut().push(id);
    }
}

// ---------------------------------------------------------------------------
// Script host
// ---------------------------------------------------------------------------

type LoadHandlers = (Box<dyn FnOnce()>, Box<dyn FnOnce(String)>);

#[derive(Default)]
pub struct FakeScriptHost {
    pub namespace: Cell<bool>,
    pub tag_present: Cell<bool>,
    pub fail_inject: Cell<bool>,
    pub injected: RefCell<Vec<(String, String)>>,
    pub released: RefCell<Vec<String>>,
    pub tags_removed: Cell<usize>,
    handlers: RefCell<Option<LoadHandlers>>,
}

impl FakeScriptHost {
    /// Simular que el script cargó e invocó el callback
    pub fn fire_load(&self) {
        let handlers = self.handlers.borrow_mut().take();
        if let Some((on_load, _)) = handlers {
            self.namespace.set(true);
            on_load();
        }
    }

    pub fn fire_error(&self, message: &str) {
        let handlers = self.handlers.borrow_mut().take();
        if let Some((_, on_error)) = handlers {
            on_error(message.to_string());
        }
    }

    pub fn injected_count(&self) -> usize {
        self.injected.borrow().len()
    }
}

impl ScriptHost for FakeScriptHost {
    fn namespace_ready(&self) -> bool {
        self.namespace.get()
    }

    fn loader_tag_present(&self) -> bool {
        self.tag_present.get()
    }

    fn inject_loader(
        &self,
        src: &str,
        callback_name: &str,
        on_load: Box<dyn FnOnce()>,
        on_error: Box<dyn FnOnce(String)>,
    ) -> Result<(), MapError> {
        if self.fail_inject.get() {
            return Err(MapError::ScriptLoad("no document head".to_string()));
        }
        self.injected
            .borrow_mut()
            .push((src.to_string(), callback_name.to_string()));
        self.tag_present.set(true);
        *self.handlers.borrow_mut() = Some((on_load, on_error));
        Ok(())
    }

    fn release_callback(&self, callback_name: &str) {
        self.released.borrow_mut().push(callback_name.to_string());
    }

    fn remove_loader_tag(&self) {
        self.tag_present.set(false);
        self.tags_removed.set(self.tags_removed.get() + 1);
    }
}

// ---------------------------------------------------------------------------
// Map backend
// ---------------------------------------------------------------------------

pub struct FakeMarker {
    pub id: u32,
    pub spec: MarkerSpec,
    pub on_click: Option<Rc<dyn Fn()>>,
}

#[derive(Default)]
pub struct FakeBackend {
    pub container: Cell<bool>,
    pub fail_create: Cell<bool>,
    /// Títulos cuyo marcador falla al construirse
    pub failing_titles: RefCell<HashSet<String>>,
    pub maps_created: Cell<usize>,
    pub center: Cell<Option<Coordinates>>,
    pub zoom: Cell<Option<f64>>,
    /// Zoom resultante tras fit_bounds
    pub fit_zoom: Cell<f64>,
    pub fitted: RefCell<Vec<LatLngBounds>>,
    idle_callbacks: RefCell<Vec<Box<dyn FnOnce()>>>,
    next_marker: Cell<u32>,
    pub markers: RefCell<Vec<FakeMarker>>,
    pub removed: RefCell<Vec<u32>>,
    pub bouncing: RefCell<HashSet<u32>>,
}

impl FakeBackend {
    pub fn with_container() -> Self {
        let backend = Self::default();
        backend.container.set(true);
        backend.fit_zoom.set(18.0);
        backend
    }

    pub fn live_titles(&self) -> Vec<String> {
        self.markers.borrow().iter().map(|m| m.spec.title.clone()).collect()
    }

    pub fn marker_id(&self, title: &str) -> Option<u32> {
        self.markers
            .borrow()
            .iter()
            .find(|m| m.spec.title == title)
            .map(|m| m.id)
    }

    /// Simular un click del usuario sobre el marcador
    pub fn click(&self, title: &str) {
        let handler = self
            .markers
            .borrow()
            .iter()
            .find(|m| m.spec.title == title)
            .and_then(|m| m.on_click.clone());
        if let Some(handler) = handler {
            handler();
        }
    }

    /// Simular el evento "idle" del mapa
    pub fn fire_idle(&self) {
        let callbacks: Vec<_> = self.idle_callbacks.borrow_mut().drain(..).collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl MapBackend for FakeBackend {
    type Map = u32;
    type Marker = u32;

    fn container_ready(&self, _container_id: &str) -> bool {
        self.container.get()
    }

    fn create_map(&self, container_id: &str, options: &MapOptions) -> Result<u32, MapError> {
        if !self.container.get() {
            return Err(MapError::ContainerMissing(container_id.to_string()));
        }
        if self.fail_create.get() {
            return Err(MapError::CreateFailed("google.maps.Map threw".to_string()));
        }
        let count = self.maps_created.get() + 1;
        self.maps_created.set(count);
        self.center.set(Some(options.center));
        self.zoom.set(Some(options.zoom));
        Ok(count as u32)
    }

    fn set_center(&self, _map: &u32, center: Coordinates) {
        self.center.set(Some(center));
    }

    fn set_zoom(&self, _map: &u32, zoom: f64) {
        self.zoom.set(Some(zoom));
    }

    fn zoom(&self, _map: &u32) -> Option<f64> {
        self.zoom.get()
    }

    fn fit_bounds(&self, _map: &u32, bounds: &LatLngBounds) {
        self.fitted.borrow_mut().push(*bounds);
        self.center.set(Some(bounds.center()));
        self.zoom.set(Some(self.fit_zoom.get()));
    }

    fn on_idle_once(&self, _map: &u32, callback: Box<dyn FnOnce()>) {
        self.idle_callbacks.borrow_mut().push(callback);
    }

    fn add_marker(
        &self,
        _map: &u32,
        spec: &MarkerSpec,
        on_click: Option<Rc<dyn Fn()>>,
    ) -> Result<u32, MapError> {
        if self.failing_titles.borrow().contains(&spec.title) {
            return Err(MapError::Marker(format!("cannot build {}", spec.title)));
        }
        let id = self.next_marker.get() + 1;
        self.next_marker.set(id);
        self.markers.borrow_mut().push(FakeMarker {
            id,
            spec: spec.clone(),
            on_click,
        });
        Ok(id)
    }

    fn remove_marker(&self, marker: &u32) {
        self.markers.borrow_mut().retain(|m| m.id != *marker);
        self.removed.borrow_mut().push(*marker);
    }

    fn set_bouncing(&self, marker: &u32, bouncing: bool) {
        if bouncing {
            self.bouncing.borrow_mut().insert(*marker);
        } else {
            self.bouncing.borrow_mut().remove(marker);
        }
    }
}

// ---------------------------------------------------------------------------
// Geolocation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeGeolocator {
    pub available: Cell<bool>,
    pub result: RefCell<Option<Result<Coordinates, String>>>,
    pub requests: Cell<usize>,
}

impl FakeGeolocator {
    pub fn answering(result: Result<Coordinates, String>) -> Self {
        let geolocator = Self::default();
        geolocator.available.set(true);
        *geolocator.result.borrow_mut() = Some(result);
        geolocator
    }
}

impl Geolocator for FakeGeolocator {
    fn is_available(&self) -> bool {
        self.available.get()
    }

    fn current_position(&self, on_result: Box<dyn FnOnce(Result<Coordinates, String>)>) {
        self.requests.set(self.requests.get() + 1);
        let result = self.result.borrow_mut().take();
        if let Some(result) = result {
            on_result(result);
        }
    }
}

// ---------------------------------------------------------------------------
// Logs
// ---------------------------------------------------------------------------

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = RefCell::new(Vec::new());
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|logs| {
            logs.borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;

/// Ejecutar `f` y devolver los logs emitidos en este hilo
pub fn capture_logs<F: FnOnce()>(f: F) -> Vec<(log::Level, String)> {
    let _ = log::set_logger(&CAPTURE_LOGGER);
    log::set_max_level(log::LevelFilter::Trace);
    CAPTURED.with(|logs| logs.borrow_mut().clear());
    f();
    CAPTURED.with(|logs| std::mem::take(&mut *logs.borrow_mut()))
}

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::models::Coordinates;
use crate::utils::constants::MAPS_SCRIPT_SELECTOR;
use crate::utils::google_maps_ffi::{self as ffi, GoogleMap, GoogleMarker};
use super::geometry::LatLngBounds;
use super::markers::MarkerSpec;
use super::traits::*;

/// Serializar a objeto JS plano (mapas como objetos, no `Map`)
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| e.to_string())
}

fn set_prop(target: &JsValue, key: &str, value: &JsValue) {
    let _ = js_sys::Reflect::set(target, &JsValue::from_str(key), value);
}

fn js_error_message(error: &JsValue) -> String {
    js_sys::Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", error))
}

// ============================================================================
// SCRIPT HOST
// ============================================================================

/// Carga del script en el `<head>` del documento
pub struct WebScriptHost;

impl ScriptHost for WebScriptHost {
    fn namespace_ready(&self) -> bool {
        ffi::maps_namespace_ready()
    }

    fn loader_tag_present(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(MAPS_SCRIPT_SELECTOR).ok().flatten())
            .is_some()
    }

    fn inject_loader(
        &self,
        src: &str,
        callback_name: &str,
        on_load: Box<dyn FnOnce()>,
        on_error: Box<dyn FnOnce(String)>,
    ) -> Result<(), MapError> {
        let window = web_sys::window().ok_or_else(|| MapError::ScriptLoad("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| MapError::ScriptLoad("no document".to_string()))?;
        let head = document
            .head()
            .ok_or_else(|| MapError::ScriptLoad("no document head".to_string()))?;

        let script: web_sys::HtmlScriptElement = document
            .create_element("script")
            .and_then(|el| el.dyn_into().map_err(JsValue::from))
            .map_err(|e| MapError::ScriptLoad(js_error_message(&e)))?;
        script.set_src(src);
        script.set_async(true);
        script.set_defer(true);

        // Callback global que invoca la API al terminar de cargar
        let load_fn = Closure::once_into_js(move || on_load());
        js_sys::Reflect::set(&window, &JsValue::from_str(callback_name), &load_fn)
            .map_err(|e| MapError::ScriptLoad(js_error_message(&e)))?;

        let error_fn = Closure::once_into_js(move |_event: web_sys::Event| {
            on_error("script tag dispatched an error event".to_string())
        });
        script.set_onerror(Some(error_fn.unchecked_ref()));

        head.append_child(&script)
            .map_err(|e| MapError::ScriptLoad(js_error_message(&e)))?;
        Ok(())
    }

    fn release_callback(&self, callback_name: &str) {
        if let Some(window) = web_sys::window() {
            let _ = js_sys::Reflect::delete_property(&window, &JsValue::from_str(callback_name));
        }
    }

    fn remove_loader_tag(&self) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        while let Ok(Some(tag)) = document.query_selector(MAPS_SCRIPT_SELECTOR) {
            tag.remove();
        }
    }
}

// ============================================================================
// MAP BACKEND
// ============================================================================

#[derive(Serialize)]
struct Styler {
    visibility: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapStyle {
    feature_type: &'static str,
    element_type: &'static str,
    stylers: Vec<Styler>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptionsJs {
    center: Coordinates,
    zoom: f64,
    styles: Vec<MapStyle>,
    map_type_control: bool,
    street_view_control: bool,
    fullscreen_control: bool,
    zoom_control: bool,
}

impl MapOptionsJs {
    fn from_options(options: &MapOptions) -> Self {
        let mut styles = Vec::new();
        for (hidden, feature_type) in [
            (options.hide_poi_labels, "poi"),
            (options.hide_transit_labels, "transit"),
        ] {
            if hidden {
                styles.push(MapStyle {
                    feature_type,
                    element_type: "labels",
                    stylers: vec![Styler { visibility: "off" }],
                });
            }
        }

        Self {
            center: options.center,
            zoom: options.zoom,
            styles,
            map_type_control: options.default_ui,
            street_view_control: options.default_ui,
            fullscreen_control: options.default_ui,
            zoom_control: true,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkerIconJs {
    scale: f64,
    fill_color: &'static str,
    fill_opacity: f64,
    stroke_color: &'static str,
    stroke_weight: f64,
}

#[derive(Serialize)]
struct MarkerOptionsJs<'a> {
    position: Coordinates,
    title: &'a str,
}

/// Marcador de Google junto con su handler de click
pub struct WebMarker {
    marker: GoogleMarker,
    _on_click: Option<Closure<dyn FnMut()>>,
}

/// Backend real sobre `google.maps`
pub struct GoogleMapsBackend;

impl MapBackend for GoogleMapsBackend {
    type Map = GoogleMap;
    type Marker = WebMarker;

    fn container_ready(&self, container_id: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(container_id))
            .is_some()
    }

    fn create_map(&self, container_id: &str, options: &MapOptions) -> Result<GoogleMap, MapError> {
        let container = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(container_id))
            .ok_or_else(|| MapError::ContainerMissing(container_id.to_string()))?;

        let js_options = to_js(&MapOptionsJs::from_options(options)).map_err(MapError::CreateFailed)?;
        let zoom_control_options = js_sys::Object::new();
        set_prop(
            &zoom_control_options,
            "position",
            &ffi::maps_constant("ControlPosition", "RIGHT_BOTTOM"),
        );
        set_prop(&js_options, "zoomControlOptions", &zoom_control_options);

        GoogleMap::new(&container, &js_options).map_err(|e| MapError::CreateFailed(js_error_message(&e)))
    }

    fn set_center(&self, map: &GoogleMap, center: Coordinates) {
        match to_js(&center) {
            Ok(center) => map.set_center(&center),
            Err(e) => log::warn!("⚠️ [MAP] No se pudo serializar el centro: {}", e),
        }
    }

    fn set_zoom(&self, map: &GoogleMap, zoom: f64) {
        map.set_zoom(zoom);
    }

    fn zoom(&self, map: &GoogleMap) -> Option<f64> {
        map.get_zoom()
    }

    fn fit_bounds(&self, map: &GoogleMap, bounds: &LatLngBounds) {
        match to_js(bounds) {
            Ok(bounds) => map.fit_bounds(&bounds),
            Err(e) => log::warn!("⚠️ [MAP] No se pudieron serializar los límites: {}", e),
        }
    }

    fn on_idle_once(&self, map: &GoogleMap, callback: Box<dyn FnOnce()>) {
        let handler = Closure::once_into_js(move || callback());
        ffi::add_listener_once(map.as_ref(), "idle", handler.unchecked_ref());
    }

    fn add_marker(
        &self,
        map: &GoogleMap,
        spec: &MarkerSpec,
        on_click: Option<Rc<dyn Fn()>>,
    ) -> Result<WebMarker, MapError> {
        let options = to_js(&MarkerOptionsJs {
            position: spec.position,
            title: &spec.title,
        })
        .map_err(MapError::Marker)?;
        let icon = to_js(&MarkerIconJs {
            scale: spec.scale,
            fill_color: spec.fill_color,
            fill_opacity: spec.fill_opacity,
            stroke_color: spec.stroke_color,
            stroke_weight: spec.stroke_weight,
        })
        .map_err(MapError::Marker)?;
        set_prop(&icon, "path", &ffi::maps_constant("SymbolPath", "CIRCLE"));
        set_prop(&options, "icon", &icon);
        set_prop(&options, "map", map.as_ref());
        if spec.drop_in {
            set_prop(&options, "animation", &ffi::maps_constant("Animation", "DROP"));
        }

        let marker = GoogleMarker::new(&options).map_err(|e| MapError::Marker(js_error_message(&e)))?;

        let closure = on_click.map(|handler| {
            let closure = Closure::<dyn FnMut()>::new(move || handler());
            marker.add_listener("click", closure.as_ref().unchecked_ref());
            closure
        });

        Ok(WebMarker {
            marker,
            _on_click: closure,
        })
    }

    fn remove_marker(&self, marker: &WebMarker) {
        marker.marker.set_map(&JsValue::NULL);
    }

    fn set_bouncing(&self, marker: &WebMarker, bouncing: bool) {
        let animation = if bouncing {
            ffi::maps_constant("Animation", "BOUNCE")
        } else {
            JsValue::NULL
        };
        marker.marker.set_animation(&animation);
    }
}

// ============================================================================
// GEOLOCATION
// ============================================================================

type PositionCallback = Rc<RefCell<Option<Box<dyn FnOnce(Result<Coordinates, String>)>>>>;

/// Geolocalización vía `navigator.geolocation`
pub struct BrowserGeolocator;

impl BrowserGeolocator {
    fn read_coordinates(position: &JsValue) -> Option<Coordinates> {
        let coords = js_sys::Reflect::get(position, &JsValue::from_str("coords")).ok()?;
        let lat = js_sys::Reflect::get(&coords, &JsValue::from_str("latitude")).ok()?.as_f64()?;
        let lng = js_sys::Reflect::get(&coords, &JsValue::from_str("longitude")).ok()?.as_f64()?;
        Some(Coordinates::new(lat, lng))
    }
}

impl Geolocator for BrowserGeolocator {
    fn is_available(&self) -> bool {
        web_sys::window()
            .map(|w| w.navigator().geolocation().is_ok())
            .unwrap_or(false)
    }

    fn current_position(&self, on_result: Box<dyn FnOnce(Result<Coordinates, String>)>) {
        let geolocation = match web_sys::window().map(|w| w.navigator().geolocation()) {
            Some(Ok(geolocation)) => geolocation,
            _ => {
                on_result(Err("geolocation unavailable".to_string()));
                return;
            }
        };

        // Éxito y error comparten el mismo callback de un solo uso
        let callback: PositionCallback = Rc::new(RefCell::new(Some(on_result)));

        let on_success = {
            let callback = callback.clone();
            Closure::once_into_js(move |position: JsValue| {
                let result = Self::read_coordinates(&position)
                    .ok_or_else(|| "position without coordinates".to_string());
                if let Some(cb) = callback.borrow_mut().take() {
                    cb(result);
                }
            })
        };
        let on_failure = {
            let callback = callback.clone();
            Closure::once_into_js(move |error: JsValue| {
                if let Some(cb) = callback.borrow_mut().take() {
                    cb(Err(js_error_message(&error)));
                }
            })
        };

        if let Err(e) = geolocation.get_current_position_with_error_callback(
            on_success.unchecked_ref(),
            Some(on_failure.unchecked_ref()),
        ) {
            if let Some(cb) = callback.borrow_mut().take() {
                cb(Err(js_error_message(&e)));
            }
        }
    }
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Handles de temporizadores vivos por id; soltar el handle cancela
pub struct TimerHandles<H> {
    next_id: Cell<TimerId>,
    live: Rc<RefCell<HashMap<TimerId, H>>>,
}

impl<H> Default for TimerHandles<H> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            live: Rc::new(RefCell::new(HashMap::new())),
        }
    }
}

impl<H: 'static> TimerHandles<H> {
    fn next_id(&self) -> TimerId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn insert(&self, id: TimerId, handle: H) {
        self.live.borrow_mut().insert(id, handle);
    }

    fn release(&self, id: TimerId) {
        let handle = self.live.borrow_mut().remove(&id);
        drop(handle);
    }

    /// Envolver una tarea para que al dispararse suelte su propio handle
    fn wrap(&self, id: TimerId, task: Box<dyn FnOnce()>) -> impl FnOnce() + 'static {
        let live = Rc::downgrade(&self.live);
        move || {
            if let Some(live) = live.upgrade() {
                let fired = live.borrow_mut().remove(&id);
                drop(fired);
            }
            task();
        }
    }

    pub fn len(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.borrow().is_empty()
    }
}

/// Temporizadores sobre gloo-timers; el drop de `Timeout` llama a clearTimeout
#[derive(Default)]
pub struct GlooScheduler {
    handles: TimerHandles<Timeout>,
}

impl Scheduler for GlooScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        let id = self.handles.next_id();
        let handle = Timeout::new(delay_ms, self.handles.wrap(id, task));
        self.handles.insert(id, handle);
        id
    }

    fn cancel(&self, id: TimerId) {
        self.handles.release(id);
    }
}

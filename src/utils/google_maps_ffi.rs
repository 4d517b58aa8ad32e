// ============================================================================
// GOOGLE MAPS FFI - Bindings de la API JS de Google Maps
// ============================================================================
// Solo wrappers para clases y funciones JS - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    // google.maps.Map
    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = Map)]
    #[derive(Debug, Clone)]
    pub type GoogleMap;

    #[wasm_bindgen(catch, constructor, js_namespace = ["google", "maps"], js_class = "Map")]
    pub fn new(container: &web_sys::Element, options: &JsValue) -> Result<GoogleMap, JsValue>;

    #[wasm_bindgen(method, js_name = setCenter)]
    pub fn set_center(this: &GoogleMap, center: &JsValue);

    #[wasm_bindgen(method, js_name = setZoom)]
    pub fn set_zoom(this: &GoogleMap, zoom: f64);

    #[wasm_bindgen(method, js_name = getZoom)]
    pub fn get_zoom(this: &GoogleMap) -> Option<f64>;

    #[wasm_bindgen(method, js_name = fitBounds)]
    pub fn fit_bounds(this: &GoogleMap, bounds: &JsValue);

    // google.maps.Marker
    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = Marker)]
    #[derive(Debug, Clone)]
    pub type GoogleMarker;

    #[wasm_bindgen(catch, constructor, js_namespace = ["google", "maps"], js_class = "Marker")]
    pub fn new(options: &JsValue) -> Result<GoogleMarker, JsValue>;

    #[wasm_bindgen(method, js_name = setMap)]
    pub fn set_map(this: &GoogleMarker, map: &JsValue);

    #[wasm_bindgen(method, js_name = setAnimation)]
    pub fn set_animation(this: &GoogleMarker, animation: &JsValue);

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &GoogleMarker, event: &str, handler: &js_sys::Function) -> JsValue;

    // google.maps.event
    #[wasm_bindgen(js_namespace = ["google", "maps", "event"], js_name = addListenerOnce)]
    pub fn add_listener_once(instance: &JsValue, event: &str, handler: &js_sys::Function) -> JsValue;
}

/// Leer una propiedad anidada de `window` (p.ej. ["google", "maps"])
fn global_path(path: &[&str]) -> Option<JsValue> {
    let mut current: JsValue = web_sys::window()?.into();
    for key in path {
        current = js_sys::Reflect::get(&current, &JsValue::from_str(key)).ok()?;
        if current.is_undefined() || current.is_null() {
            return None;
        }
    }
    Some(current)
}

/// ¿Está cargado `window.google.maps`?
pub fn maps_namespace_ready() -> bool {
    global_path(&["google", "maps", "Map"]).is_some()
}

/// Constante de la API, p.ej. `maps_constant("SymbolPath", "CIRCLE")`
pub fn maps_constant(group: &str, name: &str) -> JsValue {
    global_path(&["google", "maps", group, name]).unwrap_or(JsValue::UNDEFINED)
}

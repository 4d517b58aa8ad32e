// ============================================================================
// EVENT HANDLING - Sistema de eventos
// ============================================================================
// Listeners sobre elementos del DOM: al destruirse el elemento el navegador
// limpia sus listeners, por eso closure.forget() es seguro aquí.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, Event, MouseEvent};

use crate::dom::{element_value, is_checked};

pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// "change" de un `<input>`/`<select>`, entrega el valor actual
pub fn on_change<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(String) + 'static,
{
    let target = element.clone();
    let closure = Closure::wrap(Box::new(move |_event: Event| {
        if let Some(value) = element_value(&target) {
            handler(value);
        }
    }) as Box<dyn FnMut(Event)>);
    element.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// "change" de un checkbox, entrega si quedó marcado
pub fn on_toggle<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(bool) + 'static,
{
    let target = element.clone();
    let closure = Closure::wrap(Box::new(move |_event: Event| {
        handler(is_checked(&target));
    }) as Box<dyn FnMut(Event)>);
    element.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

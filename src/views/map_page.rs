// ============================================================================
// MAP PAGE VIEW - Mapa de vendedores con filtros y vendedor seleccionado
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, text_element, ElementBuilder};
use crate::services::maps_loader;
use crate::state::{AppState, MapViewStatus, Page};
use crate::utils::constants::MAP_CONTAINER_ID;
use crate::views::filter_bar::render_filter_bar;
use crate::views::vendor_list::render_vendor_list;

/// Contenedor del mapa: se crea una vez y se reutiliza entre renders
fn map_container(state: &AppState) -> Result<Element, JsValue> {
    if let Some(container) = state.map_container.borrow().as_ref() {
        return Ok(container.clone());
    }
    let container = ElementBuilder::new("div")?
        .id(MAP_CONTAINER_ID)
        .class("map-canvas")
        .build();
    *state.map_container.borrow_mut() = Some(container.clone());
    Ok(container)
}

fn render_status_overlay(state: &AppState, status: &MapViewStatus) -> Result<Option<Element>, JsValue> {
    let overlay = match status {
        MapViewStatus::Ready => return Ok(None),
        MapViewStatus::Loading { api_loaded } => {
            let text = if *api_loaded { "Initializing map..." } else { "Loading API..." };
            ElementBuilder::new("div")?
                .class("map-overlay map-loading")
                .child(text_element("div", "spinner", "")?)?
                .child(text_element("p", "", text)?)?
                .build()
        }
        MapViewStatus::Failed(message) => {
            let retry = text_element("button", "btn-retry", "Retry")?;
            let state = state.clone();
            on_click(&retry, move |_| {
                let vm = state.map.borrow().clone();
                match (vm, maps_loader()) {
                    (Some(vm), Some(loader)) => vm.retry(&loader),
                    _ => log::warn!("⚠️ [MAP] Retry sin mapa o loader inicializado"),
                }
                state.notify_subscribers();
            })?;
            ElementBuilder::new("div")?
                .class("map-overlay map-error")
                .child(text_element("p", "error-message", message)?)?
                .child(retry)?
                .build()
        }
    };
    Ok(Some(overlay))
}

fn render_selected_panel(state: &AppState) -> Result<Option<Element>, JsValue> {
    let Some(vendor) = state.selected_vendor() else {
        return Ok(None);
    };

    let close = text_element("button", "btn-close", "×")?;
    {
        let state = state.clone();
        on_click(&close, move |_| state.select_vendor(None))?;
    }
    let directions = ElementBuilder::new("a")?
        .class("btn-directions")
        .attr("href", &vendor.directions_url())?
        .attr("target", "_blank")?
        .attr("rel", "noopener")?
        .text("Get directions")
        .build();

    let panel = ElementBuilder::new("div")?
        .class("selected-vendor")
        .child(close)?
        .child(text_element("h3", "", &vendor.name)?)?
        .child(text_element("p", "", &vendor.status_label())?)?
        .child(text_element("p", "", &vendor.location)?)?
        .child(directions)?
        .build();
    Ok(Some(panel))
}

/// Renderizar la página del mapa
pub fn render_map_page(state: &AppState) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("page page-map").build();
    append_child(&page, &render_filter_bar(state, Page::Map)?)?;

    let status = state
        .map
        .borrow()
        .as_ref()
        .map(|vm| vm.view_status())
        .unwrap_or(MapViewStatus::Loading { api_loaded: false });

    let area = ElementBuilder::new("div")?
        .class("map-area")
        .child(map_container(state)?)?
        .build();
    if let Some(overlay) = render_status_overlay(state, &status)? {
        area.append_child(&overlay)?;
    }
    if status == MapViewStatus::Ready {
        let locate = text_element("button", "btn-locate", "📍 My location")?;
        let state = state.clone();
        on_click(&locate, move |_| {
            let vm = state.map.borrow().clone();
            if let Some(vm) = vm {
                vm.locate_user();
            }
        })?;
        area.append_child(&locate)?;
    }
    page.append_child(&area)?;

    if let Some(panel) = render_selected_panel(state)? {
        page.append_child(&panel)?;
    }
    append_child(&page, &render_vendor_list(state, Page::Map)?)?;

    Ok(page)
}

/// Pasar la lista visible y la selección al mapa (tras adjuntar el DOM)
pub fn sync_map(state: &AppState) {
    let Some(vm) = state.map.borrow().clone() else {
        return;
    };
    let visible = state.map_page.borrow().visible();
    vm.set_vendors(visible);
    vm.set_selected(state.selected_vendor());
}

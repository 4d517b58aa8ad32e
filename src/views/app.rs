// ============================================================================
// APP VIEW - Cabecera con selector de páginas + página activa
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, text_element, ElementBuilder};
use crate::state::{AppState, Page};
use crate::views::{render_favorites_page, render_filter_bar, render_map_page, render_vendor_list};

fn render_header(state: &AppState) -> Result<Element, JsValue> {
    let current = state.current_page();
    let nav = ElementBuilder::new("nav")?.class("page-nav").build();

    for page in Page::ALL {
        let class = if page == current { "nav-link active" } else { "nav-link" };
        let button = text_element("button", class, page.label())?;
        let state = state.clone();
        on_click(&button, move |_| state.set_page(page))?;
        nav.append_child(&button)?;
    }

    Ok(ElementBuilder::new("header")?
        .class("app-header")
        .child(text_element("h1", "app-title", "Local Vendors")?)?
        .child(nav)?
        .build())
}

fn render_list_page(state: &AppState, page: Page) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class(&format!("page page-{}", page.label().to_lowercase()))
        .child(render_filter_bar(state, page)?)?
        .child(render_vendor_list(state, page)?)?
        .build())
}

/// Renderizar la app completa
pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let root = ElementBuilder::new("div")?
        .class("app-container")
        .child(render_header(state)?)?
        .build();

    if let Some(error) = state.load_error.borrow().as_ref() {
        append_child(&root, &text_element("div", "error-message", error)?)?;
        return Ok(root);
    }

    let page = match state.current_page() {
        Page::Discover | Page::Vendors => render_list_page(state, state.current_page())?,
        Page::Map => render_map_page(state)?,
        Page::Favorites => render_favorites_page(state)?,
    };
    root.append_child(&page)?;

    Ok(root)
}

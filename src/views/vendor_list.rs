// ============================================================================
// VENDOR LIST VIEW - Tarjetas de vendedores
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_click, text_element, ElementBuilder};
use crate::models::Vendor;
use crate::state::{AppState, Page};

/// Tarjeta de un vendedor
pub fn render_vendor_card(state: &AppState, vendor: &Vendor, is_selected: bool) -> Result<Element, JsValue> {
    let mut classes = vec!["vendor-card"];
    if !vendor.is_open {
        classes.push("closed");
    }
    if is_selected {
        classes.push("selected");
    }

    let card = ElementBuilder::new("div")?
        .class(&classes.join(" "))
        .attr("data-vendor-id", &vendor.id)?
        .build();

    // Cabecera
    let mut title = vendor.name.clone();
    if vendor.verified {
        title.push_str(" ✓");
    }
    let favorite_btn = text_element(
        "button",
        "btn-favorite",
        if vendor.is_favorite { "♥" } else { "♡" },
    )?;
    {
        let state = state.clone();
        let vendor_id = vendor.id.clone();
        on_click(&favorite_btn, move |e| {
            e.stop_propagation();
            state.toggle_favorite(&vendor_id);
        })?;
    }
    let header = ElementBuilder::new("div")?
        .class("vendor-header")
        .child(text_element("h3", "vendor-name", &title)?)?
        .child(favorite_btn)?
        .build();
    card.append_child(&header)?;

    let meta = format!(
        "{} · ★ {:.1} ({}) · {} · {}",
        vendor.category.label(),
        vendor.clamped_rating(),
        vendor.review_count,
        vendor.price_range.symbol(),
        vendor.distance
    );
    append_child(&card, &text_element("div", "vendor-meta", &meta)?)?;
    append_child(&card, &text_element("p", "vendor-description", &vendor.description)?)?;
    append_child(&card, &text_element(
        "div",
        if vendor.is_open { "vendor-status open" } else { "vendor-status" },
        &vendor.status_label(),
    )?)?;
    append_child(&card, &text_element("div", "vendor-location", &vendor.location)?)?;

    if !vendor.specialties.is_empty() {
        let tags = ElementBuilder::new("div")?.class("vendor-specialties").build();
        for specialty in &vendor.specialties {
            append_child(&tags, &text_element("span", "tag", specialty)?)?;
        }
        card.append_child(&tags)?;
    }

    let actions = ElementBuilder::new("div")?.class("vendor-actions").build();
    let directions = ElementBuilder::new("a")?
        .class("btn-directions")
        .attr("href", &vendor.directions_url())?
        .attr("target", "_blank")?
        .attr("rel", "noopener")?
        .text("Directions")
        .build();
    actions.append_child(&directions)?;
    if let Some(phone) = &vendor.phone {
        let call = ElementBuilder::new("a")?
            .class("btn-call")
            .attr("href", &format!("tel:{}", phone))?
            .text(phone)
            .build();
        actions.append_child(&call)?;
    }
    if let Some(website) = &vendor.website {
        let site = ElementBuilder::new("a")?
            .class("btn-website")
            .attr("href", website)?
            .attr("target", "_blank")?
            .attr("rel", "noopener")?
            .text("Website")
            .build();
        actions.append_child(&site)?;
    }
    card.append_child(&actions)?;

    // Click en la tarjeta = seleccionar (centra el mapa)
    {
        let state = state.clone();
        let vendor = vendor.clone();
        on_click(&card, move |_| {
            state.select_vendor(Some(vendor.clone()));
        })?;
    }

    Ok(card)
}

/// Lista filtrada y ordenada de una página
pub fn render_vendor_list(state: &AppState, page: Page) -> Result<Element, JsValue> {
    let Some(list) = state.list_for(page) else {
        return Err(JsValue::from_str("page without vendor list"));
    };
    let visible = list.borrow().visible();
    let selected_id = state.selected_vendor().map(|v| v.id);

    let container = ElementBuilder::new("div")?.class("vendor-list").build();
    if visible.is_empty() {
        append_child(&container, &text_element(
            "div",
            "empty-state",
            "No vendors match your filters",
        )?)?;
        return Ok(container);
    }

    for vendor in &visible {
        let is_selected = selected_id.as_deref() == Some(vendor.id.as_str());
        append_child(&container, &render_vendor_card(state, vendor, is_selected)?)?;
    }
    Ok(container)
}

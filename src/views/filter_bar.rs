// ============================================================================
// FILTER BAR VIEW - Búsqueda, categoría, precio, abiertos y orden
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_change, on_click, on_toggle, text_element, ElementBuilder};
use crate::models::{Category, CategoryFilter, PriceTier, SortKey};
use crate::state::{AppState, Page};
use crate::utils::constants::{DISTANCE_MAX_MILES, DISTANCE_MIN_MILES, DISTANCE_STEP_MILES};

fn checkbox(label: &str, checked: bool) -> Result<(Element, Element), JsValue> {
    let input = ElementBuilder::new("input")?
        .attr("type", "checkbox")?
        .flag("checked", checked)?
        .build();
    let wrapper = ElementBuilder::new("label")?
        .class("filter-check")
        .child(input.clone())?
        .child(text_element("span", "", label)?)?
        .build();
    Ok((wrapper, input))
}

fn option(value: &str, label: &str, selected: bool) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("option")?
        .attr("value", value)?
        .flag("selected", selected)?
        .text(label)
        .build())
}

/// Barra de filtros de una página de lista
pub fn render_filter_bar(state: &AppState, page: Page) -> Result<Element, JsValue> {
    let Some(list) = state.list_for(page) else {
        return Err(JsValue::from_str("page without vendor list"));
    };
    let (controls, total, shown) = {
        let list = list.borrow();
        (list.controls.clone(), list.vendors().len(), list.visible().len())
    };
    let filter = &controls.filter;

    let bar = ElementBuilder::new("div")?.class("filter-bar").build();

    // Búsqueda
    let search = ElementBuilder::new("input")?
        .class("filter-search")
        .attr("type", "search")?
        .attr("placeholder", "Search vendors, food, services...")?
        .attr("value", &filter.query)?
        .build();
    {
        let state = state.clone();
        on_change(&search, move |value| {
            state.update_list(page, |list| list.set_query(&value));
        })?;
    }
    bar.append_child(&search)?;

    // Categoría: selección múltiple en el mapa, única en el resto
    match &filter.category {
        CategoryFilter::AnyOf(selected) => {
            let group = ElementBuilder::new("div")?.class("filter-categories").build();
            for category in Category::ALL {
                let (wrapper, input) = checkbox(category.label(), selected.contains(&category))?;
                let state = state.clone();
                on_toggle(&input, move |checked| {
                    state.update_list(page, |list| list.toggle_category(category, checked));
                })?;
                group.append_child(&wrapper)?;
            }
            bar.append_child(&group)?;
        }
        current => {
            let select = ElementBuilder::new("select")?.class("filter-category").build();
            append_child(&select, &option("all", "All Categories", *current == CategoryFilter::All)?)?;
            for category in Category::ALL {
                let selected = *current == CategoryFilter::One(category);
                append_child(&select, &option(category.as_str(), category.label(), selected)?)?;
            }
            let state = state.clone();
            on_change(&select, move |value| {
                let category = Category::parse(&value)
                    .map(CategoryFilter::One)
                    .unwrap_or(CategoryFilter::All);
                state.update_list(page, |list| list.set_category(category));
            })?;
            bar.append_child(&select)?;
        }
    }

    // Precio
    let prices = ElementBuilder::new("div")?.class("filter-prices").build();
    for tier in PriceTier::ALL {
        let (wrapper, input) = checkbox(tier.symbol(), filter.price_tiers.contains(&tier))?;
        let state = state.clone();
        on_toggle(&input, move |checked| {
            state.update_list(page, |list| list.set_price_tier(tier, checked));
        })?;
        prices.append_child(&wrapper)?;
    }
    bar.append_child(&prices)?;

    let (open_wrapper, open_input) = checkbox("Open now", filter.open_only)?;
    {
        let state = state.clone();
        on_toggle(&open_input, move |checked| {
            state.update_list(page, |list| list.set_open_only(checked));
        })?;
    }
    bar.append_child(&open_wrapper)?;

    if page == Page::Vendors {
        let (verified_wrapper, verified_input) = checkbox("Verified only", filter.verified_only)?;
        let state = state.clone();
        on_toggle(&verified_input, move |checked| {
            state.update_list(page, |list| list.set_verified_only(checked));
        })?;
        bar.append_child(&verified_wrapper)?;
    }

    // Distancia máxima (solo páginas con límite propio)
    if let (Some(_), Some(current)) = (filter.default_max_distance, filter.max_distance) {
        let slider = ElementBuilder::new("input")?
            .class("filter-distance-range")
            .attr("type", "range")?
            .attr("min", &DISTANCE_MIN_MILES.to_string())?
            .attr("max", &DISTANCE_MAX_MILES.to_string())?
            .attr("step", &DISTANCE_STEP_MILES.to_string())?
            .attr("value", &current.to_string())?
            .build();
        {
            let state = state.clone();
            on_change(&slider, move |value| match value.parse::<f64>() {
                Ok(miles) => state.update_list(page, |list| {
                    list.set_max_distance(miles);
                }),
                Err(_) => log::warn!("⚠️ [FILTER] Distancia inválida: {}", value),
            })?;
        }
        let distance = ElementBuilder::new("label")?
            .class("filter-distance")
            .child(text_element("span", "", &format!("Distance: {:.1} mi", current))?)?
            .child(slider)?
            .build();
        bar.append_child(&distance)?;
    }

    // Orden
    if let Some(active) = controls.sort {
        let select = ElementBuilder::new("select")?.class("filter-sort").build();
        for key in &controls.sort_options {
            append_child(&select, &option(key.as_str(), key.label(), *key == active)?)?;
        }
        let state = state.clone();
        on_change(&select, move |value| {
            if let Some(key) = SortKey::parse(&value) {
                state.update_list(page, |list| {
                    list.set_sort(key);
                });
            }
        })?;
        bar.append_child(&select)?;
    }

    // Resumen + limpiar
    let summary = text_element(
        "span",
        "filter-summary",
        &format!("Showing {} of {} vendors", shown, total),
    )?;
    bar.append_child(&summary)?;

    if filter.has_active_filters() {
        let clear = text_element("button", "btn-clear-filters", "Clear filters")?;
        let state = state.clone();
        on_click(&clear, move |_| {
            state.update_list(page, |list| list.clear_filters());
        })?;
        bar.append_child(&clear)?;
    }

    Ok(bar)
}

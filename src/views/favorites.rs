// ============================================================================
// FAVORITES VIEW - Estadísticas, lista y exportación de favoritos
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, on_change, on_click, text_element, ElementBuilder};
use crate::models::{Category, CategoryFilter, FavoriteSortKey, FavoriteVendor};
use crate::state::AppState;
use crate::utils::constants::FAVORITES_EXPORT_FILENAME;
use crate::utils::download::download_json;

fn render_stats(state: &AppState) -> Result<Element, JsValue> {
    let stats = state.favorites.borrow().stats();
    let cells = [
        ("Favorites", stats.total.to_string()),
        ("Visited", stats.visited.to_string()),
        ("Notifications", stats.with_notifications.to_string()),
        ("Avg rating", stats.average_rating),
    ];

    let row = ElementBuilder::new("div")?.class("favorites-stats").build();
    for (label, value) in cells {
        let cell = ElementBuilder::new("div")?
            .class("stat")
            .child(text_element("strong", "stat-value", &value)?)?
            .child(text_element("span", "stat-label", label)?)?
            .build();
        row.append_child(&cell)?;
    }
    Ok(row)
}

fn render_controls(state: &AppState) -> Result<Element, JsValue> {
    let (query, category, sort) = {
        let favorites = state.favorites.borrow();
        (favorites.query.clone(), favorites.category.clone(), favorites.sort)
    };

    let search = ElementBuilder::new("input")?
        .class("filter-search")
        .attr("type", "search")?
        .attr("placeholder", "Search favorites or tags...")?
        .attr("value", &query)?
        .build();
    {
        let state = state.clone();
        on_change(&search, move |value| state.update_favorites(|f| f.query = value))?;
    }

    let category_select = ElementBuilder::new("select")?.class("filter-category").build();
    category_select.append_child(
        &ElementBuilder::new("option")?
            .attr("value", "all")?
            .flag("selected", category == CategoryFilter::All)?
            .text("All Categories")
            .build(),
    )?;
    for c in Category::ALL {
        category_select.append_child(
            &ElementBuilder::new("option")?
                .attr("value", c.as_str())?
                .flag("selected", category == CategoryFilter::One(c))?
                .text(c.label())
                .build(),
        )?;
    }
    {
        let state = state.clone();
        on_change(&category_select, move |value| {
            let category = Category::parse(&value)
                .map(CategoryFilter::One)
                .unwrap_or(CategoryFilter::All);
            state.update_favorites(|f| f.category = category);
        })?;
    }

    let sort_select = ElementBuilder::new("select")?.class("filter-sort").build();
    for key in FavoriteSortKey::ALL {
        sort_select.append_child(
            &ElementBuilder::new("option")?
                .attr("value", key.as_str())?
                .flag("selected", key == sort)?
                .text(key.label())
                .build(),
        )?;
    }
    {
        let state = state.clone();
        on_change(&sort_select, move |value| {
            if let Some(key) = FavoriteSortKey::parse(&value) {
                state.update_favorites(|f| f.sort = key);
            }
        })?;
    }

    let export = text_element("button", "btn-export", "Export")?;
    {
        let state = state.clone();
        on_click(&export, move |_| {
            let json = state.favorites.borrow().export_json();
            match json {
                Ok(json) => {
                    if let Err(e) = download_json(FAVORITES_EXPORT_FILENAME, &json) {
                        log::error!("❌ Error descargando favoritos: {:?}", e);
                    }
                }
                Err(e) => log::error!("❌ Error serializando favoritos: {}", e),
            }
        })?;
    }

    Ok(ElementBuilder::new("div")?
        .class("filter-bar")
        .child(search)?
        .child(category_select)?
        .child(sort_select)?
        .child(export)?
        .build())
}

fn render_favorite_card(state: &AppState, favorite: &FavoriteVendor) -> Result<Element, JsValue> {
    let vendor = &favorite.vendor;

    let mut visits = format!("Added {}", favorite.favorite_date.format("%b %-d, %Y"));
    if let Some(last) = favorite.last_visited {
        visits.push_str(&format!(
            " · Last visit {} · {} visits",
            last.format("%b %-d, %Y"),
            favorite.visit_count
        ));
    }

    let notifications = text_element(
        "button",
        "btn-notifications",
        if favorite.notifications { "🔔 On" } else { "🔕 Off" },
    )?;
    {
        let state = state.clone();
        let vendor_id = vendor.id.clone();
        on_click(&notifications, move |_| {
            state.update_favorites(|f| {
                f.toggle_notifications(&vendor_id);
            });
        })?;
    }

    let remove = text_element("button", "btn-remove", "Remove")?;
    {
        let state = state.clone();
        let vendor_id = vendor.id.clone();
        on_click(&remove, move |_| {
            state.update_favorites(|f| {
                f.remove(&vendor_id);
            });
        })?;
    }

    let tags = ElementBuilder::new("div")?.class("favorite-tags").build();
    for tag in &favorite.tags {
        append_child(&tags, &text_element("span", "tag", tag)?)?;
    }

    Ok(ElementBuilder::new("div")?
        .class("vendor-card favorite-card")
        .attr("data-vendor-id", &vendor.id)?
        .child(text_element("h3", "vendor-name", &vendor.name)?)?
        .child(text_element(
            "div",
            "vendor-meta",
            &format!(
                "{} · ★ {:.1} · {} · {}",
                vendor.category.label(),
                vendor.clamped_rating(),
                vendor.distance,
                vendor.status_label()
            ),
        )?)?
        .child(text_element("div", "favorite-visits", &visits)?)?
        .child(tags)?
        .child(notifications)?
        .child(remove)?
        .build())
}

/// Renderizar la página de favoritos
pub fn render_favorites_page(state: &AppState) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?
        .class("page page-favorites")
        .child(render_stats(state)?)?
        .child(render_controls(state)?)?
        .build();

    let visible = state.favorites.borrow().visible();
    let list = ElementBuilder::new("div")?.class("vendor-list").build();
    if visible.is_empty() {
        append_child(&list, &text_element("div", "empty-state", "No favorites found")?)?;
    }
    for favorite in &visible {
        append_child(&list, &render_favorite_card(state, favorite)?)?;
    }
    page.append_child(&list)?;

    Ok(page)
}

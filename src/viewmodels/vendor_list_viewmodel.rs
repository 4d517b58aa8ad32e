// ============================================================================
// VENDOR LIST VIEWMODEL - Filtro y orden de las páginas de lista
// ============================================================================
// La vista filtrada se recalcula entera en cada cambio de entrada.
// ============================================================================

use std::cmp::Ordering;

use crate::models::{Category, CategoryFilter, ListControls, PriceTier, SortKey, Vendor, VendorFilter};
use crate::utils::constants::{DISTANCE_MAX_MILES, DISTANCE_MIN_MILES};

/// Búsqueda sin distinguir mayúsculas en nombre, descripción, especialidades
/// y etiquetas extra. Una consulta vacía deja pasar todo.
pub fn matches_query(vendor: &Vendor, query: &str, extra_tags: &[String]) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    vendor.name.to_lowercase().contains(&query)
        || vendor.description.to_lowercase().contains(&query)
        || vendor
            .specialties
            .iter()
            .chain(extra_tags.iter())
            .any(|tag| tag.to_lowercase().contains(&query))
}

/// ¿Pasa el vendedor todos los predicados del filtro?
pub fn matches(vendor: &Vendor, filter: &VendorFilter) -> bool {
    if !matches_query(vendor, &filter.query, &[]) {
        return false;
    }
    if !filter.category.accepts(vendor.category) {
        return false;
    }
    if !filter.price_tiers.is_empty() && !filter.price_tiers.contains(&vendor.price_range) {
        return false;
    }
    if filter.open_only && !vendor.is_open {
        return false;
    }
    if filter.verified_only && !vendor.verified {
        return false;
    }
    if let Some(max) = filter.max_distance {
        // Sin distancia legible no se puede garantizar el límite
        return vendor.distance_value().is_some_and(|d| d <= max);
    }
    true
}

/// Los valores ausentes van siempre al final
fn cmp_present_first<T, F>(a: Option<T>, b: Option<T>, cmp: F) -> Ordering
where
    F: FnOnce(T, T) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare(a: &Vendor, b: &Vendor, key: SortKey) -> Ordering {
    match key {
        SortKey::Rating => b.clamped_rating().total_cmp(&a.clamped_rating()),
        SortKey::Reviews => b.review_count.cmp(&a.review_count),
        SortKey::Distance => {
            cmp_present_first(a.distance_value(), b.distance_value(), |a, b| a.total_cmp(&b))
        }
        SortKey::Newest => cmp_present_first(a.joined_date, b.joined_date, |a, b| b.cmp(&a)),
        SortKey::Alphabetical => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

/// Orden estable por la clave dada
pub fn sort_vendors(vendors: &mut [Vendor], key: SortKey) {
    vendors.sort_by(|a, b| compare(a, b, key));
}

/// Filtrar y ordenar según los controles de la página
pub fn visible_vendors(vendors: &[Vendor], controls: &ListControls) -> Vec<Vendor> {
    let mut visible: Vec<Vendor> = vendors
        .iter()
        .filter(|v| matches(v, &controls.filter))
        .cloned()
        .collect();
    if let Some(key) = controls.sort {
        sort_vendors(&mut visible, key);
    }
    visible
}

/// Invertir el flag de favorito de un único vendedor
pub fn toggle_favorite(vendors: &mut [Vendor], vendor_id: &str) -> bool {
    match vendors.iter_mut().find(|v| v.id == vendor_id) {
        Some(vendor) => {
            vendor.is_favorite = !vendor.is_favorite;
            true
        }
        None => false,
    }
}

/// Estado de una página de lista (Discover, Vendors o Map)
#[derive(Debug, Clone, PartialEq)]
pub struct VendorListViewModel {
    vendors: Vec<Vendor>,
    pub controls: ListControls,
}

impl VendorListViewModel {
    pub fn new(vendors: Vec<Vendor>, controls: ListControls) -> Self {
        Self { vendors, controls }
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    pub fn visible(&self) -> Vec<Vendor> {
        visible_vendors(&self.vendors, &self.controls)
    }

    pub fn find(&self, vendor_id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == vendor_id)
    }

    pub fn set_query(&mut self, query: &str) {
        self.controls.filter.query = query.to_string();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.controls.filter.category = category;
    }

    /// Checkbox de categoría (página del mapa)
    pub fn toggle_category(&mut self, category: Category, checked: bool) {
        self.controls.filter.category.toggle(category, checked);
    }

    pub fn set_price_tier(&mut self, tier: PriceTier, checked: bool) {
        self.controls.filter.set_price_tier(tier, checked);
    }

    pub fn set_open_only(&mut self, open_only: bool) {
        self.controls.filter.open_only = open_only;
    }

    pub fn set_verified_only(&mut self, verified_only: bool) {
        self.controls.filter.verified_only = verified_only;
    }

    /// Umbral del control de distancia, acotado a su rango
    pub fn set_max_distance(&mut self, miles: f64) -> bool {
        if !miles.is_finite() {
            return false;
        }
        self.controls.filter.max_distance = Some(miles.clamp(DISTANCE_MIN_MILES, DISTANCE_MAX_MILES));
        true
    }

    /// Solo acepta claves ofrecidas por la página
    pub fn set_sort(&mut self, key: SortKey) -> bool {
        if self.controls.sort_options.contains(&key) {
            self.controls.sort = Some(key);
            true
        } else {
            false
        }
    }

    pub fn clear_filters(&mut self) {
        self.controls.filter.clear();
    }

    pub fn toggle_favorite(&mut self, vendor_id: &str) -> bool {
        toggle_favorite(&mut self.vendors, vendor_id)
    }
}

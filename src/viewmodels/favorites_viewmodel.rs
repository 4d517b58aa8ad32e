// ============================================================================
// FAVORITES VIEWMODEL - Lista de favoritos, estadísticas y exportación
// ============================================================================

use std::cmp::Ordering;

use crate::models::{CategoryFilter, FavoriteExport, FavoriteSortKey, FavoriteVendor, FavoritesStats};
use super::vendor_list_viewmodel::{compare, matches_query};
use crate::models::SortKey;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FavoritesViewModel {
    favorites: Vec<FavoriteVendor>,
    pub query: String,
    pub category: CategoryFilter,
    pub sort: FavoriteSortKey,
}

fn compare_favorites(a: &FavoriteVendor, b: &FavoriteVendor, key: FavoriteSortKey) -> Ordering {
    match key {
        FavoriteSortKey::Recent => b.favorite_date.cmp(&a.favorite_date),
        FavoriteSortKey::Visited => match (a.last_visited, b.last_visited) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        FavoriteSortKey::Rating => compare(&a.vendor, &b.vendor, SortKey::Rating),
        FavoriteSortKey::Distance => compare(&a.vendor, &b.vendor, SortKey::Distance),
        FavoriteSortKey::Alphabetical => compare(&a.vendor, &b.vendor, SortKey::Alphabetical),
    }
}

impl FavoritesViewModel {
    pub fn new(favorites: Vec<FavoriteVendor>) -> Self {
        Self {
            favorites,
            ..Self::default()
        }
    }

    pub fn favorites(&self) -> &[FavoriteVendor] {
        &self.favorites
    }

    /// Favoritos filtrados (la búsqueda incluye etiquetas) y ordenados
    pub fn visible(&self) -> Vec<FavoriteVendor> {
        let mut visible: Vec<FavoriteVendor> = self
            .favorites
            .iter()
            .filter(|f| matches_query(&f.vendor, &self.query, &f.tags))
            .filter(|f| self.category.accepts(f.vendor.category))
            .cloned()
            .collect();
        visible.sort_by(|a, b| compare_favorites(a, b, self.sort));
        visible
    }

    pub fn remove(&mut self, vendor_id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|f| f.vendor.id != vendor_id);
        let removed = self.favorites.len() != before;
        if removed {
            log::info!("💔 Favorito {} eliminado", vendor_id);
        }
        removed
    }

    pub fn toggle_notifications(&mut self, vendor_id: &str) -> bool {
        match self.favorites.iter_mut().find(|f| f.vendor.id == vendor_id) {
            Some(favorite) => {
                favorite.notifications = !favorite.notifications;
                true
            }
            None => false,
        }
    }

    pub fn stats(&self) -> FavoritesStats {
        let total = self.favorites.len();
        let average_rating = if total == 0 {
            "0".to_string()
        } else {
            let sum: f64 = self.favorites.iter().map(|f| f.vendor.clamped_rating()).sum();
            format!("{:.1}", sum / total as f64)
        };

        FavoritesStats {
            total,
            visited: self.favorites.iter().filter(|f| f.last_visited.is_some()).count(),
            with_notifications: self.favorites.iter().filter(|f| f.notifications).count(),
            average_rating,
        }
    }

    /// JSON con sangría de todos los favoritos (sin filtrar)
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        let records: Vec<FavoriteExport> = self.favorites.iter().map(FavoriteExport::from).collect();
        serde_json::to_string_pretty(&records)
    }
}

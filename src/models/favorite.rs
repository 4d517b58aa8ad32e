use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::vendor::{Category, Vendor};

/// Vendedor guardado en favoritos con sus metadatos personales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteVendor {
    #[serde(flatten)]
    pub vendor: Vendor,
    pub favorite_date: NaiveDate,
    #[serde(default)]
    pub last_visited: Option<NaiveDate>,
    #[serde(default)]
    pub visit_count: u32,
    #[serde(default)]
    pub notifications: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Registro exportado (subconjunto desnormalizado, solo escritura)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteExport {
    pub name: String,
    pub category: Category,
    pub location: String,
    pub rating: f64,
    pub favorite_date: NaiveDate,
}

impl From<&FavoriteVendor> for FavoriteExport {
    fn from(favorite: &FavoriteVendor) -> Self {
        Self {
            name: favorite.vendor.name.clone(),
            category: favorite.vendor.category,
            location: favorite.vendor.location.clone(),
            rating: favorite.vendor.rating,
            favorite_date: favorite.favorite_date,
        }
    }
}

/// Estadísticas de la página de favoritos
#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesStats {
    pub total: usize,
    pub visited: usize,
    pub with_notifications: usize,
    /// Media con un decimal, "0" si no hay favoritos
    pub average_rating: String,
}

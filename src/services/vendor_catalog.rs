// ============================================================================
// VENDOR CATALOG - Datos de vendedores compilados en el binario
// ============================================================================

use std::collections::HashSet;

use crate::models::{FavoriteVendor, Vendor, MAX_RATING};

const VENDORS_JSON: &str = include_str!("../data/vendors.json");
const FAVORITES_JSON: &str = include_str!("../data/favorites.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid vendor data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate vendor id `{0}`")]
    DuplicateId(String),
}

fn ensure_unique<'a, I>(ids: I) -> Result<(), CatalogError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

/// Ratings fuera de [0, 5] se acotan (con aviso)
fn normalize_rating(vendor: &mut Vendor) {
    let clamped = vendor.clamped_rating();
    if clamped != vendor.rating {
        log::warn!(
            "⚠️ [CATALOG] Rating {} de '{}' fuera de [0, {}], se usa {}",
            vendor.rating,
            vendor.id,
            MAX_RATING,
            clamped
        );
        vendor.rating = clamped;
    }
}

pub fn parse_vendors(json: &str) -> Result<Vec<Vendor>, CatalogError> {
    let mut vendors: Vec<Vendor> = serde_json::from_str(json)?;
    ensure_unique(vendors.iter().map(|v| v.id.as_str()))?;
    vendors.iter_mut().for_each(normalize_rating);
    Ok(vendors)
}

pub fn parse_favorites(json: &str) -> Result<Vec<FavoriteVendor>, CatalogError> {
    let mut favorites: Vec<FavoriteVendor> = serde_json::from_str(json)?;
    ensure_unique(favorites.iter().map(|f| f.vendor.id.as_str()))?;
    for favorite in favorites.iter_mut() {
        normalize_rating(&mut favorite.vendor);
        favorite.vendor.is_favorite = true;
    }
    Ok(favorites)
}

/// Catálogo completo de vendedores
pub fn load_catalog() -> Result<Vec<Vendor>, CatalogError> {
    let vendors = parse_vendors(VENDORS_JSON)?;
    log::info!("📦 [CATALOG] {} vendedores cargados", vendors.len());
    Ok(vendors)
}

/// Favoritos guardados del usuario
pub fn load_favorites() -> Result<Vec<FavoriteVendor>, CatalogError> {
    let favorites = parse_favorites(FAVORITES_JSON)?;
    log::info!("❤️ [CATALOG] {} favoritos cargados", favorites.len());
    Ok(favorites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, PriceTier};
    use chrono::NaiveDate;

    #[test]
    fn bundled_catalog_is_valid() {
        let vendors = load_catalog().unwrap();
        assert_eq!(vendors.len(), 8);
        assert!(vendors.iter().all(|v| v.coordinates.is_valid()));
        assert!(vendors.iter().all(|v| (0.0..=5.0).contains(&v.rating)));

        let tacos = &vendors[0];
        assert_eq!(tacos.name, "Maria's Tacos");
        assert_eq!(tacos.category, Category::Food);
        assert_eq!(tacos.price_range, PriceTier::Low);
        assert_eq!(tacos.joined_date, NaiveDate::from_ymd_opt(2023, 1, 15));
        assert!(!tacos.is_favorite);
    }

    #[test]
    fn bundled_favorites_are_marked() {
        let favorites = load_favorites().unwrap();
        assert_eq!(favorites.len(), 3);
        assert!(favorites.iter().all(|f| f.vendor.is_favorite));
        assert_eq!(favorites[0].tags, vec!["morning coffee", "work break"]);
        assert_eq!(favorites[2].last_visited, None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            {"id":"1","name":"A","description":"","image":"","category":"food","rating":4,
             "reviewCount":1,"priceRange":"$","distance":"1 mi","isOpen":true,"location":"",
             "coordinates":{"lat":40.0,"lng":-73.0}},
            {"id":"1","name":"B","description":"","image":"","category":"retail","rating":3,
             "reviewCount":1,"priceRange":"$$","distance":"2 mi","isOpen":false,"location":"",
             "coordinates":{"lat":40.1,"lng":-73.1}}
        ]"#;
        assert!(matches!(parse_vendors(json), Err(CatalogError::DuplicateId(id)) if id == "1"));
    }

    #[test]
    fn unknown_category_is_a_parse_error() {
        let json = r#"[{"id":"1","name":"A","description":"","image":"","category":"toys","rating":4,
             "reviewCount":1,"priceRange":"$","distance":"1 mi","isOpen":true,"location":"",
             "coordinates":{"lat":40.0,"lng":-73.0}}]"#;
        assert!(matches!(parse_vendors(json), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn out_of_range_rating_is_clamped() {
        let json = r#"[{"id":"1","name":"A","description":"","image":"","category":"food","rating":7.5,
             "reviewCount":1,"priceRange":"$","distance":"1 mi","isOpen":true,"location":"",
             "coordinates":{"lat":40.0,"lng":-73.0}}]"#;
        let vendors = parse_vendors(json).unwrap();
        assert_eq!(vendors[0].rating, 5.0);
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Categoría de vendedor (conjunto cerrado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Drinks,
    Retail,
    Services,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Food,
        Category::Drinks,
        Category::Retail,
        Category::Services,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Drinks => "drinks",
            Category::Retail => "retail",
            Category::Services => "services",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Drinks => "Drinks",
            Category::Retail => "Retail",
            Category::Services => "Services",
        }
    }

    pub fn parse(value: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

/// Rango de precio ($, $$, $$$)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    #[serde(rename = "$")]
    Low,
    #[serde(rename = "$$")]
    Medium,
    #[serde(rename = "$$$")]
    High,
}

impl PriceTier {
    pub const ALL: [PriceTier; 3] = [PriceTier::Low, PriceTier::Medium, PriceTier::High];

    pub fn symbol(&self) -> &'static str {
        match self {
            PriceTier::Low => "$",
            PriceTier::Medium => "$$",
            PriceTier::High => "$$$",
        }
    }

    pub fn parse(value: &str) -> Option<PriceTier> {
        PriceTier::ALL.into_iter().find(|p| p.symbol() == value)
    }
}

/// Posición geográfica (mismo formato que un LatLngLiteral de Google Maps)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitud en [-90, 90] y longitud en [-180, 180], ambas finitas
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

pub const MAX_RATING: f64 = 5.0;

/// Vendedor del directorio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: Category,
    pub rating: f64,
    pub review_count: u32,
    pub price_range: PriceTier,
    /// Etiqueta libre, p.ej. "0.4 mi"
    pub distance: String,
    pub is_open: bool,
    #[serde(default)]
    pub open_until: Option<String>,
    pub location: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub specialties: Vec<String>,

    // Campos del directorio completo
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub joined_date: Option<NaiveDate>,
    #[serde(default)]
    pub website: Option<String>,
}

impl Vendor {
    /// Distancia numérica (primer número de la etiqueta)
    pub fn distance_value(&self) -> Option<f64> {
        parse_distance(&self.distance)
    }

    /// Rating acotado a [0, 5]; NaN se trata como 0
    pub fn clamped_rating(&self) -> f64 {
        if self.rating.is_nan() {
            0.0
        } else {
            self.rating.clamp(0.0, MAX_RATING)
        }
    }

    /// Enlace de indicaciones de Google Maps hacia el vendedor
    pub fn directions_url(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            self.coordinates.lat, self.coordinates.lng
        )
    }

    pub fn status_label(&self) -> String {
        match (&self.is_open, &self.open_until) {
            (true, Some(until)) => format!("Open until {}", until),
            (true, None) => "Open".to_string(),
            (false, _) => "Closed".to_string(),
        }
    }
}

/// Extrae el número inicial de una etiqueta de distancia ("1.3 mi" -> 1.3).
/// Devuelve None si no empieza por un número finito y no negativo.
pub fn parse_distance(label: &str) -> Option<f64> {
    let trimmed = label.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            '+' if idx == 0 => {}
            _ => break,
        }
        end = idx + ch.len_utf8();
    }

    if !seen_digit {
        return None;
    }

    trimmed[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_leading_distance_number() {
        assert_eq!(parse_distance("0.2 mi"), Some(0.2));
        assert_eq!(parse_distance("1.3 mi"), Some(1.3));
        assert_eq!(parse_distance("  12km"), Some(12.0));
        assert_eq!(parse_distance("3."), Some(3.0));
        assert_eq!(parse_distance(".5 mi"), Some(0.5));
        assert_eq!(parse_distance("1.2.3 mi"), Some(1.2));
    }

    #[test]
    fn rejects_unparseable_distance() {
        assert_eq!(parse_distance("nearby"), None);
        assert_eq!(parse_distance(""), None);
        assert_eq!(parse_distance("-1 mi"), None);
        assert_eq!(parse_distance(". mi"), None);
    }

    #[test]
    fn vendor_deserializes_from_fixture_format() {
        let json = r#"{
            "id": "2",
            "name": "Joe's Coffee Cart",
            "description": "Artisan coffee",
            "image": "https://example.com/coffee.jpg",
            "category": "drinks",
            "rating": 4.6,
            "reviewCount": 89,
            "priceRange": "$$",
            "distance": "0.4 mi",
            "isOpen": true,
            "openUntil": "2:00 PM",
            "location": "Central Park West & 66th St",
            "coordinates": { "lat": 40.7736, "lng": -73.9566 },
            "specialties": ["Espresso", "Cold Brew"],
            "joinedDate": "2021-11-08"
        }"#;

        let vendor: Vendor = serde_json::from_str(json).unwrap();
        assert_eq!(vendor.category, Category::Drinks);
        assert_eq!(vendor.price_range, PriceTier::Medium);
        assert_eq!(vendor.review_count, 89);
        assert!(!vendor.is_favorite);
        assert!(!vendor.verified);
        assert_eq!(vendor.joined_date, NaiveDate::from_ymd_opt(2021, 11, 8));
        assert_eq!(vendor.distance_value(), Some(0.4));
        assert_eq!(vendor.status_label(), "Open until 2:00 PM");
    }

    #[test]
    fn unknown_category_is_rejected() {
        let json = r#""furniture""#;
        assert!(serde_json::from_str::<Category>(json).is_err());
        assert!(serde_json::from_str::<PriceTier>(r#""$$$$""#).is_err());
    }

    #[test]
    fn coordinate_validation() {
        assert!(Coordinates::new(40.7, -73.9).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, 180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn directions_url_uses_coordinates() {
        let vendor: Vendor = serde_json::from_str(
            r#"{"id":"1","name":"A","description":"","image":"","category":"food",
                "rating":4.0,"reviewCount":1,"priceRange":"$","distance":"1 mi",
                "isOpen":false,"location":"x","coordinates":{"lat":40.5,"lng":-73.25}}"#,
        )
        .unwrap();
        assert_eq!(
            vendor.directions_url(),
            "https://www.google.com/maps/dir/?api=1&destination=40.5,-73.25"
        );
        assert_eq!(vendor.status_label(), "Closed");
    }
}

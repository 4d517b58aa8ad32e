use crate::models::{Coordinates, Vendor};
use crate::utils::constants::*;
use super::traits::MapError;

/// Descripción visual de un marcador circular
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: Coordinates,
    pub title: String,
    pub scale: f64,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub stroke_color: &'static str,
    pub stroke_weight: f64,
    /// Animación de caída al aparecer
    pub drop_in: bool,
}

impl MarkerSpec {
    /// Marcador de vendedor: color por categoría, opacidad reducida si está cerrado.
    /// Falla con coordenadas fuera de rango.
    pub fn for_vendor(vendor: &Vendor) -> Result<Self, MapError> {
        let position = vendor.coordinates;
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates {
                lat: position.lat,
                lng: position.lng,
            });
        }

        Ok(Self {
            position,
            title: vendor.name.clone(),
            scale: MARKER_SCALE,
            fill_color: category_color(vendor.category),
            fill_opacity: if vendor.is_open {
                MARKER_OPACITY_OPEN
            } else {
                MARKER_OPACITY_CLOSED
            },
            stroke_color: MARKER_STROKE_COLOR,
            stroke_weight: MARKER_STROKE_WEIGHT,
            drop_in: true,
        })
    }

    /// Marcador de la ubicación del usuario
    pub fn user_location(position: Coordinates) -> Self {
        Self {
            position,
            title: USER_MARKER_TITLE.to_string(),
            scale: USER_MARKER_SCALE,
            fill_color: USER_MARKER_COLOR,
            fill_opacity: 1.0,
            stroke_color: MARKER_STROKE_COLOR,
            stroke_weight: USER_MARKER_STROKE_WEIGHT,
            drop_in: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::testing::vendor;
    use crate::models::Category;

    #[test]
    fn vendor_marker_uses_category_palette() {
        let expected = [
            (Category::Food, "#ef4444"),
            (Category::Drinks, "#f59e0b"),
            (Category::Retail, "#8b5cf6"),
            (Category::Services, "#3b82f6"),
        ];
        for (category, color) in expected {
            let mut v = vendor("1", category, true);
            v.name = "Stand".to_string();
            let spec = MarkerSpec::for_vendor(&v).unwrap();
            assert_eq!(spec.fill_color, color);
            assert_eq!(spec.title, "Stand");
            assert_eq!(spec.stroke_color, "#ffffff");
            assert_eq!(spec.stroke_weight, 3.0);
        }
    }

    #[test]
    fn closed_vendor_is_dimmed() {
        let open = MarkerSpec::for_vendor(&vendor("1", Category::Food, true)).unwrap();
        let closed = MarkerSpec::for_vendor(&vendor("2", Category::Food, false)).unwrap();
        assert_eq!(open.fill_opacity, 1.0);
        assert_eq!(closed.fill_opacity, 0.6);
    }

    #[test]
    fn vendor_markers_drop_in_but_user_marker_does_not() {
        let spec = MarkerSpec::for_vendor(&vendor("1", Category::Drinks, false)).unwrap();
        assert!(spec.drop_in);
        assert!(!MarkerSpec::user_location(Coordinates::new(40.7, -73.9)).drop_in);
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        let mut v = vendor("1", Category::Retail, true);
        v.coordinates = Coordinates::new(120.0, -73.9);
        assert_eq!(
            MarkerSpec::for_vendor(&v),
            Err(MapError::InvalidCoordinates { lat: 120.0, lng: -73.9 })
        );
    }

    #[test]
    fn user_marker_is_distinct() {
        let spec = MarkerSpec::user_location(Coordinates::new(40.7, -73.9));
        assert_eq!(spec.fill_color, "#22c55e");
        assert_eq!(spec.scale, 8.0);
        assert_eq!(spec.title, "Your location");
    }
}

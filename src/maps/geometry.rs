use serde::Serialize;

use crate::models::Coordinates;

/// Rectángulo geográfico (formato LatLngBoundsLiteral)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    /// Límites mínimos que contienen todos los puntos; None si no hay puntos
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = LatLngBounds {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: Coordinates) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_point_set_has_no_bounds() {
        assert!(LatLngBounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn bounds_cover_every_point() {
        let points = vec![
            Coordinates::new(40.7505, -73.9934),
            Coordinates::new(40.7736, -73.9566),
            Coordinates::new(40.7233, -74.0030),
        ];
        let bounds = LatLngBounds::from_points(points.clone()).unwrap();
        assert!(points.iter().all(|p| bounds.contains(*p)));
        assert_eq!(bounds.south, 40.7233);
        assert_eq!(bounds.north, 40.7736);
        assert_eq!(bounds.west, -74.0030);
        assert_eq!(bounds.east, -73.9566);
    }

    #[test]
    fn single_point_bounds_collapse_to_it() {
        let point = Coordinates::new(40.7, -73.9);
        let bounds = LatLngBounds::from_points([point]).unwrap();
        assert_eq!(bounds.center(), point);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// `GeoPoint` is a plain `Copy` value; field data hands points out by value,
/// so holding on to one never observes later reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const MAX_LAT: f64 = 90.0;
    pub const MAX_LON: f64 = 180.0;

    pub const fn new(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint { lat, lon }
    }

    /// Overwrites both coordinates in place.
    #[inline]
    pub fn reset(&mut self, lat: f64, lon: f64) {
        self.lat = lat;
        self.lon = lon;
    }

    /// Returns `true` if the latitude is in `[-90, 90]` and the longitude in `[-180, 180]`.
    pub fn is_in_range(&self) -> bool {
        self.lat.abs() <= Self::MAX_LAT && self.lon.abs() <= Self::MAX_LON
    }

    /// Geohash of this point at the default precision.
    pub fn geohash(&self) -> String {
        crate::geohash::encode(self.lat, self.lon)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        GeoPoint { lat, lon }
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(point: GeoPoint) -> Self {
        (point.lat, point.lon)
    }
}

/// Formats as the indexed term form, `"<lat>,<lon>"`.
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_check() {
        assert!(GeoPoint::new(90.0, -180.0).is_in_range());
        assert!(!GeoPoint::new(90.5, 0.0).is_in_range());
        assert!(!GeoPoint::new(0.0, 180.01).is_in_range());
    }

    #[test]
    fn test_display_and_tuple_conversions() {
        let point = GeoPoint::from((12.34, 56.78));
        assert_eq!(point.to_string(), "12.34,56.78");
        assert_eq!(<(f64, f64)>::from(point), (12.34, 56.78));

        let mut point = point;
        point.reset(-1.5, 2.25);
        assert_eq!(point, GeoPoint::new(-1.5, 2.25));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&GeoPoint::new(1.5, -2.0)).unwrap();
        assert_eq!(json, r#"{"lat":1.5,"lon":-2.0}"#);
        let back: GeoPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GeoPoint::new(1.5, -2.0));
    }
}

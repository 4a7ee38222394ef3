//! Geographic coordinates.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
///
/// Stored latitude-first, the order map overlays expect. Routing services
/// that speak GeoJSON use `[longitude, latitude]`; see [`GeoPoint::from_lon_lat`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a point from a GeoJSON `[lon, lat]` position.
    #[must_use]
    pub const fn from_lon_lat(position: [f64; 2]) -> Self {
        Self::new(position[1], position[0])
    }

    /// Build a point from optional parts; both must be present and non-zero.
    ///
    /// The backend reports an unset coordinate as `null` or `0`.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some(Self::new(lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lon_lat_swaps_order() {
        let point = GeoPoint::from_lon_lat([30.5, 50.4]);
        assert!((point.latitude - 50.4).abs() < f64::EPSILON);
        assert!((point.longitude - 30.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_parts_requires_both() {
        assert!(GeoPoint::from_parts(Some(50.4), Some(30.5)).is_some());
        assert!(GeoPoint::from_parts(Some(50.4), None).is_none());
        assert!(GeoPoint::from_parts(None, Some(30.5)).is_none());
        assert!(GeoPoint::from_parts(Some(0.0), Some(30.5)).is_none());
    }
}

//! Location - Geographic coordinate

use serde::{Deserialize, Serialize};

/// A point on the Earth's surface, in degrees.
///
/// Ranges are not enforced here; longitude is expected in [-180, 180] and
/// latitude in [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub long: f64,
    pub lat: f64,
}

impl Location {
    pub fn new(long: f64, lat: f64) -> Self {
        Self { long, lat }
    }

    /// Well-known-text form, `POINT(long lat)`.
    ///
    /// Uses the shortest representation that round-trips, so no precision is
    /// lost on the way to the database.
    pub fn to_wkt(&self) -> String {
        format!("POINT({} {})", self.long, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wkt_is_long_then_lat() {
        let loc = Location::new(-73.0, 40.0);
        assert_eq!(loc.to_wkt(), "POINT(-73 40)");
    }

    #[test]
    fn test_wkt_keeps_precision() {
        let loc = Location::new(-73.123456789, 40.000000001);
        assert_eq!(loc.to_wkt(), "POINT(-73.123456789 40.000000001)");
    }
}

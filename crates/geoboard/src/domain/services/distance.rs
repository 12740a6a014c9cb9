//! Great-circle distance

use crate::domain::Location;

/// Mean Earth radius used by the haversine formula, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle surface distance between two locations, in meters.
///
/// Haversine formula on a sphere of radius [`EARTH_RADIUS_METERS`]. NaN in
/// either input propagates to the result, so such points never satisfy a
/// radius predicate.
pub fn haversine_distance(a: &Location, b: &Location) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_phi = (b.lat - a.lat).to_radians();
    let delta_lambda = (b.long - a.long).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

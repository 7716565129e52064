//! Great-circle distance.

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two coordinates given in degrees.
///
/// NaN inputs propagate to a NaN result.
///
/// # Example
///
/// ```
/// use slotplan_core::distance_km;
///
/// let d = distance_km(48.8566, 2.3522, 48.8566, 2.3522);
/// assert_eq!(d, 0.0);
/// ```
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_km(52.37, 4.89, 52.37, 4.89), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 2 * pi * R / 360
        let d = distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let a = distance_km(48.85, 2.35, 51.51, -0.13);
        let b = distance_km(51.51, -0.13, 48.85, 2.35);
        assert!((a - b).abs() < 1e-9);
        assert!((a - 343.5).abs() < 1.0, "Paris-London got {a}");
    }

    #[test]
    fn test_nan_propagates() {
        assert!(distance_km(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }
}

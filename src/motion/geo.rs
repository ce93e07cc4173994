//! Geodetic conversion constants and helpers, a direct port of the
//! original plugin's header-only `GeoCalc.hpp` (§4.F step 2, step 4).

pub const EARTH_RADIUS_NM: f64 = 3437.670013352;
pub const FEET_PER_NM: f64 = 6076.0;
pub const METERS_PER_FOOT: f64 = 0.3048;
pub const METERS_PER_NM: f64 = FEET_PER_NM * METERS_PER_FOOT;
pub const NM_PER_DEG: f64 = 60.0;
pub const FEET_PER_DEG: f64 = NM_PER_DEG * FEET_PER_NM;
pub const METERS_PER_DEG: f64 = FEET_PER_DEG * METERS_PER_FOOT;

/// Nautical miles per degree of longitude at `lat_deg`, used to scale
/// longitude deltas so they represent true ground distance.
pub fn longitude_scaling_factor(lat_deg: f64) -> f64 {
    let nm_per_deg_lon = std::f64::consts::PI / 180.0 * EARTH_RADIUS_NM * lat_deg.to_radians().cos();
    nm_per_deg_lon / NM_PER_DEG
}

pub fn meters_to_deg(meters: f64) -> f64 {
    meters / METERS_PER_NM / NM_PER_DEG
}

pub fn deg_to_meters(deg: f64) -> f64 {
    deg * METERS_PER_DEG
}

pub fn deg_to_feet(deg: f64) -> f64 {
    deg * FEET_PER_DEG
}

/// Wraps `value` into `[lower, upper)`, adding/subtracting one full range.
/// Used for latitude ([-90, 90]) and longitude ((-180, 180]) wraparound.
pub fn normalize_degrees(value: f64, lower: f64, upper: f64) -> f64 {
    let range = upper - lower;
    if value < lower {
        value + range
    } else if value > upper {
        value - range
    } else {
        value
    }
}

/// The signed shortest-path delta from `start` to `end` on a circular scale
/// `[lower, upper)`, e.g. the true angular distance from 350° to 10°.
pub fn normalized_delta(start: f64, end: f64, lower: f64, upper: f64) -> f64 {
    let range = upper - lower;
    let half_range = range / 2.0;
    let mut end = end;
    if (end - start).abs() > half_range {
        end += if end > start { -range } else { range };
    }
    end - start
}

pub fn normalize_heading(heading: f64) -> f64 {
    if heading <= 0.0 {
        heading + 360.0
    } else if heading > 360.0 {
        heading - 360.0
    } else {
        heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn meters_to_deg_round_trips_through_deg_to_meters() {
        let meters = 1852.0;
        let deg = meters_to_deg(meters);
        assert_abs_diff_eq!(deg_to_meters(deg), meters, epsilon = 1e-6);
    }

    #[test]
    fn longitude_scaling_factor_is_one_at_equator() {
        assert_abs_diff_eq!(longitude_scaling_factor(0.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn longitude_scaling_factor_shrinks_near_poles() {
        assert!(longitude_scaling_factor(85.0) < 0.1);
    }

    #[test]
    fn normalize_degrees_wraps_latitude() {
        assert_abs_diff_eq!(normalize_degrees(91.0, -90.0, 90.0), -89.0, epsilon = 1e-9);
        assert_abs_diff_eq!(normalize_degrees(-91.0, -90.0, 90.0), 89.0, epsilon = 1e-9);
    }

    #[test]
    fn normalized_delta_takes_the_short_way_around() {
        let delta = normalized_delta(350.0, 10.0, 0.0, 360.0);
        assert_abs_diff_eq!(delta, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn normalize_heading_wraps_into_positive_range() {
        assert_abs_diff_eq!(normalize_heading(0.0), 360.0, epsilon = 1e-9);
        assert_abs_diff_eq!(normalize_heading(370.0), 10.0, epsilon = 1e-9);
    }
}

//! Maidenhead grid-square locators.
//!
//! Both coordinates are shifted into a positive range (`(lon + 180) / 2` and
//! `lat + 90`) and then peeled into digits by dividing successively by
//! field, square, subsquare and two extended-precision step sizes.

use crate::error::{Error, Result};

/// Step sizes for the five digit extractions, in shifted degrees.
const STEP_DIVISORS: [f64; 5] = [10.0, 1.0, 1.0 / 24.0, 1.0 / 240.0, 1.0 / 5760.0];
/// Largest digit each step may produce (fields A-R, subsquares a-x).
const STEP_MAX_DIGIT: [f64; 5] = [17.0, 9.0, 23.0, 9.0, 23.0];

/// Mean Earth radius (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const D2R: f64 = std::f64::consts::PI / 180.0;
const R2D: f64 = 180.0 / std::f64::consts::PI;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// Ten interleaved digits (longitude, latitude) produced by the converter.
pub struct GridDigits(pub [u8; 10]);

impl GridDigits {
    /// Six-character field/square/subsquare locator, e.g. `FN31pr`.
    pub fn locator(&self) -> String {
        let d = &self.0;
        [
            b'A' + d[0],
            b'A' + d[1],
            b'0' + d[2],
            b'0' + d[3],
            b'a' + d[4],
            b'a' + d[5],
        ]
        .iter()
        .map(|&b| b as char)
        .collect()
    }

    /// Ten-character extended locator, e.g. `FN31pr21rn`.
    pub fn extended(&self) -> String {
        let d = &self.0;
        let mut s = self.locator();
        s.push((b'0' + d[6]) as char);
        s.push((b'0' + d[7]) as char);
        s.push((b'a' + d[8]) as char);
        s.push((b'a' + d[9]) as char);
        s
    }
}

/// Truncation used by the digit extraction: floor above zero, ceiling otherwise.
fn trunc_toward_origin(x: f64) -> f64 {
    if x > 0.0 {
        x.floor()
    } else {
        x.ceil()
    }
}

fn wrap_longitude(lon: f64) -> Result<f64> {
    let wrapped = if lon < -180.0 {
        lon + 360.0
    } else if lon >= 180.0 {
        lon - 360.0
    } else {
        lon
    };
    if !(-180.0..180.0).contains(&wrapped) {
        return Err(Error::LongitudeOutOfRange(lon));
    }
    Ok(wrapped)
}

/// Interleaved locator digits for a point; the basis of both locator forms.
pub fn grid_digits(lat: f64, lon: f64) -> Result<GridDigits> {
    if lat.is_nan() || lon.is_nan() {
        return Err(Error::CoordinateNaN);
    }
    if lat.abs() >= 90.0 {
        return Err(Error::PolarLatitude(lat));
    }
    let lon = wrap_longitude(lon)?;

    let mut calc = [(lon + 180.0) / 2.0, lat + 90.0];
    let mut digits = [0u8; 10];
    for (axis, value) in calc.iter_mut().enumerate() {
        for (k, (&div, &max)) in STEP_DIVISORS.iter().zip(&STEP_MAX_DIGIT).enumerate() {
            let res = *value / div;
            // Rounding just below an upper edge can land exactly on it.
            let whole = trunc_toward_origin(res).min(max);
            *value = (res - whole) * div;
            digits[2 * k + axis] = whole as u8;
        }
    }
    Ok(GridDigits(digits))
}

/// Converts latitude/longitude in degrees to a six-character locator.
pub fn lat_lon_to_locator(lat: f64, lon: f64) -> Result<String> {
    Ok(grid_digits(lat, lon)?.locator())
}

/// Centre of a 4- or 6-character locator as `(lat, lon)` in degrees.
pub fn locator_to_lat_lon(locator: &str) -> Result<(f64, f64)> {
    let invalid = || Error::InvalidLocator(locator.to_string());
    let b = locator.as_bytes();
    if b.len() != 4 && b.len() != 6 {
        return Err(invalid());
    }
    let field_lon = b[0].to_ascii_uppercase();
    let field_lat = b[1].to_ascii_uppercase();
    if !(b'A'..=b'R').contains(&field_lon) || !(b'A'..=b'R').contains(&field_lat) {
        return Err(invalid());
    }
    if !b[2].is_ascii_digit() || !b[3].is_ascii_digit() {
        return Err(invalid());
    }

    let mut lon = (field_lon - b'A') as f64 * 20.0 - 180.0 + (b[2] - b'0') as f64 * 2.0;
    let mut lat = (field_lat - b'A') as f64 * 10.0 - 90.0 + (b[3] - b'0') as f64;

    if b.len() == 6 {
        let sub_lon = b[4].to_ascii_lowercase();
        let sub_lat = b[5].to_ascii_lowercase();
        if !(b'a'..=b'x').contains(&sub_lon) || !(b'a'..=b'x').contains(&sub_lat) {
            return Err(invalid());
        }
        lon += ((sub_lon - b'a') as f64 + 0.5) * (2.0 / 24.0);
        lat += ((sub_lat - b'a') as f64 + 0.5) * (1.0 / 24.0);
    } else {
        lon += 1.0;
        lat += 0.5;
    }
    Ok((lat, lon))
}

/// Great-circle distance between two points given in degrees (haversine).
pub fn great_circle_distance_km(here: (f64, f64), there: (f64, f64)) -> f64 {
    let (lat1, lng1) = (here.0 * D2R, here.1 * D2R);
    let (lat2, lng2) = (there.0 * D2R, there.1 * D2R);
    2.0 * EARTH_RADIUS_KM
        * f64::asin(f64::sqrt(
            f64::powi(f64::sin((lat1 - lat2) / 2.0), 2)
                + f64::cos(lat1) * f64::cos(lat2) * f64::powi(f64::sin((lng1 - lng2) / 2.0), 2),
        ))
}

/// Initial bearing in degrees [0, 360) from `here` to `there`.
pub fn initial_bearing_deg(here: (f64, f64), there: (f64, f64)) -> f64 {
    let (lat1, lng1) = (here.0 * D2R, here.1 * D2R);
    let (lat2, lng2) = (there.0 * D2R, there.1 * D2R);
    let numerator = f64::sin(lng2 - lng1) * f64::cos(lat2);
    let denominator =
        f64::cos(lat1) * f64::sin(lat2) - f64::sin(lat1) * f64::cos(lat2) * f64::cos(lng2 - lng1);
    (f64::atan2(numerator, denominator) * R2D).rem_euclid(360.0)
}

/// Distance between the centres of two locators (km).
pub fn distance_km(a: &str, b: &str) -> Result<f64> {
    Ok(great_circle_distance_km(
        locator_to_lat_lon(a)?,
        locator_to_lat_lon(b)?,
    ))
}

/// Bearing from the centre of `a` towards the centre of `b` (degrees).
pub fn bearing_deg(a: &str, b: &str) -> Result<f64> {
    Ok(initial_bearing_deg(
        locator_to_lat_lon(a)?,
        locator_to_lat_lon(b)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn known_locations() -> anyhow::Result<()> {
        assert_eq!(lat_lon_to_locator(40.0, -105.0)?, "DN70ma");
        assert_eq!(lat_lon_to_locator(41.714775, -72.72726)?, "FN31pr");
        assert_eq!(lat_lon_to_locator(35.6895, 139.6917)?, "PM95uq");
        assert_eq!(lat_lon_to_locator(-33.8688, 151.2093)?, "QF56od");
        assert_eq!(lat_lon_to_locator(51.5, -0.1)?, "IO91wm");
        assert_eq!(lat_lon_to_locator(0.0, 0.0)?, "JJ00aa");
        Ok(())
    }

    #[test]
    fn extended_digits() -> anyhow::Result<()> {
        let g = grid_digits(41.714775, -72.72726)?;
        assert_eq!(g.0, [5, 13, 3, 1, 15, 17, 2, 1, 17, 13]);
        assert_eq!(g.extended(), "FN31pr21rn");
        Ok(())
    }

    #[test]
    fn corners_stay_in_alphabet() -> anyhow::Result<()> {
        assert_eq!(lat_lon_to_locator(-89.999, -179.999)?, "AA00aa");
        assert_eq!(lat_lon_to_locator(89.999, 179.999)?, "RR99xx");
        Ok(())
    }

    fn in_alphabet(ext: &str) -> bool {
        let b = ext.as_bytes();
        b.len() == 10
            && b[..2].iter().all(|c| (b'A'..=b'R').contains(c))
            && b[2..4].iter().all(u8::is_ascii_digit)
            && b[4..6].iter().all(|c| (b'a'..=b'x').contains(c))
            && b[6..8].iter().all(u8::is_ascii_digit)
            && b[8..].iter().all(|c| (b'a'..=b'x').contains(c))
    }

    #[test]
    fn last_ulp_before_edges_clamps() -> anyhow::Result<()> {
        let lat_top = 89.999_999_999_999_99;
        let lon_top = 179.999_999_999_999_97;
        assert_eq!(lat_lon_to_locator(0.0, lon_top)?, "RJ90xa");
        assert_eq!(lat_lon_to_locator(lat_top, -180.0)?, "AR09ax");
        assert_eq!(lat_lon_to_locator(lat_top, lon_top)?, "RR99xx");
        assert_eq!(lat_lon_to_locator(-lat_top, lon_top)?, "RA90xa");

        for lat in [-lat_top, 0.0, lat_top, 89.999_999_999_999_9] {
            for lon in [-180.0, lon_top, 179.999_999_999_999_9, -180.000_000_000_000_03] {
                let ext = grid_digits(lat, lon)?.extended();
                assert!(in_alphabet(&ext), "({lat}, {lon}) -> {ext}");
            }
        }
        Ok(())
    }

    #[test]
    fn poles_and_nan_fail() {
        assert_eq!(lat_lon_to_locator(90.0, 0.0), Err(Error::PolarLatitude(90.0)));
        assert_eq!(lat_lon_to_locator(-90.0, 10.0), Err(Error::PolarLatitude(-90.0)));
        assert_eq!(lat_lon_to_locator(f64::NAN, 0.0), Err(Error::CoordinateNaN));
        assert_eq!(lat_lon_to_locator(0.0, f64::NAN), Err(Error::CoordinateNaN));
        assert!(matches!(
            lat_lon_to_locator(f64::INFINITY, 0.0),
            Err(Error::PolarLatitude(_))
        ));
    }

    #[test]
    fn longitude_wraps_once() -> anyhow::Result<()> {
        assert_eq!(lat_lon_to_locator(40.0, 255.0)?, "DN70ma");
        assert_eq!(lat_lon_to_locator(40.0, -465.0)?, "DN70ma");
        assert_eq!(lat_lon_to_locator(10.0, 180.0)?, lat_lon_to_locator(10.0, -180.0)?);
        assert!(matches!(
            lat_lon_to_locator(0.0, 1000.0),
            Err(Error::LongitudeOutOfRange(_))
        ));
        assert!(matches!(
            lat_lon_to_locator(0.0, f64::NEG_INFINITY),
            Err(Error::LongitudeOutOfRange(_))
        ));
        Ok(())
    }

    #[test]
    fn random_points_have_valid_shape() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let lat: f64 = rng.gen_range(-89.9999..89.9999);
            let lon: f64 = rng.gen_range(-180.0..180.0);
            let loc = lat_lon_to_locator(lat, lon)?;
            let b = loc.as_bytes();
            assert_eq!(b.len(), 6, "{loc}");
            assert!((b'A'..=b'R').contains(&b[0]) && (b'A'..=b'R').contains(&b[1]), "{loc}");
            assert!(b[2].is_ascii_digit() && b[3].is_ascii_digit(), "{loc}");
            assert!((b'a'..=b'x').contains(&b[4]) && (b'a'..=b'x').contains(&b[5]), "{loc}");

            let shifted = if lon < 0.0 { lon + 360.0 } else { lon - 360.0 };
            assert_eq!(lat_lon_to_locator(lat, shifted)?, loc);
        }
        Ok(())
    }

    #[test]
    fn centre_maps_back_to_same_square() -> anyhow::Result<()> {
        for loc in ["FN31pr", "DN70ma", "QF56od", "JJ00aa", "RR99xx"] {
            let (lat, lon) = locator_to_lat_lon(loc)?;
            assert_eq!(lat_lon_to_locator(lat, lon)?, loc);
        }
        let (lat, lon) = locator_to_lat_lon("fn31")?;
        assert!((lat - 41.5).abs() < 1e-12 && (lon + 73.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn rejects_malformed_locators() {
        for bad in ["", "FN3", "SN31", "FN3x", "FN31py", "FN31p"] {
            assert!(
                matches!(locator_to_lat_lon(bad), Err(Error::InvalidLocator(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn distance_and_bearing() -> anyhow::Result<()> {
        assert_eq!(distance_km("FN31pr", "FN31pr")?, 0.0);
        // One degree of latitude along a meridian.
        let d = great_circle_distance_km((10.0, 20.0), (11.0, 20.0));
        assert!((d - EARTH_RADIUS_KM * D2R).abs() < 1e-9);

        let d = distance_km("FN31", "IO91")?;
        assert!((5_000.0..5_600.0).contains(&d), "d={d}");
        let b = bearing_deg("FN31", "IO91")?;
        assert!((40.0..60.0).contains(&b), "b={b}");

        assert!((initial_bearing_deg((0.0, 0.0), (10.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((initial_bearing_deg((0.0, 0.0), (0.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((initial_bearing_deg((0.0, 0.0), (-10.0, 0.0)) - 180.0).abs() < 1e-9);
        Ok(())
    }
}

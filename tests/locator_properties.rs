use audiocoder::error::Error;
use audiocoder::locator::{
    bearing_deg, distance_km, grid_digits, lat_lon_to_locator, locator_to_lat_lon,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn locator_centre_contains_point() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20_000 {
        let lat = rng.gen_range(-89.99..89.99);
        let lon = rng.gen_range(-180.0..180.0);
        let loc = lat_lon_to_locator(lat, lon)?;
        let (clat, clon) = locator_to_lat_lon(&loc)?;
        assert!(
            (clat - lat).abs() <= 1.0 / 48.0 + 1e-9,
            "{loc}: lat {lat} centre {clat}"
        );
        assert!(
            (clon - lon).abs() <= 1.0 / 24.0 + 1e-9,
            "{loc}: lon {lon} centre {clon}"
        );
        assert!(grid_digits(lat, lon)?.extended().starts_with(&loc));
    }
    Ok(())
}

#[test]
fn wrapped_longitudes_agree() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1_000 {
        let lat = rng.gen_range(-80.0..80.0);
        // Stay clear of square boundaries, where the wrap's rounding could
        // move the point by one ulp into the neighbour.
        let lon = rng.gen_range(-179.0..179.0_f64).floor() + 0.5;
        assert_eq!(lat_lon_to_locator(lat, lon + 360.0)?, lat_lon_to_locator(lat, lon)?);
        assert_eq!(lat_lon_to_locator(lat, lon - 360.0)?, lat_lon_to_locator(lat, lon)?);
    }
    assert!(matches!(
        lat_lon_to_locator(0.0, 900.0),
        Err(Error::LongitudeOutOfRange(_))
    ));
    Ok(())
}

#[test]
fn distance_is_symmetric_and_bearings_reverse() -> anyhow::Result<()> {
    let grids = ["FN31", "IO91wm", "PM95uq", "QF56od", "DN70ma", "JJ00aa", "RR99xx"];
    for a in grids {
        assert!(distance_km(a, a)? < 1e-9);
        for b in grids {
            let ab = distance_km(a, b)?;
            let ba = distance_km(b, a)?;
            assert!((ab - ba).abs() < 1e-6, "{a}->{b}: {ab} vs {ba}");
            // Half the equatorial circumference bounds every path.
            assert!(ab <= std::f64::consts::PI * 6371.0 + 1e-6);
            let brg = bearing_deg(a, b)?;
            assert!((0.0..360.0).contains(&brg), "{a}->{b}: {brg}");
        }
    }
    // Due north along a meridian.
    assert!((bearing_deg("JJ00", "JK00")? - 0.0).abs() < 1e-9);
    assert!((distance_km("JJ00", "JK00")? - 10.0 * 6371.0 * std::f64::consts::PI / 180.0).abs() < 1e-6);
    Ok(())
}

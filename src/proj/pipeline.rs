//! Pipeline: CRS-to-CRS transform chain between WGS 84 geographic
//! coordinates and the LAEA grids this crate implements.

use crate::error::ProjError;
use crate::proj::laea::LambertAzimuthalEqualArea;
use crate::proj::Projection;

/// Describes a CRS endpoint in the pipeline.
enum CrsEndpoint {
    /// Geographic CRS: coordinates are in degrees externally, radians internally.
    Geographic,
    /// Projected CRS: coordinates are in metres.
    Projected(Box<dyn Projection>),
}

/// A CRS-to-CRS transform pipeline over the supported EPSG codes.
pub struct Pipeline {
    src: CrsEndpoint,
    dst: CrsEndpoint,
}

impl Pipeline {
    /// Create a Pipeline from source and destination CRS strings (`EPSG:<code>`).
    ///
    /// Fails with [`ProjError::UnknownCrs`] for anything but EPSG:4326 and the
    /// LAEA grids 3035, 6931, 6932, 3571–3576 and 2163.
    pub fn new(src_crs: &str, dst_crs: &str) -> Result<Self, ProjError> {
        let src = parse_epsg(src_crs)?;
        let dst = parse_epsg(dst_crs)?;
        tracing::debug!(src_crs, dst_crs, "pipeline ready");
        Ok(Pipeline { src, dst })
    }

    /// Transform a single point from destination CRS to source CRS.
    ///
    /// Input/output coordinates are in CRS native units (degrees for geographic,
    /// metres for projected).
    pub fn transform_inv(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (lon, lat) = match &self.dst {
            CrsEndpoint::Geographic => (x.to_radians(), y.to_radians()),
            CrsEndpoint::Projected(proj) => proj.inverse(x, y)?,
        };

        match &self.src {
            CrsEndpoint::Geographic => Ok((lon.to_degrees(), lat.to_degrees())),
            CrsEndpoint::Projected(proj) => proj.forward(lon, lat),
        }
    }

    /// Batch transform from destination CRS to source CRS, in place.
    pub fn transform_inv_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        for c in coords.iter_mut() {
            *c = self.transform_inv(c.0, c.1)?;
        }
        Ok(())
    }
}

/// Parse an EPSG code into a `CrsEndpoint`.
///
/// Supported: 4326, 3035, 6931, 6932, 3571–3576 and 2163.
fn parse_epsg(crs: &str) -> Result<CrsEndpoint, ProjError> {
    let unknown = || {
        tracing::error!(crs, "unsupported CRS");
        ProjError::UnknownCrs(crs.to_string())
    };
    let code = crs
        .strip_prefix("EPSG:")
        .or_else(|| crs.strip_prefix("epsg:"))
        .and_then(|c| c.parse::<u32>().ok())
        .ok_or_else(unknown)?;

    let proj = match code {
        4326 => return Ok(CrsEndpoint::Geographic),

        // ETRS89-extended / LAEA Europe
        3035 => LambertAzimuthalEqualArea::etrs89()?,

        // NSIDC EASE-Grid 2.0
        6931 => LambertAzimuthalEqualArea::ease_grid_north()?,
        6932 => LambertAzimuthalEqualArea::ease_grid_south()?,

        // WGS 84 / North Pole LAEA family
        3571..=3576 => {
            let lon0: f64 = match code {
                3571 => 180.0,
                3572 => -150.0,
                3573 => -100.0,
                3574 => -40.0,
                3575 => 10.0,
                _ => 90.0,
            };
            LambertAzimuthalEqualArea::north_pole(lon0.to_radians())?
        }

        // US National Atlas Equal Area
        2163 => LambertAzimuthalEqualArea::us_national_atlas()?,

        _ => return Err(unknown()),
    };

    Ok(CrsEndpoint::Projected(Box::new(proj)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proj4rs::Proj;

    const LAEA_EUROPE: &str =
        "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +units=m +no_defs";
    const LAEA_EASE_NORTH: &str =
        "+proj=laea +lat_0=90 +lon_0=0 +x_0=0 +y_0=0 +ellps=WGS84 +units=m +no_defs";

    /// proj4rs reference: geographic degrees -> LAEA metres.
    fn proj4rs_forward(laea: &str, lon: f64, lat: f64) -> (f64, f64) {
        let geo = Proj::from_user_string("EPSG:4326").unwrap();
        let dst = Proj::from_user_string(laea).unwrap();
        let mut point = (lon.to_radians(), lat.to_radians());
        proj4rs::transform::transform(&geo, &dst, &mut point).unwrap();
        point
    }

    /// proj4rs reference: LAEA metres -> geographic degrees.
    fn proj4rs_inverse(laea: &str, x: f64, y: f64) -> (f64, f64) {
        let geo = Proj::from_user_string("EPSG:4326").unwrap();
        let src = Proj::from_user_string(laea).unwrap();
        let mut point = (x, y);
        proj4rs::transform::transform(&src, &geo, &mut point).unwrap();
        (point.0.to_degrees(), point.1.to_degrees())
    }

    #[test]
    fn test_native_3035_to_4326() {
        let pipe = Pipeline::new("EPSG:4326", "EPSG:3035").unwrap();
        let (lon, lat) = pipe.transform_inv(3_962_799.45, 2_999_718.85).unwrap();
        assert_relative_eq!(lon, 5.0, epsilon = 1e-7);
        assert_relative_eq!(lat, 50.0, epsilon = 1e-7);
    }

    #[test]
    fn test_native_4326_to_3035() {
        let pipe = Pipeline::new("EPSG:3035", "EPSG:4326").unwrap();
        let (e, n) = pipe.transform_inv(10.0, 52.0).unwrap();
        assert_relative_eq!(e, 4_321_000.0, epsilon = 1e-6);
        assert_relative_eq!(n, 3_210_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_native_matches_proj4rs_europe() {
        let pipe = Pipeline::new("EPSG:3035", "EPSG:4326").unwrap();
        let test_points: &[(f64, f64)] = &[(5.0, 50.0), (-8.0, 38.7), (24.9, 60.2), (33.0, 35.0)];
        for &(lon, lat) in test_points {
            let (xn, yn) = pipe.transform_inv(lon, lat).unwrap();
            let (xp, yp) = proj4rs_forward(LAEA_EUROPE, lon, lat);
            assert_relative_eq!(xn, xp, epsilon = 1e-3);
            assert_relative_eq!(yn, yp, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_native_matches_proj4rs_ease_north_inverse() {
        let pipe = Pipeline::new("EPSG:4326", "EPSG:6931").unwrap();
        let test_points: &[(f64, f64)] = &[
            (0.0, -2_000_000.0),
            (1_500_000.0, 500_000.0),
            (-3_000_000.0, -3_000_000.0),
        ];
        for &(x, y) in test_points {
            let (lon_n, lat_n) = pipe.transform_inv(x, y).unwrap();
            let (lon_p, lat_p) = proj4rs_inverse(LAEA_EASE_NORTH, x, y);
            assert_relative_eq!(lon_n, lon_p, epsilon = 1e-7);
            assert_relative_eq!(lat_n, lat_p, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_native_laea_to_laea() {
        // EASE north → North Pole LAEA Europe: same ellipsoid and aspect, rotated meridian
        let pipe = Pipeline::new("EPSG:3575", "EPSG:6931").unwrap();
        let r = 2_000_000.0_f64;
        let (x, y) = pipe.transform_inv(0.0, -r).unwrap();
        // distance from the pole is preserved, bearing rotated by 10°
        assert_relative_eq!(x.hypot(y), r, epsilon = 1e-6);
        assert_relative_eq!(x, -r * 10.0_f64.to_radians().sin(), epsilon = 1e-6);
    }

    #[test]
    fn test_native_us_national_atlas() {
        let pipe = Pipeline::new("EPSG:4326", "EPSG:2163").unwrap();
        let (lon, lat) = pipe.transform_inv(0.0, 0.0).unwrap();
        assert_relative_eq!(lon, -100.0, epsilon = 1e-10);
        assert_relative_eq!(lat, 45.0, epsilon = 1e-10);
    }

    #[test]
    fn test_native_domain_error_propagates() {
        let pipe = Pipeline::new("EPSG:6931", "EPSG:4326").unwrap();
        let err = pipe.transform_inv(0.0, -90.0).unwrap_err();
        assert!(err.is_outside_domain(), "{err}");
    }

    #[test]
    fn test_unsupported_crs_rejected() {
        for (src, dst) in [
            ("EPSG:4326", "EPSG:32633"),
            ("EPSG:3857", "EPSG:4326"),
            (LAEA_EUROPE, "EPSG:4326"),
            ("EPSG:4326", "EPSG:"),
        ] {
            let err = Pipeline::new(src, dst).err().unwrap();
            assert!(matches!(err, ProjError::UnknownCrs(_)), "{src} -> {dst}: {err}");
        }
    }

    #[test]
    fn test_batch_transform() {
        let pipe = Pipeline::new("EPSG:4326", "EPSG:3035").unwrap();
        let mut coords = vec![(4_321_000.0, 3_210_000.0), (4_400_000.0, 3_300_000.0)];
        pipe.transform_inv_batch(&mut coords).unwrap();
        for (lon, lat) in &coords {
            assert!(*lon > 9.0 && *lon < 12.0, "lon = {lon}");
            assert!(*lat > 51.0 && *lat < 54.0, "lat = {lat}");
        }
    }

    #[test]
    fn test_identity_same_crs() {
        let pipe = Pipeline::new("EPSG:3035", "EPSG:3035").unwrap();
        let (x, y) = pipe.transform_inv(4_000_000.0, 3_000_000.0).unwrap();
        assert_relative_eq!(x, 4_000_000.0, epsilon = 0.001);
        assert_relative_eq!(y, 3_000_000.0, epsilon = 0.001);
    }
}

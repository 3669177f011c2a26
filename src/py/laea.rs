//! PyO3 bindings for ad-hoc LAEA definitions.

use numpy::PyReadonlyArray1;
use pyo3::prelude::*;

use super::{unzip_xy, value_error, zip_xy, ArrayPair};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::laea::LambertAzimuthalEqualArea;
use crate::proj::Projection;

fn build(
    lat_0: f64,
    lon_0: f64,
    a: f64,
    rf: f64,
    x_0: f64,
    y_0: f64,
) -> PyResult<LambertAzimuthalEqualArea> {
    let ellipsoid = Ellipsoid::from_inverse_flattening(a, rf);
    LambertAzimuthalEqualArea::new(ellipsoid, lon_0.to_radians(), lat_0.to_radians(), x_0, y_0)
        .map_err(value_error)
}

/// Project geographic coordinates with Lambert Azimuthal Equal Area.
///
/// Args:
///     lon, lat: 1D arrays in degrees.
///     lat_0, lon_0: Projection centre in degrees.
///     a: Semi-major axis in metres. Defaults to WGS84.
///     rf: Inverse flattening, 0 for a sphere. Defaults to WGS84.
///     x_0, y_0: False easting/northing in metres.
///
/// Returns:
///     Tuple of (x, y) arrays in metres. Raises ValueError if any point lies
///     outside the projection domain.
#[pyfunction]
#[pyo3(signature = (lon, lat, lat_0, lon_0=0.0, a=6_378_137.0, rf=298.257_223_563, x_0=0.0, y_0=0.0))]
#[allow(clippy::too_many_arguments)]
pub fn laea_forward<'py>(
    py: Python<'py>,
    lon: PyReadonlyArray1<'py, f64>,
    lat: PyReadonlyArray1<'py, f64>,
    lat_0: f64,
    lon_0: f64,
    a: f64,
    rf: f64,
    x_0: f64,
    y_0: f64,
) -> PyResult<ArrayPair<'py>> {
    let proj = build(lat_0, lon_0, a, rf, x_0, y_0)?;
    let mut coords = zip_xy(&lon, &lat)?;

    let coords = py.allow_threads(move || -> PyResult<Vec<(f64, f64)>> {
        for c in coords.iter_mut() {
            *c = (c.0.to_radians(), c.1.to_radians());
        }
        proj.par_forward_batch(&mut coords).map_err(value_error)?;
        Ok(coords)
    })?;

    Ok(unzip_xy(py, coords))
}

/// Inverse of `laea_forward`: (x, y) in metres to (lon, lat) in degrees.
#[pyfunction]
#[pyo3(signature = (x, y, lat_0, lon_0=0.0, a=6_378_137.0, rf=298.257_223_563, x_0=0.0, y_0=0.0))]
#[allow(clippy::too_many_arguments)]
pub fn laea_inverse<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<'py, f64>,
    y: PyReadonlyArray1<'py, f64>,
    lat_0: f64,
    lon_0: f64,
    a: f64,
    rf: f64,
    x_0: f64,
    y_0: f64,
) -> PyResult<ArrayPair<'py>> {
    let proj = build(lat_0, lon_0, a, rf, x_0, y_0)?;
    let mut coords = zip_xy(&x, &y)?;

    let coords = py.allow_threads(move || -> PyResult<Vec<(f64, f64)>> {
        proj.par_inverse_batch(&mut coords).map_err(value_error)?;
        for c in coords.iter_mut() {
            *c = (c.0.to_degrees(), c.1.to_degrees());
        }
        Ok(coords)
    })?;

    Ok(unzip_xy(py, coords))
}

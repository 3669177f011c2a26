//! PyO3 binding for batch CRS coordinate transformation.

use numpy::PyReadonlyArray1;
use pyo3::prelude::*;

use super::{unzip_xy, value_error, zip_xy, ArrayPair};
use crate::proj::pipeline::Pipeline;

/// Transform arrays of coordinates from one CRS to another.
///
/// Args:
///     x: 1D array of x coordinates (longitude or easting).
///     y: 1D array of y coordinates (latitude or northing).
///     src_crs: Source CRS string (e.g. "EPSG:4326").
///     dst_crs: Destination CRS string (e.g. "EPSG:3035").
///
/// Returns:
///     Tuple of (x_out, y_out) arrays in the destination CRS.
#[pyfunction]
#[pyo3(signature = (x, y, src_crs, dst_crs))]
pub fn transform_points<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<'py, f64>,
    y: PyReadonlyArray1<'py, f64>,
    src_crs: &str,
    dst_crs: &str,
) -> PyResult<ArrayPair<'py>> {
    let mut coords = zip_xy(&x, &y)?;

    // Pipeline runs dst -> src, so Pipeline(dst, src).transform_inv is src -> dst
    let src_crs = src_crs.to_string();
    let dst_crs = dst_crs.to_string();

    let coords = py.allow_threads(move || -> PyResult<Vec<(f64, f64)>> {
        let pipeline = Pipeline::new(&dst_crs, &src_crs).map_err(value_error)?;
        pipeline
            .transform_inv_batch(&mut coords)
            .map_err(value_error)?;
        Ok(coords)
    })?;

    Ok(unzip_xy(py, coords))
}

use ndarray::Array1;
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::ProjError;

mod laea;
mod transform;

/// Register all Python-visible functions and types.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(transform::transform_points, m)?)?;
    m.add_function(wrap_pyfunction!(laea::laea_forward, m)?)?;
    m.add_function(wrap_pyfunction!(laea::laea_inverse, m)?)?;
    Ok(())
}

type ArrayPair<'py> = (Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>);

fn value_error(e: ProjError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Pair up two equally long coordinate arrays.
fn zip_xy(x: &PyReadonlyArray1<'_, f64>, y: &PyReadonlyArray1<'_, f64>) -> PyResult<Vec<(f64, f64)>> {
    let x_view = x.as_array();
    let y_view = y.as_array();
    if x_view.len() != y_view.len() {
        return Err(PyValueError::new_err(format!(
            "x and y must have same length, got {} and {}",
            x_view.len(),
            y_view.len()
        )));
    }
    Ok(x_view
        .iter()
        .zip(y_view.iter())
        .map(|(&xi, &yi)| (xi, yi))
        .collect())
}

fn unzip_xy(py: Python<'_>, coords: Vec<(f64, f64)>) -> ArrayPair<'_> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = coords.into_iter().unzip();
    (
        PyArray1::from_owned_array(py, Array1::from(xs)),
        PyArray1::from_owned_array(py, Array1::from(ys)),
    )
}

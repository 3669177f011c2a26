pub mod authalic;
pub mod common;
pub mod ellipsoid;
pub mod laea;
pub mod pipeline;

use rayon::prelude::*;

use crate::error::ProjError;

/// Trait for map projections supporting forward and inverse transforms.
pub trait Projection: Send + Sync {
    /// Forward: (lon_rad, lat_rad) -> (easting, northing)
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError>;

    /// Inverse: (easting, northing) -> (lon_rad, lat_rad)
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError>;

    /// Batch forward transform. Stops at the first failing point.
    fn forward_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        for c in coords.iter_mut() {
            *c = self.forward(c.0, c.1)?;
        }
        Ok(())
    }

    /// Batch inverse transform.
    fn inverse_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        for c in coords.iter_mut() {
            *c = self.inverse(c.0, c.1)?;
        }
        Ok(())
    }

    /// Parallel forward transform over rayon's pool.
    ///
    /// Points that fail are left untouched; one of the errors is returned.
    fn par_forward_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        coords.par_iter_mut().try_for_each(|c| {
            *c = self.forward(c.0, c.1)?;
            Ok(())
        })
    }

    /// Parallel inverse transform over rayon's pool.
    fn par_inverse_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        coords.par_iter_mut().try_for_each(|c| {
            *c = self.inverse(c.0, c.1)?;
            Ok(())
        })
    }

    fn ellipsoid(&self) -> &ellipsoid::Ellipsoid;
}

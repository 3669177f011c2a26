//! Common helpers for projection math (tolerances, longitude wrapping, authalic q).

use std::f64::consts::{PI, TAU};

/// Tolerance used for aspect classification and singularity guards.
pub const EPS10: f64 = 1e-10;

/// Wrap a longitude into [-π, π].
pub fn adjlon(lon: f64) -> f64 {
    if lon.abs() <= PI + EPS10 {
        return lon;
    }
    let wrapped = (lon + PI).rem_euclid(TAU) - PI;
    // rem_euclid maps +π to -π; keep the sign of the input at the seam
    if wrapped == -PI && lon > 0.0 {
        PI
    } else {
        wrapped
    }
}

/// Snyder (1987) eq. 3-12, the `q` function of the authalic latitude.
///
/// `q(φ) = (1 - e²) · [sin φ / (1 - e² sin² φ) + atanh(e sin φ) / e]`
///
/// Falls back to the spherical limit `2 sin φ` for vanishing eccentricity,
/// where the atanh term loses all precision.
pub fn qsfn(sinphi: f64, e: f64) -> f64 {
    if e < 1e-7 {
        return 2.0 * sinphi;
    }
    let es = e * e;
    let con = e * sinphi;
    (1.0 - es) * (sinphi / (1.0 - con * con) + con.atanh() / e)
}
